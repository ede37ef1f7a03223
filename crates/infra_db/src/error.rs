//! Database error types
//!
//! SQLite failures are classified here and translated to [`PortError`] at
//! the adapter boundary, so the domain never sees a `sqlx::Error`.

use std::time::Duration;
use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to open the database
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// CHECK or NOT NULL constraint
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The database stayed locked past the busy timeout
    #[error("Database is busy: {0}")]
    Busy(String),

    /// A stored value could not be read back into a domain value
    #[error("Corrupt stored value: {0}")]
    Decode(String),

    #[error("Schema bootstrap failed: {0}")]
    SchemaFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,
}

// SQLite primary result codes for lock contention
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Ticket", "TKT-1");
    /// assert!(error.to_string().contains("Ticket"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    pub fn decode(column: &str, value: impl std::fmt::Display) -> Self {
        DatabaseError::Decode(format!("column '{}' holds '{}'", column, value))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, DatabaseError::Busy(_) | DatabaseError::PoolExhausted)
    }

    /// Translates into the port error reported to the domain
    ///
    /// `busy_timeout` is the lock wait that was exceeded when the database
    /// reported itself busy.
    pub fn into_port_error(self, operation: &str, busy_timeout: Duration) -> PortError {
        match self {
            DatabaseError::NotFound(message) => PortError::NotFound {
                entity_type: operation.to_string(),
                id: message,
            },
            DatabaseError::DuplicateEntry(message) | DatabaseError::ForeignKeyViolation(message) => {
                PortError::conflict(message)
            }
            DatabaseError::ConstraintViolation(message) => PortError::validation(message),
            DatabaseError::Busy(_) | DatabaseError::PoolExhausted => PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: u64::try_from(busy_timeout.as_millis()).unwrap_or(u64::MAX),
            },
            DatabaseError::Decode(message) => PortError::transformation(message),
            DatabaseError::ConnectionFailed(message) => PortError::Connection {
                message,
                source: None,
            },
            other @ (DatabaseError::QueryFailed(_) | DatabaseError::SchemaFailed(_)) => {
                PortError::Internal {
                    message: format!("{} failed", operation),
                    source: Some(Box::new(other)),
                }
            }
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                // extended codes carry the primary code in the low byte
                let primary = db_err
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .map(|code| code & 0xff);
                if matches!(primary, Some(SQLITE_BUSY) | Some(SQLITE_LOCKED)) {
                    return DatabaseError::Busy(message);
                }
                match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => DatabaseError::DuplicateEntry(message),
                    sqlx::error::ErrorKind::ForeignKeyViolation => {
                        DatabaseError::ForeignKeyViolation(message)
                    }
                    sqlx::error::ErrorKind::CheckViolation
                    | sqlx::error::ErrorKind::NotNullViolation => {
                        DatabaseError::ConstraintViolation(message)
                    }
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::Decode(error.to_string())
            }
            sqlx::Error::Io(_) | sqlx::Error::Configuration(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}
