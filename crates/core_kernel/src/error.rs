//! Kernel error type

use thiserror::Error;
use crate::money::MoneyError;

/// Failures raised by kernel value types
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Text that is not a UUID, with or without the id's display prefix
    #[error("Invalid {kind} '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },
}

impl CoreError {
    pub fn invalid_identifier(kind: &'static str, value: impl Into<String>) -> Self {
        CoreError::InvalidIdentifier {
            kind,
            value: value.into(),
        }
    }
}
