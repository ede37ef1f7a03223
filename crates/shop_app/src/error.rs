//! Application error types

use thiserror::Error;

use domain_shop::ShopError;
use infra_db::DatabaseError;

/// Errors raised while starting or running the shop application
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration was read but a value is unusable
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig { field: &'static str, message: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// A global tracing subscriber was already installed
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    #[error(transparent)]
    Shop(#[from] ShopError),
}

impl AppError {
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}
