//! Billing domain errors

use thiserror::Error;

/// Errors that can occur in the billing engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillingError {
    /// Malformed input: a negative line amount or a missing customer
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl BillingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        BillingError::InvalidInput(message.into())
    }

    /// The document's customer could not be resolved
    pub fn missing_customer() -> Self {
        BillingError::InvalidInput("customer is required to compute totals".to_string())
    }
}
