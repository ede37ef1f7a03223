//! Shop domain errors

use thiserror::Error;

use core_kernel::PortError;
use domain_billing::BillingError;

/// Errors that can occur in the shop domain
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("New engine {0} is not in stock")]
    EngineNotInStock(String),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

impl ShopError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        ShopError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ShopError::Validation(message.into())
    }
}
