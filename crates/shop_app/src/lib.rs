//! Shop Application
//!
//! Wires configuration, tracing, and the SQLite store into a ready
//! `ShopService`.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_app::{ShopApp, ShopConfig};
//!
//! let config = ShopConfig::from_env()?;
//! shop_app::telemetry::init_tracing(&config.log_level, config.log_json)?;
//! let app = ShopApp::start(config).await?;
//! let tickets = app.service().list_tickets(None).await?;
//! ```

pub mod config;
pub mod error;
pub mod telemetry;

pub use crate::config::ShopConfig;
pub use error::AppError;

use tracing::info;

use domain_shop::ShopService;
use infra_db::SqliteShopStore;

/// A running shop backend
pub struct ShopApp {
    config: ShopConfig,
    service: ShopService<SqliteShopStore>,
}

impl ShopApp {
    /// Opens the database, creates missing tables, and builds the service
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the database cannot be opened or
    /// the schema cannot be created, and `AppError::Shop` if it does not
    /// answer a trivial query afterwards.
    pub async fn start(config: ShopConfig) -> Result<Self, AppError> {
        let store = SqliteShopStore::connect(&config.database_config()).await?;
        store.ping().await.map_err(domain_shop::ShopError::from)?;
        info!(
            database_url = %config.database_url,
            max_connections = config.max_connections,
            "Shop backend ready"
        );
        Ok(Self {
            service: ShopService::new(std::sync::Arc::new(store)),
            config,
        })
    }

    /// Loads configuration from the environment, installs tracing, and starts
    pub async fn from_env() -> Result<Self, AppError> {
        let config = ShopConfig::from_env()?;
        telemetry::init_tracing(&config.log_level, config.log_json)?;
        Self::start(config).await
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    pub fn service(&self) -> &ShopService<SqliteShopStore> {
        &self.service
    }
}
