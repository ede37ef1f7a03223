//! Database Test Utilities
//!
//! Each `TestDatabase` is a private in-memory SQLite database with the shop
//! schema applied, so tests never share state and need no external server.

use std::sync::Arc;

use domain_shop::ShopService;
use infra_db::{DatabaseConfig, DatabaseError, SqliteShopStore};

/// A fresh in-memory shop database
pub struct TestDatabase {
    pub config: DatabaseConfig,
    pub store: Arc<SqliteShopStore>,
}

impl TestDatabase {
    /// Opens the database and creates the schema
    pub async fn new() -> Result<Self, DatabaseError> {
        let config = DatabaseConfig::in_memory();
        let store = SqliteShopStore::connect(&config).await?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// A service over this database
    pub fn service(&self) -> ShopService<SqliteShopStore> {
        ShopService::new(Arc::clone(&self.store))
    }
}
