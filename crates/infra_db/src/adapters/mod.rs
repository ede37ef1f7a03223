//! Domain Adapters
//!
//! Implementations of the shop ports over the SQLite repositories.
//!
//! ```rust,ignore
//! use infra_db::{bootstrap, create_pool, DatabaseConfig, SqliteShopStore};
//! use domain_shop::ShopService;
//! use std::sync::Arc;
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//! bootstrap(&pool).await?;
//! let store = SqliteShopStore::new(pool, config.busy_timeout);
//! let service = ShopService::new(Arc::new(store));
//! ```

pub mod shop;

pub use shop::SqliteShopStore;
