//! Infrastructure Database Layer
//!
//! SQLite persistence for the marine shop using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories own the SQL for
//! one group of tables and speak `DatabaseError`; the adapter in
//! [`adapters`] stitches them together behind the domain's store ports and
//! translates failures into `PortError`.
//!
//! Money and quantities are stored as decimal text so values read back
//! exactly as written. Identifiers are stored as 16-byte UUID blobs.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, SqliteShopStore};
//!
//! let store = SqliteShopStore::connect(&DatabaseConfig::default()).await?;
//! let service = domain_shop::ShopService::new(std::sync::Arc::new(store));
//! ```

pub mod pool;
pub mod error;
pub mod schema;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::DatabaseError;
pub use schema::bootstrap;
pub use adapters::SqliteShopStore;
