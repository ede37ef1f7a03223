//! Adapters implementing the shop ports
//!
//! The SQLite adapter lives in `infra_db`; this module only carries the
//! in-memory store used by tests and demos.

pub mod memory;

pub use memory::InMemoryShopStore;
