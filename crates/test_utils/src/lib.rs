//! Test Utilities Crate
//!
//! Shared test infrastructure, fixtures, and helpers for the marine shop
//! test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built customers, parts, mechanics, and dates
//! - `builders`: Builds a populated repair ticket through `ShopService`
//! - `database`: In-memory SQLite stores with the schema applied
//! - `assertions`: Assertion helpers for money and totals
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
