//! Repository implementations
//!
//! Each repository owns the SQL for one family of tables and converts rows
//! to and from domain records. Failures are reported as [`DatabaseError`].
//!
//! # Column encoding
//!
//! - ids: UUID blobs
//! - money, hours and quantities: TEXT decimal strings, read back exactly
//! - dates: ISO-8601 TEXT
//! - enums: their display strings ("Awaiting Parts", "Credit Card", ...)

pub mod customer;
pub mod inventory;
pub mod ticket;
pub mod estimate;

pub use customer::CustomerRepository;
pub use inventory::InventoryRepository;
pub use ticket::TicketRepository;
pub use estimate::EstimateRepository;

use rust_decimal::Decimal;
use std::str::FromStr;

use core_kernel::Money;
use crate::error::DatabaseError;

pub(crate) fn money_text(money: Money) -> String {
    money.amount().to_string()
}

pub(crate) fn opt_money_text(money: Option<Money>) -> Option<String> {
    money.map(money_text)
}

pub(crate) fn parse_decimal(column: &str, text: &str) -> Result<Decimal, DatabaseError> {
    Decimal::from_str(text).map_err(|_| DatabaseError::decode(column, text))
}

pub(crate) fn parse_money(column: &str, text: &str) -> Result<Money, DatabaseError> {
    parse_decimal(column, text).map(Money::new)
}

pub(crate) fn parse_opt_money(column: &str, text: Option<String>) -> Result<Option<Money>, DatabaseError> {
    text.map(|t| parse_money(column, &t)).transpose()
}

/// Parses a stored enum display string
pub(crate) fn parse_enum<T: FromStr>(column: &str, text: &str) -> Result<T, DatabaseError> {
    text.parse().map_err(|_| DatabaseError::decode(column, text))
}

pub(crate) fn parse_u32(column: &str, value: i64) -> Result<u32, DatabaseError> {
    u32::try_from(value).map_err(|_| DatabaseError::decode(column, value))
}

/// Fails with `NotFound` when a write matched no row
pub(crate) fn ensure_affected(
    rows_affected: u64,
    entity: &str,
    id: impl std::fmt::Display,
) -> Result<(), DatabaseError> {
    if rows_affected == 0 {
        Err(DatabaseError::not_found(entity, id))
    } else {
        Ok(())
    }
}
