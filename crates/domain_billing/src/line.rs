//! Billable lines
//!
//! A billable line is the engine's flattened view of anything on a ticket or
//! estimate: a part consumed, a labor entry, or a new engine sale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Money;
use crate::error::BillingError;

/// What kind of charge a line represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCategory {
    Part,
    Labor,
    NewEngineSale,
}

/// A single charge fed to the billing engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillableLine {
    pub category: LineCategory,
    /// Extended amount (quantity x unit price), not rounded
    pub amount: Money,
    /// Intrinsic taxability of the item
    pub taxable: bool,
}

impl BillableLine {
    pub fn new(category: LineCategory, amount: Money, taxable: bool) -> Self {
        Self { category, amount, taxable }
    }

    /// A part line: `quantity` units at `unit_price`
    pub fn part(quantity: Decimal, unit_price: Money, taxable: bool) -> Self {
        Self::new(LineCategory::Part, unit_price * quantity, taxable)
    }

    /// A labor line: `hours` at `rate`. Labor is always taxable.
    pub fn labor(hours: Decimal, rate: Money) -> Self {
        Self::new(LineCategory::Labor, rate * hours, true)
    }

    /// A new engine sale at its sale price
    pub fn new_engine_sale(sale_price: Money) -> Self {
        Self::new(LineCategory::NewEngineSale, sale_price, true)
    }

    pub fn is_engine_sale(&self) -> bool {
        self.category == LineCategory::NewEngineSale
    }

    pub(crate) fn validate(&self, position: usize) -> Result<(), BillingError> {
        if self.amount.is_negative() {
            return Err(BillingError::invalid_input(format!(
                "line {} ({:?}) has negative amount {}",
                position,
                self.category,
                self.amount.amount()
            )));
        }
        Ok(())
    }
}
