//! Estimates (quotes), often prepared for insurance claims
//!
//! Estimate lines are a flat list and consume no inventory.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{BoatId, CustomerId, EngineId, EstimateId, EstimateLineId, Money};
use domain_billing::{BillableLine, LineCategory, Totals};
use crate::error::ShopError;

/// Kind of estimate line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstimateItemType {
    Part,
    Labor,
}

impl EstimateItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateItemType::Part => "part",
            EstimateItemType::Labor => "labor",
        }
    }

    fn category(&self) -> LineCategory {
        match self {
            EstimateItemType::Part => LineCategory::Part,
            EstimateItemType::Labor => LineCategory::Labor,
        }
    }
}

impl fmt::Display for EstimateItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstimateItemType {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "part" => Ok(EstimateItemType::Part),
            "labor" => Ok(EstimateItemType::Labor),
            other => Err(ShopError::validation(format!(
                "item type must be 'part' or 'labor', got '{}'",
                other
            ))),
        }
    }
}

/// A non-binding quote for a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub id: EstimateId,
    pub customer_id: CustomerId,
    pub boat_id: Option<BoatId>,
    pub engine_id: Option<EngineId>,
    pub date_created: NaiveDate,
    pub insurance_company: Option<String>,
    pub claim_number: Option<String>,
    pub notes: Option<String>,
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
}

impl Estimate {
    pub fn new(customer_id: CustomerId, date_created: NaiveDate) -> Self {
        Self {
            id: EstimateId::new_v7(),
            customer_id,
            boat_id: None,
            engine_id: None,
            date_created,
            insurance_company: None,
            claim_number: None,
            notes: None,
            subtotal: Money::zero(),
            tax_amount: Money::zero(),
            total: Money::zero(),
        }
    }

    pub fn for_boat(mut self, boat_id: BoatId) -> Self {
        self.boat_id = Some(boat_id);
        self
    }

    pub fn with_insurance_claim(
        mut self,
        company: impl Into<String>,
        claim_number: impl Into<String>,
    ) -> Self {
        self.insurance_company = Some(company.into());
        self.claim_number = Some(claim_number.into());
        self
    }

    pub fn apply_totals(&mut self, totals: &Totals) {
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.total = totals.total;
    }
}

/// One line of an estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateLineItem {
    pub id: EstimateLineId,
    pub estimate_id: EstimateId,
    pub item_type: EstimateItemType,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Money,
    /// `quantity x unit_price`, rounded to the cent when the line is created
    pub line_total: Money,
    pub taxable: bool,
}

impl EstimateLineItem {
    /// Creates a taxable line
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Validation` if the quantity is not positive or the
    /// unit price is negative.
    pub fn new(
        estimate_id: EstimateId,
        item_type: EstimateItemType,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Money,
    ) -> Result<Self, ShopError> {
        if quantity <= Decimal::ZERO {
            return Err(ShopError::validation("quantity must be greater than zero"));
        }
        if unit_price.is_negative() {
            return Err(ShopError::validation("unit price cannot be negative"));
        }
        Ok(Self {
            id: EstimateLineId::new_v7(),
            estimate_id,
            item_type,
            description: description.into(),
            quantity,
            unit_price,
            line_total: (unit_price * quantity).round_to_cents(),
            taxable: true,
        })
    }

    pub fn with_taxable(mut self, taxable: bool) -> Self {
        self.taxable = taxable;
        self
    }

    pub fn to_billable(&self) -> BillableLine {
        BillableLine::new(self.item_type.category(), self.line_total, self.taxable)
    }
}
