//! Shop inventory: parts, mechanics, and new engines for sale

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{BoatId, CustomerId, MechanicId, Money, NewEngineId, PartId};
use crate::error::ShopError;

/// Days after installation before an engine is due for manufacturer registration
pub const REGISTRATION_WAIT_DAYS: i64 = 30;

/// A stocked part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub part_number: Option<String>,
    pub name: String,
    pub stock_quantity: i64,
    /// Shop selling price, used on tickets unless overridden per line
    pub price: Money,
    pub supplier_name: Option<String>,
    pub cost_from_supplier: Option<Money>,
    /// Manufacturer's suggested retail price, informational
    pub retail_price: Option<Money>,
    pub taxable: bool,
}

impl Part {
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            id: PartId::new_v7(),
            part_number: None,
            name: name.into(),
            stock_quantity: 0,
            price,
            supplier_name: None,
            cost_from_supplier: None,
            retail_price: None,
            taxable: true,
        }
    }

    pub fn with_part_number(mut self, number: impl Into<String>) -> Self {
        self.part_number = Some(number.into());
        self
    }

    pub fn with_stock(mut self, quantity: i64) -> Self {
        self.stock_quantity = quantity;
        self
    }

    pub fn with_taxable(mut self, taxable: bool) -> Self {
        self.taxable = taxable;
        self
    }

    pub fn with_supplier(mut self, name: impl Into<String>, cost: Money) -> Self {
        self.supplier_name = Some(name.into());
        self.cost_from_supplier = Some(cost);
        self
    }

    pub fn with_retail_price(mut self, price: Money) -> Self {
        self.retail_price = Some(price);
        self
    }
}

/// A mechanic who logs labor against tickets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mechanic {
    pub id: MechanicId,
    pub name: String,
    pub hourly_rate: Option<Money>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Mechanic {
    pub fn new(name: impl Into<String>, hourly_rate: Money) -> Self {
        Self {
            id: MechanicId::new_v7(),
            name: name.into(),
            hourly_rate: Some(hourly_rate),
            phone: None,
            email: None,
        }
    }
}

/// Where a new engine sits in the sales pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewEngineStatus {
    InStock,
    Sold,
    Transferred,
}

impl NewEngineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewEngineStatus::InStock => "In Stock",
            NewEngineStatus::Sold => "Sold",
            NewEngineStatus::Transferred => "Transferred",
        }
    }
}

impl fmt::Display for NewEngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewEngineStatus {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In Stock" => Ok(NewEngineStatus::InStock),
            "Sold" => Ok(NewEngineStatus::Sold),
            "Transferred" => Ok(NewEngineStatus::Transferred),
            other => Err(ShopError::validation(format!("unknown engine status '{}'", other))),
        }
    }
}

/// Terms of a new engine sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSale {
    pub customer_id: CustomerId,
    pub boat_id: Option<BoatId>,
    pub sale_price: Money,
    pub date_sold: NaiveDate,
    pub date_installed: Option<NaiveDate>,
    pub paid_in_full: bool,
}

/// A new outboard held for sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEngine {
    pub id: NewEngineId,
    pub hp: u32,
    pub model: String,
    pub serial_number: String,
    pub status: NewEngineStatus,
    pub purchase_price: Option<Money>,
    pub sale_price: Option<Money>,
    pub customer_id: Option<CustomerId>,
    pub boat_id: Option<BoatId>,
    pub date_sold: Option<NaiveDate>,
    pub date_installed: Option<NaiveDate>,
    pub paid_in_full: bool,
    pub registered_with_manufacturer: bool,
    pub registration_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewEngine {
    pub fn new(hp: u32, model: impl Into<String>, serial_number: impl Into<String>) -> Self {
        Self {
            id: NewEngineId::new_v7(),
            hp,
            model: model.into(),
            serial_number: serial_number.into(),
            status: NewEngineStatus::InStock,
            purchase_price: None,
            sale_price: None,
            customer_id: None,
            boat_id: None,
            date_sold: None,
            date_installed: None,
            paid_in_full: false,
            registered_with_manufacturer: false,
            registration_date: None,
            notes: None,
        }
    }

    pub fn with_purchase_price(mut self, price: Money) -> Self {
        self.purchase_price = Some(price);
        self
    }

    /// Records the sale; only an in-stock engine can be sold
    pub fn sell(&mut self, sale: EngineSale) -> Result<(), ShopError> {
        if self.status != NewEngineStatus::InStock {
            return Err(ShopError::EngineNotInStock(self.serial_number.clone()));
        }
        self.status = NewEngineStatus::Sold;
        self.customer_id = Some(sale.customer_id);
        self.boat_id = sale.boat_id;
        self.sale_price = Some(sale.sale_price);
        self.date_sold = Some(sale.date_sold);
        self.date_installed = sale.date_installed;
        self.paid_in_full = sale.paid_in_full;
        Ok(())
    }

    pub fn mark_registered(&mut self, on: NaiveDate) {
        self.registered_with_manufacturer = true;
        self.registration_date = Some(on);
    }

    /// Sold, paid, installed at least 30 days before `today`, not yet registered
    pub fn needs_registration(&self, today: NaiveDate) -> bool {
        let installed_long_enough = self
            .date_installed
            .is_some_and(|d| d <= today - Duration::days(REGISTRATION_WAIT_DAYS));
        self.status == NewEngineStatus::Sold
            && self.paid_in_full
            && installed_long_enough
            && !self.registered_with_manufacturer
    }

    /// Sale price to bill, if the engine has been sold with a price
    pub fn billable_sale_price(&self) -> Option<Money> {
        self.sale_price.filter(|p| p.amount() > Decimal::ZERO)
    }
}
