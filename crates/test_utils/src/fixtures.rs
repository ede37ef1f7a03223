//! Pre-built Test Fixtures
//!
//! Ready-to-use shop records. Every call returns a fresh record with a new
//! id, so fixtures can be inserted repeatedly into the same store.

use chrono::NaiveDate;
use core_kernel::Money;
use domain_shop::{Customer, Mechanic, NewEngine, Part};
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard shop labor rate
    pub fn labor_rate() -> Money {
        Money::new(dec!(80.00))
    }

    pub fn spark_plug_price() -> Money {
        Money::new(dec!(14.95))
    }

    pub fn washer_price() -> Money {
        Money::new(dec!(0.10))
    }

    /// Sale price of the 115 hp outboard
    pub fn outboard_price() -> Money {
        Money::new(dec!(5000.00))
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    /// The date tickets are opened in tests
    pub fn today() -> NaiveDate {
        Self::date(2026, 10, 17)
    }

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
    }
}

/// Fixture for customers in each tax scenario
pub struct CustomerFixtures;

impl CustomerFixtures {
    /// In-state, taxable customer
    pub fn standard() -> Customer {
        Customer::new("John Doe")
            .with_phone("555-123-4567")
            .with_email("john.doe@example.com")
    }

    /// Exempt customer with a certificate on file
    pub fn exempt() -> Customer {
        Customer::new("Terrebonne Parish Sheriff").with_exemption("EX-2231")
    }

    pub fn out_of_state() -> Customer {
        Customer::new("Gulf Coast Charters").with_out_of_state(true)
    }
}

/// Fixture for parts, mechanics, and engines
pub struct InventoryFixtures;

impl InventoryFixtures {
    pub fn spark_plug() -> Part {
        Part::new("Spark Plug", MoneyFixtures::spark_plug_price())
            .with_part_number("NGK-BKR6E")
            .with_stock(40)
    }

    /// Non-taxable hardware
    pub fn washer() -> Part {
        Part::new("Washer", MoneyFixtures::washer_price())
            .with_stock(500)
            .with_taxable(false)
    }

    pub fn mechanic() -> Mechanic {
        Mechanic::new("Boudreaux", MoneyFixtures::labor_rate())
    }

    /// An in-stock outboard with a serial unique to this call
    pub fn outboard() -> NewEngine {
        let engine = NewEngine::new(115, "MFS115A", "pending");
        let serial = format!("SN115-{}", engine.id.as_uuid().simple());
        NewEngine {
            serial_number: serial,
            ..engine
        }
        .with_purchase_price(Money::new(dec!(3900.00)))
    }
}
