//! Test Data Builders
//!
//! Builds a repair ticket with labor and parts through `ShopService`, so
//! the same scenario can run against any store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_shop::{
    Boat, Customer, LaborEntry, Mechanic, Part, ShopError, ShopService, ShopStore, Ticket,
};

use crate::fixtures::{CustomerFixtures, DateFixtures, InventoryFixtures};

/// Everything created for one ticket scenario
#[derive(Debug, Clone)]
pub struct TicketScenario {
    pub customer: Customer,
    pub boat: Boat,
    pub mechanic: Mechanic,
    pub parts: Vec<Part>,
    /// The ticket as stored after every line was added
    pub ticket: Ticket,
}

/// Builder for a populated repair ticket
pub struct TicketScenarioBuilder {
    customer: Customer,
    mechanic: Mechanic,
    labor_hours: Vec<Decimal>,
    parts: Vec<(Part, u32)>,
    opened: NaiveDate,
}

impl Default for TicketScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketScenarioBuilder {
    /// An empty ticket for a standard customer
    pub fn new() -> Self {
        Self {
            customer: CustomerFixtures::standard(),
            mechanic: InventoryFixtures::mechanic(),
            labor_hours: Vec::new(),
            parts: Vec::new(),
            opened: DateFixtures::today(),
        }
    }

    /// 1.5 hours of labor at $80, two spark plugs, and one non-taxable washer
    ///
    /// Subtotal $150.00 with a taxable base of $149.90.
    pub fn standard_mixed() -> Self {
        Self::new()
            .with_labor(dec!(1.5))
            .with_part(InventoryFixtures::spark_plug(), 2)
            .with_part(InventoryFixtures::washer(), 1)
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = customer;
        self
    }

    pub fn with_mechanic(mut self, mechanic: Mechanic) -> Self {
        self.mechanic = mechanic;
        self
    }

    /// Adds a labor line billed at the mechanic's rate
    pub fn with_labor(mut self, hours: Decimal) -> Self {
        self.labor_hours.push(hours);
        self
    }

    pub fn with_part(mut self, part: Part, quantity: u32) -> Self {
        self.parts.push((part, quantity));
        self
    }

    pub fn opened_on(mut self, date: NaiveDate) -> Self {
        self.opened = date;
        self
    }

    /// Creates every record through the service and returns the stored ticket
    pub async fn build<S: ShopStore>(
        self,
        service: &ShopService<S>,
    ) -> Result<TicketScenario, ShopError> {
        let customer = service.create_customer(self.customer).await?;
        let boat = service
            .create_boat(Boat::new(customer.id).with_make_model("Skeeter", "ZX250"))
            .await?;
        let mechanic = service.create_mechanic(self.mechanic).await?;
        let ticket = service
            .open_ticket(Ticket::new(customer.id, boat.id, self.opened).with_description("Won't start"))
            .await?;

        for hours in self.labor_hours {
            let entry = LaborEntry {
                mechanic_id: mechanic.id,
                hours,
                labor_rate: None,
                work_description: Some("Diagnose and repair".to_string()),
            };
            service.add_ticket_labor(ticket.id, entry).await?;
        }

        let mut parts = Vec::with_capacity(self.parts.len());
        for (part, quantity) in self.parts {
            let part = service.create_part(part).await?;
            service.add_ticket_part(ticket.id, part.id, quantity, None).await?;
            parts.push(part);
        }

        let ticket = service.ticket(ticket.id).await?;
        Ok(TicketScenario {
            customer,
            boat,
            mechanic,
            parts,
            ticket,
        })
    }
}
