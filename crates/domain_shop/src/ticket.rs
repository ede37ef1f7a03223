//! Repair tickets
//!
//! A ticket accumulates parts, labor, an optional new engine sale and
//! deposits until it is closed. Its `subtotal`, `tax_amount` and `total`
//! are derived fields: they are only ever written from a fresh
//! [`Totals`] computation, never edited by hand.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{
    AssignmentId, BoatId, CustomerId, EngineId, MechanicId, Money, NewEngineId, PartId,
    TicketId, TicketPartId,
};
use domain_billing::{BillableLine, Totals};
use crate::error::ShopError;
use crate::inventory::Part;

/// Workflow status of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    Working,
    AwaitingParts,
    AwaitingCustomer,
    AwaitingPayment,
    AwaitingPickup,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 7] = [
        TicketStatus::Open,
        TicketStatus::Working,
        TicketStatus::AwaitingParts,
        TicketStatus::AwaitingCustomer,
        TicketStatus::AwaitingPayment,
        TicketStatus::AwaitingPickup,
        TicketStatus::Closed,
    ];

    /// Statuses reachable from this one by a normal transition
    ///
    /// Open statuses may move anywhere, including straight to `Closed`.
    /// Nothing leaves `Closed`; see [`Ticket::reopen`].
    pub fn allowed_targets(&self) -> &'static [TicketStatus] {
        match self {
            TicketStatus::Closed => &[],
            _ => &Self::ALL,
        }
    }

    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        self.allowed_targets().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        *self == TicketStatus::Closed
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::Working => "Working",
            TicketStatus::AwaitingParts => "Awaiting Parts",
            TicketStatus::AwaitingCustomer => "Awaiting Customer",
            TicketStatus::AwaitingPayment => "Awaiting Payment",
            TicketStatus::AwaitingPickup => "Awaiting Pickup",
            TicketStatus::Closed => "Closed",
        }
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        TicketStatus::Open
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ShopError::validation(format!("unknown ticket status '{}'", s)))
    }
}

/// A repair work order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub customer_id: CustomerId,
    pub boat_id: BoatId,
    pub engine_id: Option<EngineId>,
    /// New engine sold on this ticket
    pub new_engine_id: Option<NewEngineId>,
    pub description: Option<String>,
    pub customer_notes: Option<String>,
    pub status: TicketStatus,
    pub date_opened: NaiveDate,
    pub date_closed: Option<NaiveDate>,
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
}

impl Ticket {
    /// Opens a new ticket
    pub fn new(customer_id: CustomerId, boat_id: BoatId, date_opened: NaiveDate) -> Self {
        Self {
            id: TicketId::new_v7(),
            customer_id,
            boat_id,
            engine_id: None,
            new_engine_id: None,
            description: None,
            customer_notes: None,
            status: TicketStatus::Open,
            date_opened,
            date_closed: None,
            subtotal: Money::zero(),
            tax_amount: Money::zero(),
            total: Money::zero(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_engine(mut self, engine_id: EngineId) -> Self {
        self.engine_id = Some(engine_id);
        self
    }

    /// Moves the ticket along its workflow, stamping the close date on close
    pub fn transition_to(&mut self, next: TicketStatus, today: NaiveDate) -> Result<(), ShopError> {
        if !self.status.can_transition_to(next) {
            return Err(ShopError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        if next == TicketStatus::Closed {
            self.date_closed = Some(today);
        }
        Ok(())
    }

    /// Reopens a closed ticket by direct assignment
    pub fn reopen(&mut self, status: TicketStatus) -> Result<(), ShopError> {
        if status.is_terminal() {
            return Err(ShopError::validation("a ticket cannot be reopened as Closed"));
        }
        self.status = status;
        self.date_closed = None;
        Ok(())
    }

    /// Replaces the stored totals with a fresh computation
    pub fn apply_totals(&mut self, totals: &Totals) {
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.total = totals.total;
    }
}

/// A part consumed on a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPart {
    pub id: TicketPartId,
    pub ticket_id: TicketId,
    pub part_id: PartId,
    pub quantity_used: u32,
    /// Per-line price that replaces the part's catalogue price
    pub price_override: Option<Money>,
}

impl TicketPart {
    pub fn new(ticket_id: TicketId, part_id: PartId, quantity_used: u32) -> Self {
        Self {
            id: TicketPartId::new_v7(),
            ticket_id,
            part_id,
            quantity_used,
            price_override: None,
        }
    }

    pub fn with_price_override(mut self, price: Money) -> Self {
        self.price_override = Some(price);
        self
    }

    pub fn unit_price(&self, part: &Part) -> Money {
        self.price_override.unwrap_or(part.price)
    }

    /// Billing view of this line; taxability comes from the part record
    pub fn to_billable(&self, part: &Part) -> BillableLine {
        BillableLine::part(Decimal::from(self.quantity_used), self.unit_price(part), part.taxable)
    }
}

/// Labor logged by a mechanic on a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketAssignment {
    pub id: AssignmentId,
    pub ticket_id: TicketId,
    pub mechanic_id: MechanicId,
    pub hours_worked: Decimal,
    pub labor_rate: Money,
    pub work_description: Option<String>,
}

impl TicketAssignment {
    pub fn new(ticket_id: TicketId, mechanic_id: MechanicId, hours_worked: Decimal, labor_rate: Money) -> Self {
        Self {
            id: AssignmentId::new_v7(),
            ticket_id,
            mechanic_id,
            hours_worked,
            labor_rate,
            work_description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.work_description = Some(description.into());
        self
    }

    pub fn to_billable(&self) -> BillableLine {
        BillableLine::labor(self.hours_worked, self.labor_rate)
    }
}
