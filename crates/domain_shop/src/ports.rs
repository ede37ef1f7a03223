//! Shop Domain Ports
//!
//! Storage needs of the shop domain, split by record family. Adapters
//! implement all four traits and thereby become a [`ShopStore`]:
//!
//! - **SQLite Adapter**: `infra_db::SqliteShopStore`
//! - **In-Memory Adapter**: [`crate::adapters::InMemoryShopStore`], for tests
//!
//! Lookups by id return `Ok(None)` when the record is absent; deciding
//! whether that is an error belongs to the caller. Updates and deletes of a
//! missing record return `PortError::NotFound`.
//!
//! Writes are last-write-wins at the record level.

use async_trait::async_trait;

use core_kernel::{
    AssignmentId, BoatId, CustomerId, DomainPort, EngineId, EstimateId, EstimateLineId,
    MechanicId, NewEngineId, PartId, PortError, TicketId, TicketPartId,
};

use crate::boat::{Boat, Engine};
use crate::customer::Customer;
use crate::deposit::Deposit;
use crate::estimate::{Estimate, EstimateLineItem};
use crate::inventory::{Mechanic, NewEngine, NewEngineStatus, Part};
use crate::ticket::{Ticket, TicketAssignment, TicketPart, TicketStatus};

/// Customers, their boats, and installed engines
#[async_trait]
pub trait CustomerStore: DomainPort {
    async fn insert_customer(&self, customer: &Customer) -> Result<(), PortError>;

    async fn update_customer(&self, customer: &Customer) -> Result<(), PortError>;

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, PortError>;

    /// All customers ordered by name
    async fn list_customers(&self) -> Result<Vec<Customer>, PortError>;

    async fn insert_boat(&self, boat: &Boat) -> Result<(), PortError>;

    async fn get_boat(&self, id: BoatId) -> Result<Option<Boat>, PortError>;

    async fn list_boats(&self, customer_id: CustomerId) -> Result<Vec<Boat>, PortError>;

    async fn insert_engine(&self, engine: &Engine) -> Result<(), PortError>;

    async fn get_engine(&self, id: EngineId) -> Result<Option<Engine>, PortError>;

    async fn list_engines(&self, boat_id: BoatId) -> Result<Vec<Engine>, PortError>;
}

/// Parts, mechanics, and new engines held for sale
#[async_trait]
pub trait InventoryStore: DomainPort {
    async fn insert_part(&self, part: &Part) -> Result<(), PortError>;

    async fn update_part(&self, part: &Part) -> Result<(), PortError>;

    async fn get_part(&self, id: PartId) -> Result<Option<Part>, PortError>;

    /// All parts ordered by name
    async fn list_parts(&self) -> Result<Vec<Part>, PortError>;

    async fn insert_mechanic(&self, mechanic: &Mechanic) -> Result<(), PortError>;

    async fn get_mechanic(&self, id: MechanicId) -> Result<Option<Mechanic>, PortError>;

    async fn insert_new_engine(&self, engine: &NewEngine) -> Result<(), PortError>;

    async fn update_new_engine(&self, engine: &NewEngine) -> Result<(), PortError>;

    async fn get_new_engine(&self, id: NewEngineId) -> Result<Option<NewEngine>, PortError>;

    /// New engines, optionally restricted to one status
    async fn list_new_engines(
        &self,
        status: Option<NewEngineStatus>,
    ) -> Result<Vec<NewEngine>, PortError>;
}

/// Tickets and everything attached to them
#[async_trait]
pub trait TicketStore: DomainPort {
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), PortError>;

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), PortError>;

    async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, PortError>;

    /// Tickets newest first, optionally restricted to one status
    async fn list_tickets(&self, status: Option<TicketStatus>) -> Result<Vec<Ticket>, PortError>;

    async fn insert_ticket_part(&self, line: &TicketPart) -> Result<(), PortError>;

    /// Removes a part line only if it belongs to `ticket_id`
    async fn delete_ticket_part(
        &self,
        ticket_id: TicketId,
        id: TicketPartId,
    ) -> Result<(), PortError>;

    async fn list_ticket_parts(&self, ticket_id: TicketId) -> Result<Vec<TicketPart>, PortError>;

    async fn insert_assignment(&self, assignment: &TicketAssignment) -> Result<(), PortError>;

    async fn delete_assignment(
        &self,
        ticket_id: TicketId,
        id: AssignmentId,
    ) -> Result<(), PortError>;

    async fn list_assignments(
        &self,
        ticket_id: TicketId,
    ) -> Result<Vec<TicketAssignment>, PortError>;

    async fn insert_deposit(&self, deposit: &Deposit) -> Result<(), PortError>;

    /// Deposits in payment-date order
    async fn list_deposits(&self, ticket_id: TicketId) -> Result<Vec<Deposit>, PortError>;
}

/// Estimates and their line items
#[async_trait]
pub trait EstimateStore: DomainPort {
    async fn insert_estimate(&self, estimate: &Estimate) -> Result<(), PortError>;

    async fn update_estimate(&self, estimate: &Estimate) -> Result<(), PortError>;

    async fn get_estimate(&self, id: EstimateId) -> Result<Option<Estimate>, PortError>;

    /// Estimates newest first
    async fn list_estimates(&self) -> Result<Vec<Estimate>, PortError>;

    async fn insert_estimate_line(&self, line: &EstimateLineItem) -> Result<(), PortError>;

    /// Removes a line only if it belongs to `estimate_id`
    async fn delete_estimate_line(
        &self,
        estimate_id: EstimateId,
        id: EstimateLineId,
    ) -> Result<(), PortError>;

    async fn list_estimate_lines(
        &self,
        estimate_id: EstimateId,
    ) -> Result<Vec<EstimateLineItem>, PortError>;
}

/// Everything the shop service needs from storage
pub trait ShopStore: CustomerStore + InventoryStore + TicketStore + EstimateStore {}

// Blanket implementation for every complete adapter
impl<T> ShopStore for T where T: CustomerStore + InventoryStore + TicketStore + EstimateStore {}
