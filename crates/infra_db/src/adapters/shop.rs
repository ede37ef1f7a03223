//! SQLite Shop Adapter
//!
//! `SqliteShopStore` implements every shop port over the repositories in
//! [`crate::repositories`]. Database errors are translated to `PortError`
//! here:
//! - `DatabaseError::NotFound` -> `PortError::NotFound`
//! - duplicate or foreign-key violations -> `PortError::Conflict`
//! - busy/locked database -> `PortError::Timeout`
//! - unreadable stored values -> `PortError::Transformation`

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use core_kernel::{
    AssignmentId, BoatId, CustomerId, DomainPort, EngineId, EstimateId, EstimateLineId,
    MechanicId, NewEngineId, PartId, PortError, TicketId, TicketPartId,
};
use domain_shop::{
    Boat, Customer, CustomerStore, Deposit, Engine, Estimate, EstimateLineItem, EstimateStore,
    InventoryStore, Mechanic, NewEngine, NewEngineStatus, Part, Ticket, TicketAssignment,
    TicketPart, TicketStatus, TicketStore,
};

use crate::error::DatabaseError;
use crate::pool::{create_pool, DatabaseConfig, DatabasePool};
use crate::repositories::{
    CustomerRepository, EstimateRepository, InventoryRepository, TicketRepository,
};
use crate::schema;

/// SQLite-backed implementation of the shop ports
#[derive(Debug, Clone)]
pub struct SqliteShopStore {
    pool: DatabasePool,
    busy_timeout: Duration,
    customers: CustomerRepository,
    inventory: InventoryRepository,
    tickets: TicketRepository,
    estimates: EstimateRepository,
}

impl SqliteShopStore {
    /// Wraps an existing pool
    ///
    /// `busy_timeout` should match the pool's configured lock wait; it is
    /// reported in `PortError::Timeout`.
    pub fn new(pool: DatabasePool, busy_timeout: Duration) -> Self {
        Self {
            customers: CustomerRepository::new(pool.clone()),
            inventory: InventoryRepository::new(pool.clone()),
            tickets: TicketRepository::new(pool.clone()),
            estimates: EstimateRepository::new(pool.clone()),
            pool,
            busy_timeout,
        }
    }

    /// Opens the database described by `config` and creates missing tables
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = create_pool(config).await?;
        schema::bootstrap(&pool).await?;
        Ok(Self::new(pool, config.busy_timeout))
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Verifies the database answers a trivial query
    pub async fn ping(&self) -> Result<(), PortError> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| self.port_error("ping")(DatabaseError::from(e)))
    }

    fn port_error(&self, operation: &'static str) -> impl Fn(DatabaseError) -> PortError + '_ {
        move |error| {
            debug!(operation, error = %error, "Database operation failed");
            error.into_port_error(operation, self.busy_timeout)
        }
    }
}

// Mark as a domain port
impl DomainPort for SqliteShopStore {}

#[async_trait]
impl CustomerStore for SqliteShopStore {
    #[instrument(skip(self, customer), fields(customer_id = %customer.id))]
    async fn insert_customer(&self, customer: &Customer) -> Result<(), PortError> {
        self.customers
            .insert_customer(customer)
            .await
            .map_err(self.port_error("insert_customer"))
    }

    async fn update_customer(&self, customer: &Customer) -> Result<(), PortError> {
        self.customers
            .update_customer(customer)
            .await
            .map_err(self.port_error("update_customer"))
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, PortError> {
        self.customers
            .get_customer(id)
            .await
            .map_err(self.port_error("get_customer"))
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, PortError> {
        self.customers
            .list_customers()
            .await
            .map_err(self.port_error("list_customers"))
    }

    async fn insert_boat(&self, boat: &Boat) -> Result<(), PortError> {
        self.customers
            .insert_boat(boat)
            .await
            .map_err(self.port_error("insert_boat"))
    }

    async fn get_boat(&self, id: BoatId) -> Result<Option<Boat>, PortError> {
        self.customers.get_boat(id).await.map_err(self.port_error("get_boat"))
    }

    async fn list_boats(&self, customer_id: CustomerId) -> Result<Vec<Boat>, PortError> {
        self.customers
            .list_boats(customer_id)
            .await
            .map_err(self.port_error("list_boats"))
    }

    async fn insert_engine(&self, engine: &Engine) -> Result<(), PortError> {
        self.customers
            .insert_engine(engine)
            .await
            .map_err(self.port_error("insert_engine"))
    }

    async fn get_engine(&self, id: EngineId) -> Result<Option<Engine>, PortError> {
        self.customers.get_engine(id).await.map_err(self.port_error("get_engine"))
    }

    async fn list_engines(&self, boat_id: BoatId) -> Result<Vec<Engine>, PortError> {
        self.customers
            .list_engines(boat_id)
            .await
            .map_err(self.port_error("list_engines"))
    }
}

#[async_trait]
impl InventoryStore for SqliteShopStore {
    async fn insert_part(&self, part: &Part) -> Result<(), PortError> {
        self.inventory.insert_part(part).await.map_err(self.port_error("insert_part"))
    }

    async fn update_part(&self, part: &Part) -> Result<(), PortError> {
        self.inventory.update_part(part).await.map_err(self.port_error("update_part"))
    }

    async fn get_part(&self, id: PartId) -> Result<Option<Part>, PortError> {
        self.inventory.get_part(id).await.map_err(self.port_error("get_part"))
    }

    async fn list_parts(&self) -> Result<Vec<Part>, PortError> {
        self.inventory.list_parts().await.map_err(self.port_error("list_parts"))
    }

    async fn insert_mechanic(&self, mechanic: &Mechanic) -> Result<(), PortError> {
        self.inventory
            .insert_mechanic(mechanic)
            .await
            .map_err(self.port_error("insert_mechanic"))
    }

    async fn get_mechanic(&self, id: MechanicId) -> Result<Option<Mechanic>, PortError> {
        self.inventory.get_mechanic(id).await.map_err(self.port_error("get_mechanic"))
    }

    async fn insert_new_engine(&self, engine: &NewEngine) -> Result<(), PortError> {
        self.inventory
            .insert_new_engine(engine)
            .await
            .map_err(self.port_error("insert_new_engine"))
    }

    #[instrument(skip(self, engine), fields(new_engine_id = %engine.id))]
    async fn update_new_engine(&self, engine: &NewEngine) -> Result<(), PortError> {
        self.inventory
            .update_new_engine(engine)
            .await
            .map_err(self.port_error("update_new_engine"))
    }

    async fn get_new_engine(&self, id: NewEngineId) -> Result<Option<NewEngine>, PortError> {
        self.inventory
            .get_new_engine(id)
            .await
            .map_err(self.port_error("get_new_engine"))
    }

    async fn list_new_engines(
        &self,
        status: Option<NewEngineStatus>,
    ) -> Result<Vec<NewEngine>, PortError> {
        self.inventory
            .list_new_engines(status)
            .await
            .map_err(self.port_error("list_new_engines"))
    }
}

#[async_trait]
impl TicketStore for SqliteShopStore {
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), PortError> {
        self.tickets.insert_ticket(ticket).await.map_err(self.port_error("insert_ticket"))
    }

    #[instrument(skip(self, ticket), fields(ticket_id = %ticket.id))]
    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), PortError> {
        self.tickets.update_ticket(ticket).await.map_err(self.port_error("update_ticket"))
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, PortError> {
        self.tickets.get_ticket(id).await.map_err(self.port_error("get_ticket"))
    }

    async fn list_tickets(&self, status: Option<TicketStatus>) -> Result<Vec<Ticket>, PortError> {
        self.tickets.list_tickets(status).await.map_err(self.port_error("list_tickets"))
    }

    async fn insert_ticket_part(&self, line: &TicketPart) -> Result<(), PortError> {
        self.tickets
            .insert_ticket_part(line)
            .await
            .map_err(self.port_error("insert_ticket_part"))
    }

    async fn delete_ticket_part(
        &self,
        ticket_id: TicketId,
        id: TicketPartId,
    ) -> Result<(), PortError> {
        self.tickets
            .delete_ticket_part(ticket_id, id)
            .await
            .map_err(self.port_error("delete_ticket_part"))
    }

    async fn list_ticket_parts(&self, ticket_id: TicketId) -> Result<Vec<TicketPart>, PortError> {
        self.tickets
            .list_ticket_parts(ticket_id)
            .await
            .map_err(self.port_error("list_ticket_parts"))
    }

    async fn insert_assignment(&self, assignment: &TicketAssignment) -> Result<(), PortError> {
        self.tickets
            .insert_assignment(assignment)
            .await
            .map_err(self.port_error("insert_assignment"))
    }

    async fn delete_assignment(
        &self,
        ticket_id: TicketId,
        id: AssignmentId,
    ) -> Result<(), PortError> {
        self.tickets
            .delete_assignment(ticket_id, id)
            .await
            .map_err(self.port_error("delete_assignment"))
    }

    async fn list_assignments(
        &self,
        ticket_id: TicketId,
    ) -> Result<Vec<TicketAssignment>, PortError> {
        self.tickets
            .list_assignments(ticket_id)
            .await
            .map_err(self.port_error("list_assignments"))
    }

    async fn insert_deposit(&self, deposit: &Deposit) -> Result<(), PortError> {
        self.tickets
            .insert_deposit(deposit)
            .await
            .map_err(self.port_error("insert_deposit"))
    }

    async fn list_deposits(&self, ticket_id: TicketId) -> Result<Vec<Deposit>, PortError> {
        self.tickets
            .list_deposits(ticket_id)
            .await
            .map_err(self.port_error("list_deposits"))
    }
}

#[async_trait]
impl EstimateStore for SqliteShopStore {
    async fn insert_estimate(&self, estimate: &Estimate) -> Result<(), PortError> {
        self.estimates
            .insert_estimate(estimate)
            .await
            .map_err(self.port_error("insert_estimate"))
    }

    async fn update_estimate(&self, estimate: &Estimate) -> Result<(), PortError> {
        self.estimates
            .update_estimate(estimate)
            .await
            .map_err(self.port_error("update_estimate"))
    }

    async fn get_estimate(&self, id: EstimateId) -> Result<Option<Estimate>, PortError> {
        self.estimates.get_estimate(id).await.map_err(self.port_error("get_estimate"))
    }

    async fn list_estimates(&self) -> Result<Vec<Estimate>, PortError> {
        self.estimates.list_estimates().await.map_err(self.port_error("list_estimates"))
    }

    async fn insert_estimate_line(&self, line: &EstimateLineItem) -> Result<(), PortError> {
        self.estimates
            .insert_line(line)
            .await
            .map_err(self.port_error("insert_estimate_line"))
    }

    async fn delete_estimate_line(
        &self,
        estimate_id: EstimateId,
        id: EstimateLineId,
    ) -> Result<(), PortError> {
        self.estimates
            .delete_line(estimate_id, id)
            .await
            .map_err(self.port_error("delete_estimate_line"))
    }

    async fn list_estimate_lines(
        &self,
        estimate_id: EstimateId,
    ) -> Result<Vec<EstimateLineItem>, PortError> {
        self.estimates
            .list_lines(estimate_id)
            .await
            .map_err(self.port_error("list_estimate_lines"))
    }
}
