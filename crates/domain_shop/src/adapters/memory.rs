//! In-memory implementation of the shop ports

use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::RwLock;

use core_kernel::{
    AssignmentId, BoatId, CustomerId, DomainPort, EngineId, EstimateId, EstimateLineId,
    MechanicId, NewEngineId, PartId, PortError, TicketId, TicketPartId,
};

use crate::boat::{Boat, Engine};
use crate::customer::Customer;
use crate::deposit::Deposit;
use crate::estimate::{Estimate, EstimateLineItem};
use crate::inventory::{Mechanic, NewEngine, NewEngineStatus, Part};
use crate::ports::{CustomerStore, EstimateStore, InventoryStore, TicketStore};
use crate::ticket::{Ticket, TicketAssignment, TicketPart, TicketStatus};

/// Shop store held entirely in memory
///
/// Top-level records are keyed by id; line collections keep insertion order.
#[derive(Debug, Default)]
pub struct InMemoryShopStore {
    customers: RwLock<HashMap<CustomerId, Customer>>,
    boats: RwLock<HashMap<BoatId, Boat>>,
    engines: RwLock<HashMap<EngineId, Engine>>,
    parts: RwLock<HashMap<PartId, Part>>,
    mechanics: RwLock<HashMap<MechanicId, Mechanic>>,
    new_engines: RwLock<HashMap<NewEngineId, NewEngine>>,
    tickets: RwLock<HashMap<TicketId, Ticket>>,
    ticket_parts: RwLock<Vec<TicketPart>>,
    assignments: RwLock<Vec<TicketAssignment>>,
    deposits: RwLock<Vec<Deposit>>,
    estimates: RwLock<HashMap<EstimateId, Estimate>>,
    estimate_lines: RwLock<Vec<EstimateLineItem>>,
}

impl InMemoryShopStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for InMemoryShopStore {}

async fn insert_new<K, V>(
    map: &RwLock<HashMap<K, V>>,
    key: K,
    value: &V,
    entity: &str,
) -> Result<(), PortError>
where
    K: Eq + Hash + std::fmt::Display,
    V: Clone,
{
    let mut map = map.write().await;
    if map.contains_key(&key) {
        return Err(PortError::conflict(format!("{} {} already exists", entity, key)));
    }
    map.insert(key, value.clone());
    Ok(())
}

async fn replace<K, V>(
    map: &RwLock<HashMap<K, V>>,
    key: K,
    value: &V,
    entity: &str,
) -> Result<(), PortError>
where
    K: Eq + Hash + std::fmt::Display,
    V: Clone,
{
    let mut map = map.write().await;
    match map.get_mut(&key) {
        Some(slot) => {
            *slot = value.clone();
            Ok(())
        }
        None => Err(PortError::not_found(entity, key)),
    }
}

async fn remove_line<T, F>(
    lines: &RwLock<Vec<T>>,
    matches: F,
    entity: &str,
    id: impl std::fmt::Display,
) -> Result<(), PortError>
where
    F: Fn(&T) -> bool,
{
    let mut lines = lines.write().await;
    let before = lines.len();
    lines.retain(|line| !matches(line));
    if lines.len() == before {
        return Err(PortError::not_found(entity, id));
    }
    Ok(())
}

#[async_trait]
impl CustomerStore for InMemoryShopStore {
    async fn insert_customer(&self, customer: &Customer) -> Result<(), PortError> {
        insert_new(&self.customers, customer.id, customer, "Customer").await
    }

    async fn update_customer(&self, customer: &Customer) -> Result<(), PortError> {
        replace(&self.customers, customer.id, customer, "Customer").await
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, PortError> {
        Ok(self.customers.read().await.get(&id).cloned())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, PortError> {
        let mut customers: Vec<_> = self.customers.read().await.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn insert_boat(&self, boat: &Boat) -> Result<(), PortError> {
        insert_new(&self.boats, boat.id, boat, "Boat").await
    }

    async fn get_boat(&self, id: BoatId) -> Result<Option<Boat>, PortError> {
        Ok(self.boats.read().await.get(&id).cloned())
    }

    async fn list_boats(&self, customer_id: CustomerId) -> Result<Vec<Boat>, PortError> {
        Ok(self
            .boats
            .read()
            .await
            .values()
            .filter(|b| b.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn insert_engine(&self, engine: &Engine) -> Result<(), PortError> {
        insert_new(&self.engines, engine.id, engine, "Engine").await
    }

    async fn get_engine(&self, id: EngineId) -> Result<Option<Engine>, PortError> {
        Ok(self.engines.read().await.get(&id).cloned())
    }

    async fn list_engines(&self, boat_id: BoatId) -> Result<Vec<Engine>, PortError> {
        Ok(self
            .engines
            .read()
            .await
            .values()
            .filter(|e| e.boat_id == boat_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InventoryStore for InMemoryShopStore {
    async fn insert_part(&self, part: &Part) -> Result<(), PortError> {
        insert_new(&self.parts, part.id, part, "Part").await
    }

    async fn update_part(&self, part: &Part) -> Result<(), PortError> {
        replace(&self.parts, part.id, part, "Part").await
    }

    async fn get_part(&self, id: PartId) -> Result<Option<Part>, PortError> {
        Ok(self.parts.read().await.get(&id).cloned())
    }

    async fn list_parts(&self) -> Result<Vec<Part>, PortError> {
        let mut parts: Vec<_> = self.parts.read().await.values().cloned().collect();
        parts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parts)
    }

    async fn insert_mechanic(&self, mechanic: &Mechanic) -> Result<(), PortError> {
        insert_new(&self.mechanics, mechanic.id, mechanic, "Mechanic").await
    }

    async fn get_mechanic(&self, id: MechanicId) -> Result<Option<Mechanic>, PortError> {
        Ok(self.mechanics.read().await.get(&id).cloned())
    }

    async fn insert_new_engine(&self, engine: &NewEngine) -> Result<(), PortError> {
        insert_new(&self.new_engines, engine.id, engine, "NewEngine").await
    }

    async fn update_new_engine(&self, engine: &NewEngine) -> Result<(), PortError> {
        replace(&self.new_engines, engine.id, engine, "NewEngine").await
    }

    async fn get_new_engine(&self, id: NewEngineId) -> Result<Option<NewEngine>, PortError> {
        Ok(self.new_engines.read().await.get(&id).cloned())
    }

    async fn list_new_engines(
        &self,
        status: Option<NewEngineStatus>,
    ) -> Result<Vec<NewEngine>, PortError> {
        let mut engines: Vec<_> = self
            .new_engines
            .read()
            .await
            .values()
            .filter(|e| status.map_or(true, |s| e.status == s))
            .cloned()
            .collect();
        engines.sort_by(|a, b| a.hp.cmp(&b.hp).then_with(|| a.serial_number.cmp(&b.serial_number)));
        Ok(engines)
    }
}

#[async_trait]
impl TicketStore for InMemoryShopStore {
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), PortError> {
        insert_new(&self.tickets, ticket.id, ticket, "Ticket").await
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), PortError> {
        replace(&self.tickets, ticket.id, ticket, "Ticket").await
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, PortError> {
        Ok(self.tickets.read().await.get(&id).cloned())
    }

    async fn list_tickets(&self, status: Option<TicketStatus>) -> Result<Vec<Ticket>, PortError> {
        let mut tickets: Vec<_> = self
            .tickets
            .read()
            .await
            .values()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| {
            b.date_opened
                .cmp(&a.date_opened)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(tickets)
    }

    async fn insert_ticket_part(&self, line: &TicketPart) -> Result<(), PortError> {
        self.ticket_parts.write().await.push(line.clone());
        Ok(())
    }

    async fn delete_ticket_part(
        &self,
        ticket_id: TicketId,
        id: TicketPartId,
    ) -> Result<(), PortError> {
        remove_line(
            &self.ticket_parts,
            |l| l.id == id && l.ticket_id == ticket_id,
            "TicketPart",
            id,
        )
        .await
    }

    async fn list_ticket_parts(&self, ticket_id: TicketId) -> Result<Vec<TicketPart>, PortError> {
        Ok(self
            .ticket_parts
            .read()
            .await
            .iter()
            .filter(|l| l.ticket_id == ticket_id)
            .cloned()
            .collect())
    }

    async fn insert_assignment(&self, assignment: &TicketAssignment) -> Result<(), PortError> {
        self.assignments.write().await.push(assignment.clone());
        Ok(())
    }

    async fn delete_assignment(
        &self,
        ticket_id: TicketId,
        id: AssignmentId,
    ) -> Result<(), PortError> {
        remove_line(
            &self.assignments,
            |a| a.id == id && a.ticket_id == ticket_id,
            "TicketAssignment",
            id,
        )
        .await
    }

    async fn list_assignments(
        &self,
        ticket_id: TicketId,
    ) -> Result<Vec<TicketAssignment>, PortError> {
        Ok(self
            .assignments
            .read()
            .await
            .iter()
            .filter(|a| a.ticket_id == ticket_id)
            .cloned()
            .collect())
    }

    async fn insert_deposit(&self, deposit: &Deposit) -> Result<(), PortError> {
        self.deposits.write().await.push(deposit.clone());
        Ok(())
    }

    async fn list_deposits(&self, ticket_id: TicketId) -> Result<Vec<Deposit>, PortError> {
        let mut deposits: Vec<_> = self
            .deposits
            .read()
            .await
            .iter()
            .filter(|d| d.ticket_id == ticket_id)
            .cloned()
            .collect();
        // stable sort keeps insertion order within a day
        deposits.sort_by_key(|d| d.payment_date);
        Ok(deposits)
    }
}

#[async_trait]
impl EstimateStore for InMemoryShopStore {
    async fn insert_estimate(&self, estimate: &Estimate) -> Result<(), PortError> {
        insert_new(&self.estimates, estimate.id, estimate, "Estimate").await
    }

    async fn update_estimate(&self, estimate: &Estimate) -> Result<(), PortError> {
        replace(&self.estimates, estimate.id, estimate, "Estimate").await
    }

    async fn get_estimate(&self, id: EstimateId) -> Result<Option<Estimate>, PortError> {
        Ok(self.estimates.read().await.get(&id).cloned())
    }

    async fn list_estimates(&self) -> Result<Vec<Estimate>, PortError> {
        let mut estimates: Vec<_> = self.estimates.read().await.values().cloned().collect();
        estimates.sort_by(|a, b| {
            b.date_created
                .cmp(&a.date_created)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(estimates)
    }

    async fn insert_estimate_line(&self, line: &EstimateLineItem) -> Result<(), PortError> {
        self.estimate_lines.write().await.push(line.clone());
        Ok(())
    }

    async fn delete_estimate_line(
        &self,
        estimate_id: EstimateId,
        id: EstimateLineId,
    ) -> Result<(), PortError> {
        remove_line(
            &self.estimate_lines,
            |l| l.id == id && l.estimate_id == estimate_id,
            "EstimateLineItem",
            id,
        )
        .await
    }

    async fn list_estimate_lines(
        &self,
        estimate_id: EstimateId,
    ) -> Result<Vec<EstimateLineItem>, PortError> {
        Ok(self
            .estimate_lines
            .read()
            .await
            .iter()
            .filter(|l| l.estimate_id == estimate_id)
            .cloned()
            .collect())
    }
}
