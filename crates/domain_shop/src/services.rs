//! Shop domain services
//!
//! [`ShopService`] is the only place that writes a ticket's or estimate's
//! stored totals. Every operation that changes a document's line set reads
//! the full current set back, runs the billing engine over it, and persists
//! the result.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

use core_kernel::{
    AssignmentId, BoatId, CustomerId, EstimateId, EstimateLineId, MechanicId, Money,
    NewEngineId, PartId, TicketId, TicketPartId,
};
use domain_billing::{
    compute_estimate_totals, compute_ticket_totals, BalanceSummary, BillableLine, BillingError,
    TaxProfile, Totals,
};

use crate::boat::{Boat, Engine};
use crate::customer::Customer;
use crate::deposit::Deposit;
use crate::error::ShopError;
use crate::estimate::{Estimate, EstimateItemType, EstimateLineItem};
use crate::inventory::{EngineSale, Mechanic, NewEngine, NewEngineStatus, Part};
use crate::ports::ShopStore;
use crate::ticket::{Ticket, TicketAssignment, TicketPart, TicketStatus};
use crate::validation::{validate_serial_number, CustomerValidator, InventoryValidator};

/// Labor to log against a ticket
#[derive(Debug, Clone)]
pub struct LaborEntry {
    pub mechanic_id: MechanicId,
    pub hours: Decimal,
    /// Hourly rate; the mechanic's own rate when absent
    pub labor_rate: Option<Money>,
    pub work_description: Option<String>,
}

/// A ticket with everything attached to it
#[derive(Debug, Clone)]
pub struct TicketDetails {
    pub ticket: Ticket,
    pub customer: Customer,
    pub boat: Option<Boat>,
    pub parts: Vec<(TicketPart, Part)>,
    pub labor: Vec<TicketAssignment>,
    pub new_engine: Option<NewEngine>,
    pub deposits: Vec<Deposit>,
    pub balance: BalanceSummary,
}

/// An estimate with its line items
#[derive(Debug, Clone)]
pub struct EstimateDetails {
    pub estimate: Estimate,
    pub lines: Vec<EstimateLineItem>,
}

/// Orchestrates shop records over a [`ShopStore`]
pub struct ShopService<S: ShopStore> {
    store: Arc<S>,
}

impl<S: ShopStore> Clone for ShopService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ShopStore> ShopService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // ========================================================================
    // Customers, boats, engines
    // ========================================================================

    /// Validates and stores a new customer
    ///
    /// The phone number is stored in its normalised form.
    pub async fn create_customer(&self, mut customer: Customer) -> Result<Customer, ShopError> {
        let warnings = CustomerValidator::validate(&mut customer).into_result()?;
        for warning in &warnings {
            warn!(customer_id = %customer.id, "{}", warning);
        }
        self.store.insert_customer(&customer).await?;
        info!(customer_id = %customer.id, name = %customer.name, "Customer created");
        Ok(customer)
    }

    /// Replaces a customer's record; later totals use the new tax flags
    pub async fn update_customer(&self, mut customer: Customer) -> Result<Customer, ShopError> {
        let warnings = CustomerValidator::validate(&mut customer).into_result()?;
        for warning in &warnings {
            warn!(customer_id = %customer.id, "{}", warning);
        }
        self.store.update_customer(&customer).await?;
        Ok(customer)
    }

    pub async fn customer(&self, id: CustomerId) -> Result<Customer, ShopError> {
        self.store
            .get_customer(id)
            .await?
            .ok_or_else(|| ShopError::not_found("Customer", id))
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, ShopError> {
        Ok(self.store.list_customers().await?)
    }

    pub async fn create_boat(&self, boat: Boat) -> Result<Boat, ShopError> {
        self.customer(boat.customer_id).await?;
        self.store.insert_boat(&boat).await?;
        Ok(boat)
    }

    pub async fn boat(&self, id: BoatId) -> Result<Boat, ShopError> {
        self.store
            .get_boat(id)
            .await?
            .ok_or_else(|| ShopError::not_found("Boat", id))
    }

    pub async fn create_engine(&self, mut engine: Engine) -> Result<Engine, ShopError> {
        validate_serial_number(&engine.serial_number).map_err(ShopError::Validation)?;
        engine.serial_number = engine.serial_number.trim().to_string();
        self.boat(engine.boat_id).await?;
        self.store.insert_engine(&engine).await?;
        Ok(engine)
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    pub async fn create_part(&self, part: Part) -> Result<Part, ShopError> {
        InventoryValidator::validate_part(&part).into_result()?;
        self.store.insert_part(&part).await?;
        Ok(part)
    }

    pub async fn update_part(&self, part: Part) -> Result<Part, ShopError> {
        InventoryValidator::validate_part(&part).into_result()?;
        self.store.update_part(&part).await?;
        Ok(part)
    }

    pub async fn part(&self, id: PartId) -> Result<Part, ShopError> {
        self.store
            .get_part(id)
            .await?
            .ok_or_else(|| ShopError::not_found("Part", id))
    }

    pub async fn create_mechanic(&self, mechanic: Mechanic) -> Result<Mechanic, ShopError> {
        InventoryValidator::validate_mechanic(&mechanic).into_result()?;
        self.store.insert_mechanic(&mechanic).await?;
        Ok(mechanic)
    }

    pub async fn create_new_engine(&self, mut engine: NewEngine) -> Result<NewEngine, ShopError> {
        validate_serial_number(&engine.serial_number).map_err(ShopError::Validation)?;
        engine.serial_number = engine.serial_number.trim().to_string();
        self.store.insert_new_engine(&engine).await?;
        Ok(engine)
    }

    pub async fn new_engine(&self, id: NewEngineId) -> Result<NewEngine, ShopError> {
        self.store
            .get_new_engine(id)
            .await?
            .ok_or_else(|| ShopError::not_found("NewEngine", id))
    }

    pub async fn list_new_engines(
        &self,
        status: Option<NewEngineStatus>,
    ) -> Result<Vec<NewEngine>, ShopError> {
        Ok(self.store.list_new_engines(status).await?)
    }

    /// Sells an in-stock engine to a customer
    pub async fn sell_new_engine(
        &self,
        id: NewEngineId,
        sale: EngineSale,
    ) -> Result<NewEngine, ShopError> {
        if sale.sale_price.is_negative() {
            return Err(ShopError::validation("sale price cannot be negative"));
        }
        self.customer(sale.customer_id).await?;
        let mut engine = self.new_engine(id).await?;
        let price = sale.sale_price;
        engine.sell(sale)?;
        self.store.update_new_engine(&engine).await?;
        info!(
            new_engine_id = %engine.id,
            serial = %engine.serial_number,
            sale_price = %price,
            "New engine sold"
        );
        Ok(engine)
    }

    pub async fn mark_engine_registered(
        &self,
        id: NewEngineId,
        on: NaiveDate,
    ) -> Result<NewEngine, ShopError> {
        let mut engine = self.new_engine(id).await?;
        engine.mark_registered(on);
        self.store.update_new_engine(&engine).await?;
        Ok(engine)
    }

    /// Sold engines due for manufacturer registration, oldest install first
    pub async fn engines_needing_registration(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<NewEngine>, ShopError> {
        let mut due: Vec<_> = self
            .store
            .list_new_engines(Some(NewEngineStatus::Sold))
            .await?
            .into_iter()
            .filter(|e| e.needs_registration(today))
            .collect();
        due.sort_by_key(|e| e.date_installed);
        Ok(due)
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// Opens a ticket for one of the customer's boats
    pub async fn open_ticket(&self, ticket: Ticket) -> Result<Ticket, ShopError> {
        self.customer(ticket.customer_id).await?;
        let boat = self.boat(ticket.boat_id).await?;
        if boat.customer_id != ticket.customer_id {
            return Err(ShopError::validation("boat does not belong to the ticket's customer"));
        }
        self.store.insert_ticket(&ticket).await?;
        info!(ticket_id = %ticket.id, customer_id = %ticket.customer_id, "Ticket opened");
        Ok(ticket)
    }

    pub async fn ticket(&self, id: TicketId) -> Result<Ticket, ShopError> {
        self.store
            .get_ticket(id)
            .await?
            .ok_or_else(|| ShopError::not_found("Ticket", id))
    }

    pub async fn list_tickets(&self, status: Option<TicketStatus>) -> Result<Vec<Ticket>, ShopError> {
        Ok(self.store.list_tickets(status).await?)
    }

    /// Adds a part line and refreshes the ticket totals
    pub async fn add_ticket_part(
        &self,
        ticket_id: TicketId,
        part_id: PartId,
        quantity: u32,
        price_override: Option<Money>,
    ) -> Result<TicketPart, ShopError> {
        if quantity == 0 {
            return Err(ShopError::validation("quantity must be greater than zero"));
        }
        if price_override.is_some_and(|p| p.is_negative()) {
            return Err(ShopError::validation("price override cannot be negative"));
        }
        self.ticket(ticket_id).await?;
        self.part(part_id).await?;

        let mut line = TicketPart::new(ticket_id, part_id, quantity);
        line.price_override = price_override;
        self.store.insert_ticket_part(&line).await?;
        self.recalculate_ticket_totals(ticket_id).await?;
        Ok(line)
    }

    pub async fn remove_ticket_part(
        &self,
        ticket_id: TicketId,
        line_id: TicketPartId,
    ) -> Result<Totals, ShopError> {
        self.store.delete_ticket_part(ticket_id, line_id).await?;
        self.recalculate_ticket_totals(ticket_id).await
    }

    /// Logs labor and refreshes the ticket totals
    pub async fn add_ticket_labor(
        &self,
        ticket_id: TicketId,
        entry: LaborEntry,
    ) -> Result<TicketAssignment, ShopError> {
        if entry.hours <= Decimal::ZERO {
            return Err(ShopError::validation("hours worked must be greater than zero"));
        }
        if entry.labor_rate.is_some_and(|r| r.is_negative()) {
            return Err(ShopError::validation("labor rate cannot be negative"));
        }
        self.ticket(ticket_id).await?;
        let mechanic = self
            .store
            .get_mechanic(entry.mechanic_id)
            .await?
            .ok_or_else(|| ShopError::not_found("Mechanic", entry.mechanic_id))?;

        let rate = entry
            .labor_rate
            .or(mechanic.hourly_rate)
            .unwrap_or_else(Money::zero);
        let mut assignment = TicketAssignment::new(ticket_id, mechanic.id, entry.hours, rate);
        assignment.work_description = entry.work_description;
        self.store.insert_assignment(&assignment).await?;
        self.recalculate_ticket_totals(ticket_id).await?;
        Ok(assignment)
    }

    pub async fn remove_ticket_labor(
        &self,
        ticket_id: TicketId,
        assignment_id: AssignmentId,
    ) -> Result<Totals, ShopError> {
        self.store.delete_assignment(ticket_id, assignment_id).await?;
        self.recalculate_ticket_totals(ticket_id).await
    }

    /// Bills a sold new engine on this ticket
    pub async fn attach_new_engine(
        &self,
        ticket_id: TicketId,
        new_engine_id: NewEngineId,
    ) -> Result<Totals, ShopError> {
        let mut ticket = self.ticket(ticket_id).await?;
        let engine = self.new_engine(new_engine_id).await?;
        if engine.status != NewEngineStatus::Sold {
            return Err(ShopError::validation(format!(
                "new engine {} has not been sold",
                engine.serial_number
            )));
        }
        ticket.new_engine_id = Some(new_engine_id);
        self.store.update_ticket(&ticket).await?;
        self.recalculate_ticket_totals(ticket_id).await
    }

    pub async fn detach_new_engine(&self, ticket_id: TicketId) -> Result<Totals, ShopError> {
        let mut ticket = self.ticket(ticket_id).await?;
        ticket.new_engine_id = None;
        self.store.update_ticket(&ticket).await?;
        self.recalculate_ticket_totals(ticket_id).await
    }

    /// Recomputes the ticket's totals from its current lines and stores them
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Billing` if the ticket's customer no longer exists
    /// or a line amount is negative.
    pub async fn recalculate_ticket_totals(&self, ticket_id: TicketId) -> Result<Totals, ShopError> {
        let mut ticket = self.ticket(ticket_id).await?;
        let profile = self.tax_profile_for(ticket.customer_id).await?;
        let lines = self.ticket_lines(&ticket).await?;

        let totals = compute_ticket_totals(&profile, &lines)?;
        ticket.apply_totals(&totals);
        self.store.update_ticket(&ticket).await?;
        debug!(
            ticket_id = %ticket_id,
            lines = lines.len(),
            total = %totals.total,
            "Ticket totals stored"
        );
        Ok(totals)
    }

    /// Moves a ticket through its workflow
    pub async fn change_ticket_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
        today: NaiveDate,
    ) -> Result<Ticket, ShopError> {
        let mut ticket = self.ticket(ticket_id).await?;
        let from = ticket.status;
        ticket.transition_to(status, today)?;
        self.store.update_ticket(&ticket).await?;
        info!(ticket_id = %ticket_id, from = %from, to = %status, "Ticket status changed");
        Ok(ticket)
    }

    /// Reopens a closed ticket with the given status
    pub async fn reopen_ticket(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, ShopError> {
        let mut ticket = self.ticket(ticket_id).await?;
        ticket.reopen(status)?;
        self.store.update_ticket(&ticket).await?;
        info!(ticket_id = %ticket_id, to = %status, "Ticket reopened");
        Ok(ticket)
    }

    /// Records a payment and returns the ticket's new position
    ///
    /// Overpayment is accepted and logged; the balance goes negative.
    pub async fn record_deposit(&self, deposit: Deposit) -> Result<BalanceSummary, ShopError> {
        if !deposit.amount.is_positive() {
            return Err(ShopError::validation("deposit amount must be greater than zero"));
        }
        self.ticket(deposit.ticket_id).await?;
        self.store.insert_deposit(&deposit).await?;

        let balance = self.balance_summary(deposit.ticket_id).await?;
        info!(
            ticket_id = %deposit.ticket_id,
            amount = %deposit.amount,
            balance_due = %balance.balance_due,
            "Deposit recorded"
        );
        if balance.is_overpaid() {
            warn!(
                ticket_id = %deposit.ticket_id,
                total = %balance.total,
                amount_paid = %balance.amount_paid,
                "Deposits exceed ticket total"
            );
        }
        Ok(balance)
    }

    pub async fn deposits(&self, ticket_id: TicketId) -> Result<Vec<Deposit>, ShopError> {
        Ok(self.store.list_deposits(ticket_id).await?)
    }

    /// Total, amount paid, and balance due from the stored ticket total
    pub async fn balance_summary(&self, ticket_id: TicketId) -> Result<BalanceSummary, ShopError> {
        let ticket = self.ticket(ticket_id).await?;
        let deposits = self.store.list_deposits(ticket_id).await?;
        Ok(BalanceSummary::new(
            ticket.total,
            deposits.iter().map(|d| d.amount),
        ))
    }

    pub async fn balance_due(&self, ticket_id: TicketId) -> Result<Money, ShopError> {
        Ok(self.balance_summary(ticket_id).await?.balance_due)
    }

    pub async fn ticket_details(&self, ticket_id: TicketId) -> Result<TicketDetails, ShopError> {
        let ticket = self.ticket(ticket_id).await?;
        let customer = self.customer(ticket.customer_id).await?;
        let boat = self.store.get_boat(ticket.boat_id).await?;

        let mut parts = Vec::new();
        for line in self.store.list_ticket_parts(ticket_id).await? {
            let part = self.part(line.part_id).await?;
            parts.push((line, part));
        }
        let labor = self.store.list_assignments(ticket_id).await?;
        let new_engine = match ticket.new_engine_id {
            Some(id) => self.store.get_new_engine(id).await?,
            None => None,
        };
        let deposits = self.store.list_deposits(ticket_id).await?;
        let balance = BalanceSummary::new(ticket.total, deposits.iter().map(|d| d.amount));

        Ok(TicketDetails {
            ticket,
            customer,
            boat,
            parts,
            labor,
            new_engine,
            deposits,
            balance,
        })
    }

    // ========================================================================
    // Estimates
    // ========================================================================

    pub async fn create_estimate(&self, estimate: Estimate) -> Result<Estimate, ShopError> {
        self.customer(estimate.customer_id).await?;
        if let Some(boat_id) = estimate.boat_id {
            self.boat(boat_id).await?;
        }
        self.store.insert_estimate(&estimate).await?;
        Ok(estimate)
    }

    pub async fn estimate(&self, id: EstimateId) -> Result<Estimate, ShopError> {
        self.store
            .get_estimate(id)
            .await?
            .ok_or_else(|| ShopError::not_found("Estimate", id))
    }

    pub async fn list_estimates(&self) -> Result<Vec<Estimate>, ShopError> {
        Ok(self.store.list_estimates().await?)
    }

    pub async fn estimate_details(&self, id: EstimateId) -> Result<EstimateDetails, ShopError> {
        let estimate = self.estimate(id).await?;
        let lines = self.store.list_estimate_lines(id).await?;
        Ok(EstimateDetails { estimate, lines })
    }

    /// Adds a line to an estimate and refreshes its totals
    pub async fn add_estimate_line(
        &self,
        estimate_id: EstimateId,
        item_type: EstimateItemType,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Money,
        taxable: bool,
    ) -> Result<EstimateLineItem, ShopError> {
        self.estimate(estimate_id).await?;
        let line = EstimateLineItem::new(estimate_id, item_type, description, quantity, unit_price)?
            .with_taxable(taxable);
        self.store.insert_estimate_line(&line).await?;
        self.recalculate_estimate_totals(estimate_id).await?;
        Ok(line)
    }

    pub async fn remove_estimate_line(
        &self,
        estimate_id: EstimateId,
        line_id: EstimateLineId,
    ) -> Result<Totals, ShopError> {
        self.store.delete_estimate_line(estimate_id, line_id).await?;
        self.recalculate_estimate_totals(estimate_id).await
    }

    pub async fn recalculate_estimate_totals(
        &self,
        estimate_id: EstimateId,
    ) -> Result<Totals, ShopError> {
        let mut estimate = self.estimate(estimate_id).await?;
        let profile = self.tax_profile_for(estimate.customer_id).await?;
        let lines: Vec<BillableLine> = self
            .store
            .list_estimate_lines(estimate_id)
            .await?
            .iter()
            .map(EstimateLineItem::to_billable)
            .collect();

        let totals = compute_estimate_totals(&profile, &lines)?;
        estimate.apply_totals(&totals);
        self.store.update_estimate(&estimate).await?;
        debug!(estimate_id = %estimate_id, total = %totals.total, "Estimate totals stored");
        Ok(totals)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn tax_profile_for(&self, customer_id: CustomerId) -> Result<TaxProfile, ShopError> {
        let customer = self
            .store
            .get_customer(customer_id)
            .await?
            .ok_or_else(BillingError::missing_customer)?;
        if customer.has_unsupported_exemption_claim() {
            warn!(
                customer_id = %customer.id,
                "Tax exemption claimed without a certificate; charging tax"
            );
        }
        Ok(customer.tax_profile())
    }

    async fn ticket_lines(&self, ticket: &Ticket) -> Result<Vec<BillableLine>, ShopError> {
        let mut lines = Vec::new();
        for line in self.store.list_ticket_parts(ticket.id).await? {
            let part = self.part(line.part_id).await?;
            lines.push(line.to_billable(&part));
        }
        lines.extend(
            self.store
                .list_assignments(ticket.id)
                .await?
                .iter()
                .map(TicketAssignment::to_billable),
        );
        if let Some(id) = ticket.new_engine_id {
            let engine = self.new_engine(id).await?;
            if let Some(price) = engine.billable_sale_price() {
                lines.push(BillableLine::new_engine_sale(price));
            }
        }
        Ok(lines)
    }
}
