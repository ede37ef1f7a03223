//! Ticket, ticket line, and deposit tables

use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use core_kernel::{
    AssignmentId, BoatId, CustomerId, DepositId, EngineId, MechanicId, NewEngineId, PartId,
    TicketId, TicketPartId,
};
use domain_shop::{Deposit, Ticket, TicketAssignment, TicketPart, TicketStatus};

use super::{
    ensure_affected, money_text, opt_money_text, parse_decimal, parse_enum, parse_money,
    parse_opt_money, parse_u32,
};
use crate::error::DatabaseError;

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    customer_id: Uuid,
    boat_id: Uuid,
    engine_id: Option<Uuid>,
    new_engine_id: Option<Uuid>,
    description: Option<String>,
    customer_notes: Option<String>,
    status: String,
    date_opened: NaiveDate,
    date_closed: Option<NaiveDate>,
    subtotal: String,
    tax_amount: String,
    total: String,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = DatabaseError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Ticket {
            id: TicketId::from_uuid(row.id),
            customer_id: CustomerId::from_uuid(row.customer_id),
            boat_id: BoatId::from_uuid(row.boat_id),
            engine_id: row.engine_id.map(EngineId::from_uuid),
            new_engine_id: row.new_engine_id.map(NewEngineId::from_uuid),
            description: row.description,
            customer_notes: row.customer_notes,
            status: parse_enum("tickets.status", &row.status)?,
            date_opened: row.date_opened,
            date_closed: row.date_closed,
            subtotal: parse_money("tickets.subtotal", &row.subtotal)?,
            tax_amount: parse_money("tickets.tax_amount", &row.tax_amount)?,
            total: parse_money("tickets.total", &row.total)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TicketPartRow {
    id: Uuid,
    ticket_id: Uuid,
    part_id: Uuid,
    quantity_used: i64,
    price_override: Option<String>,
}

impl TryFrom<TicketPartRow> for TicketPart {
    type Error = DatabaseError;

    fn try_from(row: TicketPartRow) -> Result<Self, Self::Error> {
        Ok(TicketPart {
            id: TicketPartId::from_uuid(row.id),
            ticket_id: TicketId::from_uuid(row.ticket_id),
            part_id: PartId::from_uuid(row.part_id),
            quantity_used: parse_u32("ticket_parts.quantity_used", row.quantity_used)?,
            price_override: parse_opt_money("ticket_parts.price_override", row.price_override)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    id: Uuid,
    ticket_id: Uuid,
    mechanic_id: Uuid,
    hours_worked: String,
    labor_rate: String,
    work_description: Option<String>,
}

impl TryFrom<AssignmentRow> for TicketAssignment {
    type Error = DatabaseError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        Ok(TicketAssignment {
            id: AssignmentId::from_uuid(row.id),
            ticket_id: TicketId::from_uuid(row.ticket_id),
            mechanic_id: MechanicId::from_uuid(row.mechanic_id),
            hours_worked: parse_decimal("ticket_assignments.hours_worked", &row.hours_worked)?,
            labor_rate: parse_money("ticket_assignments.labor_rate", &row.labor_rate)?,
            work_description: row.work_description,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DepositRow {
    id: Uuid,
    ticket_id: Uuid,
    amount: String,
    payment_date: NaiveDate,
    payment_method: Option<String>,
    notes: Option<String>,
}

impl TryFrom<DepositRow> for Deposit {
    type Error = DatabaseError;

    fn try_from(row: DepositRow) -> Result<Self, Self::Error> {
        Ok(Deposit {
            id: DepositId::from_uuid(row.id),
            ticket_id: TicketId::from_uuid(row.ticket_id),
            amount: parse_money("deposits.amount", &row.amount)?,
            payment_date: row.payment_date,
            payment_method: row
                .payment_method
                .map(|m| parse_enum("deposits.payment_method", &m))
                .transpose()?,
            notes: row.notes,
        })
    }
}

const TICKET_COLUMNS: &str = "id, customer_id, boat_id, engine_id, new_engine_id, description, \
     customer_notes, status, date_opened, date_closed, subtotal, tax_amount, total";

/// Repository for tickets and their lines
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: SqlitePool,
}

impl TicketRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), DatabaseError> {
        sqlx::query(&format!(
            "INSERT INTO tickets ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            TICKET_COLUMNS
        ))
        .bind(Uuid::from(ticket.id))
        .bind(Uuid::from(ticket.customer_id))
        .bind(Uuid::from(ticket.boat_id))
        .bind(ticket.engine_id.map(Uuid::from))
        .bind(ticket.new_engine_id.map(Uuid::from))
        .bind(&ticket.description)
        .bind(&ticket.customer_notes)
        .bind(ticket.status.as_str())
        .bind(ticket.date_opened)
        .bind(ticket.date_closed)
        .bind(money_text(ticket.subtotal))
        .bind(money_text(ticket.tax_amount))
        .bind(money_text(ticket.total))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Overwrites the whole ticket row
    pub async fn update_ticket(&self, ticket: &Ticket) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE tickets SET customer_id = ?, boat_id = ?, engine_id = ?, new_engine_id = ?, \
             description = ?, customer_notes = ?, status = ?, date_opened = ?, date_closed = ?, \
             subtotal = ?, tax_amount = ?, total = ? WHERE id = ?",
        )
        .bind(Uuid::from(ticket.customer_id))
        .bind(Uuid::from(ticket.boat_id))
        .bind(ticket.engine_id.map(Uuid::from))
        .bind(ticket.new_engine_id.map(Uuid::from))
        .bind(&ticket.description)
        .bind(&ticket.customer_notes)
        .bind(ticket.status.as_str())
        .bind(ticket.date_opened)
        .bind(ticket.date_closed)
        .bind(money_text(ticket.subtotal))
        .bind(money_text(ticket.tax_amount))
        .bind(money_text(ticket.total))
        .bind(Uuid::from(ticket.id))
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "Ticket", ticket.id)
    }

    pub async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, DatabaseError> {
        sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {} FROM tickets WHERE id = ?",
            TICKET_COLUMNS
        ))
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?
        .map(Ticket::try_from)
        .transpose()
    }

    /// Newest first
    pub async fn list_tickets(
        &self,
        status: Option<TicketStatus>,
    ) -> Result<Vec<Ticket>, DatabaseError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, TicketRow>(&format!(
                    "SELECT {} FROM tickets WHERE status = ? ORDER BY date_opened DESC, rowid DESC",
                    TICKET_COLUMNS
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TicketRow>(&format!(
                    "SELECT {} FROM tickets ORDER BY date_opened DESC, rowid DESC",
                    TICKET_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter().map(Ticket::try_from).collect()
    }

    pub async fn insert_ticket_part(&self, line: &TicketPart) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO ticket_parts (id, ticket_id, part_id, quantity_used, price_override) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::from(line.id))
        .bind(Uuid::from(line.ticket_id))
        .bind(Uuid::from(line.part_id))
        .bind(i64::from(line.quantity_used))
        .bind(opt_money_text(line.price_override))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_ticket_part(
        &self,
        ticket_id: TicketId,
        id: TicketPartId,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM ticket_parts WHERE id = ? AND ticket_id = ?")
            .bind(Uuid::from(id))
            .bind(Uuid::from(ticket_id))
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "TicketPart", id)
    }

    pub async fn list_ticket_parts(&self, ticket_id: TicketId) -> Result<Vec<TicketPart>, DatabaseError> {
        sqlx::query_as::<_, TicketPartRow>(
            "SELECT id, ticket_id, part_id, quantity_used, price_override FROM ticket_parts \
             WHERE ticket_id = ? ORDER BY rowid",
        )
        .bind(Uuid::from(ticket_id))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(TicketPart::try_from)
        .collect()
    }

    pub async fn insert_assignment(&self, assignment: &TicketAssignment) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO ticket_assignments (id, ticket_id, mechanic_id, hours_worked, \
             labor_rate, work_description) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::from(assignment.id))
        .bind(Uuid::from(assignment.ticket_id))
        .bind(Uuid::from(assignment.mechanic_id))
        .bind(assignment.hours_worked.to_string())
        .bind(money_text(assignment.labor_rate))
        .bind(&assignment.work_description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_assignment(
        &self,
        ticket_id: TicketId,
        id: AssignmentId,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM ticket_assignments WHERE id = ? AND ticket_id = ?")
            .bind(Uuid::from(id))
            .bind(Uuid::from(ticket_id))
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "TicketAssignment", id)
    }

    pub async fn list_assignments(
        &self,
        ticket_id: TicketId,
    ) -> Result<Vec<TicketAssignment>, DatabaseError> {
        sqlx::query_as::<_, AssignmentRow>(
            "SELECT id, ticket_id, mechanic_id, hours_worked, labor_rate, work_description \
             FROM ticket_assignments WHERE ticket_id = ? ORDER BY rowid",
        )
        .bind(Uuid::from(ticket_id))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(TicketAssignment::try_from)
        .collect()
    }

    pub async fn insert_deposit(&self, deposit: &Deposit) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO deposits (id, ticket_id, amount, payment_date, payment_method, notes) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::from(deposit.id))
        .bind(Uuid::from(deposit.ticket_id))
        .bind(money_text(deposit.amount))
        .bind(deposit.payment_date)
        .bind(deposit.payment_method.map(|m| m.as_str()))
        .bind(&deposit.notes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_deposits(&self, ticket_id: TicketId) -> Result<Vec<Deposit>, DatabaseError> {
        sqlx::query_as::<_, DepositRow>(
            "SELECT id, ticket_id, amount, payment_date, payment_method, notes FROM deposits \
             WHERE ticket_id = ? ORDER BY payment_date, rowid",
        )
        .bind(Uuid::from(ticket_id))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Deposit::try_from)
        .collect()
    }
}
