//! Estimate and estimate line tables

use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use core_kernel::{BoatId, CustomerId, EngineId, EstimateId, EstimateLineId};
use domain_shop::{Estimate, EstimateLineItem};

use super::{ensure_affected, money_text, parse_decimal, parse_enum, parse_money};
use crate::error::DatabaseError;

#[derive(Debug, sqlx::FromRow)]
struct EstimateRow {
    id: Uuid,
    customer_id: Uuid,
    boat_id: Option<Uuid>,
    engine_id: Option<Uuid>,
    date_created: NaiveDate,
    insurance_company: Option<String>,
    claim_number: Option<String>,
    notes: Option<String>,
    subtotal: String,
    tax_amount: String,
    total: String,
}

impl TryFrom<EstimateRow> for Estimate {
    type Error = DatabaseError;

    fn try_from(row: EstimateRow) -> Result<Self, Self::Error> {
        Ok(Estimate {
            id: EstimateId::from_uuid(row.id),
            customer_id: CustomerId::from_uuid(row.customer_id),
            boat_id: row.boat_id.map(BoatId::from_uuid),
            engine_id: row.engine_id.map(EngineId::from_uuid),
            date_created: row.date_created,
            insurance_company: row.insurance_company,
            claim_number: row.claim_number,
            notes: row.notes,
            subtotal: parse_money("estimates.subtotal", &row.subtotal)?,
            tax_amount: parse_money("estimates.tax_amount", &row.tax_amount)?,
            total: parse_money("estimates.total", &row.total)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EstimateLineRow {
    id: Uuid,
    estimate_id: Uuid,
    item_type: String,
    description: String,
    quantity: String,
    unit_price: String,
    line_total: String,
    taxable: bool,
}

impl TryFrom<EstimateLineRow> for EstimateLineItem {
    type Error = DatabaseError;

    fn try_from(row: EstimateLineRow) -> Result<Self, Self::Error> {
        Ok(EstimateLineItem {
            id: EstimateLineId::from_uuid(row.id),
            estimate_id: EstimateId::from_uuid(row.estimate_id),
            item_type: parse_enum("estimate_line_items.item_type", &row.item_type)?,
            description: row.description,
            quantity: parse_decimal("estimate_line_items.quantity", &row.quantity)?,
            unit_price: parse_money("estimate_line_items.unit_price", &row.unit_price)?,
            line_total: parse_money("estimate_line_items.line_total", &row.line_total)?,
            taxable: row.taxable,
        })
    }
}

const ESTIMATE_COLUMNS: &str = "id, customer_id, boat_id, engine_id, date_created, \
     insurance_company, claim_number, notes, subtotal, tax_amount, total";

/// Repository for estimates
#[derive(Debug, Clone)]
pub struct EstimateRepository {
    pool: SqlitePool,
}

impl EstimateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_estimate(&self, estimate: &Estimate) -> Result<(), DatabaseError> {
        sqlx::query(&format!(
            "INSERT INTO estimates ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            ESTIMATE_COLUMNS
        ))
        .bind(Uuid::from(estimate.id))
        .bind(Uuid::from(estimate.customer_id))
        .bind(estimate.boat_id.map(Uuid::from))
        .bind(estimate.engine_id.map(Uuid::from))
        .bind(estimate.date_created)
        .bind(&estimate.insurance_company)
        .bind(&estimate.claim_number)
        .bind(&estimate.notes)
        .bind(money_text(estimate.subtotal))
        .bind(money_text(estimate.tax_amount))
        .bind(money_text(estimate.total))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_estimate(&self, estimate: &Estimate) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE estimates SET customer_id = ?, boat_id = ?, engine_id = ?, date_created = ?, \
             insurance_company = ?, claim_number = ?, notes = ?, subtotal = ?, tax_amount = ?, \
             total = ? WHERE id = ?",
        )
        .bind(Uuid::from(estimate.customer_id))
        .bind(estimate.boat_id.map(Uuid::from))
        .bind(estimate.engine_id.map(Uuid::from))
        .bind(estimate.date_created)
        .bind(&estimate.insurance_company)
        .bind(&estimate.claim_number)
        .bind(&estimate.notes)
        .bind(money_text(estimate.subtotal))
        .bind(money_text(estimate.tax_amount))
        .bind(money_text(estimate.total))
        .bind(Uuid::from(estimate.id))
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "Estimate", estimate.id)
    }

    pub async fn get_estimate(&self, id: EstimateId) -> Result<Option<Estimate>, DatabaseError> {
        sqlx::query_as::<_, EstimateRow>(&format!(
            "SELECT {} FROM estimates WHERE id = ?",
            ESTIMATE_COLUMNS
        ))
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?
        .map(Estimate::try_from)
        .transpose()
    }

    pub async fn list_estimates(&self) -> Result<Vec<Estimate>, DatabaseError> {
        sqlx::query_as::<_, EstimateRow>(&format!(
            "SELECT {} FROM estimates ORDER BY date_created DESC, rowid DESC",
            ESTIMATE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Estimate::try_from)
        .collect()
    }

    pub async fn insert_line(&self, line: &EstimateLineItem) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO estimate_line_items (id, estimate_id, item_type, description, quantity, \
             unit_price, line_total, taxable) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::from(line.id))
        .bind(Uuid::from(line.estimate_id))
        .bind(line.item_type.as_str())
        .bind(&line.description)
        .bind(line.quantity.to_string())
        .bind(money_text(line.unit_price))
        .bind(money_text(line.line_total))
        .bind(line.taxable)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_line(
        &self,
        estimate_id: EstimateId,
        id: EstimateLineId,
    ) -> Result<(), DatabaseError> {
        let result =
            sqlx::query("DELETE FROM estimate_line_items WHERE id = ? AND estimate_id = ?")
                .bind(Uuid::from(id))
                .bind(Uuid::from(estimate_id))
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "EstimateLineItem", id)
    }

    pub async fn list_lines(&self, estimate_id: EstimateId) -> Result<Vec<EstimateLineItem>, DatabaseError> {
        sqlx::query_as::<_, EstimateLineRow>(
            "SELECT id, estimate_id, item_type, description, quantity, unit_price, line_total, \
             taxable FROM estimate_line_items WHERE estimate_id = ? ORDER BY rowid",
        )
        .bind(Uuid::from(estimate_id))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(EstimateLineItem::try_from)
        .collect()
    }
}
