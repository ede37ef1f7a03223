//! Parts, mechanics, and new engine tables

use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use core_kernel::{BoatId, CustomerId, MechanicId, NewEngineId, PartId};
use domain_shop::{Mechanic, NewEngine, NewEngineStatus, Part};

use super::{
    ensure_affected, money_text, opt_money_text, parse_enum, parse_money, parse_opt_money,
    parse_u32,
};
use crate::error::DatabaseError;

#[derive(Debug, sqlx::FromRow)]
struct PartRow {
    id: Uuid,
    part_number: Option<String>,
    name: String,
    stock_quantity: i64,
    price: String,
    supplier_name: Option<String>,
    cost_from_supplier: Option<String>,
    retail_price: Option<String>,
    taxable: bool,
}

impl TryFrom<PartRow> for Part {
    type Error = DatabaseError;

    fn try_from(row: PartRow) -> Result<Self, Self::Error> {
        Ok(Part {
            id: PartId::from_uuid(row.id),
            part_number: row.part_number,
            name: row.name,
            stock_quantity: row.stock_quantity,
            price: parse_money("parts.price", &row.price)?,
            supplier_name: row.supplier_name,
            cost_from_supplier: parse_opt_money("parts.cost_from_supplier", row.cost_from_supplier)?,
            retail_price: parse_opt_money("parts.retail_price", row.retail_price)?,
            taxable: row.taxable,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MechanicRow {
    id: Uuid,
    name: String,
    hourly_rate: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

impl TryFrom<MechanicRow> for Mechanic {
    type Error = DatabaseError;

    fn try_from(row: MechanicRow) -> Result<Self, Self::Error> {
        Ok(Mechanic {
            id: MechanicId::from_uuid(row.id),
            name: row.name,
            hourly_rate: parse_opt_money("mechanics.hourly_rate", row.hourly_rate)?,
            phone: row.phone,
            email: row.email,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NewEngineRow {
    id: Uuid,
    hp: i64,
    model: String,
    serial_number: String,
    status: String,
    purchase_price: Option<String>,
    sale_price: Option<String>,
    customer_id: Option<Uuid>,
    boat_id: Option<Uuid>,
    date_sold: Option<NaiveDate>,
    date_installed: Option<NaiveDate>,
    paid_in_full: bool,
    registered_with_manufacturer: bool,
    registration_date: Option<NaiveDate>,
    notes: Option<String>,
}

impl TryFrom<NewEngineRow> for NewEngine {
    type Error = DatabaseError;

    fn try_from(row: NewEngineRow) -> Result<Self, Self::Error> {
        Ok(NewEngine {
            id: NewEngineId::from_uuid(row.id),
            hp: parse_u32("new_engines.hp", row.hp)?,
            model: row.model,
            serial_number: row.serial_number,
            status: parse_enum("new_engines.status", &row.status)?,
            purchase_price: parse_opt_money("new_engines.purchase_price", row.purchase_price)?,
            sale_price: parse_opt_money("new_engines.sale_price", row.sale_price)?,
            customer_id: row.customer_id.map(CustomerId::from_uuid),
            boat_id: row.boat_id.map(BoatId::from_uuid),
            date_sold: row.date_sold,
            date_installed: row.date_installed,
            paid_in_full: row.paid_in_full,
            registered_with_manufacturer: row.registered_with_manufacturer,
            registration_date: row.registration_date,
            notes: row.notes,
        })
    }
}

const PART_COLUMNS: &str = "id, part_number, name, stock_quantity, price, supplier_name, \
     cost_from_supplier, retail_price, taxable";

const NEW_ENGINE_COLUMNS: &str = "id, hp, model, serial_number, status, purchase_price, \
     sale_price, customer_id, boat_id, date_sold, date_installed, paid_in_full, \
     registered_with_manufacturer, registration_date, notes";

/// Repository for shop inventory
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_part(&self, part: &Part) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO parts (id, part_number, name, stock_quantity, price, supplier_name, \
             cost_from_supplier, retail_price, taxable) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::from(part.id))
        .bind(&part.part_number)
        .bind(&part.name)
        .bind(part.stock_quantity)
        .bind(money_text(part.price))
        .bind(&part.supplier_name)
        .bind(opt_money_text(part.cost_from_supplier))
        .bind(opt_money_text(part.retail_price))
        .bind(part.taxable)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_part(&self, part: &Part) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE parts SET part_number = ?, name = ?, stock_quantity = ?, price = ?, \
             supplier_name = ?, cost_from_supplier = ?, retail_price = ?, taxable = ? \
             WHERE id = ?",
        )
        .bind(&part.part_number)
        .bind(&part.name)
        .bind(part.stock_quantity)
        .bind(money_text(part.price))
        .bind(&part.supplier_name)
        .bind(opt_money_text(part.cost_from_supplier))
        .bind(opt_money_text(part.retail_price))
        .bind(part.taxable)
        .bind(Uuid::from(part.id))
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "Part", part.id)
    }

    pub async fn get_part(&self, id: PartId) -> Result<Option<Part>, DatabaseError> {
        sqlx::query_as::<_, PartRow>(&format!("SELECT {} FROM parts WHERE id = ?", PART_COLUMNS))
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?
            .map(Part::try_from)
            .transpose()
    }

    pub async fn list_parts(&self) -> Result<Vec<Part>, DatabaseError> {
        sqlx::query_as::<_, PartRow>(&format!("SELECT {} FROM parts ORDER BY name", PART_COLUMNS))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Part::try_from)
            .collect()
    }

    pub async fn insert_mechanic(&self, mechanic: &Mechanic) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO mechanics (id, name, hourly_rate, phone, email) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::from(mechanic.id))
        .bind(&mechanic.name)
        .bind(opt_money_text(mechanic.hourly_rate))
        .bind(&mechanic.phone)
        .bind(&mechanic.email)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_mechanic(&self, id: MechanicId) -> Result<Option<Mechanic>, DatabaseError> {
        sqlx::query_as::<_, MechanicRow>(
            "SELECT id, name, hourly_rate, phone, email FROM mechanics WHERE id = ?",
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?
        .map(Mechanic::try_from)
        .transpose()
    }

    pub async fn insert_new_engine(&self, engine: &NewEngine) -> Result<(), DatabaseError> {
        sqlx::query(&format!(
            "INSERT INTO new_engines ({}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            NEW_ENGINE_COLUMNS
        ))
        .bind(Uuid::from(engine.id))
        .bind(i64::from(engine.hp))
        .bind(&engine.model)
        .bind(&engine.serial_number)
        .bind(engine.status.as_str())
        .bind(opt_money_text(engine.purchase_price))
        .bind(opt_money_text(engine.sale_price))
        .bind(engine.customer_id.map(Uuid::from))
        .bind(engine.boat_id.map(Uuid::from))
        .bind(engine.date_sold)
        .bind(engine.date_installed)
        .bind(engine.paid_in_full)
        .bind(engine.registered_with_manufacturer)
        .bind(engine.registration_date)
        .bind(&engine.notes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_new_engine(&self, engine: &NewEngine) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE new_engines SET hp = ?, model = ?, serial_number = ?, status = ?, \
             purchase_price = ?, sale_price = ?, customer_id = ?, boat_id = ?, date_sold = ?, \
             date_installed = ?, paid_in_full = ?, registered_with_manufacturer = ?, \
             registration_date = ?, notes = ? WHERE id = ?",
        )
        .bind(i64::from(engine.hp))
        .bind(&engine.model)
        .bind(&engine.serial_number)
        .bind(engine.status.as_str())
        .bind(opt_money_text(engine.purchase_price))
        .bind(opt_money_text(engine.sale_price))
        .bind(engine.customer_id.map(Uuid::from))
        .bind(engine.boat_id.map(Uuid::from))
        .bind(engine.date_sold)
        .bind(engine.date_installed)
        .bind(engine.paid_in_full)
        .bind(engine.registered_with_manufacturer)
        .bind(engine.registration_date)
        .bind(&engine.notes)
        .bind(Uuid::from(engine.id))
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "NewEngine", engine.id)
    }

    pub async fn get_new_engine(&self, id: NewEngineId) -> Result<Option<NewEngine>, DatabaseError> {
        sqlx::query_as::<_, NewEngineRow>(&format!(
            "SELECT {} FROM new_engines WHERE id = ?",
            NEW_ENGINE_COLUMNS
        ))
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?
        .map(NewEngine::try_from)
        .transpose()
    }

    pub async fn list_new_engines(
        &self,
        status: Option<NewEngineStatus>,
    ) -> Result<Vec<NewEngine>, DatabaseError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, NewEngineRow>(&format!(
                    "SELECT {} FROM new_engines WHERE status = ? ORDER BY hp, serial_number",
                    NEW_ENGINE_COLUMNS
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, NewEngineRow>(&format!(
                    "SELECT {} FROM new_engines ORDER BY hp, serial_number",
                    NEW_ENGINE_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter().map(NewEngine::try_from).collect()
    }
}
