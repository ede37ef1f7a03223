//! Customer, boat, and installed engine tables

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use core_kernel::{BoatId, CustomerId, EngineId};
use domain_shop::{Boat, Customer, Engine, EngineType};

use super::{ensure_affected, parse_enum, parse_u32};
use crate::error::DatabaseError;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    tax_exempt: bool,
    tax_exempt_certificate: Option<String>,
    out_of_state: bool,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: CustomerId::from_uuid(row.id),
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            tax_exempt: row.tax_exempt,
            tax_exempt_certificate: row.tax_exempt_certificate,
            out_of_state: row.out_of_state,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BoatRow {
    id: Uuid,
    customer_id: Uuid,
    make: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    colors: String,
}

impl TryFrom<BoatRow> for Boat {
    type Error = DatabaseError;

    fn try_from(row: BoatRow) -> Result<Self, Self::Error> {
        let colors = serde_json::from_str(&row.colors)
            .map_err(|_| DatabaseError::decode("boats.colors", &row.colors))?;
        Ok(Boat {
            id: BoatId::from_uuid(row.id),
            customer_id: CustomerId::from_uuid(row.customer_id),
            make: row.make,
            model: row.model,
            year: row.year,
            colors,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EngineRow {
    id: Uuid,
    boat_id: Uuid,
    engine_type: Option<String>,
    make: Option<String>,
    model: Option<String>,
    hp: Option<i64>,
    serial_number: String,
    year: Option<i32>,
    outdrive: Option<String>,
}

impl TryFrom<EngineRow> for Engine {
    type Error = DatabaseError;

    fn try_from(row: EngineRow) -> Result<Self, Self::Error> {
        Ok(Engine {
            id: EngineId::from_uuid(row.id),
            boat_id: BoatId::from_uuid(row.boat_id),
            engine_type: row
                .engine_type
                .map(|t| parse_enum::<EngineType>("engines.engine_type", &t))
                .transpose()?,
            make: row.make,
            model: row.model,
            hp: row.hp.map(|hp| parse_u32("engines.hp", hp)).transpose()?,
            serial_number: row.serial_number,
            year: row.year,
            outdrive: row.outdrive,
        })
    }
}

const CUSTOMER_COLUMNS: &str = "id, name, phone, email, address, tax_exempt, \
     tax_exempt_certificate, out_of_state, created_at";

/// Repository for customers and what they own
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_customer(&self, customer: &Customer) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO customers (id, name, phone, email, address, tax_exempt, \
             tax_exempt_certificate, out_of_state, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::from(customer.id))
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.tax_exempt)
        .bind(&customer.tax_exempt_certificate)
        .bind(customer.out_of_state)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_customer(&self, customer: &Customer) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE customers SET name = ?, phone = ?, email = ?, address = ?, \
             tax_exempt = ?, tax_exempt_certificate = ?, out_of_state = ? WHERE id = ?",
        )
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.tax_exempt)
        .bind(&customer.tax_exempt_certificate)
        .bind(customer.out_of_state)
        .bind(Uuid::from(customer.id))
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "Customer", customer.id)
    }

    pub async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, DatabaseError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = ?",
            CUSTOMER_COLUMNS
        ))
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Customer::from))
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, DatabaseError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers ORDER BY name",
            CUSTOMER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    pub async fn insert_boat(&self, boat: &Boat) -> Result<(), DatabaseError> {
        let colors = serde_json::to_string(&boat.colors)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        sqlx::query(
            "INSERT INTO boats (id, customer_id, make, model, year, colors) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::from(boat.id))
        .bind(Uuid::from(boat.customer_id))
        .bind(&boat.make)
        .bind(&boat.model)
        .bind(boat.year)
        .bind(colors)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_boat(&self, id: BoatId) -> Result<Option<Boat>, DatabaseError> {
        sqlx::query_as::<_, BoatRow>(
            "SELECT id, customer_id, make, model, year, colors FROM boats WHERE id = ?",
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?
        .map(Boat::try_from)
        .transpose()
    }

    pub async fn list_boats(&self, customer_id: CustomerId) -> Result<Vec<Boat>, DatabaseError> {
        sqlx::query_as::<_, BoatRow>(
            "SELECT id, customer_id, make, model, year, colors FROM boats \
             WHERE customer_id = ? ORDER BY rowid",
        )
        .bind(Uuid::from(customer_id))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Boat::try_from)
        .collect()
    }

    pub async fn insert_engine(&self, engine: &Engine) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO engines (id, boat_id, engine_type, make, model, hp, serial_number, \
             year, outdrive) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::from(engine.id))
        .bind(Uuid::from(engine.boat_id))
        .bind(engine.engine_type.map(|t| t.as_str()))
        .bind(&engine.make)
        .bind(&engine.model)
        .bind(engine.hp.map(i64::from))
        .bind(&engine.serial_number)
        .bind(engine.year)
        .bind(&engine.outdrive)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_engine(&self, id: EngineId) -> Result<Option<Engine>, DatabaseError> {
        sqlx::query_as::<_, EngineRow>(
            "SELECT id, boat_id, engine_type, make, model, hp, serial_number, year, outdrive \
             FROM engines WHERE id = ?",
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?
        .map(Engine::try_from)
        .transpose()
    }

    pub async fn list_engines(&self, boat_id: BoatId) -> Result<Vec<Engine>, DatabaseError> {
        sqlx::query_as::<_, EngineRow>(
            "SELECT id, boat_id, engine_type, make, model, hp, serial_number, year, outdrive \
             FROM engines WHERE boat_id = ? ORDER BY rowid",
        )
        .bind(Uuid::from(boat_id))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Engine::try_from)
        .collect()
    }
}
