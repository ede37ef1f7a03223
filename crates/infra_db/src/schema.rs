//! Schema bootstrap
//!
//! Creates any missing tables on startup. Money columns are TEXT holding
//! exact decimal strings; ids are 16-byte UUID blobs.

use tracing::debug;

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id                     BLOB PRIMARY KEY,
        name                   TEXT NOT NULL,
        phone                  TEXT,
        email                  TEXT,
        address                TEXT,
        tax_exempt             INTEGER NOT NULL DEFAULT 0,
        tax_exempt_certificate TEXT,
        out_of_state           INTEGER NOT NULL DEFAULT 0,
        created_at             TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS boats (
        id          BLOB PRIMARY KEY,
        customer_id BLOB NOT NULL REFERENCES customers(id),
        make        TEXT,
        model       TEXT,
        year        INTEGER,
        colors      TEXT NOT NULL DEFAULT '[]'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS engines (
        id            BLOB PRIMARY KEY,
        boat_id       BLOB NOT NULL REFERENCES boats(id),
        engine_type   TEXT,
        make          TEXT,
        model         TEXT,
        hp            INTEGER,
        serial_number TEXT NOT NULL,
        year          INTEGER,
        outdrive      TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS parts (
        id                 BLOB PRIMARY KEY,
        part_number        TEXT,
        name               TEXT NOT NULL,
        stock_quantity     INTEGER NOT NULL DEFAULT 0,
        price              TEXT NOT NULL,
        supplier_name      TEXT,
        cost_from_supplier TEXT,
        retail_price       TEXT,
        taxable            INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS mechanics (
        id          BLOB PRIMARY KEY,
        name        TEXT NOT NULL,
        hourly_rate TEXT,
        phone       TEXT,
        email       TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS new_engines (
        id                           BLOB PRIMARY KEY,
        hp                           INTEGER NOT NULL,
        model                        TEXT NOT NULL,
        serial_number                TEXT NOT NULL UNIQUE,
        status                       TEXT NOT NULL DEFAULT 'In Stock'
                                     CHECK (status IN ('In Stock', 'Sold', 'Transferred')),
        purchase_price               TEXT,
        sale_price                   TEXT,
        customer_id                  BLOB REFERENCES customers(id),
        boat_id                      BLOB REFERENCES boats(id),
        date_sold                    TEXT,
        date_installed               TEXT,
        paid_in_full                 INTEGER NOT NULL DEFAULT 0,
        registered_with_manufacturer INTEGER NOT NULL DEFAULT 0,
        registration_date            TEXT,
        notes                        TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tickets (
        id             BLOB PRIMARY KEY,
        customer_id    BLOB NOT NULL REFERENCES customers(id),
        boat_id        BLOB NOT NULL REFERENCES boats(id),
        engine_id      BLOB REFERENCES engines(id),
        new_engine_id  BLOB REFERENCES new_engines(id),
        description    TEXT,
        customer_notes TEXT,
        status         TEXT NOT NULL DEFAULT 'Open',
        date_opened    TEXT NOT NULL,
        date_closed    TEXT,
        subtotal       TEXT NOT NULL DEFAULT '0',
        tax_amount     TEXT NOT NULL DEFAULT '0',
        total          TEXT NOT NULL DEFAULT '0'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ticket_parts (
        id             BLOB PRIMARY KEY,
        ticket_id      BLOB NOT NULL REFERENCES tickets(id),
        part_id        BLOB NOT NULL REFERENCES parts(id),
        quantity_used  INTEGER NOT NULL CHECK (quantity_used > 0),
        price_override TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ticket_assignments (
        id               BLOB PRIMARY KEY,
        ticket_id        BLOB NOT NULL REFERENCES tickets(id),
        mechanic_id      BLOB NOT NULL REFERENCES mechanics(id),
        hours_worked     TEXT NOT NULL,
        labor_rate       TEXT NOT NULL,
        work_description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS deposits (
        id             BLOB PRIMARY KEY,
        ticket_id      BLOB NOT NULL REFERENCES tickets(id),
        amount         TEXT NOT NULL,
        payment_date   TEXT NOT NULL,
        payment_method TEXT,
        notes          TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS estimates (
        id                BLOB PRIMARY KEY,
        customer_id       BLOB NOT NULL REFERENCES customers(id),
        boat_id           BLOB REFERENCES boats(id),
        engine_id         BLOB REFERENCES engines(id),
        date_created      TEXT NOT NULL,
        insurance_company TEXT,
        claim_number      TEXT,
        notes             TEXT,
        subtotal          TEXT NOT NULL DEFAULT '0',
        tax_amount        TEXT NOT NULL DEFAULT '0',
        total             TEXT NOT NULL DEFAULT '0'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS estimate_line_items (
        id          BLOB PRIMARY KEY,
        estimate_id BLOB NOT NULL REFERENCES estimates(id),
        item_type   TEXT NOT NULL CHECK (item_type IN ('part', 'labor')),
        description TEXT NOT NULL,
        quantity    TEXT NOT NULL,
        unit_price  TEXT NOT NULL,
        line_total  TEXT NOT NULL,
        taxable     INTEGER NOT NULL DEFAULT 1
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status)",
    "CREATE INDEX IF NOT EXISTS idx_ticket_parts_ticket ON ticket_parts(ticket_id)",
    "CREATE INDEX IF NOT EXISTS idx_assignments_ticket ON ticket_assignments(ticket_id)",
    "CREATE INDEX IF NOT EXISTS idx_deposits_ticket ON deposits(ticket_id)",
    "CREATE INDEX IF NOT EXISTS idx_estimate_lines_estimate ON estimate_line_items(estimate_id)",
];

/// Creates every table and index that does not exist yet
pub async fn bootstrap(pool: &DatabasePool) -> Result<(), DatabaseError> {
    for statement in STATEMENTS.iter().copied() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::SchemaFailed(e.to_string()))?;
    }
    debug!(statements = STATEMENTS.len(), "Schema bootstrap complete");
    Ok(())
}
