//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the pricing database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Latest known prices, one row per (zone, registrar)
CREATE TABLE IF NOT EXISTS pricing_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    zone TEXT NOT NULL,
    registrar TEXT NOT NULL,
    registrar_name TEXT NOT NULL,
    registrar_url TEXT NOT NULL DEFAULT '',
    registration_price TEXT,
    renewal_price TEXT,
    transfer_price TEXT,
    currency TEXT NOT NULL,
    currency_name TEXT NOT NULL,
    source TEXT NOT NULL,
    crawled_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(zone, registrar)
);

CREATE INDEX IF NOT EXISTS idx_pricing_zone ON pricing_data(zone);
CREATE INDEX IF NOT EXISTS idx_pricing_registrar ON pricing_data(registrar);

-- Per-zone crawl outcomes for each run
CREATE TABLE IF NOT EXISTS zone_crawls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    zone TEXT NOT NULL,
    outcome TEXT NOT NULL,
    pages_fetched INTEGER NOT NULL,
    records INTEGER NOT NULL,
    error TEXT,
    finished_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_zone_crawls_run ON zone_crawls(run_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
