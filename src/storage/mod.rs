//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Price upserts keyed by (zone, registrar)
//! - Run tracking and per-zone outcomes

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{PriceSink, Storage, StorageError, StorageResult};

use crate::state::ZoneOutcome;

/// A price row as stored in the database
///
/// Prices are kept as decimal text so they round-trip without float error.
#[derive(Debug, Clone)]
pub struct StoredPrice {
    pub zone: String,
    pub registrar: String,
    pub registrar_name: String,
    pub registrar_url: String,
    pub registration_price: Option<String>,
    pub renewal_price: Option<String>,
    pub transfer_price: Option<String>,
    pub currency: String,
    pub currency_name: String,
    pub source: String,
    pub crawled_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// One zone's outcome within a run
#[derive(Debug, Clone)]
pub struct ZoneCrawlRecord {
    pub run_id: i64,
    pub zone: String,
    pub outcome: ZoneOutcome,
    pub pages_fetched: u32,
    pub records: u64,
    pub error: Option<String>,
    pub finished_at: String,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    /// Discovery verified no zones
    Aborted,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "aborted" => Some(Self::Aborted),
            _ => None,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
