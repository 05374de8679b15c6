//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::crawler::ZoneCrawl;
use crate::model::PriceRecord;
use crate::storage::{RunRecord, RunStatus, StoredPrice, ZoneCrawlRecord};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for scraped price records
///
/// Upserts are keyed by (zone, registrar): a repeated pair overwrites the
/// prices, currency and registrar display fields and touches `updated_at`,
/// leaving `created_at` as first written.
pub trait PriceSink {
    /// Saves a batch of records and returns how many were written
    ///
    /// A failure on a single record is logged and skipped; only a failure of
    /// the batch itself (such as opening or committing the transaction) is
    /// returned as an error.
    fn upsert(&mut self, records: &[PriceRecord]) -> StorageResult<usize>;
}

/// Full storage backend used by the crawler and the statistics report
pub trait Storage: PriceSink {
    // ===== Run Management =====

    /// Creates a new crawl run and returns its ID
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Sets the final status of a run and stamps its finish time
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Zone Outcomes =====

    /// Records how a zone crawl ended within a run
    fn record_zone_crawl(&mut self, run_id: i64, crawl: &ZoneCrawl) -> StorageResult<()>;

    /// Gets the zone outcomes recorded for a run, in crawl order
    fn get_zone_crawls(&self, run_id: i64) -> StorageResult<Vec<ZoneCrawlRecord>>;

    // ===== Prices =====

    /// Gets the stored price row for a (zone, registrar) pair
    fn get_price(&self, zone: &str, registrar: &str) -> StorageResult<Option<StoredPrice>>;

    // ===== Statistics =====

    fn count_prices(&self) -> StorageResult<u64>;

    fn count_distinct_zones(&self) -> StorageResult<u64>;

    fn count_distinct_registrars(&self) -> StorageResult<u64>;

    /// Number of price rows per currency code
    fn count_by_currency(&self) -> StorageResult<BTreeMap<String, u64>>;
}
