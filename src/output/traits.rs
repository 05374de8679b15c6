//! Output traits and error types
//!
//! This module defines the checkpoint store interface, the end-of-run report
//! and the error type shared by every writer in the output module.

use crate::model::Zone;
use crate::output::stats::CrawlStats;
use crate::state::SupportMatrix;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything written at a checkpoint, borrowed from the run's aggregator
#[derive(Debug, Clone, Copy)]
pub struct CheckpointSnapshot<'a> {
    pub support_matrix: &'a SupportMatrix,
    pub registrars: &'a BTreeSet<String>,
    pub failed_zones: &'a [Zone],
    pub stats: &'a CrawlStats,
}

/// Destination for checkpoint artifacts
///
/// Every write fully replaces the previous content of the artifact it covers.
pub trait CheckpointStore: Send {
    /// Persists the verified zone list; written once per run
    fn write_zone_list(&self, zones: &[Zone]) -> OutputResult<()>;

    /// Persists the support matrix, registrar set, failed zones and stats
    fn write_snapshot(&self, snapshot: &CheckpointSnapshot<'_>) -> OutputResult<()>;
}

/// Failed zones listed in summaries before truncation
pub const FAILED_ZONE_PREVIEW: usize = 10;

/// End-of-run report
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub run_id: i64,
    pub config_hash: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stats: CrawlStats,
    /// Records extracted across all zones
    pub total_records: usize,
    /// Records the storage sink accepted
    pub saved_records: usize,
}

impl CrawlReport {
    /// Extracted records per successful zone, if any zone succeeded
    pub fn average_registrars_per_zone(&self) -> Option<f64> {
        if self.stats.successful_zones == 0 {
            return None;
        }
        Some(self.total_records as f64 / self.stats.successful_zones as f64)
    }

    /// First failed zones joined with ", ", followed by "..." when truncated
    pub fn failed_zone_preview(&self) -> String {
        let failed = &self.stats.failed_zone_list;
        let shown: Vec<&str> = failed
            .iter()
            .take(FAILED_ZONE_PREVIEW)
            .map(Zone::as_str)
            .collect();
        let mut preview = shown.join(", ");
        if failed.len() > FAILED_ZONE_PREVIEW {
            preview.push_str("...");
        }
        preview
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}
