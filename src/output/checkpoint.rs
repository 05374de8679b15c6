//! JSON checkpoint artifacts
//!
//! Artifacts written to the checkpoint directory:
//! - `zones.json`: verified zone list, written once after discovery
//! - `support_matrix.json`: registrar key to supported zones
//! - `registrars.json`: sorted registrar keys
//! - `failed_zones.json`: zones that yielded no price data
//! - `crawl_stats.json`: [`CrawlStats`] for the run so far
//!
//! Each file is written to a temporary sibling and renamed into place, so a
//! reader never observes a half-written artifact.

use crate::model::Zone;
use crate::output::stats::CrawlStats;
use crate::output::traits::{CheckpointSnapshot, CheckpointStore, OutputError, OutputResult};
use crate::state::Aggregator;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ZONES_FILE: &str = "zones.json";
pub const SUPPORT_MATRIX_FILE: &str = "support_matrix.json";
pub const REGISTRARS_FILE: &str = "registrars.json";
pub const FAILED_ZONES_FILE: &str = "failed_zones.json";
pub const CRAWL_STATS_FILE: &str = "crawl_stats.json";

/// Writes checkpoint artifacts as pretty-printed JSON files in one directory
#[derive(Debug, Clone)]
pub struct JsonCheckpointStore {
    dir: PathBuf,
}

impl JsonCheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> OutputResult<()> {
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(value)?;
        let target = self.dir.join(file_name);
        let temp = self.dir.join(format!(".{}.tmp", file_name));

        fs::write(&temp, json)?;
        fs::rename(&temp, &target).map_err(|e| {
            OutputError::Write(format!("Failed to replace {}: {}", target.display(), e))
        })?;
        Ok(())
    }
}

impl CheckpointStore for JsonCheckpointStore {
    fn write_zone_list(&self, zones: &[Zone]) -> OutputResult<()> {
        self.write_json(ZONES_FILE, zones)
    }

    fn write_snapshot(&self, snapshot: &CheckpointSnapshot<'_>) -> OutputResult<()> {
        self.write_json(SUPPORT_MATRIX_FILE, snapshot.support_matrix)?;
        self.write_json(REGISTRARS_FILE, snapshot.registrars)?;
        self.write_json(FAILED_ZONES_FILE, snapshot.failed_zones)?;
        self.write_json(CRAWL_STATS_FILE, snapshot.stats)?;
        Ok(())
    }
}

/// Decides when to checkpoint and writes aggregator snapshots
pub struct CheckpointWriter {
    store: Box<dyn CheckpointStore>,
    every: usize,
}

impl CheckpointWriter {
    pub fn new(store: Box<dyn CheckpointStore>, every: usize) -> Self {
        Self {
            store,
            every: every.max(1),
        }
    }

    /// True after every `every`-th completed zone
    pub fn is_due(&self, zones_completed: usize) -> bool {
        zones_completed > 0 && zones_completed % self.every == 0
    }

    pub fn write_zone_list(&self, zones: &[Zone]) -> OutputResult<()> {
        self.store.write_zone_list(zones)
    }

    /// Writes a full snapshot and returns the stats it contained
    pub fn checkpoint(&self, aggregator: &Aggregator, total_zones: usize) -> OutputResult<CrawlStats> {
        let stats = CrawlStats::compute(total_zones, aggregator);
        self.store.write_snapshot(&CheckpointSnapshot {
            support_matrix: aggregator.support_matrix(),
            registrars: aggregator.registrars(),
            failed_zones: aggregator.failed_zones(),
            stats: &stats,
        })?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PriceRecord, RegistrarId, SOURCE_TAG};
    use crate::price::Currency;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn record(zone: &str, slug: &str) -> PriceRecord {
        PriceRecord {
            zone: Zone::parse(zone).unwrap(),
            registrar: RegistrarId::from_profile(slug),
            registrar_name: slug.to_string(),
            registrar_url: String::new(),
            registration: Some(Decimal::new(500, 2)),
            renewal: None,
            transfer: None,
            currency: Currency::Usd,
            crawled_at: Utc::now(),
            source: SOURCE_TAG,
        }
    }

    fn read_json(dir: &Path, file: &str) -> serde_json::Value {
        let content = fs::read_to_string(dir.join(file)).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn test_zone_list_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCheckpointStore::new(dir.path().join("data"));
        let zones = vec![Zone::parse("com").unwrap(), Zone::parse("co.uk").unwrap()];

        store.write_zone_list(&zones).unwrap();
        let json = read_json(store.dir(), ZONES_FILE);
        assert_eq!(json, serde_json::json!(["com", "co.uk"]));
    }

    #[test]
    fn test_snapshot_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CheckpointWriter::new(Box::new(JsonCheckpointStore::new(dir.path())), 10);

        let mut aggregator = Aggregator::new();
        aggregator.fold(&[record("com", "spaceship")]);
        writer.checkpoint(&aggregator, 2).unwrap();

        aggregator.fold(&[record("io", "spaceship"), record("io", "aliyun")]);
        aggregator.mark_failed(&Zone::parse("xxx").unwrap());
        writer.checkpoint(&aggregator, 3).unwrap();

        let matrix = read_json(dir.path(), SUPPORT_MATRIX_FILE);
        assert_eq!(matrix["spaceship"], serde_json::json!(["com", "io"]));
        assert_eq!(matrix["aliyun"], serde_json::json!(["io"]));

        let registrars = read_json(dir.path(), REGISTRARS_FILE);
        assert_eq!(registrars, serde_json::json!(["aliyun", "spaceship"]));

        let failed = read_json(dir.path(), FAILED_ZONES_FILE);
        assert_eq!(failed, serde_json::json!(["xxx"]));

        let stats = read_json(dir.path(), CRAWL_STATS_FILE);
        assert_eq!(stats["total_zones"], 3);
        assert_eq!(stats["total_combinations"], 3);

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_is_due() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CheckpointWriter::new(Box::new(JsonCheckpointStore::new(dir.path())), 10);
        assert!(!writer.is_due(0));
        assert!(!writer.is_due(9));
        assert!(writer.is_due(10));
        assert!(!writer.is_due(11));
        assert!(writer.is_due(20));
    }
}
