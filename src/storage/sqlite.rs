//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::crawler::ZoneCrawl;
use crate::model::PriceRecord;
use crate::state::ZoneOutcome;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{PriceSink, Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus, StoredPrice, ZoneCrawlRecord};
use crate::CrawlerError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::collections::BTreeMap;
use std::path::Path;

const UPSERT_PRICE_SQL: &str = "
    INSERT INTO pricing_data (
        zone, registrar, registrar_name, registrar_url,
        registration_price, renewal_price, transfer_price,
        currency, currency_name, source, crawled_at, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
    ON CONFLICT(zone, registrar) DO UPDATE SET
        registrar_name = excluded.registrar_name,
        registrar_url = excluded.registrar_url,
        registration_price = excluded.registration_price,
        renewal_price = excluded.renewal_price,
        transfer_price = excluded.transfer_price,
        currency = excluded.currency,
        currency_name = excluded.currency_name,
        source = excluded.source,
        crawled_at = excluded.crawled_at,
        updated_at = excluded.updated_at
";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    ///
    /// Missing parent directories are created first.
    pub fn new(path: &Path) -> Result<Self, CrawlerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, CrawlerError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn upsert_one(tx: &Transaction<'_>, record: &PriceRecord, now: &str) -> rusqlite::Result<usize> {
    tx.execute(
        UPSERT_PRICE_SQL,
        params![
            record.zone.as_str(),
            record.registrar_key(),
            record.registrar_name,
            record.registrar_url,
            record.registration.map(|d| d.to_string()),
            record.renewal.map(|d| d.to_string()),
            record.transfer.map(|d| d.to_string()),
            record.currency.code(),
            record.currency.display_name(),
            record.source,
            record.crawled_at.to_rfc3339(),
            now,
        ],
    )
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
    })
}

impl PriceSink for SqliteStorage {
    fn upsert(&mut self, records: &[PriceRecord]) -> StorageResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut saved = 0;

        for record in records {
            match upsert_one(&tx, record, &now) {
                Ok(_) => saved += 1,
                Err(e) => tracing::warn!(
                    "Failed to save {} / .{}: {}",
                    record.registrar_key(),
                    record.zone,
                    e
                ),
            }
        }

        tx.commit()?;
        Ok(saved)
    }
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Zone Outcomes =====

    fn record_zone_crawl(&mut self, run_id: i64, crawl: &ZoneCrawl) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO zone_crawls (run_id, zone, outcome, pages_fetched, records, error, finished_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run_id,
                crawl.zone.as_str(),
                crawl.outcome.to_db_string(),
                crawl.pages_fetched,
                crawl.records.len() as i64,
                crawl.error,
                now,
            ],
        )?;
        Ok(())
    }

    fn get_zone_crawls(&self, run_id: i64) -> StorageResult<Vec<ZoneCrawlRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, zone, outcome, pages_fetched, records, error, finished_at
             FROM zone_crawls WHERE run_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![run_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut crawls = Vec::new();
        for row in rows {
            let (run_id, zone, outcome, pages_fetched, records, error, finished_at) = row?;
            let outcome = ZoneOutcome::from_db_string(&outcome)
                .ok_or_else(|| StorageError::InvalidValue(format!("zone outcome '{}'", outcome)))?;
            crawls.push(ZoneCrawlRecord {
                run_id,
                zone,
                outcome,
                pages_fetched,
                records: records as u64,
                error,
                finished_at,
            });
        }
        Ok(crawls)
    }

    // ===== Prices =====

    fn get_price(&self, zone: &str, registrar: &str) -> StorageResult<Option<StoredPrice>> {
        let price = self
            .conn
            .query_row(
                "SELECT zone, registrar, registrar_name, registrar_url,
                        registration_price, renewal_price, transfer_price,
                        currency, currency_name, source, crawled_at, created_at, updated_at
                 FROM pricing_data WHERE zone = ?1 AND registrar = ?2",
                params![zone, registrar],
                |row| {
                    Ok(StoredPrice {
                        zone: row.get(0)?,
                        registrar: row.get(1)?,
                        registrar_name: row.get(2)?,
                        registrar_url: row.get(3)?,
                        registration_price: row.get(4)?,
                        renewal_price: row.get(5)?,
                        transfer_price: row.get(6)?,
                        currency: row.get(7)?,
                        currency_name: row.get(8)?,
                        source: row.get(9)?,
                        crawled_at: row.get(10)?,
                        created_at: row.get(11)?,
                        updated_at: row.get(12)?,
                    })
                },
            )
            .optional()?;
        Ok(price)
    }

    // ===== Statistics =====

    fn count_prices(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pricing_data", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_distinct_zones(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(DISTINCT zone) FROM pricing_data", [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }

    fn count_distinct_registrars(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT registrar) FROM pricing_data",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_by_currency(&self) -> StorageResult<BTreeMap<String, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT currency, COUNT(*) FROM pricing_data GROUP BY currency")?;

        let rows = stmt.query_map([], |row| {
            let currency: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((currency, count as u64))
        })?;

        let mut summary = BTreeMap::new();
        for row in rows {
            let (currency, count) = row?;
            summary.insert(currency, count);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RegistrarId, Zone, SOURCE_TAG};
    use crate::price::Currency;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn record(zone: &str, slug: &str, registration: &str) -> PriceRecord {
        PriceRecord {
            zone: Zone::parse(zone).unwrap(),
            registrar: RegistrarId::from_profile(slug),
            registrar_name: slug.to_string(),
            registrar_url: format!("https://{}.example", slug),
            registration: Some(Decimal::from_str(registration).unwrap()),
            renewal: None,
            transfer: None,
            currency: Currency::Usd,
            crawled_at: Utc::now(),
            source: SOURCE_TAG,
        }
    }

    fn crawl(zone: &str, outcome: ZoneOutcome, records: Vec<PriceRecord>) -> ZoneCrawl {
        ZoneCrawl {
            zone: Zone::parse(zone).unwrap(),
            records,
            pages_fetched: 1,
            outcome,
            error: None,
        }
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pricing.db");
        assert!(SqliteStorage::new(&path).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_run_lifecycle() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage.get_latest_run().unwrap().is_none());

        let run_id = storage.create_run("abc123").unwrap();
        let run = storage.get_run(run_id).unwrap();
        assert_eq!(run.status, RunStatus::Running);
        assert!(run.finished_at.is_none());

        storage.finish_run(run_id, RunStatus::Completed).unwrap();
        let latest = storage.get_latest_run().unwrap().unwrap();
        assert_eq!(latest.id, run_id);
        assert_eq!(latest.status, RunStatus::Completed);
        assert_eq!(latest.config_hash, "abc123");
        assert!(latest.finished_at.is_some());
    }

    #[test]
    fn test_unknown_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert!(matches!(storage.get_run(42), Err(StorageError::RunNotFound(42))));
        assert!(storage.finish_run(42, RunStatus::Completed).is_err());
    }

    #[test]
    fn test_upsert_same_pair_keeps_one_row() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        let first = record("io", "spaceship", "30.00");
        assert_eq!(storage.upsert(&[first]).unwrap(), 1);
        let before = storage.get_price("io", "spaceship").unwrap().unwrap();

        let mut second = record("io", "spaceship", "28.50");
        second.registrar_name = "Spaceship Inc".to_string();
        second.currency = Currency::Eur;
        assert_eq!(storage.upsert(&[second]).unwrap(), 1);

        assert_eq!(storage.count_prices().unwrap(), 1);
        let after = storage.get_price("io", "spaceship").unwrap().unwrap();
        assert_eq!(after.registration_price.as_deref(), Some("28.50"));
        assert_eq!(after.registrar_name, "Spaceship Inc");
        assert_eq!(after.currency, "eur");
        assert_eq!(after.currency_name, "欧元");
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn test_absent_prices_stored_as_null() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.upsert(&[record("com", "porkbun", "11.08")]).unwrap();

        let stored = storage.get_price("com", "porkbun").unwrap().unwrap();
        assert_eq!(stored.registration_price.as_deref(), Some("11.08"));
        assert!(stored.renewal_price.is_none());
        assert!(stored.transfer_price.is_none());
        assert_eq!(stored.source, SOURCE_TAG);
    }

    #[test]
    fn test_empty_batch() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert_eq!(storage.upsert(&[]).unwrap(), 0);
    }

    #[test]
    fn test_statistics() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let mut cny = record("cn", "aliyun", "69");
        cny.currency = Currency::Cny;
        storage
            .upsert(&[
                record("com", "spaceship", "9.00"),
                record("io", "spaceship", "30.00"),
                record("com", "porkbun", "10.00"),
                cny,
            ])
            .unwrap();

        assert_eq!(storage.count_prices().unwrap(), 4);
        assert_eq!(storage.count_distinct_zones().unwrap(), 3);
        assert_eq!(storage.count_distinct_registrars().unwrap(), 3);

        let by_currency = storage.count_by_currency().unwrap();
        assert_eq!(by_currency.get("usd"), Some(&3));
        assert_eq!(by_currency.get("cny"), Some(&1));
    }

    #[test]
    fn test_zone_crawls_roundtrip() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("hash").unwrap();

        storage
            .record_zone_crawl(
                run_id,
                &crawl("com", ZoneOutcome::Complete, vec![record("com", "a", "1")]),
            )
            .unwrap();
        let mut failed = crawl("xxx", ZoneOutcome::FetchFailed, vec![]);
        failed.pages_fetched = 0;
        failed.error = Some("HTTP 500".to_string());
        storage.record_zone_crawl(run_id, &failed).unwrap();

        let crawls = storage.get_zone_crawls(run_id).unwrap();
        assert_eq!(crawls.len(), 2);
        assert_eq!(crawls[0].zone, "com");
        assert_eq!(crawls[0].outcome, ZoneOutcome::Complete);
        assert_eq!(crawls[0].records, 1);
        assert_eq!(crawls[1].outcome, ZoneOutcome::FetchFailed);
        assert_eq!(crawls[1].error.as_deref(), Some("HTTP 500"));
    }
}
