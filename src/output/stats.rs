//! Crawl statistics
//!
//! Two views are provided:
//! - [`CrawlStats`], computed from the in-memory aggregator during a run and
//!   written with every checkpoint
//! - [`DatabaseStatistics`], loaded from storage for the `--stats` report

use crate::model::Zone;
use crate::state::Aggregator;
use crate::storage::{RunRecord, Storage, StorageResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-registrar coverage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrarCoverage {
    pub supported_zones: usize,
    pub zone_list: Vec<Zone>,
}

/// Run statistics derived from the aggregator
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub crawl_time: DateTime<Utc>,
    pub total_zones: usize,
    pub successful_zones: usize,
    pub failed_zones: usize,
    pub total_registrars: usize,
    pub total_combinations: usize,
    /// Percentage of verified zones that produced records
    pub success_rate: f64,
    pub registrar_stats: BTreeMap<String, RegistrarCoverage>,
    pub failed_zone_list: Vec<Zone>,
}

impl CrawlStats {
    /// Computes stats for a run over `total_zones` verified zones
    pub fn compute(total_zones: usize, aggregator: &Aggregator) -> Self {
        Self::compute_at(total_zones, aggregator, Utc::now())
    }

    pub fn compute_at(total_zones: usize, aggregator: &Aggregator, crawl_time: DateTime<Utc>) -> Self {
        let failed_zones = aggregator.failed_zones().len();
        let successful_zones = total_zones.saturating_sub(failed_zones);
        let success_rate = if total_zones > 0 {
            successful_zones as f64 / total_zones as f64 * 100.0
        } else {
            0.0
        };

        let registrar_stats = aggregator
            .support_matrix()
            .iter()
            .map(|(registrar, zones)| {
                (
                    registrar.clone(),
                    RegistrarCoverage {
                        supported_zones: zones.len(),
                        zone_list: zones.clone(),
                    },
                )
            })
            .collect();

        Self {
            crawl_time,
            total_zones,
            successful_zones,
            failed_zones,
            total_registrars: aggregator.registrars().len(),
            total_combinations: aggregator.total_combinations(),
            success_rate,
            registrar_stats,
            failed_zone_list: aggregator.failed_zones().to_vec(),
        }
    }

    /// Registrars ordered by zone coverage, widest first, ties by key
    pub fn top_registrars(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .registrar_stats
            .iter()
            .map(|(key, coverage)| (key.as_str(), coverage.supported_zones))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }
}

/// Statistics loaded from the pricing database
#[derive(Debug, Clone)]
pub struct DatabaseStatistics {
    pub total_prices: u64,
    pub distinct_zones: u64,
    pub distinct_registrars: u64,
    pub prices_by_currency: BTreeMap<String, u64>,
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<DatabaseStatistics> {
    Ok(DatabaseStatistics {
        total_prices: storage.count_prices()?,
        distinct_zones: storage.count_distinct_zones()?,
        distinct_registrars: storage.count_distinct_registrars()?,
        prices_by_currency: storage.count_by_currency()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &DatabaseStatistics) {
    println!("=== Pricing Database Statistics ===\n");

    println!("Overview:");
    println!("  Price rows: {}", stats.total_prices);
    println!("  Zones: {}", stats.distinct_zones);
    println!("  Registrars: {}", stats.distinct_registrars);
    println!();

    if !stats.prices_by_currency.is_empty() {
        println!("Rows by Currency:");
        let mut counts: Vec<_> = stats.prices_by_currency.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));

        for (currency, count) in counts {
            let percentage = if stats.total_prices > 0 {
                (*count as f64 / stats.total_prices as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", currency, count, percentage);
        }
        println!();
    }

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run:");
            println!("  ID: {}", run.id);
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!("  Status: {}", run.status);
        }
        None => println!("No crawl runs recorded yet."),
    }
}
