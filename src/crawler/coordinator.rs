//! Crawler coordinator - main crawl orchestration logic
//!
//! This module runs one full crawl:
//! - Discovering which candidate zones the pricing site lists
//! - Crawling each verified zone and saving its records immediately
//! - Folding records into the run aggregator and writing checkpoints
//! - Recording run and zone outcomes, then producing the completion summary

use crate::config::{candidate_zones, Config};
use crate::crawler::discovery::ZoneDiscovery;
use crate::crawler::endpoints::ListingEndpoints;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::throttle::{FixedDelays, Pause, Throttle};
use crate::crawler::zone_crawler::ZoneCrawler;
use crate::output::{
    format_summary_lines, generate_markdown_summary, CheckpointStore, CheckpointWriter,
    CrawlReport, CrawlStats, JsonCheckpointStore,
};
use crate::state::Aggregator;
use crate::storage::{PriceSink, RunStatus, SqliteStorage, Storage};
use crate::CrawlerError;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    config_hash: String,
    fetcher: Arc<dyn PageFetcher>,
    throttle: Arc<dyn Throttle>,
    storage: SqliteStorage,
    checkpoints: CheckpointWriter,
    endpoints: ListingEndpoints,
}

impl Coordinator {
    /// Creates a coordinator with the HTTP fetcher, fixed delays, the SQLite
    /// database and JSON checkpoints described by the configuration
    pub fn new(config: Config, config_hash: String) -> Result<Self, CrawlerError> {
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

        let fetcher = HttpFetcher::from_config(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
            Duration::from_secs(config.crawler.probe_timeout_secs),
        )?;
        let throttle = FixedDelays::from_config(&config.crawler);
        let store = JsonCheckpointStore::new(&config.output.checkpoint_dir);

        Ok(Self::with_components(
            config,
            config_hash,
            Arc::new(fetcher),
            Arc::new(throttle),
            storage,
            Box::new(store),
        ))
    }

    /// Creates a coordinator from explicit components
    pub fn with_components(
        config: Config,
        config_hash: String,
        fetcher: Arc<dyn PageFetcher>,
        throttle: Arc<dyn Throttle>,
        storage: SqliteStorage,
        checkpoint_store: Box<dyn CheckpointStore>,
    ) -> Self {
        let endpoints = ListingEndpoints::new(&config.crawler.base_url);
        let checkpoints = CheckpointWriter::new(checkpoint_store, config.crawler.checkpoint_every);

        Self {
            config,
            config_hash,
            fetcher,
            throttle,
            storage,
            checkpoints,
            endpoints,
        }
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Runs discovery and then crawls every verified zone
    ///
    /// Returns [`CrawlerError::NoZonesVerified`] when discovery verifies
    /// nothing; the run is recorded as aborted. Zone-level failures never end
    /// the run. Checkpoint and summary write failures are logged and skipped.
    pub async fn run(&mut self) -> Result<CrawlReport, CrawlerError> {
        let started_at = Utc::now();
        let candidates = candidate_zones(&self.config.zones)?;
        let run_id = self.storage.create_run(&self.config_hash)?;
        tracing::info!("Starting crawl run {}", run_id);

        tracing::info!("Phase 1: discovering supported zones");
        let discovery = ZoneDiscovery::new(
            self.fetcher.as_ref(),
            self.throttle.as_ref(),
            &self.endpoints,
        );
        let zones = discovery.discover(&candidates).await;

        if zones.is_empty() {
            tracing::error!(
                "No zones verified out of {} candidates, aborting",
                candidates.len()
            );
            self.storage.finish_run(run_id, RunStatus::Aborted)?;
            return Err(CrawlerError::NoZonesVerified {
                candidates: candidates.len(),
            });
        }

        if let Err(e) = self.checkpoints.write_zone_list(&zones) {
            tracing::warn!("Failed to write zone list: {}", e);
        }

        tracing::info!("Phase 2: crawling {} zones for registrar data", zones.len());
        let crawler = ZoneCrawler::new(
            self.fetcher.as_ref(),
            self.throttle.as_ref(),
            &self.endpoints,
            self.config.crawler.max_pages,
        );

        let mut aggregator = Aggregator::new();
        let mut total_records = 0usize;
        let mut saved_records = 0usize;

        for (index, zone) in zones.iter().enumerate() {
            tracing::info!("Progress: {}/{} - crawling .{}", index + 1, zones.len(), zone);

            let crawl = crawler.crawl(zone).await;

            if !crawl.records.is_empty() {
                match self.storage.upsert(&crawl.records) {
                    Ok(saved) => {
                        tracing::info!("Saved {} records for .{}", saved, zone);
                        saved_records += saved;
                    }
                    Err(e) => tracing::error!("Failed to save records for .{}: {}", zone, e),
                }
            }

            total_records += crawl.records.len();
            aggregator.fold(&crawl.records);
            if crawl.is_failed() {
                aggregator.mark_failed(zone);
                tracing::warn!("No price data for .{} ({})", zone, crawl.outcome);
            }

            if let Err(e) = self.storage.record_zone_crawl(run_id, &crawl) {
                tracing::warn!("Failed to record outcome for .{}: {}", zone, e);
            }

            if self.checkpoints.is_due(index + 1) {
                match self.checkpoints.checkpoint(&aggregator, zones.len()) {
                    Ok(_) => tracing::info!(
                        "Progress saved: {} total records so far",
                        total_records
                    ),
                    Err(e) => tracing::warn!("Checkpoint failed: {}", e),
                }
            }

            if index + 1 < zones.len() {
                self.throttle.pause(Pause::BetweenZones).await;
            }
        }

        let stats = match self.checkpoints.checkpoint(&aggregator, zones.len()) {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!("Final checkpoint failed: {}", e);
                CrawlStats::compute(zones.len(), &aggregator)
            }
        };

        self.storage.finish_run(run_id, RunStatus::Completed)?;

        let report = CrawlReport {
            run_id,
            config_hash: self.config_hash.clone(),
            started_at,
            finished_at: Utc::now(),
            stats,
            total_records,
            saved_records,
        };

        for line in format_summary_lines(&report) {
            tracing::info!("{}", line);
        }

        let summary_path = Path::new(&self.config.output.summary_path);
        match generate_markdown_summary(&report, summary_path) {
            Ok(()) => tracing::info!("Summary written to {}", summary_path.display()),
            Err(e) => tracing::warn!("Failed to write summary: {}", e),
        }

        Ok(report)
    }
}

/// Runs a complete crawl with the components described by `config`
pub async fn run_crawl(config: Config, config_hash: String) -> Result<CrawlReport, CrawlerError> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}
