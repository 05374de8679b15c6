//! TLD price crawler main entry point
//!
//! This is the command-line interface for the registrar price crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tld_price_crawler::config::{candidate_zones, load_config_with_hash, Config};
use tld_price_crawler::crawler::run_crawl;
use tld_price_crawler::output::{load_statistics, print_statistics};
use tld_price_crawler::storage::SqliteStorage;
use tld_price_crawler::CrawlerError;
use tracing_subscriber::EnvFilter;

/// Collects registrar prices for every zone listed on the pricing site
///
/// Discovers the supported zones, walks each zone's paginated price table,
/// stores normalized prices in SQLite and writes JSON checkpoints and a
/// markdown summary.
#[derive(Parser, Debug)]
#[command(name = "tld-price-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Crawls registrar prices per top-level domain", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without touching the network
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using defaults"),
    }
    let (config, config_hash) = load_config_with_hash(cli.config.as_deref())
        .context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tld_price_crawler=info,warn"),
            1 => EnvFilter::new("tld_price_crawler=debug,info"),
            2 => EnvFilter::new("tld_price_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration and candidates
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let candidates = candidate_zones(&config.zones)?;

    println!("=== TLD Price Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Probe delay: {}ms", config.crawler.probe_delay_ms);
    println!("  Page delay: {}ms", config.crawler.page_delay_ms);
    println!("  Zone delay: {}ms", config.crawler.zone_delay_ms);
    println!("  Checkpoint every: {} zones", config.crawler.checkpoint_every);
    println!("  Max pages per zone: {}", config.crawler.max_pages);
    println!(
        "  Timeouts: {}s fetch, {}s probe",
        config.crawler.request_timeout_secs, config.crawler.probe_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.user_agent);
    println!("  Accept-Language: {}", config.user_agent.accept_language);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Checkpoints: {}", config.output.checkpoint_dir);
    println!("  Summary: {}", config.output.summary_path);

    println!("\nCandidate Zones ({}):", candidates.len());
    println!("  General: {}", config.zones.general.join(", "));
    println!("  New gTLD: {}", config.zones.new_gtld.join(", "));
    println!("  Country code: {}", config.zones.country_code.join(", "));
    println!("  Other: {}", config.zones.other.join(", "));

    println!("\n✓ Configuration is valid");
    println!("✓ Would probe {} candidate zones", candidates.len());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))
        .context("Failed to open database")?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String) -> anyhow::Result<()> {
    tracing::info!(
        "Candidate zones: {} general, {} new gTLD, {} country code, {} other",
        config.zones.general.len(),
        config.zones.new_gtld.len(),
        config.zones.country_code.len(),
        config.zones.other.len()
    );

    match run_crawl(config, config_hash).await {
        Ok(report) => {
            tracing::info!(
                "Crawl completed successfully: {} records across {} zones",
                report.total_records,
                report.stats.successful_zones
            );
            Ok(())
        }
        Err(CrawlerError::NoZonesVerified { candidates }) => {
            tracing::error!("No zones found among {} candidates, exiting", candidates);
            Err(CrawlerError::NoZonesVerified { candidates }.into())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
