//! Output module for checkpoints, statistics and crawl summaries
//!
//! This module handles:
//! - Writing JSON checkpoint artifacts during and after a crawl
//! - Computing run statistics and loading database statistics
//! - Generating the human-readable completion summary

mod checkpoint;
mod markdown;
pub mod stats;
mod traits;

pub use checkpoint::{
    CheckpointWriter, JsonCheckpointStore, CRAWL_STATS_FILE, FAILED_ZONES_FILE,
    REGISTRARS_FILE, SUPPORT_MATRIX_FILE, ZONES_FILE,
};
pub use markdown::{format_markdown_summary, format_summary_lines, generate_markdown_summary};
pub use stats::{load_statistics, print_statistics, CrawlStats, DatabaseStatistics};
pub use traits::{
    CheckpointSnapshot, CheckpointStore, CrawlReport, OutputError, OutputResult,
    FAILED_ZONE_PREVIEW,
};
