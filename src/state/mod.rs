//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: Pagination state machine for a single zone
//! - `ZoneOutcome`: How a zone crawl ended and whether the zone counts as failed
//! - `Aggregator`: Run-wide registrar set, support matrix and failed zones

mod aggregator;
mod zone_state;

pub use aggregator::{Aggregator, SupportMatrix};
pub use zone_state::{CrawlState, ZoneOutcome};
