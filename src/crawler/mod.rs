//! Crawler module for discovering zones and collecting registrar prices
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and existence probes
//! - Listing page parsing and row extraction
//! - Request pacing
//! - Per-zone pagination and overall crawl coordination

mod coordinator;
mod discovery;
mod endpoints;
mod fetcher;
mod parser;
mod row;
mod throttle;
mod zone_crawler;

#[cfg(test)]
mod test_support;

pub use coordinator::{run_crawl, Coordinator};
pub use discovery::ZoneDiscovery;
pub use endpoints::ListingEndpoints;
pub use fetcher::{build_http_client, FetchError, FetchResponse, HttpFetcher, PageFetcher};
pub use parser::{parse_listing_page, ParsedListing};
pub use row::{extract_row, extract_row_at, registrar_identity, CellLink, RowCell, MIN_ROW_CELLS};
pub use throttle::{FixedDelays, NoDelay, Pause, Throttle};
pub use zone_crawler::{ZoneCrawl, ZoneCrawler};
