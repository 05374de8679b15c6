//! Per-zone pagination
//!
//! Walks `/domain/<zone>/1`, `/domain/<zone>/2`, ... until the listing runs out,
//! a fetch fails or the page cap is reached. Failures never leave this module:
//! they are folded into the returned [`ZoneCrawl`]. A fetch failure on any page
//! discards the zone's records and marks it failed.

use crate::crawler::endpoints::ListingEndpoints;
use crate::crawler::fetcher::{FetchError, PageFetcher};
use crate::crawler::parser::parse_listing_page;
use crate::crawler::throttle::{Pause, Throttle};
use crate::model::{PriceRecord, Zone};
use crate::state::{CrawlState, ZoneOutcome};

/// Result of crawling one zone
#[derive(Debug, Clone)]
pub struct ZoneCrawl {
    pub zone: Zone,
    pub records: Vec<PriceRecord>,
    pub pages_fetched: u32,
    pub outcome: ZoneOutcome,
    /// Fetch error that ended the crawl, if any
    pub error: Option<String>,
}

impl ZoneCrawl {
    pub fn is_failed(&self) -> bool {
        self.outcome.is_failed()
    }
}

pub struct ZoneCrawler<'a> {
    fetcher: &'a dyn PageFetcher,
    throttle: &'a dyn Throttle,
    endpoints: &'a ListingEndpoints,
    max_pages: u32,
}

impl<'a> ZoneCrawler<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        throttle: &'a dyn Throttle,
        endpoints: &'a ListingEndpoints,
        max_pages: u32,
    ) -> Self {
        Self {
            fetcher,
            throttle,
            endpoints,
            max_pages: max_pages.max(1),
        }
    }

    /// Crawls every listing page of a zone
    ///
    /// Outcomes:
    /// - fetch failure on any page: `FetchFailed`, no records
    /// - page 1 with zero records: `Empty`
    /// - page cap reached while more pages are advertised: `Truncated`
    /// - otherwise `Complete`
    pub async fn crawl(&self, zone: &Zone) -> ZoneCrawl {
        let mut state = CrawlState::start();
        let mut records: Vec<PriceRecord> = Vec::new();
        let mut pages_fetched = 0u32;

        loop {
            match state {
                CrawlState::Fetching { page } => {
                    let body = match self.fetch_page(zone, page).await {
                        Ok(body) => body,
                        Err(e) => {
                            tracing::warn!("Fetch failed for .{} page {}: {}", zone, page, e);
                            if !records.is_empty() {
                                tracing::warn!(
                                    "Discarding {} records already parsed for .{}",
                                    records.len(),
                                    zone
                                );
                            }
                            return ZoneCrawl {
                                zone: zone.clone(),
                                records: Vec::new(),
                                pages_fetched,
                                outcome: ZoneOutcome::FetchFailed,
                                error: Some(e.to_string()),
                            };
                        }
                    };
                    pages_fetched += 1;

                    let parsed = parse_listing_page(&body, zone, page);
                    let found = parsed.records.len();
                    tracing::info!("  .{} page {}: {} records", zone, page, found);

                    records.extend(parsed.records);
                    state = state.after_page(found, parsed.has_next_page);
                }
                CrawlState::HasResults { page } => {
                    if page >= self.max_pages {
                        tracing::warn!(
                            "Stopping .{} at page cap {} with more pages advertised",
                            zone,
                            self.max_pages
                        );
                        return ZoneCrawl {
                            zone: zone.clone(),
                            records,
                            pages_fetched,
                            outcome: ZoneOutcome::Truncated,
                            error: None,
                        };
                    }
                    self.throttle.pause(Pause::BetweenPages).await;
                    state = state.advance();
                }
                CrawlState::Exhausted => {
                    // Only page 1 can leave the record list empty
                    let outcome = if records.is_empty() {
                        ZoneOutcome::Empty
                    } else {
                        ZoneOutcome::Complete
                    };
                    return ZoneCrawl {
                        zone: zone.clone(),
                        records,
                        pages_fetched,
                        outcome,
                        error: None,
                    };
                }
            }
        }
    }

    async fn fetch_page(&self, zone: &Zone, page: u32) -> Result<String, FetchError> {
        let url = self.endpoints.page_url(zone, page);
        let response = self.fetcher.fetch(&url).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status,
            });
        }
        Ok(response.body)
    }
}
