//! Zone discovery
//!
//! Probes each candidate zone's landing page with a HEAD request and keeps the
//! ones the pricing site answers with a success status.

use crate::crawler::endpoints::ListingEndpoints;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::throttle::{Pause, Throttle};
use crate::model::Zone;

/// Log discovery progress after this many candidates
const PROGRESS_INTERVAL: usize = 10;

pub struct ZoneDiscovery<'a> {
    fetcher: &'a dyn PageFetcher,
    throttle: &'a dyn Throttle,
    endpoints: &'a ListingEndpoints,
}

impl<'a> ZoneDiscovery<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        throttle: &'a dyn Throttle,
        endpoints: &'a ListingEndpoints,
    ) -> Self {
        Self {
            fetcher,
            throttle,
            endpoints,
        }
    }

    /// Returns the verified candidates in input order
    ///
    /// A candidate is verified only when its probe returns a 2xx status. Other
    /// statuses and transport errors exclude it; there is no retry.
    pub async fn discover(&self, candidates: &[Zone]) -> Vec<Zone> {
        tracing::info!("Probing {} candidate zones", candidates.len());

        let mut verified = Vec::new();
        for (index, zone) in candidates.iter().enumerate() {
            let url = self.endpoints.zone_url(zone);
            match self.fetcher.probe(&url).await {
                Ok(status) if (200..300).contains(&status) => {
                    tracing::debug!("Verified .{} ({})", zone, status);
                    verified.push(zone.clone());
                }
                Ok(status) => {
                    tracing::debug!("Excluded .{}: HTTP {}", zone, status);
                }
                Err(e) => {
                    tracing::debug!("Excluded .{}: {}", zone, e);
                }
            }

            self.throttle.pause(Pause::AfterProbe).await;

            if (index + 1) % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Probed {}/{} candidates, {} verified",
                    index + 1,
                    candidates.len(),
                    verified.len()
                );
            }
        }

        tracing::info!(
            "Discovery finished: {} of {} candidates verified",
            verified.len(),
            candidates.len()
        );
        verified
    }
}
