//! Request pacing
//!
//! The crawl inserts fixed pauses after each discovery probe, between pages of a
//! zone and between zones. Pacing sits behind the [`Throttle`] trait so tests can
//! drive the crawl with no delay at all.

use crate::config::CrawlerConfig;
use async_trait::async_trait;
use std::time::Duration;

/// The points in the crawl where a pause is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pause {
    AfterProbe,
    BetweenPages,
    BetweenZones,
}

/// Pacing strategy between requests
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Waits before the next request of the given kind
    async fn pause(&self, pause: Pause);
}

/// Sleeps for a fixed duration per pause kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelays {
    pub probe: Duration,
    pub page: Duration,
    pub zone: Duration,
}

impl FixedDelays {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            probe: Duration::from_millis(config.probe_delay_ms),
            page: Duration::from_millis(config.page_delay_ms),
            zone: Duration::from_millis(config.zone_delay_ms),
        }
    }

    pub fn delay_for(&self, pause: Pause) -> Duration {
        match pause {
            Pause::AfterProbe => self.probe,
            Pause::BetweenPages => self.page,
            Pause::BetweenZones => self.zone,
        }
    }
}

#[async_trait]
impl Throttle for FixedDelays {
    async fn pause(&self, pause: Pause) {
        let delay = self.delay_for(pause);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Throttle for NoDelay {
    async fn pause(&self, _pause: Pause) {}
}
