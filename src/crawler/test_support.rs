//! Scripted fetcher, throttle and checkpoint store used by the crawler unit tests

use crate::crawler::fetcher::{FetchError, FetchResponse, PageFetcher};
use crate::crawler::throttle::{Pause, Throttle};
use crate::model::Zone;
use crate::output::{CheckpointSnapshot, CheckpointStore, OutputResult};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// Builds a listing page with one price row per slug
pub fn listing_html(slugs: &[&str], has_next: bool) -> String {
    let rows: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<tr><td><a href="/registrar/{slug}">{slug}</a></td>
                <td>$10.00</td><td>$12.00</td><td>--</td>
                <td><a href="https://{slug}.example">Go</a></td></tr>"#
            )
        })
        .collect();
    let pager = if has_next {
        r##"<a href="#">下一页</a>"##
    } else {
        ""
    };
    format!(
        r#"<html><body><table class="table"><tbody>{}</tbody></table>{}</body></html>"#,
        rows, pager
    )
}

/// Serves canned responses keyed by URL; unknown URLs answer 404
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Result<FetchResponse, FetchError>>,
    probes: HashMap<String, Result<u16, FetchError>>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: String) -> Self {
        self.pages
            .insert(url.to_string(), Ok(FetchResponse { status: 200, body }));
        self
    }

    pub fn page_status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(
            url.to_string(),
            Ok(FetchResponse {
                status,
                body: String::new(),
            }),
        );
        self
    }

    pub fn page_error(mut self, url: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Err(FetchError::Transport {
                url: url.to_string(),
                message: "connection reset".to_string(),
            }),
        );
        self
    }

    pub fn probe(mut self, url: &str, status: u16) -> Self {
        self.probes.insert(url.to_string(), Ok(status));
        self
    }

    pub fn probe_error(mut self, url: &str) -> Self {
        self.probes.insert(
            url.to_string(),
            Err(FetchError::Transport {
                url: url.to_string(),
                message: "Request timeout".to_string(),
            }),
        );
        self
    }

    /// URLs requested so far, in order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().unwrap_or(Ok(FetchResponse {
            status: 404,
            body: String::new(),
        }))
    }

    async fn probe(&self, url: &str) -> Result<u16, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.probes.get(url).cloned().unwrap_or(Ok(404))
    }
}

/// Records every pause without sleeping
#[derive(Default)]
pub struct RecordingThrottle {
    pauses: Mutex<Vec<Pause>>,
}

impl RecordingThrottle {
    pub fn pauses(&self) -> Vec<Pause> {
        self.pauses.lock().unwrap().clone()
    }

    pub fn count(&self, pause: Pause) -> usize {
        self.pauses().into_iter().filter(|p| *p == pause).count()
    }
}

#[async_trait]
impl Throttle for RecordingThrottle {
    async fn pause(&self, pause: Pause) {
        self.pauses.lock().unwrap().push(pause);
    }
}

/// Records which zones each snapshot covered; clones share the same log
#[derive(Clone, Default)]
pub struct RecordingCheckpoints {
    zone_lists: Arc<Mutex<Vec<Vec<String>>>>,
    snapshots: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingCheckpoints {
    pub fn zone_lists(&self) -> Vec<Vec<String>> {
        self.zone_lists.lock().unwrap().clone()
    }

    /// Sorted zones present in each snapshot, either supported or failed
    pub fn snapshots(&self) -> Vec<Vec<String>> {
        self.snapshots.lock().unwrap().clone()
    }
}

impl CheckpointStore for RecordingCheckpoints {
    fn write_zone_list(&self, zones: &[Zone]) -> OutputResult<()> {
        let zones = zones.iter().map(|z| z.to_string()).collect();
        self.zone_lists.lock().unwrap().push(zones);
        Ok(())
    }

    fn write_snapshot(&self, snapshot: &CheckpointSnapshot<'_>) -> OutputResult<()> {
        let covered: BTreeSet<String> = snapshot
            .support_matrix
            .values()
            .flatten()
            .chain(snapshot.failed_zones)
            .map(|z| z.to_string())
            .collect();
        self.snapshots
            .lock()
            .unwrap()
            .push(covered.into_iter().collect());
        Ok(())
    }
}
