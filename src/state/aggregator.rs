//! Run-wide accumulators
//!
//! The [`Aggregator`] owns the registrar set, the support matrix and the failed
//! zone list for one crawl. Folding is idempotent: replaying the same records
//! leaves every structure unchanged.

use crate::model::{PriceRecord, Zone};
use std::collections::{BTreeMap, BTreeSet};

/// Registrar key to the zones it prices, each zone listed once in first-seen order
pub type SupportMatrix = BTreeMap<String, Vec<Zone>>;

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    registrars: BTreeSet<String>,
    support_matrix: SupportMatrix,
    failed_zones: Vec<Zone>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a batch of records into the registrar set and support matrix
    pub fn fold(&mut self, records: &[PriceRecord]) {
        for record in records {
            let key = record.registrar_key();
            self.registrars.insert(key.clone());

            let zones = self.support_matrix.entry(key).or_default();
            if !zones.contains(&record.zone) {
                zones.push(record.zone.clone());
            }
        }
    }

    /// Adds a zone to the failed list; returns false if it was already there
    pub fn mark_failed(&mut self, zone: &Zone) -> bool {
        if self.failed_zones.contains(zone) {
            return false;
        }
        self.failed_zones.push(zone.clone());
        true
    }

    pub fn registrars(&self) -> &BTreeSet<String> {
        &self.registrars
    }

    pub fn support_matrix(&self) -> &SupportMatrix {
        &self.support_matrix
    }

    pub fn failed_zones(&self) -> &[Zone] {
        &self.failed_zones
    }

    /// Number of (registrar, zone) pairs in the support matrix
    pub fn total_combinations(&self) -> usize {
        self.support_matrix.values().map(Vec::len).sum()
    }
}
