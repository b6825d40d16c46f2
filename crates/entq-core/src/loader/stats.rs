//! Loader statistics.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Counters for one loader instance.
#[derive(Debug, Default)]
pub struct LoaderStats {
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
}

impl LoaderStats {
    /// Keys served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(AtomicOrdering::Relaxed)
    }

    /// Keys that had to be fetched.
    pub fn misses(&self) -> u64 {
        self.misses.load(AtomicOrdering::Relaxed)
    }

    /// Batch-fetch invocations issued.
    pub fn fetches(&self) -> u64 {
        self.fetches.load(AtomicOrdering::Relaxed)
    }

    /// Hit rate over all requested keys (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }

    pub(crate) fn record_hits(&self, count: u64) {
        self.hits.fetch_add(count, AtomicOrdering::Relaxed);
    }

    pub(crate) fn record_misses(&self, count: u64) {
        self.misses.fetch_add(count, AtomicOrdering::Relaxed);
    }

    pub(crate) fn record_fetch(&self) {
        self.fetches.fetch_add(1, AtomicOrdering::Relaxed);
    }
}
