//! Backend Statistics Module
//!
//! Tracks memoization cache hits and misses for operation reads.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Backend Stats ==
/// Snapshot of backend read statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackendStats {
    /// Operation reads served from the memoization cache
    pub cache_hits: u64,
    /// Operation reads that went to the engine
    pub cache_misses: u64,
    /// Number of completed operations held in the cache
    pub cached_operations: usize,
}

impl BackendStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

// == Stats Counters ==
/// Lock-free counters behind [`BackendStats`].
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, cached_operations: usize) -> BackendStats {
        BackendStats {
            cache_hits: self.hits.load(Ordering::Relaxed),
            cache_misses: self.misses.load(Ordering::Relaxed),
            cached_operations,
        }
    }
}
