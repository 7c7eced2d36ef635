//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, stale reads and sweep work.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of lookups for absent keys
    pub misses: u64,
    /// Number of lookups that found an expired entry
    pub stale_reads: u64,
    /// Number of sweep passes run
    pub sweeps: u64,
    /// Number of entries removed by sweep passes
    pub swept_entries: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses + stale_reads), or 0.0 if no lookups have
    /// been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.stale_reads;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters updated from both read and write paths.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    stale_reads: AtomicU64,
    sweeps: AtomicU64,
    swept_entries: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale(&self) {
        self.stale_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one sweep pass and how many entries it removed.
    pub(crate) fn record_sweep(&self, removed: usize) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.swept_entries
            .fetch_add(removed as u64, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Builds a snapshot with the given entry count.
    pub(crate) fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale_reads: self.stale_reads.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            swept_entries: self.swept_entries.load(Ordering::Relaxed),
            total_entries,
        }
    }
}
