//! Cache Module
//!
//! Provides the in-process TTL cache: entries, clocks, statistics and the
//! lock-guarded store.

mod clock;
mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, Ttl};
pub use stats::CacheStats;
pub(crate) use stats::StatsRecorder;
pub use store::Cache;
