//! Clock Module
//!
//! Wall-clock sources used to stamp and expire entries.

use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;

// == Clock Trait ==
/// Source of the current time as Unix nanoseconds.
pub trait Clock: Debug + Send + Sync {
    fn now_nanos(&self) -> i64;
}

// == System Clock ==
/// Reads the host wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> i64 {
        // Out of range only after the year 2262.
        Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Useful for exercising expiry without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    nanos: AtomicI64,
}

impl ManualClock {
    /// Creates a manual clock frozen at the current wall-clock time.
    pub fn new() -> Self {
        Self::starting_at(SystemClock.now_nanos())
    }

    /// Creates a manual clock frozen at the given Unix nanosecond timestamp.
    pub fn starting_at(nanos: i64) -> Self {
        Self {
            nanos: AtomicI64::new(nanos),
        }
    }

    /// Moves the clock forward, saturating at `i64::MAX`.
    pub fn advance(&self, by: Duration) {
        let by = duration_nanos(by);
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |nanos| {
                Some(nanos.saturating_add(by))
            });
    }

    pub fn set_nanos(&self, nanos: i64) {
        self.nanos.store(nanos, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> i64 {
        self.nanos.load(Ordering::SeqCst)
    }
}

/// Converts a duration to nanoseconds, saturating at `i64::MAX`.
pub(crate) fn duration_nanos(duration: Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}
