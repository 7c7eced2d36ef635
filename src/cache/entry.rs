//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::clock::duration_nanos;

// == Ttl ==
/// Per-call lifetime for a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Use the cache's default TTL
    #[default]
    Default,
    /// Never expire, whatever the default is
    Never,
    /// Expire once the duration has elapsed after insertion
    After(Duration),
}

impl Ttl {
    /// Resolves `Ttl::Default` against the cache default.
    ///
    /// Returns `None` when the entry should never expire.
    pub fn resolve(self, default_ttl: Duration) -> Option<Duration> {
        let ttl = match self {
            Ttl::Default => default_ttl,
            Ttl::Never => return None,
            Ttl::After(ttl) => ttl,
        };
        (!ttl.is_zero()).then_some(ttl)
    }
}

impl From<Duration> for Ttl {
    /// A zero duration selects the cache default.
    fn from(ttl: Duration) -> Self {
        if ttl.is_zero() {
            Ttl::Default
        } else {
            Ttl::After(ttl)
        }
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix nanoseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix nanoseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped at `now`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now` - Current time in Unix nanoseconds
    /// * `ttl` - Lifetime, or None to never expire
    pub fn new(value: V, now: i64, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|ttl| now.saturating_add(duration_nanos(ttl)));

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry stays fresh up to and including its expiry instant; it is
    /// stale only once `now` is strictly past it.
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has a TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining_at(&self, now: i64) -> Option<Duration> {
        self.expires_at.map(|expires| {
            let remaining = expires.saturating_sub(now).max(0);
            Duration::from_nanos(remaining as u64)
        })
    }

    /// Creation time as a UTC date-time.
    pub fn created_at_utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_nanos(self.created_at)
    }
}
