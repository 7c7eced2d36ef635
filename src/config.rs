//! Configuration Module
//!
//! Handles cache construction parameters, with defaults and environment loading.

use std::env;
use std::time::Duration;

/// Cache construction parameters.
///
/// A zero `default_ttl` means entries live forever unless a TTL is given per
/// call. A zero `sweep_interval` disables the background sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Capacity hint for the entry map, reused on flush
    pub initial_capacity: usize,
    /// TTL applied when `set` is called with `Ttl::Default`
    pub default_ttl: Duration,
    /// Interval between background sweep passes
    pub sweep_interval: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_INITIAL_CAPACITY` - Map capacity hint (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds, 0 = forever (default: 300000)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep interval in milliseconds, 0 = disabled (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_capacity: env_parse("CACHE_INITIAL_CAPACITY")
                .unwrap_or(defaults.initial_capacity),
            default_ttl: env_parse("CACHE_DEFAULT_TTL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.default_ttl),
            sweep_interval: env_parse("CACHE_SWEEP_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.sweep_interval),
        }
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_default_ttl(mut self, default_ttl: Duration) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    /// Returns true if the background sweep should run.
    pub fn sweep_enabled(&self) -> bool {
        !self.sweep_interval.is_zero()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1000,
            default_ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(1),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
