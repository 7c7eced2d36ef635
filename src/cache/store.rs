//! Cache Store Module
//!
//! Main cache engine: a HashMap behind a reader/writer lock with lazy TTL
//! checks on read and an optional background sweep.

use std::collections::HashMap;
use std::mem;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, StatsRecorder, SystemClock, Ttl};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweep_task, Sweep};

type EntryMap<V> = HashMap<String, CacheEntry<V>>;

// == Shared State ==
/// State shared by every handle of one cache and its sweep task.
#[derive(Debug)]
struct Shared<V> {
    /// Key-value storage
    entries: RwLock<EntryMap<V>>,
    /// Capacity hint, reused when flushing
    initial_capacity: usize,
    /// TTL for `Ttl::Default`; zero means never expire
    default_ttl: Duration,
    /// Interval between sweep passes; zero disables sweeping
    sweep_interval: Duration,
    clock: Arc<dyn Clock>,
    stats: StatsRecorder,
}

impl<V> Shared<V> {
    // Every operation leaves the map consistent, so a poisoned lock is still
    // safe to use.
    fn read(&self) -> RwLockReadGuard<'_, EntryMap<V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EntryMap<V>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove_expired(&self) -> usize {
        let now = self.clock.now_nanos();
        let removed = {
            let mut entries = self.write();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            before - entries.len()
        };
        self.stats.record_sweep(removed);
        removed
    }
}

impl<V> Sweep for Shared<V>
where
    V: Send + Sync + 'static,
{
    fn sweep_expired(&self) -> usize {
        self.remove_expired()
    }
}

// == Cache ==
/// Thread-safe key-value cache with per-entry TTL.
///
/// Cloning a `Cache` is cheap and yields another handle to the same entries.
/// The background sweep (if enabled) stops once every handle is dropped.
#[derive(Debug)]
pub struct Cache<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a new cache and starts the background sweep when
    /// `sweep_interval` is non-zero.
    ///
    /// # Arguments
    /// * `initial_capacity` - Capacity hint for the entry map (not a limit)
    /// * `default_ttl` - TTL used by `Ttl::Default`; zero means never expire
    /// * `sweep_interval` - Interval between sweep passes; zero disables sweeping
    pub fn new(initial_capacity: usize, default_ttl: Duration, sweep_interval: Duration) -> Self {
        Self::from_config(&CacheConfig {
            initial_capacity,
            default_ttl,
            sweep_interval,
        })
    }

    /// Creates a cache from configuration using the system clock.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let shared = Arc::new(Shared {
            entries: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            initial_capacity: config.initial_capacity,
            default_ttl: config.default_ttl,
            sweep_interval: config.sweep_interval,
            clock,
            stats: StatsRecorder::new(),
        });

        debug!(
            initial_capacity = config.initial_capacity,
            default_ttl = ?config.default_ttl,
            sweep_interval = ?config.sweep_interval,
            "Cache created"
        );

        if config.sweep_enabled() {
            spawn_sweep_task(Arc::downgrade(&shared), config.sweep_interval);
        }

        Self { shared }
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// A zero duration (or `Ttl::Default`) applies the cache's default TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Lifetime of the entry
    pub fn set(&self, key: impl Into<String>, value: V, ttl: impl Into<Ttl>) {
        let ttl = ttl.into().resolve(self.shared.default_ttl);
        let entry = CacheEntry::new(value, self.shared.clock.now_nanos(), ttl);

        self.shared.write().insert(key.into(), entry);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// An expired entry yields `CacheError::Stale` and is left in place for
    /// `delete` or the sweep to remove.
    pub fn get(&self, key: &str) -> Result<V> {
        let now = self.shared.clock.now_nanos();
        let entries = self.shared.read();

        match entries.get(key) {
            None => {
                self.shared.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
            Some(entry) if entry.is_expired_at(now) => {
                self.shared.stats.record_stale();
                Err(CacheError::Stale(key.to_string()))
            }
            Some(entry) => {
                self.shared.stats.record_hit();
                Ok(entry.value.clone())
            }
        }
    }

    // == Get Multi ==
    /// Retrieves several values at once.
    ///
    /// The result has one slot per key, in order; absent and stale keys are
    /// `None`.
    pub fn get_multi<K: AsRef<str>>(&self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.get(key.as_ref()).ok()).collect()
    }

    // == Delete ==
    /// Removes an entry by key.
    pub fn delete(&self, key: &str) -> Result<()> {
        match self.shared.write().remove(key) {
            Some(_) => Ok(()),
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Exists ==
    /// Returns true if the key is present, expired or not.
    pub fn exists(&self, key: &str) -> bool {
        self.shared.read().contains_key(key)
    }

    // == Is Expired ==
    /// Reports whether the entry for `key` is past its expiry.
    pub fn is_expired(&self, key: &str) -> Result<bool> {
        let now = self.shared.clock.now_nanos();
        self.shared
            .read()
            .get(key)
            .map(|entry| entry.is_expired_at(now))
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    // == TTL ==
    /// Returns the remaining lifetime of a fresh entry, or None if it never
    /// expires.
    pub fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        let now = self.shared.clock.now_nanos();
        let entries = self.shared.read();

        let entry = entries
            .get(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        if entry.is_expired_at(now) {
            return Err(CacheError::Stale(key.to_string()));
        }
        Ok(entry.ttl_remaining_at(now))
    }

    // == Flush All ==
    /// Discards every entry.
    ///
    /// The map is swapped under the write lock; the old entries are dropped
    /// after the lock is released.
    pub fn flush_all(&self) {
        let fresh = HashMap::with_capacity(self.shared.initial_capacity);
        let old = mem::replace(&mut *self.shared.write(), fresh);

        debug!(flushed = old.len(), "Cache flushed");
        drop(old);
    }

    // == Purge Expired ==
    /// Runs one sweep pass now.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.shared.remove_expired()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.shared.stats.snapshot(self.len())
    }

    // == Length ==
    /// Returns the number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.shared.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.read().is_empty()
    }

    pub fn default_ttl(&self) -> Duration {
        self.shared.default_ttl
    }

    pub fn sweep_interval(&self) -> Duration {
        self.shared.sweep_interval
    }
}
