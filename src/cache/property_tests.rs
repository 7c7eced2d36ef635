//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, ManualClock};
use crate::config::CacheConfig;
use crate::error::CacheError;

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;

fn test_cache() -> (Cache<String>, Arc<ManualClock>) {
    let config = CacheConfig::default()
        .with_initial_capacity(TEST_CAPACITY)
        .with_default_ttl(Duration::ZERO)
        .with_sweep_interval(Duration::ZERO);
    let clock = Arc::new(ManualClock::new());
    (Cache::with_clock(&config, clock.clone()), clock)
}

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}"
}

/// TTL in milliseconds, 0 = never expire
fn ttl_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), 1u64..200]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String, ttl_ms: u64 },
    Get { key: String },
    Delete { key: String },
    Exists { key: String },
    Advance { ms: u64 },
    Purge,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy(), ttl_strategy())
            .prop_map(|(key, value, ttl_ms)| CacheOp::Set { key, value, ttl_ms }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
        key_strategy().prop_map(|key| CacheOp::Exists { key }),
        (1u64..100).prop_map(|ms| CacheOp::Advance { ms }),
        Just(CacheOp::Purge),
    ]
}

/// Model entry: value plus absolute expiry in model milliseconds
#[derive(Debug, Clone)]
struct ModelEntry {
    value: String,
    expires_at: Option<u64>,
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a value and reading it back before expiry returns the same value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let (cache, _) = test_cache();

        cache.set(key.clone(), value.clone(), Duration::ZERO);

        prop_assert_eq!(cache.get(&key).unwrap(), value);
    }

    // After a delete, the key reports absence on every accessor.
    #[test]
    fn prop_delete_removes_entry(key in key_strategy(), value in value_strategy()) {
        let (cache, _) = test_cache();

        cache.set(key.clone(), value, Duration::ZERO);
        prop_assert!(cache.exists(&key));

        cache.delete(&key).unwrap();

        prop_assert_eq!(cache.get(&key), Err(CacheError::NotFound(key.clone())));
        prop_assert!(!cache.exists(&key));
        prop_assert!(cache.is_expired(&key).is_err());
        prop_assert!(cache.delete(&key).is_err());
    }

    // A second set replaces both value and TTL of the first.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy(),
        ttl1 in 1u64..100,
        ttl2 in 101u64..200
    ) {
        let (cache, clock) = test_cache();

        cache.set(key.clone(), value1, Duration::from_millis(ttl1));
        cache.set(key.clone(), value2.clone(), Duration::from_millis(ttl2));

        clock.advance(Duration::from_millis(ttl1 + 1));
        prop_assert_eq!(cache.get(&key).unwrap(), value2);
        prop_assert_eq!(cache.len(), 1);

        clock.advance(Duration::from_millis(ttl2));
        prop_assert!(cache.get(&key).unwrap_err().is_stale());
    }

    // get_multi always mirrors the input: same length, same order.
    #[test]
    fn prop_get_multi_shape(
        stored in prop::collection::hash_map(key_strategy(), value_strategy(), 0..10),
        lookups in prop::collection::vec(key_strategy(), 0..20)
    ) {
        let (cache, _) = test_cache();
        for (key, value) in &stored {
            cache.set(key.clone(), value.clone(), Duration::ZERO);
        }

        let values = cache.get_multi(lookups.as_slice());

        prop_assert_eq!(values.len(), lookups.len());
        for (key, value) in lookups.iter().zip(values) {
            prop_assert_eq!(value.as_ref(), stored.get(key));
        }
    }

    // Any sequence of operations agrees with a HashMap model with explicit time.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (cache, clock) = test_cache();
        let mut model: HashMap<String, ModelEntry> = HashMap::new();
        let mut now_ms: u64 = 0;

        let is_expired = |entry: &ModelEntry, now: u64| {
            entry.expires_at.map(|expires| now > expires).unwrap_or(false)
        };

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl_ms } => {
                    let expires_at = (ttl_ms > 0).then(|| now_ms + ttl_ms);
                    cache.set(key.clone(), value.clone(), Duration::from_millis(ttl_ms));
                    model.insert(key, ModelEntry { value, expires_at });
                }
                CacheOp::Get { key } => {
                    let expected = match model.get(&key) {
                        None => Err(CacheError::NotFound(key.clone())),
                        Some(entry) if is_expired(entry, now_ms) => Err(CacheError::Stale(key.clone())),
                        Some(entry) => Ok(entry.value.clone()),
                    };
                    prop_assert_eq!(cache.get(&key), expected);
                }
                CacheOp::Delete { key } => {
                    let expected = model.remove(&key).is_some();
                    prop_assert_eq!(cache.delete(&key).is_ok(), expected);
                }
                CacheOp::Exists { key } => {
                    prop_assert_eq!(cache.exists(&key), model.contains_key(&key));
                }
                CacheOp::Advance { ms } => {
                    now_ms += ms;
                    clock.advance(Duration::from_millis(ms));
                }
                CacheOp::Purge => {
                    let before = model.len();
                    model.retain(|_, entry| !is_expired(entry, now_ms));
                    prop_assert_eq!(cache.purge_expired(), before - model.len());
                }
            }
            prop_assert_eq!(cache.len(), model.len());
        }
    }

    // A sweep pass removes exactly the expired entries and nothing else.
    #[test]
    fn prop_purge_removes_only_expired(
        entries in prop::collection::hash_map(key_strategy(), ttl_strategy(), 1..12),
        elapsed in 0u64..250
    ) {
        let (cache, clock) = test_cache();
        for (key, ttl_ms) in &entries {
            cache.set(key.clone(), key.clone(), Duration::from_millis(*ttl_ms));
        }

        clock.advance(Duration::from_millis(elapsed));
        let expired: Vec<&String> = entries
            .iter()
            .filter(|(_, ttl)| **ttl > 0 && elapsed > **ttl)
            .map(|(key, _)| key)
            .collect();

        prop_assert_eq!(cache.purge_expired(), expired.len());
        for (key, _) in &entries {
            prop_assert_eq!(cache.exists(key), !expired.contains(&key));
        }
    }
}

// == Property Test for Concurrent Operation Correctness ==
// Many tasks hammer one cache; every read sees a complete value.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_concurrent_operation_correctness(
        initial_entries in prop::collection::vec((key_strategy(), value_strategy()), 1..20),
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .build()
            .unwrap();

        rt.block_on(async {
            let (cache, _) = test_cache();
            for (key, value) in &initial_entries {
                cache.set(key.clone(), value.clone(), Duration::ZERO);
            }

            let mut handles = vec![];
            for op in operations {
                let cache = cache.clone();
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value, .. } => {
                            cache.set(key, value, Duration::ZERO);
                        }
                        CacheOp::Get { key } => {
                            if let Ok(value) = cache.get(&key) {
                                if value.len() > 32 {
                                    return Err(format!("Corrupted value for '{}'", key));
                                }
                            }
                        }
                        CacheOp::Delete { key } => {
                            let _ = cache.delete(&key);
                        }
                        CacheOp::Exists { key } => {
                            let _ = cache.exists(&key);
                        }
                        CacheOp::Advance { .. } => cache.flush_all(),
                        CacheOp::Purge => {
                            cache.purge_expired();
                        }
                    }
                    Ok::<_, String>(())
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            let stats = cache.stats();
            prop_assert_eq!(stats.total_entries, cache.len());
            prop_assert!((0.0..=1.0).contains(&stats.hit_rate()));
            Ok(())
        })?;
    }
}
