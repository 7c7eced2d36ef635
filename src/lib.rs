//! Mini Memcache - A lightweight in-process key-value cache
//!
//! Provides thread-safe storage with per-entry TTL, lazy expiry checks on
//! read and a background sweep that reclaims expired entries.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use mini_memcache::{Cache, CacheError};
//!
//! let cache: Cache<String> = Cache::new(128, Duration::ZERO, Duration::ZERO);
//! cache.set("greeting", "hello".to_string(), Duration::from_secs(60));
//!
//! assert_eq!(cache.get("greeting").unwrap(), "hello");
//! assert!(matches!(cache.get("missing"), Err(CacheError::NotFound(_))));
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, Ttl};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
