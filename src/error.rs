//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors surfaced by cache lookups.
///
/// Both variants are non-fatal and carry the key that triggered them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key is present but past its expiry
    #[error("Cache is out of date: {0}")]
    Stale(String),
}

impl CacheError {
    /// Returns the key this error refers to.
    pub fn key(&self) -> &str {
        match self {
            CacheError::NotFound(key) | CacheError::Stale(key) => key,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, CacheError::Stale(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
