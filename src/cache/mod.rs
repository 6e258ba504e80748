//! Shared request cache.
//!
//! Responses are cached raw (as JSON) under a [`CacheKey`] made of the
//! endpoint and the canonical query string, so any controller that would
//! issue an identical request can reuse the result. Freshness is judged by
//! the reader (see `QueryOptions::stale_time`); the cache itself only bounds
//! retention.

mod memory;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::time::Instant;

use crate::types::QueryParams;

pub use memory::MemoryCache;

/// Identity of one request: endpoint plus canonical parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Creates the key for `GET endpoint?params`.
    ///
    /// ```rust
    /// use ancine_query::{CacheKey, QueryParams};
    ///
    /// let params: QueryParams = [("page", "2"), ("per_page", "20")].into_iter().collect();
    /// let key = CacheKey::new("/data/obras", &params);
    /// assert_eq!(key.as_str(), "/data/obras?page=2&per_page=20");
    /// ```
    pub fn new(endpoint: &str, params: &QueryParams) -> Self {
        if params.is_empty() {
            Self(endpoint.to_owned())
        } else {
            Self(format!("{}?{}", endpoint, params.to_query_string()))
        }
    }

    /// Returns the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cached response body and when it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Raw response body.
    pub value: Arc<Value>,
    /// When the response was stored.
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// Creates an entry fetched now.
    pub fn new(value: Value) -> Self {
        Self {
            value: Arc::new(value),
            fetched_at: Instant::now(),
        }
    }

    /// Returns `true` if the entry is younger than `stale_time`.
    pub fn is_fresh(&self, stale_time: std::time::Duration) -> bool {
        self.fetched_at.elapsed() < stale_time
    }
}

/// Result cache shared by controllers.
///
/// Implementations are internally synchronized; all methods take `&self`.
pub trait RequestCache: Send + Sync {
    /// Returns the entry for `key`, if retained.
    fn get(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn insert(&self, key: CacheKey, value: Value);

    /// Removes the entry for `key`.
    fn remove(&self, key: &CacheKey);

    /// Removes every entry.
    fn clear(&self);
}
