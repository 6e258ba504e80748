//! In-process request cache.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use super::{CacheEntry, CacheKey, RequestCache};
use crate::config::CacheConfig;

/// [`RequestCache`] held in memory.
///
/// Entries older than [`CacheConfig::gc_time`] are dropped on access and on
/// every insert; when the cache is full the oldest entry is evicted.
///
/// ## Example
///
/// ```rust
/// use ancine_query::{CacheConfig, CacheKey, MemoryCache, QueryParams, RequestCache};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache = MemoryCache::new(CacheConfig::default());
/// let key = CacheKey::new("/data/obras", &QueryParams::default());
///
/// cache.insert(key.clone(), json!({ "data": [] }));
/// assert!(cache.get(&key).is_some());
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryCache {
    config: CacheConfig,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the number of retained entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drops entries older than the GC time. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        let gc_time = self.config.gc_time;
        entries.retain(|_, entry| entry.fetched_at.elapsed() < gc_time);
        before - entries.len()
    }

    fn evict_oldest(entries: &mut HashMap<CacheKey, CacheEntry>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.fetched_at)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            tracing::debug!(key = %key, "Evicting oldest cache entry");
            entries.remove(&key);
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl RequestCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.read().get(key).cloned()?;

        if entry.fetched_at.elapsed() >= self.config.gc_time {
            self.entries.write().remove(key);
            return None;
        }

        Some(entry)
    }

    fn insert(&self, key: CacheKey, value: Value) {
        if self.config.max_entries == 0 {
            return;
        }

        let gc_time = self.config.gc_time;
        let mut entries = self.entries.write();
        entries.retain(|_, entry| entry.fetched_at.elapsed() < gc_time);

        while !entries.contains_key(&key) && entries.len() >= self.config.max_entries {
            Self::evict_oldest(&mut entries);
        }

        entries.insert(key, CacheEntry::new(value));
    }

    fn remove(&self, key: &CacheKey) {
        self.entries.write().remove(key);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}
