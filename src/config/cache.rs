//! Cache configuration for the shared request cache.

use std::time::Duration;

/// Configuration for [`MemoryCache`](crate::MemoryCache).
///
/// Freshness (whether a cached page may be shown without a network call) is
/// decided per controller by [`QueryOptions::stale_time`](crate::QueryOptions).
/// This configuration only bounds how long and how many entries are retained.
///
/// ## Example
///
/// ```rust
/// use ancine_query::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::builder()
///     .gc_time(Duration::from_secs(600))
///     .max_entries(200)
///     .build();
/// assert_eq!(config.max_entries, 200);
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct CacheConfig {
    /// How long an entry is retained after it was stored.
    #[builder(default = Duration::from_secs(15 * 60))]
    pub gc_time: Duration,

    /// Maximum number of entries; the oldest entry is evicted first.
    #[builder(default = 1_000)]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
