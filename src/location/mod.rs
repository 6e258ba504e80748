//! The addressable location whose query string mirrors controller state.
//!
//! In a browser this is `window.location`; here it is the [`LocationStore`]
//! trait so controllers can be driven without one. [`MemoryLocation`] is the
//! in-process implementation.
//!
//! Encoding rules live in [`encode_state`] / [`decode_state`].

mod query_string;

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

pub use query_string::{decode_state, encode_state, PAGE_KEY, SORT_BY_KEY, SORT_DIRECTION_KEY};

/// Read/replace access to a location's query string.
///
/// Implementations must treat [`replace_query_string`](Self::replace_query_string)
/// as a *replace*: it must not create a new navigation history entry.
pub trait LocationStore: Send + Sync {
    /// Returns the current query string, without the leading `?`.
    fn query_string(&self) -> String;

    /// Replaces the query string in place.
    fn replace_query_string(&self, query: &str);
}

/// In-memory [`LocationStore`].
///
/// Keeps a history length so callers can verify that state mirroring never
/// pushes entries.
///
/// ```rust
/// use ancine_query::{LocationStore, MemoryLocation};
///
/// let location = MemoryLocation::new("?page=2&uf=SP");
/// assert_eq!(location.query_string(), "page=2&uf=SP");
///
/// location.replace_query_string("uf=SP");
/// assert_eq!(location.history_len(), 1);
/// assert_eq!(location.replace_count(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryLocation {
    query: RwLock<String>,
    history_len: AtomicU64,
    replace_count: AtomicU64,
}

impl MemoryLocation {
    /// Creates a location with an initial query string (a leading `?` is stripped).
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let query = query.strip_prefix('?').map(str::to_owned).unwrap_or(query);
        Self {
            query: RwLock::new(query),
            history_len: AtomicU64::new(1),
            replace_count: AtomicU64::new(0),
        }
    }

    /// Simulates a user navigation: pushes a new history entry.
    pub fn navigate(&self, query: impl Into<String>) {
        let query = query.into();
        *self.query.write() = query.strip_prefix('?').map(str::to_owned).unwrap_or(query);
        self.history_len.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of history entries.
    pub fn history_len(&self) -> u64 {
        self.history_len.load(Ordering::Relaxed)
    }

    /// Returns how many times the query string was replaced.
    pub fn replace_count(&self) -> u64 {
        self.replace_count.load(Ordering::Relaxed)
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("")
    }
}

impl LocationStore for MemoryLocation {
    fn query_string(&self) -> String {
        self.query.read().clone()
    }

    fn replace_query_string(&self, query: &str) {
        *self.query.write() = query.to_owned();
        self.replace_count.fetch_add(1, Ordering::Relaxed);
    }
}
