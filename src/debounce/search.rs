//! Debounced free-text search input.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::Debouncer;

/// Default quiet period for search inputs.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Default)]
struct SearchState {
    input: String,
    search: String,
}

/// Tracks a search box: what the user typed and what should be searched.
///
/// `input_value` follows every keystroke; `search_value` catches up once the
/// user pauses for the configured delay. While they differ,
/// [`is_searching`](DebouncedSearch::is_searching) is `true`.
///
/// ```rust
/// use ancine_query::DebouncedSearch;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let search = DebouncedSearch::new("");
/// search.set_input("cidade de deus");
/// assert_eq!(search.input_value(), "cidade de deus");
/// assert!(search.is_searching());
/// # }
/// ```
#[derive(Debug)]
pub struct DebouncedSearch {
    state: Arc<RwLock<SearchState>>,
    debouncer: Debouncer<String>,
}

impl DebouncedSearch {
    /// Creates a search input with the default 300ms delay.
    pub fn new(initial: impl Into<String>) -> Self {
        Self::with_delay(initial, DEFAULT_SEARCH_DELAY)
    }

    /// Creates a search input with a custom delay.
    pub fn with_delay(initial: impl Into<String>, delay: Duration) -> Self {
        let initial = initial.into();
        let state = Arc::new(RwLock::new(SearchState {
            input: initial.clone(),
            search: initial,
        }));

        let sink = Arc::clone(&state);
        let debouncer = Debouncer::new(delay, move |value: String| {
            sink.write().search = value;
        });

        Self { state, debouncer }
    }

    /// Records a keystroke.
    pub fn set_input(&self, value: impl Into<String>) {
        let value = value.into();
        self.state.write().input = value.clone();
        self.debouncer.call(value);
    }

    /// Clears the input; the search value follows after the delay.
    pub fn clear(&self) {
        self.set_input(String::new());
    }

    /// Returns what the user typed.
    pub fn input_value(&self) -> String {
        self.state.read().input.clone()
    }

    /// Returns the settled value to search for.
    pub fn search_value(&self) -> String {
        self.state.read().search.clone()
    }

    /// Returns `true` while the input has not settled yet.
    pub fn is_searching(&self) -> bool {
        let state = self.state.read();
        state.input != state.search
    }
}
