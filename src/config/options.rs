//! Per-controller query options.

use std::time::Duration;

use crate::types::{Filters, PageState, SortDirection};

/// Background refetch period used when URL sync is off and no explicit
/// interval was configured.
const UNSYNCED_REFETCH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Options for a [`PaginatedQuery`](crate::PaginatedQuery).
///
/// ## Example
///
/// ```rust
/// use ancine_query::{Filters, QueryOptions, SortDirection};
/// use std::time::Duration;
///
/// let options = QueryOptions::builder()
///     .page_size(15)
///     .initial_filters(Filters::new().with("tipo_obra", "Documentário"))
///     .initial_sort_column("ano_producao")
///     .initial_sort_direction(SortDirection::Desc)
///     .stale_time(Duration::from_secs(60))
///     .build();
///
/// assert_eq!(options.page_size, 15);
/// assert!(options.sync_with_url);
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct QueryOptions {
    /// Rows requested per page.
    #[builder(default = 20)]
    pub page_size: u32,

    /// Filters applied at construction and restored by `reset_filters`.
    #[builder(default)]
    pub initial_filters: Filters,

    /// Sort column applied at construction and restored by `reset_filters`.
    #[builder(into)]
    pub initial_sort_column: Option<String>,

    /// Sort direction paired with `initial_sort_column`.
    #[builder(default)]
    pub initial_sort_direction: SortDirection,

    /// When `false` the controller never issues a request.
    #[builder(default = true)]
    pub enabled: bool,

    /// How long a cached response for identical parameters is reused.
    #[builder(default = Duration::from_secs(5 * 60))]
    pub stale_time: Duration,

    /// Mirror state into the location's query string.
    #[builder(default = true)]
    pub sync_with_url: bool,

    /// Periodic background refetch. See [`effective_refetch_interval`](Self::effective_refetch_interval).
    pub refetch_interval: Option<Duration>,

    /// Quiet period between the last `set_filters` call and the fetch.
    #[builder(default = Duration::from_millis(500))]
    pub filter_debounce: Duration,

    /// Extra quiet period applied by `set_filters_debounced`.
    #[builder(default = Duration::from_millis(300))]
    pub input_debounce: Duration,
}

impl QueryOptions {
    /// Returns the refetch period actually used.
    ///
    /// An explicit `refetch_interval` always wins. Otherwise controllers not
    /// bound to the URL refresh every five minutes and URL-bound ones never do.
    pub fn effective_refetch_interval(&self) -> Option<Duration> {
        match self.refetch_interval {
            Some(interval) if interval.is_zero() => None,
            Some(interval) => Some(interval),
            None if !self.sync_with_url => Some(UNSYNCED_REFETCH_INTERVAL),
            None => None,
        }
    }

    /// Returns the state a controller starts from (and resets to).
    pub fn initial_state(&self) -> PageState {
        PageState {
            current_page: 1,
            filters: self.initial_filters.clone(),
            sort_column: self.initial_sort_column.clone(),
            sort_direction: self.initial_sort_direction,
        }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}
