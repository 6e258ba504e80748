//! The paginated query controller.
//!
//! A [`PaginatedQuery`] owns page, filter and sort state for one endpoint,
//! turns every settled change into a request through an [`HttpClient`],
//! and publishes the decoded rows with normalized pagination.
//!
//! ```text
//! set_page / set_sort / reset_filters ─────────────────────┐
//! set_filters ──► 500ms debounce ──────────────────────────┤
//! set_filters_debounced ──► 300ms ──► set_filters          ▼
//!                                        settle: params ──► location (replace)
//!                                                   │
//!                                   cache (fresh?) ─┴─► HttpClient::get
//!                                                              │
//!                          apply if params still current ◄─────┘
//! ```
//!
//! Setters return immediately; debounce timers and requests run as tokio
//! tasks, so a controller must be built and driven inside a runtime.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ancine_query::testing::MockHttpClient;
//! use ancine_query::{endpoints, Filters, PaginatedQuery, QueryOptions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> ancine_query::Result<()> {
//! let query = PaginatedQuery::<serde_json::Value>::builder()
//!     .endpoint(endpoints::PRODUCAO_OBRAS)
//!     .client(Arc::new(MockHttpClient::new()))
//!     .options(QueryOptions::builder().page_size(15).build())
//!     .build()?;
//!
//! query.set_filters(Filters::new().with("tipo_obra", "Documentário"));
//! assert_eq!(query.current_page(), 1);
//! # Ok(())
//! # }
//! ```

mod builder;
mod inner;
mod snapshot;

use std::sync::Arc;

use futures::Stream;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

pub use builder::{HasClient, HasEndpoint, NoClient, NoEndpoint, PaginatedQueryBuilder};
pub use snapshot::QuerySnapshot;

use self::inner::QueryInner;
use crate::config::QueryOptions;
use crate::transport::HttpClient;
use crate::types::{Filters, PaginationInfo, QueryParams, SortDirection};
use crate::Error;

/// Paginated, filtered and sorted view over one endpoint.
///
/// Cloning yields another handle to the same controller. Timers and the
/// background refetch stop when the last handle is dropped or on
/// [`shutdown`](Self::shutdown).
pub struct PaginatedQuery<T> {
    inner: Arc<QueryInner<T>>,
}

impl<T> Clone for PaginatedQuery<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PaginatedQuery<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a new controller builder.
    pub fn builder() -> PaginatedQueryBuilder<T, NoEndpoint, NoClient> {
        PaginatedQueryBuilder::new()
    }

    /// Builds a controller without URL sync target or shared cache.
    pub fn new(
        endpoint: impl Into<String>,
        client: Arc<dyn HttpClient>,
        options: QueryOptions,
    ) -> Result<Self, Error> {
        Self::builder()
            .endpoint(endpoint)
            .client(client)
            .options(options)
            .build()
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Moves to `page` (a zero page is treated as 1) and fetches it.
    ///
    /// Filters and sort are left untouched.
    pub fn set_page(&self, page: u32) {
        self.inner.set_page(page);
    }

    /// Replaces the whole filter mapping and resets the page to 1.
    ///
    /// The request waits for `filter_debounce` (500ms by default) of quiet;
    /// a burst of calls results in one request with the last mapping.
    pub fn set_filters(&self, filters: Filters) {
        self.inner.set_filters(filters);
    }

    /// Like [`set_filters`](Self::set_filters), behind an extra
    /// `input_debounce` (300ms by default) suited to keystroke input.
    pub fn set_filters_debounced(&self, filters: Filters) {
        self.inner.set_filters_debounced(filters);
    }

    /// Sorts by `column`, resets the page to 1 and fetches.
    pub fn set_sort(&self, column: impl Into<String>, direction: SortDirection) {
        self.inner.set_sort(column.into(), direction);
    }

    /// Restores the initial filters and sort, goes to page 1 and fetches.
    ///
    /// Pending debounced filter changes are discarded.
    pub fn reset_filters(&self) {
        self.inner.reset_filters();
    }

    /// Re-issues the current request, bypassing the cache, and waits for it.
    ///
    /// Returns the request's error if it failed and its parameters are still
    /// current. Works even when the controller is not `enabled`.
    pub async fn refetch(&self) -> Result<(), Arc<Error>> {
        let Some((key, handle)) = self.inner.refetch_current() else {
            return Ok(());
        };
        let _ = handle.await;

        let state = self.inner.state.lock();
        match &state.error {
            Some(err) if state.key.as_ref() == Some(&key) => Err(Arc::clone(err)),
            _ => Ok(()),
        }
    }
}

impl<T> PaginatedQuery<T> {
    // ------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------

    /// Rows of the last applied page; empty before any response.
    pub fn data(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.inner.state.lock().data)
    }

    /// Pagination of the last applied page.
    ///
    /// Before the first response this is derived from the current page and
    /// page size with zero items.
    pub fn pagination_info(&self) -> PaginationInfo {
        let state = self.inner.state.lock();
        state.pagination.unwrap_or_else(|| {
            PaginationInfo::fallback(state.live.current_page, self.inner.options.page_size)
        })
    }

    /// `true` while the first page is being fetched.
    pub fn is_loading(&self) -> bool {
        let state = self.inner.state.lock();
        state.is_fetching && !state.has_loaded
    }

    /// `true` while a request runs and earlier data is still shown.
    pub fn is_refetching(&self) -> bool {
        let state = self.inner.state.lock();
        state.is_fetching && state.has_loaded
    }

    /// `true` if the last request for the current parameters failed.
    pub fn is_error(&self) -> bool {
        self.inner.state.lock().error.is_some()
    }

    /// The last request error, if any.
    pub fn error(&self) -> Option<Arc<Error>> {
        self.inner.state.lock().error.clone()
    }

    /// Live page number.
    pub fn current_page(&self) -> u32 {
        self.inner.state.lock().live.current_page
    }

    /// Live filters, including ones still waiting for their debounce.
    pub fn filters(&self) -> Filters {
        self.inner.state.lock().live.filters.clone()
    }

    /// Live sort column.
    pub fn sort_column(&self) -> Option<String> {
        self.inner.state.lock().live.sort_column.clone()
    }

    /// Live sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.inner.state.lock().live.sort_direction
    }

    /// Parameters of the most recent settled state.
    pub fn query_params(&self) -> QueryParams {
        self.inner.state.lock().params.clone()
    }

    /// Consistent copy of every output.
    pub fn snapshot(&self) -> QuerySnapshot<T> {
        let state = self.inner.state.lock();
        QuerySnapshot {
            data: Arc::clone(&state.data),
            pagination: state.pagination.unwrap_or_else(|| {
                PaginationInfo::fallback(state.live.current_page, self.inner.options.page_size)
            }),
            is_loading: state.is_fetching && !state.has_loaded,
            is_refetching: state.is_fetching && state.has_loaded,
            error: state.error.clone(),
            current_page: state.live.current_page,
            filters: state.live.filters.clone(),
            sort_column: state.live.sort_column.clone(),
            sort_direction: state.live.sort_direction,
        }
    }

    /// Returns a receiver whose value changes on every state change.
    ///
    /// ```rust,ignore
    /// let mut changes = query.subscribe();
    /// while changes.changed().await.is_ok() {
    ///     render(query.snapshot());
    /// }
    /// ```
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changes.subscribe()
    }

    /// Stream of snapshots, one per observed state change.
    ///
    /// Changes that happen faster than the stream is polled are coalesced.
    /// The stream does not keep the controller alive; it ends once the last
    /// handle is dropped.
    ///
    /// ```rust,ignore
    /// use futures::StreamExt;
    ///
    /// let mut changes = std::pin::pin!(query.changes());
    /// while let Some(snapshot) = changes.next().await {
    ///     render(&snapshot);
    /// }
    /// ```
    pub fn changes(&self) -> impl Stream<Item = QuerySnapshot<T>> + Send + 'static
    where
        T: Send + Sync + 'static,
    {
        let receiver = self.subscribe();
        let weak = Arc::downgrade(&self.inner);

        futures::stream::unfold((receiver, weak), |(mut receiver, weak)| async move {
            receiver.changed().await.ok()?;
            let inner = weak.upgrade()?;
            let snapshot = PaginatedQuery { inner }.snapshot();
            Some((snapshot, (receiver, weak)))
        })
    }

    /// The endpoint this controller queries.
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// The options this controller was built with.
    pub fn options(&self) -> &QueryOptions {
        &self.inner.options
    }

    /// Cancels pending debounces and the background refetch.
    ///
    /// Later setter calls are ignored. In-flight requests still complete and
    /// populate the cache.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl<T> std::fmt::Debug for PaginatedQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("PaginatedQuery")
            .field("endpoint", &self.inner.endpoint)
            .field("live", &state.live)
            .field("params", &state.params.to_query_string())
            .field("rows", &state.data.len())
            .field("is_fetching", &state.is_fetching)
            .finish_non_exhaustive()
    }
}
