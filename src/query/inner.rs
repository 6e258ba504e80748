//! Shared controller state and the fetch pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::{CacheKey, RequestCache};
use crate::config::QueryOptions;
use crate::debounce::Debouncer;
use crate::location::{encode_state, LocationStore};
use crate::transport::HttpClient;
use crate::types::{Filters, Page, PageState, PaginationInfo, QueryParams, SortDirection};
use crate::Error;

/// Mutable controller state, guarded by `QueryInner::state`.
pub(crate) struct QueryState<T> {
    /// Live page/filters/sort as last set by the caller.
    pub live: PageState,
    /// Filters that made it through the debounce.
    pub settled_filters: Filters,
    /// Page the settled parameters were built for.
    pub settled_page: u32,
    /// Parameters of the most recent settled state.
    pub params: QueryParams,
    /// Cache key of `params`; responses for other keys are ignored.
    pub key: Option<CacheKey>,
    /// Bumped on every load; only the newest request may settle the state.
    pub generation: u64,

    pub data: Arc<Vec<T>>,
    pub pagination: Option<PaginationInfo>,
    pub error: Option<Arc<Error>>,
    pub is_fetching: bool,
    pub has_loaded: bool,
}

pub(crate) struct QueryInner<T> {
    pub endpoint: String,
    pub options: QueryOptions,
    pub client: Arc<dyn HttpClient>,
    pub location: Option<Arc<dyn LocationStore>>,
    pub cache: Arc<dyn RequestCache>,
    pub state: Mutex<QueryState<T>>,
    pub changes: watch::Sender<u64>,
    pub filter_debouncer: Debouncer<Filters>,
    pub input_debouncer: Debouncer<Filters>,
    pub background: Mutex<Option<JoinHandle<()>>>,
    pub closed: AtomicBool,
}

impl<T> QueryInner<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Creates the shared state. Nothing is fetched until [`settle`](Self::settle).
    pub fn new(
        endpoint: String,
        options: QueryOptions,
        client: Arc<dyn HttpClient>,
        location: Option<Arc<dyn LocationStore>>,
        cache: Arc<dyn RequestCache>,
        initial: PageState,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let filter_debouncer = Debouncer::new(options.filter_debounce, {
                let weak = weak.clone();
                move |filters: Filters| {
                    if let Some(inner) = weak.upgrade() {
                        inner.commit_filters(filters);
                    }
                }
            });

            let input_debouncer = Debouncer::new(options.input_debounce, {
                let weak = weak.clone();
                move |filters: Filters| {
                    if let Some(inner) = weak.upgrade() {
                        inner.set_filters(filters);
                    }
                }
            });

            let (changes, _) = watch::channel(0);

            Self {
                endpoint,
                client,
                location,
                cache,
                state: Mutex::new(QueryState {
                    settled_filters: initial.filters.clone(),
                    settled_page: initial.current_page,
                    live: initial,
                    params: QueryParams::default(),
                    key: None,
                    generation: 0,
                    data: Arc::new(Vec::new()),
                    pagination: None,
                    error: None,
                    is_fetching: false,
                    has_loaded: false,
                }),
                changes,
                filter_debouncer,
                input_debouncer,
                background: Mutex::new(None),
                closed: AtomicBool::new(false),
                options,
            }
        })
    }

    /// Bumps the change counter observed by `subscribe()`.
    pub fn notify(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    pub fn set_page(self: &Arc<Self>, page: u32) {
        if self.is_closed() {
            return;
        }
        self.state.lock().live.current_page = page.max(1);
        self.settle();
    }

    pub fn set_filters(self: &Arc<Self>, filters: Filters) {
        if self.is_closed() {
            return;
        }
        {
            let mut state = self.state.lock();
            state.live.filters = filters.clone();
            state.live.current_page = 1;
        }
        self.notify();
        self.filter_debouncer.call(filters);
    }

    pub fn set_filters_debounced(self: &Arc<Self>, filters: Filters) {
        if self.is_closed() {
            return;
        }
        self.input_debouncer.call(filters);
    }

    pub fn set_sort(self: &Arc<Self>, column: String, direction: SortDirection) {
        if self.is_closed() {
            return;
        }
        {
            let mut state = self.state.lock();
            state.live.sort_column = Some(column);
            state.live.sort_direction = direction;
            state.live.current_page = 1;
        }
        self.settle();
    }

    pub fn reset_filters(self: &Arc<Self>) {
        if self.is_closed() {
            return;
        }
        self.input_debouncer.cancel();
        self.filter_debouncer.cancel();
        {
            let mut state = self.state.lock();
            state.live = self.options.initial_state();
            state.settled_filters = state.live.filters.clone();
        }
        self.settle();
    }

    /// Debounce target: the filters have been quiet long enough.
    fn commit_filters(self: &Arc<Self>, filters: Filters) {
        if self.is_closed() {
            return;
        }
        self.state.lock().settled_filters = filters;
        self.settle();
    }

    // ------------------------------------------------------------------
    // Fetch pipeline
    // ------------------------------------------------------------------

    /// Recomputes the settled parameters, mirrors them into the location and
    /// loads the matching page.
    pub fn settle(self: &Arc<Self>) {
        let (params, key, page, query) = {
            let mut state = self.state.lock();
            let page = state.live.current_page;
            let params = QueryParams::build(
                page,
                self.options.page_size,
                &state.settled_filters,
                state.live.sort(),
            );
            let key = CacheKey::new(&self.endpoint, &params);

            state.settled_page = page;
            state.params = params.clone();
            state.key = Some(key.clone());

            let query = encode_state(&PageState {
                current_page: page,
                filters: state.settled_filters.clone(),
                sort_column: state.live.sort_column.clone(),
                sort_direction: state.live.sort_direction,
            });

            (params, key, page, query)
        };

        self.sync_location(&query);
        self.notify();

        if self.options.enabled {
            self.load(params, key, page, false);
        }
    }

    fn sync_location(&self, query: &str) {
        if !self.options.sync_with_url {
            return;
        }
        if let Some(location) = &self.location {
            tracing::debug!(endpoint = %self.endpoint, query, "Replacing location query");
            location.replace_query_string(query);
        }
    }

    /// Applies a cached page when possible, otherwise spawns a request.
    ///
    /// A cached entry older than `stale_time` is shown while the request
    /// runs. `force` skips the cache entirely.
    pub fn load(
        self: &Arc<Self>,
        params: QueryParams,
        key: CacheKey,
        page: u32,
        force: bool,
    ) -> Option<JoinHandle<()>> {
        let generation = {
            let mut state = self.state.lock();
            state.generation = state.generation.wrapping_add(1);
            state.generation
        };

        if !force {
            if let Some(entry) = self.cache.get(&key) {
                let fresh = entry.is_fresh(self.options.stale_time);
                {
                    let mut state = self.state.lock();
                    if state.key.as_ref() == Some(&key) {
                        self.apply_body(&mut state, &entry.value, page);
                        if fresh {
                            state.is_fetching = false;
                        }
                    }
                }
                self.notify();

                if fresh {
                    tracing::debug!(key = %key, "Serving fresh cached response");
                    return None;
                }
            }
        }

        self.state.lock().is_fetching = true;
        self.notify();

        tracing::debug!(key = %key, force, "Fetching page");

        let weak = Arc::downgrade(self);
        let client = Arc::clone(&self.client);
        let cache = Arc::clone(&self.cache);
        let endpoint = self.endpoint.clone();

        Some(tokio::spawn(async move {
            let result = client.get(&endpoint, &params).await;

            if let Ok(body) = &result {
                cache.insert(key.clone(), body.clone());
            }

            if let Some(inner) = weak.upgrade() {
                inner.finish(&key, generation, page, result);
            }
        }))
    }

    fn finish(&self, key: &CacheKey, generation: u64, page: u32, result: Result<Value, Error>) {
        {
            let mut state = self.state.lock();

            if state.generation != generation || state.key.as_ref() != Some(key) {
                tracing::debug!(key = %key, generation, "Ignoring superseded response");
                return;
            }

            match result {
                Ok(body) => self.apply_body(&mut state, &body, page),
                Err(err) => {
                    tracing::warn!(
                        endpoint = %self.endpoint,
                        status = err.status_code(),
                        error = %err,
                        "Fetch failed, keeping previous data"
                    );
                    state.error = Some(Arc::new(err));
                }
            }

            state.is_fetching = false;
        }

        self.notify();
    }

    fn apply_body(&self, state: &mut QueryState<T>, body: &Value, page: u32) {
        match Page::<T>::from_response(body, page, self.options.page_size) {
            Ok(decoded) => {
                state.data = Arc::new(decoded.data);
                state.pagination = Some(decoded.pagination);
                state.error = None;
                state.has_loaded = true;
            }
            Err(err) => {
                tracing::warn!(endpoint = %self.endpoint, error = %err, "Undecodable response");
                state.error = Some(Arc::new(err));
            }
        }
    }

    /// Re-issues the current request, bypassing the cache.
    pub fn refetch_current(self: &Arc<Self>) -> Option<(CacheKey, JoinHandle<()>)> {
        let (params, key, page) = {
            let state = self.state.lock();
            let key = state.key.clone()?;
            (state.params.clone(), key, state.settled_page)
        };
        let handle = self.load(params, key.clone(), page, true)?;
        Some((key, handle))
    }

    // ------------------------------------------------------------------
    // Background refetch and teardown
    // ------------------------------------------------------------------

    pub fn start_background_refetch(self: &Arc<Self>) {
        if !self.options.enabled {
            return;
        }
        let Some(interval) = self.options.effective_refetch_interval() else {
            return;
        };

        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(background_refetch(weak, interval));
        *self.background.lock() = Some(handle);
    }
}

impl<T> QueryInner<T> {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        self.input_debouncer.cancel();
        self.filter_debouncer.cancel();
        if let Some(handle) = self.background.lock().take() {
            handle.abort();
        }
    }
}

async fn background_refetch<T>(weak: Weak<QueryInner<T>>, interval: Duration)
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    loop {
        tokio::time::sleep(interval).await;

        let Some(inner) = weak.upgrade() else {
            return;
        };
        if inner.is_closed() {
            return;
        }

        tracing::debug!(endpoint = %inner.endpoint, "Background refetch");
        let _ = inner.refetch_current();
    }
}

impl<T> Drop for QueryInner<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.background.get_mut().take() {
            handle.abort();
        }
    }
}
