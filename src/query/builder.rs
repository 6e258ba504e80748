//! Controller builder with typestate pattern.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::inner::QueryInner;
use super::PaginatedQuery;
use crate::cache::{MemoryCache, RequestCache};
use crate::config::QueryOptions;
use crate::location::{decode_state, LocationStore};
use crate::transport::HttpClient;
use crate::Error;

/// Marker type: endpoint not yet provided.
pub struct NoEndpoint;

/// Marker type: endpoint has been provided.
pub struct HasEndpoint;

/// Marker type: HTTP client not yet provided.
pub struct NoClient;

/// Marker type: HTTP client has been provided.
pub struct HasClient;

/// Builder for [`PaginatedQuery`].
///
/// ## Required Configuration
///
/// - `endpoint()`: API path, relative to the client's base URL
/// - `client()`: the [`HttpClient`] to fetch through
///
/// ## Optional Configuration
///
/// - `options()`: [`QueryOptions`] (defaults apply otherwise)
/// - `location()`: where state is mirrored when `sync_with_url` is on;
///   without one, URL sync is skipped
/// - `cache()`: shared [`RequestCache`]; a private [`MemoryCache`] otherwise
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use ancine_query::testing::MockHttpClient;
/// use ancine_query::{MemoryLocation, PaginatedQuery, QueryOptions};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> ancine_query::Result<()> {
/// let query = PaginatedQuery::<serde_json::Value>::builder()
///     .endpoint("/producao/obras")
///     .client(Arc::new(MockHttpClient::new()))
///     .location(Arc::new(MemoryLocation::new("?page=2")))
///     .options(QueryOptions::builder().page_size(15).build())
///     .build()?;
///
/// assert_eq!(query.current_page(), 2);
/// # Ok::<(), ancine_query::Error>(())
/// # }
/// ```
pub struct PaginatedQueryBuilder<T, EndpointState, ClientState> {
    endpoint: Option<String>,
    client: Option<Arc<dyn HttpClient>>,
    options: QueryOptions,
    location: Option<Arc<dyn LocationStore>>,
    cache: Option<Arc<dyn RequestCache>>,
    _rows: PhantomData<fn() -> T>,
    _endpoint_state: PhantomData<EndpointState>,
    _client_state: PhantomData<ClientState>,
}

impl<T> PaginatedQueryBuilder<T, NoEndpoint, NoClient> {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            endpoint: None,
            client: None,
            options: QueryOptions::default(),
            location: None,
            cache: None,
            _rows: PhantomData,
            _endpoint_state: PhantomData,
            _client_state: PhantomData,
        }
    }
}

impl<T> Default for PaginatedQueryBuilder<T, NoEndpoint, NoClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> PaginatedQueryBuilder<T, NoEndpoint, C> {
    /// Sets the endpoint, e.g. `/producao/obras`.
    pub fn endpoint(self, endpoint: impl Into<String>) -> PaginatedQueryBuilder<T, HasEndpoint, C> {
        PaginatedQueryBuilder {
            endpoint: Some(endpoint.into()),
            client: self.client,
            options: self.options,
            location: self.location,
            cache: self.cache,
            _rows: PhantomData,
            _endpoint_state: PhantomData,
            _client_state: PhantomData,
        }
    }
}

impl<T, E> PaginatedQueryBuilder<T, E, NoClient> {
    /// Sets the HTTP client.
    pub fn client(self, client: Arc<dyn HttpClient>) -> PaginatedQueryBuilder<T, E, HasClient> {
        PaginatedQueryBuilder {
            endpoint: self.endpoint,
            client: Some(client),
            options: self.options,
            location: self.location,
            cache: self.cache,
            _rows: PhantomData,
            _endpoint_state: PhantomData,
            _client_state: PhantomData,
        }
    }
}

impl<T, E, C> PaginatedQueryBuilder<T, E, C> {
    /// Sets the query options.
    #[must_use]
    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the location mirrored when `sync_with_url` is on.
    #[must_use]
    pub fn location(mut self, location: Arc<dyn LocationStore>) -> Self {
        self.location = Some(location);
        self
    }

    /// Sets a shared request cache.
    #[must_use]
    pub fn cache(mut self, cache: Arc<dyn RequestCache>) -> Self {
        self.cache = Some(cache);
        self
    }
}

impl<T> PaginatedQueryBuilder<T, HasEndpoint, HasClient>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Builds the controller and issues the initial fetch.
    ///
    /// With `sync_with_url` on, state is seeded from the location's query
    /// string and the location is rewritten immediately.
    ///
    /// Fails with a configuration error when `page_size` is zero.
    ///
    /// Must be called inside a tokio runtime.
    pub fn build(self) -> Result<PaginatedQuery<T>, Error> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| Error::configuration("endpoint is required"))?;
        let client = self
            .client
            .ok_or_else(|| Error::configuration("HTTP client is required"))?;

        let options = self.options;
        if options.page_size == 0 {
            return Err(Error::configuration("page_size must be at least 1"));
        }

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(MemoryCache::default()) as Arc<dyn RequestCache>);

        let defaults = options.initial_state();
        let initial = match (&self.location, options.sync_with_url) {
            (Some(location), true) => decode_state(&location.query_string(), &defaults),
            _ => defaults,
        };

        let inner = QueryInner::new(endpoint, options, client, self.location, cache, initial);
        inner.settle();
        inner.start_background_refetch();

        Ok(PaginatedQuery { inner })
    }
}
