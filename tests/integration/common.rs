//! Common test harness for ancine-query integration tests.
//!
//! Provides a wiremock-backed API fixture and helpers for waiting on
//! controller state.

use std::sync::{Arc, Once};
use std::time::Duration;

use ancine_query::{
    HttpClient, PaginatedQuery, QueryOptions, QuerySnapshot, RestClient, RetryConfig,
};
use serde::Deserialize;
use serde_json::{Value, json};
use wiremock::MockServer;

static TRACING: Once = Once::new();

/// How long a test waits for a controller condition before failing.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Installs a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; silent by default.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// A row of `/producao/obras`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Obra {
    pub titulo: String,
}

/// A local stand-in for the ANCINE API.
pub struct TestApi {
    pub server: MockServer,
}

impl TestApi {
    /// Starts a fresh mock server.
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    /// A REST client pointed at the mock server, with fast retries.
    pub fn rest_client(&self) -> RestClient {
        self.rest_client_with(
            RetryConfig::new()
                .with_max_retries(2)
                .with_initial_delay(Duration::from_millis(10))
                .with_max_delay(Duration::from_millis(50))
                .with_jitter(0.0),
        )
    }

    /// A REST client pointed at the mock server.
    pub fn rest_client_with(&self, retry: RetryConfig) -> RestClient {
        RestClient::builder()
            .base_url(self.server.uri())
            .expect("mock server URI should parse")
            .retry_config(retry)
            .timeout(Duration::from_secs(2))
            .build()
            .expect("client should build")
    }

    /// A controller over `endpoint` fetching through [`rest_client`](Self::rest_client).
    pub fn query<T>(&self, endpoint: &str, options: QueryOptions) -> PaginatedQuery<T>
    where
        T: serde::de::DeserializeOwned + Send + Sync + 'static,
    {
        let client: Arc<dyn HttpClient> = Arc::new(self.rest_client());
        PaginatedQuery::builder()
            .endpoint(endpoint)
            .client(client)
            .options(options)
            .build()
            .expect("controller should build")
    }
}

/// `options` with short debounces so real-time tests stay quick.
pub fn fast(mut options: QueryOptions) -> QueryOptions {
    options.filter_debounce = Duration::from_millis(100);
    options.input_debounce = Duration::from_millis(50);
    options
}

/// A Form A response body (`metadata.pagination`).
pub fn form_a(page: u32, per_page: u32, total: u64, rows: Vec<Value>) -> Value {
    let total_pages = total.div_ceil(u64::from(per_page)).max(1);
    json!({
        "success": true,
        "data": rows,
        "metadata": { "pagination": {
            "page": page,
            "per_page": per_page,
            "total": total,
            "total_pages": total_pages,
            "has_next": u64::from(page) < total_pages,
            "has_prev": page > 1
        }}
    })
}

/// A Form B response body (top-level `pagination`).
pub fn form_b(page: u32, page_size: u32, total: u64, rows: Vec<Value>) -> Value {
    json!({
        "data": rows,
        "pagination": {
            "current_page": page,
            "page_size": page_size,
            "total_items": total,
            "total_pages": total.div_ceil(u64::from(page_size)).max(1)
        }
    })
}

/// `count` rows of obras titled with `prefix`.
pub fn obras(prefix: &str, count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| json!({ "titulo": format!("{} {}", prefix, i) }))
        .collect()
}

/// Waits until `done` holds for the controller's snapshot.
///
/// Panics after [`WAIT_TIMEOUT`].
pub async fn wait_for<T>(
    query: &PaginatedQuery<T>,
    mut done: impl FnMut(&QuerySnapshot<T>) -> bool,
) -> QuerySnapshot<T> {
    let mut changes = query.subscribe();
    tokio::time::timeout(WAIT_TIMEOUT, async {
        loop {
            changes.borrow_and_update();
            let snapshot = query.snapshot();
            if done(&snapshot) {
                return snapshot;
            }
            if changes.changed().await.is_err() {
                return query.snapshot();
            }
        }
    })
    .await
    .expect("controller did not reach the expected state in time")
}

/// Waits until no request is in flight.
pub async fn wait_idle<T>(query: &PaginatedQuery<T>) -> QuerySnapshot<T> {
    wait_for(query, |s| !s.is_loading && !s.is_refetching).await
}
