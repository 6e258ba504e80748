//! MockHttpClient for testing controllers without a network.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::transport::{GetFuture, HttpClient};
use crate::types::QueryParams;
use crate::Error;

type Handler = Arc<dyn Fn(&str, &QueryParams) -> Result<Value, Error> + Send + Sync>;

/// A request seen by [`MockHttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Requested endpoint.
    pub endpoint: String,
    /// Requested parameters.
    pub params: QueryParams,
}

struct Scripted {
    result: Result<Value, Error>,
    delay: Option<Duration>,
}

struct MockState {
    queue: VecDeque<Scripted>,
    calls: Vec<RecordedCall>,
    handler: Option<Handler>,
    default_response: Value,
    delay: Duration,
}

/// A scripted [`HttpClient`] that records every request.
///
/// Each request takes the next queued outcome; when the queue is empty the
/// handler (if any) answers, otherwise the default response is returned.
/// Delays use `tokio::time`, so paused-clock tests control completion order.
///
/// ## Example
///
/// ```rust
/// use ancine_query::testing::MockHttpClient;
/// use ancine_query::{Error, HttpClient, QueryParams};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mock = MockHttpClient::new()
///     .with_response(json!({ "data": [1, 2, 3] }))
///     .with_error(Error::timeout("slow"));
///
/// let params = QueryParams::default();
/// assert!(mock.get("/data/obras", &params).await.is_ok());
/// assert!(mock.get("/data/obras", &params).await.is_err());
/// assert_eq!(mock.call_count(), 2);
/// # }
/// ```
#[derive(Clone)]
pub struct MockHttpClient {
    state: Arc<Mutex<MockState>>,
}

impl MockHttpClient {
    /// Creates a mock that answers `{"data": []}`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                queue: VecDeque::new(),
                calls: Vec::new(),
                handler: None,
                default_response: json!({ "data": [] }),
                delay: Duration::ZERO,
            })),
        }
    }

    /// Sets the response used when nothing is queued.
    #[must_use]
    pub fn with_default_response(self, body: Value) -> Self {
        self.state.lock().default_response = body;
        self
    }

    /// Answers unqueued requests with `handler`.
    #[must_use]
    pub fn with_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&str, &QueryParams) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.state.lock().handler = Some(Arc::new(handler));
        self
    }

    /// Delays every response that has no delay of its own.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        self.state.lock().delay = delay;
        self
    }

    /// Queues a successful response.
    #[must_use]
    pub fn with_response(self, body: Value) -> Self {
        self.push_response(body);
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn with_error(self, error: Error) -> Self {
        self.push_error(error);
        self
    }

    /// Queues a successful response.
    pub fn push_response(&self, body: Value) {
        self.push(Ok(body), None);
    }

    /// Queues a successful response that completes after `delay`.
    pub fn push_delayed_response(&self, body: Value, delay: Duration) {
        self.push(Ok(body), Some(delay));
    }

    /// Queues a failure.
    pub fn push_error(&self, error: Error) {
        self.push(Err(error), None);
    }

    /// Fails the next request with `error`, ahead of anything queued.
    pub fn fail_next(&self, error: Error) {
        self.state.lock().queue.push_front(Scripted {
            result: Err(error),
            delay: None,
        });
    }

    fn push(&self, result: Result<Value, Error>, delay: Option<Duration>) {
        self.state.lock().queue.push_back(Scripted { result, delay });
    }

    /// Returns the number of requests made.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Returns every recorded request, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Returns the most recent request.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.state.lock().calls.last().cloned()
    }

    /// Clears recorded requests and queued outcomes.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.calls.clear();
        state.queue.clear();
    }

    fn next_outcome(&self, endpoint: &str, params: &QueryParams) -> Scripted {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall {
            endpoint: endpoint.to_owned(),
            params: params.clone(),
        });

        let default_delay = state.delay;
        let queued = state.queue.pop_front();
        let handler = state.handler.clone();
        let default_response = state.default_response.clone();
        drop(state);

        let mut scripted = queued.unwrap_or_else(|| Scripted {
            result: match handler {
                Some(handler) => handler(endpoint, params),
                None => Ok(default_response),
            },
            delay: None,
        });

        scripted.delay = scripted.delay.or(Some(default_delay));
        scripted
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockHttpClient")
            .field("queued", &state.queue.len())
            .field("calls", &state.calls.len())
            .finish_non_exhaustive()
    }
}

impl HttpClient for MockHttpClient {
    fn get<'a>(&'a self, endpoint: &'a str, params: &'a QueryParams) -> GetFuture<'a> {
        let Scripted { result, delay } = self.next_outcome(endpoint, params);
        Box::pin(async move {
            if let Some(delay) = delay.filter(|d| !d.is_zero()) {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn params(page: u32) -> QueryParams {
        [("page", page.to_string())].into_iter().collect()
    }

    #[tokio::test]
    async fn test_default_response() {
        let mock = MockHttpClient::new();
        let body = mock.get("/data/obras", &params(1)).await.unwrap();
        assert_eq!(body, json!({ "data": [] }));
    }

    #[tokio::test]
    async fn test_queue_then_default() {
        let mock = MockHttpClient::new()
            .with_default_response(json!({ "data": ["padrão"] }))
            .with_response(json!({ "data": ["primeira"] }));

        assert_eq!(
            mock.get("/x", &params(1)).await.unwrap()["data"][0],
            "primeira"
        );
        assert_eq!(
            mock.get("/x", &params(1)).await.unwrap()["data"][0],
            "padrão"
        );
    }

    #[tokio::test]
    async fn test_fail_next_jumps_the_queue() {
        let mock = MockHttpClient::new().with_response(json!({ "data": [] }));
        mock.fail_next(Error::connection("offline"));

        let err = mock.get("/x", &params(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(mock.get("/x", &params(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_handler_sees_params() {
        let mock = MockHttpClient::new().with_handler(|endpoint, params| {
            Ok(json!({ "endpoint": endpoint, "page": params.get("page") }))
        });

        let body = mock.get("/pesquisa-salas", &params(3)).await.unwrap();
        assert_eq!(body["endpoint"], "/pesquisa-salas");
        assert_eq!(body["page"], "3");
    }

    #[tokio::test]
    async fn test_records_calls() {
        let mock = MockHttpClient::new();
        let _ = mock.get("/a", &params(1)).await;
        let _ = mock.get("/b", &params(2)).await;

        assert_eq!(mock.call_count(), 2);
        assert_eq!(
            mock.last_call(),
            Some(RecordedCall {
                endpoint: "/b".into(),
                params: params(2)
            })
        );

        mock.reset();
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_response() {
        let mock = MockHttpClient::new();
        mock.push_delayed_response(json!({ "data": [1] }), Duration::from_secs(2));

        let start = tokio::time::Instant::now();
        let body = mock.get("/x", &params(1)).await.unwrap();
        assert_eq!(body["data"][0], 1);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
