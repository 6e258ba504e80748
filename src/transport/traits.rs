//! The HTTP client abstraction consumed by query controllers.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::types::QueryParams;
use crate::Error;

/// Future returned by [`HttpClient::get`].
pub type GetFuture<'a> = BoxFuture<'a, Result<Value, Error>>;

/// Object-safe trait for issuing parameterized GET requests.
///
/// Implementations own retry, backoff and timeout behavior. Controllers call
/// [`get`](HttpClient::get) once per fetch and republish any error unchanged.
///
/// ## Example
///
/// ```rust
/// use ancine_query::{Error, HttpClient, QueryParams};
/// use serde_json::Value;
///
/// async fn first_row(client: &dyn HttpClient) -> Result<Option<Value>, Error> {
///     let params: QueryParams = [("page", "1"), ("per_page", "1")].into_iter().collect();
///     let body = client.get("/producao/obras", &params).await?;
///     Ok(body.get("data").and_then(|d| d.get(0)).cloned())
/// }
/// ```
///
/// ## Object Safety
///
/// Use `Arc<dyn HttpClient>` to share one client across controllers.
pub trait HttpClient: Send + Sync {
    /// Issues `GET {base}{endpoint}?{params}` and returns the decoded JSON body.
    fn get<'a>(&'a self, endpoint: &'a str, params: &'a QueryParams) -> GetFuture<'a>;
}

impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    fn get<'a>(&'a self, endpoint: &'a str, params: &'a QueryParams) -> GetFuture<'a> {
        (**self).get(endpoint, params)
    }
}
