//! HTTP transport.
//!
//! - [`HttpClient`]: the object-safe abstraction controllers fetch through
//! - [`RestClient`] (feature `rest`, default): reqwest implementation for the
//!   ANCINE API
//!
//! Tests use [`MockHttpClient`](crate::testing::MockHttpClient) instead.

pub(crate) mod traits;

#[cfg(feature = "rest")]
pub(crate) mod rest;

pub use traits::{GetFuture, HttpClient};

#[cfg(feature = "rest")]
pub use rest::{RestClient, RestClientBuilder, BASE_URL_ENV, DEFAULT_BASE_URL};
