//! Prelude module for convenient imports.
//!
//! ```rust
//! use ancine_query::prelude::*;
//! ```
//!
//! This provides access to:
//! - The controller and its options
//! - Error types
//! - Filter, sort and pagination types
//! - The HTTP client trait and the REST client
//! - Endpoint paths

pub use crate::{
    config::{CacheConfig, QueryOptions, RetryConfig},
    endpoints,
    error::{Error, ErrorKind, Result},
    location::{LocationStore, MemoryLocation},
    query::{PaginatedQuery, QuerySnapshot},
    transport::HttpClient,
    types::{FilterValue, Filters, PaginationInfo, QueryParams, SortDirection},
};

#[cfg(feature = "rest")]
pub use crate::transport::RestClient;
