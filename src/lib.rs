//! # ancine-query
//!
//! Paginated data fetching for the ANCINE statistics dashboard.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ancine_query::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Obra {
//!     titulo: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> ancine_query::Result<()> {
//!     let client = RestClient::from_env()?;
//!
//!     let query = PaginatedQuery::<Obra>::builder()
//!         .endpoint(endpoints::PRODUCAO_OBRAS)
//!         .client(Arc::new(client))
//!         .options(QueryOptions::builder().page_size(15).build())
//!         .build()?;
//!
//!     query.set_filters(Filters::new().with("tipo_obra", "Documentário"));
//!
//!     let mut changes = query.subscribe();
//!     while changes.changed().await.is_ok() {
//!         let snapshot = query.snapshot();
//!         if !snapshot.is_loading && !snapshot.is_refetching {
//!             println!("{} obras", snapshot.pagination.total_items);
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Live vs settled state**: setters update page, filters and sort at
//!   once; a request is only issued for the *settled* state. Filter changes
//!   settle after a 500ms quiet period, page and sort changes immediately.
//! - **Last write wins**: a response is applied only if its parameters are
//!   still the current ones.
//! - **Errors keep data**: a failed request sets the error but leaves the
//!   previous rows and pagination in place.
//! - **URL mirroring**: with `sync_with_url`, state is seeded from and
//!   written back to a [`LocationStore`] by replacement, never by push.
//!
//! ## Features
//!
//! - `rest` (default): [`RestClient`] over reqwest
//! - `rustls` (default): rustls for TLS
//! - `native-tls`: platform TLS instead of rustls

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod error;
pub mod types;

// Building blocks
pub mod cache;
pub mod debounce;
pub mod endpoints;
pub mod location;

// Controller
pub mod query;

// Transport layer
pub mod transport;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

#[cfg(feature = "rest")]
mod user_agent;

// Re-export main types at crate root for convenience
pub use error::{Error, ErrorKind, Result};
pub use query::{PaginatedQuery, PaginatedQueryBuilder, QuerySnapshot};
pub use types::{
    FilterValue, Filters, Page, PageState, PaginationInfo, QueryParams, SortDirection,
};

// Re-export config types
pub use config::{CacheConfig, QueryOptions, RetryConfig};

// Re-export building blocks
pub use cache::{CacheEntry, CacheKey, MemoryCache, RequestCache};
pub use debounce::{DebouncedSearch, Debouncer, DEFAULT_SEARCH_DELAY};
pub use location::{LocationStore, MemoryLocation};

// Re-export transport types
pub use transport::{GetFuture, HttpClient};
#[cfg(feature = "rest")]
pub use transport::{RestClient, RestClientBuilder};
