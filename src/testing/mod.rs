//! Testing utilities.
//!
//! - [`MockHttpClient`]: a scripted, recording [`HttpClient`](crate::HttpClient)
//!   for driving a [`PaginatedQuery`](crate::PaginatedQuery) without a network
//! - [`MemoryLocation`](crate::MemoryLocation): an in-memory location whose
//!   history length shows whether a URL was replaced or pushed
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use ancine_query::testing::MockHttpClient;
//! use ancine_query::{endpoints, PaginatedQuery};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> ancine_query::Result<()> {
//! let mock = MockHttpClient::new().with_response(json!({ "data": [{ "uf": "SP" }] }));
//!
//! let query = PaginatedQuery::<serde_json::Value>::builder()
//!     .endpoint(endpoints::SALAS_POR_UF)
//!     .client(Arc::new(mock.clone()))
//!     .build()?;
//!
//! query.refetch().await.ok();
//! assert_eq!(mock.last_call().unwrap().endpoint, endpoints::SALAS_POR_UF);
//! # Ok(())
//! # }
//! ```

mod mock_client;

pub use mock_client::{MockHttpClient, RecordedCall};
