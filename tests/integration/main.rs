//! Integration tests for ancine-query.
//!
//! These tests drive [`PaginatedQuery`](ancine_query::PaginatedQuery)
//! controllers through a real [`RestClient`](ancine_query::RestClient)
//! against a local wiremock server, so no ANCINE deployment is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With request logs
//! RUST_LOG=ancine_query=debug cargo test --test integration -- --nocapture
//! ```

mod common;
mod controller_tests;
mod rest_tests;
