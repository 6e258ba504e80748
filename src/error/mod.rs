//! Error types for the query layer.
//!
//! - [`Error`]: a classified request failure (network, timeout, 4xx, 5xx)
//! - [`ErrorKind`]: the category, for `match` statements
//!
//! ## Key Invariant
//!
//! The [`PaginatedQuery`](crate::PaginatedQuery) controller raises no errors
//! of its own. It republishes whatever the [`HttpClient`](crate::HttpClient)
//! reports, unchanged, and keeps the last good rows on screen.
//! Missing pagination metadata is not an error: it falls back to a default
//! shape derived from the request.

mod core;
mod kind;

pub use self::core::Error;
pub use self::kind::ErrorKind;

/// A specialized `Result` type for query operations.
pub type Result<T> = std::result::Result<T, Error>;
