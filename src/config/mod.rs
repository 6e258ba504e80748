//! Configuration types.
//!
//! - [`QueryOptions`]: per-controller paging, debounce, caching and URL options
//! - [`RetryConfig`]: retry behavior of the REST client
//! - [`CacheConfig`]: retention bounds of the shared request cache

mod cache;
mod options;
mod retry;

pub use cache::CacheConfig;
pub use options::QueryOptions;
pub use retry::RetryConfig;
