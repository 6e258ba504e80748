//! Debounce utilities.
//!
//! - [`Debouncer`]: generic "deliver the last value after a quiet period"
//!   primitive. The query controller stacks two of them: 500ms in front of
//!   every filter change and an optional 300ms layer for keystroke input.
//! - [`DebouncedSearch`]: input/search value pair for search boxes.

mod debouncer;
mod search;

pub use debouncer::Debouncer;
pub use search::{DebouncedSearch, DEFAULT_SEARCH_DELAY};
