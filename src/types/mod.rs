//! Core types of the query layer.
//!
//! - [`Filters`] / [`FilterValue`]: the open, schema-less filter mapping
//! - [`SortDirection`]: ascending or descending
//! - [`PageState`]: page, filters and sort owned by a controller
//! - [`QueryParams`]: request parameters derived from a `PageState`
//! - [`PaginationInfo`] / [`Page`]: normalized response pagination and rows

mod filters;
mod pagination;
mod params;
mod sort;

pub use filters::{FilterValue, Filters};
pub use pagination::{Page, PaginationInfo};
pub use params::{PageState, QueryParams};
pub use sort::SortDirection;
