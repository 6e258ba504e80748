//! Point-in-time copy of a controller's outputs.

use std::fmt;
use std::sync::Arc;

use crate::types::{Filters, PaginationInfo, SortDirection};
use crate::Error;

/// Everything a view renders, captured under one lock.
pub struct QuerySnapshot<T> {
    /// Rows of the last applied page.
    pub data: Arc<Vec<T>>,
    /// Pagination of the last applied page, or one derived from the current
    /// page before any response arrived.
    pub pagination: PaginationInfo,
    /// A request is running and nothing has been shown yet.
    pub is_loading: bool,
    /// A request is running while earlier data is shown.
    pub is_refetching: bool,
    /// The last request for the current parameters failed.
    pub error: Option<Arc<Error>>,
    /// Live page number.
    pub current_page: u32,
    /// Live filters (may still be debouncing).
    pub filters: Filters,
    /// Live sort column.
    pub sort_column: Option<String>,
    /// Live sort direction.
    pub sort_direction: SortDirection,
}

impl<T> QuerySnapshot<T> {
    /// Returns `true` if the last request failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> Clone for QuerySnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            pagination: self.pagination,
            is_loading: self.is_loading,
            is_refetching: self.is_refetching,
            error: self.error.clone(),
            current_page: self.current_page,
            filters: self.filters.clone(),
            sort_column: self.sort_column.clone(),
            sort_direction: self.sort_direction,
        }
    }
}

impl<T> fmt::Debug for QuerySnapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySnapshot")
            .field("rows", &self.data.len())
            .field("pagination", &self.pagination)
            .field("is_loading", &self.is_loading)
            .field("is_refetching", &self.is_refetching)
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .field("current_page", &self.current_page)
            .field("filters", &self.filters)
            .field("sort_column", &self.sort_column)
            .field("sort_direction", &self.sort_direction)
            .finish()
    }
}
