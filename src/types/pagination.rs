//! Pagination metadata and response normalization.
//!
//! The backend reports pagination in one of two shapes:
//!
//! ```text
//! Form A: { "data": [...], "metadata": { "pagination": { page, per_page, total, total_pages } } }
//! Form B: { "data": [...], "pagination": { current_page, page_size, total_items, total_pages } }
//! ```
//!
//! [`PaginationInfo::normalize`] tries Form A, then Form B, then falls back to
//! a shape derived from the request. A response never yields "no pagination".

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// Canonical pagination of one fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// 1-based page number.
    pub current_page: u32,
    /// Total number of pages (at least 1).
    pub total_pages: u32,
    /// Total number of rows across all pages.
    pub total_items: u64,
    /// Rows per page.
    pub page_size: u32,
}

/// Form A: `metadata.pagination`.
#[derive(Debug, Clone, Deserialize)]
struct MetadataPagination {
    page: Option<u32>,
    per_page: Option<u32>,
    total: Option<u64>,
    total_pages: Option<u32>,
}

/// Form B: top-level `pagination`.
#[derive(Debug, Clone, Deserialize)]
struct DirectPagination {
    current_page: Option<u32>,
    page_size: Option<u32>,
    total_items: Option<u64>,
    total_pages: Option<u32>,
}

impl PaginationInfo {
    /// Pagination for a request whose response carried no usable metadata.
    ///
    /// Reports the requested page and size with no known rows. `total_pages`
    /// is raised to the requested page so `current_page <= total_pages` holds.
    pub fn fallback(requested_page: u32, page_size: u32) -> Self {
        let current_page = requested_page.max(1);
        Self {
            current_page,
            total_pages: current_page,
            total_items: 0,
            page_size,
        }
    }

    /// Extracts pagination from a raw response body.
    ///
    /// Ordered fallback: Form A, then Form B, then [`fallback`](Self::fallback).
    /// Missing or zero fields inside a form default to the requested page,
    /// one page, zero rows and the requested page size respectively.
    ///
    /// ```rust
    /// use ancine_query::PaginationInfo;
    /// use serde_json::json;
    ///
    /// let body = json!({
    ///     "data": [],
    ///     "metadata": { "pagination": { "page": 2, "per_page": 20, "total": 57, "total_pages": 3 } }
    /// });
    /// let info = PaginationInfo::normalize(&body, 2, 20);
    /// assert_eq!(info.total_items, 57);
    /// assert_eq!(info.total_pages, 3);
    /// ```
    pub fn normalize(response: &Value, requested_page: u32, page_size: u32) -> Self {
        Self::from_metadata(response, requested_page, page_size)
            .or_else(|| Self::from_direct(response, requested_page, page_size))
            .unwrap_or_else(|| Self::fallback(requested_page, page_size))
    }

    fn from_metadata(response: &Value, requested_page: u32, page_size: u32) -> Option<Self> {
        let raw = response.get("metadata")?.get("pagination")?;
        let form = MetadataPagination::deserialize(raw).ok()?;
        Some(Self::assemble(
            form.page,
            form.total_pages,
            form.total,
            form.per_page,
            requested_page,
            page_size,
        ))
    }

    fn from_direct(response: &Value, requested_page: u32, page_size: u32) -> Option<Self> {
        let raw = response.get("pagination")?;
        let form = DirectPagination::deserialize(raw).ok()?;
        Some(Self::assemble(
            form.current_page,
            form.total_pages,
            form.total_items,
            form.page_size,
            requested_page,
            page_size,
        ))
    }

    fn assemble(
        page: Option<u32>,
        total_pages: Option<u32>,
        total_items: Option<u64>,
        per_page: Option<u32>,
        requested_page: u32,
        page_size: u32,
    ) -> Self {
        let total_pages = total_pages.filter(|n| *n > 0).unwrap_or(1);
        let current_page = page
            .filter(|n| *n > 0)
            .unwrap_or(requested_page)
            .clamp(1, total_pages);

        Self {
            current_page,
            total_pages,
            total_items: total_items.unwrap_or(0),
            page_size: per_page.filter(|n| *n > 0).unwrap_or(page_size),
        }
    }

    /// Returns `true` if a page follows this one.
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Returns `true` if a page precedes this one.
    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }
}

/// One decoded page: its rows and normalized pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Rows of the page.
    pub data: Vec<T>,
    /// Normalized pagination.
    pub pagination: PaginationInfo,
}

impl<T: DeserializeOwned> Page<T> {
    /// Decodes a raw response body.
    ///
    /// Rows are read from `data`; a missing or `null` `data` is an empty
    /// page. Rows that do not match `T` are an
    /// [`InvalidResponse`](crate::ErrorKind::InvalidResponse) error, while
    /// malformed pagination silently falls back (see
    /// [`PaginationInfo::normalize`]).
    pub fn from_response(response: &Value, requested_page: u32, page_size: u32) -> Result<Self, Error> {
        let data = match response.get("data") {
            None | Some(Value::Null) => Vec::new(),
            Some(rows) => Vec::<T>::deserialize(rows).map_err(|e| {
                Error::invalid_response(format!("Failed to decode rows: {}", e)).with_source(e)
            })?,
        };

        Ok(Self {
            data,
            pagination: PaginationInfo::normalize(response, requested_page, page_size),
        })
    }
}
