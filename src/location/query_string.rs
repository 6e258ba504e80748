//! URL query-string encoding of a page state.
//!
//! ```text
//! ?page=<int>&<filterKey>=<value>&...&sortBy=<col>&sortDirection=<asc|desc>
//! ```
//!
//! `page` is omitted when it is 1, empty filters are omitted, and the sort
//! keys are omitted when no sort column is set.

use url::form_urlencoded;

use crate::types::{FilterValue, Filters, PageState, SortDirection};

/// Query key for the page number.
pub const PAGE_KEY: &str = "page";
/// Query key for the sort column.
pub const SORT_BY_KEY: &str = "sortBy";
/// Query key for the sort direction.
pub const SORT_DIRECTION_KEY: &str = "sortDirection";

fn is_reserved(key: &str) -> bool {
    key == PAGE_KEY || key == SORT_BY_KEY || key == SORT_DIRECTION_KEY
}

/// Encodes `state` as a shareable query string (without the leading `?`).
///
/// ```rust
/// use ancine_query::location::encode_state;
/// use ancine_query::{Filters, PageState, SortDirection};
///
/// let state = PageState {
///     current_page: 3,
///     filters: Filters::new().with("uf", "SP"),
///     sort_column: Some("total".into()),
///     sort_direction: SortDirection::Desc,
/// };
/// assert_eq!(encode_state(&state), "page=3&uf=SP&sortBy=total&sortDirection=desc");
/// ```
pub fn encode_state(state: &PageState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if state.current_page > 1 {
        serializer.append_pair(PAGE_KEY, &state.current_page.to_string());
    }

    for (key, value) in state.filters.active() {
        serializer.append_pair(key, &value.to_string());
    }

    if let Some((column, direction)) = state.sort() {
        serializer.append_pair(SORT_BY_KEY, column);
        serializer.append_pair(SORT_DIRECTION_KEY, direction.as_str());
    }

    serializer.finish()
}

/// Seeds a page state from a query string.
///
/// - `page` defaults to 1 when absent, zero or unparsable.
/// - Every other key except `sortBy`/`sortDirection` becomes a text filter,
///   overriding the same key in `defaults.filters`.
/// - `sortBy`/`sortDirection` override the default sort when present and
///   valid.
///
/// A leading `?` is accepted.
pub fn decode_state(query: &str, defaults: &PageState) -> PageState {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut current_page = 1;
    let mut url_filters = Filters::new();
    let mut sort_column = None;
    let mut sort_direction = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            PAGE_KEY => {
                current_page = value.parse::<u32>().ok().filter(|p| *p > 0).unwrap_or(1);
            }
            SORT_BY_KEY if !value.is_empty() => sort_column = Some(value.into_owned()),
            SORT_DIRECTION_KEY => sort_direction = value.parse::<SortDirection>().ok(),
            k if is_reserved(k) => {}
            _ => {
                url_filters.insert(key.to_string(), FilterValue::Text(value.into_owned()));
            }
        }
    }

    let mut filters = defaults.filters.clone();
    filters.merge(url_filters);

    PageState {
        current_page,
        filters,
        sort_column: sort_column.or_else(|| defaults.sort_column.clone()),
        sort_direction: sort_direction.unwrap_or(defaults.sort_direction),
    }
}
