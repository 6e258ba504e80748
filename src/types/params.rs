//! Page state and the request parameters derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Filters, SortDirection};

/// The controller's authoritative page/filter/sort state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageState {
    /// 1-based page number.
    pub current_page: u32,

    /// Active filters, empty values included.
    pub filters: Filters,

    /// Sort column, if any.
    pub sort_column: Option<String>,

    /// Sort direction; only meaningful with a sort column.
    pub sort_direction: SortDirection,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            filters: Filters::default(),
            sort_column: None,
            sort_direction: SortDirection::Asc,
        }
    }
}

impl PageState {
    /// Returns the sort as a `(column, direction)` pair when a column is set.
    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sort_column
            .as_deref()
            .map(|column| (column, self.sort_direction))
    }
}

/// Request parameters for one page fetch.
///
/// Built deterministically from the settled state: `page`, `per_page`,
/// every non-empty filter in key order, then `sort_by` / `sort_direction`
/// when a sort column is set. Equal params always render to the same query
/// string, which makes them usable as a cache key.
///
/// ## Example
///
/// ```rust
/// use ancine_query::{Filters, QueryParams, SortDirection};
///
/// let filters = Filters::new().with("titulo", "").with("pais", "Brasil");
/// let params = QueryParams::build(1, 20, &filters, Some(("total", SortDirection::Desc)));
///
/// assert_eq!(params.get("pais"), Some("Brasil"));
/// assert_eq!(params.get("titulo"), None);
/// assert_eq!(
///     params.to_query_string(),
///     "page=1&per_page=20&pais=Brasil&sort_by=total&sort_direction=desc"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Builds the parameters for a page request.
    pub fn build(
        page: u32,
        page_size: u32,
        filters: &Filters,
        sort: Option<(&str, SortDirection)>,
    ) -> Self {
        let mut params = Self {
            pairs: vec![
                ("page".to_owned(), page.to_string()),
                ("per_page".to_owned(), page_size.to_string()),
            ],
        };

        for (key, value) in filters.active() {
            params.set(key, value.to_string());
        }

        if let Some((column, direction)) = sort {
            params.set("sort_by", column.to_owned());
            params.set("sort_direction", direction.to_string());
        }

        params
    }

    /// Replaces the value of `key` in place, or appends it.
    fn set(&mut self, key: &str, value: String) {
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key.to_owned(), value)),
        }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the parameters in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Renders the parameters as an `application/x-www-form-urlencoded` string.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
