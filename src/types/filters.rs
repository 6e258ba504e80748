//! Filter values and the open filter mapping.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar filter value.
///
/// Filters have no fixed schema: any key may carry a string, a number or a
/// boolean. Values render to query parameters with [`Display`](fmt::Display).
///
/// # Example
///
/// ```rust
/// use ancine_query::FilterValue;
///
/// let uf: FilterValue = "SP".into();
/// let year: FilterValue = 2022.into();
/// let national: FilterValue = true.into();
///
/// assert_eq!(year.to_string(), "2022");
/// assert!(FilterValue::from("").is_empty());
/// assert!(!uf.is_empty() && !national.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Boolean value.
    Bool(bool),

    /// Integer value (64-bit signed).
    Integer(i64),

    /// Floating-point value (64-bit).
    Float(f64),

    /// String value.
    Text(String),
}

impl FilterValue {
    /// Returns `true` for the empty string.
    ///
    /// Empty filters are never sent to the server nor written to the URL.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, FilterValue::Text(s) if s.is_empty())
    }

    /// Returns the string value if this is a Text variant.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value if this is an Integer variant.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FilterValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Bool variant.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FilterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Integer(value as i64)
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Integer(value as i64)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Float(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Integer(i) => write!(f, "{}", i),
            FilterValue::Float(fl) => write!(f, "{}", fl),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

/// The active filters of a query: an open, string-keyed map of scalars.
///
/// Keys are kept sorted so that request parameters, URLs and cache keys are
/// deterministic for a given set of filters.
///
/// ## Example
///
/// ```rust
/// use ancine_query::Filters;
///
/// let filters = Filters::new()
///     .with("titulo", "")
///     .with("pais", "Brasil");
///
/// let active: Vec<_> = filters.active().map(|(k, _)| k).collect();
/// assert_eq!(active, vec!["pais"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters {
    values: BTreeMap<String, FilterValue>,
}

impl Filters {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter and returns `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a filter, returning the previous value for `key`.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Option<FilterValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Removes a filter.
    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.values.remove(key)
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Returns the number of filters, empty ones included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no filters at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all filters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the filters that constrain the query (non-empty values).
    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.iter().filter(|(_, v)| !v.is_empty())
    }

    /// Overlays `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: Filters) {
        self.values.extend(other.values);
    }
}

impl<K, V> FromIterator<(K, V)> for Filters
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Filters
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
