//! Client-side encoding of filter parameters.
//!
//! Produces the `op:value` tokens that [`parse_filters`](crate::filter::parse_filters)
//! reads back.
//!
//! ```
//! use qail_filter::url::UrlFilterBuilder;
//!
//! let qs = UrlFilterBuilder::new()
//!     .equals("status", "active")
//!     .greater_than("age", 30)
//!     .any_of("id", &[1, 2, 3])
//!     .to_query_string();
//! assert_eq!(qs, "status=active&age=%3E%3A30&id=in%3A1%2C2%2C3");
//! ```

use std::fmt::Display;

use crate::ast::Operator;

/// Chaining builder of filter query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlFilterBuilder {
    filters: Vec<(String, String)>,
}

impl UrlFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `op` applied to `values`.
    ///
    /// Values are joined with `,`. A key set twice keeps its first position.
    pub fn condition<T: Display>(mut self, key: &str, op: Operator, values: &[T]) -> Self {
        let joined = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let token = match op.prefix() {
            Some(prefix) => format!("{}:{}", prefix, joined),
            None => joined,
        };

        match self.filters.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = token,
            None => self.filters.push((key.to_string(), token)),
        }
        self
    }

    pub fn equals(self, key: &str, value: impl Display) -> Self {
        self.condition(key, Operator::Eq, &[value])
    }

    pub fn greater_than(self, key: &str, value: impl Display) -> Self {
        self.condition(key, Operator::Gt, &[value])
    }

    pub fn greater_than_or_equal(self, key: &str, value: impl Display) -> Self {
        self.condition(key, Operator::Gte, &[value])
    }

    pub fn less_than(self, key: &str, value: impl Display) -> Self {
        self.condition(key, Operator::Lt, &[value])
    }

    pub fn less_than_or_equal(self, key: &str, value: impl Display) -> Self {
        self.condition(key, Operator::Lte, &[value])
    }

    pub fn not_equals(self, key: &str, value: impl Display) -> Self {
        self.condition(key, Operator::Ne, &[value])
    }

    /// Substring match; the server adds the `%` wildcards.
    pub fn like(self, key: &str, value: impl Display) -> Self {
        self.condition(key, Operator::Like, &[value])
    }

    pub fn not_like(self, key: &str, value: impl Display) -> Self {
        self.condition(key, Operator::NotLike, &[value])
    }

    /// `in:` list.
    pub fn any_of<T: Display>(self, key: &str, values: &[T]) -> Self {
        self.condition(key, Operator::In, values)
    }

    /// `!in:` list.
    pub fn none_of<T: Display>(self, key: &str, values: &[T]) -> Self {
        self.condition(key, Operator::NotIn, values)
    }

    pub fn between<T: Display>(self, key: &str, low: T, high: T) -> Self {
        self.condition(key, Operator::Between, &[low, high])
    }

    /// Unescaped `(key, token)` pairs in insertion order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Percent-encoded `key=token` pairs joined with `&`.
    pub fn to_query_string(&self) -> String {
        self.filters
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl Display for UrlFilterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}
