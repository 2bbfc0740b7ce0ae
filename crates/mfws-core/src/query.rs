//! Search query assembly.
//!
//! Turns an ordered list of [`SearchCondition`]s into the query string of
//! a `/REST/objects` request. Conditions are emitted in the order given,
//! never sorted or deduplicated, so identical input always yields
//! byte-identical output.

use crate::condition::SearchCondition;
use crate::encoding::url_encode;
use crate::error::EncodingError;
use crate::operator::encode_operator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal sent in place of a missing value.
const NULL_VALUE: &str = "%00";

/// Maximum number of search results to request.
///
/// Negative values leave the server default in place (500 items), zero asks
/// for an unlimited result set, positive values cap the result count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchLimit(pub i32);

impl SearchLimit {
    /// Use the server's default limit; the parameter is omitted.
    pub const SERVER_DEFAULT: SearchLimit = SearchLimit(-1);
    /// No limit; sent as `limit=0`.
    pub const UNLIMITED: SearchLimit = SearchLimit(0);

    /// Whether the limit parameter should be omitted.
    #[must_use]
    pub fn is_server_default(self) -> bool {
        self.0 < 0
    }
}

impl Default for SearchLimit {
    fn default() -> Self {
        Self::SERVER_DEFAULT
    }
}

impl From<i32> for SearchLimit {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for SearchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the query string for a set of conditions.
///
/// Returns an empty string when there are no conditions and the limit is
/// the server default, so the caller's resource path is used unchanged.
///
/// # Errors
///
/// Returns [`EncodingError::NotSupported`] if any condition carries
/// [`Operator::Unknown`](crate::Operator::Unknown).
///
/// # Examples
///
/// ```
/// use mfws_core::{build_search_query, SearchCondition, SearchLimit};
///
/// let query = build_search_query(
///     &[SearchCondition::object_type(123)],
///     SearchLimit(2),
/// ).unwrap();
/// assert_eq!(query, "?o=123&limit=2");
/// ```
pub fn build_search_query(
    conditions: &[SearchCondition],
    limit: SearchLimit,
) -> Result<String, EncodingError> {
    let mut query = String::from("?");

    for condition in conditions {
        query.push_str(&url_encode(&condition.query_key()));
        query.push_str(&encode_operator(
            condition.operator(),
            condition.invert_operator(),
        )?);
        match condition.encoded_value() {
            Some(value) => query.push_str(&url_encode(&value)),
            None => query.push_str(NULL_VALUE),
        }
        query.push('&');
    }

    if !limit.is_server_default() {
        query.push_str(&format!("limit={limit}"));
    }

    if query.ends_with('&') {
        query.pop();
    }
    if query.ends_with('?') {
        query.pop();
    }

    tracing::trace!(query, "Built search query");

    Ok(query)
}

/// Accumulates conditions and a limit for one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    conditions: Vec<SearchCondition>,
    limit: SearchLimit,
}

impl SearchQuery {
    /// Create an empty query using the server default limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition.
    #[must_use]
    pub fn condition(mut self, condition: SearchCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Set the result limit.
    #[must_use]
    pub fn limit(mut self, limit: impl Into<SearchLimit>) -> Self {
        self.limit = limit.into();
        self
    }

    /// The conditions, in insertion order.
    #[must_use]
    pub fn conditions(&self) -> &[SearchCondition] {
        &self.conditions
    }

    /// Render the query string.
    ///
    /// # Errors
    ///
    /// See [`build_search_query`].
    pub fn build(&self) -> Result<String, EncodingError> {
        build_search_query(&self.conditions, self.limit)
    }
}

impl FromIterator<SearchCondition> for SearchQuery {
    fn from_iter<I: IntoIterator<Item = SearchCondition>>(iter: I) -> Self {
        Self {
            conditions: iter.into_iter().collect(),
            limit: SearchLimit::SERVER_DEFAULT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use chrono::NaiveDate;

    fn build(conditions: &[SearchCondition]) -> String {
        build_search_query(conditions, SearchLimit::SERVER_DEFAULT).unwrap()
    }

    #[test]
    fn quick_search() {
        assert_eq!(
            build(&[SearchCondition::quick_search("hello world")]),
            "?q=hello+world"
        );
    }

    #[test]
    fn quick_search_with_object_type() {
        assert_eq!(
            build(&[
                SearchCondition::quick_search("hello world"),
                SearchCondition::object_type(0),
            ]),
            "?q=hello+world&o=0"
        );
    }

    #[test]
    fn limit_boundaries() {
        let conditions = [SearchCondition::object_type(123)];
        assert_eq!(
            build_search_query(&conditions, SearchLimit(-1)).unwrap(),
            "?o=123"
        );
        assert_eq!(
            build_search_query(&conditions, SearchLimit(-50)).unwrap(),
            "?o=123"
        );
        assert_eq!(
            build_search_query(&conditions, SearchLimit::UNLIMITED).unwrap(),
            "?o=123&limit=0"
        );
        assert_eq!(
            build_search_query(&conditions, SearchLimit(2)).unwrap(),
            "?o=123&limit=2"
        );
    }

    #[test]
    fn no_conditions() {
        assert_eq!(build(&[]), "");
        assert_eq!(
            build_search_query(&[], SearchLimit(10)).unwrap(),
            "?limit=10"
        );
    }

    #[test]
    fn include_deleted() {
        assert_eq!(build(&[SearchCondition::include_deleted()]), "?d=include");
    }

    #[test]
    fn text_operators_follow_key() {
        assert_eq!(
            build(&[SearchCondition::text_property(123, "hello", Operator::Equals)]),
            "?p123=hello"
        );
        assert_eq!(
            build(&[SearchCondition::text_property(
                123,
                "hello*",
                Operator::MatchesWildcard
            )]),
            "?p123**=hello*"
        );
        assert_eq!(
            build(&[SearchCondition::text_property(123, "hello", Operator::Contains)]),
            "?p123*=hello"
        );
        assert_eq!(
            build(&[SearchCondition::text_property(
                123,
                "hello",
                Operator::StartsWith
            )]),
            "?p123^=hello"
        );
    }

    #[test]
    fn date_operators() {
        let day = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        let cases = [
            (Operator::Equals, "?p123=2017-01-01"),
            (Operator::LessThan, "?p123<<=2017-01-01"),
            (Operator::LessThanOrEqual, "?p123<=2017-01-01"),
            (Operator::GreaterThan, "?p123>>=2017-01-01"),
            (Operator::GreaterThanOrEqual, "?p123>=2017-01-01"),
        ];
        for (operator, expected) in cases {
            assert_eq!(
                build(&[SearchCondition::date_property(123, day, operator)]),
                expected
            );
        }
    }

    #[test]
    fn timestamp_is_form_encoded() {
        let offset = chrono::FixedOffset::east_opt(0).unwrap();
        let value = chrono::TimeZone::with_ymd_and_hms(&offset, 2017, 1, 1, 11, 12, 3).unwrap();
        assert_eq!(
            build(&[SearchCondition::timestamp_property(
                21,
                value,
                Operator::Equals
            )]),
            "?p21=2017-01-01T11%3A12%3A03.0000000%2B00%3A00"
        );
    }

    #[test]
    fn lookups() {
        assert_eq!(
            build(&[SearchCondition::lookup_property(123, [456])]),
            "?p123=456"
        );
        assert_eq!(
            build(&[SearchCondition::multi_select_lookup_property(
                123,
                [456, 789]
            )]),
            "?p123=456%2C789"
        );
    }

    #[test]
    fn value_lists() {
        assert_eq!(build(&[SearchCondition::value_list(123, 123)]), "?vl123=123");
        assert_eq!(
            build(&[SearchCondition::value_list_external(123, "hello")]),
            "?vl123=ehello"
        );
    }

    #[test]
    fn booleans() {
        assert_eq!(
            build(&[SearchCondition::boolean_property(123, true)]),
            "?p123=true"
        );
        assert_eq!(
            build(&[SearchCondition::boolean_property(123, false).inverted()]),
            "?p123!=false"
        );
    }

    #[test]
    fn null_value_sentinel() {
        assert_eq!(
            build(&[SearchCondition::text_property_empty(1050)]),
            "?p1050=%00"
        );
    }

    #[test]
    fn unknown_operator_fails_whole_build() {
        let conditions = [
            SearchCondition::quick_search("ok"),
            SearchCondition::text_property(1, "x", Operator::Unknown),
        ];
        let err = build_search_query(&conditions, SearchLimit(5)).unwrap_err();
        assert!(matches!(err, EncodingError::NotSupported(_)));
    }

    #[test]
    fn order_is_preserved() {
        let a = SearchCondition::quick_search("a");
        let b = SearchCondition::object_type(1);
        let c = SearchCondition::boolean_property(2, true);

        let permutations = [
            ([&a, &b, &c], "?q=a&o=1&p2=true"),
            ([&a, &c, &b], "?q=a&p2=true&o=1"),
            ([&b, &a, &c], "?o=1&q=a&p2=true"),
            ([&b, &c, &a], "?o=1&p2=true&q=a"),
            ([&c, &a, &b], "?p2=true&q=a&o=1"),
            ([&c, &b, &a], "?p2=true&o=1&q=a"),
        ];
        for (order, expected) in permutations {
            let conditions: Vec<SearchCondition> = order.into_iter().cloned().collect();
            assert_eq!(build(&conditions), expected);
        }
    }

    #[test]
    fn duplicates_are_kept() {
        let condition = SearchCondition::object_type(1);
        assert_eq!(build(&[condition.clone(), condition]), "?o=1&o=1");
    }

    #[test]
    fn builder_matches_function() {
        let query = SearchQuery::new()
            .condition(SearchCondition::quick_search("hello world"))
            .condition(SearchCondition::object_type(0))
            .limit(0);
        assert_eq!(query.build().unwrap(), "?q=hello+world&o=0&limit=0");
        assert_eq!(query.conditions().len(), 2);
    }

    #[test]
    fn output_is_deterministic() {
        let query: SearchQuery = [
            SearchCondition::quick_search("x y"),
            SearchCondition::multi_select_lookup_property(1, [2, 3]),
        ]
        .into_iter()
        .collect();
        assert_eq!(query.build().unwrap(), query.build().unwrap());
    }
}
