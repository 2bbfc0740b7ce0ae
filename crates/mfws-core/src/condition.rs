//! Typed search conditions.
//!
//! Each condition renders to one `key{operator}value` triple in the search
//! query. The key is fixed per kind (`q`, `o`, `d`) or derived from the
//! property definition or value list id (`p123`, `vl45`). The operator token
//! follows the key directly, so a text condition with
//! [`Operator::MatchesWildcard`] renders as `p123**=hello*`.

use crate::operator::Operator;
use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

/// Reference to a value list item, by internal id or by external id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueListItemRef {
    /// Vault-internal item id
    Internal(i32),
    /// External (display) id; rendered with an `e` prefix
    External(String),
}

/// One predicate of an object search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchCondition {
    /// Free-text quick search (`q`)
    QuickSearch {
        /// Search term
        term: String,
    },
    /// Restrict by object type (`o`)
    ObjectType {
        /// Object type id
        object_type: i32,
    },
    /// Include deleted objects (`d=include`)
    IncludeDeleted,
    /// Boolean property value (`p{def}`)
    BooleanProperty {
        /// Property definition id
        property_def: i32,
        /// Value to match
        value: bool,
        /// Negate the comparison
        invert: bool,
    },
    /// Date property value (`p{def}`, `yyyy-MM-dd`)
    DateProperty {
        /// Property definition id
        property_def: i32,
        /// Value to compare against
        value: NaiveDate,
        /// Comparison operator
        operator: Operator,
        /// Negate the comparison
        invert: bool,
    },
    /// Timestamp property value (`p{def}`, round-trip format)
    TimestampProperty {
        /// Property definition id
        property_def: i32,
        /// Value to compare against; the offset is kept as given
        value: DateTime<FixedOffset>,
        /// Comparison operator
        operator: Operator,
        /// Negate the comparison
        invert: bool,
    },
    /// Text property value (`p{def}`)
    TextProperty {
        /// Property definition id
        property_def: i32,
        /// Value to compare against; `None` searches for an empty value
        value: Option<String>,
        /// Comparison operator
        operator: Operator,
        /// Negate the comparison
        invert: bool,
    },
    /// Single-select lookup property value (`p{def}`)
    LookupProperty {
        /// Property definition id
        property_def: i32,
        /// Accepted lookup item ids
        lookup_ids: Vec<i32>,
        /// Negate the comparison
        invert: bool,
    },
    /// Multi-select lookup property value (`p{def}`)
    MultiSelectLookupProperty {
        /// Property definition id
        property_def: i32,
        /// Accepted lookup item ids
        lookup_ids: Vec<i32>,
        /// Negate the comparison
        invert: bool,
    },
    /// Value list item (`vl{list}`)
    ValueList {
        /// Value list id
        value_list: i32,
        /// Item to match
        item: ValueListItemRef,
        /// Negate the comparison
        invert: bool,
    },
}

impl SearchCondition {
    /// Quick search for a term.
    #[must_use]
    pub fn quick_search(term: impl Into<String>) -> Self {
        Self::QuickSearch { term: term.into() }
    }

    /// Restrict to one object type.
    #[must_use]
    pub fn object_type(object_type: i32) -> Self {
        Self::ObjectType { object_type }
    }

    /// Include deleted objects in the results.
    #[must_use]
    pub fn include_deleted() -> Self {
        Self::IncludeDeleted
    }

    /// Match a boolean property.
    #[must_use]
    pub fn boolean_property(property_def: i32, value: bool) -> Self {
        Self::BooleanProperty {
            property_def,
            value,
            invert: false,
        }
    }

    /// Compare a date property.
    #[must_use]
    pub fn date_property(property_def: i32, value: NaiveDate, operator: Operator) -> Self {
        Self::DateProperty {
            property_def,
            value,
            operator,
            invert: false,
        }
    }

    /// Compare a timestamp property.
    #[must_use]
    pub fn timestamp_property(
        property_def: i32,
        value: DateTime<FixedOffset>,
        operator: Operator,
    ) -> Self {
        Self::TimestampProperty {
            property_def,
            value,
            operator,
            invert: false,
        }
    }

    /// Compare a text property.
    #[must_use]
    pub fn text_property(property_def: i32, value: impl Into<String>, operator: Operator) -> Self {
        Self::TextProperty {
            property_def,
            value: Some(value.into()),
            operator,
            invert: false,
        }
    }

    /// Match a text property that has no value.
    #[must_use]
    pub fn text_property_empty(property_def: i32) -> Self {
        Self::TextProperty {
            property_def,
            value: None,
            operator: Operator::Equals,
            invert: false,
        }
    }

    /// Match a lookup property against any of the given items.
    #[must_use]
    pub fn lookup_property(property_def: i32, lookup_ids: impl IntoIterator<Item = i32>) -> Self {
        Self::LookupProperty {
            property_def,
            lookup_ids: lookup_ids.into_iter().collect(),
            invert: false,
        }
    }

    /// Match a multi-select lookup property against the given items.
    #[must_use]
    pub fn multi_select_lookup_property(
        property_def: i32,
        lookup_ids: impl IntoIterator<Item = i32>,
    ) -> Self {
        Self::MultiSelectLookupProperty {
            property_def,
            lookup_ids: lookup_ids.into_iter().collect(),
            invert: false,
        }
    }

    /// Match a value list item by internal id.
    #[must_use]
    pub fn value_list(value_list: i32, item_id: i32) -> Self {
        Self::ValueList {
            value_list,
            item: ValueListItemRef::Internal(item_id),
            invert: false,
        }
    }

    /// Match a value list item by external id.
    #[must_use]
    pub fn value_list_external(value_list: i32, external_id: impl Into<String>) -> Self {
        Self::ValueList {
            value_list,
            item: ValueListItemRef::External(external_id.into()),
            invert: false,
        }
    }

    /// Negate the comparison.
    ///
    /// Quick search, object type and include-deleted conditions cannot be
    /// inverted and are returned unchanged.
    #[must_use]
    pub fn inverted(mut self) -> Self {
        match &mut self {
            Self::QuickSearch { .. } | Self::ObjectType { .. } | Self::IncludeDeleted => {}
            Self::BooleanProperty { invert, .. }
            | Self::DateProperty { invert, .. }
            | Self::TimestampProperty { invert, .. }
            | Self::TextProperty { invert, .. }
            | Self::LookupProperty { invert, .. }
            | Self::MultiSelectLookupProperty { invert, .. }
            | Self::ValueList { invert, .. } => *invert = true,
        }
        self
    }

    /// The query-string key, before form encoding.
    #[must_use]
    pub fn query_key(&self) -> String {
        match self {
            Self::QuickSearch { .. } => "q".to_string(),
            Self::ObjectType { .. } => "o".to_string(),
            Self::IncludeDeleted => "d".to_string(),
            Self::BooleanProperty { property_def, .. }
            | Self::DateProperty { property_def, .. }
            | Self::TimestampProperty { property_def, .. }
            | Self::TextProperty { property_def, .. }
            | Self::LookupProperty { property_def, .. }
            | Self::MultiSelectLookupProperty { property_def, .. } => format!("p{property_def}"),
            Self::ValueList { value_list, .. } => format!("vl{value_list}"),
        }
    }

    /// The comparison operator.
    #[must_use]
    pub fn operator(&self) -> Operator {
        match self {
            Self::DateProperty { operator, .. }
            | Self::TimestampProperty { operator, .. }
            | Self::TextProperty { operator, .. } => *operator,
            _ => Operator::Equals,
        }
    }

    /// Whether the comparison is negated.
    #[must_use]
    pub fn invert_operator(&self) -> bool {
        match self {
            Self::QuickSearch { .. } | Self::ObjectType { .. } | Self::IncludeDeleted => false,
            Self::BooleanProperty { invert, .. }
            | Self::DateProperty { invert, .. }
            | Self::TimestampProperty { invert, .. }
            | Self::TextProperty { invert, .. }
            | Self::LookupProperty { invert, .. }
            | Self::MultiSelectLookupProperty { invert, .. }
            | Self::ValueList { invert, .. } => *invert,
        }
    }

    /// The value, before form encoding. `None` is sent as `%00`.
    #[must_use]
    pub fn encoded_value(&self) -> Option<String> {
        match self {
            Self::QuickSearch { term } => Some(term.clone()),
            Self::ObjectType { object_type } => Some(object_type.to_string()),
            Self::IncludeDeleted => Some("include".to_string()),
            Self::BooleanProperty { value, .. } => Some(value.to_string()),
            Self::DateProperty { value, .. } => Some(value.format("%Y-%m-%d").to_string()),
            Self::TimestampProperty { value, .. } => Some(round_trip_timestamp(value)),
            Self::TextProperty { value, .. } => value.clone(),
            Self::LookupProperty { lookup_ids, .. }
            | Self::MultiSelectLookupProperty { lookup_ids, .. } => Some(
                lookup_ids
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Self::ValueList { item, .. } => Some(match item {
                ValueListItemRef::Internal(id) => id.to_string(),
                ValueListItemRef::External(id) => format!("e{id}"),
            }),
        }
    }
}

/// Round-trip timestamp format: seven fractional digits, offset as given.
fn round_trip_timestamp(value: &DateTime<FixedOffset>) -> String {
    let ticks = (value.nanosecond() % 1_000_000_000) / 100;
    format!(
        "{}.{ticks:07}{}",
        value.format("%Y-%m-%dT%H:%M:%S"),
        value.format("%:z")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fixed_keys() {
        assert_eq!(SearchCondition::quick_search("x").query_key(), "q");
        assert_eq!(SearchCondition::object_type(0).query_key(), "o");
        assert_eq!(SearchCondition::include_deleted().query_key(), "d");
    }

    #[test]
    fn property_and_value_list_keys() {
        assert_eq!(SearchCondition::boolean_property(123, true).query_key(), "p123");
        assert_eq!(SearchCondition::value_list(45, 1).query_key(), "vl45");
    }

    #[test]
    fn boolean_is_lowercase() {
        assert_eq!(
            SearchCondition::boolean_property(1, true).encoded_value(),
            Some("true".to_string())
        );
        assert_eq!(
            SearchCondition::boolean_property(1, false).encoded_value(),
            Some("false".to_string())
        );
    }

    #[test]
    fn date_format() {
        let condition = SearchCondition::date_property(123, date(2017, 1, 1), Operator::LessThan);
        assert_eq!(condition.encoded_value(), Some("2017-01-01".to_string()));
        assert_eq!(condition.operator(), Operator::LessThan);
    }

    #[test]
    fn timestamp_keeps_offset() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        let at_utc = utc.with_ymd_and_hms(2017, 1, 1, 11, 12, 3).unwrap();
        let at_plus_two = plus_two.with_ymd_and_hms(2017, 1, 1, 11, 12, 3).unwrap();

        assert_eq!(
            SearchCondition::timestamp_property(21, at_utc, Operator::Equals).encoded_value(),
            Some("2017-01-01T11:12:03.0000000+00:00".to_string())
        );
        assert_eq!(
            SearchCondition::timestamp_property(21, at_plus_two, Operator::Equals).encoded_value(),
            Some("2017-01-01T11:12:03.0000000+02:00".to_string())
        );
    }

    #[test]
    fn timestamp_fraction_has_seven_digits() {
        let offset = FixedOffset::west_opt(5 * 3600 + 1800).unwrap();
        let value = offset
            .with_ymd_and_hms(2020, 2, 29, 23, 59, 59)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        assert_eq!(
            SearchCondition::timestamp_property(1, value, Operator::Equals).encoded_value(),
            Some("2020-02-29T23:59:59.1234567-05:30".to_string())
        );
    }

    #[test]
    fn lookups_are_comma_joined() {
        assert_eq!(
            SearchCondition::lookup_property(123, [456]).encoded_value(),
            Some("456".to_string())
        );
        assert_eq!(
            SearchCondition::multi_select_lookup_property(123, [456, 789]).encoded_value(),
            Some("456,789".to_string())
        );
    }

    #[test]
    fn value_list_external_prefix() {
        assert_eq!(
            SearchCondition::value_list(123, 123).encoded_value(),
            Some("123".to_string())
        );
        assert_eq!(
            SearchCondition::value_list_external(123, "hello").encoded_value(),
            Some("ehello".to_string())
        );
    }

    #[test]
    fn empty_text_has_no_value() {
        assert_eq!(SearchCondition::text_property_empty(5).encoded_value(), None);
    }

    #[test]
    fn fixed_operator_kinds_report_equals() {
        assert_eq!(SearchCondition::quick_search("a").operator(), Operator::Equals);
        assert_eq!(SearchCondition::lookup_property(1, [2]).operator(), Operator::Equals);
    }

    #[test]
    fn inverted_only_applies_to_property_kinds() {
        assert!(SearchCondition::boolean_property(1, true)
            .inverted()
            .invert_operator());
        assert!(SearchCondition::value_list(1, 2).inverted().invert_operator());
        assert!(!SearchCondition::quick_search("a").inverted().invert_operator());
    }

    #[test]
    fn encoded_value_is_idempotent() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let conditions = vec![
            SearchCondition::quick_search("hello world"),
            SearchCondition::object_type(0),
            SearchCondition::include_deleted(),
            SearchCondition::boolean_property(1, true),
            SearchCondition::date_property(2, date(2017, 1, 1), Operator::Equals),
            SearchCondition::timestamp_property(
                3,
                offset.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap(),
                Operator::GreaterThan,
            ),
            SearchCondition::text_property(4, "abc", Operator::Contains),
            SearchCondition::lookup_property(5, [1, 2]),
            SearchCondition::multi_select_lookup_property(6, [3]),
            SearchCondition::value_list_external(7, "x"),
        ];
        for condition in &conditions {
            assert_eq!(condition.encoded_value(), condition.encoded_value());
        }
    }
}
