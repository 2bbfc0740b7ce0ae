//! Property values and definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property data type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum DataType {
    /// No type
    #[default]
    Uninitialized,
    /// Single-line text
    Text,
    /// Integer
    Integer,
    /// Floating point
    Floating,
    /// Date
    Date,
    /// Time of day
    Time,
    /// Timestamp
    Timestamp,
    /// Boolean
    Boolean,
    /// Single-select lookup
    Lookup,
    /// Multi-select lookup
    MultiSelectLookup,
    /// 64-bit integer
    Integer64,
    /// File time
    FileTime,
    /// Multi-line text
    MultiLineText,
    /// Type not known to this client
    Other(i32),
}

impl From<i32> for DataType {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Uninitialized,
            1 => Self::Text,
            2 => Self::Integer,
            3 => Self::Floating,
            5 => Self::Date,
            6 => Self::Time,
            7 => Self::Timestamp,
            8 => Self::Boolean,
            9 => Self::Lookup,
            10 => Self::MultiSelectLookup,
            11 => Self::Integer64,
            12 => Self::FileTime,
            13 => Self::MultiLineText,
            other => Self::Other(other),
        }
    }
}

impl From<DataType> for i32 {
    fn from(value: DataType) -> Self {
        match value {
            DataType::Uninitialized => 0,
            DataType::Text => 1,
            DataType::Integer => 2,
            DataType::Floating => 3,
            DataType::Date => 5,
            DataType::Time => 6,
            DataType::Timestamp => 7,
            DataType::Boolean => 8,
            DataType::Lookup => 9,
            DataType::MultiSelectLookup => 10,
            DataType::Integer64 => 11,
            DataType::FileTime => 12,
            DataType::MultiLineText => 13,
            DataType::Other(other) => other,
        }
    }
}

/// Reference to a value list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lookup {
    /// Item id
    pub item: i32,
    /// Item version; -1 means latest
    #[serde(default = "latest_version")]
    pub version: i32,
    /// Display value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    /// Whether the item is deleted
    #[serde(default)]
    pub deleted: bool,
    /// Whether the item is hidden
    #[serde(default)]
    pub hidden: bool,
}

fn latest_version() -> i32 {
    -1
}

impl Lookup {
    /// Reference to the latest version of an item.
    #[must_use]
    pub fn item(item: i32) -> Self {
        Self {
            item,
            version: latest_version(),
            display_value: None,
            deleted: false,
            hidden: false,
        }
    }
}

/// A typed property value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypedValue {
    /// Data type
    pub data_type: DataType,
    /// Raw value for scalar types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Whether a value is present
    #[serde(default)]
    pub has_value: bool,
    /// Display value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    /// Single-select lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup: Option<Lookup>,
    /// Multi-select lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookups: Option<Vec<Lookup>>,
}

/// A property definition paired with its value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropertyValue {
    /// Property definition id
    pub property_def: i32,
    /// The value
    pub typed_value: TypedValue,
}

impl PropertyValue {
    /// Text (or multi-line text) value.
    #[must_use]
    pub fn text(property_def: i32, value: impl Into<String>) -> Self {
        Self::scalar(property_def, DataType::Text, Value::String(value.into()))
    }

    /// Boolean value.
    #[must_use]
    pub fn boolean(property_def: i32, value: bool) -> Self {
        Self::scalar(property_def, DataType::Boolean, Value::Bool(value))
    }

    /// Integer value.
    #[must_use]
    pub fn integer(property_def: i32, value: i32) -> Self {
        Self::scalar(property_def, DataType::Integer, Value::from(value))
    }

    /// Single-select lookup value.
    #[must_use]
    pub fn lookup(property_def: i32, item: i32) -> Self {
        Self {
            property_def,
            typed_value: TypedValue {
                data_type: DataType::Lookup,
                has_value: true,
                lookup: Some(Lookup::item(item)),
                ..TypedValue::default()
            },
        }
    }

    /// Multi-select lookup value.
    #[must_use]
    pub fn multi_select_lookup(property_def: i32, items: impl IntoIterator<Item = i32>) -> Self {
        let lookups: Vec<Lookup> = items.into_iter().map(Lookup::item).collect();
        Self {
            property_def,
            typed_value: TypedValue {
                data_type: DataType::MultiSelectLookup,
                has_value: !lookups.is_empty(),
                lookups: Some(lookups),
                ..TypedValue::default()
            },
        }
    }

    fn scalar(property_def: i32, data_type: DataType, value: Value) -> Self {
        Self {
            property_def,
            typed_value: TypedValue {
                data_type,
                value: Some(value),
                has_value: true,
                ..TypedValue::default()
            },
        }
    }
}

/// A property definition from the vault structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PropertyDef {
    /// Id
    #[serde(rename = "ID")]
    pub id: i32,
    /// Name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Whether values come from a value list
    pub is_based_on_value_list: bool,
    /// Value list id, for lookups
    pub value_list: i32,
    /// Whether the definition is built in
    pub predefined: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_value_shape() {
        let value = serde_json::to_value(PropertyValue::text(0, "Title")).unwrap();
        assert_eq!(
            value,
            json!({
                "PropertyDef": 0,
                "TypedValue": { "DataType": 1, "Value": "Title", "HasValue": true }
            })
        );
    }

    #[test]
    fn lookup_value_shape() {
        let value = serde_json::to_value(PropertyValue::lookup(100, 5)).unwrap();
        assert_eq!(value["TypedValue"]["DataType"], 9);
        assert_eq!(value["TypedValue"]["Lookup"]["Item"], 5);
        assert_eq!(value["TypedValue"]["Lookup"]["Version"], -1);
    }

    #[test]
    fn empty_multi_select_has_no_value() {
        let value = PropertyValue::multi_select_lookup(1, []);
        assert!(!value.typed_value.has_value);
    }

    #[test]
    fn unknown_data_type_survives() {
        let data_type: DataType = serde_json::from_str("42").unwrap();
        assert_eq!(data_type, DataType::Other(42));
        assert_eq!(serde_json::to_string(&data_type).unwrap(), "42");
    }
}
