//! Input values
//!
//! [`Value`] is the tagged union every input is adapted into before rendering.
//! Object key order is preserved and drives the default element order.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Ordered object map
pub type ObjectMap = IndexMap<String, Value>;

/// A value to be rendered as XML
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Explicit null; renders as an empty element
    Null,
    /// Absent value; renders as nothing at all
    #[default]
    Undefined,
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// String
    String(String),
    /// Point in time with its UTC offset
    Date(DateTime<FixedOffset>),
    /// Ordered sequence
    Array(Vec<Value>),
    /// Ordered key/value mapping
    Object(ObjectMap),
    /// A host value with no XML mapping; the payload is its type label
    Unsupported(String),
}

impl Value {
    /// Create an empty object
    pub fn object() -> Self {
        Value::Object(ObjectMap::new())
    }

    /// Add an entry to an object value, builder style
    ///
    /// Has no effect on values that are not objects.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an entry into an object value, returning the previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        match self {
            Value::Object(map) => map.insert(key.into(), value.into()),
            _ => None,
        }
    }

    /// Own-property lookup
    ///
    /// Arrays answer to their decimal indices.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Own keys in order; array indices are rendered as decimal strings
    pub fn keys(&self) -> Vec<Cow<'_, str>> {
        match self {
            Value::Object(map) => map.keys().map(|k| Cow::Borrowed(k.as_str())).collect(),
            Value::Array(items) => (0..items.len()).map(|i| Cow::Owned(i.to_string())).collect(),
            _ => Vec::new(),
        }
    }

    /// Own entries in order
    pub fn entries(&self) -> Vec<(Cow<'_, str>, &Value)> {
        match self {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v))
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (Cow::Owned(i.to_string()), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Objects and arrays, the values that have keys to traverse
    pub fn is_enumerable(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    /// Null, dates, arrays and objects
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Date(_) | Value::Array(_) | Value::Object(_)
        )
    }

    /// Neither null nor undefined
    pub fn is_present(&self) -> bool {
        !matches!(self, Value::Null | Value::Undefined)
    }

    /// Label naming the kind of value
    pub fn type_label(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Unsupported(label) => label,
        }
    }

    /// Text form of booleans, numbers and strings
    pub fn primitive_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Number(n) => Some(Cow::Owned(format_number(*n))),
            Value::String(s) => Some(Cow::Borrowed(s)),
            _ => None,
        }
    }

    /// Adapt a JSON value, turning RFC 3339 strings into dates
    pub fn from_json_with_dates(json: JsonValue) -> Self {
        convert_json(json, true)
    }

    /// Adapt any serializable value through its JSON form
    pub fn from_serialize<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Value::from(serde_json::to_value(value)?))
    }
}

/// Format a number the way it reads in text: integral values carry no fraction
///
/// Magnitudes from `1e21` up and below `1e-6` switch to exponent notation
/// (`1e+21`, `1.5e-7`); everything else is written in plain decimal form.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    } else {
        n.to_string()
    }
}

fn convert_json(json: JsonValue, parse_dates: bool) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        JsonValue::String(s) => {
            if parse_dates {
                if let Ok(date) = DateTime::parse_from_rfc3339(&s) {
                    return Value::Date(date);
                }
            }
            Value::String(s)
        }
        JsonValue::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| convert_json(item, parse_dates))
                .collect(),
        ),
        JsonValue::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, convert_json(v, parse_dates)))
                .collect(),
        ),
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        convert_json(json, false)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(date: DateTime<FixedOffset>) -> Self {
        Value::Date(date)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(date: DateTime<Utc>) -> Self {
        Value::Date(date.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<ObjectMap> for Value {
    fn from(map: ObjectMap) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
