//! Plain value types for data moving in and out of the store.
//!
//! This module provides two closed enums:
//!
//! * [`Scalar`] - the primitive payloads a single address can hold directly:
//!   null, booleans, numbers (int and float kept distinct), and strings.
//! * [`Value`] - a fully materialized nested value: the scalar cases plus
//!   insertion-ordered maps and lists. This is what
//!   [`Reference::materialize`](crate::Reference::materialize) returns and
//!   what [`Session::init`](crate::Session::init) accepts.
//!
//! `Value` maps are stored as ordered `(key, value)` pairs; iteration and
//! JSON export preserve insertion order, matching the chain order the store
//! persists.

use std::fmt;

use serde_json::json;

/// A primitive value stored directly at a single address.
///
/// The int/float distinction is preserved through encoding: `Int(1)` and
/// `Float(1.0)` round-trip to different JSON payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Null/empty value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// Text string value
    Text(String),
}

impl Scalar {
    /// Returns the type name as a string, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
        }
    }

    /// Attempts to convert to a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempts to convert to a string slice.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this is the null scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Converts to the canonical JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Null => serde_json::Value::Null,
            Scalar::Bool(b) => json!(b),
            Scalar::Int(n) => json!(n),
            Scalar::Float(f) => json!(f),
            Scalar::Text(s) => json!(s),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A fully materialized JSON-style value.
///
/// Maps preserve insertion order and have unique keys; lists preserve chain
/// order. `Value` is detached from any store: mutating one never touches a
/// session.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/empty value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// Text string value
    Text(String),
    /// Ordered map of unique string keys to values
    Map(Vec<(String, Value)>),
    /// Ordered list of values
    List(Vec<Value>),
}

impl Value {
    /// Returns the type name as a string, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Map(_) => "map",
            Value::List(_) => "list",
        }
    }

    /// An empty map value.
    pub fn empty_map() -> Self {
        Value::Map(Vec::new())
    }

    /// An empty list value.
    pub fn empty_list() -> Self {
        Value::List(Vec::new())
    }

    /// Returns true if this is a primitive (non-container) value.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Value::Map(_) | Value::List(_))
    }

    /// Attempts to view this value as a scalar.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Int(n) => Some(Scalar::Int(*n)),
            Value::Float(f) => Some(Scalar::Float(*f)),
            Value::Text(s) => Some(Scalar::Text(s.clone())),
            Value::Map(_) | Value::List(_) => None,
        }
    }

    /// Attempts to view this value as a map's entries.
    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Attempts to view this value as a list's items.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Looks a key up in a map value, by key rather than position.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Structural equality: maps compare key-order-insensitively, lists
    /// compare order-sensitively, scalars compare by type and value.
    ///
    /// The derived `PartialEq` is stricter (map order matters there); this is
    /// the equality the reference layer and list value scans use.
    pub fn structural_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| other.get(k).is_some_and(|w| v.structural_eq(w)))
            }
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(v, w)| v.structural_eq(w))
            }
            _ => self == other,
        }
    }

    /// Converts to a `serde_json::Value`, preserving map key order.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => json!(b),
            Value::Int(n) => json!(n),
            Value::Float(f) => json!(f),
            Value::Text(s) => json!(s),
            Value::Map(entries) => {
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (k, v) in entries {
                    map.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(map)
            }
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }

    /// Builds a `Value` from a `serde_json::Value`.
    ///
    /// Integer-representable numbers become [`Value::Int`]; everything else
    /// numeric becomes [`Value::Float`]. Object key order is kept as parsed.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Int(n) => Value::Int(n),
            Scalar::Float(f) => Value::Float(f),
            Scalar::Text(s) => Value::Text(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
