//! The dynamic value type.
//!
//! [`Value`] is what untyped data looks like inside this crate: decoded
//! JSON, the result of [`to_map`](crate::to_map), the payload of
//! [`convert`](crate::convert). It carries bytes and timestamps next to the
//! usual JSON kinds.

mod json;
mod reflect;

pub(crate) use json::parse_container;

use core::fmt;

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;

/// A string-keyed, insertion-ordered object.
pub type Object = IndexMap<String, Value>;

/// A dynamically typed value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer that does not fit in `i64`, or that came from an unsigned type.
    Uint(u64),
    /// A floating point number.
    Float(f64),
    /// UTF-8 text.
    String(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// A timestamp with offset.
    Time(DateTime<FixedOffset>),
    /// An ordered list.
    Array(Vec<Value>),
    /// A string-keyed object.
    Object(Object),
}

/// Enum distinguishing the value kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum ValueType {
    Null,
    Bool,
    Number,
    String,
    Bytes,
    Time,
    Array,
    Object,
}

impl Value {
    /// The kind of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) | Value::Uint(_) | Value::Float(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Bytes(_) => ValueType::Bytes,
            Value::Time(_) => ValueType::Time,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The text, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The items, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Takes the entries out, if this is an object.
    pub fn into_object(self) -> Option<Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up `key` in an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Signed integer view of numeric values, when lossless.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            Value::Uint(u) => i64::try_from(u).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Formats as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string())
    }
}

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),+ => $conv:expr) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant($conv(v))
                }
            }
        )+
    };
}

impl_from!(Bool: bool => core::convert::identity);
impl_from!(Int: i8, i16, i32, i64 => i64::from);
impl_from!(Uint: u8, u16, u32, u64 => u64::from);
impl_from!(Float: f64 => core::convert::identity);
impl_from!(String: String => core::convert::identity);
impl_from!(Array: Vec<Value> => core::convert::identity);
impl_from!(Object: Object => core::convert::identity);
impl_from!(Time: DateTime<FixedOffset> => core::convert::identity);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(crate::scalar::widen_f32(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Builds a [`Value::Object`] from `key => value` pairs.
///
/// ```
/// let v = anyconv::object! { "id" => 1, "name" => "john" };
/// assert_eq!(v.get("name").and_then(|n| n.as_str()), Some("john"));
/// ```
#[macro_export]
macro_rules! object {
    () => {
        $crate::Value::Object($crate::Object::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut obj = $crate::Object::new();
        $(
            obj.insert(::core::convert::Into::into($key), $crate::Value::from($value));
        )+
        $crate::Value::Object(obj)
    }};
}
