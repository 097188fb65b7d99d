use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::{Object, Value};
use crate::ConvertError;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Object>(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Uint(u) => serde_json::Value::from(*u),
            // NaN and infinities have no JSON form and become null.
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => serde_json::Value::String(STANDARD.encode(b)),
            Value::Time(t) => serde_json::Value::String(t.to_rfc3339()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Parses JSON text.
    pub fn from_json_str(text: &str) -> Result<Value, ConvertError> {
        Self::from_json_slice(text.as_bytes())
    }

    /// Parses JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Value, ConvertError> {
        let json: serde_json::Value = serde_json::from_slice(bytes)?;
        Ok(Value::from(json))
    }

    /// Renders as compact JSON text.
    ///
    /// Bytes are written as standard base64 and timestamps as RFC 3339.
    pub fn to_json_string(&self) -> String {
        serde_json::Value::from(self).to_string()
    }
}

/// Parses `text` as a JSON array or object.
///
/// Returns `None` without an error when the text does not look like a JSON
/// container, so that callers can fall back to treating it as a scalar.
pub(crate) fn parse_container(text: &[u8]) -> Option<Value> {
    let trimmed = text.trim_ascii();
    let looks_like_container = matches!(
        (trimmed.first(), trimmed.last()),
        (Some(b'{'), Some(b'}')) | (Some(b'['), Some(b']'))
    );
    if !looks_like_container {
        return None;
    }
    serde_json::from_slice::<serde_json::Value>(trimmed)
        .ok()
        .map(Value::from)
}
