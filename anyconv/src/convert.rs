//! Conversion to a type given by name.

use crate::map::to_value;
use crate::scalar::{
    to_bool, to_bytes, to_f32, to_f64, to_i8, to_i16, to_i32, to_i64, to_string, to_u8, to_u16, to_u32, to_u64,
};
use crate::time::{to_duration, to_time};
use crate::{ConvertError, Converter, Reflect, Typed, Value};

impl Converter {
    /// Converts `from` to the type named `type_name` and returns the result
    /// as a [`Value`].
    ///
    /// Both Go spellings (`int64`, `[]string`, `map[string]any`) and Rust
    /// spellings (`i64`, `Vec<String>`) are understood. For `time`,
    /// `extra[0]` is the layout. An unknown name returns `from` itself as a
    /// `Value`.
    pub fn convert(&self, from: &dyn Reflect, type_name: &str, extra: &[&str]) -> Result<Value, ConvertError> {
        Ok(match type_name.trim() {
            "int" | "int64" | "i64" | "isize" => Value::Int(to_i64(from)?),
            "int8" | "i8" => Value::from(to_i8(from)?),
            "int16" | "i16" => Value::from(to_i16(from)?),
            "int32" | "i32" => Value::from(to_i32(from)?),
            "uint" | "uint64" | "u64" | "usize" => Value::Uint(to_u64(from)?),
            "uint8" | "u8" => Value::from(to_u8(from)?),
            "uint16" | "u16" => Value::from(to_u16(from)?),
            "uint32" | "u32" => Value::from(to_u32(from)?),
            "float32" | "f32" => Value::from(to_f32(from)?),
            "float64" | "f64" => Value::Float(to_f64(from)?),
            "bool" => Value::Bool(to_bool(from)?),
            "string" | "String" => Value::String(to_string(from)?),
            "[]byte" | "Vec<u8>" => Value::Bytes(to_bytes(from)?),
            "[]int" | "[]int32" | "[]int64" | "Vec<i32>" | "Vec<i64>" => self.list::<i64>(from, Value::Int)?,
            "[]uint" | "[]uint32" | "[]uint64" | "Vec<u32>" | "Vec<u64>" => self.list::<u64>(from, Value::Uint)?,
            "[]float32" | "[]float64" | "Vec<f32>" | "Vec<f64>" => self.list::<f64>(from, Value::Float)?,
            "[]string" | "Vec<String>" => self.list::<String>(from, Value::String)?,
            "[]any" | "[]interface {}" | "Vec<Value>" => self.list::<Value>(from, core::convert::identity)?,
            "time" | "Time" | "time.Time" | "DateTime" => Value::Time(to_time(from, extra.first().copied())?),
            "Duration" | "time.Duration" => {
                Value::Int(i64::try_from(to_duration(from)?.as_nanos()).unwrap_or(i64::MAX))
            }
            "map[string]string" => match self.map_str_str(from)? {
                Some(m) => m.into_iter().map(|(k, v)| (k, Value::String(v))).collect(),
                None => Value::Null,
            },
            "map[string]any" | "map[string]interface {}" | "Object" => {
                self.to_map(from)?.map_or(Value::Null, Value::Object)
            }
            "[]map[string]any" | "[]map[string]interface {}" | "Vec<Object>" => match self.maps(from)? {
                Some(list) => list.into_iter().map(Value::Object).collect(),
                None => Value::Null,
            },
            other => {
                trace!("convert: unknown type name {other:?}");
                to_value(from)?
            }
        })
    }

    fn list<T: Typed + Clone + Default>(&self, from: &dyn Reflect, wrap: fn(T) -> Value) -> Result<Value, ConvertError> {
        Ok(match self.to_vec::<T>(from)? {
            Some(items) => items.into_iter().map(wrap).collect(),
            None => Value::Null,
        })
    }
}
