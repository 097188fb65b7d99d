//! Scalar coercion: any value to a number, boolean, text or bytes.
//!
//! Every function accepts any [`Reflect`] value. Empty options, null values
//! and empty strings coerce to the zero value of the target.

use core::time::Duration;

use crate::error::ConvertError;
use crate::reflect::deref_value;
use crate::{Def, Peek, Reflect, ScalarRef};

/// Strings that read as `false`, compared case-insensitively.
const FALSY_STRINGS: &[&str] = &["", "0", "no", "off", "false"];

fn is_falsy(text: &str) -> bool {
    let text = text.trim();
    FALSY_STRINGS.iter().any(|f| f.eq_ignore_ascii_case(text))
}

/// Coerces to `bool`.
///
/// Numbers are `true` when non-zero, collections when non-empty, text unless
/// it is one of `""`, `"0"`, `"no"`, `"off"` or `"false"`. Any present
/// `Option`/`Box` is `true` regardless of its content.
pub fn to_bool(v: &dyn Reflect) -> Result<bool, ConvertError> {
    Ok(match v.peek() {
        Peek::Null => false,
        Peek::Pointer(_) => true,
        Peek::Scalar(s) => match s {
            ScalarRef::Bool(b) => b,
            ScalarRef::I64(i) => i != 0,
            ScalarRef::U64(u) => u != 0,
            ScalarRef::F32(f) => f != 0.0,
            ScalarRef::F64(f) => f != 0.0,
            ScalarRef::Char(c) => c != '\0',
            ScalarRef::Str(text) => !is_falsy(text),
            ScalarRef::Bytes(bytes) => !is_falsy(&String::from_utf8_lossy(bytes)),
            ScalarRef::DateTime(_) => true,
            ScalarRef::Duration(d) => !d.is_zero(),
        },
        Peek::List(list) => !list.is_empty(),
        Peek::Map(map) => !map.is_empty(),
        Peek::Struct(_) => match v.as_display() {
            Some(d) => !is_falsy(&d.to_string()),
            None => true,
        },
    })
}

/// Coerces to text.
///
/// Types with a `Display` capability use it. Floats use the shortest form
/// that round-trips (`1.5`, `100`), times RFC 3339 and durations the
/// `1h2m3.5s` notation. Structs, lists and maps render as JSON.
pub fn to_string(v: &dyn Reflect) -> Result<String, ConvertError> {
    let Some(v) = deref_value(v) else {
        return Ok(String::new());
    };
    if let Some(d) = v.as_display() {
        return Ok(d.to_string());
    }
    match v.peek() {
        Peek::Scalar(s) => Ok(scalar_to_string(s)),
        Peek::Null | Peek::Pointer(_) => Ok(String::new()),
        Peek::Struct(_) | Peek::List(_) | Peek::Map(_) => {
            Ok(crate::map::to_value(v)?.to_json_string())
        }
    }
}

pub(crate) fn scalar_to_string(s: ScalarRef<'_>) -> String {
    match s {
        ScalarRef::Bool(b) => b.to_string(),
        ScalarRef::I64(i) => i.to_string(),
        ScalarRef::U64(u) => u.to_string(),
        ScalarRef::F32(f) => f.to_string(),
        ScalarRef::F64(f) => f.to_string(),
        ScalarRef::Char(c) => c.to_string(),
        ScalarRef::Str(text) => text.to_owned(),
        ScalarRef::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ScalarRef::DateTime(t) => t.to_rfc3339(),
        ScalarRef::Duration(d) => crate::time::format_duration(d),
    }
}

/// Converts an `f32` to the `f64` with the same shortest decimal form, so
/// that `1.1f32` becomes `1.1` rather than `1.100000023841858`.
pub(crate) fn widen_f32(v: f32) -> f64 {
    v.to_string().parse().unwrap_or(f64::from(v))
}

/// Coerces to bytes.
///
/// Text is taken as UTF-8, numbers are encoded little-endian at the width of
/// their type, and structs, lists and maps are encoded as JSON.
pub fn to_bytes(v: &dyn Reflect) -> Result<Vec<u8>, ConvertError> {
    let Some(v) = deref_value(v) else {
        return Ok(Vec::new());
    };
    if let Some(b) = v.as_to_bytes() {
        return Ok(b.to_bytes());
    }
    let width = match v.shape().def {
        Def::Scalar(st) => st.byte_width().unwrap_or(8),
        _ => 8,
    };
    Ok(match v.peek() {
        Peek::Scalar(s) => match s {
            ScalarRef::Str(text) => text.as_bytes().to_vec(),
            ScalarRef::Bytes(bytes) => bytes.to_vec(),
            ScalarRef::Bool(b) => vec![u8::from(b)],
            ScalarRef::I64(i) => i.to_le_bytes()[..width].to_vec(),
            ScalarRef::U64(u) => u.to_le_bytes()[..width].to_vec(),
            ScalarRef::F32(f) => f.to_le_bytes().to_vec(),
            ScalarRef::F64(f) => f.to_le_bytes().to_vec(),
            ScalarRef::Char(c) => u32::from(c).to_le_bytes().to_vec(),
            ScalarRef::Duration(d) => (d.as_nanos() as i64).to_le_bytes().to_vec(),
            ScalarRef::DateTime(t) => t.to_rfc3339().into_bytes(),
        },
        _ => to_string(v)?.into_bytes(),
    })
}

/// Zero-extends up to 8 little-endian bytes.
fn le_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let n = bytes.len().min(8);
    buf[..n].copy_from_slice(&bytes[..n]);
    u64::from_le_bytes(buf)
}

/// Parses integer text: optional sign, then `0x` hex, `0`-prefixed octal,
/// decimal, or a float that is truncated.
fn parse_int(text: &str) -> Option<i128> {
    let s = text.trim();
    if s.is_empty() {
        return Some(0);
    }
    let (negative, digits) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).ok().map(i128::from)
    } else if digits.len() > 1
        && digits.starts_with('0')
        && digits.bytes().all(|b| (b'0'..=b'7').contains(&b))
    {
        u64::from_str_radix(&digits[1..], 8).ok().map(i128::from)
    } else {
        digits.parse::<u64>().ok().map(i128::from)
    };
    match magnitude {
        Some(m) => Some(if negative { -m } else { m }),
        None => s
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i128),
    }
}

/// Coerces to `i64`.
///
/// Text may be decimal, `0x` hex or `0`-prefixed octal, with an optional
/// sign; float text is truncated. Bytes decode as little-endian.
pub fn to_i64(v: &dyn Reflect) -> Result<i64, ConvertError> {
    let Some(v) = deref_value(v) else {
        return Ok(0);
    };
    match v.peek() {
        Peek::Scalar(s) => match s {
            ScalarRef::Bool(b) => Ok(i64::from(b)),
            ScalarRef::I64(i) => Ok(i),
            ScalarRef::U64(u) => Ok(u as i64),
            ScalarRef::F32(f) => Ok(f as i64),
            ScalarRef::F64(f) => Ok(f as i64),
            ScalarRef::Char(c) => Ok(i64::from(u32::from(c))),
            ScalarRef::Str(text) => parse_int(text)
                .map(|i| i as i64)
                .ok_or_else(|| ConvertError::parse_failure("i64", text, "invalid integer")),
            ScalarRef::Bytes(bytes) => Ok(le_u64(bytes) as i64),
            ScalarRef::Duration(d) => Ok(d.as_nanos() as i64),
            ScalarRef::DateTime(_) => Err(ConvertError::failure("i64", v, "")),
        },
        _ => match v.as_display() {
            Some(d) => {
                let text = d.to_string();
                parse_int(&text)
                    .map(|i| i as i64)
                    .ok_or_else(|| ConvertError::parse_failure("i64", &text, "invalid integer"))
            }
            None => Err(ConvertError::failure("i64", v, "")),
        },
    }
}

/// Coerces to `u64`.
///
/// Negative numbers, negative floats and negative numeric text are rejected.
pub fn to_u64(v: &dyn Reflect) -> Result<u64, ConvertError> {
    let Some(v) = deref_value(v) else {
        return Ok(0);
    };
    let negative = || ConvertError::failure("u64", v, "negative value cannot convert to unsigned");
    let from_text = |text: &str| match parse_int(text) {
        Some(i) if i < 0 => Err(negative()),
        Some(i) => Ok(i as u64),
        None => Err(ConvertError::parse_failure("u64", text, "invalid integer")),
    };
    match v.peek() {
        Peek::Scalar(s) => match s {
            ScalarRef::Bool(b) => Ok(u64::from(b)),
            ScalarRef::I64(i) => u64::try_from(i).map_err(|_| negative()),
            ScalarRef::U64(u) => Ok(u),
            ScalarRef::F32(f) if f < 0.0 => Err(negative()),
            ScalarRef::F32(f) => Ok(f as u64),
            ScalarRef::F64(f) if f < 0.0 => Err(negative()),
            ScalarRef::F64(f) => Ok(f as u64),
            ScalarRef::Char(c) => Ok(u64::from(u32::from(c))),
            ScalarRef::Str(text) => from_text(text),
            ScalarRef::Bytes(bytes) => Ok(le_u64(bytes)),
            ScalarRef::Duration(d) => Ok(d.as_nanos() as u64),
            ScalarRef::DateTime(_) => Err(ConvertError::failure("u64", v, "")),
        },
        _ => match v.as_display() {
            Some(d) => from_text(&d.to_string()),
            None => Err(ConvertError::failure("u64", v, "")),
        },
    }
}

macro_rules! narrow {
    ($($(#[$doc:meta])* $name:ident => $wide:ident as $ty:ty;)+) => {
        $(
            $(#[$doc])*
            pub fn $name(v: &dyn Reflect) -> Result<$ty, ConvertError> {
                $wide(v).map(|n| n as $ty)
            }
        )+
    };
}

narrow! {
    /// Coerces to `i8`, truncating like an `as` cast.
    to_i8 => to_i64 as i8;
    /// Coerces to `i16`, truncating like an `as` cast.
    to_i16 => to_i64 as i16;
    /// Coerces to `i32`, truncating like an `as` cast.
    to_i32 => to_i64 as i32;
    /// Coerces to `isize`.
    to_isize => to_i64 as isize;
    /// Coerces to `u8`, truncating like an `as` cast.
    to_u8 => to_u64 as u8;
    /// Coerces to `u16`, truncating like an `as` cast.
    to_u16 => to_u64 as u16;
    /// Coerces to `u32`, truncating like an `as` cast.
    to_u32 => to_u64 as u32;
    /// Coerces to `usize`.
    to_usize => to_u64 as usize;
}

fn parse_float(text: &str) -> Option<f64> {
    let s = text.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    s.parse::<f64>()
        .ok()
        .or_else(|| parse_int(s).map(|i| i as f64))
}

/// Coerces to `f64`.
pub fn to_f64(v: &dyn Reflect) -> Result<f64, ConvertError> {
    let Some(v) = deref_value(v) else {
        return Ok(0.0);
    };
    match v.peek() {
        Peek::Scalar(s) => match s {
            ScalarRef::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
            ScalarRef::I64(i) => Ok(i as f64),
            ScalarRef::U64(u) => Ok(u as f64),
            ScalarRef::F32(f) => Ok(widen_f32(f)),
            ScalarRef::F64(f) => Ok(f),
            ScalarRef::Char(c) => Ok(f64::from(u32::from(c))),
            ScalarRef::Str(text) => parse_float(text)
                .ok_or_else(|| ConvertError::parse_failure("f64", text, "invalid float")),
            ScalarRef::Bytes(bytes) => Ok(f64::from_bits(le_u64(bytes))),
            ScalarRef::Duration(d) => Ok(d.as_nanos() as f64),
            ScalarRef::DateTime(_) => Err(ConvertError::failure("f64", v, "")),
        },
        _ => match v.as_display() {
            Some(d) => {
                let text = d.to_string();
                parse_float(&text)
                    .ok_or_else(|| ConvertError::parse_failure("f64", &text, "invalid float"))
            }
            None => Err(ConvertError::failure("f64", v, "")),
        },
    }
}

/// Coerces to `f32`.
pub fn to_f32(v: &dyn Reflect) -> Result<f32, ConvertError> {
    if let Some(v) = deref_value(v) {
        match v.peek() {
            Peek::Scalar(ScalarRef::F32(f)) => return Ok(f),
            Peek::Scalar(ScalarRef::Bytes(bytes)) => {
                return Ok(f32::from_bits(le_u64(bytes) as u32));
            }
            _ => {}
        }
    }
    to_f64(v).map(|f| f as f32)
}

/// Coerces to `char`.
///
/// Single-character text yields that character; anything else is taken as
/// a Unicode scalar value.
pub fn to_char(v: &dyn Reflect) -> Result<char, ConvertError> {
    let Some(v) = deref_value(v) else {
        return Ok('\0');
    };
    if let Peek::Scalar(s) = v.peek() {
        match s {
            ScalarRef::Char(c) => return Ok(c),
            ScalarRef::Str(text) => {
                let mut chars = text.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    return Ok(c);
                }
            }
            _ => {}
        }
    }
    let code = to_i64(v)?;
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| ConvertError::failure("char", v, "not a unicode scalar value"))
}

/// Coerces to the characters of the text form.
pub fn to_runes(v: &dyn Reflect) -> Result<Vec<char>, ConvertError> {
    Ok(to_string(v)?.chars().collect())
}

/// Coerces to a duration. See [`to_duration`](crate::time::to_duration).
pub fn to_duration(v: &dyn Reflect) -> Result<Duration, ConvertError> {
    crate::time::to_duration(v)
}
