//! Time and duration coercion.
//!
//! Layouts come in two syntaxes. A layout containing `%` is a chrono
//! strftime format. Otherwise each letter is a date placeholder in the
//! `Y-m-d H:i:s` style, where `\` escapes the next character.

use core::fmt::Write as _;
use core::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::ConvertError;
use crate::reflect::deref_value;
use crate::{Peek, Reflect, ScalarRef};

/// Formats tried, in order, when no layout is given.
const DEFAULT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d",
    "%Y.%m.%d %H:%M:%S%.f",
    "%Y.%m.%d",
    "%d-%b-%Y %H:%M:%S",
    "%d/%b/%Y %H:%M:%S",
    "%d.%b.%Y %H:%M:%S",
    "%Y%m%d%H%M%S",
    "%Y%m%d",
];

/// Translates a layout to a chrono format string.
pub fn layout_to_format(layout: &str) -> String {
    if layout.contains('%') {
        return layout.to_owned();
    }
    let mut out = String::with_capacity(layout.len() * 2);
    let mut chars = layout.chars();
    while let Some(c) = chars.next() {
        let item = match c {
            'd' => "%d",
            'D' => "%a",
            'j' => "%-d",
            'l' => "%A",
            'N' => "%u",
            'w' => "%w",
            'z' => "%j",
            'W' => "%V",
            'F' => "%B",
            'm' => "%m",
            'M' => "%b",
            'n' => "%-m",
            'o' => "%G",
            'Y' => "%Y",
            'y' => "%y",
            'a' => "%P",
            'A' => "%p",
            'g' => "%-I",
            'G' => "%-H",
            'h' => "%I",
            'H' => "%H",
            'i' => "%M",
            's' => "%S",
            'u' => "%3f",
            'e' | 'T' => "%Z",
            'O' => "%z",
            'P' => "%:z",
            'U' => "%s",
            'c' => "%Y-%m-%dT%H:%M:%S%:z",
            'r' => "%a, %d %b %Y %H:%M:%S %z",
            // Placeholders without a chrono counterpart.
            'S' | 't' | 'L' | 'I' => "",
            '\\' => {
                if let Some(next) = chars.next() {
                    push_literal(&mut out, next);
                }
                continue;
            }
            other => {
                push_literal(&mut out, other);
                continue;
            }
        };
        out.push_str(item);
    }
    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// Parses with a chrono format, accepting formats with or without an offset
/// and date-only formats. Times without an offset are taken as UTC.
fn parse_with_format(text: &str, format: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(t) = DateTime::parse_from_str(text, format) {
        return Some(t);
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(text, format) {
        return Some(t.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(text, format)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

/// Interprets a unix timestamp, inferring seconds, milliseconds,
/// microseconds or nanoseconds from its magnitude.
fn from_timestamp(n: i64) -> Option<DateTime<FixedOffset>> {
    let magnitude = n.unsigned_abs();
    let t = if magnitude < 10_000_000_000 {
        DateTime::<Utc>::from_timestamp(n, 0)
    } else if magnitude < 10_000_000_000_000 {
        DateTime::<Utc>::from_timestamp_millis(n)
    } else if magnitude < 10_000_000_000_000_000 {
        DateTime::<Utc>::from_timestamp_micros(n)
    } else {
        Some(DateTime::<Utc>::from_timestamp_nanos(n))
    };
    t.map(|t| t.fixed_offset())
}

fn from_float_timestamp(f: f64) -> Option<DateTime<FixedOffset>> {
    if !f.is_finite() {
        return None;
    }
    let secs = f.floor();
    let nanos = ((f - secs) * 1e9).round() as u32;
    DateTime::<Utc>::from_timestamp(secs as i64, nanos.min(999_999_999)).map(|t| t.fixed_offset())
}

/// Parses text without a layout: RFC 3339, the default format list,
/// RFC 2822, then a numeric timestamp.
pub fn parse_time(text: &str) -> Option<DateTime<FixedOffset>> {
    let s = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t);
    }
    if let Some(t) = DEFAULT_FORMATS
        .iter()
        .find_map(|format| parse_with_format(s, format))
    {
        return Some(t);
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(s) {
        return Some(t);
    }
    if let Ok(n) = s.parse::<i64>() {
        return from_timestamp(n);
    }
    s.parse::<f64>().ok().and_then(from_float_timestamp)
}

/// Parses text with a layout in either syntax.
pub fn parse_time_with_layout(text: &str, layout: &str) -> Option<DateTime<FixedOffset>> {
    parse_with_format(text.trim(), &layout_to_format(layout))
}

/// Coerces to a timestamp.
///
/// Text is parsed with `layout` when given, otherwise through
/// [`parse_time`]. Numbers are unix timestamps. Empty input gives the unix
/// epoch.
pub fn to_time(v: &dyn Reflect, layout: Option<&str>) -> Result<DateTime<FixedOffset>, ConvertError> {
    let Some(v) = deref_value(v) else {
        return Ok(DateTime::<FixedOffset>::default());
    };
    let parse_text = |text: &str| {
        if text.trim().is_empty() {
            return Ok(DateTime::<FixedOffset>::default());
        }
        let parsed = match layout {
            Some(layout) if !layout.is_empty() => parse_time_with_layout(text, layout),
            _ => parse_time(text),
        };
        parsed.ok_or_else(|| {
            ConvertError::parse_failure("DateTime", text, match layout {
                Some(layout) => format!("does not match layout {layout:?}"),
                None => "unrecognized time format".to_owned(),
            })
        })
    };
    let out_of_range = || ConvertError::failure("DateTime", v, "timestamp out of range");
    match v.peek() {
        Peek::Scalar(s) => match s {
            ScalarRef::DateTime(t) => Ok(t),
            ScalarRef::I64(i) => from_timestamp(i).ok_or_else(out_of_range),
            ScalarRef::U64(u) => i64::try_from(u)
                .ok()
                .and_then(from_timestamp)
                .ok_or_else(out_of_range),
            ScalarRef::F32(f) => from_float_timestamp(f64::from(f)).ok_or_else(out_of_range),
            ScalarRef::F64(f) => from_float_timestamp(f).ok_or_else(out_of_range),
            ScalarRef::Str(text) => parse_text(text),
            ScalarRef::Bytes(bytes) => parse_text(&String::from_utf8_lossy(bytes)),
            ScalarRef::Bool(_) | ScalarRef::Char(_) | ScalarRef::Duration(_) => {
                Err(ConvertError::failure("DateTime", v, ""))
            }
        },
        _ => match v.as_display() {
            Some(d) => parse_text(&d.to_string()),
            None => Err(ConvertError::failure("DateTime", v, "")),
        },
    }
}

/// Parses `1h2m3.5s`-style duration text.
///
/// Units are `ns`, `us`/`µs`, `ms`, `s`, `m`, `h` and `d`. A bare `0` is
/// accepted.
pub fn parse_duration(text: &str) -> Result<Duration, ConvertError> {
    let invalid = |message: &str| ConvertError::parse_failure("Duration", text, message);
    let s = text.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.starts_with('-') {
        return Err(invalid("negative durations are not representable"));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(invalid("empty duration"));
    }

    let mut nanos: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_end == 0 {
            return Err(invalid("expected a number"));
        }
        let (number, tail) = rest.split_at(number_end);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        rest = tail;

        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            "d" => 86_400 * 1_000_000_000,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid("unknown unit")),
        };
        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("expected a number"));
        }
        if !whole.is_empty() {
            let whole: u128 = whole.parse().map_err(|_| invalid("number out of range"))?;
            nanos = nanos.saturating_add(whole.saturating_mul(scale));
        }
        if !frac.is_empty() {
            // Digits beyond nanosecond precision do not matter.
            let frac = &frac[..frac.len().min(18)];
            let digits: u128 = frac.parse().map_err(|_| invalid("invalid fraction"))?;
            nanos = nanos.saturating_add(digits * scale / 10u128.pow(frac.len() as u32));
        }
    }
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| invalid("duration out of range"))
}

/// Formats a duration as `1h2m3.5s`, `1.5ms` or `0s`.
pub fn format_duration(d: Duration) -> String {
    let total = d.as_nanos();
    if total == 0 {
        return "0s".to_owned();
    }
    if total < 1_000 {
        return format!("{total}ns");
    }
    if total < 1_000_000 {
        return with_fraction(total, 1_000, "µs");
    }
    if total < 1_000_000_000 {
        return with_fraction(total, 1_000_000, "ms");
    }
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3_600, (secs % 3_600) / 60, secs % 60);
    let mut out = String::new();
    if h > 0 {
        let _ = write!(out, "{h}h");
    }
    if h > 0 || m > 0 {
        let _ = write!(out, "{m}m");
    }
    out.push_str(&with_fraction(
        u128::from(s) * 1_000_000_000 + u128::from(d.subsec_nanos()),
        1_000_000_000,
        "s",
    ));
    out
}

fn with_fraction(value: u128, unit: u128, suffix: &str) -> String {
    let whole = value / unit;
    let rem = value % unit;
    if rem == 0 {
        return format!("{whole}{suffix}");
    }
    let width = unit.ilog10() as usize;
    let frac = format!("{rem:0width$}");
    format!("{whole}.{}{suffix}", frac.trim_end_matches('0'))
}

/// Coerces to a duration.
///
/// Integers are nanoseconds, floats fractional nanoseconds, and text is
/// either an integer nanosecond count or duration text.
pub fn to_duration(v: &dyn Reflect) -> Result<Duration, ConvertError> {
    let Some(v) = deref_value(v) else {
        return Ok(Duration::ZERO);
    };
    let negative = || ConvertError::failure("Duration", v, "negative durations are not representable");
    let from_text = |text: &str| {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Duration::ZERO);
        }
        match text.parse::<i64>() {
            Ok(n) => u64::try_from(n).map(Duration::from_nanos).map_err(|_| negative()),
            Err(_) => parse_duration(text),
        }
    };
    match v.peek() {
        Peek::Scalar(s) => match s {
            ScalarRef::Duration(d) => Ok(d),
            ScalarRef::Bool(b) => Ok(Duration::from_nanos(u64::from(b))),
            ScalarRef::I64(i) => u64::try_from(i).map(Duration::from_nanos).map_err(|_| negative()),
            ScalarRef::U64(u) => Ok(Duration::from_nanos(u)),
            ScalarRef::F32(f) if f < 0.0 => Err(negative()),
            ScalarRef::F32(f) => Ok(Duration::from_nanos(f as u64)),
            ScalarRef::F64(f) if f < 0.0 => Err(negative()),
            ScalarRef::F64(f) => Ok(Duration::from_nanos(f as u64)),
            ScalarRef::Str(text) => from_text(text),
            ScalarRef::Bytes(bytes) => from_text(&String::from_utf8_lossy(bytes)),
            ScalarRef::Char(_) | ScalarRef::DateTime(_) => {
                Err(ConvertError::failure("Duration", v, ""))
            }
        },
        _ => match v.as_display() {
            Some(d) => from_text(&d.to_string()),
            None => Err(ConvertError::failure("Duration", v, "")),
        },
    }
}
