//! Binding: writing an arbitrary source value into a typed destination.
//!
//! [`Binder::bind`] is the single entry point every conversion goes
//! through. For each destination it tries, in order:
//!
//! 1. a null source, which resets the destination to its default,
//! 2. a registered converter for the exact `(source, destination)` pair,
//! 3. a plain clone when both sides have the same type,
//! 4. the destination's conversion hooks,
//! 5. the built-in coercion for the destination's kind.

use chrono::Utc;
use indexmap::IndexMap;

use crate::error::{ConvertError, ConvertErrorKind};
use crate::map::to_value;
use crate::reflect::deref_value;
use crate::scalar::{self, scalar_to_string, to_bytes};
use crate::time::{to_duration, to_time};
use crate::value::parse_container;
use crate::{Converter, Def, Peek, Poke, Reflect, ScalarMut, ScalarRef, Value};

mod entries;
mod list;
mod map;
mod structs;

use entries::source_entries;

/// Maximum nesting of containers followed while binding or rendering.
pub(crate) const MAX_DEPTH: usize = 64;

pub(crate) fn recursion_limit() -> ConvertError {
    ConvertError::new(ConvertErrorKind::RecursionLimit { depth: MAX_DEPTH })
}

/// One conversion run: the converter plus the options of the call.
pub(crate) struct Binder<'a> {
    pub(crate) conv: &'a Converter,
    /// Effective tag priority.
    pub(crate) tags: Vec<String>,
    /// `source key -> field` overrides for struct destinations.
    pub(crate) overrides: Option<&'a IndexMap<String, String>>,
    pub(crate) continue_on_error: bool,
}

impl Binder<'_> {
    pub(crate) fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Writes `src` into `dst`. `depth` counts the containers entered so far.
    pub(crate) fn bind(&self, src: &dyn Reflect, dst: &mut dyn Reflect, depth: usize) -> Result<(), ConvertError> {
        if depth > MAX_DEPTH {
            return Err(recursion_limit());
        }
        let Some(value) = deref_value(src) else {
            dst.reset();
            return Ok(());
        };
        if self.apply_converter(value, dst)? {
            return Ok(());
        }
        if dst.assign_from(src) || dst.assign_from(value) {
            return Ok(());
        }
        if self.apply_hooks(value, dst)? {
            return Ok(());
        }
        if let Some(bytes) = dst.as_any_mut().downcast_mut::<Vec<u8>>() {
            *bytes = to_bytes(value)?;
            return Ok(());
        }

        let shape = dst.shape();
        if matches!(
            shape.def,
            Def::Struct(_) | Def::List(_) | Def::Array(_) | Def::Map(_)
        ) {
            if let Some(structured) = structured_source(value) {
                trace!("binding {} through its structured form", value.shape());
                return self.bind(&structured, dst, depth + 1);
            }
        }

        match dst.poke() {
            Poke::Scalar(slot) => assign_scalar(value, slot),
            Poke::Dynamic(slot) => {
                *slot = to_value(value)?;
                Ok(())
            }
            Poke::Pointer(target) => self.bind(value, target, depth),
            Poke::Option(slot) => {
                let was_none = !slot.is_some();
                let result = self.bind(value, slot.get_or_insert_default(), depth);
                if result.is_err() && was_none {
                    slot.set_none();
                }
                result
            }
            Poke::Struct(target) => self.bind_struct(value, target, shape, depth + 1),
            Poke::List(target) => self.bind_list(value, target, depth + 1),
            Poke::Map(target) => self.bind_map(value, target, shape, depth + 1),
        }
    }

    fn apply_converter(&self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<bool, ConvertError> {
        let registry = self.conv.registry();
        if registry.is_empty() {
            return Ok(false);
        }
        let Some(convert) = registry.lookup(src.shape().type_id(), dst.shape().type_id()) else {
            return Ok(false);
        };
        trace!("custom converter {} -> {}", src.shape(), dst.shape());
        convert(src, dst)
    }

    fn apply_hooks(&self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<bool, ConvertError> {
        if dst.shape().capabilities.is_empty() {
            return Ok(false);
        }
        if let Some(hook) = dst.as_unmarshal_value() {
            hook.unmarshal_value(src)?;
            return Ok(true);
        }
        if let Some(hook) = dst.as_unmarshal_text() {
            if let Some(text) = text_form(src).filter(|t| !t.is_empty()) {
                hook.unmarshal_text(&text)?;
                return Ok(true);
            }
        }
        if let Some(hook) = dst.as_unmarshal_json() {
            hook.unmarshal_json(&json_form(src)?)?;
            return Ok(true);
        }
        if let Some(hook) = dst.as_set_value() {
            hook.set_value(src);
            return Ok(true);
        }
        Ok(false)
    }
}

/// The map or list behind a source that is not one structurally: JSON text
/// and types with a map form.
fn structured_source(src: &dyn Reflect) -> Option<Value> {
    if let Some(m) = src.as_map_str_any() {
        return Some(Value::Object(m.map_str_any()));
    }
    match src.peek() {
        Peek::Scalar(ScalarRef::Str(text)) => parse_container(text.as_bytes()),
        Peek::Scalar(ScalarRef::Bytes(bytes)) => parse_container(bytes),
        _ => None,
    }
}

fn text_form(src: &dyn Reflect) -> Option<Vec<u8>> {
    match src.peek() {
        Peek::Scalar(ScalarRef::Str(text)) => Some(text.as_bytes().to_vec()),
        Peek::Scalar(ScalarRef::Bytes(bytes)) => Some(bytes.to_vec()),
        Peek::Scalar(s) => Some(scalar_to_string(s).into_bytes()),
        _ => src.as_display().map(|d| d.to_string().into_bytes()),
    }
}

/// JSON text of `src`. Text that is not valid JSON is passed as a JSON
/// string.
fn json_form(src: &dyn Reflect) -> Result<Vec<u8>, ConvertError> {
    let text = match src.peek() {
        Peek::Scalar(ScalarRef::Str(text)) => text.as_bytes(),
        Peek::Scalar(ScalarRef::Bytes(bytes)) => bytes,
        _ => return Ok(to_value(src)?.to_json_string().into_bytes()),
    };
    if serde_json::from_slice::<serde_json::Value>(text).is_ok() {
        return Ok(text.to_vec());
    }
    let quoted = serde_json::Value::String(String::from_utf8_lossy(text).into_owned());
    Ok(quoted.to_string().into_bytes())
}

fn assign_scalar(src: &dyn Reflect, slot: ScalarMut<'_>) -> Result<(), ConvertError> {
    match slot {
        ScalarMut::Bool(d) => *d = scalar::to_bool(src)?,
        ScalarMut::I8(d) => *d = scalar::to_i8(src)?,
        ScalarMut::I16(d) => *d = scalar::to_i16(src)?,
        ScalarMut::I32(d) => *d = scalar::to_i32(src)?,
        ScalarMut::I64(d) => *d = scalar::to_i64(src)?,
        ScalarMut::Isize(d) => *d = scalar::to_isize(src)?,
        ScalarMut::U8(d) => *d = scalar::to_u8(src)?,
        ScalarMut::U16(d) => *d = scalar::to_u16(src)?,
        ScalarMut::U32(d) => *d = scalar::to_u32(src)?,
        ScalarMut::U64(d) => *d = scalar::to_u64(src)?,
        ScalarMut::Usize(d) => *d = scalar::to_usize(src)?,
        ScalarMut::F32(d) => *d = scalar::to_f32(src)?,
        ScalarMut::F64(d) => *d = scalar::to_f64(src)?,
        ScalarMut::Char(d) => *d = scalar::to_char(src)?,
        ScalarMut::String(d) => *d = scalar::to_string(src)?,
        ScalarMut::DateTimeUtc(d) => *d = to_time(src, None)?.with_timezone(&Utc),
        ScalarMut::DateTimeFixed(d) => *d = to_time(src, None)?,
        ScalarMut::NaiveDateTime(d) => *d = to_time(src, None)?.naive_local(),
        ScalarMut::NaiveDate(d) => *d = to_time(src, None)?.date_naive(),
        ScalarMut::Duration(d) => *d = to_duration(src)?,
    }
    Ok(())
}
