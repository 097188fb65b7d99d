//! Runtime views over reflected values.
//!
//! [`Reflect`] is the object-safe entry point. A value is read through
//! [`Peek`] and written through [`Poke`]; both are short-lived borrows that
//! expose the parts of the value by kind.

use core::any::Any;
use core::fmt;
use core::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::capability::{MapStrAny, SetValue, ToBytes, UnmarshalJson, UnmarshalText, UnmarshalValue};
use crate::{ConvertError, Shape, Value};

/// A type whose shape is known statically.
pub trait Typed: Reflect + Sized {
    /// The static description of `Self`.
    const SHAPE: &'static Shape;
}

/// Dynamic access to a value for conversion purposes.
///
/// Implemented for the primitive, text, time and collection types of the
/// standard library and `chrono`/`indexmap`, for [`Value`], and for user
/// structs through `#[derive(Reflect)]`.
pub trait Reflect: Any {
    /// The shape of the concrete type.
    fn shape(&self) -> &'static Shape;

    /// Upcast to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Upcast to `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Upcast to `&dyn Reflect`.
    fn as_reflect(&self) -> &dyn Reflect;

    /// Read-only view of the value.
    fn peek(&self) -> Peek<'_>;

    /// Mutable view of the value.
    fn poke(&mut self) -> Poke<'_>;

    /// Clones the value behind a box.
    fn clone_boxed(&self) -> Box<dyn Reflect>;

    /// Overwrites `self` with a clone of `src` when both have the same type.
    ///
    /// Returns `false`, leaving `self` untouched, on a type mismatch.
    fn assign_from(&mut self, src: &dyn Reflect) -> bool;

    /// Resets the value to its default.
    fn reset(&mut self);

    /// The custom unmarshal hook, if the type has one.
    fn as_unmarshal_value(&mut self) -> Option<&mut dyn UnmarshalValue> {
        None
    }

    /// The text unmarshal hook, if the type has one.
    fn as_unmarshal_text(&mut self) -> Option<&mut dyn UnmarshalText> {
        None
    }

    /// The JSON unmarshal hook, if the type has one.
    fn as_unmarshal_json(&mut self) -> Option<&mut dyn UnmarshalJson> {
        None
    }

    /// The generic setter hook, if the type has one.
    fn as_set_value(&mut self) -> Option<&mut dyn SetValue> {
        None
    }

    /// The string form used by text coercions, if the type provides one.
    fn as_display(&self) -> Option<&dyn fmt::Display> {
        None
    }

    /// The byte form used by byte coercions, if the type provides one.
    fn as_to_bytes(&self) -> Option<&dyn ToBytes> {
        None
    }

    /// The map form used by map conversions, if the type provides one.
    fn as_map_str_any(&self) -> Option<&dyn MapStrAny> {
        None
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Peek::Null => f.write_str("null"),
            Peek::Scalar(s) => fmt::Debug::fmt(&s, f),
            Peek::Pointer(inner) => fmt::Debug::fmt(inner, f),
            Peek::List(list) => {
                let mut l = f.debug_list();
                for i in 0..list.len() {
                    if let Some(item) = list.get(i) {
                        l.entry(&item);
                    }
                }
                l.finish()
            }
            Peek::Map(map) => {
                let mut m = f.debug_map();
                for (k, v) in map.entries() {
                    m.entry(&k, &v);
                }
                m.finish()
            }
            Peek::Struct(s) => {
                let shape = self.shape();
                let mut d = f.debug_struct(shape.type_identifier);
                if let Some(st) = shape.struct_type() {
                    for (i, field) in st.fields.iter().enumerate() {
                        if let Some(value) = s.field(i) {
                            d.field(field.name, &value);
                        }
                    }
                }
                d.finish()
            }
        }
    }
}

/// Read-only view of a reflected value.
#[derive(Clone, Copy)]
pub enum Peek<'a> {
    /// `None`, unit-like nothing, or [`Value::Null`].
    Null,
    /// A leaf value.
    Scalar(ScalarRef<'a>),
    /// A struct.
    Struct(&'a dyn Struct),
    /// A sequence.
    List(&'a dyn List),
    /// A keyed collection.
    Map(&'a dyn Map),
    /// `Some(_)` or a `Box`: the target value.
    Pointer(&'a dyn Reflect),
}

/// A borrowed scalar.
///
/// Signed integers widen to `I64` and unsigned ones to `U64`; the exact
/// width is still available from the value's [`Shape`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum ScalarRef<'a> {
    Bool(bool),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(&'a str),
    Bytes(&'a [u8]),
    DateTime(DateTime<FixedOffset>),
    Duration(Duration),
}

/// Mutable view of a reflected value.
pub enum Poke<'a> {
    /// A leaf slot.
    Scalar(ScalarMut<'a>),
    /// A struct.
    Struct(&'a mut dyn Struct),
    /// A sequence.
    List(&'a mut dyn List),
    /// A keyed collection.
    Map(&'a mut dyn Map),
    /// An `Option<T>` slot.
    Option(&'a mut dyn OptionSlot),
    /// The target of a `Box<T>`.
    Pointer(&'a mut dyn Reflect),
    /// A [`Value`] slot, which accepts anything.
    Dynamic(&'a mut Value),
}

/// A typed scalar slot.
#[allow(missing_docs)]
pub enum ScalarMut<'a> {
    Bool(&'a mut bool),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Char(&'a mut char),
    String(&'a mut String),
    DateTimeUtc(&'a mut DateTime<Utc>),
    DateTimeFixed(&'a mut DateTime<FixedOffset>),
    NaiveDateTime(&'a mut NaiveDateTime),
    NaiveDate(&'a mut NaiveDate),
    Duration(&'a mut Duration),
}

/// Field access on a struct. Field indices follow the struct's
/// [`StructType`](crate::StructType).
pub trait Struct {
    /// Number of fields.
    fn field_count(&self) -> usize;

    /// The field at `index`.
    fn field(&self, index: usize) -> Option<&dyn Reflect>;

    /// The field at `index`, mutably.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;
}

/// Access to a sequence.
pub trait List {
    /// Number of items.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The item at `index`.
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    /// The item at `index`, mutably.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Shape of the item type.
    fn item_shape(&self) -> &'static Shape;

    /// Grows with default items or truncates to `len`. Items below `len`
    /// are kept as they are.
    ///
    /// Fixed-size sequences cannot change length and return `false`.
    fn resize(&mut self, len: usize) -> bool;
}

/// Access to a keyed collection.
pub trait Map {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, in the map's iteration order.
    fn entries(&self) -> Vec<(&dyn Reflect, &dyn Reflect)>;

    /// Shape of the key type.
    fn key_shape(&self) -> &'static Shape;

    /// Shape of the value type.
    fn value_shape(&self) -> &'static Shape;

    /// Removes every entry.
    fn clear(&mut self);

    /// Inserts one entry built in place.
    ///
    /// `fill` receives a default key and a default value to populate. The
    /// entry is inserted only if `fill` succeeds; an existing entry with an
    /// equal key is replaced.
    fn insert_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Reflect, &mut dyn Reflect) -> Result<(), ConvertError>,
    ) -> Result<(), ConvertError>;
}

/// Access to an `Option<T>` slot.
pub trait OptionSlot {
    /// Returns `true` if a value is present.
    fn is_some(&self) -> bool;

    /// Shape of `T`.
    fn inner_shape(&self) -> &'static Shape;

    /// The present value, or a freshly inserted default.
    fn get_or_insert_default(&mut self) -> &mut dyn Reflect;

    /// Clears the slot.
    fn set_none(&mut self);
}

/// Follows `Some(_)` and `Box` layers down to the first non-indirect value.
///
/// Returns `None` when an empty `Option` (or a null [`Value`]) is reached.
pub fn deref_value(mut value: &dyn Reflect) -> Option<&dyn Reflect> {
    loop {
        match value.peek() {
            Peek::Pointer(inner) => value = inner,
            Peek::Null => return None,
            _ => return Some(value),
        }
    }
}

/// The value at `path`, a chain of field indices through nested structs.
pub(crate) fn field_at_path<'a>(value: &'a dyn Reflect, path: &[usize]) -> Option<&'a dyn Reflect> {
    let mut cur = value;
    for &index in path {
        cur = match cur.peek() {
            Peek::Struct(s) => s.field(index)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Mutable counterpart of [`field_at_path`], starting from a struct.
pub(crate) fn field_at_path_mut<'a>(value: &'a mut dyn Struct, path: &[usize]) -> Option<&'a mut dyn Reflect> {
    let (&first, rest) = path.split_first()?;
    let mut cur = value.field_mut(first)?;
    for &index in rest {
        cur = match cur.poke() {
            Poke::Struct(s) => s.field_mut(index)?,
            _ => return None,
        };
    }
    Some(cur)
}
