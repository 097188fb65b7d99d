//! Static type descriptions.
//!
//! Every type that takes part in conversion exposes a `&'static Shape`
//! through [`Typed::SHAPE`](crate::Typed::SHAPE). Shapes are plain data:
//! they are built in constant context, never allocated at runtime, and
//! compared by the [`TypeId`] they carry.

use core::any::TypeId;
use core::fmt;

use bitflags::bitflags;

/// Describes a type known to the conversion layer.
#[derive(Clone, Copy)]
pub struct Shape {
    /// Returns the `TypeId` of the described type.
    pub id: fn() -> TypeId,
    /// Short, human readable type name (`"i64"`, `"Vec"`, `"User"`).
    pub type_identifier: &'static str,
    /// What kind of type this is, and how to reach its parts.
    pub def: Def,
    /// Conversion hooks the type opts into.
    pub capabilities: Capabilities,
}

impl Shape {
    /// The `TypeId` of the described type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }

    /// Returns `true` if `self` describes `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    /// Field table of a struct shape.
    pub fn struct_type(&self) -> Option<&'static StructType> {
        match self.def {
            Def::Struct(st) => Some(st),
            _ => None,
        }
    }

    /// Peels `Option` and `Box` layers off the shape.
    pub fn innermost(&'static self) -> &'static Shape {
        let mut shape = self;
        loop {
            match shape.def {
                Def::Option(inner) | Def::Pointer(inner) => shape = (inner.inner)(),
                _ => return shape,
            }
        }
    }

    /// Returns `true` for `Option<T>` and `Box<T>` shapes.
    pub fn is_indirect(&self) -> bool {
        matches!(self.def, Def::Option(_) | Def::Pointer(_))
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for Shape {}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type_identifier", &self.type_identifier)
            .field("def", &self.def)
            .finish()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.def {
            Def::List(l) => write!(f, "Vec<{}>", (l.item)()),
            Def::Array(a) => write!(f, "[{}; {}]", (a.item)(), a.len),
            Def::Map(m) => write!(f, "{}<{}, {}>", self.type_identifier, (m.key)(), (m.value)()),
            Def::Option(o) => write!(f, "Option<{}>", (o.inner)()),
            Def::Pointer(p) => write!(f, "Box<{}>", (p.inner)()),
            _ => f.write_str(self.type_identifier),
        }
    }
}

/// The kind of a type, with links to the shapes of its parts.
#[derive(Clone, Copy, Debug)]
pub enum Def {
    /// A leaf value: numbers, text, time.
    Scalar(ScalarType),
    /// A struct with named fields.
    Struct(&'static StructType),
    /// A growable sequence (`Vec<T>`).
    List(ListDef),
    /// A fixed-size sequence (`[T; N]`).
    Array(ArrayDef),
    /// A keyed collection.
    Map(MapDef),
    /// `Option<T>`, the nullable indirection.
    Option(IndirectDef),
    /// `Box<T>`, the non-null indirection.
    Pointer(IndirectDef),
    /// The dynamic [`Value`](crate::Value).
    Dynamic,
}

/// Every scalar type with built-in coercions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ScalarType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Char,
    String,
    DateTimeUtc,
    DateTimeFixed,
    NaiveDateTime,
    NaiveDate,
    Duration,
}

impl ScalarType {
    /// Width in bytes of numeric scalars, used by binary encoding.
    pub fn byte_width(self) -> Option<usize> {
        use ScalarType::*;
        Some(match self {
            Bool | I8 | U8 => 1,
            I16 | U16 => 2,
            I32 | U32 | F32 | Char => 4,
            I64 | U64 | F64 | Duration => 8,
            Isize | Usize => core::mem::size_of::<usize>(),
            _ => return None,
        })
    }
}

/// Field table of a struct.
#[derive(Debug)]
pub struct StructType {
    /// Fields in declaration order.
    pub fields: &'static [Field],
}

/// A named struct field.
#[derive(Clone, Copy)]
pub struct Field {
    /// The Rust identifier of the field.
    pub name: &'static str,
    /// Shape of the field's type, resolved lazily so recursive types work.
    pub shape: fn() -> &'static Shape,
    /// Raw struct tags as `(tag name, tag value)` pairs, e.g. `("json", "id,omitempty")`.
    pub tags: &'static [(&'static str, &'static str)],
    /// Field attributes.
    pub flags: FieldFlags,
}

impl Field {
    /// The shape of the field's type.
    #[inline]
    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }

    /// Looks up the raw value of a tag by name.
    pub fn tag(&self, name: &str) -> Option<&'static str> {
        self.tags.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }

    /// Whether the field's members are promoted into the parent.
    #[inline]
    pub fn is_flattened(&self) -> bool {
        self.flags.contains(FieldFlags::FLATTEN)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("flags", &self.flags)
            .finish()
    }
}

bitflags! {
    /// Per-field attributes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u8 {
        /// The field is embedded: its own fields are addressable from the parent.
        const FLATTEN = 1 << 0;
    }
}

bitflags! {
    /// Conversion hooks a type implements.
    ///
    /// The flags mirror the `as_*` accessors on [`Reflect`](crate::Reflect)
    /// so that callers can test for a hook from the shape alone.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        /// [`UnmarshalValue`](crate::UnmarshalValue)
        const UNMARSHAL_VALUE = 1 << 0;
        /// [`UnmarshalText`](crate::UnmarshalText)
        const UNMARSHAL_TEXT = 1 << 1;
        /// [`UnmarshalJson`](crate::UnmarshalJson)
        const UNMARSHAL_JSON = 1 << 2;
        /// [`SetValue`](crate::SetValue)
        const SET_VALUE = 1 << 3;
        /// `Display` is used as the string form.
        const DISPLAY = 1 << 4;
        /// [`ToBytes`](crate::ToBytes)
        const TO_BYTES = 1 << 5;
        /// [`MapStrAny`](crate::MapStrAny)
        const MAP_STR_ANY = 1 << 6;
    }
}

/// Item shape of a `Vec<T>`.
#[derive(Clone, Copy, Debug)]
pub struct ListDef {
    /// Shape of `T`.
    pub item: fn() -> &'static Shape,
}

/// Item shape and length of a `[T; N]`.
#[derive(Clone, Copy, Debug)]
pub struct ArrayDef {
    /// Shape of `T`.
    pub item: fn() -> &'static Shape,
    /// `N`.
    pub len: usize,
}

/// Key and value shapes of a map.
#[derive(Clone, Copy, Debug)]
pub struct MapDef {
    /// Shape of the key type.
    pub key: fn() -> &'static Shape,
    /// Shape of the value type.
    pub value: fn() -> &'static Shape,
}

/// Target shape of an `Option<T>` or `Box<T>`.
#[derive(Clone, Copy, Debug)]
pub struct IndirectDef {
    /// Shape of `T`.
    pub inner: fn() -> &'static Shape,
}

/// Returns the shape of `T`. Usable as a `fn() -> &'static Shape` pointer.
#[inline]
pub fn shape_of<T: crate::Typed>() -> &'static Shape {
    T::SHAPE
}
