#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;
extern crate self as anyconv;

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

mod shape;
pub use shape::{
    ArrayDef, Capabilities, Def, Field, FieldFlags, IndirectDef, ListDef, MapDef, ScalarType, Shape, StructType,
    shape_of,
};

mod reflect;
pub use reflect::{
    List, Map, OptionSlot, Peek, Poke, Reflect, ScalarMut, ScalarRef, Struct, Typed, deref_value,
};

/// Derives [`Reflect`] and [`Typed`] for a struct with named fields.
pub use anyconv_macros::Reflect;

mod capability;
pub use capability::{MapStrAny, SetValue, ToBytes, UnmarshalJson, UnmarshalText, UnmarshalValue};

mod error;
pub use error::{ConvertError, ConvertErrorKind, ErrorCode, PathSegment};

mod impls;

mod value;
pub use value::{Object, Value, ValueType};

pub mod tag;
pub use tag::DEFAULT_PRIORITY_TAGS;

pub mod scalar;
pub use scalar::{
    to_bool, to_bytes, to_char, to_f32, to_f64, to_i8, to_i16, to_i32, to_i64, to_isize, to_runes, to_string, to_u8,
    to_u16, to_u32, to_u64, to_usize,
};

pub mod time;
pub use time::{format_duration, parse_duration, to_duration, to_time};

pub mod cache;
pub use cache::clear_struct_cache;

mod options;
pub use options::{MapOptions, ScanOptions, SliceOptions, StructOptions};

mod registry;

mod converter;
pub use converter::Converter;

mod bind;
mod convert;
mod map;
mod scan;
mod scan_list;
mod slice;

mod api;
pub use api::*;
