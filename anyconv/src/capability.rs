//! Hooks that let a type take over its own conversion.
//!
//! The binder probes a destination for these in a fixed order: a registered
//! converter first, then [`UnmarshalValue`], [`UnmarshalText`],
//! [`UnmarshalJson`] and finally [`SetValue`]. The first hook present wins.
//! A type opts in with a container attribute on its derive, for example
//! `#[conv(unmarshal_text)]`, and implements the matching trait by hand.
//!
//! [`ToBytes`], [`MapStrAny`] and `Display` (through `#[conv(display)]`) are
//! source-side hooks consulted when the value is being read.

use crate::{ConvertError, Object, Reflect};

/// Builds `self` from an arbitrary source value.
pub trait UnmarshalValue {
    /// Populates `self` from `value`.
    fn unmarshal_value(&mut self, value: &dyn Reflect) -> Result<(), ConvertError>;
}

/// Builds `self` from the text form of the source.
pub trait UnmarshalText {
    /// Populates `self` from `text`, which is never empty.
    fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), ConvertError>;
}

/// Builds `self` from JSON.
///
/// Text sources that are not valid JSON are passed as a JSON string, i.e.
/// wrapped in double quotes.
pub trait UnmarshalJson {
    /// Populates `self` from `json`.
    fn unmarshal_json(&mut self, json: &[u8]) -> Result<(), ConvertError>;
}

/// A setter that accepts anything and cannot fail.
pub trait SetValue {
    /// Stores `value` into `self`.
    fn set_value(&mut self, value: &dyn Reflect);
}

/// Exposes a byte form of `self`.
pub trait ToBytes {
    /// The bytes of `self`.
    fn to_bytes(&self) -> Vec<u8>;
}

/// Exposes a map form of `self`.
pub trait MapStrAny {
    /// `self` as a string-keyed object.
    fn map_str_any(&self) -> Object;
}
