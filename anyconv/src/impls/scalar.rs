use core::any::TypeId;

use super::reflect_any;
use crate::{Capabilities, Def, Peek, Poke, Reflect, ScalarMut, ScalarRef, ScalarType, Shape, Typed};

macro_rules! impl_scalar {
    ($ty:ty, $name:literal, $scalar:ident, |$this:ident| $peek:expr) => {
        impl Typed for $ty {
            const SHAPE: &'static Shape = &Shape {
                id: TypeId::of::<$ty>,
                type_identifier: $name,
                def: Def::Scalar(ScalarType::$scalar),
                capabilities: Capabilities::empty(),
            };
        }

        impl Reflect for $ty {
            reflect_any!();

            fn peek(&self) -> Peek<'_> {
                let $this = self;
                Peek::Scalar($peek)
            }

            fn poke(&mut self) -> Poke<'_> {
                Poke::Scalar(ScalarMut::$scalar(self))
            }
        }
    };
}

impl_scalar!(bool, "bool", Bool, |v| ScalarRef::Bool(*v));
impl_scalar!(i8, "i8", I8, |v| ScalarRef::I64(i64::from(*v)));
impl_scalar!(i16, "i16", I16, |v| ScalarRef::I64(i64::from(*v)));
impl_scalar!(i32, "i32", I32, |v| ScalarRef::I64(i64::from(*v)));
impl_scalar!(i64, "i64", I64, |v| ScalarRef::I64(*v));
impl_scalar!(isize, "isize", Isize, |v| ScalarRef::I64(*v as i64));
impl_scalar!(u8, "u8", U8, |v| ScalarRef::U64(u64::from(*v)));
impl_scalar!(u16, "u16", U16, |v| ScalarRef::U64(u64::from(*v)));
impl_scalar!(u32, "u32", U32, |v| ScalarRef::U64(u64::from(*v)));
impl_scalar!(u64, "u64", U64, |v| ScalarRef::U64(*v));
impl_scalar!(usize, "usize", Usize, |v| ScalarRef::U64(*v as u64));
impl_scalar!(f32, "f32", F32, |v| ScalarRef::F32(*v));
impl_scalar!(f64, "f64", F64, |v| ScalarRef::F64(*v));
impl_scalar!(char, "char", Char, |v| ScalarRef::Char(*v));
impl_scalar!(String, "String", String, |v| ScalarRef::Str(v.as_str()));
