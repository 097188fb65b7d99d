use core::any::TypeId;
use core::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::reflect_any;
use crate::{Capabilities, Def, Peek, Poke, Reflect, ScalarMut, ScalarRef, ScalarType, Shape, Typed};

macro_rules! impl_time {
    ($ty:ty, $name:literal, $scalar:ident, |$this:ident| $to_fixed:expr) => {
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
                Peek::Scalar(ScalarRef::DateTime($to_fixed))
            }

            fn poke(&mut self) -> Poke<'_> {
                Poke::Scalar(ScalarMut::$scalar(self))
            }
        }
    };
}

impl_time!(DateTime<Utc>, "DateTime<Utc>", DateTimeUtc, |t| t.fixed_offset());
impl_time!(DateTime<FixedOffset>, "DateTime<FixedOffset>", DateTimeFixed, |t| *t);
impl_time!(NaiveDateTime, "NaiveDateTime", NaiveDateTime, |t| t
    .and_utc()
    .fixed_offset());
impl_time!(NaiveDate, "NaiveDate", NaiveDate, |d| d
    .and_time(NaiveTime::MIN)
    .and_utc()
    .fixed_offset());

impl Typed for Duration {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Duration>,
        type_identifier: "Duration",
        def: Def::Scalar(ScalarType::Duration),
        capabilities: Capabilities::empty(),
    };
}

impl Reflect for Duration {
    reflect_any!();

    fn peek(&self) -> Peek<'_> {
        Peek::Scalar(ScalarRef::Duration(*self))
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::Scalar(ScalarMut::Duration(self))
    }
}
