use core::any::TypeId;

use super::Value;
use crate::impls::reflect_any;
use crate::{Capabilities, Def, Peek, Poke, Reflect, ScalarRef, Shape, Typed};

impl Typed for Value {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Value>,
        type_identifier: "Value",
        def: Def::Dynamic,
        capabilities: Capabilities::empty(),
    };
}

impl Reflect for Value {
    reflect_any!();

    fn peek(&self) -> Peek<'_> {
        match self {
            Value::Null => Peek::Null,
            Value::Bool(b) => Peek::Scalar(ScalarRef::Bool(*b)),
            Value::Int(i) => Peek::Scalar(ScalarRef::I64(*i)),
            Value::Uint(u) => Peek::Scalar(ScalarRef::U64(*u)),
            Value::Float(f) => Peek::Scalar(ScalarRef::F64(*f)),
            Value::String(s) => Peek::Scalar(ScalarRef::Str(s)),
            Value::Bytes(b) => Peek::Scalar(ScalarRef::Bytes(b)),
            Value::Time(t) => Peek::Scalar(ScalarRef::DateTime(*t)),
            Value::Array(items) => Peek::List(items),
            Value::Object(obj) => Peek::Map(obj),
        }
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::Dynamic(self)
    }
}
