use core::any::TypeId;

use super::reflect_any;
use crate::shape::{IndirectDef, shape_of};
use crate::{Capabilities, Def, OptionSlot, Peek, Poke, Reflect, Shape, Typed};

impl<T: Typed + Clone + Default> Typed for Option<T> {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "Option",
            def: Def::Option(IndirectDef {
                inner: shape_of::<T>,
            }),
            capabilities: Capabilities::empty(),
        }
    };
}

impl<T: Typed + Clone + Default> Reflect for Option<T> {
    reflect_any!();

    fn peek(&self) -> Peek<'_> {
        match self {
            Some(v) => Peek::Pointer(v),
            None => Peek::Null,
        }
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::Option(self)
    }
}

impl<T: Typed + Clone + Default> OptionSlot for Option<T> {
    fn is_some(&self) -> bool {
        Option::is_some(self)
    }

    fn inner_shape(&self) -> &'static Shape {
        T::SHAPE
    }

    fn get_or_insert_default(&mut self) -> &mut dyn Reflect {
        self.get_or_insert_with(T::default)
    }

    fn set_none(&mut self) {
        *self = None;
    }
}

impl<T: Typed + Clone + Default> Typed for Box<T> {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "Box",
            def: Def::Pointer(IndirectDef {
                inner: shape_of::<T>,
            }),
            capabilities: Capabilities::empty(),
        }
    };
}

impl<T: Typed + Clone + Default> Reflect for Box<T> {
    reflect_any!();

    fn peek(&self) -> Peek<'_> {
        Peek::Pointer(&**self)
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::Pointer(&mut **self)
    }
}
