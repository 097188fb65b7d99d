use core::any::{Any, TypeId};
use core::hash::Hash;
use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use super::reflect_any;
use crate::shape::{ArrayDef, ListDef, MapDef, shape_of};
use crate::{
    Capabilities, ConvertError, Def, List, Map, Peek, Poke, Reflect, ScalarRef, Shape, Typed,
};

impl<T: Typed + Clone + Default> Typed for Vec<T> {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "Vec",
            def: Def::List(ListDef {
                item: shape_of::<T>,
            }),
            capabilities: Capabilities::empty(),
        }
    };
}

impl<T: Typed + Clone + Default> Reflect for Vec<T> {
    reflect_any!();

    fn peek(&self) -> Peek<'_> {
        // Byte vectors read as a single binary scalar.
        if let Some(bytes) = (self as &dyn Any).downcast_ref::<Vec<u8>>() {
            return Peek::Scalar(ScalarRef::Bytes(bytes));
        }
        Peek::List(self)
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::List(self)
    }
}

impl<T: Typed + Clone + Default> List for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|v| v as &dyn Reflect)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|v| v as &mut dyn Reflect)
    }

    fn item_shape(&self) -> &'static Shape {
        T::SHAPE
    }

    fn resize(&mut self, len: usize) -> bool {
        Vec::resize_with(self, len, T::default);
        true
    }
}

impl<T: Typed + Clone + Default, const N: usize> Typed for [T; N] {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "Array",
            def: Def::Array(ArrayDef {
                item: shape_of::<T>,
                len: N,
            }),
            capabilities: Capabilities::empty(),
        }
    };
}

impl<T: Typed + Clone + Default, const N: usize> Reflect for [T; N] {
    reflect_any!(@common);

    fn reset(&mut self) {
        for item in self.iter_mut() {
            *item = T::default();
        }
    }

    fn peek(&self) -> Peek<'_> {
        Peek::List(self)
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::List(self)
    }
}

impl<T: Typed + Clone + Default, const N: usize> List for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|v| v as &dyn Reflect)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|v| v as &mut dyn Reflect)
    }

    fn item_shape(&self) -> &'static Shape {
        T::SHAPE
    }

    fn resize(&mut self, len: usize) -> bool {
        len == N
    }
}

macro_rules! impl_map {
    ($name:literal, $map:ident, [$($key_bound:tt)+]) => {
        impl<K, V> Typed for $map<K, V>
        where
            K: Typed + Clone + Default + $($key_bound)+,
            V: Typed + Clone + Default,
        {
            const SHAPE: &'static Shape = &const {
                Shape {
                    id: TypeId::of::<Self>,
                    type_identifier: $name,
                    def: Def::Map(MapDef {
                        key: shape_of::<K>,
                        value: shape_of::<V>,
                    }),
                    capabilities: Capabilities::empty(),
                }
            };
        }

        impl<K, V> Reflect for $map<K, V>
        where
            K: Typed + Clone + Default + $($key_bound)+,
            V: Typed + Clone + Default,
        {
            reflect_any!();

            fn peek(&self) -> Peek<'_> {
                Peek::Map(self)
            }

            fn poke(&mut self) -> Poke<'_> {
                Poke::Map(self)
            }
        }

        impl<K, V> Map for $map<K, V>
        where
            K: Typed + Clone + Default + $($key_bound)+,
            V: Typed + Clone + Default,
        {
            fn len(&self) -> usize {
                $map::len(self)
            }

            fn entries(&self) -> Vec<(&dyn Reflect, &dyn Reflect)> {
                self.iter()
                    .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect))
                    .collect()
            }

            fn key_shape(&self) -> &'static Shape {
                K::SHAPE
            }

            fn value_shape(&self) -> &'static Shape {
                V::SHAPE
            }

            fn clear(&mut self) {
                $map::clear(self)
            }

            fn insert_with(
                &mut self,
                fill: &mut dyn FnMut(&mut dyn Reflect, &mut dyn Reflect) -> Result<(), ConvertError>,
            ) -> Result<(), ConvertError> {
                let mut key = K::default();
                let mut value = V::default();
                fill(&mut key, &mut value)?;
                self.insert(key, value);
                Ok(())
            }
        }
    };
}

impl_map!("HashMap", HashMap, [Eq + Hash]);
impl_map!("BTreeMap", BTreeMap, [Ord]);
impl_map!("IndexMap", IndexMap, [Eq + Hash]);
