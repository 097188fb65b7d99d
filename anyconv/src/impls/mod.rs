//! `Typed`/`Reflect` implementations for foreign types.

mod collections;
mod pointer;
mod scalar;
mod time;

/// Expands to the `Reflect` methods that only depend on `Self: Typed + Clone`.
///
/// The plain form also emits `reset` through `Default`.
macro_rules! reflect_any {
    () => {
        reflect_any!(@common);

        fn reset(&mut self) {
            *self = ::core::default::Default::default();
        }
    };
    (@common) => {
        fn shape(&self) -> &'static $crate::Shape {
            <Self as $crate::Typed>::SHAPE
        }

        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        fn as_reflect(&self) -> &dyn $crate::Reflect {
            self
        }

        fn clone_boxed(&self) -> ::alloc::boxed::Box<dyn $crate::Reflect> {
            ::alloc::boxed::Box::new(::core::clone::Clone::clone(self))
        }

        fn assign_from(&mut self, src: &dyn $crate::Reflect) -> bool {
            match src.as_any().downcast_ref::<Self>() {
                Some(v) => {
                    *self = ::core::clone::Clone::clone(v);
                    true
                }
                None => false,
            }
        }
    };
}

pub(crate) use reflect_any;
