//! User-registered conversion functions.

use core::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ConvertError;
use crate::{Reflect, Typed};

/// A type-erased converter. Returns `Ok(false)` when the function declined.
pub(crate) type ConvertFn =
    dyn Fn(&dyn Reflect, &mut dyn Reflect) -> Result<bool, ConvertError> + Send + Sync;

/// Converters keyed by `(source type, destination type)`.
#[derive(Default)]
pub(crate) struct Registry {
    funcs: RwLock<HashMap<(TypeId, TypeId), Arc<ConvertFn>>>,
}

impl Registry {
    pub(crate) fn register<S, D, F>(&self, f: F) -> Result<(), ConvertError>
    where
        S: Typed,
        D: Typed,
        F: Fn(&S) -> Result<Option<D>, ConvertError> + Send + Sync + 'static,
    {
        if S::SHAPE.is_indirect() {
            return Err(ConvertError::invalid_argument(format!(
                "converter input type must be a plain type, not {}",
                S::SHAPE
            )));
        }
        if D::SHAPE.is_indirect() {
            return Err(ConvertError::invalid_argument(format!(
                "converter output type must be a plain type, not {}",
                D::SHAPE
            )));
        }

        let func = move |src: &dyn Reflect, dst: &mut dyn Reflect| -> Result<bool, ConvertError> {
            let Some(src) = src.as_any().downcast_ref::<S>() else {
                return Err(ConvertError::internal(format!(
                    "converter for {} called with another source type",
                    S::SHAPE
                )));
            };
            let Some(dst) = dst.as_any_mut().downcast_mut::<D>() else {
                return Err(ConvertError::internal(format!(
                    "converter to {} called with another destination type",
                    D::SHAPE
                )));
            };
            match f(src)? {
                Some(out) => {
                    *dst = out;
                    Ok(true)
                }
                None => Ok(false),
            }
        };
        self.funcs
            .write()
            .insert((TypeId::of::<S>(), TypeId::of::<D>()), Arc::new(func));
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.funcs.read().is_empty()
    }

    /// The converter for an exact `(source, destination)` pair. The lock is
    /// released before the converter runs, so converters may convert too.
    pub(crate) fn lookup(&self, src: TypeId, dst: TypeId) -> Option<Arc<ConvertFn>> {
        self.funcs.read().get(&(src, dst)).cloned()
    }
}
