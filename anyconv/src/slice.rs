//! List conversion.

use crate::reflect::deref_value;
use crate::value::parse_container;
use crate::{ConvertError, Converter, Peek, Reflect, ScalarRef, SliceOptions, Typed, Value};

impl Converter {
    /// Converts `src` to a `Vec<T>`.
    ///
    /// Null gives `None`, which is distinct from the empty list that empty
    /// text gives. Lists convert item by item, JSON array text is parsed,
    /// bytes convert byte by byte, and any other single value becomes a
    /// one-element list.
    pub fn to_vec<T: Typed + Clone + Default>(&self, src: &dyn Reflect) -> Result<Option<Vec<T>>, ConvertError> {
        self.to_vec_with(src, &SliceOptions::default())
    }

    /// [`Converter::to_vec`] with options. With `continue_on_error`, items
    /// that fail to convert are left at their default.
    pub fn to_vec_with<T: Typed + Clone + Default>(
        &self,
        src: &dyn Reflect,
        opts: &SliceOptions,
    ) -> Result<Option<Vec<T>>, ConvertError> {
        let Some(v) = deref_value(src) else {
            return Ok(None);
        };
        if let Some(same) = v.as_any().downcast_ref::<Vec<T>>() {
            return Ok(Some(same.clone()));
        }

        let binder = self.binder().with_continue_on_error(opts.continue_on_error);
        let mut out = Vec::new();
        if let Peek::Scalar(ScalarRef::Bytes(bytes)) = v.peek() {
            if !bytes.is_empty() && parse_container(bytes).is_none() {
                let items: Vec<Value> = bytes.iter().map(|b| Value::from(*b)).collect();
                binder.bind(&items, &mut out, 0)?;
                return Ok(Some(out));
            }
        }
        binder.bind(v, &mut out, 0)?;
        Ok(Some(out))
    }

    /// Converts to a list of strings; null gives an empty list.
    pub fn strings(&self, src: &dyn Reflect) -> Result<Vec<String>, ConvertError> {
        Ok(self.to_vec(src)?.unwrap_or_default())
    }

    /// Converts to a list of `i32`; null gives an empty list.
    pub fn ints(&self, src: &dyn Reflect) -> Result<Vec<i32>, ConvertError> {
        Ok(self.to_vec(src)?.unwrap_or_default())
    }

    /// Converts to a list of `i64`; null gives an empty list.
    pub fn int64s(&self, src: &dyn Reflect) -> Result<Vec<i64>, ConvertError> {
        Ok(self.to_vec(src)?.unwrap_or_default())
    }

    /// Converts to a list of `u64`; null gives an empty list.
    pub fn uint64s(&self, src: &dyn Reflect) -> Result<Vec<u64>, ConvertError> {
        Ok(self.to_vec(src)?.unwrap_or_default())
    }

    /// Converts to a list of `f64`; null gives an empty list.
    pub fn float64s(&self, src: &dyn Reflect) -> Result<Vec<f64>, ConvertError> {
        Ok(self.to_vec(src)?.unwrap_or_default())
    }

    /// Converts to a list of dynamic values; null gives an empty list.
    pub fn values(&self, src: &dyn Reflect) -> Result<Vec<Value>, ConvertError> {
        Ok(self.to_vec(src)?.unwrap_or_default())
    }
}
