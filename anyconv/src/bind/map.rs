//! Binding into maps.

use super::{Binder, source_entries};
use crate::error::{ConvertError, PathSegment};
use crate::{Map, Peek, Reflect, ScalarRef, Shape};

impl Binder<'_> {
    /// Replaces the content of `dst` with the entries of a map-like source,
    /// converting every key and value.
    pub(super) fn bind_map(
        &self,
        src: &dyn Reflect,
        dst: &mut dyn Map,
        shape: &'static Shape,
        depth: usize,
    ) -> Result<(), ConvertError> {
        let Some(entries) = source_entries(src, &self.tags) else {
            return match src.peek() {
                Peek::Scalar(ScalarRef::Str(s)) if s.trim().is_empty() => Ok(()),
                Peek::Scalar(ScalarRef::Bytes(b)) if b.is_empty() => Ok(()),
                _ => Err(ConvertError::failure(shape, src, "source is not a map or struct")),
            };
        };
        dst.clear();
        for (key, value) in &entries {
            let key_value = key.as_reflect();
            let result = dst.insert_with(&mut |k, v| {
                self.bind(key_value, k, depth)?;
                self.bind(*value, v, depth)
            });
            if let Err(err) = result {
                let err = err.with_path(PathSegment::Key(key.text()?.into_owned()));
                if !self.continue_on_error {
                    return Err(err);
                }
                debug!("skipping entry: {err}");
            }
        }
        Ok(())
    }
}
