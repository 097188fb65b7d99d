//! Binding into structs.

use super::{Binder, source_entries};
use crate::cache::{FieldInfo, struct_info};
use crate::error::{ConvertError, PathSegment};
use crate::reflect::field_at_path_mut;
use crate::tag::fuzzy_key;
use crate::{Peek, Reflect, ScalarRef, Shape, Struct};

impl Binder<'_> {
    /// Binds a map-like source into a struct.
    ///
    /// Fields are matched in three passes: explicit overrides, then exact
    /// names (any candidate tag name or the Rust name), then a case and
    /// symbol insensitive comparison against the keys nothing claimed yet.
    /// Fields without a matching key keep their value.
    pub(super) fn bind_struct(
        &self,
        src: &dyn Reflect,
        dst: &mut dyn Struct,
        shape: &'static Shape,
        depth: usize,
    ) -> Result<(), ConvertError> {
        let Some(entries) = source_entries(src, &self.tags) else {
            return match src.peek() {
                // Empty text has nothing to bind.
                Peek::Scalar(ScalarRef::Str(s)) if s.trim().is_empty() => Ok(()),
                Peek::Scalar(ScalarRef::Bytes(b)) if b.is_empty() => Ok(()),
                _ => Err(ConvertError::failure(shape, src, "source is not a map or struct")),
            };
        };
        let info = struct_info(shape, &self.tags);
        if info.has_no_fields() || entries.is_empty() {
            return Ok(());
        }

        let keys = entries
            .iter()
            .map(|(k, _)| k.text().map(|t| t.into_owned()))
            .collect::<Result<Vec<_>, _>>()?;
        let position = |name: &str| keys.iter().position(|k| k == name);

        let mut used = vec![false; entries.len()];
        let mut bound = vec![false; info.fields.len()];

        if let Some(overrides) = self.overrides {
            for (key, target) in overrides {
                let (Some(ei), Some(fi)) = (position(key), info.find(target)) else {
                    continue;
                };
                self.bind_field(dst, &info.fields[fi], entries[ei].1, depth)?;
                used[ei] = true;
                bound[fi] = true;
            }
        }

        for (fi, field) in info.fields.iter().enumerate() {
            if bound[fi] {
                continue;
            }
            if let Some(ei) = field.names.iter().find_map(|n| position(n)) {
                self.bind_field(dst, field, entries[ei].1, depth)?;
                used[ei] = true;
                bound[fi] = true;
            }
        }

        if used.iter().all(|u| *u) {
            return Ok(());
        }
        let fuzzy: Vec<String> = keys.iter().map(|k| fuzzy_key(k)).collect();
        for (fi, field) in info.fields.iter().enumerate() {
            if bound[fi] {
                continue;
            }
            let remembered = field
                .last_fuzzy_key()
                .and_then(|k| position(&k))
                .filter(|&ei| !used[ei] && field.matches_fuzzy(&fuzzy[ei]));
            let hit = remembered.or_else(|| {
                (0..entries.len()).find(|&ei| !used[ei] && field.matches_fuzzy(&fuzzy[ei]))
            });
            let Some(ei) = hit else {
                continue;
            };
            trace!("fuzzy match {:?} -> {}", keys[ei], field.rust_name);
            field.remember_fuzzy_key(&keys[ei]);
            self.bind_field(dst, field, entries[ei].1, depth)?;
            used[ei] = true;
            bound[fi] = true;
        }
        Ok(())
    }

    /// Binds `value` into every struct field that resolved to `field`'s name.
    fn bind_field(
        &self,
        dst: &mut dyn Struct,
        field: &FieldInfo,
        value: &dyn Reflect,
        depth: usize,
    ) -> Result<(), ConvertError> {
        for path in core::iter::once(&field.path).chain(&field.others) {
            let Some(slot) = field_at_path_mut(dst, path) else {
                return Err(ConvertError::internal(format!(
                    "field path {path:?} of {} does not resolve",
                    field.rust_name
                )));
            };
            if let Err(err) = self.bind(value, slot, depth) {
                let err = err.with_path(PathSegment::Field(field.rust_name.to_owned()));
                if !self.continue_on_error {
                    return Err(err);
                }
                debug!("skipping field: {err}");
            }
        }
        Ok(())
    }
}
