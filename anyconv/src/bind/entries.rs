//! Key/value views over map-like sources.

use alloc::borrow::Cow;

use crate::cache::{FieldKind, struct_info};
use crate::error::ConvertError;
use crate::reflect::field_at_path;
use crate::scalar::to_string;
use crate::{Peek, Reflect, ScalarRef, Value};

static NULL: Value = Value::Null;

/// The key of a source entry.
pub(crate) enum EntryKey<'a> {
    /// A map key or list item.
    Value(&'a dyn Reflect),
    /// The resolved name of a struct field.
    Name(String),
}

impl EntryKey<'_> {
    pub(crate) fn as_reflect(&self) -> &dyn Reflect {
        match self {
            EntryKey::Value(v) => *v,
            EntryKey::Name(name) => name,
        }
    }

    pub(crate) fn text(&self) -> Result<Cow<'_, str>, ConvertError> {
        match self {
            EntryKey::Name(name) => Ok(Cow::Borrowed(name)),
            EntryKey::Value(v) => match v.peek() {
                Peek::Scalar(ScalarRef::Str(s)) => Ok(Cow::Borrowed(s)),
                _ => to_string(*v).map(Cow::Owned),
            },
        }
    }
}

/// The entries of a map, a struct, or a flat `[k1, v1, k2, v2, ...]` list.
///
/// Struct fields are named through `tags`; members of tagged embedded
/// structs only appear inside their parent's entry. A list with an odd
/// length pairs its last key with null. Other sources give `None`.
pub(crate) fn source_entries<'a>(
    src: &'a dyn Reflect,
    tags: &[String],
) -> Option<Vec<(EntryKey<'a>, &'a dyn Reflect)>> {
    match src.peek() {
        Peek::Map(map) => Some(
            map.entries()
                .into_iter()
                .map(|(k, v)| (EntryKey::Value(k), v))
                .collect(),
        ),
        Peek::Struct(_) => {
            let info = struct_info(src.shape(), tags);
            let entries = info
                .fields
                .iter()
                .filter(|f| !matches!(f.kind, FieldKind::Promoted { through_tagged: true }))
                .filter_map(|f| {
                    let value = field_at_path(src, &f.path)?;
                    Some((EntryKey::Name(f.name().to_owned()), value))
                })
                .collect();
            Some(entries)
        }
        Peek::List(list) => Some(
            (0..list.len())
                .step_by(2)
                .filter_map(|i| {
                    let key = list.get(i)?;
                    Some((EntryKey::Value(key), list.get(i + 1).unwrap_or(&NULL)))
                })
                .collect(),
        ),
        _ => None,
    }
}
