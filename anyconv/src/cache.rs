//! Per-type field tables used by struct binding and rendering.
//!
//! Field tables are computed from a struct's [`Shape`] once per
//! `(type, priority tags)` pair and shared process-wide.

use core::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};

use crate::Shape;
use crate::shape::Field;
use crate::tag::{TagSpec, fuzzy_key};

/// Cache key: the struct's `TypeId` and the comma-joined priority tags.
type CacheKey = (TypeId, String);

static CACHE: OnceLock<RwLock<HashMap<CacheKey, Arc<StructInfo>>>> = OnceLock::new();

fn cache() -> &'static RwLock<HashMap<CacheKey, Arc<StructInfo>>> {
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// How a field relates to the struct it was collected for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A direct field.
    Plain,
    /// A flattened field that carries its own tag. It is addressable under
    /// that tag, and its members are promoted as well.
    Embedded,
    /// A member of a flattened field.
    Promoted {
        /// Some flattened ancestor carries its own tag.
        through_tagged: bool,
    },
}

/// A bindable field of a struct, possibly reached through flattened fields.
#[derive(Debug)]
pub struct FieldInfo {
    /// Rust name of the field.
    pub rust_name: &'static str,
    /// Field indices from the outer struct down to this field.
    pub path: Vec<usize>,
    /// Shape of the field's type.
    pub shape: &'static Shape,
    /// Candidate external names: present priority tags in order, then the
    /// Rust name. The first entry is the resolved name.
    pub names: Vec<String>,
    /// `names` run through [`fuzzy_key`].
    pub fuzzy_names: Vec<String>,
    /// The resolving tag carries `omitempty`.
    pub omit_empty: bool,
    /// Relation to the outer struct.
    pub kind: FieldKind,
    /// Paths of later fields that resolved to the same name.
    pub others: Vec<Vec<usize>>,
    last_fuzzy_key: Mutex<Option<String>>,
}

impl FieldInfo {
    /// The resolved external name.
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    /// The source key that most recently matched this field fuzzily.
    pub fn last_fuzzy_key(&self) -> Option<String> {
        self.last_fuzzy_key.lock().clone()
    }

    pub(crate) fn remember_fuzzy_key(&self, key: &str) {
        let mut last = self.last_fuzzy_key.lock();
        if last.as_deref() != Some(key) {
            *last = Some(key.to_owned());
        }
    }

    /// Returns `true` if `name`, stripped of symbols and case, matches one
    /// of the candidate names.
    pub fn matches_fuzzy(&self, fuzzy: &str) -> bool {
        self.fuzzy_names.iter().any(|n| n == fuzzy)
    }
}

/// The field table of one struct type under one tag priority.
#[derive(Debug)]
pub struct StructInfo {
    /// Name of the struct type.
    pub type_identifier: &'static str,
    /// Bindable fields, in declaration order with flattened members in
    /// place of their parent.
    pub fields: Vec<FieldInfo>,
    by_name: HashMap<String, usize>,
}

impl StructInfo {
    /// Returns `true` if there is nothing to bind.
    pub fn has_no_fields(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finds a field by its Rust name or any of its candidate names.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Finds a field by name, falling back to a case and symbol insensitive
    /// comparison.
    pub fn find_fuzzy(&self, name: &str) -> Option<usize> {
        self.find(name).or_else(|| {
            let fuzzy = fuzzy_key(name);
            self.fields.iter().position(|f| f.matches_fuzzy(&fuzzy))
        })
    }

    fn build(shape: &'static Shape, tags: &[String]) -> Self {
        let mut info = StructInfo {
            type_identifier: shape.type_identifier,
            fields: Vec::new(),
            by_name: HashMap::new(),
        };
        let mut canonical = HashMap::new();
        info.collect(shape, tags, &mut Vec::new(), None, &mut canonical);
        info
    }

    fn collect(
        &mut self,
        shape: &'static Shape,
        tags: &[String],
        prefix: &mut Vec<usize>,
        promoted: Option<bool>,
        canonical: &mut HashMap<String, usize>,
    ) {
        let Some(st) = shape.struct_type() else {
            return;
        };
        for (index, field) in st.fields.iter().enumerate() {
            let resolved = resolve(field, tags);
            if resolved.excluded {
                continue;
            }
            prefix.push(index);
            let field_shape = field.shape();
            let kind = match promoted {
                None => FieldKind::Plain,
                Some(through_tagged) => FieldKind::Promoted { through_tagged },
            };
            if field.is_flattened() && field_shape.struct_type().is_some() {
                let through_tagged = promoted.unwrap_or(false) || resolved.tagged;
                if resolved.tagged {
                    self.register(field, field_shape, prefix, resolved, FieldKind::Embedded, canonical);
                }
                self.collect(field_shape, tags, prefix, Some(through_tagged), canonical);
            } else {
                self.register(field, field_shape, prefix, resolved, kind, canonical);
            }
            prefix.pop();
        }
    }

    fn register(
        &mut self,
        field: &Field,
        shape: &'static Shape,
        path: &[usize],
        resolved: Resolved,
        kind: FieldKind,
        canonical: &mut HashMap<String, usize>,
    ) {
        let Resolved {
            names, omit_empty, ..
        } = resolved;
        if let Some(&existing) = canonical.get(&names[0]) {
            self.fields[existing].others.push(path.to_vec());
            return;
        }
        let index = self.fields.len();
        canonical.insert(names[0].clone(), index);
        for name in &names {
            self.by_name.entry(name.clone()).or_insert(index);
        }
        self.fields.push(FieldInfo {
            rust_name: field.name,
            path: path.to_vec(),
            shape,
            fuzzy_names: names.iter().map(|n| fuzzy_key(n)).collect(),
            names,
            omit_empty,
            kind,
            others: Vec::new(),
            last_fuzzy_key: Mutex::new(None),
        });
    }
}

struct Resolved {
    names: Vec<String>,
    omit_empty: bool,
    excluded: bool,
    /// At least one priority tag gave the field a name.
    tagged: bool,
}

/// Resolves the candidate names of a field. The highest priority tag that
/// is present decides `omitempty` and exclusion.
fn resolve(field: &Field, tags: &[String]) -> Resolved {
    let mut resolved = Resolved {
        names: Vec::new(),
        omit_empty: false,
        excluded: false,
        tagged: false,
    };
    let mut first = true;
    for tag in tags {
        let Some(raw) = field.tag(tag) else {
            continue;
        };
        let spec = TagSpec::parse(raw);
        if first {
            first = false;
            if spec.excluded {
                resolved.excluded = true;
                return resolved;
            }
            resolved.omit_empty = spec.omit_empty;
        }
        if !spec.excluded && !spec.name.is_empty() && !resolved.names.iter().any(|n| n == spec.name) {
            resolved.names.push(spec.name.to_owned());
            resolved.tagged = true;
        }
    }
    if !resolved.names.iter().any(|n| n == field.name) {
        resolved.names.push(field.name.to_owned());
    }
    resolved
}

/// Returns the field table of a struct shape, computing it on first use.
pub fn struct_info(shape: &'static Shape, tags: &[String]) -> Arc<StructInfo> {
    let key = (shape.type_id(), tags.join(","));
    if let Some(info) = cache().read().get(&key) {
        return Arc::clone(info);
    }

    trace!("struct cache miss for {} with tags {:?}", shape, key.1);
    let info = Arc::new(StructInfo::build(shape, tags));

    // Another thread may have filled the entry meanwhile; keep the first one.
    Arc::clone(cache().write().entry(key).or_insert(info))
}

/// Drops every cached field table.
pub fn clear_struct_cache() {
    if let Some(cache) = CACHE.get() {
        cache.write().clear();
    }
}
