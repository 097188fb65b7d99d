//! Rendering values as string-keyed maps and dynamic [`Value`]s.

use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::bind::{MAX_DEPTH, recursion_limit};
use crate::cache::{FieldKind, struct_info};
use crate::error::{ConvertError, PathSegment};
use crate::reflect::{deref_value, field_at_path};
use crate::scalar::{to_string, widen_f32};
use crate::scan::list_item;
use crate::tag::priority_tags;
use crate::value::parse_container;
use crate::{Converter, Def, MapOptions, Object, Peek, Reflect, ScalarRef, StructOptions, Value};

/// JSON rendering: `json` tag, `omitempty` honoured, recursive.
static JSON: LazyLock<Renderer> = LazyLock::new(|| Renderer {
    tags: vec!["json".to_owned()],
    deep: true,
    omit_empty: true,
    continue_on_error: false,
});

pub(crate) struct Renderer {
    tags: Vec<String>,
    deep: bool,
    omit_empty: bool,
    continue_on_error: bool,
}

/// Renders any value as a [`Value`], the way it would be written as JSON.
pub(crate) fn to_value(v: &dyn Reflect) -> Result<Value, ConvertError> {
    JSON.value(v, 0)
}

impl Renderer {
    fn new(conv: &Converter, opts: &MapOptions) -> Self {
        Renderer {
            tags: priority_tags(&opts.tags, conv.priority_tags()),
            deep: opts.deep,
            omit_empty: opts.omit_empty,
            continue_on_error: opts.continue_on_error,
        }
    }

    fn value(&self, v: &dyn Reflect, depth: usize) -> Result<Value, ConvertError> {
        if depth > MAX_DEPTH {
            return Err(recursion_limit());
        }
        if let Some(m) = v.as_map_str_any() {
            return Ok(Value::Object(m.map_str_any()));
        }
        Ok(match v.peek() {
            Peek::Null => Value::Null,
            Peek::Pointer(inner) => return self.value(inner, depth),
            Peek::Scalar(s) => scalar_value(s),
            Peek::List(list) => {
                let mut items = Vec::with_capacity(list.len());
                for index in 0..list.len() {
                    if let Some(item) = list.get(index) {
                        items.push(
                            self.child(item, depth + 1)
                                .map_err(|e| e.with_path(PathSegment::Index(index)))?,
                        );
                    }
                }
                Value::Array(items)
            }
            Peek::Map(map) => {
                let mut obj = Object::with_capacity(map.len());
                for (k, item) in map.entries() {
                    let key = to_string(k)?;
                    let rendered = self.child(item, depth + 1);
                    match rendered {
                        Ok(r) => {
                            obj.insert(key, r);
                        }
                        Err(e) => return Err(e.with_path(PathSegment::Key(key))),
                    }
                }
                Value::Object(obj)
            }
            Peek::Struct(_) => Value::Object(self.struct_object(v, depth + 1)?),
        })
    }

    /// Nested values follow the caller's options only in deep mode.
    fn child(&self, v: &dyn Reflect, depth: usize) -> Result<Value, ConvertError> {
        if self.deep { self.value(v, depth) } else { JSON.value(v, depth) }
    }

    fn struct_object(&self, v: &dyn Reflect, depth: usize) -> Result<Object, ConvertError> {
        let info = struct_info(v.shape(), &self.tags);
        let mut obj = Object::with_capacity(info.fields.len());
        for field in &info.fields {
            // Members of a tagged embedded struct render inside their parent.
            if let FieldKind::Promoted { through_tagged: true } = field.kind {
                continue;
            }
            let Some(value) = field_at_path(v, &field.path) else {
                continue;
            };
            if self.omit_empty && field.omit_empty && is_empty(value) {
                continue;
            }
            let rendered = match field.kind {
                FieldKind::Embedded => self.struct_object(value, depth + 1).map(Value::Object),
                _ => self.child(value, depth),
            };
            match rendered {
                Ok(r) => {
                    obj.insert(field.name().to_owned(), r);
                }
                Err(e) if self.continue_on_error => {
                    debug!("skipping field {}: {e}", field.rust_name);
                }
                Err(e) => return Err(e.with_path(PathSegment::Field(field.rust_name.to_owned()))),
            }
        }
        Ok(obj)
    }

    /// Top-level map conversion. `None` when `v` has no map form.
    fn object(&self, v: &dyn Reflect) -> Result<Option<Object>, ConvertError> {
        let Some(v) = deref_value(v) else {
            return Ok(None);
        };
        if let Some(m) = v.as_map_str_any() {
            return Ok(Some(m.map_str_any()));
        }
        match v.peek() {
            Peek::Scalar(ScalarRef::Str(text)) => self.parsed_object(text.as_bytes()),
            Peek::Scalar(ScalarRef::Bytes(bytes)) => self.parsed_object(bytes),
            Peek::Scalar(_) | Peek::Null | Peek::Pointer(_) => Ok(None),
            Peek::Struct(_) => self.struct_object(v, 1).map(Some),
            Peek::Map(map) => {
                let mut obj = Object::with_capacity(map.len());
                for (k, item) in map.entries() {
                    let key = to_string(k)?;
                    match self.child(item, 1) {
                        Ok(r) => {
                            obj.insert(key, r);
                        }
                        Err(e) if self.continue_on_error => {
                            debug!("skipping key {key}: {e}");
                        }
                        Err(e) => return Err(e.with_path(PathSegment::Key(key))),
                    }
                }
                Ok(Some(obj))
            }
            Peek::List(list) => {
                let mut obj = Object::with_capacity(list.len() / 2 + 1);
                for index in (0..list.len()).step_by(2) {
                    let Some(k) = list.get(index) else {
                        continue;
                    };
                    let key = to_string(k)?;
                    let value = match list.get(index + 1) {
                        Some(item) => self.child(item, 1)?,
                        None => Value::Null,
                    };
                    obj.insert(key, value);
                }
                Ok(Some(obj))
            }
        }
    }

    fn parsed_object(&self, text: &[u8]) -> Result<Option<Object>, ConvertError> {
        match parse_container(text) {
            Some(Value::Object(obj)) => Ok(Some(obj)),
            Some(list @ Value::Array(_)) => self.object(&list),
            _ => Ok(None),
        }
    }
}

fn scalar_value(s: ScalarRef<'_>) -> Value {
    match s {
        ScalarRef::Bool(b) => Value::Bool(b),
        ScalarRef::I64(i) => Value::Int(i),
        ScalarRef::U64(u) => Value::Uint(u),
        ScalarRef::F32(f) => Value::Float(widen_f32(f)),
        ScalarRef::F64(f) => Value::Float(f),
        ScalarRef::Char(c) => Value::String(c.to_string()),
        ScalarRef::Str(text) => Value::String(text.to_owned()),
        ScalarRef::Bytes(bytes) => Value::Bytes(bytes.to_vec()),
        ScalarRef::DateTime(t) => Value::Time(t),
        ScalarRef::Duration(d) => Value::Int(i64::try_from(d.as_nanos()).unwrap_or(i64::MAX)),
    }
}

/// Zero values, empty text and empty collections. A present `Option` or
/// `Box` is never empty.
pub(crate) fn is_empty(v: &dyn Reflect) -> bool {
    match v.peek() {
        Peek::Null => true,
        Peek::Pointer(_) => false,
        Peek::Scalar(s) => match s {
            ScalarRef::Bool(b) => !b,
            ScalarRef::I64(i) => i == 0,
            ScalarRef::U64(u) => u == 0,
            ScalarRef::F32(f) => f == 0.0,
            ScalarRef::F64(f) => f == 0.0,
            ScalarRef::Char(c) => c == '\0',
            ScalarRef::Str(text) => text.is_empty(),
            ScalarRef::Bytes(bytes) => bytes.is_empty(),
            ScalarRef::DateTime(t) => t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0,
            ScalarRef::Duration(d) => d.is_zero(),
        },
        Peek::List(list) => list.is_empty(),
        Peek::Map(map) => map.is_empty(),
        Peek::Struct(s) => (0..s.field_count()).all(|i| s.field(i).is_none_or(is_empty)),
    }
}

impl Converter {
    /// Converts `src` to a string-keyed map with default options.
    ///
    /// Structs map their fields by resolved name, maps stringify their keys,
    /// flat `[k1, v1, k2, v2]` lists pair up, and JSON object text is
    /// parsed. Null and other scalars give `None`.
    pub fn to_map(&self, src: &dyn Reflect) -> Result<Option<Object>, ConvertError> {
        self.to_map_with(src, &MapOptions::default())
    }

    /// Converts `src` to a string-keyed map.
    pub fn to_map_with(&self, src: &dyn Reflect, opts: &MapOptions) -> Result<Option<Object>, ConvertError> {
        Renderer::new(self, opts).object(src)
    }

    /// Converts `src` to a map of strings.
    pub fn map_str_str(&self, src: &dyn Reflect) -> Result<Option<IndexMap<String, String>>, ConvertError> {
        let Some(obj) = self.to_map(src)? else {
            return Ok(None);
        };
        obj.iter()
            .map(|(k, v)| Ok::<_, ConvertError>((k.clone(), to_string(v)?)))
            .collect::<Result<_, _>>()
            .map(Some)
    }

    /// Converts a list (or JSON array text) to a list of maps. A single
    /// map-like value gives a one-element list; items without a map form
    /// are skipped.
    pub fn maps(&self, src: &dyn Reflect) -> Result<Option<Vec<Object>>, ConvertError> {
        let Some(v) = deref_value(src) else {
            return Ok(None);
        };
        let parsed = match v.peek() {
            Peek::Scalar(ScalarRef::Str(text)) => parse_container(text.as_bytes()),
            Peek::Scalar(ScalarRef::Bytes(bytes)) => parse_container(bytes),
            _ => None,
        };
        let v = parsed.as_ref().map_or(v, |p| p as &dyn Reflect);
        let renderer = Renderer::new(self, &MapOptions::default());
        match v.peek() {
            Peek::List(list) => {
                let mut out = Vec::with_capacity(list.len());
                for index in 0..list.len() {
                    let Some(item) = list.get(index) else {
                        continue;
                    };
                    let obj = renderer
                        .object(item)
                        .map_err(|e| e.with_path(PathSegment::Index(index)))?;
                    out.extend(obj);
                }
                Ok(Some(out))
            }
            _ => Ok(renderer.object(v)?.map(|obj| vec![obj])),
        }
    }

    /// Binds a map-like source into a map destination, converting every
    /// key and value to the destination's types.
    pub fn map_to_map(&self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<(), ConvertError> {
        self.map_to_map_with(src, dst, &StructOptions::default())
    }

    /// [`Converter::map_to_map`] with options for struct values.
    pub fn map_to_map_with(
        &self,
        src: &dyn Reflect,
        dst: &mut dyn Reflect,
        opts: &StructOptions,
    ) -> Result<(), ConvertError> {
        if !matches!(dst.shape().innermost().def, Def::Map(_)) {
            return Err(ConvertError::invalid_argument(format!(
                "map_to_map destination must be a map, got {}",
                dst.shape()
            )));
        }
        if deref_value(src).is_none() {
            return Ok(());
        }
        self.binder_with(opts).bind(src, dst, 0)
    }

    /// Binds a list of map-like values into a list of maps.
    pub fn map_to_maps(&self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<(), ConvertError> {
        self.map_to_maps_with(src, dst, &StructOptions::default())
    }

    /// [`Converter::map_to_maps`] with options for struct values.
    pub fn map_to_maps_with(
        &self,
        src: &dyn Reflect,
        dst: &mut dyn Reflect,
        opts: &StructOptions,
    ) -> Result<(), ConvertError> {
        let is_map_list = list_item(dst.shape()).is_some_and(|item| matches!(item.innermost().def, Def::Map(_)));
        if !is_map_list {
            return Err(ConvertError::invalid_argument(format!(
                "map_to_maps destination must be a list of maps, got {}",
                dst.shape()
            )));
        }
        if deref_value(src).is_none() {
            return Ok(());
        }
        self.binder_with(opts).bind(src, dst, 0)
    }
}
