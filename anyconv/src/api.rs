//! Free functions backed by [`Converter::global`].

use indexmap::IndexMap;

use crate::{
    ConvertError, Converter, MapOptions, Object, Reflect, ScanOptions, SliceOptions, StructOptions, Typed, Value,
};

/// Registers a converter on the global converter. See
/// [`Converter::register_converter`].
pub fn register_converter<S, D, F>(f: F) -> Result<(), ConvertError>
where
    S: Typed,
    D: Typed,
    F: Fn(&S) -> Result<Option<D>, ConvertError> + Send + Sync + 'static,
{
    Converter::global().register_converter(f)
}

/// See [`Converter::scan`].
pub fn scan(src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<(), ConvertError> {
    Converter::global().scan(src, dst)
}

/// See [`Converter::scan_with`].
pub fn scan_with(src: &dyn Reflect, dst: &mut dyn Reflect, opts: &ScanOptions) -> Result<(), ConvertError> {
    Converter::global().scan_with(src, dst, opts)
}

/// See [`Converter::to_struct`].
pub fn to_struct(src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<(), ConvertError> {
    Converter::global().to_struct(src, dst)
}

/// See [`Converter::to_struct_with`].
pub fn to_struct_with(src: &dyn Reflect, dst: &mut dyn Reflect, opts: &StructOptions) -> Result<(), ConvertError> {
    Converter::global().to_struct_with(src, dst, opts)
}

/// See [`Converter::to_structs`].
pub fn to_structs(src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<(), ConvertError> {
    Converter::global().to_structs(src, dst)
}

/// See [`Converter::to_structs_with`].
pub fn to_structs_with(src: &dyn Reflect, dst: &mut dyn Reflect, opts: &StructOptions) -> Result<(), ConvertError> {
    Converter::global().to_structs_with(src, dst, opts)
}

/// See [`Converter::to_map`].
pub fn to_map(src: &dyn Reflect) -> Result<Option<Object>, ConvertError> {
    Converter::global().to_map(src)
}

/// See [`Converter::to_map_with`].
pub fn to_map_with(src: &dyn Reflect, opts: &MapOptions) -> Result<Option<Object>, ConvertError> {
    Converter::global().to_map_with(src, opts)
}

/// See [`Converter::map_str_str`].
pub fn map_str_str(src: &dyn Reflect) -> Result<Option<IndexMap<String, String>>, ConvertError> {
    Converter::global().map_str_str(src)
}

/// See [`Converter::maps`].
pub fn maps(src: &dyn Reflect) -> Result<Option<Vec<Object>>, ConvertError> {
    Converter::global().maps(src)
}

/// See [`Converter::map_to_map`].
pub fn map_to_map(src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<(), ConvertError> {
    Converter::global().map_to_map(src, dst)
}

/// See [`Converter::map_to_maps`].
pub fn map_to_maps(src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<(), ConvertError> {
    Converter::global().map_to_maps(src, dst)
}

/// See [`Converter::to_vec`].
pub fn to_vec<T: Typed + Clone + Default>(src: &dyn Reflect) -> Result<Option<Vec<T>>, ConvertError> {
    Converter::global().to_vec(src)
}

/// See [`Converter::to_vec_with`].
pub fn to_vec_with<T: Typed + Clone + Default>(
    src: &dyn Reflect,
    opts: &SliceOptions,
) -> Result<Option<Vec<T>>, ConvertError> {
    Converter::global().to_vec_with(src, opts)
}

/// See [`Converter::strings`].
pub fn strings(src: &dyn Reflect) -> Result<Vec<String>, ConvertError> {
    Converter::global().strings(src)
}

/// See [`Converter::ints`].
pub fn ints(src: &dyn Reflect) -> Result<Vec<i32>, ConvertError> {
    Converter::global().ints(src)
}

/// See [`Converter::int64s`].
pub fn int64s(src: &dyn Reflect) -> Result<Vec<i64>, ConvertError> {
    Converter::global().int64s(src)
}

/// See [`Converter::uint64s`].
pub fn uint64s(src: &dyn Reflect) -> Result<Vec<u64>, ConvertError> {
    Converter::global().uint64s(src)
}

/// See [`Converter::float64s`].
pub fn float64s(src: &dyn Reflect) -> Result<Vec<f64>, ConvertError> {
    Converter::global().float64s(src)
}

/// See [`Converter::values`].
pub fn values(src: &dyn Reflect) -> Result<Vec<Value>, ConvertError> {
    Converter::global().values(src)
}

/// See [`Converter::convert`].
pub fn convert(from: &dyn Reflect, type_name: &str, extra: &[&str]) -> Result<Value, ConvertError> {
    Converter::global().convert(from, type_name, extra)
}

/// See [`Converter::scan_list`].
pub fn scan_list(
    records: &dyn Reflect,
    entities: &mut dyn Reflect,
    bind_to: &str,
    relation_attr: &str,
    relation: &str,
) -> Result<(), ConvertError> {
    Converter::global().scan_list(records, entities, bind_to, relation_attr, relation)
}
