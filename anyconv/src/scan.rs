//! Binding entry points.

use crate::reflect::deref_value;
use crate::{ConvertError, Converter, Def, Reflect, ScanOptions, Shape, StructOptions};

impl Converter {
    /// Binds `src` into `dst`, whatever their kinds.
    ///
    /// A null source leaves `dst` untouched.
    pub fn scan(&self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<(), ConvertError> {
        self.scan_with(src, dst, &ScanOptions::default())
    }

    /// [`Converter::scan`] with options.
    pub fn scan_with(&self, src: &dyn Reflect, dst: &mut dyn Reflect, opts: &ScanOptions) -> Result<(), ConvertError> {
        if deref_value(src).is_none() {
            return Ok(());
        }
        self.binder_with(opts).bind(src, dst, 0)
    }

    /// Binds a map-like source (map, struct, JSON object text) into a struct.
    pub fn to_struct(&self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<(), ConvertError> {
        self.to_struct_with(src, dst, &StructOptions::default())
    }

    /// [`Converter::to_struct`] with options.
    pub fn to_struct_with(
        &self,
        src: &dyn Reflect,
        dst: &mut dyn Reflect,
        opts: &StructOptions,
    ) -> Result<(), ConvertError> {
        let shape = dst.shape();
        if shape.innermost().struct_type().is_none() {
            return Err(ConvertError::invalid_argument(format!(
                "to_struct destination must be a struct, got {shape}"
            )));
        }
        self.scan_with(src, dst, opts)
    }

    /// Binds a list of map-like values into a list of structs.
    pub fn to_structs(&self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<(), ConvertError> {
        self.to_structs_with(src, dst, &StructOptions::default())
    }

    /// [`Converter::to_structs`] with options.
    pub fn to_structs_with(
        &self,
        src: &dyn Reflect,
        dst: &mut dyn Reflect,
        opts: &StructOptions,
    ) -> Result<(), ConvertError> {
        let shape = dst.shape();
        if list_item(shape).and_then(|item| item.innermost().struct_type()).is_none() {
            return Err(ConvertError::invalid_argument(format!(
                "to_structs destination must be a list of structs, got {shape}"
            )));
        }
        self.scan_with(src, dst, opts)
    }
}

/// The item shape of a (possibly wrapped) list or array shape.
pub(crate) fn list_item(shape: &'static Shape) -> Option<&'static Shape> {
    match shape.innermost().def {
        Def::List(l) => Some((l.item)()),
        Def::Array(a) => Some((a.item)()),
        _ => None,
    }
}
