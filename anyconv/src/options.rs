//! Options accepted by the `*_with` conversion entry points.

use indexmap::IndexMap;

/// Options for struct and map rendering.
#[derive(Clone, Debug, Default)]
pub struct MapOptions {
    /// Render nested structs, lists and maps with these same options.
    /// When unset, nested values get their plain JSON rendering.
    pub deep: bool,
    /// Skip fields tagged `omitempty` whose value is empty.
    pub omit_empty: bool,
    /// Tags consulted before the converter's default priority tags.
    pub tags: Vec<String>,
    /// Skip fields that fail to render instead of failing the whole map.
    pub continue_on_error: bool,
}

impl MapOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`MapOptions::deep`].
    pub fn with_deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    /// Sets [`MapOptions::omit_empty`].
    pub fn with_omit_empty(mut self, omit_empty: bool) -> Self {
        self.omit_empty = omit_empty;
        self
    }

    /// Sets [`MapOptions::tags`].
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets [`MapOptions::continue_on_error`].
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }
}

/// Options for binding into structs.
#[derive(Clone, Debug, Default)]
pub struct StructOptions {
    /// Explicit `source key -> field` mapping. The field is named by its
    /// Rust name or any of its tag names. Overrides are applied before any
    /// other matching.
    pub overrides: IndexMap<String, String>,
    /// Tags consulted before the converter's default priority tags.
    pub priority_tags: Vec<String>,
    /// Skip fields and elements that fail to bind instead of failing the
    /// whole conversion.
    pub continue_on_error: bool,
}

/// Options for [`scan_with`](crate::scan_with); same as [`StructOptions`].
pub type ScanOptions = StructOptions;

impl StructOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds source key `key` to `field`.
    pub fn with_override(mut self, key: impl Into<String>, field: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), field.into());
        self
    }

    /// Sets [`StructOptions::priority_tags`].
    pub fn with_priority_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priority_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets [`StructOptions::continue_on_error`].
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }
}

/// Options for list conversion.
#[derive(Clone, Copy, Debug, Default)]
pub struct SliceOptions {
    /// Skip elements that fail to convert instead of failing the list.
    pub continue_on_error: bool,
}

impl SliceOptions {
    /// Sets [`SliceOptions::continue_on_error`].
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }
}
