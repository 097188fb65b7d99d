//! The conversion engine handle.

use std::sync::LazyLock;

use crate::bind::Binder;
use crate::error::ConvertError;
use crate::registry::Registry;
use crate::tag::{DEFAULT_PRIORITY_TAGS, priority_tags};
use crate::{StructOptions, Typed};

static GLOBAL: LazyLock<Converter> = LazyLock::new(Converter::new);

/// Owns a converter registry and the default tag priority.
///
/// The free functions of this crate use [`Converter::global`]. Create a
/// separate instance to keep registrations isolated, e.g. per test or per
/// subsystem.
pub struct Converter {
    registry: Registry,
    priority_tags: Vec<String>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Converter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Converter")
            .field("priority_tags", &self.priority_tags)
            .finish_non_exhaustive()
    }
}

impl Converter {
    /// A converter with no registered functions and the default tag
    /// priority `gconv, param, params, c, p, json`.
    pub fn new() -> Self {
        Self {
            registry: Registry::default(),
            priority_tags: DEFAULT_PRIORITY_TAGS.iter().map(|t| (*t).to_owned()).collect(),
        }
    }

    /// Replaces the default tag priority.
    pub fn with_priority_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priority_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The process-wide converter used by the free functions.
    pub fn global() -> &'static Converter {
        &GLOBAL
    }

    /// The default tag priority.
    pub fn priority_tags(&self) -> &[String] {
        &self.priority_tags
    }

    /// Registers `f` to convert `S` values into `D` destinations.
    ///
    /// The converter runs whenever a (possibly `Option`/`Box` wrapped) `S`
    /// is bound into a `D`, or into an `Option<D>`/`Box<D>`. Returning
    /// `Ok(None)` declines, and binding continues as if nothing was
    /// registered. A later registration for the same pair replaces the
    /// earlier one.
    ///
    /// `S` and `D` must not themselves be `Option` or `Box`.
    pub fn register_converter<S, D, F>(&self, f: F) -> Result<(), ConvertError>
    where
        S: Typed,
        D: Typed,
        F: Fn(&S) -> Result<Option<D>, ConvertError> + Send + Sync + 'static,
    {
        self.registry.register(f)
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    /// A binder using the default options.
    pub(crate) fn binder(&self) -> Binder<'_> {
        Binder {
            conv: self,
            tags: self.priority_tags.clone(),
            overrides: None,
            continue_on_error: false,
        }
    }

    /// A binder for struct options.
    pub(crate) fn binder_with<'a>(&'a self, opts: &'a StructOptions) -> Binder<'a> {
        Binder {
            conv: self,
            tags: priority_tags(&opts.priority_tags, &self.priority_tags),
            overrides: (!opts.overrides.is_empty()).then_some(&opts.overrides),
            continue_on_error: opts.continue_on_error,
        }
    }
}
