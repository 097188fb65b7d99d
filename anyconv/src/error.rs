//! Errors raised by conversions.

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Reflect;

/// A segment in a conversion path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A struct field, by its Rust name.
    Field(String),
    /// A list or array position.
    Index(usize),
    /// A map key.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{name}"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::Key(key) => write!(f, "[{key:?}]"),
        }
    }
}

/// Coarse classification of a [`ConvertError`], stable across releases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The caller passed something unusable: wrong destination kind, a
    /// malformed converter registration, bad `scan_list` arguments.
    InvalidParameter,
    /// A value could not be converted to the requested type.
    ConversionFailure,
    /// Nesting went deeper than the binder allows.
    RecursionLimit,
    /// Raised by a user hook or converter.
    Custom,
    /// A broken internal assumption.
    Internal,
}

/// What went wrong.
#[derive(Debug)]
pub enum ConvertErrorKind {
    /// Invalid input from the caller.
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },
    /// A value could not be converted.
    ConversionFailure {
        /// The requested type.
        target: String,
        /// The type of the source value.
        source_type: String,
        /// A short rendering of the source value.
        value: String,
        /// Details from the underlying parser, if any.
        message: String,
    },
    /// Nested binding exceeded the maximum depth.
    RecursionLimit {
        /// The depth that was reached.
        depth: usize,
    },
    /// An error produced by user code.
    Custom(Box<dyn core::error::Error + Send + Sync>),
    /// An internal invariant did not hold.
    Internal {
        /// Description of the problem.
        message: String,
    },
}

impl fmt::Display for ConvertErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertErrorKind::InvalidArgument { message } => {
                write!(f, "invalid argument: {message}")
            }
            ConvertErrorKind::ConversionFailure {
                target,
                source_type,
                value,
                message,
            } => {
                write!(f, "cannot convert {source_type} {value} to {target}")?;
                if !message.is_empty() {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            ConvertErrorKind::RecursionLimit { depth } => {
                write!(f, "maximum nesting depth of {depth} exceeded")
            }
            ConvertErrorKind::Custom(err) => write!(f, "{err}"),
            ConvertErrorKind::Internal { message } => write!(f, "internal error: {message}"),
        }
    }
}

/// Error type for every fallible conversion.
#[derive(Debug)]
pub struct ConvertError {
    /// The specific kind of error.
    pub kind: ConvertErrorKind,
    /// Path through the destination where the error occurred, outermost first.
    pub path: Vec<PathSegment>,
}

impl ConvertError {
    /// Creates an error with an empty path.
    pub fn new(kind: ConvertErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    /// An [`ConvertErrorKind::InvalidArgument`] error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ConvertErrorKind::InvalidArgument {
            message: message.into(),
        })
    }

    /// Wraps an error produced by user code.
    pub fn custom(err: impl Into<Box<dyn core::error::Error + Send + Sync>>) -> Self {
        Self::new(ConvertErrorKind::Custom(err.into()))
    }

    /// An [`ConvertErrorKind::Internal`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ConvertErrorKind::Internal {
            message: message.into(),
        })
    }

    /// A failure to convert `src` to `target`.
    pub(crate) fn failure(target: impl fmt::Display, src: &dyn Reflect, message: impl Into<String>) -> Self {
        Self::new(ConvertErrorKind::ConversionFailure {
            target: target.to_string(),
            source_type: src.shape().to_string(),
            value: describe(src),
            message: message.into(),
        })
    }

    /// A failure to parse the text `value` as `target`.
    pub(crate) fn parse_failure(target: &str, value: &str, message: impl fmt::Display) -> Self {
        Self::new(ConvertErrorKind::ConversionFailure {
            target: target.to_owned(),
            source_type: "str".to_owned(),
            value: format!("{value:?}"),
            message: message.to_string(),
        })
    }

    /// Prepends a segment to the path.
    pub fn with_path(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    /// The classification of this error.
    pub fn code(&self) -> ErrorCode {
        match self.kind {
            ConvertErrorKind::InvalidArgument { .. } => ErrorCode::InvalidParameter,
            ConvertErrorKind::ConversionFailure { .. } => ErrorCode::ConversionFailure,
            ConvertErrorKind::RecursionLimit { .. } => ErrorCode::RecursionLimit,
            ConvertErrorKind::Custom(_) => ErrorCode::Custom,
            ConvertErrorKind::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// The path rendered as `.field[0]["key"]`, or `<root>` when empty.
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "<root>".into();
        }
        let mut s = String::new();
        for seg in &self.path {
            use core::fmt::Write;
            let _ = write!(s, "{seg}");
        }
        s
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "at {}: {}", self.path_string(), self.kind)
        }
    }
}

impl core::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            ConvertErrorKind::Custom(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ConvertErrorKind::ConversionFailure {
            target: "json".to_owned(),
            source_type: "str".to_owned(),
            value: String::new(),
            message: err.to_string(),
        })
    }
}

/// Short rendering of a value for error messages.
pub(crate) fn describe(src: &dyn Reflect) -> String {
    let mut text = format!("{src:?}");
    if text.len() > 64 {
        let mut cut = 61;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
