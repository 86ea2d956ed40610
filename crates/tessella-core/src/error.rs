//! Error types shared across the Tessella workspace.
//!
//! Two kinds live here because every crate needs them: configuration
//! errors (the invalid-argument kind, always fatal to construction) and
//! data errors (loading external arrays and writing output channels).
//! Geometry errors live next to the grids in `tessella-space`.

use std::error::Error;
use std::fmt;

use crate::data::ElementKind;

/// Format a shape the way diagnostics print it, e.g. `(4, 8)`.
pub fn fmt_shape(shape: &[usize]) -> String {
    let parts: Vec<String> = shape.iter().map(|n| n.to_string()).collect();
    format!("({})", parts.join(", "))
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors raised while reading a hierarchical configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A required key is absent.
    MissingKey {
        /// The missing key.
        key: String,
        /// What kind of entry was expected, e.g. `"grid configuration parameter"`.
        what: String,
        /// Dotted path of the node that was searched; empty for the root.
        node: String,
    },
    /// A key is present but its value has the wrong type.
    InvalidType {
        /// The offending key.
        key: String,
        /// Name of the requested type.
        expected: &'static str,
        /// Parser message.
        reason: String,
    },
    /// A value has the right type but is outside its valid range.
    InvalidValue {
        /// The offending key.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
    /// A string value does not name one of the allowed variants.
    UnknownVariant {
        /// The offending key.
        key: String,
        /// The value found.
        value: String,
        /// All accepted values.
        allowed: Vec<&'static str>,
    },
    /// The configuration text could not be parsed at all.
    Parse {
        /// Parser message.
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for a [`MissingKey`](Self::MissingKey) error without node path.
    pub fn missing(key: impl Into<String>, what: impl Into<String>) -> Self {
        Self::MissingKey {
            key: key.into(),
            what: what.into(),
            node: String::new(),
        }
    }

    /// Shorthand for an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey { key, what, node } => {
                if node.is_empty() {
                    write!(f, "Missing {what} '{key}'!")
                } else {
                    write!(f, "Missing {what} '{key}' in node '{node}'!")
                }
            }
            Self::InvalidType {
                key,
                expected,
                reason,
            } => write!(f, "Config entry '{key}' could not be read as {expected}: {reason}"),
            Self::InvalidValue { key, reason } => {
                write!(f, "Invalid value for '{key}': {reason}")
            }
            Self::UnknownVariant {
                key,
                value,
                allowed,
            } => {
                let allowed: Vec<String> = allowed.iter().map(|a| format!("'{a}'")).collect();
                write!(
                    f,
                    "Invalid value for '{key}': '{value}'! Allowed values: {}",
                    allowed.join(", ")
                )
            }
            Self::Parse { reason } => write!(f, "failed to parse configuration: {reason}"),
        }
    }
}

impl Error for ConfigError {}

// ── DataError ──────────────────────────────────────────────────────

/// Errors from loading external arrays or writing output datasets.
#[derive(Clone, Debug, PartialEq)]
pub enum DataError {
    /// The requested array could not be read from the source.
    LoadFailed {
        /// Path of the array within the source.
        path: String,
        /// Why loading failed.
        reason: String,
    },
    /// A loaded array does not have the shape of the grid it is meant for.
    ShapeMismatch {
        /// Shape of the loaded data.
        loaded: Vec<usize>,
        /// Shape of the grid.
        expected: Vec<usize>,
    },
    /// A written record does not contain exactly one dataset record.
    RecordSizeMismatch {
        /// Dataset path.
        path: String,
        /// Number of elements per record.
        expected: usize,
        /// Number of elements given.
        actual: usize,
    },
    /// Element type of the data does not match the dataset.
    TypeMismatch {
        /// Dataset path.
        path: String,
        /// Element kind stored in the dataset.
        stored: ElementKind,
        /// Element kind requested or written.
        requested: ElementKind,
    },
    /// A dataset already exists at this path.
    DuplicatePath {
        /// The path.
        path: String,
    },
    /// The handle does not refer to a dataset of this sink.
    UnknownHandle {
        /// Raw handle value.
        handle: usize,
    },
    /// A dataset path or shape is malformed.
    InvalidDataset {
        /// The path.
        path: String,
        /// What is wrong.
        reason: String,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadFailed { path, reason } => {
                write!(f, "Failed loading data from '{path}': {reason}")
            }
            Self::ShapeMismatch { loaded, expected } => write!(
                f,
                "Shape mismatch between loaded data {} and grid {}!",
                fmt_shape(loaded),
                fmt_shape(expected)
            ),
            Self::RecordSizeMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "record for dataset '{path}' has {actual} elements, expected {expected}"
            ),
            Self::TypeMismatch {
                path,
                stored,
                requested,
            } => write!(
                f,
                "dataset '{path}' stores {stored:?} elements, got {requested:?}"
            ),
            Self::DuplicatePath { path } => write!(f, "dataset '{path}' already exists"),
            Self::UnknownHandle { handle } => write!(f, "unknown dataset handle {handle}"),
            Self::InvalidDataset { path, reason } => {
                write!(f, "invalid dataset '{path}': {reason}")
            }
        }
    }
}

impl Error for DataError {}
