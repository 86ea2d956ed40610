//! Error types for cell management and entity selection.

use std::error::Error;
use std::fmt;

use tessella_core::{ConfigError, DataError};
use tessella_space::GridError;

// ── SelectionError ─────────────────────────────────────────────────

/// Invalid arguments to a cell selection.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionError {
    /// More cells were requested than exist.
    SampleTooLarge {
        /// Number of cells requested.
        requested: usize,
        /// Number of cells available.
        available: usize,
    },
    /// A probability parameter lies outside `[0, 1]`.
    ProbabilityOutOfRange {
        /// Parameter name, e.g. `"probability"` or `"p_attach"`.
        name: &'static str,
        /// The value given.
        value: f64,
    },
    /// At least as many lanes as cells along an axis were requested.
    TooManyLanes {
        /// Requested lanes `(vertical, horizontal)`.
        requested: (usize, usize),
        /// Grid shape `(x, y)`.
        shape: (usize, usize),
    },
    /// The selection mode needs a grid of another dimensionality.
    UnsupportedDimension {
        /// Selection mode name.
        mode: &'static str,
        /// Dimensionality of the grid.
        dim: usize,
    },
    /// The selection mode cannot be expressed in a configuration.
    NotFromConfig {
        /// Selection mode name.
        mode: String,
    },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SampleTooLarge {
                requested,
                available,
            } => write!(
                f,
                "Argument num_entities need be in the interval [0, entity container size]! \
                 Requested {requested} of {available} cells."
            ),
            Self::ProbabilityOutOfRange { name, value } => write!(
                f,
                "Argument {name} needs to be a probability, i.e. be in interval [0., 1.], was {value}!"
            ),
            Self::TooManyLanes { requested, shape } => write!(
                f,
                "Given number of vertical and/or horizontal lanes {requested:?} is equal \
                 or larger to the number of cells along that dimension {shape:?}! \
                 Choose a smaller value."
            ),
            Self::UnsupportedDimension { mode, dim } => write!(
                f,
                "Selection mode '{mode}' is not available for a {dim}-dimensional grid"
            ),
            Self::NotFromConfig { mode } => write!(
                f,
                "The selection mode '{mode}' is not available via the configuration!"
            ),
        }
    }
}

impl Error for SelectionError {}

// ── CellManagerError ───────────────────────────────────────────────

/// Errors from constructing or operating a [`CellManager`](crate::CellManager).
#[derive(Clone, Debug, PartialEq)]
pub enum CellManagerError {
    /// Invalid or missing configuration.
    Config(ConfigError),
    /// Grid construction or a grid query failed.
    Grid(GridError),
    /// Loading or writing data failed.
    Data(DataError),
    /// A selection was given invalid arguments.
    Selection(SelectionError),
    /// The number of constructed cells differs from the grid's cell count.
    CellCountMismatch {
        /// The grid's cell count.
        expected: usize,
        /// Number of cells constructed.
        actual: usize,
    },
    /// No way to construct the initial cell state.
    MissingInitialState {
        /// What was tried.
        reason: String,
    },
}

impl fmt::Display for CellManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Grid(e) => write!(f, "grid error: {e}"),
            Self::Data(e) => write!(f, "data error: {e}"),
            Self::Selection(e) => write!(f, "selection error: {e}"),
            Self::CellCountMismatch { expected, actual } => write!(
                f,
                "constructed {actual} cells, but the grid has {expected}"
            ),
            Self::MissingInitialState { reason } => {
                write!(f, "cannot construct initial cell states: {reason}")
            }
        }
    }
}

impl Error for CellManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Data(e) => Some(e),
            Self::Selection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CellManagerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<GridError> for CellManagerError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<DataError> for CellManagerError {
    fn from(e: DataError) -> Self {
        Self::Data(e)
    }
}

impl From<SelectionError> for CellManagerError {
    fn from(e: SelectionError) -> Self {
        Self::Selection(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_message_names_interval() {
        let e = SelectionError::SampleTooLarge {
            requested: 33,
            available: 32,
        };
        assert!(e
            .to_string()
            .starts_with("Argument num_entities need be in the interval [0, entity container size]!"));
    }

    #[test]
    fn umbrella_exposes_source() {
        let e = CellManagerError::from(DataError::ShapeMismatch {
            loaded: vec![4, 4],
            expected: vec![4, 8],
        });
        let src = e.source().map(|s| s.to_string());
        assert_eq!(
            src.as_deref(),
            Some("Shape mismatch between loaded data (4, 4) and grid (4, 8)!")
        );
    }
}
