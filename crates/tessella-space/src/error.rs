//! Error types for grid construction and cell queries.

use std::error::Error;
use std::fmt;

use tessella_core::{ConfigError, SpaceVec};

/// Errors arising from grid construction or grid queries.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// The grid variant does not implement this query yet.
    NotImplemented {
        /// Grid type name, e.g. `"TriangularGrid"`.
        grid: &'static str,
        /// The method that was called.
        method: &'static str,
    },
    /// The requested neighborhood mode is not available for this grid.
    UnsupportedNeighborhood {
        /// The mode's configuration name.
        mode: String,
        /// Grid type name.
        grid: &'static str,
    },
    /// A position lies outside a non-periodic space.
    OutsideSpace {
        /// The offending position.
        pos: SpaceVec,
        /// Extent of the space.
        extent: SpaceVec,
    },
    /// A boundary selector is unknown or unavailable for this grid.
    InvalidBoundary {
        /// The selector as given.
        select: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A vector argument has the wrong number of components.
    DimensionMismatch {
        /// Dimensionality of the space.
        expected: usize,
        /// Length of the vector given.
        actual: usize,
    },
    /// Construction parameters were invalid.
    Config(ConfigError),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented { grid, method } => {
                write!(f, "{grid}::{method} is not yet implemented!")
            }
            Self::UnsupportedNeighborhood { mode, grid } => {
                write!(f, "No '{mode}' neighborhood available for {grid}!")
            }
            Self::OutsideSpace { pos, extent } => write!(
                f,
                "The given position {:?} is outside the non-periodic space with extent {:?}!",
                pos.as_slice(),
                extent.as_slice()
            ),
            Self::InvalidBoundary { select, reason } => write!(
                f,
                "Invalid value for argument `select` in call to method \
                 `boundary_cells`: '{select}'! {reason}"
            ),
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "expected a vector with {expected} components, got {actual}"
            ),
            Self::Config(e) => write!(f, "invalid grid configuration: {e}"),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for GridError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
