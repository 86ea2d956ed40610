//! The continuous physical domain of a simulation.

use smallvec::smallvec;
use tessella_core::{Config, ConfigError, SpaceVec};

use crate::edge::EdgeBehavior;

/// A d-dimensional box `[0, extent_0] x ... x [0, extent_{d-1}]`,
/// optionally periodic along every axis.
///
/// Spaces are immutable once constructed and shared between the grid
/// and the cell manager via `Arc<Space>`.
///
/// # Examples
///
/// ```
/// use tessella_space::Space;
///
/// let space = Space::new(2, &[4.0, 8.0], true).unwrap();
/// assert_eq!(space.dim(), 2);
/// assert_eq!(space.volume(), 32.0);
/// assert_eq!(space.map_into_space(&[5.0, -1.0]).as_slice(), &[1.0, 7.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Space {
    dim: usize,
    extent: SpaceVec,
    periodic: bool,
}

impl Space {
    /// Create a space. Fails if `dim` is not 1, 2 or 3, if `extent` does
    /// not have `dim` entries, or if any extent is non-positive or not
    /// finite.
    pub fn new(dim: usize, extent: &[f64], periodic: bool) -> Result<Self, ConfigError> {
        if !(1..=3).contains(&dim) {
            return Err(ConfigError::invalid(
                "dim",
                format!("space dimensionality must be 1, 2 or 3, was {dim}"),
            ));
        }
        if extent.len() != dim {
            return Err(ConfigError::invalid(
                "extent",
                format!("expected {dim} extent values, got {}", extent.len()),
            ));
        }
        if let Some(bad) = extent.iter().find(|e| !(e.is_finite() && **e > 0.0)) {
            return Err(ConfigError::invalid(
                "extent",
                format!("extent values must be positive and finite, got {bad}"),
            ));
        }
        Ok(Self {
            dim,
            extent: SpaceVec::from_slice(extent),
            periodic,
        })
    }

    /// The non-periodic unit square.
    pub fn default_2d() -> Self {
        Self {
            dim: 2,
            extent: smallvec![1.0, 1.0],
            periodic: false,
        }
    }

    /// Build a space from its config node.
    ///
    /// `periodic` is required. `extent` defaults to 1.0 along every axis;
    /// `dim` is inferred from `extent` if given, and is 2 otherwise.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        if !cfg.contains("periodic") {
            return Err(cfg.missing("periodic", "space configuration parameter"));
        }
        let periodic: bool = cfg.get_as("periodic")?;
        let extent = if cfg.contains("extent") {
            Some(cfg.get_as_space_vec("extent")?)
        } else {
            None
        };
        let dim: usize = match (&extent, cfg.contains("dim")) {
            (_, true) => cfg.get_as("dim")?,
            (Some(e), false) => e.len(),
            (None, false) => 2,
        };
        let extent = extent.unwrap_or_else(|| smallvec![1.0; dim]);
        Self::new(dim, &extent, periodic)
    }

    /// Number of spatial dimensions.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Extent along each axis.
    pub fn extent(&self) -> &[f64] {
        &self.extent
    }

    /// Whether every axis wraps around.
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// The neighbor topology implied by periodicity.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        if self.periodic {
            EdgeBehavior::Wrap
        } else {
            EdgeBehavior::Absorb
        }
    }

    /// Whether `pos` lies in the closed box `[0, extent]`.
    ///
    /// Vectors of the wrong length are never contained.
    pub fn contains(&self, pos: &[f64]) -> bool {
        pos.len() == self.dim
            && pos
                .iter()
                .zip(&self.extent)
                .all(|(p, e)| *p >= 0.0 && *p <= *e)
    }

    /// Wrap `pos` into `[0, extent)` along every axis.
    ///
    /// Only meaningful for periodic spaces; non-periodic callers should
    /// check [`contains`](Self::contains) instead.
    pub fn map_into_space(&self, pos: &[f64]) -> SpaceVec {
        pos.iter()
            .zip(&self.extent)
            .map(|(p, e)| p.rem_euclid(*e))
            .collect()
    }

    /// Product of the extents.
    pub fn volume(&self) -> f64 {
        self.extent.iter().product()
    }
}
