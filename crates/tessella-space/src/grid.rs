//! The `Grid` trait and grid construction from configuration.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tessella_core::{CellId, Config, ConfigError, MultiIndex, NeighborIds, SpaceVec};
use tracing::info;

use crate::boundary::BoundarySelect;
use crate::error::GridError;
use crate::hexagonal::HexagonalGrid;
use crate::neighborhood::{NbFunc, NbMode, NbParams};
use crate::space::Space;
use crate::square::SquareGrid;
use crate::triangular::TriangularGrid;

/// The discretization variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridStructure {
    /// Hyper-rectangular cells.
    Square,
    /// Pointy-top hexagons.
    Hexagonal,
    /// Triangles (placeholder).
    Triangular,
}

impl GridStructure {
    /// Names accepted in the `structure` config entry.
    pub const NAMES: [&'static str; 3] = ["square", "hexagonal", "triangular"];

    /// The configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Hexagonal => "hexagonal",
            Self::Triangular => "triangular",
        }
    }
}

impl fmt::Display for GridStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridStructure {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(Self::Square),
            "hexagonal" => Ok(Self::Hexagonal),
            "triangular" => Ok(Self::Triangular),
            other => Err(ConfigError::UnknownVariant {
                key: "structure".into(),
                value: other.into(),
                allowed: Self::NAMES.to_vec(),
            }),
        }
    }
}

/// A discretization of a [`Space`] into cells.
///
/// Cell IDs are dense, `0..num_cells()`. Geometric queries take an ID
/// and do not check bounds: results for IDs outside the grid are
/// meaningless but do not panic.
///
/// Grids are shared as `Arc<dyn Grid>` between a cell manager and the
/// neighborhood functions it hands out, hence `Send + Sync`.
pub trait Grid: fmt::Debug + Send + Sync {
    /// The space this grid discretizes.
    fn space(&self) -> &Arc<Space>;

    /// The discretization variant.
    fn structure(&self) -> GridStructure;

    /// The configured resolution, in cells per unit length.
    fn resolution(&self) -> usize;

    /// Number of cells along each axis.
    fn shape(&self) -> MultiIndex;

    /// Total number of cells.
    fn num_cells(&self) -> Result<usize, GridError>;

    /// Cells per unit length along each axis, after the integer rounding
    /// of the shape.
    fn effective_resolution(&self) -> SpaceVec;

    /// Multi-index of a cell; axis 0 varies fastest.
    fn midx_of(&self, id: CellId) -> Result<MultiIndex, GridError>;

    /// Center of a cell.
    fn barycenter_of(&self, id: CellId) -> Result<SpaceVec, GridError>;

    /// Size of a cell's bounding box along each axis.
    fn extent_of(&self, id: CellId) -> Result<SpaceVec, GridError>;

    /// Corners of a cell, counter-clockwise starting at the low corner.
    fn vertices_of(&self, id: CellId) -> Result<Vec<SpaceVec>, GridError>;

    /// The cell containing `pos`.
    ///
    /// Periodic grids wrap `pos` into the space first. Non-periodic grids
    /// reject positions outside `[0, extent]`; positions on the high
    /// boundary map to the boundary cell.
    fn cell_at(&self, pos: &[f64]) -> Result<CellId, GridError>;

    /// The cells at the selected boundary. Always empty for periodic grids.
    fn boundary_cells(&self, select: BoundarySelect) -> Result<BTreeSet<CellId>, GridError>;

    /// Build the neighborhood function for `mode`.
    fn nb_func(&self, mode: NbMode, params: NbParams) -> Result<NbFunc, GridError>;

    /// Neighborhood size of an interior cell (of every cell, if periodic).
    fn expected_num_neighbors(&self, mode: NbMode, params: NbParams) -> Result<usize, GridError>;

    /// Whether the underlying space is periodic.
    fn is_periodic(&self) -> bool {
        self.space().is_periodic()
    }

    /// Boundary cells, selected by name (`"all"`, `"left"`, ...).
    ///
    /// An unknown name is an error even for periodic grids.
    fn boundary_cells_by_name(&self, select: &str) -> Result<BTreeSet<CellId>, GridError> {
        let select: BoundarySelect = select.parse()?;
        self.boundary_cells(select)
    }

    /// Neighbors of a single cell, computed on demand.
    fn neighbors_of(
        &self,
        id: CellId,
        mode: NbMode,
        params: NbParams,
    ) -> Result<NeighborIds, GridError> {
        let f = self.nb_func(mode, params)?;
        Ok(f(id))
    }
}

/// Create the grid described by a `grid` config node over `space`.
///
/// The `structure` entry selects the variant; the remaining entries
/// are read by the variant's constructor.
pub fn create_grid(space: Arc<Space>, cfg: &Config) -> Result<Arc<dyn Grid>, GridError> {
    if !cfg.contains("structure") {
        return Err(cfg.missing("structure", "grid configuration parameter").into());
    }
    let structure: String = cfg.get_as("structure")?;
    let structure: GridStructure = structure.parse()?;

    let grid: Arc<dyn Grid> = match structure {
        GridStructure::Square => Arc::new(SquareGrid::from_config(space, cfg)?),
        GridStructure::Hexagonal => Arc::new(HexagonalGrid::from_config(space, cfg)?),
        GridStructure::Triangular => Arc::new(TriangularGrid::from_config(space, cfg)?),
    };
    info!(
        structure = %structure,
        shape = ?grid.shape().as_slice(),
        periodic = grid.is_periodic(),
        "grid set up"
    );
    Ok(grid)
}

// ── Index arithmetic shared by rectangular layouts ─────────────────

/// Multi-index of `id` in a grid of `shape`, axis 0 fastest.
pub(crate) fn midx_from_id(id: usize, shape: &[usize]) -> MultiIndex {
    let mut rest = id;
    shape
        .iter()
        .map(|&n| {
            let i = if n == 0 { 0 } else { rest % n };
            rest = if n == 0 { 0 } else { rest / n };
            i
        })
        .collect()
}

/// Cell ID of a multi-index in a grid of `shape`, axis 0 fastest.
pub(crate) fn id_from_midx(midx: &[usize], shape: &[usize]) -> usize {
    midx.iter()
        .zip(shape)
        .rev()
        .fold(0, |acc, (&i, &n)| acc * n + i)
}

/// Boundary cells of a rectangular index layout.
pub(crate) fn rectangular_boundary(shape: &[usize], select: BoundarySelect) -> BTreeSet<CellId> {
    let total: usize = shape.iter().product();
    let on = |midx: &MultiIndex, axis: usize, high: bool| {
        if high {
            midx[axis] + 1 == shape[axis]
        } else {
            midx[axis] == 0
        }
    };
    (0..total)
        .filter(|&id| {
            let midx = midx_from_id(id, shape);
            match select.axis_side() {
                Some((axis, high)) => on(&midx, axis, high),
                None => (0..shape.len()).any(|a| on(&midx, a, false) || on(&midx, a, true)),
            }
        })
        .map(CellId)
        .collect()
}

/// Resolve a boundary query against a grid's periodicity and
/// dimensionality, delegating to `compute` for non-periodic grids.
pub(crate) fn select_boundary(
    periodic: bool,
    dim: usize,
    select: BoundarySelect,
    compute: impl FnOnce(BoundarySelect) -> BTreeSet<CellId>,
) -> Result<BTreeSet<CellId>, GridError> {
    if periodic {
        return Ok(BTreeSet::new());
    }
    let select = select.check_dim(dim)?;
    Ok(compute(select))
}

/// Check that a position vector matches the space's dimensionality.
pub(crate) fn check_pos_dim(space: &Space, pos: &[f64]) -> Result<(), GridError> {
    if pos.len() != space.dim() {
        return Err(GridError::DimensionMismatch {
            expected: space.dim(),
            actual: pos.len(),
        });
    }
    Ok(())
}
