//! Placeholder for triangular grids.

use std::collections::BTreeSet;
use std::sync::Arc;

use smallvec::smallvec;
use tessella_core::{CellId, Config, MultiIndex, NeighborIds, SpaceVec};

use crate::boundary::BoundarySelect;
use crate::error::GridError;
use crate::grid::{Grid, GridStructure};
use crate::neighborhood::{NbFunc, NbMode, NbParams};
use crate::space::Space;
use crate::square::{read_resolution, resolution_too_small};

const NAME: &str = "TriangularGrid";

/// A triangular discretization that is not implemented yet.
///
/// Construction validates the resolution and succeeds, so configurations
/// naming `triangular` parse. Shape and effective resolution are all
/// zeros; every cell query returns [`GridError::NotImplemented`], which
/// makes cell managers over this grid fail at construction.
#[derive(Clone, Debug)]
pub struct TriangularGrid {
    space: Arc<Space>,
    resolution: usize,
}

impl TriangularGrid {
    /// Create the placeholder grid.
    pub fn new(space: Arc<Space>, resolution: usize) -> Result<Self, GridError> {
        if resolution < 1 {
            return Err(resolution_too_small().into());
        }
        Ok(Self { space, resolution })
    }

    /// Build from a `grid` config node; `resolution` is required.
    pub fn from_config(space: Arc<Space>, cfg: &Config) -> Result<Self, GridError> {
        Self::new(space, read_resolution(cfg)?)
    }
}

fn not_implemented(method: &'static str) -> GridError {
    GridError::NotImplemented { grid: NAME, method }
}

impl Grid for TriangularGrid {
    fn space(&self) -> &Arc<Space> {
        &self.space
    }

    fn structure(&self) -> GridStructure {
        GridStructure::Triangular
    }

    fn resolution(&self) -> usize {
        self.resolution
    }

    fn shape(&self) -> MultiIndex {
        smallvec![0; self.space.dim()]
    }

    fn num_cells(&self) -> Result<usize, GridError> {
        Err(not_implemented("num_cells"))
    }

    fn effective_resolution(&self) -> SpaceVec {
        smallvec![0.0; self.space.dim()]
    }

    fn midx_of(&self, _id: CellId) -> Result<MultiIndex, GridError> {
        Err(not_implemented("midx_of"))
    }

    fn barycenter_of(&self, _id: CellId) -> Result<SpaceVec, GridError> {
        Err(not_implemented("barycenter_of"))
    }

    fn extent_of(&self, _id: CellId) -> Result<SpaceVec, GridError> {
        Err(not_implemented("extent_of"))
    }

    fn vertices_of(&self, _id: CellId) -> Result<Vec<SpaceVec>, GridError> {
        Err(not_implemented("vertices_of"))
    }

    fn cell_at(&self, _pos: &[f64]) -> Result<CellId, GridError> {
        Err(not_implemented("cell_at"))
    }

    fn boundary_cells(&self, _select: BoundarySelect) -> Result<BTreeSet<CellId>, GridError> {
        Err(not_implemented("boundary_cells"))
    }

    fn nb_func(&self, mode: NbMode, _params: NbParams) -> Result<NbFunc, GridError> {
        match mode {
            NbMode::Empty => Ok(Arc::new(|_: CellId| NeighborIds::new())),
            _ => Err(GridError::UnsupportedNeighborhood {
                mode: mode.as_str().into(),
                grid: NAME,
            }),
        }
    }

    fn expected_num_neighbors(&self, mode: NbMode, params: NbParams) -> Result<usize, GridError> {
        self.nb_func(mode, params).map(|_| 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> TriangularGrid {
        TriangularGrid::new(Arc::new(Space::default_2d()), 4).unwrap()
    }

    #[test]
    fn constructs_with_placeholder_shape() {
        let g = grid();
        assert_eq!(g.structure(), GridStructure::Triangular);
        assert_eq!(g.shape().as_slice(), &[0, 0]);
        assert_eq!(g.effective_resolution().as_slice(), &[0.0, 0.0]);
        assert_eq!(g.resolution(), 4);
    }

    #[test]
    fn cell_queries_not_implemented() {
        let g = grid();
        assert_eq!(
            g.num_cells(),
            Err(GridError::NotImplemented {
                grid: "TriangularGrid",
                method: "num_cells"
            })
        );
        assert!(g.midx_of(CellId(0)).is_err());
        assert!(g.barycenter_of(CellId(0)).is_err());
        assert!(g.extent_of(CellId(0)).is_err());
        assert!(g.vertices_of(CellId(0)).is_err());
        assert!(g.cell_at(&[0.5, 0.5]).is_err());
        assert!(g.boundary_cells(BoundarySelect::All).is_err());
    }

    #[test]
    fn von_neumann_names_the_grid() {
        let err = grid()
            .nb_func(NbMode::VonNeumann, NbParams::default())
            .err().unwrap();
        assert_eq!(
            err.to_string(),
            "No 'vonNeumann' neighborhood available for TriangularGrid!"
        );
        assert!(grid().nb_func(NbMode::Empty, NbParams::default()).is_ok());
    }
}
