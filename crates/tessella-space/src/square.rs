//! Rectangular grids with exactly square (cubic) cells.

use std::collections::BTreeSet;
use std::sync::Arc;

use smallvec::smallvec;
use tessella_core::{CellId, Config, ConfigError, MultiIndex, NeighborIds, SpaceVec};

use crate::boundary::BoundarySelect;
use crate::edge::EdgeBehavior;
use crate::error::GridError;
use crate::grid::{
    check_pos_dim, id_from_midx, midx_from_id, rectangular_boundary, select_boundary, Grid,
    GridStructure,
};
use crate::neighborhood::{moore_offsets, von_neumann_offsets, NbFunc, NbMode, NbParams, Offset};
use crate::space::Space;

/// Relative tolerance for the per-axis cell sizes to count as equal.
const SQUARE_TOLERANCE: f64 = 1e-10;

/// A grid of equally sized square cells in 1, 2 or 3 dimensions.
///
/// The shape follows from the resolution: along each axis the space is
/// divided into `round(extent * resolution)` cells, and all axes must
/// end up with the same cell size.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tessella_space::{Grid, NbMode, NbParams, Space, SquareGrid};
/// use tessella_core::CellId;
///
/// let space = Arc::new(Space::new(2, &[4.0, 8.0], true).unwrap());
/// let grid = SquareGrid::new(space, 1).unwrap();
/// assert_eq!(grid.shape().as_slice(), &[4, 8]);
///
/// let nb = grid.neighbors_of(CellId(0), NbMode::VonNeumann, NbParams::default()).unwrap();
/// assert_eq!(nb.as_slice(), &[CellId(3), CellId(1), CellId(28), CellId(4)]);
/// ```
#[derive(Clone, Debug)]
pub struct SquareGrid {
    space: Arc<Space>,
    resolution: usize,
    shape: MultiIndex,
    cell_extent: SpaceVec,
}

impl SquareGrid {
    /// Discretize `space` with `resolution` cells per unit length.
    pub fn new(space: Arc<Space>, resolution: usize) -> Result<Self, GridError> {
        if resolution < 1 {
            return Err(resolution_too_small().into());
        }
        let shape: MultiIndex = space
            .extent()
            .iter()
            .map(|e| (e * resolution as f64).round() as usize)
            .collect();
        let cell_extent: SpaceVec = space
            .extent()
            .iter()
            .zip(&shape)
            .map(|(e, n)| e / *n as f64)
            .collect();

        let first = cell_extent[0];
        let square = shape.iter().all(|n| *n > 0)
            && cell_extent
                .iter()
                .all(|c| ((c - first) / first).abs() <= SQUARE_TOLERANCE);
        if !square {
            return Err(ConfigError::invalid(
                "resolution",
                "Given the extent of the physical space and the specified \
                 resolution, a mapping with exactly square cells could not be \
                 found! Change the extent of the physical space or the resolution.",
            )
            .into());
        }

        Ok(Self {
            space,
            resolution,
            shape,
            cell_extent,
        })
    }

    /// Build from a `grid` config node; `resolution` is required.
    pub fn from_config(space: Arc<Space>, cfg: &Config) -> Result<Self, GridError> {
        let resolution = read_resolution(cfg)?;
        Self::new(space, resolution)
    }

    fn offsets(&self, mode: NbMode, params: NbParams) -> Result<Vec<Offset>, GridError> {
        let dim = self.space.dim();
        match mode {
            NbMode::Empty => Ok(Vec::new()),
            NbMode::VonNeumann => Ok(von_neumann_offsets(dim, params.distance)),
            NbMode::Moore => Ok(moore_offsets(dim, params.distance)),
            NbMode::Hexagonal => Err(GridError::UnsupportedNeighborhood {
                mode: mode.as_str().into(),
                grid: "SquareGrid",
            }),
        }
    }
}

/// Read and validate the `resolution` entry of a grid config node.
pub(crate) fn read_resolution(cfg: &Config) -> Result<usize, GridError> {
    if !cfg.contains("resolution") {
        return Err(ConfigError::missing("resolution", "grid configuration parameter").into());
    }
    let resolution: i64 = cfg.get_as("resolution")?;
    if resolution < 1 {
        return Err(resolution_too_small().into());
    }
    Ok(resolution as usize)
}

pub(crate) fn resolution_too_small() -> ConfigError {
    ConfigError::invalid(
        "resolution",
        "Grid resolution needs to be a positive integer, was < 1!",
    )
}

impl Grid for SquareGrid {
    fn space(&self) -> &Arc<Space> {
        &self.space
    }

    fn structure(&self) -> GridStructure {
        GridStructure::Square
    }

    fn resolution(&self) -> usize {
        self.resolution
    }

    fn shape(&self) -> MultiIndex {
        self.shape.clone()
    }

    fn num_cells(&self) -> Result<usize, GridError> {
        Ok(self.shape.iter().product())
    }

    fn effective_resolution(&self) -> SpaceVec {
        self.shape
            .iter()
            .zip(self.space.extent())
            .map(|(n, e)| *n as f64 / e)
            .collect()
    }

    fn midx_of(&self, id: CellId) -> Result<MultiIndex, GridError> {
        Ok(midx_from_id(id.0, &self.shape))
    }

    fn barycenter_of(&self, id: CellId) -> Result<SpaceVec, GridError> {
        let midx = midx_from_id(id.0, &self.shape);
        Ok(midx
            .iter()
            .zip(&self.cell_extent)
            .map(|(i, c)| (*i as f64 + 0.5) * c)
            .collect())
    }

    fn extent_of(&self, _id: CellId) -> Result<SpaceVec, GridError> {
        Ok(self.cell_extent.clone())
    }

    fn vertices_of(&self, id: CellId) -> Result<Vec<SpaceVec>, GridError> {
        let midx = midx_from_id(id.0, &self.shape);
        let low: SpaceVec = midx
            .iter()
            .zip(&self.cell_extent)
            .map(|(i, c)| *i as f64 * c)
            .collect();
        let c = &self.cell_extent;
        let corner = |d: &[f64]| -> SpaceVec {
            low.iter().zip(d).zip(c).map(|((l, d), c)| l + d * c).collect()
        };
        let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        Ok(match self.space.dim() {
            1 => vec![corner(&[0.0]), corner(&[1.0])],
            2 => square.iter().map(|d| corner(d)).collect(),
            _ => [0.0, 1.0]
                .iter()
                .flat_map(|z| square.iter().map(move |[x, y]| [*x, *y, *z]))
                .map(|d| corner(&d))
                .collect(),
        })
    }

    fn cell_at(&self, pos: &[f64]) -> Result<CellId, GridError> {
        check_pos_dim(&self.space, pos)?;
        let pos: SpaceVec = if self.space.is_periodic() {
            self.space.map_into_space(pos)
        } else if self.space.contains(pos) {
            SpaceVec::from_slice(pos)
        } else {
            return Err(GridError::OutsideSpace {
                pos: SpaceVec::from_slice(pos),
                extent: SpaceVec::from_slice(self.space.extent()),
            });
        };
        let midx: MultiIndex = pos
            .iter()
            .zip(&self.cell_extent)
            .zip(&self.shape)
            .map(|((p, c), n)| ((p / c).floor().max(0.0) as usize).min(n - 1))
            .collect();
        Ok(CellId(id_from_midx(&midx, &self.shape)))
    }

    fn boundary_cells(&self, select: BoundarySelect) -> Result<BTreeSet<CellId>, GridError> {
        select_boundary(self.space.is_periodic(), self.space.dim(), select, |s| {
            rectangular_boundary(&self.shape, s)
        })
    }

    fn nb_func(&self, mode: NbMode, params: NbParams) -> Result<NbFunc, GridError> {
        let offsets = self.offsets(mode, params)?;
        if offsets.is_empty() {
            return Ok(Arc::new(|_: CellId| NeighborIds::new()));
        }
        let shape = self.shape.clone();
        let edge = self.space.edge_behavior();
        Ok(Arc::new(move |id: CellId| {
            kernel_neighbors(id, &shape, edge, &offsets)
        }))
    }

    fn expected_num_neighbors(&self, mode: NbMode, params: NbParams) -> Result<usize, GridError> {
        Ok(self.offsets(mode, params)?.len())
    }
}

/// Apply an offset kernel to a cell, resolving each axis under `edge`.
fn kernel_neighbors(
    id: CellId,
    shape: &[usize],
    edge: EdgeBehavior,
    offsets: &[Offset],
) -> NeighborIds {
    let root = midx_from_id(id.0, shape);
    let mut out = NeighborIds::new();
    let mut midx: MultiIndex = smallvec![0; shape.len()];
    'offsets: for off in offsets {
        for axis in 0..shape.len() {
            match edge.resolve(root[axis] as i64 + off[axis], shape[axis]) {
                Some(i) => midx[axis] = i,
                None => continue 'offsets,
            }
        }
        out.push(CellId(id_from_midx(&midx, shape)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    fn grid(extent: &[f64], periodic: bool, resolution: usize) -> SquareGrid {
        let space = Space::new(extent.len(), extent, periodic).unwrap();
        SquareGrid::new(Arc::new(space), resolution).unwrap()
    }

    fn ids(v: &[usize]) -> Vec<CellId> {
        v.iter().copied().map(CellId).collect()
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn shape_follows_resolution() {
        let g = grid(&[2.0, 3.0], false, 10);
        assert_eq!(g.shape().as_slice(), &[20, 30]);
        assert_eq!(g.num_cells().unwrap(), 600);
        assert_eq!(g.effective_resolution().as_slice(), &[10.0, 10.0]);
    }

    #[test]
    fn non_square_cells_rejected() {
        let space = Arc::new(Space::new(2, &[1.0, 1.5], false).unwrap());
        let err = SquareGrid::new(space, 1).unwrap_err();
        assert!(err
            .to_string()
            .contains("a mapping with exactly square cells could not be found"));
    }

    #[test]
    fn resolution_must_be_positive() {
        let space = Arc::new(Space::default_2d());
        let cfg = Config::from_yaml_str("resolution: 0").unwrap();
        let err = SquareGrid::from_config(space.clone(), &cfg).unwrap_err();
        assert!(err
            .to_string()
            .contains("Grid resolution needs to be a positive integer, was < 1!"));

        let err = SquareGrid::from_config(space, &Config::empty()).unwrap_err();
        assert!(err
            .to_string()
            .contains("Missing grid configuration parameter 'resolution'!"));
    }

    // ── Geometry ────────────────────────────────────────────────

    #[test]
    fn midx_axis_zero_fastest() {
        let g = grid(&[2.0, 3.0], true, 1);
        assert_eq!(g.midx_of(CellId(1)).unwrap().as_slice(), &[1, 0]);
        assert_eq!(g.midx_of(CellId(2)).unwrap().as_slice(), &[0, 1]);
    }

    #[test]
    fn barycenter_and_vertices_2d() {
        let g = grid(&[2.0, 3.0], false, 10);
        let c = g.barycenter_of(CellId(21)).unwrap();
        assert!((c[0] - 0.15).abs() < 1e-12 && (c[1] - 0.15).abs() < 1e-12);
        let v = g.vertices_of(CellId(0)).unwrap();
        let expected = [[0.0, 0.0], [0.1, 0.0], [0.1, 0.1], [0.0, 0.1]];
        assert_eq!(v.len(), 4);
        for (got, want) in v.iter().zip(expected) {
            assert!((got[0] - want[0]).abs() < 1e-12 && (got[1] - want[1]).abs() < 1e-12);
        }
    }

    #[test]
    fn vertices_3d_bottom_then_top() {
        let g = grid(&[1.0, 1.0, 1.0], false, 1);
        let v = g.vertices_of(CellId(0)).unwrap();
        assert_eq!(v.len(), 8);
        assert_eq!(v[0].as_slice(), &[0.0, 0.0, 0.0]);
        assert_eq!(v[2].as_slice(), &[1.0, 1.0, 0.0]);
        assert_eq!(v[4].as_slice(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn cell_at_high_boundary_and_outside() {
        let g = grid(&[2.0, 3.0], false, 1);
        assert_eq!(g.cell_at(&[2.0, 3.0]).unwrap(), CellId(5));
        assert_eq!(g.cell_at(&[0.0, 0.0]).unwrap(), CellId(0));
        let err = g.cell_at(&[2.0001, 3.0001]).unwrap_err();
        assert!(err
            .to_string()
            .contains("is outside the non-periodic space"));
        assert!(g.cell_at(&[-0.0001, 0.0001]).is_err());
        assert!(matches!(
            g.cell_at(&[1.0]),
            Err(GridError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn cell_at_periodic_wraps() {
        let g = grid(&[2.0, 3.0], true, 1);
        assert_eq!(g.cell_at(&[2.5, 0.5]).unwrap(), CellId(0));
        assert_eq!(g.cell_at(&[-0.5, -0.5]).unwrap(), CellId(5));
        assert_eq!(g.cell_at(&[2.0, 3.0]).unwrap(), CellId(0));
    }

    // ── Boundaries ──────────────────────────────────────────────

    #[test]
    fn boundary_periodic_is_empty() {
        let g = grid(&[2.0, 3.0], true, 10);
        assert!(g.boundary_cells(BoundarySelect::All).unwrap().is_empty());
        assert!(g.boundary_cells_by_name("left").unwrap().is_empty());
        assert!(g.boundary_cells_by_name("not a valid argument").is_err());
    }

    #[test]
    fn boundary_non_periodic_2d() {
        let g = grid(&[2.0, 3.0], false, 10);
        let all = g.boundary_cells(BoundarySelect::All).unwrap();
        assert_eq!(all.len(), 2 * 20 + 2 * 30 - 4);
        let bottom = g.boundary_cells(BoundarySelect::Bottom).unwrap();
        assert_eq!(bottom.first(), Some(&CellId(0)));
        assert_eq!(bottom.last(), Some(&CellId(19)));
        let top = g.boundary_cells(BoundarySelect::Top).unwrap();
        assert_eq!(top.first(), Some(&CellId(20 * 29)));
        let left = g.boundary_cells(BoundarySelect::Left).unwrap();
        assert!(left.contains(&CellId(560)));
        assert_eq!(left.last(), Some(&CellId(580)));
        let right = g.boundary_cells(BoundarySelect::Right).unwrap();
        assert!(right.contains(&CellId(539)));
        assert!(g.boundary_cells(BoundarySelect::Front).is_err());
    }

    // ── Neighborhoods ───────────────────────────────────────────

    #[test]
    fn von_neumann_periodic_order() {
        let g = grid(&[4.0, 8.0], true, 1);
        let nb = g
            .neighbors_of(CellId(9), NbMode::VonNeumann, NbParams::default())
            .unwrap();
        assert_eq!(nb.to_vec(), ids(&[8, 10, 5, 13]));
    }

    #[test]
    fn von_neumann_non_periodic_corner() {
        let g = grid(&[4.0, 8.0], false, 1);
        let nb = g
            .neighbors_of(CellId(0), NbMode::VonNeumann, NbParams::default())
            .unwrap();
        assert_eq!(nb.to_vec(), ids(&[1, 4]));
        let nb = g
            .neighbors_of(CellId(31), NbMode::Moore, NbParams::default())
            .unwrap();
        assert_eq!(nb.to_vec(), ids(&[26, 30, 27]));
    }

    #[test]
    fn moore_periodic_wraps_corner() {
        let g = grid(&[4.0, 8.0], true, 1);
        let mut nb = g
            .neighbors_of(CellId(0), NbMode::Moore, NbParams::default())
            .unwrap()
            .to_vec();
        nb.sort();
        assert_eq!(nb, ids(&[1, 3, 4, 5, 7, 28, 29, 31]));
    }

    #[test]
    fn tiny_periodic_grid_keeps_duplicates() {
        let g = grid(&[1.0], true, 1);
        let nb = g
            .neighbors_of(CellId(0), NbMode::VonNeumann, NbParams::default())
            .unwrap();
        assert_eq!(nb.to_vec(), ids(&[0, 0]));
    }

    #[test]
    fn hexagonal_mode_unsupported() {
        let g = grid(&[4.0, 8.0], true, 1);
        let err = g.nb_func(NbMode::Hexagonal, NbParams::default()).err().unwrap();
        assert_eq!(
            err.to_string(),
            "No 'hexagonal' neighborhood available for SquareGrid!"
        );
    }

    #[test]
    fn compliance_periodic_and_bounded() {
        for periodic in [true, false] {
            compliance::run_full_compliance(&grid(&[3.0], periodic, 2));
            compliance::run_full_compliance(&grid(&[4.0, 8.0], periodic, 1));
            compliance::run_full_compliance(&grid(&[2.0, 3.0, 2.0], periodic, 1));
        }
    }

    proptest! {
        #[test]
        fn periodic_neighborhood_sizes(
            dim in 1usize..=3,
            n in 3usize..6,
            d in 1usize..=2,
        ) {
            // Shapes of at least 2d+1 avoid wrap-around duplicates.
            let n = n.max(2 * d + 1);
            let extent = vec![n as f64; dim];
            let g = grid(&extent, true, 1);
            let params = NbParams { distance: d };
            let vn = g.nb_func(NbMode::VonNeumann, params).unwrap();
            let moore = g.nb_func(NbMode::Moore, params).unwrap();
            for id in 0..g.num_cells().unwrap() {
                prop_assert_eq!(moore(CellId(id)).len(), (2 * d + 1).pow(dim as u32) - 1);
                if d == 1 {
                    prop_assert_eq!(vn(CellId(id)).len(), 2 * dim);
                }
            }
        }

        #[test]
        fn cell_at_inverts_barycenter(
            sx in 1usize..8,
            sy in 1usize..8,
            periodic in any::<bool>(),
        ) {
            let g = grid(&[sx as f64, sy as f64], periodic, 1);
            for id in 0..g.num_cells().unwrap() {
                let c = g.barycenter_of(CellId(id)).unwrap();
                prop_assert_eq!(g.cell_at(&c).unwrap(), CellId(id));
            }
        }
    }
}
