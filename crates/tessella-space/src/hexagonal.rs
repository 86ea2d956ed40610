//! Two-dimensional grids of pointy-top hexagons.
//!
//! Rows are stacked along axis 1 at a distance of three quarters of the
//! hexagon height. Even rows are shifted by half a cell width to the
//! right, so that hexagons of adjacent rows interlock.

use std::collections::BTreeSet;
use std::sync::Arc;

use smallvec::smallvec;
use tessella_core::{CellId, Config, ConfigError, MultiIndex, NeighborIds, SpaceVec};

use crate::boundary::BoundarySelect;
use crate::error::GridError;
use crate::grid::{
    check_pos_dim, id_from_midx, midx_from_id, rectangular_boundary, select_boundary, Grid,
    GridStructure,
};
use crate::neighborhood::{NbFunc, NbMode, NbParams};
use crate::space::Space;
use crate::square::{read_resolution, resolution_too_small};

/// Default relative tolerance on the row count implied by the extent.
pub const DEFAULT_ASPECT_RATIO_TOLERANCE: f64 = 0.02;

/// A grid of pointy-top hexagons.
///
/// The width of a hexagon follows from the resolution along axis 0. The
/// number of rows is the axis-1 extent divided by the row spacing of
/// regular hexagons (`0.75 * 2 / sqrt(3)` times the width), which must
/// be close to an integer (within `aspect_ratio_tolerance`). The height
/// is then stretched or squeezed so that the rows fill the extent
/// exactly. Periodic grids need an even number of rows for the offset
/// pattern to tile.
///
/// Only the `empty` neighborhood is available.
#[derive(Clone, Debug)]
pub struct HexagonalGrid {
    space: Arc<Space>,
    resolution: usize,
    shape: MultiIndex,
    width: f64,
    height: f64,
}

impl HexagonalGrid {
    /// Discretize a 2D `space` with `resolution` hexagons per unit length
    /// along axis 0.
    pub fn new(
        space: Arc<Space>,
        resolution: usize,
        aspect_ratio_tolerance: f64,
    ) -> Result<Self, GridError> {
        if space.dim() != 2 {
            return Err(ConfigError::invalid(
                "dim",
                format!(
                    "HexagonalGrid requires a 2-dimensional space, got {} dimensions",
                    space.dim()
                ),
            )
            .into());
        }
        if resolution < 1 {
            return Err(resolution_too_small().into());
        }
        let extent = space.extent();
        let cols = (extent[0] * resolution as f64).round() as usize;
        let no_mapping = || -> GridError {
            ConfigError::invalid(
                "resolution",
                "Given the extent of the physical space and the specified \
                 resolution, a mapping with hexagonal cells could not be found! \
                 Change the extent of the physical space, the resolution, or \
                 the aspect_ratio_tolerance.",
            )
            .into()
        };
        if cols == 0 {
            return Err(no_mapping());
        }
        let width = extent[0] / cols as f64;
        let regular_height = 2.0 * width / 3f64.sqrt();
        let exact_rows = extent[1] / (0.75 * regular_height);
        let rows = exact_rows.round() as usize;
        if rows == 0 || ((rows as f64 - exact_rows) / exact_rows).abs() > aspect_ratio_tolerance {
            return Err(no_mapping());
        }
        // Rows exactly fill axis 1, so every center lies inside the space.
        let height = extent[1] / (0.75 * rows as f64);
        if space.is_periodic() && rows % 2 != 0 {
            return Err(ConfigError::invalid(
                "resolution",
                format!(
                    "A periodic HexagonalGrid needs an even number of rows, \
                     the given extent and resolution yield {rows}!"
                ),
            )
            .into());
        }

        Ok(Self {
            space,
            resolution,
            shape: smallvec![cols, rows],
            width,
            height,
        })
    }

    /// Build from a `grid` config node: `resolution` is required,
    /// `aspect_ratio_tolerance` is optional.
    pub fn from_config(space: Arc<Space>, cfg: &Config) -> Result<Self, GridError> {
        let resolution = read_resolution(cfg)?;
        let tolerance =
            cfg.get_as_or("aspect_ratio_tolerance", DEFAULT_ASPECT_RATIO_TOLERANCE)?;
        Self::new(space, resolution, tolerance)
    }

    /// Center of the hexagon at (possibly out-of-range) indices `(x, y)`.
    fn center(&self, x: i64, y: i64) -> (f64, f64) {
        let shift = if y.rem_euclid(2) == 0 { 0.5 } else { 0.0 };
        (
            (x as f64 + 0.5 + shift) * self.width,
            (0.5 + 0.75 * y as f64) * self.height,
        )
    }
}

impl Grid for HexagonalGrid {
    fn space(&self) -> &Arc<Space> {
        &self.space
    }

    fn structure(&self) -> GridStructure {
        GridStructure::Hexagonal
    }

    fn resolution(&self) -> usize {
        self.resolution
    }

    fn shape(&self) -> MultiIndex {
        self.shape.clone()
    }

    /// The product of the shape. This ignores the partial hexagons at
    /// the borders of the space.
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
        let (cx, cy) = self.center(midx[0] as i64, midx[1] as i64);
        Ok(smallvec![cx, cy])
    }

    fn extent_of(&self, _id: CellId) -> Result<SpaceVec, GridError> {
        Ok(smallvec![self.width, self.height])
    }

    fn vertices_of(&self, id: CellId) -> Result<Vec<SpaceVec>, GridError> {
        let midx = midx_from_id(id.0, &self.shape);
        let (cx, cy) = self.center(midx[0] as i64, midx[1] as i64);
        let (w, h) = (self.width, self.height);
        let rel = [
            (-0.5, -0.25),
            (0.0, -0.5),
            (0.5, -0.25),
            (0.5, 0.25),
            (0.0, 0.5),
            (-0.5, 0.25),
        ];
        Ok(rel
            .iter()
            .map(|(dx, dy)| smallvec![cx + dx * w, cy + dy * h])
            .collect())
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
        let (px, py) = (pos[0], pos[1]);
        let edge = self.space.edge_behavior();

        // Nearest center among the candidates around the estimated row.
        let row = ((py / self.height - 0.5) / 0.75).round() as i64;
        let mut best: Option<(f64, CellId)> = None;
        for y in row - 1..=row + 1 {
            let shift = if y.rem_euclid(2) == 0 { 0.5 } else { 0.0 };
            let col = (px / self.width - 0.5 - shift).round() as i64;
            for x in col - 1..=col + 1 {
                let (Some(ix), Some(iy)) =
                    (edge.resolve(x, self.shape[0]), edge.resolve(y, self.shape[1]))
                else {
                    continue;
                };
                let (cx, cy) = self.center(x, y);
                let d2 = (cx - px).powi(2) + (cy - py).powi(2);
                if best.map_or(true, |(b, _)| d2 < b) {
                    best = Some((d2, CellId(id_from_midx(&[ix, iy], &self.shape))));
                }
            }
        }
        best.map(|(_, id)| id).ok_or(GridError::OutsideSpace {
            pos,
            extent: SpaceVec::from_slice(self.space.extent()),
        })
    }

    fn boundary_cells(&self, select: BoundarySelect) -> Result<BTreeSet<CellId>, GridError> {
        select_boundary(self.space.is_periodic(), 2, select, |s| {
            rectangular_boundary(&self.shape, s)
        })
    }

    fn nb_func(&self, mode: NbMode, _params: NbParams) -> Result<NbFunc, GridError> {
        match mode {
            NbMode::Empty => Ok(Arc::new(|_: CellId| NeighborIds::new())),
            _ => Err(GridError::UnsupportedNeighborhood {
                mode: mode.as_str().into(),
                grid: "HexagonalGrid",
            }),
        }
    }

    fn expected_num_neighbors(&self, mode: NbMode, params: NbParams) -> Result<usize, GridError> {
        self.nb_func(mode, params).map(|_| 0)
    }
}
