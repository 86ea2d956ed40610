//! Strongly-typed cell identifiers and the vector aliases used for
//! grid geometry.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a cell within a cell manager.
///
/// Cell IDs are dense and zero-based: `CellId(n)` is the n-th cell in
/// the manager's cell container. The ID doubles as the array position,
/// which the neighbor cache and every grid query rely on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub usize);

impl CellId {
    /// The position of this cell in the manager's container.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for CellId {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

impl From<CellId> for usize {
    fn from(id: CellId) -> Self {
        id.0
    }
}

/// A multi-index into a grid, one entry per spatial dimension.
///
/// Uses `SmallVec<[usize; 3]>` so that 1D, 2D and 3D grids never touch
/// the heap for index arithmetic.
pub type MultiIndex = SmallVec<[usize; 3]>;

/// A vector in physical space (positions, extents, resolutions).
pub type SpaceVec = SmallVec<[f64; 3]>;

/// An ordered sequence of neighbor cell IDs.
///
/// Eight inline slots cover von Neumann neighborhoods in all supported
/// dimensionalities and the 2D Moore neighborhood; larger kernels spill
/// to the heap transparently.
pub type NeighborIds = SmallVec<[CellId; 8]>;
