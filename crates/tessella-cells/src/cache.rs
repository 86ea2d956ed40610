//! Precomputed neighbor lists in a single flat arena.

use tessella_core::CellId;
use tessella_space::NbFunc;

/// Neighbor IDs of every cell, stored contiguously.
///
/// Cell `i`'s neighbors are `ids[starts[i]..starts[i + 1]]`, in the
/// order the neighborhood function produced them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborCache {
    starts: Vec<usize>,
    ids: Vec<CellId>,
}

impl NeighborCache {
    /// Evaluate `nb` for cells `0..num_cells` and store the results.
    pub fn build(num_cells: usize, nb: &NbFunc) -> Self {
        let mut starts = Vec::with_capacity(num_cells + 1);
        let mut ids = Vec::new();
        starts.push(0);
        for i in 0..num_cells {
            ids.extend(nb(CellId(i)));
            starts.push(ids.len());
        }
        Self { starts, ids }
    }

    /// Neighbors of `id`; empty for IDs outside the cache.
    pub fn get(&self, id: CellId) -> &[CellId] {
        match (self.starts.get(id.index()), self.starts.get(id.index() + 1)) {
            (Some(&lo), Some(&hi)) => &self.ids[lo..hi],
            _ => &[],
        }
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.starts.len().saturating_sub(1)
    }

    /// Whether the cache covers no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of stored neighbor IDs.
    pub fn num_links(&self) -> usize {
        self.ids.len()
    }
}
