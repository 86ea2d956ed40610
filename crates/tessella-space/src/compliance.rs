//! Grid trait compliance test helpers.
//!
//! These functions verify that a Grid implementation satisfies the
//! invariants of the trait contract. Reused by the test modules of all
//! grid variants that implement cell queries.

use crate::grid::Grid;
use crate::neighborhood::{NbMode, NbParams};
use std::collections::BTreeSet;
use tessella_core::CellId;

/// Assert that `midx_of` is a bijection onto the shape's index box.
pub fn assert_midx_bijective(grid: &dyn Grid) {
    let shape = grid.shape();
    let n = grid.num_cells().expect("num_cells should succeed");
    let mut seen = BTreeSet::new();
    for id in 0..n {
        let midx = grid.midx_of(CellId(id)).expect("midx_of should succeed");
        assert_eq!(midx.len(), shape.len(), "midx_of({id}) has wrong length");
        for (i, s) in midx.iter().zip(&shape) {
            assert!(i < s, "midx_of({id}) = {midx:?} outside shape {shape:?}");
        }
        assert!(seen.insert(midx.clone()), "midx {midx:?} assigned twice");
    }
}

/// Assert that every barycenter lies in the space and maps back to its cell.
pub fn assert_barycenter_roundtrip(grid: &dyn Grid) {
    let n = grid.num_cells().expect("num_cells should succeed");
    for id in 0..n {
        let c = grid
            .barycenter_of(CellId(id))
            .expect("barycenter_of should succeed");
        assert!(
            grid.space().contains(&c),
            "barycenter of {id} = {c:?} outside the space"
        );
        let back = grid.cell_at(&c).expect("cell_at(barycenter) should succeed");
        assert_eq!(back, CellId(id), "cell_at(barycenter_of({id})) = {back}");
    }
}

/// Assert that every supported neighborhood yields in-range IDs, never
/// contains the cell itself on grids large enough to avoid wrap-around,
/// and is symmetric.
pub fn assert_neighborhoods_consistent(grid: &dyn Grid) {
    let n = grid.num_cells().expect("num_cells should succeed");
    for mode in NbMode::ALL {
        let Ok(nb) = grid.nb_func(mode, NbParams::default()) else {
            continue;
        };
        let all: Vec<Vec<CellId>> = (0..n).map(|id| nb(CellId(id)).to_vec()).collect();
        let large = grid.shape().iter().all(|s| *s >= 3);
        for (id, nbs) in all.iter().enumerate() {
            for other in nbs {
                assert!(other.0 < n, "{mode}: neighbor {other} of {id} out of range");
                if large {
                    assert_ne!(other.0, id, "{mode}: cell {id} is its own neighbor");
                }
                assert!(
                    all[other.0].contains(&CellId(id)),
                    "{mode}: {other} in N({id}) but {id} not in N({other})"
                );
            }
        }
    }
}

/// Assert that periodic grids give every cell the expected neighborhood size.
pub fn assert_periodic_sizes(grid: &dyn Grid) {
    if !grid.is_periodic() {
        return;
    }
    let n = grid.num_cells().expect("num_cells should succeed");
    for mode in NbMode::ALL {
        let params = NbParams::default();
        let (Ok(nb), Ok(expected)) = (
            grid.nb_func(mode, params),
            grid.expected_num_neighbors(mode, params),
        ) else {
            continue;
        };
        for id in 0..n {
            assert_eq!(nb(CellId(id)).len(), expected, "{mode}: size of N({id})");
        }
    }
}

/// Run all compliance checks on a grid.
pub fn run_full_compliance(grid: &dyn Grid) {
    assert_midx_bijective(grid);
    assert_barycenter_roundtrip(grid);
    assert_neighborhoods_consistent(grid);
    assert_periodic_sizes(grid);
}
