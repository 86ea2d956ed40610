//! Selecting subsets of cells.
//!
//! Every selection returns cell IDs; none of them changes the cells.
//! Random selections draw from the manager's RNG, so they are
//! reproducible for a fixed seed.

use std::collections::BTreeSet;

use rand::seq::index;
use rand::Rng;
use tessella_core::{CellId, Config, ConfigError, SpaceVec};
use tessella_space::BoundarySelect;
use tracing::debug;

use crate::cell::Cell;
use crate::error::{CellManagerError, SelectionError};
use crate::manager::CellManager;

/// A rule for choosing cells.
pub enum Selection<'a, S, L = ()> {
    /// Cells for which the predicate holds.
    Condition(&'a dyn Fn(&Cell<S, L>) -> bool),
    /// Exactly this many distinct cells, chosen uniformly.
    Sample(usize),
    /// Each cell independently with this probability.
    Probability(f64),
    /// The cells containing these positions, in the given order.
    Position(Vec<SpaceVec>),
    /// Boundary cells.
    Boundary(BoundarySelect),
    /// Evenly spaced vertical and horizontal lanes of cells (2D only).
    Lanes {
        /// Number of lanes of constant x.
        num_vertical: usize,
        /// Number of lanes of constant y.
        num_horizontal: usize,
    },
    /// Random seeds grown into clusters along the selected neighborhood.
    ClusteredSimple {
        /// Probability for a cell to be a seed.
        p_seed: f64,
        /// Probability for a neighbor to attach in each pass.
        p_attach: f64,
        /// Number of attachment passes.
        num_passes: usize,
    },
}

impl<S, L> Selection<'_, S, L> {
    /// Configuration names of all modes.
    pub const MODE_NAMES: &'static [&'static str] = &[
        "condition",
        "sample",
        "probability",
        "position",
        "boundary",
        "lanes",
        "clustered_simple",
    ];

    /// The configuration name of this mode.
    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Condition(_) => "condition",
            Self::Sample(_) => "sample",
            Self::Probability(_) => "probability",
            Self::Position(_) => "position",
            Self::Boundary(_) => "boundary",
            Self::Lanes { .. } => "lanes",
            Self::ClusteredSimple { .. } => "clustered_simple",
        }
    }
}

/// Select cells from `mgr`.
///
/// Results are sorted by ID, except for [`Selection::Position`], which
/// keeps the order of the given positions.
///
/// # Errors
///
/// [`SelectionError`] for invalid arguments; grid errors propagate from
/// geometric selections.
pub fn select_cells<S, L, R: Rng>(
    mgr: &mut CellManager<S, L, R>,
    selection: &Selection<'_, S, L>,
) -> Result<Vec<CellId>, CellManagerError> {
    let selected = match selection {
        Selection::Condition(pred) => mgr
            .cells()
            .iter()
            .filter(|c| pred(c))
            .map(Cell::id)
            .collect(),
        Selection::Sample(n) => sample(mgr, *n)?,
        Selection::Probability(p) => with_probability(mgr, *p, "probability")?,
        Selection::Position(positions) => positions
            .iter()
            .map(|pos| mgr.cell_at(pos))
            .collect::<Result<_, _>>()?,
        Selection::Boundary(select) => mgr.boundary_cells(*select)?,
        Selection::Lanes {
            num_vertical,
            num_horizontal,
        } => lanes(mgr, *num_vertical, *num_horizontal)?,
        Selection::ClusteredSimple {
            p_seed,
            p_attach,
            num_passes,
        } => clustered_simple(mgr, *p_seed, *p_attach, *num_passes)?,
    };
    debug!(
        mode = selection.mode_name(),
        num_selected = selected.len(),
        "selected cells"
    );
    Ok(selected)
}

/// Select cells as described by a config node.
///
/// `mode` names the selection; the remaining entries are its
/// parameters: `num_cells`, `probability`, `positions`, `boundary`,
/// `num_vertical` and `num_horizontal`, or `p_seed`, `p_attach` and
/// `num_passes`. The `condition` mode cannot be configured.
pub fn select_cells_from_config<S, L, R: Rng>(
    mgr: &mut CellManager<S, L, R>,
    cfg: &Config,
) -> Result<Vec<CellId>, CellManagerError> {
    let mode: String = required(cfg, "mode")?;
    let selection: Selection<'_, S, L> = match mode.as_str() {
        "condition" => return Err(SelectionError::NotFromConfig { mode }.into()),
        "sample" => Selection::Sample(required(cfg, "num_cells")?),
        "probability" => Selection::Probability(required(cfg, "probability")?),
        "position" => {
            let positions: Vec<Vec<f64>> = required(cfg, "positions")?;
            Selection::Position(positions.into_iter().map(SpaceVec::from_vec).collect())
        }
        "boundary" => {
            let select: String = required(cfg, "boundary")?;
            Selection::Boundary(select.parse()?)
        }
        "lanes" => Selection::Lanes {
            num_vertical: required(cfg, "num_vertical")?,
            num_horizontal: required(cfg, "num_horizontal")?,
        },
        "clustered_simple" => Selection::ClusteredSimple {
            p_seed: required(cfg, "p_seed")?,
            p_attach: required(cfg, "p_attach")?,
            num_passes: required(cfg, "num_passes")?,
        },
        _ => {
            return Err(ConfigError::UnknownVariant {
                key: "mode".into(),
                value: mode,
                allowed: Selection::<S, L>::MODE_NAMES.to_vec(),
            }
            .into())
        }
    };
    select_cells(mgr, &selection)
}

fn required<T: serde::de::DeserializeOwned>(cfg: &Config, key: &str) -> Result<T, ConfigError> {
    if !cfg.contains(key) {
        return Err(cfg.missing(key, "selection parameter"));
    }
    cfg.get_as(key)
}

// ── Modes ──────────────────────────────────────────────────────────

fn sample<S, L, R: Rng>(
    mgr: &mut CellManager<S, L, R>,
    n: usize,
) -> Result<Vec<CellId>, SelectionError> {
    let available = mgr.len();
    if n > available {
        return Err(SelectionError::SampleTooLarge {
            requested: n,
            available,
        });
    }
    let mut picked = index::sample(mgr.rng_mut(), available, n).into_vec();
    picked.sort_unstable();
    Ok(picked.into_iter().map(CellId).collect())
}

fn check_probability(name: &'static str, value: f64) -> Result<(), SelectionError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SelectionError::ProbabilityOutOfRange { name, value })
    }
}

fn with_probability<S, L, R: Rng>(
    mgr: &mut CellManager<S, L, R>,
    p: f64,
    name: &'static str,
) -> Result<Vec<CellId>, SelectionError> {
    check_probability(name, p)?;
    let n = mgr.len();
    if p == 0.0 {
        return Ok(Vec::new());
    }
    if p == 1.0 {
        return Ok((0..n).map(CellId).collect());
    }
    let rng = mgr.rng_mut();
    Ok((0..n).filter(|_| rng.gen::<f64>() < p).map(CellId).collect())
}

fn lanes<S, L, R>(
    mgr: &CellManager<S, L, R>,
    num_vertical: usize,
    num_horizontal: usize,
) -> Result<Vec<CellId>, CellManagerError> {
    let space = mgr.space();
    if space.dim() != 2 {
        return Err(SelectionError::UnsupportedDimension {
            mode: "lanes",
            dim: space.dim(),
        }
        .into());
    }
    let shape = mgr.grid().shape();
    if num_vertical >= shape[0] || num_horizontal >= shape[1] {
        return Err(SelectionError::TooManyLanes {
            requested: (num_vertical, num_horizontal),
            shape: (shape[0], shape[1]),
        }
        .into());
    }

    let periodic = space.is_periodic();
    let extent = space.extent();
    let lane_positions = |n: usize, len: f64| -> Vec<f64> {
        if periodic {
            let step = len / n as f64;
            (0..n).map(|i| i as f64 * step).collect()
        } else {
            let step = len / (n + 1) as f64;
            (1..=n).map(|i| i as f64 * step).collect()
        }
    };

    let mut columns = BTreeSet::new();
    for x in lane_positions(num_vertical, extent[0]) {
        columns.insert(mgr.midx_of(mgr.cell_at(&[x, 0.0])?)?[0]);
    }
    let mut rows = BTreeSet::new();
    for y in lane_positions(num_horizontal, extent[1]) {
        rows.insert(mgr.midx_of(mgr.cell_at(&[0.0, y])?)?[1]);
    }

    let mut selected = Vec::new();
    for cell in mgr.cells() {
        let midx = mgr.midx_of(cell.id())?;
        if columns.contains(&midx[0]) || rows.contains(&midx[1]) {
            selected.push(cell.id());
        }
    }
    Ok(selected)
}

fn clustered_simple<S, L, R: Rng>(
    mgr: &mut CellManager<S, L, R>,
    p_seed: f64,
    p_attach: f64,
    num_passes: usize,
) -> Result<Vec<CellId>, SelectionError> {
    check_probability("p_attach", p_attach)?;
    let mut selected: BTreeSet<CellId> = with_probability(mgr, p_seed, "p_seed")?
        .into_iter()
        .collect();

    for _ in 0..num_passes {
        let candidates: Vec<CellId> = selected
            .iter()
            .flat_map(|&id| mgr.neighbor_ids(id).into_owned())
            .collect();
        let rng = mgr.rng_mut();
        for nb in candidates {
            if rng.gen::<f64>() < p_attach {
                selected.insert(nb);
            }
        }
    }
    Ok(selected.into_iter().collect())
}
