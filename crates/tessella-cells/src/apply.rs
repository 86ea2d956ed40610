//! Applying rules to cells.
//!
//! A rule maps a cell (and a read-only view of the whole manager) to the
//! cell's next state. Rules only ever see shared references, so no rule
//! can modify a cell while the states of a step are being computed.
//!
//! * [`Update::Sync`]: every new state is computed from the states at
//!   the start of the step; all of them are then committed together.
//!   Traversal order cannot influence the result.
//! * [`Update::Async`]: each new state is committed right after it is
//!   computed, so later cells see earlier updates. With [`Shuffle::On`]
//!   the traversal order is a fresh permutation drawn from the manager's
//!   RNG.
//! * [`Update::Manual`]: use the mode of the manager's cell traits;
//!   cells built with [`Update::Manual`] traits are updated
//!   synchronously through a transient buffer.

use std::borrow::Cow;
use std::convert::Infallible;

use rand::seq::SliceRandom;
use rand::Rng;
use tessella_core::CellId;
use tracing::trace;

use crate::cell::{Cell, Update};
use crate::manager::CellManager;

/// Whether to randomize the traversal order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Shuffle {
    /// Traverse in a random order.
    #[default]
    On,
    /// Traverse in the given order.
    Off,
}

/// Apply `rule` to the cells in `target`.
///
/// IDs that do not belong to `mgr` are skipped; duplicate IDs are
/// processed as often as they occur.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use tessella_cells::{apply_rule_to_all, CellManager, CellTraits, Shuffle, Update};
/// use tessella_core::Config;
///
/// let cfg = Config::from_yaml_str("grid: { structure: square, resolution: 2 }").unwrap();
/// let mut mgr: CellManager<u32> = CellManager::with_initial_state(
///     std::sync::Arc::new(tessella_space::Space::default_2d()),
///     &cfg,
///     CellTraits::default(),
///     ChaCha8Rng::seed_from_u64(1),
///     0,
/// )
/// .unwrap();
/// apply_rule_to_all(&mut mgr, Update::Sync, Shuffle::Off, |cell, _| cell.state() + 1);
/// assert!(mgr.cells().iter().all(|c| *c.state() == 1));
/// ```
pub fn apply_rule<S, L, R, F>(
    mgr: &mut CellManager<S, L, R>,
    target: &[CellId],
    update: Update,
    shuffle: Shuffle,
    mut rule: F,
) where
    S: Clone,
    R: Rng,
    F: FnMut(&Cell<S, L>, &CellManager<S, L, R>) -> S,
{
    let outcome = try_apply_rule(mgr, target, update, shuffle, |cell, mgr| {
        Ok::<S, Infallible>(rule(cell, mgr))
    });
    match outcome {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Apply a fallible `rule` to the cells in `target`.
///
/// The first error aborts the step and is returned unchanged. In
/// synchronous mode no cell has been changed at that point; in
/// asynchronous mode the cells processed before the failure keep their
/// new states.
pub fn try_apply_rule<S, L, R, E, F>(
    mgr: &mut CellManager<S, L, R>,
    target: &[CellId],
    update: Update,
    shuffle: Shuffle,
    mut rule: F,
) -> Result<(), E>
where
    S: Clone,
    R: Rng,
    F: FnMut(&Cell<S, L>, &CellManager<S, L, R>) -> Result<S, E>,
{
    let mode = match update {
        Update::Manual => mgr.traits().update,
        explicit => explicit,
    };

    let mut order = Cow::Borrowed(target);
    if shuffle == Shuffle::On {
        order.to_mut().shuffle(mgr.rng_mut());
    }

    match mode {
        Update::Async => {
            for &id in order.iter() {
                let next = match mgr.cell(id) {
                    Some(cell) => rule(cell, &*mgr)?,
                    None => continue,
                };
                if let Some(cell) = mgr.cell_mut(id) {
                    write_now(cell, next);
                }
            }
        }
        Update::Sync | Update::Manual => {
            let mut staged = Vec::with_capacity(order.len());
            for &id in order.iter() {
                if let Some(cell) = mgr.cell(id) {
                    staged.push((id, rule(cell, &*mgr)?));
                }
            }
            for (id, next) in staged {
                if let Some(cell) = mgr.cell_mut(id) {
                    write_now(cell, next);
                }
            }
        }
    }
    trace!(num_cells = order.len(), mode = ?mode, "applied rule");
    Ok(())
}

/// Apply `rule` to every cell of `mgr`.
pub fn apply_rule_to_all<S, L, R, F>(
    mgr: &mut CellManager<S, L, R>,
    update: Update,
    shuffle: Shuffle,
    rule: F,
) where
    S: Clone,
    R: Rng,
    F: FnMut(&Cell<S, L>, &CellManager<S, L, R>) -> S,
{
    let all: Vec<CellId> = (0..mgr.len()).map(CellId).collect();
    apply_rule(mgr, &all, update, shuffle, rule);
}

/// Store `next` as the cell's state, through its staging buffer if it
/// has one, so that the buffer never lags behind the state.
fn write_now<S: Clone, L>(cell: &mut Cell<S, L>, next: S) {
    match cell.stage(next) {
        Ok(()) => cell.update(),
        Err(next) => cell.commit(next),
    }
}
