//! Construction of initial cell states.

use rand::RngCore;
use tessella_core::{Config, ConfigError};
use tracing::info;

use crate::cell::CellTraits;
use crate::error::CellManagerError;

/// A cell state type and the ways it can be constructed.
///
/// Each capability is announced by an associated const and provided by
/// the matching constructor. The cell manager picks the constructor when
/// it builds its cells:
///
/// 1. [`CellTraits::use_default_state_constructor`] forces
///    [`default_state`](Self::default_state);
/// 2. otherwise [`from_config_rng`](Self::from_config_rng), called anew
///    for every cell;
/// 3. otherwise [`from_config`](Self::from_config), called once and
///    cloned;
/// 4. otherwise [`default_state`](Self::default_state), called once and
///    cloned.
///
/// Both config constructors receive the manager's `cell_params` node.
///
/// # Examples
///
/// ```
/// use rand::{Rng, RngCore};
/// use tessella_cells::CellState;
/// use tessella_core::{Config, ConfigError};
///
/// #[derive(Clone)]
/// struct Opinion(f64);
///
/// impl CellState for Opinion {
///     const FROM_CONFIG_RNG: bool = true;
///
///     fn from_config_rng(cfg: &Config, rng: &mut dyn RngCore) -> Result<Self, ConfigError> {
///         let max: f64 = cfg.get_as("max")?;
///         Ok(Opinion(rng.gen_range(0.0..max)))
///     }
/// }
/// ```
pub trait CellState: Clone {
    /// [`from_config_rng`](Self::from_config_rng) is implemented.
    const FROM_CONFIG_RNG: bool = false;
    /// [`from_config`](Self::from_config) is implemented.
    const FROM_CONFIG: bool = false;
    /// [`default_state`](Self::default_state) is implemented.
    const DEFAULT: bool = false;

    /// Build a state from the `cell_params` node, drawing from `rng`.
    fn from_config_rng(_cfg: &Config, _rng: &mut dyn RngCore) -> Result<Self, ConfigError> {
        Err(ConfigError::invalid(
            "cell_params",
            "this cell state has no config-and-RNG constructor",
        ))
    }

    /// Build a state from the `cell_params` node.
    fn from_config(_cfg: &Config) -> Result<Self, ConfigError> {
        Err(ConfigError::invalid(
            "cell_params",
            "this cell state has no config constructor",
        ))
    }

    /// The default state, if the type has one.
    fn default_state() -> Option<Self> {
        None
    }
}

/// Build `n` initial states from the manager config node `cfg`.
pub(crate) fn build_states<S: CellState>(
    n: usize,
    cfg: &Config,
    traits: &CellTraits,
    rng: &mut dyn RngCore,
) -> Result<Vec<S>, CellManagerError> {
    if traits.use_default_state_constructor {
        info!("setting up cells using default constructor");
        let state = S::default_state().ok_or_else(|| CellManagerError::MissingInitialState {
            reason: "the cell traits select the default constructor, but the \
                     cell state has none"
                .into(),
        })?;
        return Ok(vec![state; n]);
    }

    if S::FROM_CONFIG_RNG {
        info!("setting up cells using config constructor (with RNG)");
        let params = cell_params(cfg)?;
        return (0..n)
            .map(|_| S::from_config_rng(&params, rng).map_err(CellManagerError::from))
            .collect();
    }

    if S::FROM_CONFIG {
        info!("setting up cells using config constructor");
        let params = cell_params(cfg)?;
        let state = S::from_config(&params)?;
        return Ok(vec![state; n]);
    }

    if S::DEFAULT {
        if let Some(state) = S::default_state() {
            info!("setting up cells using default constructor");
            return Ok(vec![state; n]);
        }
    }

    Err(CellManagerError::MissingInitialState {
        reason: "the cell state can be constructed neither from config nor by \
                 default; pass an explicit initial state"
            .into(),
    })
}

fn cell_params(cfg: &Config) -> Result<Config, ConfigError> {
    cfg.get("cell_params")
        .ok_or_else(|| cfg.missing("cell_params", "configuration entry"))
}
