//! Reusable cell-state fixtures.
//!
//! One state per construction path of [`CellState`]:
//!
//! - [`Opinion`]: drawn per cell from `cell_params` and the RNG.
//! - [`Counter`]: read once from `cell_params`, with a default.
//! - [`Bare`]: no constructor at all; needs an explicit initial state.

use rand::{Rng, RngCore};
use tessella_cells::CellState;
use tessella_core::{Config, ConfigError};

/// A value drawn uniformly from `[min, max)` for every cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Opinion {
    pub value: f64,
}

impl CellState for Opinion {
    const FROM_CONFIG_RNG: bool = true;

    fn from_config_rng(cfg: &Config, rng: &mut dyn RngCore) -> Result<Self, ConfigError> {
        let min: f64 = cfg.get_as_or("min", 0.0)?;
        let max: f64 = cfg.get_as_or("max", 1.0)?;
        if !(min < max) {
            return Err(ConfigError::invalid(
                "max",
                format!("must be larger than min ({min}), was {max}"),
            ));
        }
        Ok(Self {
            value: rng.gen_range(min..max),
        })
    }
}

/// A step counter, read from `initial_count` or zero by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counter {
    pub count: u64,
}

impl CellState for Counter {
    const FROM_CONFIG: bool = true;
    const DEFAULT: bool = true;

    fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            count: cfg.get_as("initial_count")?,
        })
    }

    fn default_state() -> Option<Self> {
        Some(Self::default())
    }
}

/// A state without any constructor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bare(pub i32);

impl CellState for Bare {}
