//! Benchmark profiles for the Tessella simulation framework.
//!
//! - [`square_profile`]: a periodic square grid of `side`x`side` cells
//! - [`Heat`]: a scalar cell state, seeded uniformly from the profile RNG

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessella_cells::{CellManager, CellManagerError, CellState, CellTraits};
use tessella_core::{Config, ConfigError};
use tessella_space::NbMode;

/// A scalar state in `[0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heat(pub f64);

impl CellState for Heat {
    const FROM_CONFIG_RNG: bool = true;

    fn from_config_rng(_cfg: &Config, rng: &mut dyn RngCore) -> Result<Self, ConfigError> {
        Ok(Self(rng.gen::<f64>()))
    }
}

/// A periodic square grid of `side`x`side` cells with neighborhood `mode`,
/// optionally cached.
pub fn square_profile(
    side: usize,
    mode: NbMode,
    cached: bool,
    seed: u64,
) -> Result<CellManager<Heat>, CellManagerError> {
    let yaml = format!(
        "space: {{ periodic: true, extent: [{side}., {side}.] }}\n\
         cell_manager:\n  \
           grid: {{ structure: square, resolution: 1 }}\n  \
           neighborhood: {{ mode: {}, compute_and_store: {cached} }}\n  \
           cell_params: {{}}\n",
        mode.as_str()
    );
    let cfg = Config::from_yaml_str(&yaml)?;
    CellManager::from_config(&cfg, CellTraits::default(), ChaCha8Rng::seed_from_u64(seed))
}
