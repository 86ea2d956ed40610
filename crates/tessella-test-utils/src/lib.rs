//! Test fixtures and mock types for Tessella development.
//!
//! Provides cell-state fixtures covering every construction capability
//! (see [`fixtures`]), a [`FailingSource`] for load-error paths, and
//! helpers that build managers from YAML snippets.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tessella_cells::{CellManager, CellManagerError, CellState, CellTraits};
use tessella_core::{Config, DataElement, DataError, LoadedArray, StateSource};

/// A periodic 4x8 square grid with the von Neumann neighborhood cached.
pub const SQUARE_4X8_PERIODIC: &str = r#"
space:
  periodic: true
  extent: [4., 8.]
cell_manager:
  grid:
    structure: square
    resolution: 1
  neighborhood:
    mode: vonNeumann
    compute_and_store: true
"#;

/// A non-periodic 4x4 square grid without neighborhood.
pub const SQUARE_4X4_BOUNDED: &str = r#"
space:
  periodic: false
  extent: [4., 4.]
cell_manager:
  grid:
    structure: square
    resolution: 1
"#;

/// A periodic triangular grid, which cannot populate cells.
pub const TRIANGULAR: &str = r#"
space:
  periodic: true
cell_manager:
  grid:
    structure: triangular
    resolution: 2
"#;

/// Parse a YAML snippet; panics on malformed test input.
pub fn model_config(yaml: &str) -> Config {
    Config::from_yaml_str(yaml).expect("test YAML must parse")
}

/// A deterministic RNG.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Build a manager from a model YAML snippet with `space` and
/// `cell_manager` nodes.
pub fn manager_from_yaml<S: CellState>(
    yaml: &str,
    traits: CellTraits,
    seed: u64,
) -> Result<CellManager<S>, CellManagerError> {
    CellManager::from_config(&model_config(yaml), traits, seeded_rng(seed))
}

/// A [`StateSource`] on which every load fails.
#[derive(Clone, Debug, Default)]
pub struct FailingSource {
    pub reason: String,
}

impl FailingSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl StateSource for FailingSource {
    fn load<T: DataElement>(&self, path: &str) -> Result<LoadedArray<T>, DataError> {
        Err(DataError::LoadFailed {
            path: path.to_owned(),
            reason: self.reason.clone(),
        })
    }
}
