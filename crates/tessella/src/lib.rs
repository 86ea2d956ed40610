//! Tessella: a cell-based simulation framework.
//!
//! This is the facade crate that re-exports the public API of all
//! Tessella sub-crates. For most models, depending on `tessella` alone is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use tessella::prelude::*;
//!
//! // Each cell holds whether it is on fire.
//! #[derive(Clone, Debug, PartialEq)]
//! struct Burning(bool);
//!
//! impl CellState for Burning {
//!     const DEFAULT: bool = true;
//!     fn default_state() -> Option<Self> {
//!         Some(Burning(false))
//!     }
//! }
//!
//! let cfg = Config::from_yaml_str(
//!     r#"
//! space: { periodic: true, extent: [4., 8.] }
//! cell_manager:
//!   grid: { structure: square, resolution: 1 }
//!   neighborhood: { mode: vonNeumann, compute_and_store: true }
//! "#,
//! )
//! .unwrap();
//! let mut cm: CellManager<Burning> =
//!     CellManager::from_config(&cfg, CellTraits::default(), ChaCha8Rng::seed_from_u64(42))
//!         .unwrap();
//! assert_eq!(cm.len(), 32);
//!
//! // Ignite one cell, then let the fire spread for one step.
//! cm.cell_mut(CellId(0)).unwrap().state_mut().0 = true;
//! apply_rule_to_all(&mut cm, Update::Sync, Shuffle::On, |cell, cm| {
//!     let near_fire = cm.neighbors_of(cell.id()).iter().any(|nb| nb.state().0);
//!     Burning(cell.state().0 || near_fire)
//! });
//! let burning = cm.cells().iter().filter(|c| c.state().0).count();
//! assert_eq!(burning, 5);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessella-core` | IDs, index vectors, `Config`, errors, data traits |
//! | [`space`] | `tessella-space` | Spaces, grids, neighborhoods, boundaries |
//! | [`cells`] | `tessella-cells` | Cells, the cell manager, selection, rule application |
//! | [`data`] | `tessella-data` | In-memory data store |
//! | [`engine`] | `tessella-engine` | Models, the run loop, monitor, logging setup |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, configuration and data traits (`tessella-core`).
pub use tessella_core as types;

/// Spaces and grids (`tessella-space`).
///
/// [`space::SquareGrid`] and [`space::HexagonalGrid`] discretize a
/// [`space::Space`]; [`space::create_grid`] picks one from configuration.
pub use tessella_space as space;

/// Cells and their manager (`tessella-cells`).
pub use tessella_cells as cells;

/// In-memory storage for written cell data (`tessella-data`).
pub use tessella_data as data;

/// Model driving (`tessella-engine`).
///
/// Implement [`engine::Model`] and hand it to an [`engine::Runner`].
pub use tessella_engine as engine;

/// Common imports for typical Tessella models.
///
/// ```rust
/// use tessella::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tessella_core::{
        CellId, Config, DataElement, DataSink, MultiIndex, SpaceVec, StateSource,
    };

    // Errors
    pub use tessella_core::{ConfigError, DataError};
    pub use tessella_space::GridError;
    pub use tessella_cells::{CellManagerError, SelectionError};

    // Space
    pub use tessella_space::{BoundarySelect, Grid, NbMode, NbParams, Space};

    // Cells
    pub use tessella_cells::{
        apply_rule, apply_rule_to_all, select_cells, select_cells_from_config, try_apply_rule,
        Cell, CellManager, CellState, CellTraits, Selection, Shuffle, Update,
    };

    // Data
    pub use tessella_data::MemoryStore;

    // Engine
    pub use tessella_engine::{
        Model, Monitor, MonitorScope, RunConfig, RunError, RunSummary, Runner, StopToken,
    };
}
