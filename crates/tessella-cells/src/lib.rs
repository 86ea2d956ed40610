//! Cells and the cell manager.
//!
//! A [`CellManager`] owns a [`Space`](tessella_space::Space), a grid that
//! discretizes it, and one [`Cell`] per grid cell. It answers geometric
//! queries for cells, maintains the selected neighborhood (optionally as
//! a precomputed cache), and loads and writes cell data.
//!
//! Cell states are advanced with [`apply_rule`] in synchronous or
//! asynchronous mode; subsets of cells are chosen with [`select_cells`].
//!
//! # Ownership
//!
//! The manager is the single owner of all cells; the collection is built
//! once and never resized. Everything else refers to cells by
//! [`CellId`](tessella_core::CellId), which is also the position of the
//! cell in the collection.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod apply;
pub mod cache;
pub mod cell;
pub mod error;
pub mod manager;
pub mod output;
pub mod select;
pub mod state;

pub use apply::{apply_rule, apply_rule_to_all, try_apply_rule, Shuffle};
pub use cache::NeighborCache;
pub use cell::{Cell, CellTraits, Tag, Update};
pub use error::{CellManagerError, SelectionError};
pub use manager::CellManager;
pub use select::{select_cells, select_cells_from_config, Selection};
pub use state::CellState;
