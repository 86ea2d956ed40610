//! Core types and traits for the Tessella simulation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary shared by the whole workspace: cell
//! identifiers, multi-index and position vectors, the hierarchical
//! [`Config`] tree, the error taxonomy for configuration and data
//! access, and the narrow data-channel traits ([`DataSink`],
//! [`StateSource`]) through which cell data leaves and enters a
//! simulation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod data;
pub mod error;
pub mod id;

pub use config::Config;
pub use data::{
    DataBuffer, DataElement, DataSink, DatasetHandle, ElementKind, LoadedArray, Scalar,
    StateSource,
};
pub use error::{fmt_shape, ConfigError, DataError};
pub use id::{CellId, MultiIndex, NeighborIds, SpaceVec};
