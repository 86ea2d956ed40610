//! In-memory storage for Tessella output and input data.
//!
//! [`MemoryStore`] implements both data-channel traits of
//! `tessella-core`: it collects the records written through
//! [`DataSink`](tessella_core::DataSink) and serves arrays through
//! [`StateSource`](tessella_core::StateSource). It backs tests, small
//! runs and any setup where the caller persists the data itself.
//!
//! Datasets are addressed by `/`-separated paths; every segment but the
//! last names a group.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod path;
pub mod store;

pub use path::DataPath;
pub use store::MemoryStore;
