//! Run loop, monitoring and logging setup for Tessella models.
//!
//! A [`Model`] advances its cells one step at a time and writes its data
//! on request. The [`Runner`] drives a model according to a
//! [`RunConfig`]: it steps until the configured number of steps or until
//! a [`StopToken`] is set, writes data on the configured schedule and
//! periodically emits [`Monitor`] entries through `tracing`.
//!
//! # Cancellation
//!
//! The stop token is checked between steps only. A step in progress
//! always completes, and the data of the last completed step has been
//! written if it was due.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod runner;
pub mod stop;

pub use config::RunConfig;
pub use error::RunError;
pub use model::Model;
pub use monitor::{Monitor, MonitorScope, MonitorValue};
pub use runner::{RunSummary, Runner};
pub use stop::StopToken;
