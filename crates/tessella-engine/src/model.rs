//! The interface between a model and the run loop.

use crate::monitor::MonitorScope;

/// A simulation model driven by a [`Runner`](crate::Runner).
///
/// The runner owns the schedule; the model owns its state and its
/// output. A model typically holds a `CellManager` and applies its
/// rules in [`perform_step`](Model::perform_step).
pub trait Model {
    /// Error returned by the model's operations.
    type Error;

    /// Name used to prefix monitor entries and in log messages.
    fn name(&self) -> &str;

    /// Advance the model by one step.
    fn perform_step(&mut self) -> Result<(), Self::Error>;

    /// Write the data of the current state, which belongs to `time`.
    fn write_data(&mut self, time: u64) -> Result<(), Self::Error>;

    /// Report entries to the monitor. Called only when the monitor is
    /// about to emit.
    fn monitor(&self, _scope: &mut MonitorScope<'_>) {}
}
