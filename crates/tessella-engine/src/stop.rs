//! Cooperative cancellation of a run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared flag asking a run to stop after the current step.
///
/// Clones share the flag, so one clone can be handed to a signal
/// handler or another thread while the runner polls another.
///
/// # Examples
///
/// ```
/// use tessella_engine::StopToken;
///
/// let token = StopToken::new();
/// let remote = token.clone();
/// remote.stop();
/// assert!(token.is_stopped());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    /// A token that has not been stopped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
