//! Errors of a model run.

use std::error::Error;
use std::fmt;

use tessella_core::ConfigError;

/// Why a run ended early. `E` is the model's error type.
#[derive(Debug, PartialEq)]
pub enum RunError<E> {
    /// The run configuration is invalid.
    Config(ConfigError),
    /// The model failed to perform a step.
    Step {
        /// Time at which the failing step started.
        time: u64,
        /// The model's error.
        source: E,
    },
    /// The model failed to write its data.
    WriteData {
        /// Time whose data was being written.
        time: u64,
        /// The model's error.
        source: E,
    },
}

impl<E: fmt::Display> fmt::Display for RunError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid run configuration: {e}"),
            Self::Step { time, source } => write!(f, "step at time {time} failed: {source}"),
            Self::WriteData { time, source } => {
                write!(f, "writing data of time {time} failed: {source}")
            }
        }
    }
}

impl<E: Error + 'static> Error for RunError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step { source, .. } | Self::WriteData { source, .. } => Some(source),
        }
    }
}

impl<E> From<ConfigError> for RunError<E> {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
