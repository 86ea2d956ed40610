//! The run loop.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::RunError;
use crate::model::Model;
use crate::monitor::Monitor;
use crate::stop::StopToken;

/// What a finished run did.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Number of steps performed.
    pub steps: u64,
    /// Model time at the end of the run.
    pub final_time: u64,
    /// Number of times data was written.
    pub writes: u64,
    /// Number of monitor emissions.
    pub monitor_emits: usize,
    /// Whether the run ended because of a stop request.
    pub stopped: bool,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Drives a [`Model`] according to a [`RunConfig`].
///
/// Each iteration performs a step, advances the time by one, lets the
/// monitor emit if its interval passed, and writes data if the new time
/// is a write time. The initial state (time 0) is written before the
/// first step if the schedule includes it.
#[derive(Debug)]
pub struct Runner {
    cfg: RunConfig,
    monitor: Monitor,
    time: u64,
}

impl Runner {
    /// A runner for the validated schedule `cfg`.
    pub fn new(cfg: RunConfig) -> Result<Self, tessella_core::ConfigError> {
        cfg.validate()?;
        Ok(Self {
            monitor: Monitor::new(cfg.monitor_emit_interval),
            cfg,
            time: 0,
        })
    }

    /// The schedule.
    pub fn config(&self) -> &RunConfig {
        &self.cfg
    }

    /// The monitor.
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Current model time.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Run `model` until `num_steps` steps are done or `stop` is set.
    ///
    /// The stop token is checked before every step. A run that is stopped
    /// early still returns a summary.
    ///
    /// # Errors
    ///
    /// The first model error aborts the run.
    pub fn run<M: Model>(
        &mut self,
        model: &mut M,
        stop: &StopToken,
    ) -> Result<RunSummary, RunError<M::Error>> {
        let started = Instant::now();
        let mut steps = 0;
        let mut writes = 0;
        let emits_before = self.monitor.emit_count();
        info!(
            model = model.name(),
            num_steps = self.cfg.num_steps,
            write_start = self.cfg.write_start,
            write_every = self.cfg.write_every,
            "starting run"
        );

        if self.cfg.is_write_time(self.time) {
            model
                .write_data(self.time)
                .map_err(|source| RunError::WriteData {
                    time: self.time,
                    source,
                })?;
            writes += 1;
        }

        let mut stopped = false;
        while steps < self.cfg.num_steps {
            if stop.is_stopped() {
                stopped = true;
                break;
            }

            model.perform_step().map_err(|source| RunError::Step {
                time: self.time,
                source,
            })?;
            self.time += 1;
            steps += 1;

            self.monitor.check_timer();
            if self.monitor.emit_enabled() {
                self.monitor.set_time(self.time);
                model.monitor(&mut self.monitor.scope(model.name()));
                self.monitor.emit_if_enabled();
            }

            if self.cfg.is_write_time(self.time) {
                model
                    .write_data(self.time)
                    .map_err(|source| RunError::WriteData {
                        time: self.time,
                        source,
                    })?;
                writes += 1;
                debug!(time = self.time, "wrote data");
            }
        }

        let summary = RunSummary {
            steps,
            final_time: self.time,
            writes,
            monitor_emits: self.monitor.emit_count() - emits_before,
            stopped,
            elapsed: started.elapsed(),
        };
        if stopped {
            warn!(
                model = model.name(),
                time = self.time,
                "run stopped before reaching num_steps"
            );
        }
        info!(
            model = model.name(),
            steps = summary.steps,
            writes = summary.writes,
            elapsed_s = summary.elapsed.as_secs_f64(),
            "run finished"
        );
        Ok(summary)
    }
}
