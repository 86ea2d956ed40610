//! Run configuration and its validation.

use std::time::Duration;

use tessella_core::{Config, ConfigError};

/// How a model run is scheduled.
///
/// Read from the top-level run config node with
/// [`from_config`](RunConfig::from_config); checked with
/// [`validate`](RunConfig::validate) before the run starts.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Number of steps to perform.
    pub num_steps: u64,
    /// First time at which data is written. Default: 0 (the initial state).
    pub write_start: u64,
    /// Write data every this many steps from `write_start` on. Default: 1.
    pub write_every: u64,
    /// Minimum wall-clock time between two monitor emissions. Default: 2 s.
    pub monitor_emit_interval: Duration,
    /// Seed of the shared RNG. Default: 42.
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_steps: 0,
            write_start: 0,
            write_every: 1,
            monitor_emit_interval: Duration::from_secs(2),
            seed: 42,
        }
    }
}

impl RunConfig {
    /// Read a run config node.
    ///
    /// `num_steps` is required. `write_start`, `write_every`, `seed` and
    /// `monitor_emit_interval` (in seconds) fall back to the defaults.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        if !cfg.contains("num_steps") {
            return Err(cfg.missing("num_steps", "run configuration parameter"));
        }
        let interval: f64 = cfg.get_as_or(
            "monitor_emit_interval",
            defaults.monitor_emit_interval.as_secs_f64(),
        )?;
        if !interval.is_finite() || interval < 0.0 {
            return Err(ConfigError::invalid(
                "monitor_emit_interval",
                format!("must be a finite, non-negative number of seconds, was {interval}"),
            ));
        }

        let run = Self {
            num_steps: cfg.get_as("num_steps")?,
            write_start: cfg.get_as_or("write_start", defaults.write_start)?,
            write_every: cfg.get_as_or("write_every", defaults.write_every)?,
            monitor_emit_interval: Duration::from_secs_f64(interval),
            seed: cfg.get_as_or("seed", defaults.seed)?,
        };
        run.validate()?;
        Ok(run)
    }

    /// Check the invariants of the schedule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.write_every == 0 {
            return Err(ConfigError::invalid("write_every", "must be at least 1"));
        }
        Ok(())
    }

    /// Whether data is written at `time`.
    pub fn is_write_time(&self, time: u64) -> bool {
        time >= self.write_start && (time - self.write_start) % self.write_every.max(1) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_keys() {
        let cfg = Config::from_yaml_str("num_steps: 10").unwrap();
        let run = RunConfig::from_config(&cfg).unwrap();
        assert_eq!(
            run,
            RunConfig {
                num_steps: 10,
                ..RunConfig::default()
            }
        );
    }

    #[test]
    fn all_keys_are_read() {
        let cfg = Config::from_yaml_str(
            "{ num_steps: 5, write_start: 2, write_every: 3, monitor_emit_interval: 0.5, seed: 7 }",
        )
        .unwrap();
        let run = RunConfig::from_config(&cfg).unwrap();
        assert_eq!(run.write_start, 2);
        assert_eq!(run.write_every, 3);
        assert_eq!(run.monitor_emit_interval, Duration::from_millis(500));
        assert_eq!(run.seed, 7);
    }

    #[test]
    fn num_steps_is_required() {
        let err = RunConfig::from_config(&Config::empty()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { ref key, .. } if key == "num_steps"));
    }

    #[test]
    fn zero_write_every_rejected() {
        let cfg = Config::from_yaml_str("{ num_steps: 5, write_every: 0 }").unwrap();
        assert!(matches!(
            RunConfig::from_config(&cfg),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "write_every"
        ));
    }

    #[test]
    fn negative_interval_rejected() {
        let cfg = Config::from_yaml_str("{ num_steps: 5, monitor_emit_interval: -1 }").unwrap();
        assert!(RunConfig::from_config(&cfg).is_err());
    }

    #[test]
    fn write_schedule() {
        let run = RunConfig {
            write_start: 2,
            write_every: 3,
            ..RunConfig::default()
        };
        let times: Vec<u64> = (0..10).filter(|&t| run.is_write_time(t)).collect();
        assert_eq!(times, vec![2, 5, 8]);
    }
}
