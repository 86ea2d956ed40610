//! Periodic, time-gated progress reports.
//!
//! A [`Monitor`] collects named entries and emits all of them as one
//! `tracing` event once its emit interval has passed. Entries are set
//! through a [`MonitorScope`], which prefixes keys with the name of the
//! model that reports them. The monitor never influences the run.

use std::fmt;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tracing::info;

/// A value reported to the monitor.
#[derive(Clone, Debug, PartialEq)]
pub enum MonitorValue {
    /// An integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A float.
    Float(f64),
    /// A flag.
    Bool(bool),
    /// Free text.
    Text(String),
}

impl fmt::Display for MonitorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! monitor_value_from {
    ($($t:ty => $variant:ident as $repr:ty),* $(,)?) => {
        $(impl From<$t> for MonitorValue {
            fn from(v: $t) -> Self {
                Self::$variant(<$repr>::from(v))
            }
        })*
    };
}

monitor_value_from!(
    i64 => Int as i64,
    i32 => Int as i64,
    u64 => UInt as u64,
    u32 => UInt as u64,
    f64 => Float as f64,
    f32 => Float as f64,
    bool => Bool as bool,
    String => Text as String,
    &str => Text as String,
);

impl From<usize> for MonitorValue {
    fn from(v: usize) -> Self {
        Self::UInt(v as u64)
    }
}

/// Collector and emitter of monitor entries.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tessella_engine::Monitor;
///
/// let mut monitor = Monitor::new(Duration::ZERO);
/// monitor.check_timer();
/// monitor.scope("ForestFire").set("density", 0.25);
/// assert!(monitor.emit_if_enabled());
/// assert_eq!(monitor.render(), "{ForestFire.density: 0.25}");
/// ```
#[derive(Clone, Debug)]
pub struct Monitor {
    entries: IndexMap<String, MonitorValue>,
    emit_interval: Duration,
    last_emit: Option<Instant>,
    emit_enabled: bool,
    emit_count: usize,
}

impl Monitor {
    /// A monitor that emits at most once per `emit_interval`.
    ///
    /// The first check after construction always enables emission.
    pub fn new(emit_interval: Duration) -> Self {
        Self {
            entries: IndexMap::new(),
            emit_interval,
            last_emit: None,
            emit_enabled: false,
            emit_count: 0,
        }
    }

    /// Enable emission if the interval has passed since the last one.
    pub fn check_timer(&mut self) {
        let due = self
            .last_emit
            .map_or(true, |t| t.elapsed() >= self.emit_interval);
        if due {
            self.emit_enabled = true;
        }
    }

    /// Whether the next [`emit_if_enabled`](Self::emit_if_enabled) will
    /// emit. Collecting expensive entries only pays off when it does.
    pub fn emit_enabled(&self) -> bool {
        self.emit_enabled
    }

    /// Emit all entries if enabled, then restart the timer.
    ///
    /// Returns whether an emission happened.
    pub fn emit_if_enabled(&mut self) -> bool {
        if !self.emit_enabled {
            return false;
        }
        info!(target: "tessella::monitor", entries = %self.render(), "monitor");
        self.emit_count += 1;
        self.last_emit = Some(Instant::now());
        self.emit_enabled = false;
        true
    }

    /// Set an entry under the top-level key `key`.
    pub fn set_entry(&mut self, key: impl Into<String>, value: impl Into<MonitorValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Set the `time` entry.
    pub fn set_time(&mut self, time: u64) {
        self.set_entry("time", time);
    }

    /// A handle that prefixes keys with `name.`.
    pub fn scope(&mut self, name: &str) -> MonitorScope<'_> {
        MonitorScope {
            prefix: name.to_owned(),
            monitor: self,
        }
    }

    /// The current entries, in insertion order.
    pub fn entries(&self) -> &IndexMap<String, MonitorValue> {
        &self.entries
    }

    /// Number of emissions so far.
    pub fn emit_count(&self) -> usize {
        self.emit_count
    }

    /// The emit interval.
    pub fn emit_interval(&self) -> Duration {
        self.emit_interval
    }

    /// The entries as a single-line flow mapping.
    pub fn render(&self) -> String {
        let body: Vec<String> = self
            .entries
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        format!("{{{}}}", body.join(", "))
    }
}

/// A view of a [`Monitor`] that prefixes keys with a model name.
#[derive(Debug)]
pub struct MonitorScope<'a> {
    monitor: &'a mut Monitor,
    prefix: String,
}

impl MonitorScope<'_> {
    /// Set the entry `<prefix>.<key>`.
    pub fn set(&mut self, key: &str, value: impl Into<MonitorValue>) {
        let full = format!("{}.{key}", self.prefix);
        self.monitor.set_entry(full, value);
    }

    /// Set an entry computed by `f`, which is only called if the monitor
    /// will emit.
    pub fn set_with(&mut self, key: &str, f: impl FnOnce() -> MonitorValue) {
        if self.monitor.emit_enabled() {
            self.set(key, f());
        }
    }

    /// A nested scope `<prefix>.<name>`.
    pub fn nested(&mut self, name: &str) -> MonitorScope<'_> {
        MonitorScope {
            prefix: format!("{}.{name}", self.prefix),
            monitor: &mut *self.monitor,
        }
    }

    /// Whether the monitor will emit.
    pub fn emit_enabled(&self) -> bool {
        self.monitor.emit_enabled()
    }
}
