//! Metrics primitives and registry.
//!
//! Lightweight counter, gauge and histogram types and a registry to create
//! and retrieve them. Values live in memory behind atomics; exporting them
//! is left to whoever owns the registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use parking_lot::RwLock;

/// Metric names recorded by the runtime.
pub mod names {
    /// Runs that acquired a sandbox and submitted a workload.
    pub const ACTIONS_STARTED: &str = "actions_started_total";
    /// Runs that completed successfully.
    pub const ACTIONS_SUCCEEDED: &str = "actions_succeeded_total";
    /// Runs that ended with an error.
    pub const ACTIONS_FAILED: &str = "actions_failed_total";
    /// Runs skipped because the namespace was gone.
    pub const ACTIONS_SKIPPED: &str = "actions_skipped_total";
    /// Runs currently between sandbox acquisition and teardown.
    pub const ACTIONS_IN_FLIGHT: &str = "actions_in_flight";
    /// Duration of runs that reached a workload, in seconds.
    pub const ACTION_DURATION: &str = "action_duration_seconds";
    /// Sandbox teardowns attempted.
    pub const SANDBOX_TEARDOWNS: &str = "sandbox_teardowns_total";
    /// Sandbox teardowns that failed.
    pub const SANDBOX_TEARDOWN_FAILURES: &str = "sandbox_teardown_failures_total";
}

/// An incrementing counter.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    /// Create a new counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by one.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment by a given amount.
    pub fn inc_by(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// A gauge that can go up and down.
#[derive(Debug, Clone, Default)]
pub struct Gauge {
    value: Arc<AtomicI64>,
}

impl Gauge {
    /// Create a new gauge starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by one.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement by one.
    pub fn dec(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }

    /// Set to a specific value.
    pub fn set(&self, v: i64) {
        self.value.store(v, Ordering::Relaxed);
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Upper bounds, in seconds, of the [`Histogram`] buckets. Action runs
/// range from sub-second skips to watches bounded at an hour.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 300.0, 900.0, 1800.0, 3600.0,
];

#[derive(Debug, Default)]
struct HistogramState {
    count: u64,
    sum: f64,
    // One slot per bound in `DEFAULT_BUCKETS`, plus overflow.
    buckets: [u64; DEFAULT_BUCKETS.len() + 1],
}

/// A histogram with fixed buckets, so memory stays constant however many
/// observations are recorded.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    state: Arc<RwLock<HistogramState>>,
}

impl Histogram {
    /// Create a new histogram.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation.
    pub fn observe(&self, value: f64) {
        let slot = DEFAULT_BUCKETS
            .iter()
            .position(|bound| value <= *bound)
            .unwrap_or(DEFAULT_BUCKETS.len());
        let mut state = self.state.write();
        state.count += 1;
        state.sum += value;
        state.buckets[slot] += 1;
    }

    /// Number of observations recorded.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.state.read().count
    }

    /// Sum of all observations.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.state.read().sum
    }

    /// Cumulative count per upper bound, ending with `+Inf`.
    #[must_use]
    pub fn buckets(&self) -> Vec<(f64, u64)> {
        let state = self.state.read();
        let bounds = DEFAULT_BUCKETS.iter().copied().chain([f64::INFINITY]);
        let mut total = 0;
        bounds
            .zip(state.buckets)
            .map(|(bound, n)| {
                total += n;
                (bound, total)
            })
            .collect()
    }
}

/// Registry for creating and retrieving named metrics.
///
/// Labelled metrics are stored under `name{label="value"}`.
///
/// # Examples
///
/// ```
/// use brig_telemetry::metrics::MetricsRegistry;
///
/// let registry = MetricsRegistry::new();
/// registry.counter_with("actions_started_total", "action", "deprovision").inc();
///
/// let same = registry.counter_with("actions_started_total", "action", "deprovision");
/// assert_eq!(same.get(), 1);
/// assert_eq!(registry.counter("actions_started_total").get(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    counters: Arc<RwLock<HashMap<String, Counter>>>,
    gauges: Arc<RwLock<HashMap<String, Gauge>>>,
    histograms: Arc<RwLock<HashMap<String, Histogram>>>,
}

impl MetricsRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a counter by name.
    pub fn counter(&self, name: &str) -> Counter {
        self.counters
            .write()
            .entry(name.to_owned())
            .or_default()
            .clone()
    }

    /// Get or create a counter carrying one label.
    pub fn counter_with(&self, name: &str, label: &str, value: &str) -> Counter {
        self.counter(&labelled(name, label, value))
    }

    /// Get or create a gauge by name.
    pub fn gauge(&self, name: &str) -> Gauge {
        self.gauges
            .write()
            .entry(name.to_owned())
            .or_default()
            .clone()
    }

    /// Get or create a histogram by name.
    pub fn histogram(&self, name: &str) -> Histogram {
        self.histograms
            .write()
            .entry(name.to_owned())
            .or_default()
            .clone()
    }

    /// Get or create a histogram carrying one label.
    pub fn histogram_with(&self, name: &str, label: &str, value: &str) -> Histogram {
        self.histogram(&labelled(name, label, value))
    }

    /// Snapshot of every counter, sorted by key.
    pub fn counters(&self) -> Vec<(String, u64)> {
        let mut out: Vec<_> = self
            .counters
            .read()
            .iter()
            .map(|(k, c)| (k.clone(), c.get()))
            .collect();
        out.sort();
        out
    }
}

fn labelled(name: &str, label: &str, value: &str) -> String {
    format!("{name}{{{label}=\"{value}\"}}")
}
