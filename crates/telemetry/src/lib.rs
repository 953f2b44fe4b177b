#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Brig Telemetry
//!
//! Event bus and metrics for the Brig action runner.
//!
//! This crate provides:
//! - [`EventBus`] -- broadcast-based distribution of [`ActionEvent`]s
//! - [`MetricsRegistry`] -- in-memory counters, gauges and histograms
//! - [`TelemetryService`] -- the facade the runtime is handed
//! - [`NoopTelemetry`] -- in-memory implementation for tests and the CLI
//!
//! Events and metrics are fire-and-forget. Nothing in the runtime branches
//! on whether an emission was observed.

pub mod event;
pub mod metrics;
pub mod service;

pub use event::{ActionEvent, EventBus, EventSubscriber};
pub use metrics::{Counter, Gauge, Histogram, MetricsRegistry, names};
pub use service::{NoopTelemetry, TelemetryService};
