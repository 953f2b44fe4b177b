//! Telemetry service trait and implementations.
//!
//! [`TelemetryService`] is the facade the runtime is handed. It gives access
//! to the event bus and metrics registry and carries the fire-and-forget
//! `action_started` notification.

use std::sync::Arc;

use crate::event::EventBus;
use crate::metrics::{MetricsRegistry, names};

/// Telemetry service facade.
///
/// Shared via `Arc<dyn TelemetryService>`. Implementations must never fail
/// or block; callers do not handle errors from it.
pub trait TelemetryService: Send + Sync {
    /// Access the event bus for emitting and subscribing to events.
    fn event_bus(&self) -> &EventBus;

    /// Access the metrics registry for recording metrics.
    fn metrics(&self) -> &MetricsRegistry;

    /// Record that an action run has started.
    fn action_started(&self, action: &str) {
        tracing::trace!(action, "action started");
        self.metrics()
            .counter_with(names::ACTIONS_STARTED, "action", action)
            .inc();
    }
}

/// In-memory telemetry.
///
/// Events go to whoever subscribes; metrics are recorded but never exported.
/// Used by tests and by the CLI, which prints the counters on exit.
///
/// # Examples
///
/// ```
/// use brig_telemetry::service::{NoopTelemetry, TelemetryService};
///
/// let telemetry = NoopTelemetry::new();
/// telemetry.action_started("deprovision");
/// let started = telemetry
///     .metrics()
///     .counter_with("actions_started_total", "action", "deprovision");
/// assert_eq!(started.get(), 1);
/// ```
#[derive(Debug)]
pub struct NoopTelemetry {
    event_bus: EventBus,
    metrics: MetricsRegistry,
}

impl NoopTelemetry {
    /// Create a new in-memory telemetry service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            event_bus: EventBus::new(128),
            metrics: MetricsRegistry::new(),
        }
    }

    /// Create as an `Arc<dyn TelemetryService>` for dependency injection.
    #[must_use]
    pub fn arc() -> Arc<dyn TelemetryService> {
        Arc::new(Self::new())
    }
}

impl Default for NoopTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryService for NoopTelemetry {
    fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ActionEvent;

    #[test]
    fn noop_telemetry_does_not_panic() {
        let telemetry = NoopTelemetry::new();
        telemetry.event_bus().emit(ActionEvent::NamespaceSkipped {
            action: "deprovision".into(),
            namespace: "gone".into(),
        });
        telemetry.metrics().gauge(names::ACTIONS_IN_FLIGHT).set(1);
        telemetry.metrics().histogram(names::ACTION_DURATION).observe(1.23);
    }

    #[test]
    fn action_started_is_labelled_by_action() {
        let telemetry = NoopTelemetry::new();
        telemetry.action_started("deprovision");
        telemetry.action_started("deprovision");
        telemetry.action_started("test");
        let metrics = telemetry.metrics();
        assert_eq!(
            metrics
                .counter_with(names::ACTIONS_STARTED, "action", "deprovision")
                .get(),
            2
        );
        assert_eq!(
            metrics
                .counter_with(names::ACTIONS_STARTED, "action", "test")
                .get(),
            1
        );
    }

    #[test]
    fn arc_is_object_safe() {
        let t: Arc<dyn TelemetryService> = NoopTelemetry::arc();
        t.action_started("x");
    }
}
