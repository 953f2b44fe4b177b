//! Event bus for action lifecycle events.
//!
//! Uses [`tokio::sync::broadcast`] for fan-out delivery to multiple subscribers.
//! Events are fire-and-forget projections -- dropping them is acceptable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Action run lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionEvent {
    /// A sandbox was acquired and the action is about to be submitted.
    Started {
        /// Action name.
        action: String,
        /// Instance identifier.
        instance_id: String,
    },
    /// The run ended early because the namespace is gone.
    NamespaceSkipped {
        /// Action name.
        action: String,
        /// Namespace that was absent or terminating.
        namespace: String,
    },
    /// A workload was submitted.
    Submitted {
        /// Action name.
        action: String,
        /// Workload name.
        workload: String,
        /// Namespace the workload runs in.
        namespace: String,
    },
    /// The workload finished successfully.
    Completed {
        /// Action name.
        action: String,
        /// Workload name.
        workload: String,
        /// Wall-clock duration of the run.
        duration: Duration,
    },
    /// The run failed.
    Failed {
        /// Action name.
        action: String,
        /// Workload name, if one existed.
        workload: Option<String>,
        /// Error description.
        error: String,
    },
    /// Sandbox teardown failed. The run's own outcome is unaffected.
    TeardownFailed {
        /// Workload name, if one existed.
        workload: Option<String>,
        /// Error description.
        error: String,
    },
}

/// Broadcast-based event bus.
///
/// Delivers events to all active subscribers. If no subscribers are
/// listening, events are silently dropped.
///
/// # Examples
///
/// ```
/// use brig_telemetry::event::{ActionEvent, EventBus};
///
/// let bus = EventBus::new(64);
/// let mut sub = bus.subscribe();
///
/// bus.emit(ActionEvent::Started {
///     action: "deprovision".into(),
///     instance_id: "i-1".into(),
/// });
///
/// assert!(sub.try_recv().is_some());
/// assert_eq!(bus.total_emitted(), 1);
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ActionEvent>,
    emitted: AtomicU64,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    ///
    /// When the channel is full, the oldest events are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            emitted: AtomicU64::new(0),
        }
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: ActionEvent) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
        // No receivers is fine.
        let _ = self.sender.send(event);
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    /// Total number of events emitted since creation.
    #[must_use]
    pub fn total_emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("emitted", &self.total_emitted())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Subscription handle for receiving events from the [`EventBus`].
pub struct EventSubscriber {
    receiver: broadcast::Receiver<ActionEvent>,
}

impl EventSubscriber {
    /// Receive the next event, waiting asynchronously.
    ///
    /// Returns `None` once the bus is dropped. Lagged events are skipped.
    pub async fn recv(&mut self) -> Option<ActionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&mut self) -> Option<ActionEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Drain every event currently buffered.
    pub fn drain(&mut self) -> Vec<ActionEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
