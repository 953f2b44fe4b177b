#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Brig Memory Driver
//!
//! In-memory implementations of every Brig port.
//!
//! Each driver is scripted up front (which namespaces exist, how
//! submission and observation behave, whether teardown fails) and records
//! every call it receives. Clones share state, so a test can hand one clone
//! to the orchestrator and inspect the other afterwards.
//!
//! Used by the runtime's tests and by `brig --dry-run`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use brig_driver_memory::{MemoryCluster, MemoryExecutor, MemoryObserver, MemorySandbox};
//!
//! let cluster = MemoryCluster::new().with_namespace("db");
//! let executor = MemoryExecutor::new().named("pod-123");
//! let observer = MemoryObserver::new().succeeding_with("PLAY RECAP ok=3");
//! let sandbox = MemorySandbox::new();
//! ```

mod cluster;
mod executor;
mod observer;
mod sandbox;

use std::sync::Arc;

use brig_ports::PortsError;

pub use cluster::MemoryCluster;
pub use executor::{ExecuteCall, MemoryExecutor};
pub use observer::MemoryObserver;
pub use sandbox::{MemorySandbox, MemorySandboxManager};

/// Builds a fresh error each time a scripted failure fires.
///
/// [`PortsError`] is not `Clone`, so scripts hold a factory instead.
pub type ErrorFactory = Arc<dyn Fn() -> PortsError + Send + Sync>;
