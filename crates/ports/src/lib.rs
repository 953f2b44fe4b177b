#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Brig Ports
//!
//! Collaborator interface traits (ports) for the Brig action runner.
//!
//! The runtime composes these; drivers implement them:
//!
//! - [`ClusterClient`] -- namespace state lookups
//! - [`WorkloadExecutor`] -- submits the workload running an action
//! - [`WorkloadObserver`] -- watches a workload to its terminal state
//! - [`SandboxProvider`] / [`SandboxManager`] -- sandbox identity teardown
//!
//! All traits are object-safe, suitable for use as `Arc<dyn Trait>` behind
//! dependency injection.

pub mod cluster;
pub mod error;
pub mod sandbox;
pub mod workload;

pub use cluster::{ClusterClient, NamespacePhase, NamespaceState};
pub use error::PortsError;
pub use sandbox::{SandboxManager, SandboxProvider};
pub use workload::{Submission, WatchFailure, WorkloadExecutor, WorkloadObserver};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check that every port is object-safe.
    #[test]
    fn traits_are_object_safe() {
        fn _assert_cluster(_: &dyn ClusterClient) {}
        fn _assert_executor(_: &dyn WorkloadExecutor) {}
        fn _assert_observer(_: &dyn WorkloadObserver) {}
        fn _assert_manager(_: &dyn SandboxManager) {}
        fn _assert_provider(_: &dyn SandboxProvider) {}
    }

    #[test]
    fn traits_work_as_arc_dyn() {
        use std::sync::Arc;
        fn _takes_cluster(_: Arc<dyn ClusterClient>) {}
        fn _takes_executor(_: Arc<dyn WorkloadExecutor>) {}
        fn _takes_observer(_: Arc<dyn WorkloadObserver>) {}
        fn _takes_manager(_: Arc<dyn SandboxManager>) {}
        fn _takes_provider(_: Arc<dyn SandboxProvider>) {}
    }
}
