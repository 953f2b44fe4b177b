#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Brig Runtime
//!
//! Runs a named action against a service instance inside an ephemeral
//! cluster sandbox and always tears the sandbox down afterwards.
//!
//! This crate provides:
//! - [`ActionOrchestrator`] -- validate, check the namespace, acquire a
//!   sandbox, execute, observe, tear down, report
//! - [`NamespaceOracle`] -- is the target namespace absent or terminating?
//! - [`SandboxScope`] -- scoped sandbox acquisition with exactly-once teardown
//! - [`ActionPhase`] -- the phase machine a run walks through
//! - [`ActionOutcome`] -- the workload identifier plus the run's result
//!
//! The orchestrator sits between a caller (a broker, the CLI) and the
//! collaborator ports in `brig-ports`. It holds no mutable state across
//! runs, so one instance can serve concurrent runs for different instances.

pub mod config;
pub mod error;
pub mod namespace;
pub mod orchestrator;
pub mod outcome;
pub mod phase;
pub mod sandbox;

pub use config::{OrchestratorConfig, TerminatingNamespacePolicy};
pub use error::{ErrorKind, OrchestratorError};
pub use namespace::NamespaceOracle;
pub use orchestrator::ActionOrchestrator;
pub use outcome::{ActionOutcome, ActionStatus};
pub use phase::ActionPhase;
pub use sandbox::SandboxScope;
