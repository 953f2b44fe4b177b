//! Cluster client port.
//!
//! The runtime only needs one read from the cluster: the state of the
//! namespace an instance lives in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PortsError;

/// Lifecycle phase of an existing namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamespacePhase {
    /// The namespace is usable.
    Active,
    /// The namespace is being deleted.
    Terminating,
    /// Any phase this crate does not know about.
    Other(String),
}

impl NamespacePhase {
    /// Parse the phase string reported by the cluster.
    ///
    /// A missing phase is treated as [`Active`](Self::Active).
    pub fn from_phase(phase: Option<&str>) -> Self {
        match phase {
            None | Some("Active") => Self::Active,
            Some("Terminating") => Self::Terminating,
            Some(other) => Self::Other(other.to_owned()),
        }
    }

    /// Returns `true` for [`Terminating`](Self::Terminating).
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Terminating)
    }
}

/// What the cluster knows about a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamespaceState {
    /// No namespace with that name exists.
    Absent,
    /// The namespace exists in the given phase.
    Present(NamespacePhase),
}

impl NamespaceState {
    /// Returns `true` if the namespace is absent or terminating.
    #[must_use]
    pub fn is_gone(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Present(phase) => phase.is_terminating(),
        }
    }
}

/// Read access to cluster namespaces.
///
/// A namespace that does not exist is reported as
/// [`NamespaceState::Absent`], not as an error. Errors mean the state could
/// not be determined.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Look up a namespace by name.
    async fn get_namespace(&self, name: &str) -> Result<NamespaceState, PortsError>;
}
