//! Service instances and their invocation parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::InstanceId;

/// Static description of the bundle backing a service instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Instance identity.
    pub id: InstanceId,
    /// Fully qualified bundle name, e.g. `dh-postgresql-apb`.
    #[serde(alias = "fqName")]
    pub fq_name: String,
    /// Image reference the workload runs. Required.
    #[serde(default)]
    pub image: String,
    /// Human description.
    #[serde(default)]
    pub description: String,
}

impl ServiceSpec {
    /// Create a spec with an empty description.
    pub fn new(id: InstanceId, fq_name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id,
            fq_name: fq_name.into(),
            image: image.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Where an instance lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceContext {
    /// Platform name, e.g. `kubernetes` or `openshift`.
    pub platform: String,
    /// Target namespace.
    pub namespace: String,
}

impl InstanceContext {
    /// Context on the `kubernetes` platform.
    pub fn kubernetes(namespace: impl Into<String>) -> Self {
        Self {
            platform: "kubernetes".to_owned(),
            namespace: namespace.into(),
        }
    }
}

/// Invocation parameters: unique keys, opaque JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, serde_json::Value>);

impl Parameters {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, returning the previous value under that key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Option<serde_json::Value> {
        self.0.insert(key.into(), value)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Iterate parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl FromIterator<(String, serde_json::Value)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A provisioned service instance an action runs against.
///
/// Immutable for the duration of one action run; the runtime only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Bundle description and identity.
    pub spec: ServiceSpec,
    /// Platform and namespace.
    pub context: InstanceContext,
    /// Invocation parameters.
    #[serde(default)]
    pub parameters: Parameters,
}

impl ServiceInstance {
    /// Create an instance without parameters.
    pub fn new(spec: ServiceSpec, context: InstanceContext) -> Self {
        Self {
            spec,
            context,
            parameters: Parameters::new(),
        }
    }

    /// Set the invocation parameters.
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Instance identity.
    pub fn id(&self) -> InstanceId {
        self.spec.id
    }

    /// Target namespace.
    pub fn namespace(&self) -> &str {
        &self.context.namespace
    }

    /// Check that the spec carries an image reference.
    ///
    /// Legacy bundles folded the image into the name; those have no
    /// separate `image` field and cannot be run.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.spec.image.trim().is_empty() {
            return Err(CoreError::missing_field(
                "spec.image",
                "no image field found on the instance spec; bundles require separate \
                 name and image fields (is this a legacy bundle without an image field?)",
            ));
        }
        Ok(())
    }

    /// Check that the context names a namespace.
    pub fn validate_namespace(&self) -> Result<(), CoreError> {
        if self.context.namespace.trim().is_empty() {
            return Err(CoreError::missing_field(
                "context.namespace",
                "instance context does not name a target namespace",
            ));
        }
        Ok(())
    }
}
