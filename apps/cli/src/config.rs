//! Layered configuration: defaults, then `brig.toml`, then `BRIG_*`
//! environment variables, then command-line flags.

use std::path::Path;

use brig_core::ClusterConfig;
use brig_runtime::OrchestratorConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "brig.toml";

// Read directly by brig-log, not part of the layered config.
const LOGGER_ENV_KEYS: &[&str] = &["log", "log_format", "service", "env", "version"];

/// Everything the binary can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrigConfig {
    /// Logger settings.
    pub log: brig_log::Config,
    /// Orchestrator knobs.
    pub orchestrator: OrchestratorConfig,
    /// Cluster connection and sandbox shape.
    pub cluster: ClusterConfig,
}

impl BrigConfig {
    /// Load the layered configuration.
    ///
    /// `file` replaces `brig.toml`; a missing default file is not an error.
    /// `overrides` is a nested JSON object of flag values, merged last.
    pub fn load(file: Option<&Path>, overrides: serde_json::Value) -> Result<Self, figment::Error> {
        let toml = match file {
            Some(path) => Toml::file_exact(path),
            None => Toml::file(DEFAULT_CONFIG_FILE),
        };
        Figment::from(Serialized::defaults(Self::default()))
            .merge(toml)
            .merge(
                Env::prefixed("BRIG_")
                    .ignore(LOGGER_ENV_KEYS)
                    .split("__"),
            )
            .merge(Serialized::defaults(overrides))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::time::Duration;

    #[test]
    fn defaults_without_any_source() {
        Jail::expect_with(|_jail| {
            let config = BrigConfig::load(None, serde_json::json!({})).unwrap();
            assert_eq!(config, BrigConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env_then_flags() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                [orchestrator]
                watch_timeout = "10m"
                terminating_namespace = "run"

                [cluster]
                sandbox_role = "admin"
                context = "staging"
                "#,
            )?;
            jail.set_env("BRIG_CLUSTER__SANDBOX_ROLE", "view");
            jail.set_env("BRIG_LOG", "debug");

            let overrides = serde_json::json!({ "cluster": { "context": "prod" } });
            let config = BrigConfig::load(None, overrides).unwrap();

            assert_eq!(config.orchestrator.watch_timeout, Duration::from_secs(600));
            assert_eq!(
                config.orchestrator.terminating_namespace,
                brig_runtime::TerminatingNamespacePolicy::Run
            );
            assert_eq!(config.cluster.sandbox_role, "view");
            assert_eq!(config.cluster.context.as_deref(), Some("prod"));
            assert_eq!(config.log.level, "info");
            Ok(())
        });
    }

    #[test]
    fn explicit_file_must_exist() {
        Jail::expect_with(|_jail| {
            let err = BrigConfig::load(Some(Path::new("missing.toml")), serde_json::json!({}));
            assert!(err.is_err());
            Ok(())
        });
    }
}
