//! Command-line arguments.

use std::path::PathBuf;

use brig_core::ActionName;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};

/// Run bundle actions against service instances in ephemeral cluster
/// sandboxes.
#[derive(Debug, Parser)]
#[command(name = "brig", version, about)]
pub struct Cli {
    /// Config file (defaults to ./brig.toml when present).
    #[arg(long, global = true, env = "BRIG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `info,kube=warn`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Kubeconfig context to use.
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Use in-memory drivers instead of a cluster.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// How to print the outcome.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an action against a service instance.
    Run {
        /// Action name, e.g. `deprovision` or `test`.
        action: ActionName,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Run the `deprovision` action against a service instance.
    Deprovision {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Print the effective configuration as JSON.
    Config,
}

/// Where and how to run.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Service instance file, JSON or YAML.
    #[arg(long, short)]
    pub instance: PathBuf,

    /// Upper bound on the workload watch, e.g. `10m`.
    #[arg(long)]
    pub watch_timeout: Option<String>,

    /// Run the action even if the namespace is terminating.
    #[arg(long)]
    pub run_in_terminating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormat> for brig_log::Format {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
            LogFormat::Json => Self::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The workload identifier only.
    Text,
    /// A JSON summary of the outcome.
    Json,
}

impl Cli {
    /// Flag values that override the layered config, as a nested object
    /// holding only the flags that were given.
    pub fn overrides(&self) -> Value {
        let mut root = Map::new();
        let mut set = |section: &str, key: &str, value: Value| {
            if let Value::Object(map) = root
                .entry(section)
                .or_insert_with(|| Value::Object(Map::new()))
            {
                map.insert(key.to_owned(), value);
            }
        };

        if let Some(level) = &self.log_level {
            set("log", "level", Value::from(level.as_str()));
        }
        if let Some(format) = self.log_format {
            if let Ok(format) = serde_json::to_value(brig_log::Format::from(format)) {
                set("log", "format", format);
            }
        }
        if let Some(context) = &self.context {
            set("cluster", "context", Value::from(context.as_str()));
        }
        if let Some(target) = self.command.target() {
            if let Some(timeout) = &target.watch_timeout {
                set("orchestrator", "watch_timeout", Value::from(timeout.as_str()));
            }
            if target.run_in_terminating {
                set("orchestrator", "terminating_namespace", Value::from("run"));
            }
        }
        Value::Object(root)
    }
}

impl Command {
    /// Target arguments of commands that run an action.
    pub fn target(&self) -> Option<&TargetArgs> {
        match self {
            Self::Run { target, .. } | Self::Deprovision { target } => Some(target),
            Self::Config => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_parses_action_name() {
        let cli = Cli::parse_from(["brig", "run", "Test", "--instance", "i.yaml"]);
        match cli.command {
            Command::Run { action, target } => {
                assert_eq!(action.as_str(), "test");
                assert_eq!(target.instance, PathBuf::from("i.yaml"));
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn invalid_action_name_is_rejected() {
        assert!(Cli::try_parse_from(["brig", "run", "drop db", "-i", "i.yaml"]).is_err());
    }

    #[test]
    fn only_given_flags_become_overrides() {
        let cli = Cli::parse_from([
            "brig",
            "--context",
            "prod",
            "deprovision",
            "-i",
            "i.json",
            "--watch-timeout",
            "5m",
            "--run-in-terminating",
        ]);
        assert_eq!(
            cli.overrides(),
            serde_json::json!({
                "cluster": { "context": "prod" },
                "orchestrator": { "watch_timeout": "5m", "terminating_namespace": "run" },
            })
        );

        let cli = Cli::parse_from(["brig", "--log-format", "json", "config"]);
        assert_eq!(cli.overrides(), serde_json::json!({ "log": { "format": "json" } }));

        let cli = Cli::parse_from(["brig", "config"]);
        assert_eq!(cli.overrides(), serde_json::json!({}));
    }
}
