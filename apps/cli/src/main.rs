#![forbid(unsafe_code)]

//! `brig` -- run bundle actions against service instances in ephemeral
//! cluster sandboxes.

mod cli;
mod config;
mod instance;
mod run;

use std::process::ExitCode;

use brig_core::ActionName;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::BrigConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = BrigConfig::load(cli.config.as_deref(), cli.overrides())?;
    apply_logger_env(&mut config.log, cli.log_level.is_some(), cli.log_format.is_some());
    let _log = brig_log::init_with(config.log.clone())?;

    let (action, target) = match &cli.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Run { action, target } => (action.clone(), target),
        Command::Deprovision { target } => (ActionName::deprovision(), target),
    };

    let instance = instance::load(&target.instance)?;
    tracing::debug!(instance_id = %instance.id(), dry_run = cli.dry_run, "instance loaded");
    run::run_action(&config, &action, &instance, cli.dry_run, cli.output).await
}

/// `BRIG_LOG`/`RUST_LOG` and `BRIG_LOG_FORMAT` win over the config file,
/// flags win over both.
fn apply_logger_env(log: &mut brig_log::Config, level_flag: bool, format_flag: bool) {
    let env = brig_log::Config::from_env();
    let defaults = brig_log::Config::default();
    let level_env = std::env::var_os("BRIG_LOG").is_some() || std::env::var_os("RUST_LOG").is_some();
    if !level_flag && level_env {
        log.level = env.level;
    }
    if !format_flag && std::env::var_os("BRIG_LOG_FORMAT").is_some() {
        log.format = env.format;
    }
    if log.fields == defaults.fields {
        log.fields = env.fields;
    }
}
