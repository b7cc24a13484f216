//! CLI command implementations

mod check;
mod init;
mod monitor;
mod predict;
mod serve;


use std::sync::Arc;

use crate::artifacts::load_artifacts;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, load_config, validate_config, Cli, Command, MonitorConfig};
use crate::pipeline::InferencePipeline;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    let mut config = load_config(cli.config.as_deref()).map_err(|e| e.to_string())?;
    apply_overrides(&mut config, &cli.command);
    validate_config(&config).map_err(|e| format!("Invalid config: {e}"))?;

    match cli.command {
        Command::Monitor(args) => monitor::run_monitor(&config, args, log_level),
        Command::Predict(args) => predict::run_predict(&config, args, log_level),
        Command::Serve(_) => serve::run_serve(&config, log_level),
        Command::Check(args) => check::run_check(&config, args, log_level),
        Command::Init(args) => init::run_init(&config, args, log_level),
    }
}

/// Load the configured artifacts and build the pipeline around them
fn build_pipeline(config: &MonitorConfig) -> Result<InferencePipeline, String> {
    let artifacts = load_artifacts(
        &config.artifacts.dir,
        &config.artifacts.files,
        &config.pipeline.decoder_policy(),
    )
    .map_err(|e| e.to_string())?;

    Ok(InferencePipeline::new(Arc::new(artifacts))
        .with_top_k(config.pipeline.top_k)
        .with_rules(config.alerts.thresholds.clone()))
}
