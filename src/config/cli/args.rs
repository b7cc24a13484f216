//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;
use crate::config::MonitorConfig;

/// Vigilar: predictive maintenance monitor
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "vigilar")]
#[command(author = "PAIML")]
#[command(version)]
#[command(about = "Machine health verdicts with ranked failure causes from sensor readings")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to YAML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the monitoring loop on the simulated sensor
    Monitor(MonitorArgs),

    /// Diagnose a single reading given as KEY=VALUE pairs
    Predict(PredictArgs),

    /// Serve the HTTP prediction endpoints
    Serve(ServeArgs),

    /// Load and cross-check the trained artifacts
    Check(CheckArgs),

    /// Write the reference artifacts into a directory
    Init(InitArgs),
}

/// Arguments for the monitor command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct MonitorArgs {
    /// Delay between cycles in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Stop after N cycles
    #[arg(long, value_name = "N")]
    pub cycles: Option<u64>,

    /// Seed for the simulated sensor
    #[arg(long)]
    pub seed: Option<u64>,

    /// Probability of a high-stress reading
    #[arg(long)]
    pub stress_probability: Option<f64>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the predict command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PredictArgs {
    /// Feature values as KEY=VALUE
    #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_key_value)]
    pub values: Vec<(String, String)>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the serve command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ServeArgs {
    /// Listen address
    #[arg(short, long)]
    pub address: Option<String>,
}

/// Arguments for the check command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CheckArgs {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the init command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InitArgs {
    /// Target directory (defaults to the configured artifacts directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Overwrite existing artifact files
    #[arg(long)]
    pub force: bool,
}

/// Parse a `KEY=VALUE` pair, splitting at the last `=`
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("Invalid value '{s}': expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid value '{s}': key cannot be empty"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Parse command line arguments
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a MonitorConfig
pub fn apply_overrides(config: &mut MonitorConfig, command: &Command) {
    match command {
        Command::Monitor(args) => {
            if let Some(interval_ms) = args.interval_ms {
                config.monitor.interval_ms = interval_ms;
            }
            if let Some(cycles) = args.cycles {
                config.monitor.max_cycles = Some(cycles);
            }
            if let Some(seed) = args.seed {
                config.monitor.seed = Some(seed);
            }
            if let Some(p) = args.stress_probability {
                config.monitor.stress_probability = p;
            }
        }
        Command::Serve(args) => {
            if let Some(address) = &args.address {
                config.server.address = address.clone();
            }
        }
        Command::Init(args) => {
            if let Some(dir) = &args.dir {
                config.artifacts.dir = dir.clone();
            }
        }
        Command::Predict(_) | Command::Check(_) => {}
    }
}
