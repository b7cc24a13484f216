//! Declarative configuration
//!
//! A single YAML file configures where the artifacts live, how the pipeline
//! reports, how the loop runs, the alert thresholds, and the server address.
//! Command-line flags override the file.

pub mod cli;
mod loader;
mod schema;
mod validate;


pub use cli::{
    apply_overrides, parse_args, CheckArgs, Cli, Command, InitArgs, MonitorArgs, OutputFormat,
    PredictArgs, ServeArgs,
};
pub use loader::{load_config, parse_config};
pub use schema::{
    AlertsConfig, ArtifactsConfig, LoopConfig, MonitorConfig, PipelineConfig, ServerConfig,
};
pub use validate::{validate_config, ValidationError};
