//! Configuration loading

use std::fs;
use std::path::Path;

use super::schema::MonitorConfig;
use super::validate::validate_config;
use crate::error::{Error, Result};

/// Parse and validate a YAML configuration string
pub fn parse_config(yaml: &str) -> Result<MonitorConfig> {
    let config: MonitorConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::Config(format!("Failed to parse YAML config: {e}")))?;
    validate_config(&config).map_err(|e| Error::Config(format!("Invalid config: {e}")))?;
    Ok(config)
}

/// Load a configuration file, or the defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<MonitorConfig> {
    let Some(path) = path else {
        return Ok(MonitorConfig::default());
    };

    let yaml = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;
    let config = parse_config(&yaml)?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}
