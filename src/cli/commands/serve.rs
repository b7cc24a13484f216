//! Serve command implementation

use crate::cli::LogLevel;
use crate::config::MonitorConfig;

#[cfg(feature = "server")]
pub fn run_serve(config: &MonitorConfig, level: LogLevel) -> Result<(), String> {
    use crate::cli::logging::log;

    let pipeline = super::build_pipeline(config)?;
    log(level, LogLevel::Normal, &format!("Serving on http://{}", config.server.address));

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    runtime
        .block_on(crate::server::serve(&config.server.address, pipeline))
        .map_err(|e| e.to_string())
}

#[cfg(not(feature = "server"))]
pub fn run_serve(_config: &MonitorConfig, _level: LogLevel) -> Result<(), String> {
    Err("vigilar was built without the `server` feature\n  → Rebuild with --features server".into())
}
