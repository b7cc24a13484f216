//! Init command implementation
//!
//! Writes the reference machine artifacts, a ready-to-run set for trying
//! `check`, `predict`, `monitor` and `serve` without a trained model.

use crate::artifacts::reference;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{InitArgs, MonitorConfig};

pub fn run_init(config: &MonitorConfig, args: InitArgs, level: LogLevel) -> Result<(), String> {
    let dir = &config.artifacts.dir;
    let files = &config.artifacts.files;

    if !args.force {
        let existing: Vec<String> = [
            &files.model,
            &files.scaler,
            &files.label_encoders,
            &files.target_encoder,
            &files.failure_type_encoder,
            &files.feature_columns,
        ]
        .into_iter()
        .filter(|f| dir.join(f).exists())
        .cloned()
        .collect();
        if !existing.is_empty() {
            return Err(format!(
                "Artifacts already exist in {}: {}\n  → Use --force to overwrite",
                dir.display(),
                existing.join(", ")
            ));
        }
    }

    let written =
        reference::reference_documents().write_to(dir, files).map_err(|e| e.to_string())?;

    log(level, LogLevel::Normal, &format!("✓ Reference artifacts written to {}", dir.display()));
    for path in written {
        log(level, LogLevel::Verbose, &format!("  {}", path.display()));
    }
    Ok(())
}
