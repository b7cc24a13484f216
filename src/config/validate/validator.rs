//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::MonitorConfig;

/// Validate a monitor configuration
///
/// Checks:
/// - Numeric values are in valid ranges
/// - Labels and file names are non-empty
pub fn validate_config(config: &MonitorConfig) -> Result<(), ValidationError> {
    if config.pipeline.top_k == 0 {
        return Err(ValidationError::InvalidTopK(config.pipeline.top_k));
    }

    if config.pipeline.normal_status.trim().is_empty() {
        return Err(ValidationError::EmptyNormalStatus);
    }

    let p = config.monitor.stress_probability;
    if !(0.0..=1.0).contains(&p) {
        return Err(ValidationError::InvalidStressProbability(p));
    }

    if let Some((feature, value)) =
        config.alerts.thresholds.iter().find(|(_, value)| !value.is_finite())
    {
        return Err(ValidationError::InvalidThreshold { feature: feature.to_string(), value });
    }

    let files = &config.artifacts.files;
    for (name, file) in [
        ("model", &files.model),
        ("scaler", &files.scaler),
        ("label_encoders", &files.label_encoders),
        ("target_encoder", &files.target_encoder),
        ("failure_type_encoder", &files.failure_type_encoder),
        ("feature_columns", &files.feature_columns),
    ] {
        if file.trim().is_empty() {
            return Err(ValidationError::EmptyArtifactFile(name));
        }
    }

    Ok(())
}
