//! Validation error types

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid top_k: {0} (must be > 0)")]
    InvalidTopK(usize),

    #[error("Invalid stress probability: {0} (must be in [0.0, 1.0])")]
    InvalidStressProbability(f64),

    #[error("Invalid threshold for '{feature}': {value} (must be finite)")]
    InvalidThreshold { feature: String, value: f32 },

    #[error("Normal status label cannot be empty")]
    EmptyNormalStatus,

    #[error("Artifact file name for '{0}' cannot be empty")]
    EmptyArtifactFile(&'static str),
}
