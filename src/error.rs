//! Error types with actionable diagnostics (Andon principle).
//!
//! Per-reading failures (`SchemaMismatch`, `UnknownCategory`, `InvalidNumeric`,
//! `DuplicateFeature`, `AttributionUnavailable`, `Source`) are recoverable: the
//! caller turns them into an error payload or skips the monitoring cycle.
//! Artifact and configuration failures only happen at startup and stop the
//! process before it serves.

use thiserror::Error;

/// Result type alias for vigilar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the inference pipeline and its surroundings.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading keys differ from the feature schema.
    #[error("Reading does not match the feature schema (missing: [{}], unexpected: [{}])\n  → Supply exactly the trained feature names", .missing.join(", "), .extra.join(", "))]
    SchemaMismatch { missing: Vec<String>, extra: Vec<String> },

    /// Categorical value outside the trained vocabulary.
    #[error("Unknown category '{value}' for feature '{feature}'\n  → Use one of the categories the encoder was trained on")]
    UnknownCategory { feature: String, value: String },

    /// Non-numeric value for a numeric feature.
    #[error("Invalid numeric value '{value}' for feature '{feature}'\n  → Provide a finite number")]
    InvalidNumeric { feature: String, value: String },

    /// The same feature was submitted more than once.
    #[error("Feature '{feature}' was submitted more than once\n  → Send each feature exactly once")]
    DuplicateFeature { feature: String },

    /// Attribution could not be computed for this classifier or instance.
    #[error("Attribution unavailable: {reason}")]
    AttributionUnavailable { reason: String },

    /// Reading source failed to produce a reading.
    #[error("Reading source failed: {0}")]
    Source(String),

    /// A trained artifact is missing or unreadable.
    #[error("Failed to load artifact '{artifact}': {message}\n  → Check the artifacts directory in the configuration")]
    ArtifactLoad { artifact: String, message: String },

    /// A trained artifact has a shape incompatible with the others.
    #[error("Incompatible artifact '{artifact}': {message}\n  → Re-export the artifacts from the same training run")]
    ArtifactShape { artifact: String, message: String },

    /// Configuration file could not be read or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Create an artifact load error.
    pub fn load(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtifactLoad { artifact: artifact.into(), message: message.into() }
    }

    /// Create an artifact shape error.
    pub fn shape(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtifactShape { artifact: artifact.into(), message: message.into() }
    }

    /// Whether the error concerns a single reading and must not stop the process.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SchemaMismatch { .. }
                | Self::UnknownCategory { .. }
                | Self::InvalidNumeric { .. }
                | Self::DuplicateFeature { .. }
                | Self::AttributionUnavailable { .. }
                | Self::Source(_)
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemaMismatch { .. } => "E100",
            Self::UnknownCategory { .. } => "E101",
            Self::InvalidNumeric { .. } => "E102",
            Self::DuplicateFeature { .. } => "E103",
            Self::AttributionUnavailable { .. } => "E110",
            Self::Source(_) => "E120",
            Self::ArtifactLoad { .. } => "E200",
            Self::ArtifactShape { .. } => "E201",
            Self::Config(_) => "E300",
            Self::Io { .. } => "E400",
        }
    }
}
