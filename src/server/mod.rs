//! One-shot HTTP mode
//!
//! Serves single predictions over HTTP. Each request builds its own reading and
//! vectors; the trained artifacts are shared read-only across all requests.
//!
//! Routes:
//! - `GET /health`: status, version, feature schema
//! - `POST /predict`: urlencoded form of feature values
//! - `POST /api/predict`: JSON object of feature values
//!
//! # Example
//!
//! ```ignore
//! use vigilar::server::serve;
//!
//! serve("127.0.0.1:5000", pipeline).await?;
//! ```

#[cfg(feature = "server")]
mod api;
#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod state;

#[cfg(all(test, feature = "server"))]
mod tests;

#[cfg(feature = "server")]
pub use api::*;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use state::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bind error: {0}")]
    Bind(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    pub data: Option<T>,
    /// Error message (if failed)
    pub error: Option<String>,
    /// Machine-readable error code (if failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Request ID for tracing
    pub request_id: String,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T, request_id: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
            request_id: request_id.to_string(),
        }
    }

    /// Create error response
    pub fn error(message: &str, request_id: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
            error_code: None,
            request_id: request_id.to_string(),
        }
    }

    /// Create error response from a pipeline error, keeping its code
    pub fn from_error(error: &crate::Error, request_id: &str) -> Self {
        Self {
            error_code: Some(error.code().to_string()),
            ..Self::error(&error.to_string(), request_id)
        }
    }
}

/// Feature as listed by the health check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInfo {
    /// Feature name
    pub name: String,
    /// `numeric` or `categorical`
    pub kind: String,
    /// Trained categories for categorical features
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Server status
    pub status: String,
    /// Server version
    pub version: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Classifier summary
    pub classifier: String,
    /// Expected features in schema order
    pub features: Vec<FeatureInfo>,
}
