//! Classification outcome

use serde::{Deserialize, Serialize};
use std::fmt;

use super::vectors::ScaledVector;

/// Machine health verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Machine operating normally
    Normal,
    /// Failure predicted, with its decoded failure type
    Failure(String),
}

impl Verdict {
    /// Whether a failure was predicted
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failure(_))
    }

    /// Failure type, if a failure was predicted
    pub fn failure_type(&self) -> Option<&str> {
        match self {
            Verdict::Normal => None,
            Verdict::Failure(kind) => Some(kind),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Normal => write!(f, "Normal"),
            Verdict::Failure(kind) => write!(f, "Failure ({kind})"),
        }
    }
}

/// Result of one `infer` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Verdict derived from the status label
    pub verdict: Verdict,
    /// Raw class id from the classifier
    pub class_id: usize,
    /// Decoded status label
    pub status: String,
    /// Decoded failure-type label
    pub failure_type: String,
    /// Scaled vector the classifier saw
    pub scaled: ScaledVector,
}
