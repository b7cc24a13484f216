//! Presentation-ready result of one pipeline run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::verdict::Verdict;
use crate::alert::AnnotatedValue;
use crate::explain::FeatureScore;

/// Everything a presentation sink receives for one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// When the reading was evaluated
    pub evaluated_at: DateTime<Utc>,
    /// Fingerprint of the scaled vector
    pub input_hash: u64,
    /// Reading values in schema order with alert flags
    pub readings: Vec<AnnotatedValue>,
    /// Health verdict
    pub verdict: Verdict,
    /// Classifier class id
    pub class_id: usize,
    /// Decoded status label
    pub status: String,
    /// Decoded failure-type label
    pub failure_type: String,
    /// Top ranked causes, on failure when attribution succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causes: Option<Vec<FeatureScore>>,
    /// Every feature's score, descending (chart form)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributions: Option<Vec<FeatureScore>>,
    /// Why causes are missing on a failure verdict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_unavailable: Option<String>,
}

impl Diagnosis {
    /// Features whose values exceed their alert threshold
    pub fn alerting_features(&self) -> impl Iterator<Item = &str> {
        self.readings.iter().filter(|r| r.alerting).map(|r| r.feature.as_str())
    }
}
