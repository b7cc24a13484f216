//! Target decoders: classifier class id to label

use serde::{Deserialize, Serialize};

/// Maps a classifier class id to a human-readable label.
///
/// Unlike a feature encoder, labels may repeat: a status decoder maps every
/// failure class to the same status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetDecoder {
    labels: Vec<String>,
}

impl TargetDecoder {
    /// Create a decoder from labels indexed by class id
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { labels: labels.into_iter().map(Into::into).collect() }
    }

    /// Label for a class id
    pub fn decode(&self, class_id: usize) -> Option<&str> {
        self.labels.get(class_id).map(String::as_str)
    }

    /// Number of class ids covered
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no class ids are covered
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in class id order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
