//! Attribution engine
//!
//! Ranks features by how much they moved the classifier's prediction for a
//! single instance. The classifier reports signed per-feature contributions
//! toward its predicted class; signs are discarded so features rank by impact
//! regardless of direction.
//!
//! Scores are local and relative to the model's own reference point (the
//! training mean for linear models, the root distribution for trees). They
//! rank causes; they are not calibrated probabilities.


use serde::{Deserialize, Serialize};

use crate::artifacts::Classifier;
use crate::error::{Error, Result};
use crate::pipeline::ScaledVector;
use crate::schema::FeatureSchema;

/// Number of causes reported by default
pub const DEFAULT_TOP_K: usize = 3;

/// A feature and its non-negative attribution score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    /// Feature name
    pub feature: String,
    /// Attribution magnitude
    pub score: f32,
}

/// Every feature's score, sorted descending; ties keep schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribution {
    ranked: Vec<FeatureScore>,
}

impl Attribution {
    /// Rank raw magnitudes given in schema order
    fn rank(schema: &FeatureSchema, magnitudes: Vec<f32>) -> Self {
        let mut ranked: Vec<FeatureScore> = schema
            .names()
            .zip(magnitudes)
            .map(|(name, score)| FeatureScore { feature: name.to_string(), score })
            .collect();
        // stable: equal scores stay in schema order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self { ranked }
    }

    /// Full ranking
    pub fn ranked(&self) -> &[FeatureScore] {
        &self.ranked
    }

    /// First `min(k, N)` entries
    pub fn top(&self, k: usize) -> &[FeatureScore] {
        &self.ranked[..k.min(self.ranked.len())]
    }

    /// Consume into the first `min(k, N)` entries
    pub fn into_top(mut self, k: usize) -> Vec<FeatureScore> {
        self.ranked.truncate(k);
        self.ranked
    }

    /// Consume into the full ranking
    pub fn into_ranked(self) -> Vec<FeatureScore> {
        self.ranked
    }

    /// Score of a feature
    pub fn score(&self, feature: &str) -> Option<f32> {
        self.ranked.iter().find(|s| s.feature == feature).map(|s| s.score)
    }

    /// Number of ranked features
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Whether nothing was ranked
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

fn unavailable(reason: impl Into<String>) -> Error {
    Error::AttributionUnavailable { reason: reason.into() }
}

/// Attribute the classifier's prediction for `scaled` to every feature.
///
/// Fails with `AttributionUnavailable` when the classifier offers no
/// contributions or they do not fit the schema.
pub fn attribute(
    scaled: &ScaledVector,
    classifier: &dyn Classifier,
    schema: &FeatureSchema,
) -> Result<Attribution> {
    let x = scaled.as_slice();
    if x.len() != schema.len() || x.len() != classifier.n_features() {
        return Err(unavailable(format!(
            "scaled vector has {} entries, schema has {} and classifier expects {}",
            x.len(),
            schema.len(),
            classifier.n_features()
        )));
    }

    let class = classifier.predict(x);
    let contributions = classifier
        .contributions(x, class)
        .ok_or_else(|| unavailable(format!("{} exposes no sensitivity", classifier.describe())))?;

    if contributions.len() != schema.len() {
        return Err(unavailable(format!(
            "classifier returned {} contributions for {} features",
            contributions.len(),
            schema.len()
        )));
    }
    if contributions.iter().any(|c| !c.is_finite()) {
        return Err(unavailable("classifier returned non-finite contributions"));
    }

    let magnitudes = contributions.into_iter().map(f32::abs).collect();
    Ok(Attribution::rank(schema, magnitudes))
}

/// Top-`k` causes of the classifier's prediction for `scaled`.
pub fn explain(
    scaled: &ScaledVector,
    classifier: &dyn Classifier,
    schema: &FeatureSchema,
    top_k: usize,
) -> Result<Vec<FeatureScore>> {
    Ok(attribute(scaled, classifier, schema)?.into_top(top_k))
}
