//! Inference pipeline
//!
//! Orchestrates one reading through the trained artifacts:
//!
//! 1. check the reading's keys against the feature schema
//! 2. encode categorical features
//! 3. assemble the encoded vector in schema order
//! 4. apply the fitted scaler
//! 5. classify
//! 6. decode status and failure type into a `Verdict`
//!
//! The pipeline is a pure function of its input and the immutable artifacts.
//! Clones share the same artifacts, so it can be handed to any number of
//! concurrent callers; every call builds its own vectors.

mod diagnosis;
mod vectors;
mod verdict;

#[cfg(test)]
mod tests;

pub use diagnosis::Diagnosis;
pub use vectors::{fnv1a_hash, hash_features, EncodedVector, ScaledVector};
pub use verdict::{Inference, Verdict};

use chrono::Utc;
use std::sync::Arc;

use crate::alert::ThresholdRules;
use crate::artifacts::TrainedArtifacts;
use crate::error::{Error, Result};
use crate::explain::{self, Attribution, FeatureScore, DEFAULT_TOP_K};
use crate::schema::{FeatureKind, FeatureSchema, Reading};

/// Reading → verdict → ranked causes, over shared trained artifacts.
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    artifacts: Arc<TrainedArtifacts>,
    rules: ThresholdRules,
    top_k: usize,
}

impl InferencePipeline {
    /// Create a pipeline with default alert rules and top-3 causes
    pub fn new(artifacts: Arc<TrainedArtifacts>) -> Self {
        Self { artifacts, rules: ThresholdRules::default(), top_k: DEFAULT_TOP_K }
    }

    /// Set how many causes are reported
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the alert thresholds used when annotating readings
    pub fn with_rules(mut self, rules: ThresholdRules) -> Self {
        self.rules = rules;
        self
    }

    /// Shared trained artifacts
    pub fn artifacts(&self) -> &TrainedArtifacts {
        &self.artifacts
    }

    /// Feature schema
    pub fn schema(&self) -> &FeatureSchema {
        self.artifacts.schema()
    }

    /// Alert thresholds
    pub fn rules(&self) -> &ThresholdRules {
        &self.rules
    }

    /// Number of causes reported
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Steps 1 to 3: validate keys and build the encoded vector.
    pub fn encode(&self, reading: &Reading) -> Result<EncodedVector> {
        let schema = self.schema();
        schema.check_keys(reading)?;

        let encoders = self.artifacts.encoders();
        let values = schema
            .features()
            .iter()
            .map(|feature| {
                let raw = reading.get(&feature.name).ok_or_else(|| Error::SchemaMismatch {
                    missing: vec![feature.name.clone()],
                    extra: Vec::new(),
                })?;
                match feature.kind {
                    FeatureKind::Numeric => raw.to_number(&feature.name),
                    FeatureKind::Categorical(id) => encoders.encode(id, &feature.name, raw),
                }
            })
            .collect::<Result<Vec<f32>>>()?;

        Ok(EncodedVector::new(values))
    }

    /// Step 4: apply the fitted scaler.
    pub fn scale(&self, encoded: &EncodedVector) -> ScaledVector {
        ScaledVector::new(self.artifacts.scaler().transform(encoded.as_slice()))
    }

    /// Run steps 1 to 6 for one reading.
    pub fn infer(&self, reading: &Reading) -> Result<Inference> {
        let encoded = self.encode(reading)?;
        let scaled = self.scale(&encoded);

        let class_id = self.artifacts.classifier().predict(scaled.as_slice());
        let status = decode(
            self.artifacts.status_decoder().decode(class_id),
            "target_encoder",
            class_id,
        )?;
        let failure_type = decode(
            self.artifacts.failure_type_decoder().decode(class_id),
            "failure_type_encoder",
            class_id,
        )?;

        let verdict = if status == self.artifacts.normal_status() {
            Verdict::Normal
        } else {
            Verdict::Failure(failure_type.clone())
        };

        tracing::debug!(class_id, %verdict, "inference complete");
        Ok(Inference { verdict, class_id, status, failure_type, scaled })
    }

    /// Full attribution ranking for a scaled vector.
    pub fn attribute(&self, scaled: &ScaledVector) -> Result<Attribution> {
        explain::attribute(scaled, self.artifacts.classifier(), self.schema())
    }

    /// Top-k ranked causes for a scaled vector.
    pub fn explain(&self, scaled: &ScaledVector) -> Result<Vec<FeatureScore>> {
        Ok(self.attribute(scaled)?.into_top(self.top_k))
    }

    /// Infer, explain on failure, and annotate for presentation.
    ///
    /// Attribution failures degrade to a diagnosis without causes; only
    /// reading errors are returned.
    pub fn diagnose(&self, reading: &Reading) -> Result<Diagnosis> {
        let inference = self.infer(reading)?;

        let (causes, contributions, explanation_unavailable) = if inference.verdict.is_failure() {
            match self.attribute(&inference.scaled) {
                Ok(attribution) => {
                    let top = attribution.top(self.top_k).to_vec();
                    (Some(top), Some(attribution.into_ranked()), None)
                }
                Err(e) => {
                    tracing::warn!(code = e.code(), error = %e, "no explanation available");
                    (None, None, Some(e.to_string()))
                }
            }
        } else {
            (None, None, None)
        };

        Ok(Diagnosis {
            evaluated_at: Utc::now(),
            input_hash: inference.scaled.fingerprint(),
            readings: self.rules.annotate(self.schema(), reading),
            verdict: inference.verdict,
            class_id: inference.class_id,
            status: inference.status,
            failure_type: inference.failure_type,
            causes,
            contributions,
            explanation_unavailable,
        })
    }
}

fn decode(label: Option<&str>, artifact: &str, class_id: usize) -> Result<String> {
    label
        .map(str::to_string)
        .ok_or_else(|| Error::shape(artifact, format!("no label for class id {class_id}")))
}
