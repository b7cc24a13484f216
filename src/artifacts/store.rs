//! Trained artifact store
//!
//! Artifacts are loaded once at startup and shared read-only afterwards. Any
//! missing file or shape incompatibility is fatal: the process must not serve
//! without a complete, consistent set.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::classifier::{Classifier, Model};
use super::decoder::TargetDecoder;
use super::encoder::EncoderSet;
use super::scaler::Scaler;
use crate::error::{Error, Result};
use crate::schema::{Feature, FeatureSchema};

/// Default status label that marks a healthy machine
pub const DEFAULT_NORMAL_STATUS: &str = "No Failure";

/// File names of the artifacts inside the artifact directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactFiles {
    /// Classifier
    pub model: String,
    /// Fitted scaler
    pub scaler: String,
    /// Categorical feature encoders
    pub label_encoders: String,
    /// Status decoder
    pub target_encoder: String,
    /// Failure-type decoder
    pub failure_type_encoder: String,
    /// Ordered feature names
    pub feature_columns: String,
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            model: "model.json".to_string(),
            scaler: "scaler.json".to_string(),
            label_encoders: "label_encoders.json".to_string(),
            target_encoder: "target_encoder.json".to_string(),
            failure_type_encoder: "failure_type_encoder.json".to_string(),
            feature_columns: "feature_columns.json".to_string(),
        }
    }
}

/// How the two target decoders are interpreted and cross-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderPolicy {
    /// Status label meaning "no failure"
    pub normal_status: String,
    /// Fail loading when the status and failure-type decoders disagree
    pub strict: bool,
}

impl Default for DecoderPolicy {
    fn default() -> Self {
        Self { normal_status: DEFAULT_NORMAL_STATUS.to_string(), strict: false }
    }
}

/// Serializable form of every artifact, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDocuments {
    /// Ordered feature names
    pub feature_columns: Vec<String>,
    /// Feature name -> trained categories
    pub label_encoders: BTreeMap<String, Vec<String>>,
    /// Fitted scaler
    pub scaler: Scaler,
    /// Classifier
    pub model: Model,
    /// Class id -> status label
    pub target_encoder: TargetDecoder,
    /// Class id -> failure-type label
    pub failure_type_encoder: TargetDecoder,
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let path = dir.join(file);
    let content = fs::read_to_string(&path)
        .map_err(|e| Error::load(file, format!("cannot read {}: {e}", path.display())))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| Error::load(file, format!("cannot parse {}: {e}", path.display())))?;
    tracing::info!(artifact = file, path = %path.display(), "loaded artifact");
    Ok(value)
}

fn write_json<T: Serialize>(dir: &Path, file: &str, value: &T) -> Result<()> {
    let path = dir.join(file);
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Config(format!("cannot serialize {file}: {e}")))?;
    fs::write(&path, json).map_err(|e| Error::io(format!("writing {}", path.display()), e))
}

impl ArtifactDocuments {
    /// Read every artifact file from a directory
    pub fn read_from(dir: &Path, files: &ArtifactFiles) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::load(
                "artifacts",
                format!("directory not found: {}", dir.display()),
            ));
        }

        Ok(Self {
            feature_columns: read_json(dir, &files.feature_columns)?,
            label_encoders: read_json(dir, &files.label_encoders)?,
            scaler: read_json(dir, &files.scaler)?,
            model: read_json(dir, &files.model)?,
            target_encoder: read_json(dir, &files.target_encoder)?,
            failure_type_encoder: read_json(dir, &files.failure_type_encoder)?,
        })
    }

    /// Write every artifact file into a directory, creating it if needed
    pub fn write_to(&self, dir: &Path, files: &ArtifactFiles) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .map_err(|e| Error::io(format!("creating {}", dir.display()), e))?;

        write_json(dir, &files.feature_columns, &self.feature_columns)?;
        write_json(dir, &files.label_encoders, &self.label_encoders)?;
        write_json(dir, &files.scaler, &self.scaler)?;
        write_json(dir, &files.model, &self.model)?;
        write_json(dir, &files.target_encoder, &self.target_encoder)?;
        write_json(dir, &files.failure_type_encoder, &self.failure_type_encoder)?;

        Ok([
            &files.feature_columns,
            &files.label_encoders,
            &files.scaler,
            &files.model,
            &files.target_encoder,
            &files.failure_type_encoder,
        ]
        .into_iter()
        .map(|f| dir.join(f))
        .collect())
    }

    /// Validate and assemble the in-memory artifacts
    pub fn into_artifacts(self, policy: &DecoderPolicy) -> Result<TrainedArtifacts> {
        TrainedArtifacts::new(
            ArtifactParts {
                feature_columns: self.feature_columns,
                encoders: EncoderSet::try_from(self.label_encoders)?,
                scaler: self.scaler,
                classifier: Box::new(self.model),
                status_decoder: self.target_encoder,
                failure_type_decoder: self.failure_type_encoder,
            },
            policy,
        )
    }
}

/// Load and validate all artifacts from a directory.
pub fn load_artifacts(
    dir: &Path,
    files: &ArtifactFiles,
    policy: &DecoderPolicy,
) -> Result<TrainedArtifacts> {
    let artifacts = ArtifactDocuments::read_from(dir, files)?.into_artifacts(policy)?;
    tracing::info!(
        dir = %dir.display(),
        features = artifacts.schema().len(),
        classifier = %artifacts.classifier().describe(),
        "trained artifacts ready"
    );
    Ok(artifacts)
}

/// Unvalidated artifact objects, before shape checks.
pub struct ArtifactParts {
    /// Ordered feature names
    pub feature_columns: Vec<String>,
    /// Categorical encoders
    pub encoders: EncoderSet,
    /// Fitted scaler
    pub scaler: Scaler,
    /// Classifier
    pub classifier: Box<dyn Classifier>,
    /// Class id -> status label
    pub status_decoder: TargetDecoder,
    /// Class id -> failure-type label
    pub failure_type_decoder: TargetDecoder,
}

/// Complete, shape-checked, immutable set of trained artifacts.
pub struct TrainedArtifacts {
    schema: FeatureSchema,
    encoders: EncoderSet,
    scaler: Scaler,
    classifier: Box<dyn Classifier>,
    status_decoder: TargetDecoder,
    failure_type_decoder: TargetDecoder,
    normal_status: String,
}

impl std::fmt::Debug for TrainedArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedArtifacts")
            .field("schema", &self.schema)
            .field("encoders", &self.encoders)
            .field("scaler", &self.scaler)
            .field("classifier", &self.classifier.describe())
            .field("status_decoder", &self.status_decoder)
            .field("failure_type_decoder", &self.failure_type_decoder)
            .field("normal_status", &self.normal_status)
            .finish()
    }
}

impl TrainedArtifacts {
    /// Resolve the schema and check every artifact against it.
    pub fn new(parts: ArtifactParts, policy: &DecoderPolicy) -> Result<Self> {
        let ArtifactParts {
            feature_columns,
            encoders,
            scaler,
            classifier,
            status_decoder,
            failure_type_decoder,
        } = parts;

        if policy.normal_status.trim().is_empty() {
            return Err(Error::Config("normal status label must not be empty".to_string()));
        }

        if let Some(orphan) = encoders.features().find(|f| !feature_columns.iter().any(|c| c == f))
        {
            return Err(Error::shape(
                "label_encoders",
                format!("encoder for '{orphan}' has no matching feature column"),
            ));
        }

        let features = feature_columns
            .into_iter()
            .map(|name| match encoders.id_of(&name) {
                Some(id) => Feature::categorical(name, id),
                None => Feature::numeric(name),
            })
            .collect();
        let schema = FeatureSchema::new(features)?;
        let n = schema.len();

        scaler.check()?;
        if scaler.width() != n {
            return Err(Error::shape(
                "scaler",
                format!("fitted on {} features, schema has {n}", scaler.width()),
            ));
        }

        classifier.check()?;
        if classifier.n_features() != n {
            return Err(Error::shape(
                "model",
                format!("expects {} features, schema has {n}", classifier.n_features()),
            ));
        }

        let n_classes = classifier.n_classes();
        if n_classes == 0 {
            return Err(Error::shape("model", "classifier has no classes"));
        }
        for (name, decoder) in
            [("target_encoder", &status_decoder), ("failure_type_encoder", &failure_type_decoder)]
        {
            if decoder.len() < n_classes {
                return Err(Error::shape(
                    name,
                    format!("covers {} class ids, classifier has {n_classes}", decoder.len()),
                ));
            }
        }

        let artifacts = Self {
            schema,
            encoders,
            scaler,
            classifier,
            status_decoder,
            failure_type_decoder,
            normal_status: policy.normal_status.clone(),
        };

        let conflicts = artifacts.decoder_conflicts();
        if !conflicts.is_empty() {
            if policy.strict {
                return Err(Error::shape(
                    "failure_type_encoder",
                    format!("status and failure-type decoders disagree on class ids {conflicts:?}"),
                ));
            }
            for &class_id in &conflicts {
                let status = artifacts.status_decoder.decode(class_id).unwrap_or_default();
                let failure_type =
                    artifacts.failure_type_decoder.decode(class_id).unwrap_or_default();
                tracing::warn!(
                    class_id,
                    status,
                    failure_type,
                    "status and failure-type decoders disagree"
                );
            }
        }

        Ok(artifacts)
    }

    /// Class ids where exactly one decoder reports the normal label.
    pub fn decoder_conflicts(&self) -> Vec<usize> {
        (0..self.classifier.n_classes())
            .filter(|&c| {
                let normal = Some(self.normal_status.as_str());
                let status_normal = self.status_decoder.decode(c) == normal;
                let type_normal = self.failure_type_decoder.decode(c) == normal;
                status_normal != type_normal
            })
            .collect()
    }

    /// Feature schema with resolved kinds
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Categorical encoders
    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    /// Fitted scaler
    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    /// Classifier
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Status decoder
    pub fn status_decoder(&self) -> &TargetDecoder {
        &self.status_decoder
    }

    /// Failure-type decoder
    pub fn failure_type_decoder(&self) -> &TargetDecoder {
        &self.failure_type_decoder
    }

    /// Status label meaning "no failure"
    pub fn normal_status(&self) -> &str {
        &self.normal_status
    }
}
