//! Ordered feature schema with per-feature kinds

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::reading::Reading;
use crate::error::{Error, Result};

/// Index of a label encoder inside the encoder set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncoderId(pub usize);

/// How a feature's raw value becomes a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Raw value is used as is.
    Numeric,
    /// Raw value is a category string substituted by the referenced encoder.
    Categorical(EncoderId),
}

/// A named feature and its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name as used in readings
    pub name: String,
    /// Resolved kind
    pub kind: FeatureKind,
}

impl Feature {
    /// Create a numeric feature
    pub fn numeric(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: FeatureKind::Numeric }
    }

    /// Create a categorical feature bound to an encoder
    pub fn categorical(name: impl Into<String>, encoder: EncoderId) -> Self {
        Self { name: name.into(), kind: FeatureKind::Categorical(encoder) }
    }

    /// Whether this feature goes through an encoder
    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, FeatureKind::Categorical(_))
    }
}

/// Ordered feature schema of cardinality N.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Feature>", into = "Vec<Feature>")]
pub struct FeatureSchema {
    features: Vec<Feature>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema, rejecting empty and duplicate names.
    pub fn new(features: Vec<Feature>) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::shape("feature_columns", "feature schema is empty"));
        }

        let mut index = HashMap::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            if feature.name.trim().is_empty() {
                return Err(Error::shape(
                    "feature_columns",
                    format!("feature at position {i} has an empty name"),
                ));
            }
            if index.insert(feature.name.clone(), i).is_some() {
                return Err(Error::shape(
                    "feature_columns",
                    format!("duplicate feature name '{}'", feature.name),
                ));
            }
        }

        Ok(Self { features, index })
    }

    /// Build a schema where every feature is numeric.
    pub fn numeric<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Feature::numeric).collect())
    }

    /// Number of features (N)
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Always false for a constructed schema; kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in training order
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Feature names in training order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.name.as_str())
    }

    /// Feature at a schema position
    pub fn get(&self, idx: usize) -> Option<&Feature> {
        self.features.get(idx)
    }

    /// Schema position of a feature name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether the schema contains a feature name
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Check the reading's key set equals the schema exactly.
    ///
    /// Missing names are reported in schema order, unexpected names sorted.
    pub fn check_keys(&self, reading: &Reading) -> Result<()> {
        let missing: Vec<String> = self
            .names()
            .filter(|name| reading.get(name).is_none())
            .map(str::to_string)
            .collect();

        let extra: BTreeSet<&str> = reading.keys().filter(|k| !self.contains(k)).collect();

        if missing.is_empty() && extra.is_empty() {
            return Ok(());
        }

        Err(Error::SchemaMismatch {
            missing,
            extra: extra.into_iter().map(str::to_string).collect(),
        })
    }
}

impl TryFrom<Vec<Feature>> for FeatureSchema {
    type Error = Error;

    fn try_from(features: Vec<Feature>) -> Result<Self> {
        Self::new(features)
    }
}

impl From<FeatureSchema> for Vec<Feature> {
    fn from(schema: FeatureSchema) -> Self {
        schema.features
    }
}
