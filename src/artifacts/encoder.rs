//! Label encoders for categorical features

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::schema::{EncoderId, RawValue};

/// Maps category strings to trained integer codes.
///
/// The code of a category is its position in the trained class list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoder {
    classes: Vec<String>,
    #[serde(skip)]
    codes: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Create an encoder from its trained classes. Classes must be unique.
    pub fn new(classes: Vec<String>) -> Result<Self> {
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code).is_some() {
                return Err(Error::shape("label_encoders", format!("duplicate class '{class}'")));
            }
        }
        Ok(Self { classes, codes })
    }

    /// Trained code for a category
    pub fn encode(&self, category: &str) -> Option<usize> {
        self.codes.get(category).copied()
    }

    /// Category for a trained code
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// Trained classes in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of trained classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the encoder has no classes
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TryFrom<Vec<String>> for LabelEncoder {
    type Error = Error;

    fn try_from(classes: Vec<String>) -> Result<Self> {
        Self::new(classes)
    }
}

impl From<LabelEncoder> for Vec<String> {
    fn from(encoder: LabelEncoder) -> Self {
        encoder.classes
    }
}

/// Per-feature label encoders, addressed by `EncoderId`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncoderSet {
    encoders: Vec<(String, LabelEncoder)>,
}

impl EncoderSet {
    /// Create an empty encoder set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, feature: impl Into<String>, encoder: LabelEncoder) -> Self {
        self.insert(feature, encoder);
        self
    }

    /// Insert an encoder for a feature, returning its id
    pub fn insert(&mut self, feature: impl Into<String>, encoder: LabelEncoder) -> EncoderId {
        let feature = feature.into();
        if let Some(id) = self.id_of(&feature) {
            self.encoders[id.0].1 = encoder;
            return id;
        }
        self.encoders.push((feature, encoder));
        EncoderId(self.encoders.len() - 1)
    }

    /// Encoder id for a feature name
    pub fn id_of(&self, feature: &str) -> Option<EncoderId> {
        self.encoders.iter().position(|(name, _)| name == feature).map(EncoderId)
    }

    /// Encoder by id
    pub fn get(&self, id: EncoderId) -> Option<&LabelEncoder> {
        self.encoders.get(id.0).map(|(_, encoder)| encoder)
    }

    /// Feature names with an encoder
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.encoders.iter().map(|(name, _)| name.as_str())
    }

    /// Number of encoders
    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    /// Whether the set has no encoders
    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Substitute a raw category with its trained code.
    ///
    /// Values outside the trained vocabulary fail with `UnknownCategory`; they are
    /// never defaulted.
    pub fn encode(&self, id: EncoderId, feature: &str, value: &RawValue) -> Result<f32> {
        let category = value.to_string();
        self.get(id)
            .and_then(|encoder| encoder.encode(&category))
            .map(|code| code as f32)
            .ok_or_else(|| Error::UnknownCategory { feature: feature.to_string(), value: category })
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for EncoderSet {
    type Error = Error;

    fn try_from(map: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut set = EncoderSet::new();
        for (feature, classes) in map {
            set.insert(feature, LabelEncoder::new(classes)?);
        }
        Ok(set)
    }
}

impl From<&EncoderSet> for BTreeMap<String, Vec<String>> {
    fn from(set: &EncoderSet) -> Self {
        set.encoders
            .iter()
            .map(|(name, encoder)| (name.clone(), encoder.classes.clone()))
            .collect()
    }
}
