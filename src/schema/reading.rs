//! Raw sensor readings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::feature::{FeatureKind, FeatureSchema};
use crate::error::{Error, Result};

/// A raw feature value: a number, or a string (category, or unparsed form input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Numeric measurement
    Number(f32),
    /// Category string or unparsed text
    Text(String),
}

impl RawValue {
    /// Numeric value of this raw value, parsing text when needed.
    ///
    /// Non-finite values are rejected so they never reach the scaler.
    pub fn to_number(&self, feature: &str) -> Result<f32> {
        let value = match self {
            RawValue::Number(v) => *v,
            RawValue::Text(s) => s.trim().parse::<f32>().map_err(|_| Error::InvalidNumeric {
                feature: feature.to_string(),
                value: s.clone(),
            })?,
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::InvalidNumeric { feature: feature.to_string(), value: value.to_string() })
        }
    }

    /// Numeric value if this is a number
    pub fn as_number(&self) -> Option<f32> {
        match self {
            RawValue::Number(v) => Some(*v),
            RawValue::Text(_) => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(v) => write!(f, "{v}"),
            RawValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f32> for RawValue {
    fn from(v: f32) -> Self {
        RawValue::Number(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v as f32)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

/// One set of named sensor measurements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reading {
    values: BTreeMap<String, RawValue>,
}

impl Reading {
    /// Create an empty reading
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Remove a value
    pub fn remove(&mut self, name: &str) -> Option<RawValue> {
        self.values.remove(name)
    }

    /// Value for a feature name
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    /// Feature names present in this reading
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Name/value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the reading has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse submitted key/value strings against a schema.
    ///
    /// Numeric features are converted here and fail with `InvalidNumeric`;
    /// categorical features and names outside the schema stay raw strings, so
    /// the pipeline reports them as unknown categories or unexpected keys.
    /// A name submitted twice fails with `DuplicateFeature`.
    pub fn from_form<I, K, V>(pairs: I, schema: &FeatureSchema) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut reading = Reading::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.as_ref();
            let raw = match schema.index_of(&key).and_then(|i| schema.get(i)).map(|f| f.kind) {
                Some(FeatureKind::Numeric) => {
                    RawValue::Number(RawValue::from(value).to_number(&key)?)
                }
                _ => RawValue::from(value),
            };
            if reading.values.contains_key(&key) {
                return Err(Error::DuplicateFeature { feature: key });
            }
            reading.values.insert(key, raw);
        }
        Ok(reading)
    }
}

impl<K, V> FromIterator<(K, V)> for Reading
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut reading = Reading::new();
        for (k, v) in iter {
            reading.insert(k, v);
        }
        reading
    }
}
