//! Threshold highlighting
//!
//! A static per-feature rule that flags a value as alerting when it exceeds a
//! fixed threshold. It is independent of the classifier and of attribution
//! scores; it only decorates readings for presentation.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::schema::{
    FeatureSchema, RawValue, Reading, AIR_TEMPERATURE, PROCESS_TEMPERATURE, ROTATIONAL_SPEED,
    TOOL_WEAR, TORQUE,
};

/// Per-feature alert thresholds. A value alerts when strictly greater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdRules {
    thresholds: BTreeMap<String, f32>,
}

impl Default for ThresholdRules {
    fn default() -> Self {
        Self::machine()
    }
}

impl ThresholdRules {
    /// Rules with no thresholds; nothing alerts
    pub fn empty() -> Self {
        Self { thresholds: BTreeMap::new() }
    }

    /// Thresholds for the machine sensor set
    pub fn machine() -> Self {
        Self::empty()
            .with(AIR_TEMPERATURE, 330.0)
            .with(PROCESS_TEMPERATURE, 350.0)
            .with(TORQUE, 200.0)
            .with(TOOL_WEAR, 550.0)
            .with(ROTATIONAL_SPEED, 4000.0)
    }

    /// Builder-style threshold
    pub fn with(mut self, feature: impl Into<String>, threshold: f32) -> Self {
        self.thresholds.insert(feature.into(), threshold);
        self
    }

    /// Threshold for a feature
    pub fn threshold(&self, feature: &str) -> Option<f32> {
        self.thresholds.get(feature).copied()
    }

    /// Configured feature/threshold pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.thresholds.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Whether `value` exceeds the feature's threshold.
    ///
    /// Total: unknown features and NaN never alert.
    pub fn is_alerting(&self, feature: &str, value: f32) -> bool {
        self.threshold(feature).is_some_and(|t| value > t)
    }

    /// Reading values in schema order, each flagged against these rules.
    ///
    /// Text values are parsed the way the encoder parses them; values that do
    /// not parse never alert.
    pub fn annotate(&self, schema: &FeatureSchema, reading: &Reading) -> Vec<AnnotatedValue> {
        schema
            .names()
            .filter_map(|name| {
                let value = reading.get(name)?.clone();
                let alerting = value.to_number(name).is_ok_and(|v| self.is_alerting(name, v));
                Some(AnnotatedValue { feature: name.to_string(), value, alerting })
            })
            .collect()
    }
}

/// A reading value with its alert flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedValue {
    /// Feature name
    pub feature: String,
    /// Raw value as read
    pub value: RawValue,
    /// Whether the value exceeds its threshold
    pub alerting: bool,
}

/// `is_alerting` against the default machine thresholds.
pub fn is_alerting(feature: &str, value: f32) -> bool {
    static RULES: OnceLock<ThresholdRules> = OnceLock::new();
    RULES.get_or_init(ThresholdRules::machine).is_alerting(feature, value)
}
