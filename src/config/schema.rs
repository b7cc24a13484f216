//! YAML schema for the monitor configuration
//!
//! Every section has defaults, so an empty file is a complete configuration.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::alert::ThresholdRules;
use crate::artifacts::{ArtifactFiles, DecoderPolicy, DEFAULT_NORMAL_STATUS};
use crate::explain::DEFAULT_TOP_K;
use crate::monitor::SimulatedSensor;

/// Deserialize a bool from either a YAML boolean (`true`) or a quoted string (`"true"`).
fn deserialize_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected 'true' or 'false', got '{other}'"
            ))),
        },
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Where the trained artifacts live
    pub artifacts: ArtifactsConfig,
    /// Inference and explanation settings
    pub pipeline: PipelineConfig,
    /// Monitoring loop settings
    pub monitor: LoopConfig,
    /// Alert thresholds
    pub alerts: AlertsConfig,
    /// HTTP surface
    pub server: ServerConfig,
}

/// Artifact location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory holding the artifact files
    pub dir: PathBuf,
    /// File names inside `dir`
    #[serde(flatten)]
    pub files: ArtifactFiles,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("artifacts"), files: ArtifactFiles::default() }
    }
}

/// Inference pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Status label meaning "no failure"
    pub normal_status: String,
    /// Number of ranked causes reported
    pub top_k: usize,
    /// Refuse to start when the two target decoders disagree
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub strict_decoders: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normal_status: DEFAULT_NORMAL_STATUS.to_string(),
            top_k: DEFAULT_TOP_K,
            strict_decoders: false,
        }
    }
}

impl PipelineConfig {
    /// Decoder policy for artifact loading
    pub fn decoder_policy(&self) -> DecoderPolicy {
        DecoderPolicy { normal_status: self.normal_status.clone(), strict: self.strict_decoders }
    }
}

/// Monitoring loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Delay between cycles in milliseconds
    pub interval_ms: u64,
    /// Stop after this many cycles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cycles: Option<u64>,
    /// Seed for the simulated sensor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Probability of a high-stress simulated reading
    pub stress_probability: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            max_cycles: None,
            seed: None,
            stress_probability: SimulatedSensor::DEFAULT_STRESS_PROBABILITY,
        }
    }
}

impl LoopConfig {
    /// Delay between cycles
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Simulated sensor for these settings
    pub fn sensor(&self) -> SimulatedSensor {
        let sensor = match self.seed {
            Some(seed) => SimulatedSensor::with_seed(seed),
            None => SimulatedSensor::new(),
        };
        sensor.with_stress_probability(self.stress_probability)
    }
}

/// Alert thresholds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Feature name -> threshold; a value alerts when strictly greater
    pub thresholds: ThresholdRules,
}

/// HTTP surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: "127.0.0.1:5000".to_string() }
    }
}
