//! Fitted numeric transforms applied to the encoded vector

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A fitted, per-feature scaler.
///
/// Zero scales (constant features at fit time) are treated as 1 so the
/// transform never divides by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// Standardization: `(x - mean) / scale`
    Standard {
        /// Per-feature mean
        mean: Vec<f32>,
        /// Per-feature standard deviation
        scale: Vec<f32>,
    },
    /// Min-max normalization: `(x - data_min) / data_range`
    MinMax {
        /// Per-feature minimum seen at fit time
        data_min: Vec<f32>,
        /// Per-feature range seen at fit time
        data_range: Vec<f32>,
    },
    /// Pass-through for models trained on unscaled inputs
    Identity {
        /// Expected vector width
        width: usize,
    },
}

impl Scaler {
    /// Vector width this scaler was fitted on
    pub fn width(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { data_min, .. } => data_min.len(),
            Scaler::Identity { width } => *width,
        }
    }

    /// Check internal consistency of the fitted parameters
    pub fn check(&self) -> Result<()> {
        let (a, b) = match self {
            Scaler::Standard { mean, scale } => (mean, scale),
            Scaler::MinMax { data_min, data_range } => (data_min, data_range),
            Scaler::Identity { .. } => return Ok(()),
        };

        if a.len() != b.len() {
            return Err(Error::shape(
                "scaler",
                format!("parameter lengths differ ({} vs {})", a.len(), b.len()),
            ));
        }
        if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
            return Err(Error::shape("scaler", "parameters must be finite"));
        }
        Ok(())
    }

    /// Apply the fitted transform. `x` must have `width()` entries.
    pub fn transform(&self, x: &[f32]) -> Vec<f32> {
        match self {
            Scaler::Standard { mean, scale } => affine(x, mean, scale),
            Scaler::MinMax { data_min, data_range } => affine(x, data_min, data_range),
            Scaler::Identity { .. } => x.to_vec(),
        }
    }
}

fn affine(x: &[f32], offset: &[f32], scale: &[f32]) -> Vec<f32> {
    x.iter()
        .zip(offset.iter().zip(scale.iter()))
        .map(|(&v, (&o, &s))| {
            let s = if s == 0.0 { 1.0 } else { s };
            (v - o) / s
        })
        .collect()
}
