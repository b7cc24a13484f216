//! Logistic regression classifier

use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::error::{Error, Result};

/// Linear classifier with logistic (binary) or softmax (multi-class) link.
///
/// A single coefficient row is a binary model whose row scores class 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Coefficient rows, one per class (or one for binary)
    pub coefficients: Vec<Vec<f32>>,
    /// Intercepts, one per row
    pub intercepts: Vec<f32>,
}

impl LogisticRegression {
    /// Create a model from coefficient rows and intercepts
    pub fn new(coefficients: Vec<Vec<f32>>, intercepts: Vec<f32>) -> Self {
        Self { coefficients, intercepts }
    }

    fn is_binary(&self) -> bool {
        self.coefficients.len() == 1
    }

    fn logits(&self, x: &[f32]) -> Vec<f32> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| row.iter().zip(x).map(|(w, v)| w * v).sum::<f32>() + b)
            .collect()
    }
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl Classifier for LogisticRegression {
    /// Check structural consistency
    fn check(&self) -> Result<()> {
        let width = self.n_features();
        if self.coefficients.is_empty() || width == 0 {
            return Err(Error::shape("model", "logistic model has no coefficients"));
        }
        if self.coefficients.len() != self.intercepts.len() {
            return Err(Error::shape(
                "model",
                format!(
                    "{} coefficient rows but {} intercepts",
                    self.coefficients.len(),
                    self.intercepts.len()
                ),
            ));
        }
        if self.coefficients.iter().any(|row| row.len() != width) {
            return Err(Error::shape("model", "coefficient rows differ in length"));
        }
        if self.coefficients.iter().flatten().chain(&self.intercepts).any(|v| !v.is_finite()) {
            return Err(Error::shape("model", "coefficients must be finite"));
        }
        Ok(())
    }

    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn n_classes(&self) -> usize {
        if self.is_binary() {
            2
        } else {
            self.coefficients.len()
        }
    }

    fn predict_proba(&self, x: &[f32]) -> Vec<f32> {
        let logits = self.logits(x);
        if self.is_binary() {
            let p1 = sigmoid(logits[0]);
            vec![1.0 - p1, p1]
        } else {
            softmax(&logits)
        }
    }

    /// `coefficient[i] * x[i]` in logit space. Inputs are scaled, so the
    /// reference point is the training mean.
    fn contributions(&self, x: &[f32], class: usize) -> Option<Vec<f32>> {
        let (row, sign) = if self.is_binary() {
            (&self.coefficients[0], if class == 1 { 1.0 } else { -1.0 })
        } else {
            (self.coefficients.get(class)?, 1.0)
        };
        Some(row.iter().zip(x).map(|(w, v)| sign * w * v).collect())
    }

    fn describe(&self) -> String {
        format!("logistic({} features, {} classes)", self.n_features(), self.n_classes())
    }
}
