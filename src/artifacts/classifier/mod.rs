//! Trained classifiers
//!
//! A classifier maps a scaled vector to a class id. Models that can report
//! how much each feature moved the prediction implement `contributions`;
//! opaque models keep the default and yield no explanation.

mod linear;
mod tree;


pub use linear::LogisticRegression;
pub use tree::{DecisionTree, RandomForest, TreeNode};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Trained decision model: scaled vector in, class id out.
///
/// Every `x` passed in has exactly `n_features()` entries. Loading calls
/// `check` first, so the other methods may index without bounds checks.
pub trait Classifier: Send + Sync {
    /// Structural consistency: feature indices in range, walks terminate
    fn check(&self) -> Result<()> {
        Ok(())
    }

    /// Number of input features
    fn n_features(&self) -> usize;

    /// Number of output classes
    fn n_classes(&self) -> usize;

    /// Class probabilities, one per class
    fn predict_proba(&self, x: &[f32]) -> Vec<f32>;

    /// Most probable class id (lowest id wins ties)
    fn predict(&self, x: &[f32]) -> usize {
        argmax(&self.predict_proba(x))
    }

    /// Per-feature signed contribution to the probability of `class` for this
    /// instance, or `None` when the model offers no introspection.
    fn contributions(&self, _x: &[f32], _class: usize) -> Option<Vec<f32>> {
        None
    }

    /// Short model description for logs
    fn describe(&self) -> String {
        format!("classifier({} features, {} classes)", self.n_features(), self.n_classes())
    }
}

/// Index of the first maximum
pub(crate) fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Serialized classifier artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    /// Linear model with logistic/softmax link
    Logistic(LogisticRegression),
    /// Single decision tree
    DecisionTree(DecisionTree),
    /// Averaged ensemble of decision trees
    RandomForest(RandomForest),
}

impl Model {
    fn inner(&self) -> &dyn Classifier {
        match self {
            Model::Logistic(m) => m,
            Model::DecisionTree(m) => m,
            Model::RandomForest(m) => m,
        }
    }
}

impl Classifier for Model {
    fn check(&self) -> Result<()> {
        self.inner().check()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn n_classes(&self) -> usize {
        self.inner().n_classes()
    }

    fn predict_proba(&self, x: &[f32]) -> Vec<f32> {
        self.inner().predict_proba(x)
    }

    fn predict(&self, x: &[f32]) -> usize {
        self.inner().predict(x)
    }

    fn contributions(&self, x: &[f32], class: usize) -> Option<Vec<f32>> {
        self.inner().contributions(x, class)
    }

    fn describe(&self) -> String {
        self.inner().describe()
    }
}
