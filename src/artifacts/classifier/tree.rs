//! Decision tree and random forest classifiers
//!
//! Trees are stored as flat node arrays. Every node keeps the class
//! distribution of the training samples that reached it, which is what path
//! attribution needs: walking root to leaf, each split's feature is credited
//! with the change in the predicted class probability it caused.

use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::error::{Error, Result};

/// One node of a flat decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal split: go left when `x[feature] <= threshold`
    Split {
        /// Feature index tested
        feature: usize,
        /// Split threshold
        threshold: f32,
        /// Left child index
        left: usize,
        /// Right child index
        right: usize,
        /// Training class distribution at this node
        distribution: Vec<f32>,
    },
    /// Terminal node
    Leaf {
        /// Training class distribution at this leaf
        distribution: Vec<f32>,
    },
}

impl TreeNode {
    /// Training class distribution at this node
    pub fn distribution(&self) -> &[f32] {
        match self {
            TreeNode::Split { distribution, .. } | TreeNode::Leaf { distribution } => distribution,
        }
    }
}

/// Normalized probability of `class` in a distribution
fn class_probability(distribution: &[f32], class: usize) -> f32 {
    let total: f32 = distribution.iter().sum();
    distribution.get(class).map_or(0.0, |v| v / total)
}

fn normalized(distribution: &[f32]) -> Vec<f32> {
    let total: f32 = distribution.iter().sum();
    distribution.iter().map(|v| v / total).collect()
}

/// Single classification tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Number of input features
    pub n_features: usize,
    /// Number of classes
    pub n_classes: usize,
    /// Nodes, root first; children always follow their parent
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Create a tree from its flat nodes
    pub fn new(n_features: usize, n_classes: usize, nodes: Vec<TreeNode>) -> Self {
        Self { n_features, n_classes, nodes }
    }

    /// Node indices visited from root to leaf
    pub fn path(&self, x: &[f32]) -> Vec<usize> {
        let mut path = vec![0];
        let mut idx = 0;
        while let Some(TreeNode::Split { feature, threshold, left, right, .. }) = self.nodes.get(idx)
        {
            idx = if x[*feature] <= *threshold { *left } else { *right };
            path.push(idx);
        }
        path
    }

    fn leaf(&self, x: &[f32]) -> &TreeNode {
        let path = self.path(x);
        &self.nodes[path[path.len() - 1]]
    }
}

impl Classifier for DecisionTree {
    /// Check structural consistency.
    ///
    /// Child indices must be greater than their parent's, so every walk ends at
    /// a leaf.
    fn check(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::shape("model", "decision tree has no nodes"));
        }
        if self.n_classes == 0 {
            return Err(Error::shape("model", "decision tree has no classes"));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            let dist = node.distribution();
            if dist.len() != self.n_classes {
                return Err(Error::shape(
                    "model",
                    format!(
                        "node {i} has {} class weights, expected {}",
                        dist.len(),
                        self.n_classes
                    ),
                ));
            }
            if dist.iter().any(|v| !v.is_finite() || *v < 0.0) || dist.iter().sum::<f32>() <= 0.0 {
                return Err(Error::shape(
                    "model",
                    format!("node {i} has an invalid class distribution"),
                ));
            }

            if let TreeNode::Split { feature, threshold, left, right, .. } = node {
                if *feature >= self.n_features {
                    return Err(Error::shape(
                        "model",
                        format!("node {i} splits on feature {feature} of {}", self.n_features),
                    ));
                }
                if !threshold.is_finite() {
                    return Err(Error::shape("model", format!("node {i} has a non-finite threshold")));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(Error::shape(
                            "model",
                            format!("node {i} has invalid child index {child}"),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, x: &[f32]) -> Vec<f32> {
        normalized(self.leaf(x).distribution())
    }

    fn contributions(&self, x: &[f32], class: usize) -> Option<Vec<f32>> {
        if class >= self.n_classes {
            return None;
        }

        let mut contributions = vec![0.0; self.n_features];
        let path = self.path(x);
        for pair in path.windows(2) {
            let (parent, child) = (&self.nodes[pair[0]], &self.nodes[pair[1]]);
            if let TreeNode::Split { feature, .. } = parent {
                contributions[*feature] += class_probability(child.distribution(), class)
                    - class_probability(parent.distribution(), class);
            }
        }
        Some(contributions)
    }

    fn describe(&self) -> String {
        format!("decision_tree({} nodes, {} classes)", self.nodes.len(), self.n_classes)
    }
}

/// Ensemble of trees whose probabilities and contributions are averaged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    /// Member trees
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Create a forest from member trees
    pub fn new(trees: Vec<DecisionTree>) -> Self {
        Self { trees }
    }

    fn average(&self, per_tree: impl Iterator<Item = Vec<f32>>, width: usize) -> Vec<f32> {
        let mut sum = vec![0.0; width];
        for values in per_tree {
            for (s, v) in sum.iter_mut().zip(values) {
                *s += v;
            }
        }
        let n = self.trees.len() as f32;
        sum.into_iter().map(|s| s / n).collect()
    }
}

impl Classifier for RandomForest {
    /// Check every tree and that all trees agree on shape
    fn check(&self) -> Result<()> {
        let first = self
            .trees
            .first()
            .ok_or_else(|| Error::shape("model", "random forest has no trees"))?;

        for (i, tree) in self.trees.iter().enumerate() {
            tree.check()?;
            if tree.n_features != first.n_features || tree.n_classes != first.n_classes {
                return Err(Error::shape(
                    "model",
                    format!("tree {i} shape differs from tree 0"),
                ));
            }
        }
        Ok(())
    }

    fn n_features(&self) -> usize {
        self.trees.first().map_or(0, |t| t.n_features)
    }

    fn n_classes(&self) -> usize {
        self.trees.first().map_or(0, |t| t.n_classes)
    }

    fn predict_proba(&self, x: &[f32]) -> Vec<f32> {
        self.average(self.trees.iter().map(|t| t.predict_proba(x)), self.n_classes())
    }

    fn contributions(&self, x: &[f32], class: usize) -> Option<Vec<f32>> {
        let per_tree: Option<Vec<Vec<f32>>> =
            self.trees.iter().map(|t| t.contributions(x, class)).collect();
        Some(self.average(per_tree?.into_iter(), self.n_features()))
    }

    fn describe(&self) -> String {
        format!("random_forest({} trees, {} classes)", self.trees.len(), self.n_classes())
    }
}
