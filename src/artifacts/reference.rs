//! Reference machine model
//!
//! A small hand-built random forest over the five machine sensor features.
//! It flags high torque with high tool wear as overstrain, high wear alone as
//! tool wear failure, and high temperatures as heat dissipation failure. Used
//! by `vigilar init` to seed an artifact directory and by the demo mode.

use std::collections::BTreeMap;

use super::classifier::{DecisionTree, Model, RandomForest, TreeNode};
use super::decoder::TargetDecoder;
use super::scaler::Scaler;
use super::store::{ArtifactDocuments, DEFAULT_NORMAL_STATUS};
use crate::schema::MACHINE_FEATURES;

const AIR: usize = 0;
const PROCESS: usize = 1;
const SPEED: usize = 2;
const TORQUE: usize = 3;
const WEAR: usize = 4;

/// Failure types by class id
pub const FAILURE_TYPES: [&str; 4] =
    [DEFAULT_NORMAL_STATUS, "Overstrain Failure", "Tool Wear Failure", "Heat Dissipation Failure"];

enum Shape {
    Leaf([f32; 4]),
    Split(usize, f32, Box<Shape>, Box<Shape>),
}

fn leaf(counts: [f32; 4]) -> Box<Shape> {
    Box::new(Shape::Leaf(counts))
}

fn split(feature: usize, threshold: f32, left: Box<Shape>, right: Box<Shape>) -> Box<Shape> {
    Box::new(Shape::Split(feature, threshold, left, right))
}

/// Flatten in pre-order so children always follow their parent. Split
/// distributions are the sum of their children's.
fn flatten(shape: &Shape, nodes: &mut Vec<TreeNode>) -> [f32; 4] {
    match shape {
        Shape::Leaf(counts) => {
            nodes.push(TreeNode::Leaf { distribution: counts.to_vec() });
            *counts
        }
        Shape::Split(feature, threshold, left, right) => {
            let idx = nodes.len();
            nodes.push(TreeNode::Leaf { distribution: Vec::new() });
            let left_idx = nodes.len();
            let l = flatten(left, nodes);
            let right_idx = nodes.len();
            let r = flatten(right, nodes);
            let mut total = [0.0; 4];
            for (t, (a, b)) in total.iter_mut().zip(l.iter().zip(r.iter())) {
                *t = a + b;
            }
            nodes[idx] = TreeNode::Split {
                feature: *feature,
                threshold: *threshold,
                left: left_idx,
                right: right_idx,
                distribution: total.to_vec(),
            };
            total
        }
    }
}

fn tree(shape: Box<Shape>) -> DecisionTree {
    let mut nodes = Vec::new();
    flatten(&shape, &mut nodes);
    DecisionTree::new(MACHINE_FEATURES.len(), FAILURE_TYPES.len(), nodes)
}

/// Standardization fitted on nominal operating data.
pub fn reference_scaler() -> Scaler {
    Scaler::Standard {
        mean: vec![300.0, 310.0, 1540.0, 40.0, 108.0],
        scale: vec![2.0, 1.5, 180.0, 10.0, 64.0],
    }
}

/// Thresholds are in scaled units: torque 12 ≈ 160 Nm, wear 6.5 ≈ 524 min,
/// air 15 = 330 K, process 26 = 349 K, speed 13.9 ≈ 4042 rpm.
pub fn reference_model() -> Model {
    let torque_first = split(
        TORQUE,
        12.0,
        split(WEAR, 6.5, leaf([90.0, 2.0, 3.0, 5.0]), leaf([10.0, 20.0, 65.0, 5.0])),
        split(WEAR, 6.5, leaf([40.0, 45.0, 10.0, 5.0]), leaf([2.0, 85.0, 10.0, 3.0])),
    );
    let wear_first = split(
        WEAR,
        6.5,
        split(PROCESS, 26.0, leaf([92.0, 3.0, 2.0, 3.0]), leaf([15.0, 5.0, 5.0, 75.0])),
        split(TORQUE, 12.0, leaf([10.0, 15.0, 70.0, 5.0]), leaf([3.0, 80.0, 15.0, 2.0])),
    );
    let thermal = split(
        AIR,
        15.0,
        split(SPEED, 13.9, leaf([88.0, 4.0, 4.0, 4.0]), leaf([30.0, 50.0, 10.0, 10.0])),
        leaf([10.0, 5.0, 5.0, 80.0]),
    );

    Model::RandomForest(RandomForest::new(vec![tree(torque_first), tree(wear_first), tree(thermal)]))
}

/// Complete artifact documents for the reference machine model.
pub fn reference_documents() -> ArtifactDocuments {
    let status = FAILURE_TYPES
        .iter()
        .map(|t| if *t == DEFAULT_NORMAL_STATUS { DEFAULT_NORMAL_STATUS } else { "Failure" });

    ArtifactDocuments {
        feature_columns: MACHINE_FEATURES.iter().map(|s| s.to_string()).collect(),
        label_encoders: BTreeMap::new(),
        scaler: reference_scaler(),
        model: reference_model(),
        target_encoder: TargetDecoder::new(status),
        failure_type_encoder: TargetDecoder::new(FAILURE_TYPES),
    }
}
