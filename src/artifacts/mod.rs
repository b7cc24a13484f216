//! Trained artifacts
//!
//! The five pre-trained objects the pipeline runs on (encoder set, scaler,
//! classifier, status decoder, failure-type decoder) plus the feature schema.
//! They are produced by an external training run, loaded once, and never
//! mutated afterwards.

pub mod classifier;
mod decoder;
mod encoder;
pub mod reference;
mod scaler;
mod store;


pub use classifier::{Classifier, DecisionTree, LogisticRegression, Model, RandomForest, TreeNode};
pub use decoder::TargetDecoder;
pub use encoder::{EncoderSet, LabelEncoder};
pub use scaler::Scaler;
pub use store::{
    load_artifacts, ArtifactDocuments, ArtifactFiles, ArtifactParts, DecoderPolicy,
    TrainedArtifacts, DEFAULT_NORMAL_STATUS,
};
