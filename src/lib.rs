//! Vigilar: predictive maintenance inference with ranked failure causes.
//!
//! Turns machine sensor readings into a health verdict and, when a failure is
//! predicted, a ranked list of the measurements that most likely caused it.
//!
//! ```text
//! reading → encode → scale → classify → decode → verdict
//!                      │                            │ failure
//!                      └──────── attribute ─────────┴──→ ranked causes
//! ```
//!
//! - [`schema`]: feature schema and readings
//! - [`artifacts`]: encoders, scaler, classifier, decoders, and their store
//! - [`pipeline`]: the inference pipeline and its `Diagnosis`
//! - [`explain`]: attribution engine
//! - [`alert`]: threshold highlighting
//! - [`monitor`]: the sequential monitoring loop
//! - [`server`]: one-shot HTTP mode (feature `server`)
//!
//! # Toyota Way Principles
//!
//! - **Jidoka**: a reading that violates the schema stops at the first step
//!   with an error naming the offending features
//! - **Andon**: every error carries a code and an actionable hint

pub mod alert;
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod explain;
pub mod monitor;
pub mod pipeline;
pub mod schema;
pub mod server;

pub use error::{Error, Result};
pub use explain::{Attribution, FeatureScore};
pub use monitor::{LoopControl, MonitoringLoop, ReadingSource, SimulatedSensor};
pub use pipeline::{Diagnosis, InferencePipeline, Verdict};
pub use schema::{FeatureSchema, RawValue, Reading};
