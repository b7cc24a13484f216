//! Feature schema and sensor readings
//!
//! The schema is the ordered list of features the scaler and classifier were
//! fitted on. Every reading handed to the pipeline must name exactly these
//! features. Each feature carries a kind resolved once at load time, so the
//! pipeline never asks "is this categorical?" per value.

mod feature;
mod reading;

#[cfg(test)]
mod tests;

pub use feature::{EncoderId, Feature, FeatureKind, FeatureSchema};
pub use reading::{RawValue, Reading};

/// Feature names of the machine sensor set the reference model is trained on.
pub const AIR_TEMPERATURE: &str = "Air Temperature [K]";
/// Process temperature feature name.
pub const PROCESS_TEMPERATURE: &str = "Process Temperature [K]";
/// Rotational speed feature name.
pub const ROTATIONAL_SPEED: &str = "Rotational Speed [rpm]";
/// Torque feature name.
pub const TORQUE: &str = "Torque [Nm]";
/// Tool wear feature name.
pub const TOOL_WEAR: &str = "Tool Wear [min]";

/// The five machine sensor features, in training order.
pub const MACHINE_FEATURES: [&str; 5] =
    [AIR_TEMPERATURE, PROCESS_TEMPERATURE, ROTATIONAL_SPEED, TORQUE, TOOL_WEAR];
