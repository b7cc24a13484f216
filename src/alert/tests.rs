//! Threshold highlighting tests

use super::*;
use crate::schema::MACHINE_FEATURES;
use proptest::prelude::*;

#[test]
fn test_machine_thresholds() {
    assert!(is_alerting(TORQUE, 240.0));
    assert!(is_alerting(TOOL_WEAR, 590.0));
    assert!(is_alerting(AIR_TEMPERATURE, 330.5));
    assert!(is_alerting(PROCESS_TEMPERATURE, 351.0));
    assert!(is_alerting(ROTATIONAL_SPEED, 4001.0));

    assert!(!is_alerting(TORQUE, 40.0));
    assert!(!is_alerting(AIR_TEMPERATURE, 300.0));
}

#[test]
fn test_threshold_is_strict() {
    assert!(!is_alerting(TORQUE, 200.0));
    assert!(!is_alerting(ROTATIONAL_SPEED, 4000.0));
}

#[test]
fn test_unknown_feature_never_alerts() {
    assert!(!is_alerting("Humidity [%]", 1.0e9));
    assert!(!ThresholdRules::empty().is_alerting(TORQUE, 1.0e9));
}

#[test]
fn test_nan_never_alerts() {
    assert!(!is_alerting(TORQUE, f32::NAN));
}

#[test]
fn test_custom_rules() {
    let rules = ThresholdRules::empty().with("Vibration [mm/s]", 7.1);
    assert!(rules.is_alerting("Vibration [mm/s]", 8.0));
    assert_eq!(rules.iter().count(), 1);
}

#[test]
fn test_annotate_follows_schema_order() {
    let schema = FeatureSchema::numeric(MACHINE_FEATURES).expect("schema");
    let reading = Reading::new()
        .with(TOOL_WEAR, 590.0f32)
        .with(AIR_TEMPERATURE, 300.0f32)
        .with(PROCESS_TEMPERATURE, 310.0f32)
        .with(ROTATIONAL_SPEED, 1500.0f32)
        .with(TORQUE, 240.0f32);

    let annotated = ThresholdRules::machine().annotate(&schema, &reading);
    let names: Vec<&str> = annotated.iter().map(|a| a.feature.as_str()).collect();
    assert_eq!(names, MACHINE_FEATURES.to_vec());

    let flags: Vec<bool> = annotated.iter().map(|a| a.alerting).collect();
    assert_eq!(flags, vec![false, false, false, true, true]);
}

#[test]
fn test_annotate_parses_numeric_text() {
    let schema = FeatureSchema::numeric([TORQUE, TOOL_WEAR]).expect("schema");
    let reading = Reading::new().with(TORQUE, "240").with(TOOL_WEAR, "worn");

    let annotated = ThresholdRules::machine().annotate(&schema, &reading);
    assert!(annotated[0].alerting);
    assert!(!annotated[1].alerting);
    assert_eq!(annotated[0].value, RawValue::from("240"));
}

#[test]
fn test_rules_yaml_is_flat_map() {
    let rules: ThresholdRules = serde_yaml::from_str("\"Torque [Nm]\": 150.0\n").expect("parse");
    assert!(rules.is_alerting(TORQUE, 160.0));
    assert!(!rules.is_alerting(TOOL_WEAR, 1000.0));
}

proptest! {
    #[test]
    fn prop_is_alerting_total(feature in ".{0,40}", value in proptest::num::f32::ANY) {
        let alerting = is_alerting(&feature, value);
        if !MACHINE_FEATURES.contains(&feature.as_str()) {
            prop_assert!(!alerting);
        }
    }

    #[test]
    fn prop_alerting_matches_threshold(idx in 0usize..5, value in -1.0e4f32..1.0e4) {
        let feature = MACHINE_FEATURES[idx];
        let threshold = ThresholdRules::machine().threshold(feature).expect("configured");
        prop_assert_eq!(is_alerting(feature, value), value > threshold);
    }
}
