//! Tests for feature schema and readings

use super::*;
use crate::error::Error;
use proptest::prelude::*;

fn machine_schema() -> FeatureSchema {
    FeatureSchema::numeric(MACHINE_FEATURES).expect("schema should build")
}

fn full_reading() -> Reading {
    Reading::new()
        .with(AIR_TEMPERATURE, 300.0f32)
        .with(PROCESS_TEMPERATURE, 310.0f32)
        .with(ROTATIONAL_SPEED, 1500.0f32)
        .with(TORQUE, 40.0f32)
        .with(TOOL_WEAR, 50.0f32)
}

#[test]
fn test_schema_preserves_order() {
    let schema = machine_schema();
    let names: Vec<&str> = schema.names().collect();
    assert_eq!(names, MACHINE_FEATURES.to_vec());
    assert_eq!(schema.index_of(TORQUE), Some(3));
    assert_eq!(schema.len(), 5);
}

#[test]
fn test_schema_rejects_duplicates() {
    let err = FeatureSchema::numeric(["a", "b", "a"]).unwrap_err();
    assert!(matches!(err, Error::ArtifactShape { .. }));
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn test_schema_rejects_empty() {
    let err = FeatureSchema::numeric(Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, Error::ArtifactShape { .. }));
}

#[test]
fn test_schema_rejects_blank_name() {
    assert!(FeatureSchema::numeric(["a", "  "]).is_err());
}

#[test]
fn test_check_keys_exact_match() {
    assert!(machine_schema().check_keys(&full_reading()).is_ok());
}

#[test]
fn test_check_keys_reports_missing_in_schema_order() {
    let mut reading = full_reading();
    reading.remove(TOOL_WEAR);
    reading.remove(AIR_TEMPERATURE);

    match machine_schema().check_keys(&reading) {
        Err(Error::SchemaMismatch { missing, extra }) => {
            assert_eq!(missing, vec![AIR_TEMPERATURE.to_string(), TOOL_WEAR.to_string()]);
            assert!(extra.is_empty());
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn test_check_keys_reports_extra() {
    let reading = full_reading().with("Humidity [%]", 40.0f32);
    match machine_schema().check_keys(&reading) {
        Err(Error::SchemaMismatch { missing, extra }) => {
            assert!(missing.is_empty());
            assert_eq!(extra, vec!["Humidity [%]".to_string()]);
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn test_schema_serde_roundtrip_rebuilds_index() {
    let schema = FeatureSchema::new(vec![
        Feature::categorical("Type", EncoderId(0)),
        Feature::numeric(TORQUE),
    ])
    .expect("schema should build");
    let json = serde_json::to_string(&schema).expect("serialize");
    let back: FeatureSchema = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.index_of(TORQUE), Some(1));
    assert!(back.get(0).is_some_and(Feature::is_categorical));
}

#[test]
fn test_raw_value_parses_text_numbers() {
    assert_eq!(RawValue::from(" 42.5 ").to_number("x").ok(), Some(42.5));
    assert!(matches!(
        RawValue::from("hot").to_number("x"),
        Err(Error::InvalidNumeric { .. })
    ));
}

#[test]
fn test_raw_value_rejects_non_finite() {
    assert!(RawValue::Number(f32::NAN).to_number("x").is_err());
    assert!(RawValue::from("inf").to_number("x").is_err());
}

#[test]
fn test_from_form_converts_numeric_fields() {
    let schema = FeatureSchema::new(vec![
        Feature::numeric(TORQUE),
        Feature::categorical("Type", EncoderId(0)),
    ])
    .expect("schema should build");

    let reading =
        Reading::from_form([("Torque [Nm]", "40"), ("Type", "L"), ("Noise", "x")], &schema)
            .expect("form should parse");

    assert_eq!(reading.get(TORQUE), Some(&RawValue::Number(40.0)));
    assert_eq!(reading.get("Type"), Some(&RawValue::Text("L".into())));
    assert_eq!(reading.get("Noise"), Some(&RawValue::Text("x".into())));
}

#[test]
fn test_from_form_rejects_repeated_field() {
    let fields = [(TORQUE, "40"), (TOOL_WEAR, "50"), (TORQUE, "240")];
    let err = Reading::from_form(fields, &machine_schema()).unwrap_err();
    assert!(matches!(err, Error::DuplicateFeature { ref feature } if feature == TORQUE));
    assert_eq!(err.code(), "E103");
    assert!(err.is_recoverable());

    let err = Reading::from_form([("Noise", "a"), ("Noise", "b")], &machine_schema()).unwrap_err();
    assert!(matches!(err, Error::DuplicateFeature { ref feature } if feature == "Noise"));
}

#[test]
fn test_from_form_invalid_numeric() {
    let err = Reading::from_form([(TORQUE, "lots")], &machine_schema()).unwrap_err();
    match err {
        Error::InvalidNumeric { feature, value } => {
            assert_eq!(feature, TORQUE);
            assert_eq!(value, "lots");
        }
        other => panic!("expected InvalidNumeric, got {other:?}"),
    }
}

#[test]
fn test_reading_json_is_flat_map() {
    let reading = Reading::new().with("Type", "M").with(TORQUE, 12.5f32);
    let json = serde_json::to_value(&reading).expect("serialize");
    assert_eq!(json["Type"], "M");
    assert_eq!(json[TORQUE], 12.5);
}

proptest! {
    #[test]
    fn prop_dropping_any_feature_is_a_mismatch(drop in 0usize..5) {
        let schema = machine_schema();
        let mut reading = full_reading();
        reading.remove(MACHINE_FEATURES[drop]);
        let is_mismatch = matches!(
            schema.check_keys(&reading),
            Err(Error::SchemaMismatch { .. })
        );
        prop_assert!(is_mismatch);

        reading.insert(MACHINE_FEATURES[drop], 1.0f32);
        prop_assert!(schema.check_keys(&reading).is_ok());
    }

    #[test]
    fn prop_extra_key_is_a_mismatch(name in "[a-z]{1,12}") {
        let reading = full_reading().with(name, 0.0f32);
        let is_mismatch = matches!(
            machine_schema().check_keys(&reading),
            Err(Error::SchemaMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }
}
