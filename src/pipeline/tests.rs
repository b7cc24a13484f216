//! Inference pipeline tests

use super::*;
use crate::artifacts::{
    reference, ArtifactParts, Classifier, DecoderPolicy, EncoderSet, LabelEncoder,
    LogisticRegression, Scaler, TargetDecoder,
};
use crate::schema::{
    AIR_TEMPERATURE, MACHINE_FEATURES, PROCESS_TEMPERATURE, ROTATIONAL_SPEED, TOOL_WEAR, TORQUE,
};
use proptest::prelude::*;

fn machine_pipeline() -> InferencePipeline {
    let artifacts = reference::reference_documents()
        .into_artifacts(&DecoderPolicy::default())
        .expect("reference artifacts");
    InferencePipeline::new(Arc::new(artifacts))
}

fn machine_reading(torque: f32, wear: f32) -> Reading {
    Reading::new()
        .with(AIR_TEMPERATURE, 300.0f32)
        .with(PROCESS_TEMPERATURE, 310.0f32)
        .with(ROTATIONAL_SPEED, 1500.0f32)
        .with(TORQUE, torque)
        .with(TOOL_WEAR, wear)
}

/// Opaque binary model: failure when the second feature exceeds 100.
struct Opaque;

impl Classifier for Opaque {
    fn n_features(&self) -> usize {
        2
    }

    fn n_classes(&self) -> usize {
        2
    }

    fn predict_proba(&self, x: &[f32]) -> Vec<f32> {
        if x[1] > 100.0 {
            vec![0.0, 1.0]
        } else {
            vec![1.0, 0.0]
        }
    }
}

fn typed_pipeline(classifier: Box<dyn Classifier>) -> InferencePipeline {
    let parts = ArtifactParts {
        feature_columns: vec!["Type".to_string(), TORQUE.to_string()],
        encoders: EncoderSet::new().with(
            "Type",
            LabelEncoder::new(vec!["H".into(), "L".into(), "M".into()]).expect("unique"),
        ),
        scaler: Scaler::Identity { width: 2 },
        classifier,
        status_decoder: TargetDecoder::new(["No Failure", "Failure"]),
        failure_type_decoder: TargetDecoder::new(["No Failure", "Overstrain Failure"]),
    };
    let artifacts =
        crate::artifacts::TrainedArtifacts::new(parts, &DecoderPolicy::default()).expect("valid");
    InferencePipeline::new(Arc::new(artifacts))
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn test_low_stress_reading_is_normal() {
    let pipeline = machine_pipeline();
    let inference = pipeline.infer(&machine_reading(40.0, 50.0)).expect("valid reading");
    assert_eq!(inference.verdict, Verdict::Normal);
    assert_eq!(inference.status, "No Failure");

    let diagnosis = pipeline.diagnose(&machine_reading(40.0, 50.0)).expect("valid reading");
    assert!(diagnosis.causes.is_none());
    assert!(diagnosis.contributions.is_none());
    assert_eq!(diagnosis.alerting_features().count(), 0);
}

#[test]
fn test_high_torque_and_wear_is_failure_with_causes() {
    let pipeline = machine_pipeline();
    let diagnosis = pipeline.diagnose(&machine_reading(240.0, 590.0)).expect("valid reading");

    assert_eq!(diagnosis.verdict, Verdict::Failure("Overstrain Failure".to_string()));
    assert_eq!(diagnosis.status, "Failure");

    let causes = diagnosis.causes.as_ref().expect("forest is explainable");
    assert_eq!(causes.len(), 3);
    assert!(causes[0].feature == TORQUE || causes[0].feature == TOOL_WEAR);
    assert_eq!(diagnosis.contributions.as_ref().map(Vec::len), Some(5));

    let alerting: Vec<&str> = diagnosis.alerting_features().collect();
    assert_eq!(alerting, vec![TORQUE, TOOL_WEAR]);
}

#[test]
fn test_text_valued_reading_is_flagged_like_numbers() {
    let pipeline = machine_pipeline();
    let reading = Reading::new()
        .with(AIR_TEMPERATURE, "300")
        .with(PROCESS_TEMPERATURE, "310")
        .with(ROTATIONAL_SPEED, "1500")
        .with(TORQUE, "240")
        .with(TOOL_WEAR, " 590 ");
    let diagnosis = pipeline.diagnose(&reading).expect("numeric text parses");

    assert_eq!(diagnosis.verdict, Verdict::Failure("Overstrain Failure".to_string()));
    let alerting: Vec<&str> = diagnosis.alerting_features().collect();
    assert_eq!(alerting, vec![TORQUE, TOOL_WEAR]);
}

#[test]
fn test_extra_key_is_schema_mismatch() {
    let pipeline = machine_pipeline();
    let reading = machine_reading(40.0, 50.0).with("Humidity [%]", 45.0f32);
    let err = pipeline.diagnose(&reading).unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { ref extra, .. } if extra == &["Humidity [%]"]));
    assert!(err.is_recoverable());
}

#[test]
fn test_top_k_setting() {
    let pipeline = machine_pipeline().with_top_k(1);
    let diagnosis = pipeline.diagnose(&machine_reading(240.0, 590.0)).expect("valid reading");
    assert_eq!(diagnosis.causes.map(|c| c.len()), Some(1));
}

// ============================================================
// Encoding
// ============================================================

#[test]
fn test_encode_orders_by_schema_and_substitutes_categories() {
    let pipeline = typed_pipeline(Box::new(LogisticRegression::new(
        vec![vec![0.0, 1.0]],
        vec![-100.0],
    )));
    let reading = Reading::new().with(TORQUE, 42.0f32).with("Type", "M");
    let encoded = pipeline.encode(&reading).expect("valid reading");
    assert_eq!(encoded.as_slice(), &[2.0, 42.0]);
}

#[test]
fn test_unknown_category_is_surfaced() {
    let pipeline = typed_pipeline(Box::new(Opaque));
    let reading = Reading::new().with(TORQUE, 42.0f32).with("Type", "XL");
    let err = pipeline.infer(&reading).unwrap_err();
    assert!(matches!(err, Error::UnknownCategory { ref value, .. } if value == "XL"));
}

#[test]
fn test_invalid_numeric_is_surfaced() {
    let pipeline = typed_pipeline(Box::new(Opaque));
    let reading = Reading::new().with(TORQUE, "high").with("Type", "L");
    let err = pipeline.infer(&reading).unwrap_err();
    assert!(matches!(err, Error::InvalidNumeric { ref feature, .. } if feature == TORQUE));
}

#[test]
fn test_numeric_text_is_accepted() {
    let pipeline = typed_pipeline(Box::new(Opaque));
    let reading = Reading::new().with(TORQUE, "150").with("Type", "L");
    let inference = pipeline.infer(&reading).expect("numeric text parses");
    assert_eq!(inference.verdict, Verdict::Failure("Overstrain Failure".to_string()));
}

#[test]
fn test_opaque_model_still_delivers_verdict() {
    let pipeline = typed_pipeline(Box::new(Opaque));
    let reading = Reading::new().with(TORQUE, 150.0f32).with("Type", "H");
    let diagnosis = pipeline.diagnose(&reading).expect("verdict survives");

    assert!(diagnosis.verdict.is_failure());
    assert!(diagnosis.causes.is_none());
    assert!(diagnosis
        .explanation_unavailable
        .as_deref()
        .is_some_and(|reason| reason.contains("no sensitivity")));
}

#[test]
fn test_explain_is_unavailable_for_opaque_model() {
    let pipeline = typed_pipeline(Box::new(Opaque));
    let err = pipeline.explain(&ScaledVector::new(vec![0.0, 150.0])).unwrap_err();
    assert!(matches!(err, Error::AttributionUnavailable { .. }));
}

#[test]
fn test_clones_share_artifacts() {
    let pipeline = machine_pipeline();
    let clone = pipeline.clone();
    assert!(std::ptr::eq(pipeline.artifacts(), clone.artifacts()));
}

#[test]
fn test_concurrent_inference() {
    let pipeline = machine_pipeline();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pipeline = pipeline.clone();
            std::thread::spawn(move || {
                let wear = if i % 2 == 0 { 50.0 } else { 590.0 };
                let torque = if i % 2 == 0 { 40.0 } else { 240.0 };
                pipeline.infer(&machine_reading(torque, wear)).map(|inf| inf.verdict)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let verdict = handle.join().expect("thread").expect("valid reading");
        assert_eq!(verdict.is_failure(), i % 2 == 1);
    }
}

#[test]
fn test_diagnosis_json_shape() {
    let pipeline = machine_pipeline();
    let diagnosis = pipeline.diagnose(&machine_reading(240.0, 590.0)).expect("valid reading");
    let json = serde_json::to_value(&diagnosis).expect("serialize");
    assert_eq!(json["verdict"]["failure"], "Overstrain Failure");
    assert_eq!(json["readings"][3]["alerting"], true);
    assert!(json["causes"].is_array());
    assert!(json.get("explanation_unavailable").is_none());
}

// ============================================================
// Properties
// ============================================================

fn arb_machine_reading() -> impl Strategy<Value = Reading> {
    (290.0f32..340.0, 290.0f32..370.0, 500.0f32..5000.0, 2.0f32..250.0, 0.0f32..600.0).prop_map(
        |(air, process, speed, torque, wear)| {
            MACHINE_FEATURES.iter().copied().zip([air, process, speed, torque, wear]).collect()
        },
    )
}

proptest! {
    #[test]
    fn prop_valid_readings_always_yield_a_verdict(reading in arb_machine_reading()) {
        let pipeline = machine_pipeline();
        let inference = pipeline.infer(&reading);
        prop_assert!(inference.is_ok());
    }

    #[test]
    fn prop_infer_is_deterministic(reading in arb_machine_reading()) {
        let pipeline = machine_pipeline();
        let a = pipeline.infer(&reading).expect("valid reading");
        let b = pipeline.infer(&reading).expect("valid reading");
        prop_assert_eq!(&a.verdict, &b.verdict);
        prop_assert_eq!(a.scaled.fingerprint(), b.scaled.fingerprint());
        prop_assert_eq!(a.scaled, b.scaled);
    }

    #[test]
    fn prop_missing_feature_fails_until_restored(reading in arb_machine_reading(), drop in 0usize..5) {
        let pipeline = machine_pipeline();
        let mut partial = reading.clone();
        let removed = partial.remove(MACHINE_FEATURES[drop]).expect("present");
        let is_mismatch = matches!(pipeline.infer(&partial), Err(Error::SchemaMismatch { .. }));
        prop_assert!(is_mismatch);

        partial.insert(MACHINE_FEATURES[drop], removed);
        prop_assert!(pipeline.infer(&partial).is_ok());
    }

    #[test]
    fn prop_failure_explanations_are_stable(reading in arb_machine_reading()) {
        let pipeline = machine_pipeline();
        let inference = pipeline.infer(&reading).expect("valid reading");
        if inference.verdict.is_failure() {
            let first = pipeline.explain(&inference.scaled).expect("forest");
            let second = pipeline.explain(&inference.scaled).expect("forest");
            prop_assert_eq!(first, second);
        }
    }
}
