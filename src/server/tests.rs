//! Handler tests
//!
//! Handlers are called directly with extracted state and bodies.

use super::*;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Form, Json};
use std::sync::Arc;

use crate::artifacts::{
    reference, ArtifactParts, DecoderPolicy, EncoderSet, LabelEncoder, LogisticRegression, Scaler,
    TargetDecoder, TrainedArtifacts,
};
use crate::pipeline::{InferencePipeline, Verdict};
use crate::schema::{
    Reading, AIR_TEMPERATURE, PROCESS_TEMPERATURE, ROTATIONAL_SPEED, TOOL_WEAR, TORQUE,
};

fn machine_state() -> AppState {
    let artifacts = reference::reference_documents()
        .into_artifacts(&DecoderPolicy::default())
        .expect("reference artifacts should assemble");
    AppState::new(InferencePipeline::new(Arc::new(artifacts)))
}

/// Binary model over a categorical "Type" and torque: fails when torque > 100.
fn typed_state() -> AppState {
    let parts = ArtifactParts {
        feature_columns: vec!["Type".to_string(), TORQUE.to_string()],
        encoders: EncoderSet::new().with(
            "Type",
            LabelEncoder::new(vec!["H".into(), "L".into(), "M".into()])
                .expect("classes are unique"),
        ),
        scaler: Scaler::Identity { width: 2 },
        classifier: Box::new(LogisticRegression::new(vec![vec![0.0, 1.0]], vec![-100.0])),
        status_decoder: TargetDecoder::new(["No Failure", "Failure"]),
        failure_type_decoder: TargetDecoder::new(["No Failure", "Overstrain Failure"]),
    };
    let artifacts =
        TrainedArtifacts::new(parts, &DecoderPolicy::default()).expect("parts are consistent");
    AppState::new(InferencePipeline::new(Arc::new(artifacts)))
}

fn form(pairs: &[(&str, &str)]) -> Form<Vec<(String, String)>> {
    Form(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
}

fn stressed_form() -> Form<Vec<(String, String)>> {
    form(&[
        (AIR_TEMPERATURE, "300"),
        (PROCESS_TEMPERATURE, "310"),
        (ROTATIONAL_SPEED, "1500"),
        (TORQUE, "240"),
        (TOOL_WEAR, "590"),
    ])
}

#[tokio::test]
async fn test_health_lists_schema() {
    let (status, Json(health)) = health_check(State(typed_state())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.features.len(), 2);
    assert_eq!(health.features[0].name, "Type");
    assert_eq!(health.features[0].kind, "categorical");
    assert_eq!(health.features[0].categories, vec!["H", "L", "M"]);
    assert_eq!(health.features[1].kind, "numeric");
    assert!(health.classifier.starts_with("logistic"));
}

#[tokio::test]
async fn test_form_predict_failure_with_causes() {
    let (status, Json(response)) = predict_form(State(machine_state()), stressed_form()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.success);
    assert!(response.request_id.starts_with("req-"));

    let diagnosis = response.data.expect("successful response carries a diagnosis");
    assert_eq!(diagnosis.verdict, Verdict::Failure("Overstrain Failure".into()));
    let causes = diagnosis.causes.expect("failure should be explained");
    assert_eq!(causes[0].feature, TORQUE);
    assert_eq!(causes[1].feature, TOOL_WEAR);
}

#[tokio::test]
async fn test_form_invalid_numeric_is_422() {
    let mut fields = stressed_form();
    fields.0[3].1 = "a lot".to_string();
    let (status, Json(response)) = predict_form(State(machine_state()), fields).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!response.success);
    assert_eq!(response.error_code.as_deref(), Some("E102"));
}

#[tokio::test]
async fn test_form_unknown_category_is_422() {
    let (status, Json(response)) =
        predict_form(State(typed_state()), form(&[("Type", "XL"), (TORQUE, "50")])).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code.as_deref(), Some("E101"));
    assert!(response.error.as_deref().is_some_and(|m| m.contains("'XL'")));
}

#[tokio::test]
async fn test_form_missing_field_is_schema_mismatch() {
    let (status, Json(response)) =
        predict_form(State(typed_state()), form(&[(TORQUE, "50")])).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code.as_deref(), Some("E100"));
}

#[tokio::test]
async fn test_form_repeated_field_is_422() {
    let (status, Json(response)) = predict_form(
        State(typed_state()),
        form(&[("Type", "L"), (TORQUE, "50"), (TORQUE, "250")]),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code.as_deref(), Some("E103"));
}

#[tokio::test]
async fn test_json_predict_accepts_numbers_and_strings() {
    let reading = Reading::new().with("Type", "L").with(TORQUE, 150.0f32);
    let (status, Json(response)) = predict_json(State(typed_state()), Json(reading)).await;
    assert_eq!(status, StatusCode::OK);
    let diagnosis = response.data.expect("successful response carries a diagnosis");
    assert!(diagnosis.verdict.is_failure());

    let reading = Reading::new().with("Type", "H").with(TORQUE, "20");
    let (_, Json(response)) = predict_json(State(typed_state()), Json(reading)).await;
    let diagnosis = response.data.expect("successful response carries a diagnosis");
    assert_eq!(diagnosis.verdict, Verdict::Normal);
}

#[tokio::test]
async fn test_concurrent_requests_share_artifacts() {
    let state = machine_state();
    let mut handles = Vec::new();
    for i in 0..8 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            let torque = if i % 2 == 0 { "40" } else { "240" };
            let wear = if i % 2 == 0 { "50" } else { "590" };
            let fields = form(&[
                (AIR_TEMPERATURE, "300"),
                (PROCESS_TEMPERATURE, "310"),
                (ROTATIONAL_SPEED, "1500"),
                (TORQUE, torque),
                (TOOL_WEAR, wear),
            ]);
            let (_, Json(response)) = predict_form(State(state), fields).await;
            (i, response.data.expect("valid reading").verdict)
        }));
    }

    for handle in handles {
        let (i, verdict) = handle.await.expect("task should not panic");
        assert_eq!(verdict.is_failure(), i % 2 == 1);
    }
}

#[tokio::test]
async fn test_router_builds() {
    let _router = router(machine_state());
}
