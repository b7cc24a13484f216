//! HTTP request handlers
//!
//! Axum handlers for the prediction API.

use axum::{extract::State, http::StatusCode, Form, Json};

use crate::error::Error;
use crate::pipeline::Diagnosis;
use crate::schema::{FeatureKind, Reading};
use crate::server::{state::AppState, ApiResponse, FeatureInfo, HealthResponse};

type PredictResponse = (StatusCode, Json<ApiResponse<Diagnosis>>);

/// Generate a request ID
fn request_id() -> String {
    format!("req-{:016x}", rand::random::<u64>())
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let artifacts = state.pipeline.artifacts();
    let features = artifacts
        .schema()
        .features()
        .iter()
        .map(|feature| match feature.kind {
            FeatureKind::Numeric => FeatureInfo {
                name: feature.name.clone(),
                kind: "numeric".to_string(),
                categories: Vec::new(),
            },
            FeatureKind::Categorical(id) => FeatureInfo {
                name: feature.name.clone(),
                kind: "categorical".to_string(),
                categories: artifacts
                    .encoders()
                    .get(id)
                    .map(|encoder| encoder.classes().to_vec())
                    .unwrap_or_default(),
            },
        })
        .collect();

    let health = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        classifier: artifacts.classifier().describe(),
        features,
    };

    (StatusCode::OK, Json(health))
}

fn respond(state: &AppState, reading: Result<Reading, Error>, req_id: &str) -> PredictResponse {
    match reading.and_then(|reading| state.pipeline.diagnose(&reading)) {
        Ok(diagnosis) => {
            tracing::info!(request_id = req_id, verdict = %diagnosis.verdict, "prediction served");
            (StatusCode::OK, Json(ApiResponse::success(diagnosis, req_id)))
        }
        Err(e) => {
            let status = if e.is_recoverable() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            tracing::warn!(request_id = req_id, code = e.code(), error = %e, "prediction rejected");
            (status, Json(ApiResponse::from_error(&e, req_id)))
        }
    }
}

/// Predict from an urlencoded form of string values
pub async fn predict_form(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> PredictResponse {
    let req_id = request_id();
    let reading = Reading::from_form(fields, state.pipeline.schema());
    respond(&state, reading, &req_id)
}

/// Predict from a JSON object of string or number values
pub async fn predict_json(
    State(state): State<AppState>,
    Json(reading): Json<Reading>,
) -> PredictResponse {
    let req_id = request_id();
    respond(&state, Ok(reading), &req_id)
}
