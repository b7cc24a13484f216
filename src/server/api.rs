//! Router and listener

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health_check, predict_form, predict_json};
use super::state::AppState;
use super::{Result, ServerError};
use crate::pipeline::InferencePipeline;

/// Build the prediction router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .with_state(state)
}

/// Serve predictions until Ctrl-C
pub async fn serve(address: &str, pipeline: InferencePipeline) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| ServerError::Bind(format!("{address}: {e}")))?;
    tracing::info!(address = %listener.local_addr()?, "serving predictions");

    axum::serve(listener, router(AppState::new(pipeline)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
    }
}
