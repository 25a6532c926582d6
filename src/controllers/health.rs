use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::config::Config;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness report. Missing provider keys are reported but do not make the
/// service unready: both providers degrade to placeholder output.
pub async fn health_ready(State(config): State<Arc<Config>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "timestamp": Utc::now().to_rfc3339(),
            "model": if config.has_model_credentials() { "configured" } else { "missing_api_key" },
            "tts": if config.has_tts_credentials() { "configured" } else { "missing_api_key" },
        })),
    )
}
