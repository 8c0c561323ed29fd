use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub artifacts_loaded: usize,
    pub artifacts_loaded_at: DateTime<Utc>,
    pub schema_version: String,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let artifacts = &state.artifacts;
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        artifacts_loaded: artifacts.artifact_count(),
        artifacts_loaded_at: artifacts.loaded_at,
        schema_version: artifacts.schema.version.to_string(),
    };

    (StatusCode::OK, Json(response))
}
