use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

pub mod advisory;
pub mod artifact;
pub mod error;
pub mod record;
pub mod render;
pub mod schema;
pub mod v1;

use artifact::ModelArtifacts;

/// Shared per-request state. Artifacts are loaded once at startup and never
/// mutated, so plain `Arc` sharing with no lock is enough.
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<ModelArtifacts>,
}

impl AppState {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(v1::health_check))
        .route("/", get(v1::index))
        .route("/predict", post(v1::predict_form))
        .route("/predict/csv", post(v1::predict_csv))
        .route("/v1/schema", get(v1::get_schema))
        .route("/v1/predict", post(v1::predict_json))
        .route("/v1/predict/batch", post(v1::predict_batch))
        .with_state(state)
}
