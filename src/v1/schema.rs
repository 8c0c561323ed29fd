use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::schema::FeatureSchema;
use crate::AppState;

#[derive(Serialize)]
pub struct SchemaResponse {
    #[serde(flatten)]
    pub schema: FeatureSchema,
    pub feature_order: Vec<String>,
}

/// The versioned input contract: field kinds for callers, plus the exact
/// feature order the loaded model expects after alignment.
pub async fn get_schema(State(state): State<AppState>) -> impl IntoResponse {
    let response = SchemaResponse {
        schema: state.artifacts.schema.clone(),
        feature_order: state.artifacts.feature_names.clone(),
    };

    (StatusCode::OK, Json(response))
}
