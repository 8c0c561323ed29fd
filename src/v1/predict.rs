use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Form, Json,
};
use serde::Serialize;

use crate::advisory;
use crate::artifact::Prediction;
use crate::error::ApiError;
use crate::record::HealthRecord;
use crate::render;
use crate::AppState;

#[derive(Serialize)]
pub struct PredictResponse {
    pub prediction: Prediction,
    pub warnings: Vec<&'static str>,
    pub schema_version: String,
}

/// GET / — the input form.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render::form_page(&state.artifacts.schema))
}

/// POST /predict — urlencoded form fields, HTML result page back.
pub async fn predict_form(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let record = HealthRecord::from_pairs(fields);
    if record.is_empty() {
        return Err(ApiError::InvalidField {
            field: "form".to_string(),
            reason: "no fields submitted".to_string(),
        });
    }

    let warnings = advisory::check(&record);
    let prediction = state.artifacts.predict(&record);
    tracing::info!(%prediction, warnings = warnings.len(), "form prediction served");

    Ok(Html(render::result_page(&prediction, &warnings)))
}

/// POST /v1/predict — JSON record in, prediction plus warnings out.
pub async fn predict_json(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<impl IntoResponse, ApiError> {
    let record = HealthRecord::from_json_map(&body)?;
    let warnings = advisory::check(&record);
    let prediction = state.artifacts.predict(&record);
    tracing::info!(%prediction, warnings = warnings.len(), "json prediction served");

    let response = PredictResponse {
        prediction,
        warnings,
        schema_version: state.artifacts.schema.version.to_string(),
    };

    Ok((StatusCode::OK, Json(response)))
}
