use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use csv::ReaderBuilder;
use serde::Serialize;
use uuid::Uuid;

use crate::advisory;
use crate::artifact::Prediction;
use crate::error::ApiError;
use crate::record::HealthRecord;
use crate::render;
use crate::AppState;

struct ParsedCsv {
    headers: Vec<String>,
    records: Vec<HealthRecord>,
    raw_rows: Vec<Vec<String>>,
}

/// Pulls the `file` part out of a multipart upload. Missing part and empty
/// filename are distinct 400s, matching the upload error taxonomy.
async fn read_upload(multipart: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }
        tracing::debug!(filename, "csv upload received");
        return Ok(field.bytes().await?.to_vec());
    }
    Err(ApiError::MissingUpload)
}

/// Parses the upload and validates its header against the schema before any
/// row is turned into a record.
fn parse_csv(bytes: &[u8], state: &AppState) -> Result<ParsedCsv, ApiError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let missing = state.artifacts.schema.missing_columns(&headers);
    if !missing.is_empty() {
        return Err(ApiError::MissingColumns { columns: missing });
    }

    let header_record = reader.headers()?.clone();
    let mut records = Vec::new();
    let mut raw_rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(HealthRecord::from_csv_row(&header_record, &row));
        raw_rows.push(row.iter().map(str::to_string).collect());
    }

    if records.is_empty() {
        return Err(ApiError::EmptyCsv);
    }

    Ok(ParsedCsv {
        headers,
        records,
        raw_rows,
    })
}

fn label_counts(predictions: &[Prediction]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for prediction in predictions {
        if let Prediction::Label(label) = prediction {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// POST /predict/csv — browser flow, HTML table back.
pub async fn predict_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = read_upload(&mut multipart).await?;
    let parsed = parse_csv(&bytes, &state)?;

    let predictions: Vec<Prediction> = parsed
        .records
        .iter()
        .map(|r| state.artifacts.predict(r))
        .collect();
    tracing::info!(rows = predictions.len(), "csv batch predicted");

    let counts = label_counts(&predictions);
    let rows: Vec<Vec<String>> = parsed
        .raw_rows
        .into_iter()
        .zip(&predictions)
        .map(|(mut row, prediction)| {
            row.push(prediction.to_string());
            row
        })
        .collect();

    Ok(Html(render::batch_page(&parsed.headers, &rows, &counts)))
}

#[derive(Serialize)]
pub struct BatchRow {
    pub record: HealthRecord,
    pub prediction: Prediction,
    pub warnings: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct BatchPredictResponse {
    pub batch_id: Uuid,
    pub rows: Vec<BatchRow>,
    pub label_counts: BTreeMap<String, usize>,
}

/// POST /v1/predict/batch — API flow, JSON rows back.
pub async fn predict_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = read_upload(&mut multipart).await?;
    let parsed = parse_csv(&bytes, &state)?;

    let rows: Vec<BatchRow> = parsed
        .records
        .into_iter()
        .map(|record| {
            let prediction = state.artifacts.predict(&record);
            let warnings = advisory::check(&record);
            BatchRow {
                record,
                prediction,
                warnings,
            }
        })
        .collect();

    let predictions: Vec<Prediction> = rows.iter().map(|r| r.prediction.clone()).collect();
    let batch_id = Uuid::new_v4();
    tracing::info!(%batch_id, rows = rows.len(), "batch prediction served");

    let response = BatchPredictResponse {
        batch_id,
        rows,
        label_counts: label_counts(&predictions),
    };

    Ok((StatusCode::OK, Json(response)))
}
