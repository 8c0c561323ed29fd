use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures while loading artifacts from disk at startup.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("inconsistent artifacts: {0}")]
    Mismatch(String),
}

/// Request-level failures, mapped onto the HTTP status taxonomy.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("no file uploaded")]
    MissingUpload,

    #[error("empty filename")]
    EmptyFilename,

    #[error("missing columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("CSV contains no data rows")]
    EmptyCsv,

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("malformed upload: {0}")]
    BadUpload(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUpload
            | ApiError::EmptyFilename
            | ApiError::MissingColumns { .. }
            | ApiError::EmptyCsv
            | ApiError::Csv(_)
            | ApiError::InvalidField { .. }
            | ApiError::BadUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_columns: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let missing_columns = match &self {
            ApiError::MissingColumns { columns } => Some(columns.clone()),
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            missing_columns,
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadUpload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_names_in_message() {
        let err = ApiError::MissingColumns {
            columns: vec!["Age".to_string(), "BMI".to_string()],
        };
        assert_eq!(err.to_string(), "missing columns: Age, BMI");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_500() {
        let err = ApiError::Internal("boom".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
