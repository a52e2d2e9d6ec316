//! Error types for Support Insights

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Upload did not contain a file part
    #[error("upload is missing a file part")]
    MissingFile,

    /// Uploaded file had no content
    #[error("uploaded file is empty")]
    EmptyFile,

    /// Upload could not be read
    #[error("failed to read upload: {0}")]
    UploadRead(String),

    /// CSV could not be parsed
    #[error("malformed CSV: {0}")]
    MalformedCsv(String),

    /// A required column is absent from the header row
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Session id is unknown or expired
    #[error("session not found")]
    SessionNotFound,

    /// Drill-down query is incomplete or inconsistent
    #[error("invalid drill-down query: {0}")]
    InvalidQuery(String),

    /// CSV export failed
    #[error("export error: {0}")]
    Export(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile
            | ApiError::EmptyFile
            | ApiError::UploadRead(_)
            | ApiError::MalformedCsv(_)
            | ApiError::MissingColumn(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::MissingFile => "missing_file",
            ApiError::EmptyFile => "empty_file",
            ApiError::UploadRead(_) => "upload_read",
            ApiError::MalformedCsv(_) => "malformed_csv",
            ApiError::MissingColumn(_) => "missing_column",
            ApiError::SessionNotFound => "session_not_found",
            ApiError::InvalidQuery(_) => "invalid_query",
            ApiError::Export(_) => "export_failed",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
