//! CSV upload

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;

use crate::error::{ApiError, ApiResult};
use crate::models::UploadSummary;
use crate::{ingest, AppState};

/// Accept a multipart CSV upload, parse it, and open a session for it.
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadSummary>> {
    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::UploadRead(e.to_string()))?
    {
        if field.name() != Some("file") && field.file_name().is_none() {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::UploadRead(e.to_string()))?;
        file = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) = file.ok_or(ApiError::MissingFile)?;
    let dataset = ingest::parse_csv(&bytes, Utc::now())?;

    let rows = dataset.rows.len();
    let unparsed_timestamps = dataset.unparsed_timestamps;
    let min_created = dataset.min_created;
    let max_created = dataset.max_created;

    let session_id = state.sessions.insert(filename.clone(), dataset);
    tracing::info!(%session_id, rows, filename = %filename, "dataset uploaded");

    Ok(Json(UploadSummary {
        session_id,
        filename,
        rows,
        unparsed_timestamps,
        min_created,
        max_created,
    }))
}
