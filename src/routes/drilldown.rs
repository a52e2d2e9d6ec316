//! Drill-down endpoints

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::analytics::drilldown;
use crate::error::{ApiError, ApiResult};
use crate::models::{DrilldownQuery, DrilldownResponse};
use crate::AppState;

/// Rows behind the clicked chart element.
pub async fn drilldown_rows(
    Path(id): Path<Uuid>,
    Query(query): Query<DrilldownQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<DrilldownResponse>> {
    let session = state.sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    let rows = drilldown::drill(&session.dataset, &query)?;
    Ok(Json(DrilldownResponse {
        matched: rows.len(),
        rows,
    }))
}

/// Same rows, as a CSV attachment.
pub async fn drilldown_csv(
    Path(id): Path<Uuid>,
    Query(query): Query<DrilldownQuery>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let session = state.sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    let rows = drilldown::drill(&session.dataset, &query)?;
    let body = drilldown::write_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"filtered-tickets.csv\"",
            ),
        ],
        body,
    ))
}
