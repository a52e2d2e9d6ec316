//! Report endpoint

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::analytics;
use crate::error::{ApiError, ApiResult};
use crate::models::{DateRange, Report};
use crate::AppState;

/// Build the full report for a session, optionally date-filtered.
pub async fn get_report(
    Path(id): Path<Uuid>,
    Query(range): Query<DateRange>,
    State(state): State<AppState>,
) -> ApiResult<Json<Report>> {
    let session = state.sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    Ok(Json(analytics::build_report(&session.dataset, range)))
}
