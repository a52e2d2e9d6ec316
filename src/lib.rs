//! Support Insights
//!
//! Browser-based analytics dashboard for support-ticket CSV exports.
//! A user uploads an export, the server parses timestamps and agent
//! metadata, computes the aggregate views (status breakdowns, category
//! rankings, aging, weekly trends, Jira cross-references), and lets the
//! page drill into — and download — the rows behind any chart element.

pub mod analytics;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::state::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(
                config.session_ttl_minutes,
                config.max_sessions,
            )),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(routes::pages::index))
        .route("/health", get(routes::health::health_check))
        .route("/api/upload", post(routes::upload::upload_csv))
        .route("/api/sessions/:id/report", get(routes::report::get_report))
        .route(
            "/api/sessions/:id/drilldown",
            get(routes::drilldown::drilldown_rows),
        )
        .route(
            "/api/sessions/:id/drilldown.csv",
            get(routes::drilldown::drilldown_csv),
        )
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
