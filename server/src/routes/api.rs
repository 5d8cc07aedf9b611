//! Health, status and dashboard endpoints

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use sentinel_core::FleetSummary;
use serde_json::json;
use tracing::{debug, instrument};

use crate::state::AppState;

/// Unversioned routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(server_status))
}

/// Versioned routes
pub fn v1_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Health check endpoint
#[instrument]
async fn health_check() -> impl IntoResponse {
    debug!("Health check requested");
    Json(json!({
        "status": "ok",
        "service": "sentinel",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Server status endpoint
#[instrument(skip(state))]
async fn server_status(State(state): State<AppState>) -> impl IntoResponse {
    let servers = state.servers.read().await.list().len();
    let recommendations = state.recommendations.read().await.len();

    Json(json!({
        "status": "running",
        "servers": servers,
        "recommendations": recommendations,
        "advisor_enabled": state.advisor.is_some(),
        "cleanup_latency_ms": state.config.cleanup.latency_ms
    }))
}

/// Fleet summary for the dashboard
#[instrument(skip(state))]
async fn dashboard(State(state): State<AppState>) -> Json<FleetSummary> {
    let recommendations = state.recommendations.read().await.len();
    let servers = state.servers.read().await;
    Json(FleetSummary::new(servers.list(), recommendations))
}
