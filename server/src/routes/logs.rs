//! Action log endpoint

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tracing::instrument;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_logs))
}

/// Action log, newest first
#[instrument(skip(state))]
async fn list_logs(State(state): State<AppState>) -> impl IntoResponse {
    let log = state.log.read().await;
    Json(json!({
        "logs": log.newest_first()
    }))
}
