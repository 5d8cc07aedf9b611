//! Recommendation and deletion advice endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use sentinel_core::{advisor::ADVICE_UNAVAILABLE, Advice, AdviceRequest, DeletionAdvisor};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::error_response;
use crate::state::AppState;

/// Create recommendations API router
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(list_recommendations))
        .route("/recommendations/delete", post(delete_recommendations))
        .route("/recommendations/{id}/advice", post(recommendation_advice))
        .route("/advice", post(advice))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    /// Comma-separated server names
    servers: Option<String>,
}

/// List recommendations, optionally filtered by server name
#[instrument(skip(state))]
async fn list_recommendations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let filter: Vec<String> = params
        .servers
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let book = state.recommendations.read().await;
    Json(json!({
        "recommendations": book.list(&filter)
    }))
}

#[derive(Debug, Deserialize)]
struct DeleteRequest {
    #[serde(default)]
    ids: Vec<String>,
}

/// Delete the selected recommendations
#[instrument(skip(state))]
async fn delete_recommendations(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let removed = state
        .recommendations
        .write()
        .await
        .remove(&req.ids)
        .map_err(error_response)?;

    state
        .log
        .write()
        .await
        .info(format!("{} items have been deleted.", removed));

    Ok(Json(json!({
        "success": true,
        "deleted": removed
    })))
}

/// Ask the advisor about a catalog recommendation
#[instrument(skip(state))]
async fn recommendation_advice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Advice>, (StatusCode, String)> {
    let advisor = configured_advisor(&state)?;

    let request = state
        .recommendations
        .read()
        .await
        .get(&id)
        .map(AdviceRequest::from_recommendation)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Recommendation {} not found", id)))?;

    ask(advisor.as_ref(), &request).await
}

/// Ask the advisor about an arbitrary item
#[instrument(skip(state))]
async fn advice(
    State(state): State<AppState>,
    Json(request): Json<AdviceRequest>,
) -> Result<Json<Advice>, (StatusCode, String)> {
    let advisor = configured_advisor(&state)?;
    ask(advisor.as_ref(), &request).await
}

fn configured_advisor(
    state: &AppState,
) -> Result<Arc<dyn DeletionAdvisor>, (StatusCode, String)> {
    state.advisor.clone().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "AI advisor is not configured".to_string(),
        )
    })
}

async fn ask(
    advisor: &dyn DeletionAdvisor,
    request: &AdviceRequest,
) -> Result<Json<Advice>, (StatusCode, String)> {
    match advisor.advise(request).await {
        Ok(advice) => {
            info!(path = %request.file_path, safe = advice.is_safe_to_delete, "Advice received");
            Ok(Json(advice))
        }
        Err(e) => {
            error!(error = %e, path = %request.file_path, "AI recommendation error");
            Err((StatusCode::BAD_GATEWAY, ADVICE_UNAVAILABLE.to_string()))
        }
    }
}
