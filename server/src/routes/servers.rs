//! Server inventory API endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sentinel_core::{Error, NewServer};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use super::error_response;
use crate::state::AppState;

/// Create servers API router
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_servers).post(create_server))
        .route("/refresh", post(refresh_servers))
        .route("/{id}", delete(delete_server))
}

/// List all servers
#[instrument(skip(state))]
async fn list_servers(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.servers.read().await;
    Json(json!({
        "servers": store.list()
    }))
}

/// Add a server to the inventory
#[instrument(skip(state, payload))]
async fn create_server(
    State(state): State<AppState>,
    payload: Result<Json<NewServer>, JsonRejection>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let Json(server) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Malformed server request");
        error_response(Error::InvalidInput(rejection.body_text()))
    })?;
    info!(name = %server.name, ip = %server.ip_address, "Creating server");

    let mut rng = StdRng::from_entropy();
    let created = state
        .servers
        .write()
        .await
        .add(server, &mut rng)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create server");
            error_response(e)
        })?;

    state
        .log
        .write()
        .await
        .info(format!("Server \"{}\" has been added.", created.name));

    Ok((StatusCode::CREATED, Json(created)))
}

/// Remove a server from the inventory
#[instrument(skip(state))]
async fn delete_server(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let removed = state.servers.write().await.remove(&id).await.map_err(|e| {
        error!(error = %e, id = %id, "Failed to delete server");
        error_response(e)
    })?;

    state
        .log
        .write()
        .await
        .warning(format!("Server \"{}\" has been removed.", removed.name));

    Ok(Json(json!({
        "success": true,
        "message": format!("Server \"{}\" has been removed.", removed.name)
    })))
}

/// Re-probe every server's status
#[instrument(skip(state))]
async fn refresh_servers(State(state): State<AppState>) -> impl IntoResponse {
    let mut rng = StdRng::from_entropy();
    let mut store = state.servers.write().await;
    store.refresh_statuses(&mut rng, &state.config.cleanup.offline_address);

    Json(json!({
        "servers": store.list()
    }))
}
