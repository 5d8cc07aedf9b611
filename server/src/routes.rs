//! API routes

mod api;
mod cleanup;
mod logs;
mod recommendations;
mod servers;

use axum::{http::StatusCode, Router};
use sentinel_core::Error;

use crate::state::AppState;

/// Create main router with all routes
pub fn api_routes(state: AppState) -> Router {
    let v1 = Router::new()
        // Dashboard summary
        .merge(api::v1_routes())
        // Server inventory
        .nest("/servers", servers::routes())
        // Cleanup execution
        .nest("/cleanup", cleanup::routes())
        // Recommendations and advice
        .merge(recommendations::routes())
        // Action log
        .nest("/logs", logs::routes());

    Router::new()
        // Health and status
        .merge(api::routes())
        .nest("/v1", v1)
        .with_state(state)
}

/// Map a core error onto an HTTP status and message
pub(crate) fn error_response(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::AdvisorError(_) | Error::HttpError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}
