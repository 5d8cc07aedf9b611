//! Cleanup execution endpoint
//!
//! Every outcome, including rejected input, is returned as an
//! `OperationOutcome` body with status 200.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use sentinel_core::{format_bytes, CleanupRequestInput, Error, OperationOutcome};
use tracing::{info, instrument, warn};

use crate::state::AppState;

/// Create cleanup API router
pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(run_cleanup))
}

/// Run a cleanup on the requested target
#[instrument(skip(state, payload))]
async fn run_cleanup(
    State(state): State<AppState>,
    payload: Result<Json<CleanupRequestInput>, JsonRejection>,
) -> Json<OperationOutcome> {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Malformed cleanup request");
            return Json(Error::InvalidInput(rejection.body_text()).into());
        }
    };

    let address = input.target_address.clone().unwrap_or_default();
    let target = match state.server_name_for(&address).await {
        Some(name) => format!("{} ({})", name, address),
        None => address.clone(),
    };

    state
        .log
        .write()
        .await
        .info(format!("User initiated cleanup on {}", target));

    let outcome = sentinel_core::run_cleanup(state.executor.as_ref(), &input).await;

    let mut log = state.log.write().await;
    match &outcome {
        OperationOutcome::Completed(result) => {
            for item in &result.deleted_items {
                log.info(format!("Successfully deleted: {} on {}", item, target));
            }
            for err in &result.errors {
                log.error(err.clone());
            }
            let summary = format!(
                "Cleanup operation finished on {}: freed {}",
                target,
                format_bytes(result.freed_space_bytes)
            );
            if result.success {
                log.info(summary);
            } else {
                log.warning(format!("{} with {} error(s)", summary, result.errors.len()));
            }
            info!(success = result.success, target = %target, "Cleanup completed");
        }
        OperationOutcome::Failed(message) => {
            log.error(format!("Cleanup on {} failed: {}", target, message));
            warn!(error = %message, target = %target, "Cleanup not attempted");
        }
    }

    Json(outcome)
}
