use crate::{
    model::{AgentStatus, StatusPatch},
    opsboard::{handlers::storage_failure, AppState},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Current agent status", body = AgentStatus),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "status"
)]
pub async fn get_status(state: Extension<Arc<AppState>>) -> axum::response::Response {
    match state.store.status.read().await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => storage_failure(&err),
    }
}

/// Merge the supplied fields into the status report.
#[utoipa::path(
    patch,
    path = "/api/status",
    request_body = StatusPatch,
    responses(
        (status = 200, description = "The updated status", body = AgentStatus),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "status"
)]
pub async fn patch_status(
    state: Extension<Arc<AppState>>,
    Json(patch): Json<StatusPatch>,
) -> axum::response::Response {
    let result = state
        .store
        .status
        .update(|status| status.apply(patch, Utc::now()))
        .await;

    match result {
        Ok((status, ())) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => storage_failure(&err),
    }
}
