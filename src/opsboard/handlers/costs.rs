use crate::{
    model::{CostEntry, CostLedger, NewCost},
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
    path = "/api/costs",
    responses(
        (status = 200, description = "Ledger with aggregates and recent calls", body = CostLedger),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "costs"
)]
pub async fn list_costs(state: Extension<Arc<AppState>>) -> axum::response::Response {
    match state.store.costs.read().await {
        Ok(ledger) => (StatusCode::OK, Json(ledger)).into_response(),
        Err(err) => storage_failure(&err),
    }
}

/// Record one billed API call; bumps the running aggregates and evicts
/// beyond the retention cap.
#[utoipa::path(
    post,
    path = "/api/costs",
    request_body = NewCost,
    responses(
        (status = 200, description = "The recorded call", body = CostEntry),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "costs"
)]
pub async fn record_cost(
    state: Extension<Arc<AppState>>,
    Json(new): Json<NewCost>,
) -> axum::response::Response {
    let result = state
        .store
        .costs
        .update(|ledger| ledger.record(new, Utc::now()))
        .await;

    match result {
        Ok((_, entry)) => (StatusCode::OK, Json(entry)).into_response(),
        Err(err) => storage_failure(&err),
    }
}
