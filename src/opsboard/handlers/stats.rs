use crate::{
    model::TaskColumn,
    opsboard::{handlers::storage_failure, AppState},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub tasks: TaskStats,
    pub costs: CostStats,
    pub status: StatusStats,
}

#[derive(ToSchema, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub queue: usize,
    pub in_progress: usize,
    pub done: usize,
}

#[derive(ToSchema, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CostStats {
    /// Formatted to two decimals, as the dashboard has always displayed it.
    pub today: String,
    pub month: String,
    pub calls_today: usize,
}

#[derive(ToSchema, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatusStats {
    pub active: bool,
    pub bandwidth: u8,
}

/// Aggregate view over all three dashboard domains.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Board, cost and liveness aggregates", body = StatsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "stats"
)]
pub async fn stats(state: Extension<Arc<AppState>>) -> axum::response::Response {
    let loaded = tokio::try_join!(
        state.store.tasks.read(),
        state.store.costs.read(),
        state.store.status.read(),
    );

    let (tasks, costs, status) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => return storage_failure(&err),
    };

    let count = |column: TaskColumn| tasks.iter().filter(|task| task.status == column).count();
    let now = Utc::now();

    let stats = StatsResponse {
        tasks: TaskStats {
            total: tasks.len(),
            queue: count(TaskColumn::Queue),
            in_progress: count(TaskColumn::InProgress),
            done: count(TaskColumn::Done),
        },
        costs: CostStats {
            today: format!("{:.2}", costs.today),
            month: format!("{:.2}", costs.month),
            calls_today: costs.calls_today(now),
        },
        status: StatusStats {
            active: status.active,
            bandwidth: status.bandwidth,
        },
    };

    (StatusCode::OK, Json(stats)).into_response()
}
