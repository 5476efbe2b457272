//! OpenAPI document for the dashboard API.

use crate::{
    auth::session::Admission,
    model::{
        AgentStatus, CostEntry, CostLedger, NewCost, NewTask, StatusPatch, TaskColumn, TaskPatch,
        TaskPriority, TaskRecord,
    },
    opsboard::handlers,
};
use axum::response::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::login,
        handlers::two_factor::enrollment_status,
        handlers::two_factor::enroll,
        handlers::status::get_status,
        handlers::status::patch_status,
        handlers::tasks::list_tasks,
        handlers::tasks::create_task,
        handlers::tasks::patch_task,
        handlers::tasks::delete_task,
        handlers::costs::list_costs,
        handlers::costs::record_cost,
        handlers::stats::stats,
    ),
    components(schemas(
        Admission,
        AgentStatus,
        CostEntry,
        CostLedger,
        NewCost,
        NewTask,
        StatusPatch,
        TaskColumn,
        TaskPatch,
        TaskPriority,
        TaskRecord,
        handlers::auth::LoginRequest,
        handlers::two_factor::EnrollRequest,
        handlers::two_factor::EnrollResponse,
        handlers::two_factor::EnrollmentStatusResponse,
        handlers::stats::StatsResponse,
        handlers::stats::TaskStats,
        handlers::stats::CostStats,
        handlers::stats::StatusStats,
    )),
    tags(
        (name = "auth", description = "Login and second-factor enrollment"),
        (name = "tasks", description = "Kanban board"),
        (name = "costs", description = "External API spend"),
        (name = "status", description = "Agent liveness"),
        (name = "stats", description = "Aggregates"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// The generated document, for the `/openapi.json` route and tooling.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}
