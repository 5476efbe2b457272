use crate::{
    model::{NewTask, TaskPatch, TaskRecord},
    opsboard::{handlers::storage_failure, AppState},
};
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "All tasks on the board", body = [TaskRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "tasks"
)]
pub async fn list_tasks(state: Extension<Arc<AppState>>) -> axum::response::Response {
    match state.store.tasks.read().await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(err) => storage_failure(&err),
    }
}

/// Create a task in the queue column.
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = NewTask,
    responses(
        (status = 200, description = "The created task", body = TaskRecord),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "tasks"
)]
pub async fn create_task(
    state: Extension<Arc<AppState>>,
    Json(new): Json<NewTask>,
) -> axum::response::Response {
    let result = state
        .store
        .tasks
        .update(|tasks| {
            let task = TaskRecord::create(new, Utc::now());
            tasks.push(task.clone());
            task
        })
        .await;

    match result {
        Ok((_, task)) => (StatusCode::OK, Json(task)).into_response(),
        Err(err) => storage_failure(&err),
    }
}

/// Merge the supplied fields into a task. Moving a task into `done` for the
/// first time completes it.
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    request_body = TaskPatch,
    responses(
        (status = 200, description = "The updated task", body = TaskRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown task id"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "tasks"
)]
pub async fn patch_task(
    state: Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> axum::response::Response {
    let result = state
        .store
        .tasks
        .update(|tasks| {
            tasks.iter_mut().find(|task| task.id == id).map(|task| {
                task.apply(patch, Utc::now());
                task.clone()
            })
        })
        .await;

    match result {
        Ok((_, Some(task))) => (StatusCode::OK, Json(task)).into_response(),
        Ok((_, None)) => task_not_found(),
        Err(err) => storage_failure(&err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown task id"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    state: Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let result = state
        .store
        .tasks
        .update(|tasks| {
            let before = tasks.len();
            tasks.retain(|task| task.id != id);
            tasks.len() != before
        })
        .await;

    match result {
        Ok((_, true)) => (StatusCode::OK, Json(json!({"success": true}))).into_response(),
        Ok((_, false)) => task_not_found(),
        Err(err) => storage_failure(&err),
    }
}

fn task_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Task not found"})),
    )
        .into_response()
}
