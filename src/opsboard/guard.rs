//! Shared-credential guard for resource routes.

use crate::{auth::password, opsboard::AppState};
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use std::sync::Arc;

/// Reject any request whose `x-access-password` header does not match the
/// configured credential. Absence and mismatch get the same response, on
/// every resource, so the guard reveals nothing about what was requested.
pub async fn require_access_password(
    Extension(state): Extension<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let supplied = request
        .headers()
        .get("x-access-password")
        .and_then(|value| value.to_str().ok());

    match supplied {
        Some(candidate) if password::verify(candidate, state.auth.access_password()) => {
            next.run(request).await
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Unauthorized"})),
        )
            .into_response(),
    }
}
