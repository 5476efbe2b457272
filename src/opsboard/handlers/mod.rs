//! Route handlers and shared response helpers.

pub mod auth;
pub mod costs;
pub mod health;
pub mod stats;
pub mod status;
pub mod tasks;
pub mod two_factor;

use crate::{auth::AuthError, store::StoreError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

/// Map a storage failure to a uniform service-unavailable response. The
/// caller sees that the store is down, never the underlying details.
pub(crate) fn storage_failure(err: &StoreError) -> Response {
    error!("State store failure: {err}");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({"error": "state store unavailable"})),
    )
        .into_response()
}

/// Map an auth failure to its response. Expected rejections carry their
/// reason code; anything else is a server-side problem.
pub(crate) fn auth_failure(err: AuthError) -> Response {
    match &err {
        AuthError::InvalidPassword | AuthError::TokenRequired | AuthError::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "admitted": false,
                "secondFactorRequired": matches!(
                    err,
                    AuthError::TokenRequired | AuthError::InvalidToken
                ),
                "error": err.reason(),
            })),
        )
            .into_response(),
        AuthError::AlreadyEnrolled => (
            StatusCode::CONFLICT,
            Json(json!({"error": err.reason()})),
        )
            .into_response(),
        AuthError::Store(store_err) => storage_failure(store_err),
        AuthError::Internal(internal) => {
            error!("Auth internal error: {internal}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
