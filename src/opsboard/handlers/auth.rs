use crate::{
    auth::{session, Admission},
    opsboard::{handlers::auth_failure, AppState},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct LoginRequest {
    pub password: String,
    pub token: Option<String>,
}

/// Run one login attempt. No session is minted: the credential itself is the
/// bearer, re-presented on every resource request.
#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admitted", body = Admission),
        (status = 401, description = "Rejected with a reason code"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "auth"
)]
pub async fn login(
    state: Extension<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> axum::response::Response {
    match session::login(
        &state.store,
        &state.auth,
        &request.password,
        request.token.as_deref(),
    )
    .await
    {
        Ok(admission) => (StatusCode::OK, Json(admission)).into_response(),
        Err(err) => auth_failure(err),
    }
}
