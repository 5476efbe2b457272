use crate::{
    auth::enroll,
    opsboard::{
        handlers::{auth_failure, storage_failure},
        AppState,
    },
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug)]
pub struct EnrollmentStatusResponse {
    pub configured: bool,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct EnrollRequest {
    pub password: String,
}

#[derive(ToSchema, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    pub secret: String,
    pub provisioning_uri: String,
    pub backup_codes: Vec<String>,
}

/// Report whether the second factor is enrolled. Only presence is exposed,
/// never the secret material.
#[utoipa::path(
    get,
    path = "/api/auth/2fa",
    responses(
        (status = 200, description = "Enrollment presence", body = EnrollmentStatusResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "auth"
)]
pub async fn enrollment_status(state: Extension<Arc<AppState>>) -> axum::response::Response {
    match state.store.second_factor.read().await {
        Ok(record) => (
            StatusCode::OK,
            Json(EnrollmentStatusResponse {
                configured: record.is_some(),
            }),
        )
            .into_response(),
        Err(err) => storage_failure(&err),
    }
}

/// One-shot enrollment. The response is the only disclosure of the secret
/// and the backup codes; there is no retrieval endpoint afterwards.
#[utoipa::path(
    post,
    path = "/api/auth/2fa/enroll",
    request_body = EnrollRequest,
    responses(
        (status = 200, description = "Enrollment material, disclosed once", body = EnrollResponse),
        (status = 401, description = "Invalid password"),
        (status = 409, description = "Already enrolled"),
        (status = 503, description = "State store unavailable")
    ),
    tag = "auth"
)]
pub async fn enroll(
    state: Extension<Arc<AppState>>,
    Json(request): Json<EnrollRequest>,
) -> axum::response::Response {
    match enroll::enroll(&state.store, &state.auth, &request.password).await {
        Ok(material) => (
            StatusCode::OK,
            Json(EnrollResponse {
                secret: material.secret,
                provisioning_uri: material.provisioning_uri,
                backup_codes: material.backup_codes,
            }),
        )
            .into_response(),
        Err(err) => auth_failure(err),
    }
}
