//! HTTP surface of the dashboard.

use crate::{auth::AuthConfig, store::Store};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    middleware,
    routing::{get, patch, post},
    Extension, Router,
};
use std::{path::Path, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

pub(crate) mod guard;
pub(crate) mod handlers;
mod openapi;

pub use openapi::openapi;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Shared state handed to every handler.
pub struct AppState {
    pub store: Store,
    pub auth: AuthConfig,
}

/// Build the full application router, including the credential guard and the
/// tracing/cors/request-id layers.
pub fn router(state: Arc<AppState>) -> Router {
    // Everything resource-like sits behind the shared-credential guard.
    // Login and enrollment authenticate inside their request bodies instead.
    let protected = Router::new()
        .route(
            "/api/status",
            get(handlers::status::get_status).patch(handlers::status::patch_status),
        )
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            patch(handlers::tasks::patch_task).delete(handlers::tasks::delete_task),
        )
        .route(
            "/api/costs",
            get(handlers::costs::list_costs).post(handlers::costs::record_cost),
        )
        .route("/api/stats", get(handlers::stats::stats))
        .route(
            "/api/auth/2fa",
            get(handlers::two_factor::enrollment_status),
        )
        .route_layer(middleware::from_fn(guard::require_access_password));

    let cors = CorsLayer::new()
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("x-access-password"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_origin(Any);

    Router::new()
        .merge(protected)
        .route("/api/auth", post(handlers::auth::login))
        .route("/api/auth/2fa/enroll", post(handlers::two_factor::enroll))
        .route("/health", get(handlers::health::health))
        .route("/openapi.json", get(openapi::openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(state)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, data_dir: &Path, auth: AuthConfig) -> Result<()> {
    let store = Store::open(data_dir)
        .await
        .with_context(|| format!("Failed to open state store in {}", data_dir.display()))?;

    let app = router(Arc::new(AppState { store, auth }));

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
