//! System endpoints: service status and the API index.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Service status response.
#[derive(Debug, Serialize, ToSchema)]
struct StatusResponse {
    status: &'static str,
    message: String,
    version: &'static str,
}

/// `GET /` — Service status.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Service status",
    description = "Confirms the service is reachable and reports its version.",
    responses(
        (status = 200, description = "Service is online", body = StatusResponse),
    )
)]
pub async fn status_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(StatusResponse {
            status: "online",
            message: "Quoril API is running".to_string(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// API index response.
#[derive(Debug, Serialize, ToSchema)]
struct IndexResponse {
    status: &'static str,
    message: String,
    endpoints: Vec<&'static str>,
}

/// `GET /api` — Top-level resource index.
#[utoipa::path(
    get,
    path = "/api",
    tag = "System",
    summary = "API index",
    description = "Lists the top-level resource groups this API exposes.",
    responses(
        (status = 200, description = "Resource index", body = IndexResponse),
    )
)]
pub async fn index_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(IndexResponse {
            status: "online",
            message: format!("Quoril API v{}", env!("CARGO_PKG_VERSION")),
            endpoints: vec!["/api/auth", "/api/searches", "/api/deals", "/api/user"],
        }),
    )
}

/// System routes mounted at the root level (not under /api).
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(status_handler))
}
