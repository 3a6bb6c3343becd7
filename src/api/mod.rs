//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api`; the status probe lives at
//! the root.

pub mod dto;
pub mod extract;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering every route this service exposes.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Quoril API",
        description = "Deal aggregation backend: live marketplace search, market-value estimates and saved searches."
    ),
    paths(
        handlers::system::status_handler,
        handlers::system::index_handler,
        handlers::auth::signup,
        handlers::auth::signin,
        handlers::auth::me,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,
        handlers::auth::signout,
        handlers::searches::list_searches,
        handlers::searches::create_search,
        handlers::searches::update_search,
        handlers::searches::delete_search,
        handlers::deals::search_deals,
        handlers::deals::market_value,
        handlers::deals::save_deals,
        handlers::deals::user_deals,
        handlers::deals::deal_details,
        handlers::user::update_profile,
        handlers::user::change_password,
        handlers::user::delete_account,
    ),
    tags(
        (name = "System", description = "Service status"),
        (name = "Auth", description = "Registration, sessions and password recovery"),
        (name = "Searches", description = "Saved-search CRUD"),
        (name = "Deals", description = "Live search and captured deals"),
        (name = "User", description = "Account management"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes())
}
