//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod deals;
pub mod searches;
pub mod system;
pub mod user;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(system::index_handler))
        .merge(auth::routes())
        .merge(searches::routes())
        .merge(deals::routes())
        .merge(user::routes())
}
