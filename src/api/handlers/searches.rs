//! Saved-search CRUD handlers.
//!
//! Every route requires a bearer token and operates on the caller's own
//! searches; another user's rows are indistinguishable from missing ones.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{CreateSearchRequest, MessageResponse, UpdateSearchRequest};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::domain::SavedSearch;
use crate::error::{ApiError, ErrorResponse};
use crate::identity::AuthUser;

/// `GET /searches` — List the caller's saved searches, newest first.
///
/// # Errors
///
/// Returns [`ApiError::Persistence`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/searches",
    tag = "Searches",
    summary = "List saved searches",
    description = "Returns every saved search the caller owns, newest first.",
    responses(
        (status = 200, description = "The caller's searches", body = Vec<SavedSearch>),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
    )
)]
pub async fn list_searches(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let searches = state.saved_searches.list_searches(user.user_id).await?;
    Ok(Json(searches))
}

/// `POST /searches` — Create a saved search.
///
/// # Errors
///
/// Returns [`ApiError::InvalidArgument`] when the name is missing and
/// [`ApiError::QuotaExceeded`] when a free-plan caller is at their limit.
#[utoipa::path(
    post,
    path = "/api/searches",
    tag = "Searches",
    summary = "Create a saved search",
    description = "Creates a search owned by the caller. Free-plan users may keep at most two.",
    request_body = CreateSearchRequest,
    responses(
        (status = 201, description = "The created search", body = SavedSearch),
        (status = 400, description = "Missing name", body = ErrorResponse),
        (status = 403, description = "Free plan quota reached", body = ErrorResponse),
    )
)]
pub async fn create_search(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateSearchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let search = state
        .saved_searches
        .create_search(user.user_id, &request.into_new_search())
        .await?;

    Ok((StatusCode::CREATED, Json(search)))
}

/// `PUT /searches/:id` — Update a saved search the caller owns.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the search does not exist or belongs
/// to someone else.
#[utoipa::path(
    put,
    path = "/api/searches/{id}",
    tag = "Searches",
    summary = "Update a saved search",
    description = "Applies the fields present in the payload. Empty strings are ignored; an explicit null clears a price bound.",
    params(
        ("id" = Uuid, Path, description = "Search id"),
    ),
    request_body = UpdateSearchRequest,
    responses(
        (status = 200, description = "The updated search", body = SavedSearch),
        (status = 404, description = "No such search", body = ErrorResponse),
    )
)]
pub async fn update_search(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateSearchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let search = state
        .saved_searches
        .update_search(user.user_id, id, &request.into_patch())
        .await?;

    Ok(Json(search))
}

/// `DELETE /searches/:id` — Delete a saved search the caller owns.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the search does not exist or belongs
/// to someone else.
#[utoipa::path(
    delete,
    path = "/api/searches/{id}",
    tag = "Searches",
    summary = "Delete a saved search",
    description = "Deletes the search and every deal captured under it.",
    params(
        ("id" = Uuid, Path, description = "Search id"),
    ),
    responses(
        (status = 200, description = "Deletion confirmation", body = MessageResponse),
        (status = 404, description = "No such search", body = ErrorResponse),
    )
)]
pub async fn delete_search(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.saved_searches.delete_search(user.user_id, id).await?;
    Ok(Json(MessageResponse::new("Search deleted successfully")))
}

/// Saved-search routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/searches", get(list_searches).post(create_search))
        .route("/searches/{id}", put(update_search).delete(delete_search))
}
