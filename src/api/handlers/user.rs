//! Account management handlers: profile, password and deletion.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{delete, put};
use axum::{Json, Router};

use crate::api::dto::{ChangePasswordRequest, MessageResponse, UpdateProfileRequest};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::domain::UserProfile;
use crate::error::{ApiError, ErrorResponse};
use crate::identity::AuthUser;

/// `PUT /user/profile` — Update the caller's name or email.
///
/// # Errors
///
/// Returns [`ApiError::InvalidArgument`] when the new email belongs to
/// another account and [`ApiError::NotFound`] when the caller has no
/// profile row.
#[utoipa::path(
    put,
    path = "/api/user/profile",
    tag = "User",
    summary = "Update profile",
    description = "Updates whichever of name and email are present. Empty strings are ignored.",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "The updated profile", body = UserProfile),
        (status = 400, description = "Email already in use", body = ErrorResponse),
        (status = 404, description = "No profile for this user", body = ErrorResponse),
    )
)]
pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = request.name.filter(|v| !v.is_empty());
    let email = request.email.filter(|v| !v.is_empty());

    if let Some(email) = email.as_deref() {
        if state.store.email_in_use(email, user.user_id).await? {
            return Err(ApiError::InvalidArgument(
                "Email already in use".to_string(),
            ));
        }
    }

    let Some(profile) = state
        .store
        .update_user(user.user_id, name.as_deref(), email.as_deref())
        .await?
    else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    Ok(Json(profile))
}

/// `PUT /user/password` — Replace the caller's password.
///
/// # Errors
///
/// Returns [`ApiError::InvalidArgument`] when the new password is missing
/// and [`ApiError::Internal`] when the identity provider refuses it.
#[utoipa::path(
    put,
    path = "/api/user/password",
    tag = "User",
    summary = "Change password",
    description = "Sets a new password at the identity provider for the authenticated user.",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Acknowledgement", body = MessageResponse),
        (status = 400, description = "Missing password", body = ErrorResponse),
        (status = 500, description = "Provider refused the change", body = ErrorResponse),
    )
)]
pub async fn change_password(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(new_password) = request.new_password.filter(|v| !v.is_empty()) else {
        return Err(ApiError::InvalidArgument(
            "New password is required".to_string(),
        ));
    };

    state
        .identity
        .admin_update_password(user.user_id, &new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// `DELETE /user/account` — Delete the caller's account and all its data.
///
/// The profile row goes first, cascading to searches and captured deals. A
/// failure to remove the identity-provider user afterwards is logged but
/// not surfaced; the account data is already gone.
///
/// # Errors
///
/// Returns [`ApiError::Persistence`] when the account data cannot be
/// deleted.
#[utoipa::path(
    delete,
    path = "/api/user/account",
    tag = "User",
    summary = "Delete account",
    description = "Removes the profile, saved searches, captured deals and the identity-provider user.",
    responses(
        (status = 200, description = "Acknowledgement", body = MessageResponse),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
        (status = 500, description = "Account data deletion failed", body = ErrorResponse),
    )
)]
pub async fn delete_account(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete_user(user.user_id).await?;

    if let Err(error) = state.identity.admin_delete_user(user.user_id).await {
        tracing::warn!(%error, user_id = %user.user_id, "identity deletion failed after data removal");
    }

    tracing::info!(user_id = %user.user_id, "account deleted");
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}

/// Account management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile", put(update_profile))
        .route("/user/password", put(change_password))
        .route("/user/account", delete(delete_account))
}
