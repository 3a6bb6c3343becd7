//! Authentication handlers: signup, signin, session introspection and
//! password recovery.
//!
//! Credentials are handled by the identity provider; these handlers
//! orchestrate it and keep the profile store in step.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    ForgotPasswordRequest, MessageResponse, ResetPasswordRequest, SigninRequest, SigninResponse,
    SignupRequest, SignupResponse,
};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::domain::{Plan, UserProfile};
use crate::error::{ApiError, ErrorResponse};
use crate::identity::AuthUser;

/// `POST /auth/signup` — Register a new account.
///
/// Creates the user at the identity provider first, then the profile row. If
/// the profile insert fails the identity user is deleted again so the email
/// is not left claimed by a half-created account.
///
/// # Errors
///
/// Returns [`ApiError::InvalidArgument`] when a field is missing or the
/// provider rejects the credentials, and [`ApiError::Internal`] when the
/// profile row cannot be created.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    summary = "Register a new account",
    description = "Creates an identity-provider user and its profile row. New accounts always start on the free plan.",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Missing field or rejected credentials", body = ErrorResponse),
        (status = 500, description = "Profile creation failed", body = ErrorResponse),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = request.name.filter(|v| !v.is_empty());
    let email = request.email.filter(|v| !v.is_empty());
    let password = request.password.filter(|v| !v.is_empty());
    let (Some(name), Some(email), Some(password)) = (name, email, password) else {
        return Err(ApiError::InvalidArgument(
            "All fields are required".to_string(),
        ));
    };

    let identity_user = state
        .identity
        .admin_create_user(&email, &password, &name)
        .await?;

    let profile = UserProfile {
        id: identity_user.id,
        name,
        email,
        plan: Plan::Free,
    };

    let profile = match state.store.insert_user(&profile).await {
        Ok(profile) => profile,
        Err(error) => {
            tracing::error!(%error, user_id = %identity_user.id, "profile insert failed after signup");
            // Roll the identity user back so the email can be retried.
            if let Err(error) = state.identity.admin_delete_user(identity_user.id).await {
                tracing::warn!(%error, user_id = %identity_user.id, "identity rollback failed");
            }
            return Err(ApiError::Internal(
                "Failed to create user profile".to_string(),
            ));
        }
    };

    tracing::info!(user_id = %profile.id, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user: profile,
            message: "User created successfully. Please sign in.".to_string(),
        }),
    ))
}

/// `POST /auth/signin` — Exchange credentials for a session.
///
/// # Errors
///
/// Returns [`ApiError::InvalidArgument`] when a field is missing,
/// [`ApiError::Unauthorized`] when the provider rejects the credentials and
/// [`ApiError::Internal`] when the profile row is missing.
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "Auth",
    summary = "Sign in",
    description = "Exchanges email and password for a bearer session plus the caller's profile.",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Session and profile", body = SigninResponse),
        (status = 400, description = "Missing field", body = ErrorResponse),
        (status = 401, description = "Rejected credentials", body = ErrorResponse),
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = request.email.filter(|v| !v.is_empty());
    let password = request.password.filter(|v| !v.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::InvalidArgument(
            "Email and password are required".to_string(),
        ));
    };

    let (session, identity_user) = state.identity.sign_in(&email, &password).await?;

    let Some(user) = state.store.get_user(identity_user.id).await? else {
        return Err(ApiError::Internal(
            "Failed to fetch user profile".to_string(),
        ));
    };

    Ok(Json(SigninResponse { session, user }))
}

/// `GET /auth/me` — The caller's own profile.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the token's user has no profile row.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    summary = "Current user",
    description = "Resolves the bearer token to its profile row.",
    responses(
        (status = 200, description = "The caller's profile", body = UserProfile),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
        (status = 404, description = "No profile for this user", body = ErrorResponse),
    )
)]
pub async fn me(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(profile) = state.store.get_user(user.user_id).await? else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    Ok(Json(profile))
}

/// `POST /auth/forgot-password` — Request a password-reset email.
///
/// The response is the same whether or not the account exists, and a
/// provider failure is logged rather than surfaced, so this endpoint cannot
/// be used to probe for registered emails.
///
/// # Errors
///
/// Returns [`ApiError::InvalidArgument`] when the email is missing.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    summary = "Request a password reset",
    description = "Sends a reset link when the account exists. The response never reveals whether it does.",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Acknowledgement", body = MessageResponse),
        (status = 400, description = "Missing email", body = ErrorResponse),
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(email) = request.email.filter(|v| !v.is_empty()) else {
        return Err(ApiError::InvalidArgument("Email is required".to_string()));
    };

    let redirect_to = format!("{}/reset-password", state.config.frontend_url);
    if let Err(error) = state.identity.send_recovery(&email, &redirect_to).await {
        tracing::warn!(%error, "password recovery dispatch failed");
    }

    Ok(Json(MessageResponse::new(
        "If an account exists with that email, a password reset link has been sent.",
    )))
}

/// `POST /auth/reset-password` — Complete a password reset.
///
/// # Errors
///
/// Returns [`ApiError::InvalidArgument`] when a field is missing or the
/// recovery token is rejected, and [`ApiError::Internal`] when the provider
/// fails to store the new password.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    summary = "Complete a password reset",
    description = "Verifies the emailed recovery token and sets the new password.",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "Missing field or rejected token", body = ErrorResponse),
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = request.token.filter(|v| !v.is_empty());
    let new_password = request.new_password.filter(|v| !v.is_empty());
    let (Some(token), Some(new_password)) = (token, new_password) else {
        return Err(ApiError::InvalidArgument(
            "Token and new password are required".to_string(),
        ));
    };

    let (session, _user) = state.identity.verify_recovery(&token).await?;
    state
        .identity
        .update_password(&session.access_token, &new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password reset successfully")))
}

/// `POST /auth/signout` — End the caller's session.
///
/// Sessions are stateless on this side, so there is nothing to tear down;
/// the endpoint exists so clients have a uniform lifecycle and still
/// requires a valid token.
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    tag = "Auth",
    summary = "Sign out",
    description = "Acknowledges the sign-out. Clients discard their tokens; nothing is revoked server-side.",
    responses(
        (status = 200, description = "Acknowledgement", body = MessageResponse),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
    )
)]
pub async fn signout(_user: AuthUser) -> impl IntoResponse {
    Json(MessageResponse::new("Signed out successfully"))
}

/// Authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .route("/auth/me", get(me))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/signout", post(signout))
}
