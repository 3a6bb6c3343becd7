//! Identity provider integration.
//!
//! Credentials never live in this service. Signup, signin, token checks and
//! password management all delegate to an external GoTrue-compatible identity
//! API; this module defines that seam. [`HttpIdentity`] is the production
//! client, tests substitute their own [`IdentityProvider`].

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

pub use http::HttpIdentity;

/// Authenticated caller, extracted from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Identity-provider user id.
    pub user_id: Uuid,
    /// Email carried on the token, when the provider reports one.
    pub email: Option<String>,
}

/// User record as the identity provider returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
    /// Provider-assigned user id, shared with the profile store.
    pub id: Uuid,
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form metadata attached at signup (display name and the like).
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Bearer session minted by the identity provider, passed through to clients
/// verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Session {
    /// JWT presented on subsequent requests.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Unix timestamp the access token expires at, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Token used to mint a replacement session.
    pub refresh_token: String,
}

/// Operations this service needs from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug {
    /// Resolves a bearer token to the user it was minted for.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] when the token is missing a user,
    /// expired or otherwise rejected.
    async fn verify_token(&self, token: &str) -> Result<AuthUser, ApiError>;

    /// Creates a confirmed user with the given credentials and display name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] carrying the provider's message
    /// when the user is rejected (already registered, weak password), and
    /// [`ApiError::Internal`] on transport failure.
    async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<IdentityUser, ApiError>;

    /// Deletes a user from the identity provider.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] when the provider refuses or the call
    /// fails.
    async fn admin_delete_user(&self, user_id: Uuid) -> Result<(), ApiError>;

    /// Sets a new password for a user, using service-role privileges.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] when the provider refuses or the call
    /// fails.
    async fn admin_update_password(
        &self,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<(), ApiError>;

    /// Exchanges email and password for a session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on any rejection; callers are not
    /// told whether the account exists.
    async fn sign_in(&self, email: &str, password: &str)
    -> Result<(Session, IdentityUser), ApiError>;

    /// Asks the provider to email a password-reset link.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] on failure. Callers typically swallow
    /// this so responses stay independent of account existence.
    async fn send_recovery(&self, email: &str, redirect_to: &str) -> Result<(), ApiError>;

    /// Exchanges an emailed recovery token for a session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] when the token is rejected, and
    /// [`ApiError::Internal`] on transport failure.
    async fn verify_recovery(&self, token: &str) -> Result<(Session, IdentityUser), ApiError>;

    /// Sets a new password using the caller's own session token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] when the provider refuses or the call
    /// fails.
    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), ApiError>;
}
