//! Auth endpoint DTOs: signup, signin and password recovery.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserProfile;
use crate::identity::Session;

/// Request body for `POST /api/auth/signup`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Initial password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Response body for `POST /api/auth/signup` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    /// The created profile.
    pub user: UserProfile,
    /// Follow-up instruction for the client.
    pub message: String,
}

/// Request body for `POST /api/auth/signin`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SigninRequest {
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Account password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Response body for `POST /api/auth/signin`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SigninResponse {
    /// Bearer session minted by the identity provider.
    pub session: Session,
    /// The signed-in user's profile.
    pub user: UserProfile,
}

/// Request body for `POST /api/auth/forgot-password`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    /// Email to send the reset link to.
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for `POST /api/auth/reset-password`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Recovery token from the reset email.
    #[serde(default)]
    pub token: Option<String>,
    /// Replacement password.
    #[serde(default)]
    pub new_password: Option<String>,
}
