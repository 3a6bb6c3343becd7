//! Account management DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `PUT /api/user/profile`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// New display name; empty strings are ignored.
    #[serde(default)]
    pub name: Option<String>,
    /// New email address; must not belong to another account.
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for `PUT /api/user/password`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Replacement password.
    #[serde(default)]
    pub new_password: Option<String>,
}
