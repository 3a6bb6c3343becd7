//! User profile rows and the plan tiers that gate saved-search quotas.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Subscription tier. Only `Free` is quota-limited; signup always starts a
/// user on `Free` and upgrades happen outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Limited to [`FREE_PLAN_SEARCH_LIMIT`] saved searches.
    Free,
    /// No saved-search quota.
    Pro,
}

/// Maximum saved searches a free-plan user may own.
pub const FREE_PLAN_SEARCH_LIMIT: i64 = 2;

impl Plan {
    /// Lowercase label as stored and served.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }

    /// Parses the stored label; unknown labels are treated as absent.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            _ => None,
        }
    }

    /// `true` when the plan is quota-limited.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }
}

/// Profile row mirroring the identity provider's user id.
///
/// Created at signup, read for quota checks and `/auth/me`; the identity
/// provider owns credentials, this row owns everything the API serves about
/// the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// Identity-provider user id, shared across both systems.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact email, unique across profiles.
    pub email: String,
    /// Subscription tier.
    pub plan: Plan,
}
