//! Marketplace identity types.
//!
//! [`Marketplace`] names one listing provider; [`MarketplaceSelector`] is the
//! request-level filter that either targets a single provider or fans out to
//! every registered one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

/// A listing provider this service knows how to talk to.
///
/// Currently a single variant; the enum exists so additional providers can be
/// registered without changing the search contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    /// eBay Finding/Shopping APIs.
    Ebay,
}

impl Marketplace {
    /// Returns the lowercase wire name of this marketplace.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ebay => "ebay",
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Marketplace {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ebay" => Ok(Self::Ebay),
            other => Err(ApiError::UnsupportedMarketplace(other.to_string())),
        }
    }
}

/// Request-level marketplace filter: one named provider, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketplaceSelector {
    /// Fan the search out across every registered client.
    All,
    /// Restrict the search to a single provider.
    One(Marketplace),
}

impl MarketplaceSelector {
    /// Parses a selector from its query-string form (`"all"` or a provider
    /// name).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnsupportedMarketplace`] for names that match no
    /// registered provider.
    pub fn parse(s: &str) -> Result<Self, ApiError> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Marketplace::from_str(s).map(Self::One)
    }

    /// Returns `true` if the selector admits the given marketplace.
    #[must_use]
    pub fn matches(&self, marketplace: Marketplace) -> bool {
        match self {
            Self::All => true,
            Self::One(m) => *m == marketplace,
        }
    }
}
