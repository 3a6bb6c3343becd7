//! Deal endpoint DTOs: live search, details, market value and persistence.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::Deal;
use crate::domain::criteria::{DEFAULT_MAX_RESULTS, DEFAULT_SORT_ORDER, SearchCriteria, split_keywords};
use crate::persistence::DealRecord;

fn default_marketplace() -> String {
    "ebay".to_string()
}

fn default_sort_order() -> String {
    DEFAULT_SORT_ORDER.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_MAX_RESULTS
}

fn default_deals_limit() -> i64 {
    100
}

/// Query parameters for `GET /api/deals/search`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DealSearchQuery {
    /// Comma-separated search terms.
    #[serde(default)]
    pub keywords: Option<String>,
    /// Inclusive lower price bound.
    #[serde(default)]
    pub price_min: Option<f64>,
    /// Inclusive upper price bound.
    #[serde(default)]
    pub price_max: Option<f64>,
    /// Condition label filter.
    #[serde(default)]
    pub condition: Option<String>,
    /// Provider id, or `all` to fan out to every registered provider.
    #[serde(default = "default_marketplace")]
    pub marketplace: String,
    /// Provider sort order.
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    /// Maximum results to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl DealSearchQuery {
    /// Builds provider search criteria. `keywords` splits on commas; a
    /// missing parameter becomes an empty list and is rejected downstream.
    #[must_use]
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            keywords: self
                .keywords
                .as_deref()
                .map(split_keywords)
                .unwrap_or_default(),
            price_min: self.price_min,
            price_max: self.price_max,
            condition: self.condition.clone(),
            sort_order: self.sort_order.clone(),
            max_results: self.limit,
        }
    }
}

/// Query parameters for `GET /api/deals/{id}`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DealDetailQuery {
    /// Provider to fetch the listing from.
    #[serde(default = "default_marketplace")]
    pub marketplace: String,
}

/// Query parameters for `GET /api/deals/user/{user_id}`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UserDealsQuery {
    /// Page size.
    #[serde(default = "default_deals_limit")]
    pub limit: i64,
    /// Rows to skip.
    #[serde(default)]
    pub offset: i64,
    /// Minimum score; unscored deals never match.
    #[serde(default)]
    pub min_score: f64,
}

/// Request body for `POST /api/deals/save`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveDealsRequest {
    /// Saved search the deals belong to.
    #[serde(default)]
    pub search_id: Option<Uuid>,
    /// Deals to capture, as returned by the search endpoint.
    #[serde(default)]
    pub deals: Option<Vec<Deal>>,
}

/// Response body for `GET /api/deals/search`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DealListResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// Number of deals returned.
    pub count: usize,
    /// Normalized listings, in provider order.
    pub deals: Vec<Deal>,
}

/// Response body for `GET /api/deals/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DealResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// The requested listing with detail fields populated.
    pub deal: Deal,
}

/// Response body for `GET /api/deals/market-value/{keywords}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketValueResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// Keywords the estimate was computed for.
    pub keywords: String,
    /// Mean sold price, `null` when no sold listings were found.
    pub estimated_value: Option<f64>,
    /// Where the estimate came from, e.g. `ebay_sold_listings`.
    pub source: String,
}

/// Response body for `POST /api/deals/save` and `GET /api/deals/user/{user_id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SavedDealsResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// Number of records returned.
    pub count: usize,
    /// Stored deal rows.
    pub deals: Vec<DealRecord>,
}
