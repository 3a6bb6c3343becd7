//! Database row models and their conversions to domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Deal, Plan, SavedSearch, UserProfile};

/// A profile row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    /// Identity-provider user id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Plan label as stored.
    pub plan: String,
}

impl UserRow {
    /// Converts the row into the domain profile. Unrecognized plan labels
    /// are treated as paid tiers, which leaves them unrestricted by quota.
    #[must_use]
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name,
            email: self.email,
            plan: Plan::from_label(&self.plan).unwrap_or(Plan::Pro),
        }
    }
}

/// A saved-search row from the `searches` table.
#[derive(Debug, Clone, FromRow)]
pub struct SearchRow {
    /// Row id.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Display name.
    pub name: String,
    /// Search terms.
    pub keywords: Vec<String>,
    /// Category restriction.
    pub category: Option<String>,
    /// Lower price bound.
    pub price_min: Option<f64>,
    /// Upper price bound.
    pub price_max: Option<f64>,
    /// Condition restriction.
    pub condition: Option<String>,
    /// Targeted provider identifiers.
    pub marketplaces: Vec<String>,
    /// Active flag.
    pub active: bool,
    /// Rows inserted by the latest save.
    pub results_count: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<SearchRow> for SavedSearch {
    fn from(row: SearchRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            keywords: row.keywords,
            category: row.category,
            price_min: row.price_min,
            price_max: row.price_max,
            condition: row.condition,
            marketplaces: row.marketplaces,
            active: row.active,
            results_count: row.results_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A persisted deal row from the `deals` table.
///
/// Unlike an in-flight [`Deal`], a record carries ownership: `search_id` and
/// `user_id` are set by the persistence service from the parent search,
/// never from client input. This is also the wire shape for saved-deal
/// responses, so it serializes with the same snake_case names the search
/// endpoint uses.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct DealRecord {
    /// Row id.
    pub id: Uuid,
    /// Parent saved search.
    pub search_id: Uuid,
    /// Owner, copied from the parent search.
    pub user_id: Uuid,
    /// Provider-assigned listing id.
    pub external_id: String,
    /// Provider name, e.g. `ebay`.
    pub marketplace: String,
    /// Listing title.
    pub title: String,
    /// Full description, when captured.
    pub description: Option<String>,
    /// Asking price at capture time.
    pub price: f64,
    /// ISO currency code.
    pub currency: String,
    /// Estimated market value, when known.
    pub original_price: Option<f64>,
    /// Gallery image.
    pub image_url: Option<String>,
    /// Listing page URL.
    pub listing_url: String,
    /// Item location.
    pub location: Option<String>,
    /// Condition display name.
    pub condition: String,
    /// Cheapest listed shipping cost.
    pub shipping_cost: f64,
    /// Whether shipping was free at capture time.
    pub free_shipping: bool,
    /// Seller account name.
    pub seller_name: Option<String>,
    /// Positive-feedback percentage.
    pub seller_rating: f64,
    /// Seller feedback count.
    pub seller_reviews: i32,
    /// Primary category name.
    pub category: Option<String>,
    /// Composite deal score, when scored.
    pub score: Option<f64>,
    /// Per-factor score components.
    pub score_breakdown: Option<serde_json::Value>,
    /// When the listing started.
    pub listed_at: DateTime<Utc>,
    /// Provider-specific extras.
    pub metadata: serde_json::Value,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

impl DealRecord {
    /// Builds a record from an in-flight deal, attaching ownership.
    ///
    /// `user_id` must come from the parent search's owner, not from any
    /// client-supplied value.
    #[must_use]
    pub fn from_deal(search_id: Uuid, user_id: Uuid, deal: Deal) -> Self {
        Self {
            id: Uuid::new_v4(),
            search_id,
            user_id,
            external_id: deal.external_id,
            marketplace: deal.marketplace.as_str().to_string(),
            title: deal.title,
            description: deal.description,
            price: deal.price,
            currency: deal.currency,
            original_price: deal.original_price,
            image_url: deal.image_url,
            listing_url: deal.listing_url,
            location: deal.location,
            condition: deal.condition,
            shipping_cost: deal.shipping_cost,
            free_shipping: deal.free_shipping,
            seller_name: deal.seller_name,
            seller_rating: deal.seller_rating,
            seller_reviews: i32::try_from(deal.seller_reviews).unwrap_or(i32::MAX),
            category: deal.category,
            score: deal.score,
            score_breakdown: deal.score_breakdown,
            listed_at: deal.listed_at,
            metadata: deal.metadata,
            created_at: Utc::now(),
        }
    }
}
