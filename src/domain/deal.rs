//! Normalized listing types shared by the marketplace adapters, the search
//! service and the persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::marketplace::Marketplace;

fn default_currency() -> String {
    "USD".to_string()
}

fn default_condition() -> String {
    "Unknown".to_string()
}

fn default_metadata() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// One marketplace listing, normalized away from provider-specific shapes.
///
/// Built fresh on every search call and never mutated afterwards, except for
/// the optional scoring fields an external scoring collaborator may attach
/// before the deal is saved. Ownership (`user_id`) is not part of the deal
/// itself; it attaches at the persistence boundary, copied from the parent
/// saved search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Deal {
    /// Provider-assigned listing id.
    pub external_id: String,
    /// Which provider produced this listing.
    pub marketplace: Marketplace,
    /// Listing title.
    pub title: String,
    /// Full description, populated by detail lookups only.
    #[serde(default)]
    pub description: Option<String>,
    /// Current asking price. Lenient-parsed: malformed provider data becomes
    /// 0 rather than dropping the record.
    pub price: f64,
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Estimated market value, when a separate estimation call succeeded.
    #[serde(default)]
    pub original_price: Option<f64>,
    /// Gallery image, if the provider supplied one.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Canonical listing page URL.
    #[serde(default)]
    pub listing_url: String,
    /// Free-text item location.
    #[serde(default)]
    pub location: Option<String>,
    /// Provider condition display name.
    #[serde(default = "default_condition")]
    pub condition: String,
    /// Cheapest listed shipping cost, 0 when missing.
    #[serde(default)]
    pub shipping_cost: f64,
    /// Derived: `shipping_cost == 0`.
    #[serde(default)]
    pub free_shipping: bool,
    /// Seller account name.
    #[serde(default)]
    pub seller_name: Option<String>,
    /// Positive-feedback percentage, 0..=100.
    #[serde(default)]
    pub seller_rating: f64,
    /// Seller feedback count.
    #[serde(default)]
    pub seller_reviews: u32,
    /// Primary category name.
    #[serde(default)]
    pub category: Option<String>,
    /// Composite deal score written by the scoring collaborator.
    #[serde(default)]
    pub score: Option<f64>,
    /// Per-factor score components, opaque to this service.
    #[serde(default)]
    pub score_breakdown: Option<serde_json::Value>,
    /// When the listing started; now() when the provider omits it.
    #[serde(default = "Utc::now")]
    pub listed_at: DateTime<Utc>,
    /// Provider-specific extras (watch count, returns-accepted, images, ...).
    #[serde(default = "default_metadata")]
    pub metadata: serde_json::Value,
}

impl Deal {
    /// Minimal constructor used by tests and adapters; every optional field
    /// starts empty and the timestamps start at now().
    #[must_use]
    pub fn new(marketplace: Marketplace, external_id: &str, title: &str, price: f64) -> Self {
        Self {
            external_id: external_id.to_string(),
            marketplace,
            title: title.to_string(),
            description: None,
            price,
            currency: default_currency(),
            original_price: None,
            image_url: None,
            listing_url: String::new(),
            location: None,
            condition: default_condition(),
            shipping_cost: 0.0,
            free_shipping: true,
            seller_name: None,
            seller_rating: 0.0,
            seller_reviews: 0,
            category: None,
            score: None,
            score_breakdown: None,
            listed_at: Utc::now(),
            metadata: default_metadata(),
        }
    }
}

/// One completed sale, the estimator's only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoldListing {
    /// Final sale price.
    pub price: f64,
    /// When the listing ended.
    pub sold_date: DateTime<Utc>,
    /// Condition display name, if reported.
    #[serde(default)]
    pub condition: Option<String>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn sparse_payload_fills_defaults() {
        let json = r#"{
            "external_id": "e1",
            "marketplace": "ebay",
            "title": "PS5 console",
            "price": 389.5
        }"#;
        let Ok(deal) = serde_json::from_str::<Deal>(json) else {
            panic!("sparse deal payload should deserialize");
        };
        assert_eq!(deal.currency, "USD");
        assert_eq!(deal.condition, "Unknown");
        assert_eq!(deal.listing_url, "");
        assert!(deal.score.is_none());
        assert_eq!(deal.metadata, serde_json::json!({}));
    }

    #[test]
    fn serializes_with_snake_case_wire_names() {
        let deal = Deal::new(Marketplace::Ebay, "e1", "PS5 console", 389.5);
        let Ok(value) = serde_json::to_value(&deal) else {
            panic!("deal should serialize");
        };
        assert_eq!(
            value.get("external_id").and_then(serde_json::Value::as_str),
            Some("e1")
        );
        assert_eq!(
            value.get("marketplace").and_then(serde_json::Value::as_str),
            Some("ebay")
        );
        assert_eq!(
            value.get("free_shipping").and_then(serde_json::Value::as_bool),
            Some(true)
        );
        assert!(value.get("externalId").is_none());
    }

    #[test]
    fn missing_payload_fields_that_matter_fail_decoding() {
        let json = r#"{"marketplace": "ebay", "title": "no id", "price": 1.0}"#;
        assert!(serde_json::from_str::<Deal>(json).is_err());
    }
}
