//! eBay adapter: Finding API for search and completed listings, Shopping API
//! for single-item details.
//!
//! The Finding API wraps nearly every field in a single-element JSON array
//! and serves numbers as strings; the wire structs here model that shape once
//! so the rest of the crate only ever sees [`Deal`] and [`SoldListing`].
//! Numeric fields are parsed leniently: malformed or missing provider data
//! becomes 0 rather than dropping the whole record.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::config::AppConfig;
use crate::domain::{Deal, Marketplace, SearchCriteria, SoldListing};
use crate::error::ApiError;
use crate::marketplace::MarketplaceClient;

/// Finding API page-size ceiling; larger requests are clamped.
const MAX_PAGE_SIZE: u32 = 100;
/// Finding API service version sent with every request.
const FINDING_SERVICE_VERSION: &str = "1.0.0";
/// Shopping API version sent with detail requests.
const SHOPPING_API_VERSION: &str = "967";

/// Maps a condition name to the Finding API condition code.
///
/// Unrecognized names yield `None` and the filter is silently dropped from
/// the request. Generic `used` maps to the same code as `good`.
fn condition_filter_id(condition: &str) -> Option<&'static str> {
    match condition.to_ascii_lowercase().as_str() {
        "new" => Some("1000"),
        "like_new" => Some("1500"),
        "excellent" => Some("2000"),
        "very_good" => Some("2500"),
        "good" | "used" => Some("3000"),
        "acceptable" => Some("4000"),
        _ => None,
    }
}

/// Client for the eBay Finding and Shopping APIs.
#[derive(Debug, Clone)]
pub struct EbayClient {
    app_id: String,
    finding_url: String,
    shopping_url: String,
    http: reqwest::Client,
}

impl EbayClient {
    /// Builds a client from service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| ApiError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            app_id: config.ebay_app_id.clone(),
            finding_url: config.ebay_finding_url.clone(),
            shopping_url: config.ebay_shopping_url.clone(),
            http,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| ApiError::Upstream(format!("request failed: {e}")))?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl MarketplaceClient for EbayClient {
    fn marketplace(&self) -> Marketplace {
        Marketplace::Ebay
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Deal>, ApiError> {
        if criteria.is_empty() {
            return Err(ApiError::InvalidArgument(
                "Keywords are required for eBay search".to_string(),
            ));
        }
        let params = build_search_params(&self.app_id, criteria);
        let envelope: FindingEnvelope = self.get_json(&self.finding_url, &params).await?;
        let deals = decode_search_response(envelope)?;
        tracing::debug!(count = deals.len(), "eBay search completed");
        Ok(deals)
    }

    async fn get_details(&self, external_id: &str) -> Result<Deal, ApiError> {
        let params = build_detail_params(&self.app_id, external_id);
        let envelope: ShoppingEnvelope = self.get_json(&self.shopping_url, &params).await?;
        decode_item_response(envelope)
    }

    async fn recent_sales(&self, keywords: &str, max_results: u32) -> Vec<SoldListing> {
        let params = build_sold_params(&self.app_id, keywords, max_results);
        match self
            .get_json::<FindingEnvelope>(&self.finding_url, &params)
            .await
        {
            Ok(envelope) => decode_sold_response(envelope),
            Err(error) => {
                tracing::warn!(%error, "completed-listings lookup failed, returning no sales");
                Vec::new()
            }
        }
    }
}

fn base_finding_params(operation: &str, app_id: &str) -> Vec<(String, String)> {
    vec![
        ("OPERATION-NAME".to_string(), operation.to_string()),
        (
            "SERVICE-VERSION".to_string(),
            FINDING_SERVICE_VERSION.to_string(),
        ),
        ("SECURITY-APPNAME".to_string(), app_id.to_string()),
        ("RESPONSE-DATA-FORMAT".to_string(), "JSON".to_string()),
        ("REST-PAYLOAD".to_string(), String::new()),
    ]
}

fn push_filter(params: &mut Vec<(String, String)>, index: &mut u32, name: &str, value: &str) {
    params.push((format!("itemFilter({index}).name"), name.to_string()));
    params.push((format!("itemFilter({index}).value"), value.to_string()));
    *index += 1;
}

fn push_price_filter(params: &mut Vec<(String, String)>, index: &mut u32, name: &str, value: f64) {
    params.push((format!("itemFilter({index}).name"), name.to_string()));
    params.push((format!("itemFilter({index}).value"), value.to_string()));
    params.push((format!("itemFilter({index}).paramName"), "Currency".to_string()));
    params.push((format!("itemFilter({index}).paramValue"), "USD".to_string()));
    *index += 1;
}

fn build_search_params(app_id: &str, criteria: &SearchCriteria) -> Vec<(String, String)> {
    let mut params = base_finding_params("findItemsAdvanced", app_id);
    params.push(("keywords".to_string(), criteria.joined_keywords()));
    params.push((
        "paginationInput.entriesPerPage".to_string(),
        criteria.max_results.min(MAX_PAGE_SIZE).to_string(),
    ));
    params.push(("sortOrder".to_string(), criteria.sort_order.clone()));

    let mut filter = 0;
    if let Some(min) = criteria.price_min {
        push_price_filter(&mut params, &mut filter, "MinPrice", min);
    }
    if let Some(max) = criteria.price_max {
        push_price_filter(&mut params, &mut filter, "MaxPrice", max);
    }
    if let Some(condition) = &criteria.condition {
        if let Some(code) = condition_filter_id(condition) {
            push_filter(&mut params, &mut filter, "Condition", code);
        }
    }
    // Buy-it-now listings only, never auctions.
    push_filter(&mut params, &mut filter, "ListingType", "FixedPrice");
    params
}

fn build_sold_params(app_id: &str, keywords: &str, max_results: u32) -> Vec<(String, String)> {
    let mut params = base_finding_params("findCompletedItems", app_id);
    params.push(("keywords".to_string(), keywords.to_string()));
    params.push((
        "paginationInput.entriesPerPage".to_string(),
        max_results.min(MAX_PAGE_SIZE).to_string(),
    ));
    params.push(("sortOrder".to_string(), "EndTimeSoonest".to_string()));
    let mut filter = 0;
    push_filter(&mut params, &mut filter, "SoldItemsOnly", "true");
    params
}

fn build_detail_params(app_id: &str, item_id: &str) -> Vec<(String, String)> {
    vec![
        ("callname".to_string(), "GetSingleItem".to_string()),
        ("responseencoding".to_string(), "JSON".to_string()),
        ("appid".to_string(), app_id.to_string()),
        ("siteid".to_string(), "0".to_string()),
        ("version".to_string(), SHOPPING_API_VERSION.to_string()),
        ("ItemID".to_string(), item_id.to_string()),
        (
            "IncludeSelector".to_string(),
            "Description,Details,ItemSpecifics".to_string(),
        ),
    ]
}

// Finding API wire shapes. Every field is a single-element array and every
// number is a string.

#[derive(Debug, Default, Deserialize)]
struct FindingEnvelope {
    #[serde(rename = "findItemsAdvancedResponse", default)]
    advanced: Vec<FindingResponse>,
    #[serde(rename = "findCompletedItemsResponse", default)]
    completed: Vec<FindingResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct FindingResponse {
    #[serde(default)]
    ack: Vec<String>,
    #[serde(rename = "errorMessage", default)]
    error_message: Vec<FindingErrorMessage>,
    #[serde(rename = "searchResult", default)]
    search_result: Vec<FindingSearchResult>,
}

impl FindingResponse {
    fn is_success(&self) -> bool {
        self.ack.first().map(String::as_str) == Some("Success")
    }

    fn error_text(&self) -> String {
        self.error_message
            .first()
            .and_then(|m| m.error.first())
            .and_then(|e| e.message.first())
            .cloned()
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FindingErrorMessage {
    #[serde(default)]
    error: Vec<FindingErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct FindingErrorDetail {
    #[serde(default)]
    message: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FindingSearchResult {
    #[serde(default)]
    item: Vec<FindingItem>,
}

#[derive(Debug, Default, Deserialize)]
struct FindingItem {
    #[serde(rename = "itemId", default)]
    item_id: Vec<String>,
    #[serde(default)]
    title: Vec<String>,
    #[serde(rename = "galleryURL", default)]
    gallery_url: Vec<String>,
    #[serde(rename = "pictureURLLarge", default)]
    picture_url_large: Vec<String>,
    #[serde(rename = "viewItemURL", default)]
    view_item_url: Vec<String>,
    #[serde(default)]
    location: Vec<String>,
    #[serde(default)]
    condition: Vec<FindingCondition>,
    #[serde(rename = "sellingStatus", default)]
    selling_status: Vec<FindingSellingStatus>,
    #[serde(rename = "shippingInfo", default)]
    shipping_info: Vec<FindingShippingInfo>,
    #[serde(rename = "sellerInfo", default)]
    seller_info: Vec<FindingSellerInfo>,
    #[serde(rename = "primaryCategory", default)]
    primary_category: Vec<FindingCategory>,
    #[serde(rename = "listingInfo", default)]
    listing_info: Vec<FindingListingInfo>,
    #[serde(rename = "topRatedListing", default)]
    top_rated_listing: Vec<String>,
    #[serde(rename = "returnsAccepted", default)]
    returns_accepted: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FindingCondition {
    #[serde(rename = "conditionDisplayName", default)]
    condition_display_name: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FindingSellingStatus {
    #[serde(rename = "currentPrice", default)]
    current_price: Vec<FindingMoney>,
}

#[derive(Debug, Default, Deserialize)]
struct FindingMoney {
    #[serde(rename = "__value__", default)]
    value: String,
    #[serde(rename = "@currencyId", default)]
    currency_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct FindingShippingInfo {
    #[serde(rename = "shippingServiceCost", default)]
    shipping_service_cost: Vec<FindingMoney>,
}

#[derive(Debug, Default, Deserialize)]
struct FindingSellerInfo {
    #[serde(rename = "sellerUserName", default)]
    seller_user_name: Vec<String>,
    #[serde(rename = "feedbackScore", default)]
    feedback_score: Vec<String>,
    #[serde(rename = "positiveFeedbackPercent", default)]
    positive_feedback_percent: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FindingCategory {
    #[serde(rename = "categoryName", default)]
    category_name: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FindingListingInfo {
    #[serde(rename = "startTime", default)]
    start_time: Vec<String>,
    #[serde(rename = "endTime", default)]
    end_time: Vec<String>,
    #[serde(rename = "watchCount", default)]
    watch_count: Vec<String>,
}

// Shopping API wire shapes: PascalCase keys, plain numbers.

#[derive(Debug, Default, Deserialize)]
struct ShoppingEnvelope {
    #[serde(rename = "Item")]
    item: Option<ShoppingItem>,
}

#[derive(Debug, Deserialize)]
struct ShoppingItem {
    #[serde(rename = "ItemID", default)]
    item_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "CurrentPrice")]
    current_price: Option<ShoppingMoney>,
    #[serde(rename = "PictureURL", default)]
    picture_url: Vec<String>,
    #[serde(rename = "ViewItemURLForNaturalSearch", default)]
    view_item_url: String,
    #[serde(rename = "Location")]
    location: Option<String>,
    #[serde(rename = "ConditionDisplayName")]
    condition_display_name: Option<String>,
    #[serde(rename = "ShippingCostSummary")]
    shipping_cost_summary: Option<ShoppingShippingCostSummary>,
    #[serde(rename = "Seller")]
    seller: Option<ShoppingSeller>,
    #[serde(rename = "ItemSpecifics")]
    item_specifics: Option<ShoppingItemSpecifics>,
    #[serde(rename = "ReturnPolicy")]
    return_policy: Option<ShoppingReturnPolicy>,
    #[serde(rename = "Quantity", default = "default_quantity")]
    quantity: u32,
    #[serde(rename = "QuantitySold", default)]
    quantity_sold: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Default, Deserialize)]
struct ShoppingMoney {
    #[serde(rename = "Value", default)]
    value: f64,
    #[serde(rename = "CurrencyID", default)]
    currency_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ShoppingShippingCostSummary {
    #[serde(rename = "ShippingServiceCost")]
    shipping_service_cost: Option<ShoppingMoney>,
}

#[derive(Debug, Default, Deserialize)]
struct ShoppingSeller {
    #[serde(rename = "UserID")]
    user_id: Option<String>,
    #[serde(rename = "PositiveFeedbackPercent", default)]
    positive_feedback_percent: f64,
    #[serde(rename = "FeedbackScore", default)]
    feedback_score: u32,
}

#[derive(Debug, Default, Deserialize)]
struct ShoppingItemSpecifics {
    #[serde(rename = "NameValueList", default = "empty_json_array")]
    name_value_list: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct ShoppingReturnPolicy {
    #[serde(rename = "ReturnsAccepted", default)]
    returns_accepted: String,
}

fn empty_json_array() -> serde_json::Value {
    json!([])
}

fn lenient_f64(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0.0)
}

fn lenient_u32(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

fn lenient_time(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc))
}

fn decode_search_response(envelope: FindingEnvelope) -> Result<Vec<Deal>, ApiError> {
    let Some(response) = envelope.advanced.into_iter().next() else {
        return Err(ApiError::Upstream(
            "eBay API error: Unknown error".to_string(),
        ));
    };
    if !response.is_success() {
        return Err(ApiError::Upstream(format!(
            "eBay API error: {}",
            response.error_text()
        )));
    }
    Ok(response
        .search_result
        .into_iter()
        .next()
        .map(|result| result.item)
        .unwrap_or_default()
        .into_iter()
        .map(deal_from_finding_item)
        .collect())
}

fn decode_sold_response(envelope: FindingEnvelope) -> Vec<SoldListing> {
    let Some(response) = envelope.completed.into_iter().next() else {
        return Vec::new();
    };
    if !response.is_success() {
        return Vec::new();
    }
    response
        .search_result
        .into_iter()
        .next()
        .map(|result| result.item)
        .unwrap_or_default()
        .into_iter()
        .map(sold_from_finding_item)
        .collect()
}

fn decode_item_response(envelope: ShoppingEnvelope) -> Result<Deal, ApiError> {
    let Some(item) = envelope.item else {
        return Err(ApiError::NotFound("Item not found".to_string()));
    };
    Ok(deal_from_shopping_item(item))
}

fn deal_from_finding_item(item: FindingItem) -> Deal {
    let price_node = item
        .selling_status
        .first()
        .and_then(|s| s.current_price.first());
    let price = lenient_f64(price_node.map(|p| p.value.as_str()));
    let currency = price_node
        .map(|p| p.currency_id.clone())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "USD".to_string());
    let shipping_cost = lenient_f64(
        item.shipping_info
            .first()
            .and_then(|s| s.shipping_service_cost.first())
            .map(|m| m.value.as_str()),
    );
    let seller = item.seller_info.first();
    let listing = item.listing_info.first();

    Deal {
        external_id: item.item_id.first().cloned().unwrap_or_default(),
        marketplace: Marketplace::Ebay,
        title: item
            .title
            .first()
            .cloned()
            .unwrap_or_else(|| "Unknown Item".to_string()),
        description: None,
        price,
        currency,
        original_price: None,
        image_url: item
            .gallery_url
            .first()
            .or_else(|| item.picture_url_large.first())
            .cloned(),
        listing_url: item.view_item_url.first().cloned().unwrap_or_default(),
        location: item.location.first().cloned(),
        condition: item
            .condition
            .first()
            .and_then(|c| c.condition_display_name.first())
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string()),
        shipping_cost,
        free_shipping: shipping_cost == 0.0,
        seller_name: seller.and_then(|s| s.seller_user_name.first()).cloned(),
        seller_rating: lenient_f64(
            seller
                .and_then(|s| s.positive_feedback_percent.first())
                .map(String::as_str),
        ),
        seller_reviews: lenient_u32(
            seller
                .and_then(|s| s.feedback_score.first())
                .map(String::as_str),
        ),
        category: item
            .primary_category
            .first()
            .and_then(|c| c.category_name.first())
            .cloned(),
        score: None,
        score_breakdown: None,
        listed_at: lenient_time(
            listing
                .and_then(|l| l.start_time.first())
                .map(String::as_str),
        ),
        metadata: json!({
            "topRatedListing": item.top_rated_listing.first().map(String::as_str) == Some("true"),
            "returnsAccepted": item.returns_accepted.first().map(String::as_str) == Some("true"),
            "watchCount": lenient_u32(
                listing.and_then(|l| l.watch_count.first()).map(String::as_str),
            ),
        }),
    }
}

fn sold_from_finding_item(item: FindingItem) -> SoldListing {
    SoldListing {
        price: lenient_f64(
            item.selling_status
                .first()
                .and_then(|s| s.current_price.first())
                .map(|p| p.value.as_str()),
        ),
        sold_date: lenient_time(
            item.listing_info
                .first()
                .and_then(|l| l.end_time.first())
                .map(String::as_str),
        ),
        condition: item
            .condition
            .first()
            .and_then(|c| c.condition_display_name.first())
            .cloned(),
    }
}

fn deal_from_shopping_item(item: ShoppingItem) -> Deal {
    let price = item.current_price.as_ref().map_or(0.0, |m| m.value);
    let currency = item
        .current_price
        .as_ref()
        .map(|m| m.currency_id.clone())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "USD".to_string());
    let shipping_cost = item
        .shipping_cost_summary
        .as_ref()
        .and_then(|s| s.shipping_service_cost.as_ref())
        .map_or(0.0, |m| m.value);
    let returns_accepted = item
        .return_policy
        .as_ref()
        .is_some_and(|p| p.returns_accepted == "ReturnsAccepted");
    let image_url = item.picture_url.first().cloned();
    let metadata = json!({
        "quantity": item.quantity,
        "quantitySold": item.quantity_sold,
        "returnsAccepted": returns_accepted,
        "images": item.picture_url,
        "itemSpecifics": item
            .item_specifics
            .map_or_else(empty_json_array, |s| s.name_value_list),
    });

    Deal {
        external_id: item.item_id,
        marketplace: Marketplace::Ebay,
        title: item.title,
        description: item.description,
        price,
        currency,
        original_price: None,
        image_url,
        listing_url: item.view_item_url,
        location: item.location,
        condition: item
            .condition_display_name
            .unwrap_or_else(|| "Unknown".to_string()),
        shipping_cost,
        free_shipping: shipping_cost == 0.0,
        seller_name: item.seller.as_ref().and_then(|s| s.user_id.clone()),
        seller_rating: item
            .seller
            .as_ref()
            .map_or(0.0, |s| s.positive_feedback_percent),
        seller_reviews: item.seller.as_ref().map_or(0, |s| s.feedback_score),
        category: None,
        score: None,
        score_breakdown: None,
        listed_at: Utc::now(),
        metadata,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn full_criteria() -> SearchCriteria {
        SearchCriteria {
            keywords: vec!["sony".to_string(), "wh-1000xm4".to_string()],
            price_min: Some(50.0),
            price_max: Some(200.0),
            condition: Some("used".to_string()),
            sort_order: "BestMatch".to_string(),
            max_results: 250,
        }
    }

    #[test]
    fn search_params_carry_indexed_filters_in_order() {
        let params = build_search_params("app-123", &full_criteria());
        assert_eq!(param(&params, "OPERATION-NAME"), Some("findItemsAdvanced"));
        assert_eq!(param(&params, "keywords"), Some("sony wh-1000xm4"));
        assert_eq!(param(&params, "itemFilter(0).name"), Some("MinPrice"));
        assert_eq!(param(&params, "itemFilter(0).value"), Some("50"));
        assert_eq!(param(&params, "itemFilter(0).paramValue"), Some("USD"));
        assert_eq!(param(&params, "itemFilter(1).name"), Some("MaxPrice"));
        assert_eq!(param(&params, "itemFilter(2).name"), Some("Condition"));
        assert_eq!(param(&params, "itemFilter(2).value"), Some("3000"));
        assert_eq!(param(&params, "itemFilter(3).name"), Some("ListingType"));
        assert_eq!(param(&params, "itemFilter(3).value"), Some("FixedPrice"));
    }

    #[test]
    fn page_size_is_clamped_to_provider_ceiling() {
        let params = build_search_params("app-123", &full_criteria());
        assert_eq!(param(&params, "paginationInput.entriesPerPage"), Some("100"));
    }

    #[test]
    fn unknown_condition_is_dropped_from_filters() {
        let criteria = SearchCriteria {
            keywords: vec!["ps5".to_string()],
            condition: Some("mint".to_string()),
            ..SearchCriteria::default()
        };
        let params = build_search_params("app-123", &criteria);
        // With no price bounds and the condition dropped, the fixed-price
        // policy takes the first filter slot.
        assert_eq!(param(&params, "itemFilter(0).name"), Some("ListingType"));
        assert!(params.iter().all(|(_, v)| v != "Condition"));
    }

    #[test]
    fn condition_table_matches_provider_codes() {
        assert_eq!(condition_filter_id("new"), Some("1000"));
        assert_eq!(condition_filter_id("like_new"), Some("1500"));
        assert_eq!(condition_filter_id("excellent"), Some("2000"));
        assert_eq!(condition_filter_id("very_good"), Some("2500"));
        assert_eq!(condition_filter_id("good"), Some("3000"));
        assert_eq!(condition_filter_id("used"), Some("3000"));
        assert_eq!(condition_filter_id("acceptable"), Some("4000"));
        assert_eq!(condition_filter_id("ACCEPTABLE"), Some("4000"));
        assert_eq!(condition_filter_id("mint"), None);
    }

    fn search_fixture(items: &str) -> String {
        format!(
            r#"{{"findItemsAdvancedResponse": [{{
                "ack": ["Success"],
                "searchResult": [{{"item": {items}}}]
            }}]}}"#
        )
    }

    const ITEM_FIXTURE: &str = r#"[{
        "itemId": ["110012345"],
        "title": ["Sony WH-1000XM4 Headphones"],
        "galleryURL": ["https://example.com/thumb.jpg"],
        "viewItemURL": ["https://example.com/item/110012345"],
        "location": ["Austin,TX,USA"],
        "condition": [{"conditionDisplayName": ["Very Good"]}],
        "sellingStatus": [{"currentPrice": [{"@currencyId": "USD", "__value__": "189.99"}]}],
        "shippingInfo": [{"shippingServiceCost": [{"@currencyId": "USD", "__value__": "12.5"}]}],
        "sellerInfo": [{
            "sellerUserName": ["audio_resale"],
            "feedbackScore": ["2481"],
            "positiveFeedbackPercent": ["99.6"]
        }],
        "primaryCategory": [{"categoryName": ["Headphones"]}],
        "listingInfo": [{
            "startTime": ["2026-08-01T12:30:00.000Z"],
            "watchCount": ["17"]
        }],
        "topRatedListing": ["true"]
    }]"#;

    #[test]
    fn search_response_normalizes_items() {
        let Ok(envelope) =
            serde_json::from_str::<FindingEnvelope>(&search_fixture(ITEM_FIXTURE))
        else {
            panic!("fixture should deserialize");
        };
        let Ok(deals) = decode_search_response(envelope) else {
            panic!("decode should succeed");
        };
        let Some(deal) = deals.first() else {
            panic!("expected one deal");
        };
        assert_eq!(deal.external_id, "110012345");
        assert_eq!(deal.title, "Sony WH-1000XM4 Headphones");
        assert_eq!(deal.price, 189.99);
        assert_eq!(deal.currency, "USD");
        assert_eq!(deal.condition, "Very Good");
        assert_eq!(deal.shipping_cost, 12.5);
        assert!(!deal.free_shipping);
        assert_eq!(deal.seller_name.as_deref(), Some("audio_resale"));
        assert_eq!(deal.seller_reviews, 2481);
        assert_eq!(deal.category.as_deref(), Some("Headphones"));
        assert_eq!(
            deal.metadata.get("watchCount").and_then(serde_json::Value::as_u64),
            Some(17)
        );
        assert_eq!(
            deal.metadata
                .get("topRatedListing")
                .and_then(serde_json::Value::as_bool),
            Some(true)
        );
    }

    #[test]
    fn malformed_price_becomes_zero_not_a_dropped_record() {
        let items = r#"[{
            "itemId": ["42"],
            "title": ["Broken price"],
            "sellingStatus": [{"currentPrice": [{"@currencyId": "", "__value__": "not-a-number"}]}]
        }]"#;
        let Ok(envelope) = serde_json::from_str::<FindingEnvelope>(&search_fixture(items)) else {
            panic!("fixture should deserialize");
        };
        let Ok(deals) = decode_search_response(envelope) else {
            panic!("decode should succeed");
        };
        let Some(deal) = deals.first() else {
            panic!("record must survive a bad price");
        };
        assert_eq!(deal.price, 0.0);
        assert_eq!(deal.currency, "USD");
        assert_eq!(deal.condition, "Unknown");
    }

    #[test]
    fn provider_failure_ack_surfaces_as_upstream_error() {
        let json = r#"{"findItemsAdvancedResponse": [{
            "ack": ["Failure"],
            "errorMessage": [{"error": [{"message": ["Invalid application id"]}]}]
        }]}"#;
        let Ok(envelope) = serde_json::from_str::<FindingEnvelope>(json) else {
            panic!("fixture should deserialize");
        };
        let Err(ApiError::Upstream(message)) = decode_search_response(envelope) else {
            panic!("expected Upstream error");
        };
        assert_eq!(message, "eBay API error: Invalid application id");
    }

    #[test]
    fn zero_matches_is_an_empty_list() {
        let json = r#"{"findItemsAdvancedResponse": [{"ack": ["Success"]}]}"#;
        let Ok(envelope) = serde_json::from_str::<FindingEnvelope>(json) else {
            panic!("fixture should deserialize");
        };
        let Ok(deals) = decode_search_response(envelope) else {
            panic!("decode should succeed");
        };
        assert!(deals.is_empty());
    }

    #[test]
    fn sold_response_yields_sold_listings() {
        let json = r#"{"findCompletedItemsResponse": [{
            "ack": ["Success"],
            "searchResult": [{"item": [{
                "sellingStatus": [{"currentPrice": [{"@currencyId": "USD", "__value__": "120.0"}]}],
                "listingInfo": [{"endTime": ["2026-07-15T08:00:00.000Z"]}],
                "condition": [{"conditionDisplayName": ["Good"]}]
            }]}]
        }]}"#;
        let Ok(envelope) = serde_json::from_str::<FindingEnvelope>(json) else {
            panic!("fixture should deserialize");
        };
        let sales = decode_sold_response(envelope);
        let Some(sale) = sales.first() else {
            panic!("expected one sale");
        };
        assert_eq!(sale.price, 120.0);
        assert_eq!(sale.condition.as_deref(), Some("Good"));
        let Ok(expected) = DateTime::parse_from_rfc3339("2026-07-15T08:00:00Z") else {
            panic!("expected timestamp should parse");
        };
        assert_eq!(sale.sold_date, expected.with_timezone(&Utc));
    }

    #[test]
    fn failed_sold_lookup_degrades_to_empty() {
        let json = r#"{"findCompletedItemsResponse": [{"ack": ["Failure"]}]}"#;
        let Ok(envelope) = serde_json::from_str::<FindingEnvelope>(json) else {
            panic!("fixture should deserialize");
        };
        assert!(decode_sold_response(envelope).is_empty());
    }

    #[test]
    fn missing_item_maps_to_not_found() {
        let Ok(envelope) = serde_json::from_str::<ShoppingEnvelope>(r#"{"Ack": "Success"}"#)
        else {
            panic!("fixture should deserialize");
        };
        let Err(ApiError::NotFound(message)) = decode_item_response(envelope) else {
            panic!("expected NotFound");
        };
        assert_eq!(message, "Item not found");
    }

    #[test]
    fn item_details_populate_description_and_metadata() {
        let json = r#"{"Item": {
            "ItemID": "110012345",
            "Title": "Sony WH-1000XM4 Headphones",
            "Description": "<p>Lightly used.</p>",
            "CurrentPrice": {"Value": 189.99, "CurrencyID": "USD"},
            "PictureURL": ["https://example.com/1.jpg", "https://example.com/2.jpg"],
            "ViewItemURLForNaturalSearch": "https://example.com/item/110012345",
            "Location": "Austin, TX",
            "ConditionDisplayName": "Very Good",
            "ShippingCostSummary": {"ShippingServiceCost": {"Value": 0.0, "CurrencyID": "USD"}},
            "Seller": {"UserID": "audio_resale", "PositiveFeedbackPercent": 99.6, "FeedbackScore": 2481},
            "ItemSpecifics": {"NameValueList": [{"Name": "Brand", "Value": ["Sony"]}]},
            "ReturnPolicy": {"ReturnsAccepted": "ReturnsAccepted"},
            "Quantity": 3,
            "QuantitySold": 1
        }}"#;
        let Ok(envelope) = serde_json::from_str::<ShoppingEnvelope>(json) else {
            panic!("fixture should deserialize");
        };
        let Ok(deal) = decode_item_response(envelope) else {
            panic!("decode should succeed");
        };
        assert_eq!(deal.external_id, "110012345");
        assert_eq!(deal.description.as_deref(), Some("<p>Lightly used.</p>"));
        assert_eq!(deal.price, 189.99);
        assert!(deal.free_shipping);
        assert_eq!(deal.seller_name.as_deref(), Some("audio_resale"));
        assert_eq!(
            deal.metadata
                .get("images")
                .and_then(serde_json::Value::as_array)
                .map(Vec::len),
            Some(2)
        );
        assert_eq!(
            deal.metadata.get("quantity").and_then(serde_json::Value::as_u64),
            Some(3)
        );
        assert_eq!(
            deal.metadata
                .get("returnsAccepted")
                .and_then(serde_json::Value::as_bool),
            Some(true)
        );
    }
}
