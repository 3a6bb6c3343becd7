//! Deal handlers: live search, listing details, market value and capture.
//!
//! These routes take no bearer token. Capture does not trust the payload
//! for ownership either way: stored rows are stamped with the parent
//! search's owner.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{
    DealDetailQuery, DealListResponse, DealResponse, DealSearchQuery, MarketValueResponse,
    SaveDealsRequest, SavedDealsResponse, UserDealsQuery,
};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::app_state::AppState;
use crate::domain::{Marketplace, MarketplaceSelector};
use crate::error::{ApiError, ErrorResponse};

/// `GET /deals/search` — Search live marketplace listings.
///
/// # Errors
///
/// Returns [`ApiError::InvalidArgument`] when no keywords are given,
/// [`ApiError::UnsupportedMarketplace`] for an unknown provider and
/// [`ApiError::Upstream`] when the provider call fails.
#[utoipa::path(
    get,
    path = "/api/deals/search",
    tag = "Deals",
    summary = "Search live listings",
    description = "Runs a marketplace search and returns scored, normalized listings. `marketplace=all` fans out to every registered provider.",
    params(DealSearchQuery),
    responses(
        (status = 200, description = "Matching deals", body = DealListResponse),
        (status = 400, description = "Missing keywords or unsupported marketplace", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse),
    )
)]
pub async fn search_deals(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DealSearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let criteria = query.criteria();
    // Keywords are validated before the marketplace name so a request that
    // gets both wrong hears about the keywords.
    if criteria.is_empty() {
        return Err(ApiError::InvalidArgument(
            "Keywords are required".to_string(),
        ));
    }

    let selector = MarketplaceSelector::parse(&query.marketplace)?;
    let deals = state.deal_service.search(selector, &criteria).await?;

    Ok(Json(DealListResponse {
        success: true,
        count: deals.len(),
        deals,
    }))
}

/// `GET /deals/market-value/:keywords` — Estimate resale value from
/// completed sales.
#[utoipa::path(
    get,
    path = "/api/deals/market-value/{keywords}",
    tag = "Deals",
    summary = "Estimate market value",
    description = "Averages recent completed-sale prices for the given keywords. `estimatedValue` is null when no sales data exists.",
    params(
        ("keywords" = String, Path, description = "Free-text keywords, URL-encoded"),
    ),
    responses(
        (status = 200, description = "Value estimate", body = MarketValueResponse),
    )
)]
pub async fn market_value(
    State(state): State<AppState>,
    Path(keywords): Path<String>,
) -> impl IntoResponse {
    let estimated_value = state.deal_service.estimate_value(&keywords).await;

    Json(MarketValueResponse {
        success: true,
        keywords,
        estimated_value,
        source: state.deal_service.estimator().source(),
    })
}

/// `POST /deals/save` — Capture a batch of deals under a saved search.
///
/// # Errors
///
/// Returns [`ApiError::InvalidArgument`] when the payload lacks a search id
/// or a deals array, and [`ApiError::NotFound`] for an unknown search.
#[utoipa::path(
    post,
    path = "/api/deals/save",
    tag = "Deals",
    summary = "Save deals",
    description = "Stores search results under a saved search. Rows are stamped with the search owner's id regardless of the payload.",
    request_body = SaveDealsRequest,
    responses(
        (status = 200, description = "Stored deal rows", body = SavedDealsResponse),
        (status = 400, description = "Missing search id or deals array", body = ErrorResponse),
        (status = 404, description = "No such search", body = ErrorResponse),
    )
)]
pub async fn save_deals(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SaveDealsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(search_id), Some(deals)) = (request.search_id, request.deals) else {
        return Err(ApiError::InvalidArgument("Invalid request data".to_string()));
    };

    let stored = state.saved_searches.save_deals(search_id, deals).await?;

    Ok(Json(SavedDealsResponse {
        success: true,
        count: stored.len(),
        deals: stored,
    }))
}

/// `GET /deals/user/:user_id` — List a user's captured deals, best first.
///
/// # Errors
///
/// Returns [`ApiError::Persistence`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/deals/user/{user_id}",
    tag = "Deals",
    summary = "List captured deals",
    description = "Returns stored deals with a score at or above `minScore`, ordered by score then recency. Unscored deals are never included.",
    params(
        ("user_id" = Uuid, Path, description = "Owner of the deals"),
        UserDealsQuery,
    ),
    responses(
        (status = 200, description = "Stored deal rows", body = SavedDealsResponse),
    )
)]
pub async fn user_deals(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    ApiQuery(query): ApiQuery<UserDealsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let deals = state
        .saved_searches
        .list_user_deals(user_id, query.min_score, query.limit, query.offset)
        .await?;

    Ok(Json(SavedDealsResponse {
        success: true,
        count: deals.len(),
        deals,
    }))
}

/// `GET /deals/:id` — Fetch one listing with detail fields populated.
///
/// # Errors
///
/// Returns [`ApiError::UnsupportedMarketplace`] for an unknown provider and
/// [`ApiError::NotFound`] when the listing does not exist.
#[utoipa::path(
    get,
    path = "/api/deals/{id}",
    tag = "Deals",
    summary = "Get listing details",
    description = "Fetches a single listing from its provider, including description and seller details.",
    params(
        ("id" = String, Path, description = "Provider listing id"),
        DealDetailQuery,
    ),
    responses(
        (status = 200, description = "Listing details", body = DealResponse),
        (status = 400, description = "Unsupported marketplace", body = ErrorResponse),
        (status = 404, description = "No such listing", body = ErrorResponse),
    )
)]
pub async fn deal_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<DealDetailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let marketplace = query.marketplace.parse::<Marketplace>()?;
    let deal = state.deal_service.get_details(marketplace, &id).await?;

    Ok(Json(DealResponse {
        success: true,
        deal,
    }))
}

/// Deal routes. The static segments take precedence over `/deals/{id}`, so
/// `search`, `save` and `user` never parse as listing ids.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deals/search", get(search_deals))
        .route("/deals/market-value/{keywords}", get(market_value))
        .route("/deals/save", post(save_deals))
        .route("/deals/user/{user_id}", get(user_deals))
        .route("/deals/{id}", get(deal_details))
}
