//! Marketplace adapters.
//!
//! Each provider implements [`MarketplaceClient`], translating the normalized
//! [`SearchCriteria`] into its own query protocol and its responses back into
//! [`Deal`] records. The search service holds clients as `Arc<dyn
//! MarketplaceClient>` and fans requests out across them.

pub mod ebay;

pub use ebay::EbayClient;

use async_trait::async_trait;

use crate::domain::{Deal, Marketplace, SearchCriteria, SoldListing};
use crate::error::ApiError;

/// One external listing provider.
#[async_trait]
pub trait MarketplaceClient: Send + Sync + std::fmt::Debug {
    /// Which marketplace this client talks to.
    fn marketplace(&self) -> Marketplace;

    /// Runs a listing search and returns normalized deals in provider order.
    ///
    /// Zero matches is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidArgument`] when the criteria carry no keywords;
    /// [`ApiError::Upstream`] when the provider reports a failure or the
    /// request itself fails.
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Deal>, ApiError>;

    /// Fetches one listing by its provider-assigned id.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the provider has no such id;
    /// [`ApiError::Upstream`] when the request fails.
    async fn get_details(&self, external_id: &str) -> Result<Deal, ApiError>;

    /// Fetches recently completed sales for the given keywords.
    ///
    /// Degrades every failure to an empty list: the only consumer is the
    /// market value estimator, which already treats "no data" as a valid
    /// outcome.
    async fn recent_sales(&self, keywords: &str, max_results: u32) -> Vec<SoldListing>;
}
