//! Deal search orchestration: fans one logical search out across the
//! registered marketplace clients and merges results.

use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::domain::{Deal, Marketplace, MarketplaceSelector, SearchCriteria};
use crate::error::ApiError;
use crate::marketplace::MarketplaceClient;
use crate::service::MarketValueEstimator;

/// Coordinates marketplace clients for search, detail and estimate requests.
///
/// Clients are held in registration order; a multi-provider search
/// concatenates each provider's results in that order, with no interleaving
/// or cross-provider ranking. One provider today, but nothing here changes
/// when more are registered.
#[derive(Debug, Clone)]
pub struct DealSearchService {
    clients: Vec<Arc<dyn MarketplaceClient>>,
    estimator: MarketValueEstimator,
}

impl DealSearchService {
    /// Creates a service over the given clients.
    #[must_use]
    pub fn new(clients: Vec<Arc<dyn MarketplaceClient>>, estimator: MarketValueEstimator) -> Self {
        Self { clients, estimator }
    }

    /// Returns the market value estimator.
    #[must_use]
    pub fn estimator(&self) -> &MarketValueEstimator {
        &self.estimator
    }

    /// Runs the search against every client admitted by `selector`.
    ///
    /// The fan-out is concurrent — providers are independent — but results
    /// are concatenated in registration order regardless of completion
    /// order, and any single provider failure fails the whole request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] before any upstream call when
    /// the criteria carry no keywords, [`ApiError::UnsupportedMarketplace`]
    /// when a named provider has no registered client, and any provider's
    /// error otherwise.
    pub async fn search(
        &self,
        selector: MarketplaceSelector,
        criteria: &SearchCriteria,
    ) -> Result<Vec<Deal>, ApiError> {
        if criteria.is_empty() {
            return Err(ApiError::InvalidArgument(
                "Keywords are required".to_string(),
            ));
        }

        let selected: Vec<&Arc<dyn MarketplaceClient>> = self
            .clients
            .iter()
            .filter(|client| selector.matches(client.marketplace()))
            .collect();

        if selected.is_empty() {
            if let MarketplaceSelector::One(marketplace) = selector {
                return Err(ApiError::UnsupportedMarketplace(marketplace.to_string()));
            }
            return Ok(Vec::new());
        }

        let batches = try_join_all(selected.iter().map(|client| client.search(criteria))).await?;
        let deals: Vec<Deal> = batches.into_iter().flatten().collect();
        tracing::info!(count = deals.len(), "deal search completed");
        Ok(deals)
    }

    /// Fetches one listing's details from the named provider.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnsupportedMarketplace`] when no client is
    /// registered for `marketplace`, or the client's own error.
    pub async fn get_details(
        &self,
        marketplace: Marketplace,
        external_id: &str,
    ) -> Result<Deal, ApiError> {
        let client = self.client_for(marketplace)?;
        client.get_details(external_id).await
    }

    /// Estimates market value for free-text keywords; `None` when the
    /// provider has no completed-sales data.
    pub async fn estimate_value(&self, keywords: &str) -> Option<f64> {
        self.estimator.estimate(keywords).await
    }

    fn client_for(&self, marketplace: Marketplace) -> Result<&Arc<dyn MarketplaceClient>, ApiError> {
        self.clients
            .iter()
            .find(|client| client.marketplace() == marketplace)
            .ok_or_else(|| ApiError::UnsupportedMarketplace(marketplace.to_string()))
    }
}
