//! Market value estimation from recently completed sales.

use std::sync::Arc;

use crate::domain::SoldListing;
use crate::marketplace::MarketplaceClient;

/// Number of recent sales sampled per estimate.
const SAMPLE_SIZE: u32 = 20;

/// Produces a single representative price for a free-text item description.
///
/// The algorithm is a flat average of recent sold prices: no outlier
/// rejection, no recency weighting. "No data" is a distinct outcome from
/// "confirmed zero value", so an empty sample yields `None` rather than 0.
#[derive(Debug, Clone)]
pub struct MarketValueEstimator {
    client: Arc<dyn MarketplaceClient>,
}

impl MarketValueEstimator {
    /// Creates an estimator backed by the given marketplace client.
    #[must_use]
    pub fn new(client: Arc<dyn MarketplaceClient>) -> Self {
        Self { client }
    }

    /// Mean of up to [`SAMPLE_SIZE`] recent sold prices, rounded half-up at
    /// the cent boundary. `None` when the provider reports no sales.
    ///
    /// The sold-listings lookup degrades failures to an empty list, so a
    /// provider outage shows up as "no data" here, never as an error.
    pub async fn estimate(&self, keywords: &str) -> Option<f64> {
        let sales = self.client.recent_sales(keywords, SAMPLE_SIZE).await;
        mean_price(&sales)
    }

    /// Label describing where estimates come from, e.g. `ebay_sold_listings`.
    #[must_use]
    pub fn source(&self) -> String {
        format!("{}_sold_listings", self.client.marketplace())
    }
}

fn mean_price(sales: &[SoldListing]) -> Option<f64> {
    if sales.is_empty() {
        return None;
    }
    let total: f64 = sales.iter().map(|sale| sale.price).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = total / sales.len() as f64;
    Some(round_to_cents(mean))
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::domain::{Deal, Marketplace, SearchCriteria};
    use crate::error::ApiError;

    #[derive(Debug)]
    struct FixedSales(Vec<SoldListing>);

    #[async_trait]
    impl MarketplaceClient for FixedSales {
        fn marketplace(&self) -> Marketplace {
            Marketplace::Ebay
        }

        async fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<Deal>, ApiError> {
            Ok(Vec::new())
        }

        async fn get_details(&self, _external_id: &str) -> Result<Deal, ApiError> {
            Err(ApiError::NotFound("Item not found".to_string()))
        }

        async fn recent_sales(&self, _keywords: &str, _max_results: u32) -> Vec<SoldListing> {
            self.0.clone()
        }
    }

    fn sale(price: f64) -> SoldListing {
        SoldListing {
            price,
            sold_date: Utc::now(),
            condition: None,
        }
    }

    #[tokio::test]
    async fn no_sales_means_no_estimate() {
        let estimator = MarketValueEstimator::new(Arc::new(FixedSales(Vec::new())));
        assert_eq!(estimator.estimate("rare widget").await, None);
    }

    #[tokio::test]
    async fn estimate_is_the_rounded_mean() {
        let estimator =
            MarketValueEstimator::new(Arc::new(FixedSales(vec![sale(10.0), sale(20.0), sale(25.55)])));
        assert_eq!(estimator.estimate("widget").await, Some(18.52));
    }

    #[test]
    fn rounding_is_half_up_at_the_cent() {
        // 2.25 and 2.5 average to 2.375, which rounds up to 2.38.
        assert_eq!(mean_price(&[sale(2.25), sale(2.5)]), Some(2.38));
    }

    #[test]
    fn single_sale_is_its_own_mean() {
        assert_eq!(mean_price(&[sale(120.0)]), Some(120.0));
    }

    #[test]
    fn source_names_the_marketplace() {
        let estimator = MarketValueEstimator::new(Arc::new(FixedSales(Vec::new())));
        assert_eq!(estimator.source(), "ebay_sold_listings");
    }
}
