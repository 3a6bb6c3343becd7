//! Service layer: business logic orchestration.
//!
//! [`DealSearchService`] fans searches out across marketplace clients,
//! [`MarketValueEstimator`] turns completed sales into a price estimate, and
//! [`SavedSearchService`] owns saved-search CRUD, quotas and deal
//! persistence.

pub mod deal_search;
pub mod estimator;
pub mod saved_search;

pub use deal_search::DealSearchService;
pub use estimator::MarketValueEstimator;
pub use saved_search::SavedSearchService;
