//! # quoril-api
//!
//! Deal aggregation backend for the Quoril reselling assistant.
//!
//! The service searches live marketplace listings, estimates resale value
//! from completed sales, and manages per-user saved searches with plan-based
//! quotas. Credentials never touch this service — authentication is
//! delegated to a GoTrue-compatible identity provider.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── DealSearchService + MarketValueEstimator (service/)
//!     ├── SavedSearchService (service/)
//!     │
//!     ├── MarketplaceClient → eBay Finding/Shopping (marketplace/)
//!     ├── IdentityProvider → GoTrue REST (identity/)
//!     │
//!     └── Store → PostgreSQL | in-memory (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod identity;
pub mod marketplace;
pub mod persistence;
pub mod service;
