//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::identity::IdentityProvider;
use crate::persistence::Store;
use crate::service::{DealSearchService, SavedSearchService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Every field is an `Arc`, so the per-request clone is a handful of
/// refcount bumps.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live marketplace search and market-value estimation.
    pub deal_service: Arc<DealSearchService>,
    /// Saved-search CRUD, quota enforcement and deal persistence.
    pub saved_searches: Arc<SavedSearchService>,
    /// Storage backend, shared with the services.
    pub store: Arc<dyn Store>,
    /// Identity provider for token verification and account lifecycle.
    pub identity: Arc<dyn IdentityProvider>,
    /// Runtime configuration.
    pub config: Arc<AppConfig>,
}
