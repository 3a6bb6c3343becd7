//! quoril-api server entry point.
//!
//! Wires the configured store, marketplace adapters and identity provider
//! into the Axum HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use quoril_api::api;
use quoril_api::app_state::AppState;
use quoril_api::config::{AppConfig, StoreBackend};
use quoril_api::identity::{HttpIdentity, IdentityProvider};
use quoril_api::marketplace::{EbayClient, MarketplaceClient};
use quoril_api::persistence::{MemoryStore, PostgresStore, Store};
use quoril_api::service::{DealSearchService, MarketValueEstimator, SavedSearchService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(addr = %config.listen_addr, "starting quoril-api");

    // Build storage
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .min_connections(config.database_min_connections)
                .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
                .connect(&config.database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            Arc::new(PostgresStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store - data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    // Build marketplace adapters and the service layer
    let ebay: Arc<dyn MarketplaceClient> = Arc::new(EbayClient::new(&config)?);
    let estimator = MarketValueEstimator::new(Arc::clone(&ebay));
    let deal_service = Arc::new(DealSearchService::new(vec![ebay], estimator));
    let saved_searches = Arc::new(SavedSearchService::new(Arc::clone(&store)));

    let identity: Arc<dyn IdentityProvider> = Arc::new(HttpIdentity::new(&config)?);

    // Build application state
    let app_state = AppState {
        deal_service,
        saved_searches,
        store,
        identity,
        config: Arc::clone(&config),
    };

    // Build router
    let app = Router::new().merge(api::build_router());

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        app.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
    };

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
