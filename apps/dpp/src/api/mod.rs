//! # Passport HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET  /health` - Health check (auth-exempt)
//! - `GET  /status` - Store counters
//! - `POST /passports` - Create a record
//! - `GET|PATCH|DELETE /passports/{id}` - Read, partial-update, archive
//! - `GET  /passports/{id}/graph` - Relationship graph
//! - `GET  /stats/countries|categories|status` - Aggregations
//! - `POST /passports/{id}/anchor` - Anchor to a ledger platform
//! - `POST /passports/{id}/mint` - Mint an ownership token
//! - `POST /tokens/{tokenId}/transfer` - Simulated DAO transfer
//! - `POST /tokens/{tokenId}/metadata` - Simulated metadata update
//! - `POST /suppliers`, `GET /suppliers/{id}` - Supplier registry
//! - `POST /imports`, `GET /imports/{id}` - Batch import + job polling
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `DPP_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `DPP_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `DPP_API_KEY`: If set, requires Bearer token authentication
//!
//! ## Ledger Configuration (Environment Variables)
//!
//! - `DPP_CONTRACT_ADDRESS`: Default token contract address; the all-zero
//!   placeholder address turns every ledger action into a mock-success no-op
//! - `DPP_LEDGER_PLATFORM`: Platform recorded on mint for never-anchored records

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `dpp::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    anchor_handler, archive_passport_handler, category_stats_handler, country_stats_handler,
    create_passport_handler, create_supplier_handler, get_passport_handler, get_supplier_handler,
    health_handler, mint_handler, passport_graph_handler, poll_import_handler,
    start_import_handler, status_handler, status_stats_handler, token_metadata_handler,
    transfer_token_handler, update_passport_handler,
};
#[allow(unused_imports)]
pub use types::{
    AnchorRequest, ArchiveResponse, CategoryCount, CountryCount, ErrorResponse, HealthResponse,
    ImportAccepted, ImportRequest, MintRequest, StatusCount, StatusResponse, TokenMetadataRequest,
    TransferRequest,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use dpp_core::{
    DppError, ImportJobTracker, InMemoryStore, LedgerConfig, LedgerFacade, SequentialIds,
    SupplierRegistry,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// The mutable state behind the API: passports, suppliers and import jobs.
///
/// One lock guards all three, so every mutation is serialized and reads
/// observe read-your-writes consistency per record.
#[derive(Debug)]
pub struct Stores {
    pub passports: InMemoryStore,
    pub suppliers: SupplierRegistry,
    pub jobs: ImportJobTracker,
}

impl Default for Stores {
    fn default() -> Self {
        Self::new()
    }
}

impl Stores {
    /// Empty stores with production defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            passports: InMemoryStore::new(),
            suppliers: SupplierRegistry::new(),
            jobs: ImportJobTracker::new(Arc::new(SequentialIds::new())),
        }
    }
}

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The guarded stores.
    pub stores: Arc<RwLock<Stores>>,
    /// The ledger facade; immutable, shared without a lock.
    pub ledger: Arc<LedgerFacade>,
}

impl AppState {
    /// App state with the ledger facade configured from the environment.
    #[must_use]
    pub fn new(stores: Stores) -> Self {
        let facade = LedgerFacade::new(ledger_config_from_env(), Arc::new(SequentialIds::new()));
        Self::with_ledger(stores, facade)
    }

    /// App state with an explicitly configured ledger facade.
    #[must_use]
    pub fn with_ledger(stores: Stores, ledger: LedgerFacade) -> Self {
        Self {
            stores: Arc::new(RwLock::new(stores)),
            ledger: Arc::new(ledger),
        }
    }
}

/// Build the ledger configuration from `DPP_CONTRACT_ADDRESS` and
/// `DPP_LEDGER_PLATFORM`.
#[must_use]
pub fn ledger_config_from_env() -> LedgerConfig {
    let mut config = LedgerConfig::default();
    if let Ok(address) = std::env::var("DPP_CONTRACT_ADDRESS")
        && !address.is_empty()
    {
        config.contract_address = Some(address);
    }
    if let Ok(platform) = std::env::var("DPP_LEDGER_PLATFORM")
        && !platform.is_empty()
    {
        config.platform_hint = platform;
    }
    config
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `DPP_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("DPP_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (DPP_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in DPP_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No DPP_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against DoS (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Check if authentication is enabled
    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set DPP_API_KEY environment variable to enable authentication."
        );
    }

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/passports", post(handlers::create_passport_handler))
        .route(
            "/passports/{id}",
            get(handlers::get_passport_handler)
                .patch(handlers::update_passport_handler)
                .delete(handlers::archive_passport_handler),
        )
        .route("/passports/{id}/graph", get(handlers::passport_graph_handler))
        .route("/passports/{id}/anchor", post(handlers::anchor_handler))
        .route("/passports/{id}/mint", post(handlers::mint_handler))
        .route(
            "/tokens/{token_id}/transfer",
            post(handlers::transfer_token_handler),
        )
        .route(
            "/tokens/{token_id}/metadata",
            post(handlers::token_metadata_handler),
        )
        .route("/stats/countries", get(handlers::country_stats_handler))
        .route("/stats/categories", get(handlers::category_stats_handler))
        .route("/stats/status", get(handlers::status_stats_handler))
        .route("/suppliers", post(handlers::create_supplier_handler))
        .route("/suppliers/{id}", get(handlers::get_supplier_handler))
        .route("/imports", post(handlers::start_import_handler))
        .route("/imports/{id}", get(handlers::poll_import_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, stores: Stores) -> Result<(), DppError> {
    let state = AppState::new(stores);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DppError::Configuration(format!("Bind failed: {e}")))?;

    tracing::info!("Passport HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| DppError::Configuration(format!("Server error: {e}")))
}
