//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers. Handlers
//! translate between the wire and the core: core errors map onto status
//! codes here, and configuration failures are logged in full while callers
//! only ever see a generic message.

use super::{
    AppState,
    types::{
        AnchorRequest, ArchiveResponse, CategoryCount, CountryCount, ErrorResponse,
        HealthResponse, ImportAccepted, ImportRequest, MintRequest, StatusCount, StatusResponse,
        TokenMetadataRequest, TransferRequest, validate_identifier,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dpp_core::{
    DppError, PassportDraft, PassportStore, Supplier, ThreadRandom, UpdatePayload, category_stats,
    country_stats, derive_graph, status_stats,
};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Map a core error onto its HTTP response.
fn error_response(error: &DppError) -> Response {
    let status = match error {
        DppError::PassportNotFound(_)
        | DppError::SupplierNotFound(_)
        | DppError::JobNotFound(_) => StatusCode::NOT_FOUND,
        DppError::Validation(_) | DppError::Serialization(_) => StatusCode::BAD_REQUEST,
        DppError::Configuration(_) | DppError::Io(_) => {
            // Never leak configuration or I/O details to callers
            tracing::error!(error = %error, "internal error while serving request");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal configuration error")),
            )
                .into_response();
        }
    };
    (status, Json(ErrorResponse::new(error.to_string()))).into_response()
}

// =============================================================================
// HEALTH & STATUS HANDLERS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Get store counters.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stores = state.stores.read().await;
    let passport_count = stores.passports.len();
    let active_count = stores.passports.active_count();

    let response = StatusResponse {
        passport_count,
        active_count,
        archived_count: passport_count.saturating_sub(active_count),
        supplier_count: stores.suppliers.len(),
        import_job_count: stores.jobs.len(),
    };

    (StatusCode::OK, Json(response))
}

// =============================================================================
// PASSPORT HANDLERS
// =============================================================================

/// Create a record under a fresh store-assigned id.
pub async fn create_passport_handler(
    State(state): State<AppState>,
    Json(draft): Json<PassportDraft>,
) -> Response {
    let mut stores = state.stores.write().await;
    match stores.passports.create(draft) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Get an active record by id.
pub async fn get_passport_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(e) = validate_identifier(&id) {
        return error_response(&e);
    }
    let stores = state.stores.read().await;
    match stores.passports.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Merge a partial update into an active record.
pub async fn update_passport_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePayload>,
) -> Response {
    if let Err(e) = validate_identifier(&id) {
        return error_response(&e);
    }
    let mut stores = state.stores.write().await;
    match stores.passports.update(&id, &payload) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Archive (soft-delete) a record. Idempotent.
pub async fn archive_passport_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(e) = validate_identifier(&id) {
        return error_response(&e);
    }
    let mut stores = state.stores.write().await;
    match stores.passports.archive(&id) {
        Ok(_) => (StatusCode::OK, Json(ArchiveResponse::for_record(&id))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Derive the relationship graph for an active record.
pub async fn passport_graph_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(e) = validate_identifier(&id) {
        return error_response(&e);
    }
    let stores = state.stores.read().await;
    match stores.passports.get(&id) {
        Ok(record) => {
            let graph = derive_graph(&record, &stores.suppliers);
            (StatusCode::OK, Json(graph)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

// =============================================================================
// STATS HANDLERS
// =============================================================================

/// Records per country of origin, archived included.
pub async fn country_stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stores = state.stores.read().await;
    let counts: Vec<CountryCount> = country_stats(&stores.passports.snapshot())
        .into_iter()
        .map(CountryCount::from)
        .collect();
    (StatusCode::OK, Json(counts))
}

/// Records per product category.
pub async fn category_stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stores = state.stores.read().await;
    let counts: Vec<CategoryCount> = category_stats(&stores.passports.snapshot())
        .into_iter()
        .map(CategoryCount::from)
        .collect();
    (StatusCode::OK, Json(counts))
}

/// Records per metadata status.
pub async fn status_stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stores = state.stores.read().await;
    let counts: Vec<StatusCount> = status_stats(&stores.passports.snapshot())
        .into_iter()
        .map(StatusCount::from)
        .collect();
    (StatusCode::OK, Json(counts))
}

// =============================================================================
// LEDGER HANDLERS
// =============================================================================

/// Anchor a record to a ledger platform.
pub async fn anchor_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AnchorRequest>,
) -> Response {
    if let Err(e) = validate_identifier(&id) {
        return error_response(&e);
    }
    let mut stores = state.stores.write().await;
    match state
        .ledger
        .anchor(&mut stores.passports, &id, &request.platform)
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Mint an ownership token for a record.
pub async fn mint_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MintRequest>,
) -> Response {
    if let Err(e) = validate_identifier(&id) {
        return error_response(&e);
    }
    let mut stores = state.stores.write().await;
    match state.ledger.mint(
        &mut stores.passports,
        &id,
        &request.contract_address,
        &request.recipient_address,
        request.metadata_uri.as_deref(),
    ) {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Simulate a DAO-governed ownership transfer.
pub async fn transfer_token_handler(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    Json(request): Json<TransferRequest>,
) -> Response {
    match state
        .ledger
        .dao_transfer(&token_id, &request.new_owner_address)
    {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Simulate a token metadata update.
pub async fn token_metadata_handler(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    Json(request): Json<TokenMetadataRequest>,
) -> Response {
    match state.ledger.update_token_metadata(
        &token_id,
        &request.metadata_uri,
        request.contract_address.as_deref(),
    ) {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => error_response(&e),
    }
}

// =============================================================================
// SUPPLIER HANDLERS
// =============================================================================

/// Register a supplier in the global registry.
pub async fn create_supplier_handler(
    State(state): State<AppState>,
    Json(supplier): Json<Supplier>,
) -> Response {
    if let Err(e) = validate_identifier(&supplier.id) {
        return error_response(&e);
    }
    let mut stores = state.stores.write().await;
    match stores.suppliers.insert(supplier.clone()) {
        Ok(()) => (StatusCode::CREATED, Json(supplier)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Get a supplier by id.
pub async fn get_supplier_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(e) = validate_identifier(&id) {
        return error_response(&e);
    }
    let stores = state.stores.read().await;
    match stores.suppliers.get(&id) {
        Ok(supplier) => (StatusCode::OK, Json(supplier)).into_response(),
        Err(e) => error_response(&e),
    }
}

// =============================================================================
// BATCH IMPORT HANDLERS
// =============================================================================

/// Initiate a batch import: insert the batch and register a pending job.
///
/// The batch is validated in full before any insertion, so a rejected
/// request leaves the store untouched.
pub async fn start_import_handler(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Response {
    if let Err(e) = request.validate() {
        return error_response(&e);
    }

    let mut stores = state.stores.write().await;

    // Pre-check duplicates against the store and within the batch itself
    let mut batch_ids = std::collections::BTreeSet::new();
    for passport in &request.passports {
        if stores.passports.contains(&passport.id) || !batch_ids.insert(passport.id.clone()) {
            return error_response(&DppError::Validation(format!(
                "duplicate passport id: {}",
                passport.id
            )));
        }
    }

    for supplier in request.suppliers {
        if let Err(e) = stores.suppliers.insert(supplier) {
            return error_response(&e);
        }
    }
    for passport in &request.passports {
        if let Err(e) = stores.passports.insert(passport.clone()) {
            return error_response(&e);
        }
    }

    let job = stores.jobs.register(format!(
        "Batch of {} passports accepted for processing",
        request.passports.len()
    ));
    tracing::info!(job_id = %job.id, passports = request.passports.len(), "batch import accepted");

    (
        StatusCode::ACCEPTED,
        Json(ImportAccepted {
            job_id: job.id,
            status: job.status,
        }),
    )
        .into_response()
}

/// Poll an import job, possibly transitioning it forward.
pub async fn poll_import_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(e) = validate_identifier(&id) {
        return error_response(&e);
    }
    let mut stores = state.stores.write().await;
    // Request-scoped draw; no shared mutable seed across polls
    let mut rng = ThreadRandom;
    match stores.jobs.poll(&id, &mut rng) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(e) => error_response(&e),
    }
}
