//! Integration tests for the passport HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
// Allow holding MutexGuard across await in auth tests - tests are serialized
// intentionally to avoid env var conflicts
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use dpp::api::{
    AppState, ArchiveResponse, ErrorResponse, HealthResponse, ImportAccepted, StatusResponse,
    Stores, create_router,
};
use dpp_core::{
    DigitalProductPassport, ImportJobStatus, LedgerConfig, LedgerFacade, LifecycleEvent,
    Manufacturer, PassportStore, SequentialIds, Supplier, SupplyChainLink,
    primitives::PLACEHOLDER_CONTRACT_ADDRESS,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use time::macros::datetime;

/// Mutex to serialize tests that touch process environment variables.
static AUTH_TEST_MUTEX: Mutex<()> = Mutex::new(());

const VALID_ADDRESS: &str = "0x00000000000000000000000000000000deadbeef";

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Remove every environment variable the router reads.
fn cleanup_env() {
    // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe {
        std::env::remove_var("DPP_API_KEY");
        std::env::remove_var("DPP_RATE_LIMIT");
        std::env::remove_var("DPP_CONTRACT_ADDRESS");
        std::env::remove_var("DPP_LEDGER_PLATFORM");
    }
}

/// Guard wrapper that holds the mutex and ensures cleanup on drop.
struct TestGuard {
    _guard: std::sync::MutexGuard<'static, ()>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        cleanup_env();
    }
}

fn acquire_env() -> TestGuard {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    TestGuard { _guard: guard }
}

/// Create a test server over empty stores.
/// Returns a guard that must be kept alive during the test.
fn create_test_server() -> (TestServer, TestGuard) {
    let guard = acquire_env();
    let state = AppState::new(Stores::new());
    let router = create_router(state);
    (TestServer::new(router).unwrap(), guard)
}

/// A seeded record in the shape the legacy fixtures use.
fn seeded_passport() -> DigitalProductPassport {
    let mut record = DigitalProductPassport::new(
        "DPP001",
        "Wool Coat",
        "Textiles",
        datetime!(2024-05-01 12:00 UTC),
    );
    record.gtin = "04012345678901".to_string();
    record.model_number = "WC-18".to_string();
    record.manufacturer = Manufacturer {
        name: "Atlantic Textiles".to_string(),
        did: Some("did:ebsi:zAtlantic".to_string()),
        address: Some("Porto, PT".to_string()),
        eori: None,
    };
    record.product_details.country_of_origin = Some("PT".to_string());
    record.supply_chain_links = vec![SupplyChainLink {
        supplier_id: "SUP1".to_string(),
        supplied_item: "Merino wool".to_string(),
        notes: None,
    }];
    record.lifecycle_events = vec![LifecycleEvent {
        id: "E1".to_string(),
        event_type: "manufactured".to_string(),
        timestamp: datetime!(2024-04-20 09:00 UTC),
        location: Some("Porto".to_string()),
        responsible_party: None,
        data: None,
    }];
    record
}

fn seeded_stores() -> Stores {
    let mut stores = Stores::new();
    stores
        .suppliers
        .insert(Supplier {
            id: "SUP1".to_string(),
            name: "Merino Farms".to_string(),
            location: "NZ".to_string(),
            materials_supplied: vec!["wool".to_string()],
            contact_person: "A. Shepherd".to_string(),
        })
        .unwrap();

    stores.passports.insert(seeded_passport()).unwrap();

    let mut second = DigitalProductPassport::new(
        "DPP002",
        "Circuit Board",
        "Electronics",
        datetime!(2024-05-01 12:00 UTC),
    );
    second.metadata.status = "published".to_string();
    stores.passports.insert(second).unwrap();

    stores
}

/// Create a test server with pre-populated stores.
/// Returns a guard that must be kept alive during the test.
fn create_populated_test_server() -> (TestServer, TestGuard) {
    let guard = acquire_env();
    let state = AppState::new(seeded_stores());
    let router = create_router(state);
    (TestServer::new(router).unwrap(), guard)
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// STATUS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_status_empty_store() {
    let (server, _guard) = create_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.passport_count, 0);
    assert_eq!(status.active_count, 0);
    assert_eq!(status.supplier_count, 0);
}

#[tokio::test]
async fn test_status_populated_store() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.passport_count, 2);
    assert_eq!(status.active_count, 2);
    assert_eq!(status.archived_count, 0);
    assert_eq!(status.supplier_count, 1);
}

// =============================================================================
// PASSPORT CRUD TESTS
// =============================================================================

#[tokio::test]
async fn test_create_passport_assigns_id() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/passports")
        .json(&json!({
            "productName": "Wool Coat",
            "category": "Textiles"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let record: DigitalProductPassport = response.json();
    assert_eq!(record.id, "DPP001");
    assert_eq!(record.product_name, "Wool Coat");
    assert!(!record.metadata.is_archived);
}

#[tokio::test]
async fn test_create_passport_rejects_empty_name() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/passports")
        .json(&json!({"productName": "  ", "category": "Textiles"}))
        .await;

    response.assert_status_bad_request();
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("productName"));
}

#[tokio::test]
async fn test_get_passport_found() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/passports/DPP001").await;

    response.assert_status_ok();
    let record: DigitalProductPassport = response.json();
    assert_eq!(record.id, "DPP001");
    assert_eq!(record.product_name, "Wool Coat");
}

#[tokio::test]
async fn test_get_passport_not_found_names_id() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/passports/NOPE").await;

    response.assert_status_not_found();
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("NOPE"));
}

#[tokio::test]
async fn test_update_merges_partial_payload() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .patch("/passports/DPP001")
        .json(&json!({"productName": "New Name"}))
        .await;

    response.assert_status_ok();
    let updated: DigitalProductPassport = response.json();
    assert_eq!(updated.product_name, "New Name");
    // Unspecified fields preserved
    assert_eq!(updated.category, "Textiles");
    assert_eq!(updated.gtin, "04012345678901");
    assert_eq!(updated.manufacturer.name, "Atlantic Textiles");
    // Timestamp moved strictly forward from the seeded value
    assert!(updated.metadata.last_updated > datetime!(2024-05-01 12:00 UTC));
}

#[tokio::test]
async fn test_update_unknown_record_is_404() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .patch("/passports/NOPE")
        .json(&json!({"productName": "X"}))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_update_malformed_payload_is_400() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .patch("/passports/DPP001")
        .text("{not valid json")
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_archive_then_get_is_404_and_archive_is_idempotent() {
    let (server, _guard) = create_populated_test_server();

    let response = server.delete("/passports/DPP001").await;
    response.assert_status_ok();
    let confirmation: ArchiveResponse = response.json();
    assert_eq!(confirmation.id, "DPP001");

    // Archived records vanish from active reads
    server.get("/passports/DPP001").await.assert_status_not_found();

    // A second archive still succeeds
    let response = server.delete("/passports/DPP001").await;
    response.assert_status_ok();

    // But archiving an id that never existed is 404
    server.delete("/passports/NOPE").await.assert_status_not_found();

    // Counters reflect the soft delete
    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.passport_count, 2);
    assert_eq!(status.active_count, 1);
    assert_eq!(status.archived_count, 1);
}

// =============================================================================
// GRAPH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_graph_for_seeded_record() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/passports/DPP001/graph").await;

    response.assert_status_ok();
    let graph: serde_json::Value = response.json();
    let nodes = graph["nodes"].as_array().unwrap();
    let edges = graph["edges"].as_array().unwrap();

    // product + manufacturer + supplier + component + 1 lifecycle event
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[0]["id"], "DPP001");
    assert_eq!(nodes[0]["type"], "product");
    assert!(nodes.iter().any(|n| n["id"] == "atlantic_textiles"));
    assert!(nodes.iter().any(|n| n["id"] == "DPP001_merino_wool_0"));
    assert!(nodes.iter().any(|n| n["id"] == "DPP001_event_E1"));

    // manufactured_by + supplies_item + is_part_of + underwent_event
    assert_eq!(edges.len(), 4);
    assert!(
        edges
            .iter()
            .any(|e| e["label"] == "supplies_item" && e["from"] == "SUP1")
    );
}

#[tokio::test]
async fn test_graph_for_unknown_record_is_404() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/passports/NOPE/graph").await;

    response.assert_status_not_found();
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("NOPE"));
}

// =============================================================================
// STATS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_country_stats_sum_and_unknown_bucket() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/stats/countries").await;

    response.assert_status_ok();
    let counts: Vec<serde_json::Value> = response.json();
    let total: u64 = counts.iter().map(|c| c["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 2);
    assert!(counts.iter().any(|c| c["countryCode"] == "PT"));
    // DPP002 has no origin country
    assert!(counts.iter().any(|c| c["countryCode"] == "UNKNOWN"));
}

#[tokio::test]
async fn test_country_stats_include_archived_records() {
    let (server, _guard) = create_populated_test_server();

    server.delete("/passports/DPP001").await.assert_status_ok();

    let counts: Vec<serde_json::Value> = server.get("/stats/countries").await.json();
    let total: u64 = counts.iter().map(|c| c["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 2, "archived records are still scanned");
}

#[tokio::test]
async fn test_category_and_status_stats() {
    let (server, _guard) = create_populated_test_server();

    let categories: Vec<serde_json::Value> = server.get("/stats/categories").await.json();
    assert!(
        categories
            .iter()
            .any(|c| c["category"] == "Textiles" && c["count"] == 1)
    );

    let statuses: Vec<serde_json::Value> = server.get("/stats/status").await.json();
    assert!(statuses.iter().any(|s| s["status"] == "draft"));
    assert!(statuses.iter().any(|s| s["status"] == "published"));
}

// =============================================================================
// LEDGER ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_anchor_populates_blockchain_identifiers() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .post("/passports/DPP001/anchor")
        .json(&json!({"platform": "EBSI"}))
        .await;

    response.assert_status_ok();
    let record: serde_json::Value = response.json();
    let identifiers = &record["blockchainIdentifiers"];
    assert_eq!(identifiers["platform"], "EBSI");
    let hash = identifiers["anchorTransactionHash"].as_str().unwrap();
    assert!(hash.starts_with("0x"));
    assert!(identifiers["contractAddress"].is_string());
    assert!(identifiers["tokenId"].is_string());
}

#[tokio::test]
async fn test_anchor_empty_platform_is_400() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .post("/passports/DPP001/anchor")
        .json(&json!({"platform": ""}))
        .await;

    response.assert_status_bad_request();
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("DPP001"));
}

#[tokio::test]
async fn test_anchor_unknown_record_is_404() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .post("/passports/NOPE/anchor")
        .json(&json!({"platform": "EBSI"}))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_mint_returns_receipt_and_updates_record() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .post("/passports/DPP001/mint")
        .json(&json!({
            "contractAddress": VALID_ADDRESS,
            "recipientAddress": "0xrecipient",
            "metadataUri": "ipfs://meta"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let receipt: serde_json::Value = response.json();
    assert!(receipt["tokenId"].is_string());
    assert_eq!(receipt["contractAddress"], VALID_ADDRESS);
    assert!(
        receipt["transactionHash"]
            .as_str()
            .unwrap()
            .starts_with("0x")
    );
    assert!(receipt["message"].as_str().unwrap().contains("0xrecipient"));

    let record: serde_json::Value = server.get("/passports/DPP001").await.json();
    assert_eq!(
        record["blockchainIdentifiers"]["contractAddress"],
        VALID_ADDRESS
    );
}

#[tokio::test]
async fn test_mint_missing_fields_is_400() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .post("/passports/DPP001/mint")
        .json(&json!({"contractAddress": "", "recipientAddress": "0xrecipient"}))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_transfer_validates_address_shape() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/tokens/42/transfer")
        .json(&json!({"newOwnerAddress": VALID_ADDRESS}))
        .await;
    response.assert_status_ok();
    let receipt: serde_json::Value = response.json();
    assert_eq!(receipt["tokenId"], "42");
    assert_eq!(receipt["newOwnerAddress"], VALID_ADDRESS);

    let response = server
        .post("/tokens/42/transfer")
        .json(&json!({"newOwnerAddress": "not-an-address"}))
        .await;
    response.assert_status_bad_request();
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("not-an-address"));
}

#[tokio::test]
async fn test_token_metadata_without_contract_is_500_generic() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/tokens/42/metadata")
        .json(&json!({"metadataUri": "ipfs://meta"}))
        .await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = response.json();
    // Generic message only; configuration details stay in the logs
    assert_eq!(error.error, "internal configuration error");
}

#[tokio::test]
async fn test_token_metadata_with_supplied_contract() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/tokens/42/metadata")
        .json(&json!({"metadataUri": "ipfs://meta", "contractAddress": VALID_ADDRESS}))
        .await;

    response.assert_status_ok();
    let receipt: serde_json::Value = response.json();
    assert_eq!(receipt["contractAddress"], VALID_ADDRESS);
}

#[tokio::test]
async fn test_placeholder_contract_short_circuits_ledger() {
    let guard = acquire_env();
    let state = AppState::with_ledger(
        seeded_stores(),
        LedgerFacade::new(
            LedgerConfig {
                contract_address: Some(PLACEHOLDER_CONTRACT_ADDRESS.to_string()),
                platform_hint: "SIMULATED".to_string(),
            },
            Arc::new(SequentialIds::new()),
        ),
    );
    let server = TestServer::new(create_router(state)).unwrap();
    let _guard = guard;

    // Anchor succeeds as a mock and leaves the record untouched
    let response = server
        .post("/passports/DPP001/anchor")
        .json(&json!({"platform": ""}))
        .await;
    response.assert_status_ok();
    let record: serde_json::Value = response.json();
    assert!(record["blockchainIdentifiers"].is_null());

    // Mint returns the canned mock receipt
    let response = server
        .post("/passports/DPP001/mint")
        .json(&json!({"contractAddress": "", "recipientAddress": ""}))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let receipt: serde_json::Value = response.json();
    assert_eq!(receipt["contractAddress"], PLACEHOLDER_CONTRACT_ADDRESS);
    assert!(receipt["message"].as_str().unwrap().contains("Simulated"));
}

// =============================================================================
// SUPPLIER ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_supplier_create_and_get() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/suppliers")
        .json(&json!({
            "id": "SUP9",
            "name": "Button Works",
            "location": "DE",
            "materialsSupplied": ["horn buttons"],
            "contactPerson": "B. Knopf"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let supplier: Supplier = server.get("/suppliers/SUP9").await.json();
    assert_eq!(supplier.name, "Button Works");

    server.get("/suppliers/NOPE").await.assert_status_not_found();
}

#[tokio::test]
async fn test_supplier_duplicate_is_400() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .post("/suppliers")
        .json(&json!({"id": "SUP1", "name": "Duplicate"}))
        .await;

    response.assert_status_bad_request();
}

// =============================================================================
// BATCH IMPORT TESTS
// =============================================================================

#[tokio::test]
async fn test_import_creates_records_and_pending_job() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/imports")
        .json(&json!({
            "passports": [
                {
                    "id": "DPP100",
                    "productName": "Imported Coat",
                    "category": "Textiles",
                    "metadata": {"status": "draft", "lastUpdated": "2024-05-01T12:00:00Z"}
                }
            ],
            "suppliers": [{"id": "SUP1", "name": "Merino Farms"}]
        }))
        .await;

    response.assert_status(axum::http::StatusCode::ACCEPTED);
    let accepted: ImportAccepted = response.json();
    assert_eq!(accepted.status, ImportJobStatus::PendingProcessing);
    assert!(!accepted.job_id.is_empty());

    // Records landed in the store
    server.get("/passports/DPP100").await.assert_status_ok();
    server.get("/suppliers/SUP1").await.assert_status_ok();
}

#[tokio::test]
async fn test_import_duplicate_id_rejected_without_partial_insert() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .post("/imports")
        .json(&json!({
            "passports": [
                {
                    "id": "DPP001",
                    "productName": "Clash",
                    "category": "Textiles",
                    "metadata": {"status": "draft", "lastUpdated": "2024-05-01T12:00:00Z"}
                }
            ]
        }))
        .await;

    response.assert_status_bad_request();
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("DPP001"));

    // Store unchanged
    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.passport_count, 2);
}

#[tokio::test]
async fn test_import_empty_batch_is_400() {
    let (server, _guard) = create_test_server();

    let response = server.post("/imports").json(&json!({})).await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_poll_unknown_job_is_404() {
    let (server, _guard) = create_test_server();

    let response = server.get("/imports/NOPE").await;
    response.assert_status_not_found();
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("NOPE"));
}

#[tokio::test]
async fn test_import_job_reaches_terminal_state_and_stays_there() {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    // Disable rate limiting: this test polls the job far more than the
    // default per-second budget allows.
    // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var("DPP_RATE_LIMIT", "0") };
    let state = AppState::new(Stores::new());
    let server = TestServer::new(create_router(state)).unwrap();
    let _guard = TestGuard { _guard: guard };

    let accepted: ImportAccepted = server
        .post("/imports")
        .json(&json!({
            "passports": [
                {
                    "id": "DPP200",
                    "productName": "Imported Coat",
                    "category": "Textiles",
                    "metadata": {"status": "draft", "lastUpdated": "2024-05-01T12:00:00Z"}
                }
            ]
        }))
        .await
        .json();

    let path = format!("/imports/{}", accepted.job_id);

    // P(still pending after 300 polls) = 0.7^300, effectively zero
    let mut terminal: Option<serde_json::Value> = None;
    for _ in 0..300 {
        let job: serde_json::Value = server.get(&path).await.json();
        if job["status"] != "PENDING_PROCESSING" {
            terminal = Some(job);
            break;
        }
    }
    let terminal = terminal.expect("job should reach a terminal state");
    assert!(terminal["status"] == "COMPLETED" || terminal["status"] == "FAILED");

    // Once terminal, 100 subsequent polls return the identical job
    for _ in 0..100 {
        let job: serde_json::Value = server.get(&path).await.json();
        assert_eq!(job, terminal);
    }
}

// =============================================================================
// AUTHENTICATION TESTS
// =============================================================================

/// Create a server with API key authentication enabled.
fn create_auth_test_server(api_key: &str) -> TestServer {
    // SAFETY: Caller holds AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var("DPP_API_KEY", api_key) };
    let state = AppState::new(seeded_stores());
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_auth_missing_header_is_401() {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    let server = create_auth_test_server("secret-key");
    let _guard = TestGuard { _guard: guard };

    let response = server.get("/passports/DPP001").await;
    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_auth_wrong_key_is_401() {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    let server = create_auth_test_server("secret-key");
    let _guard = TestGuard { _guard: guard };

    let response = server
        .get("/passports/DPP001")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer wrong-key".parse::<HeaderValue>().unwrap(),
        )
        .await;
    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_auth_correct_key_passes() {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    let server = create_auth_test_server("secret-key");
    let _guard = TestGuard { _guard: guard };

    let response = server
        .get("/passports/DPP001")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer secret-key".parse::<HeaderValue>().unwrap(),
        )
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_health_is_exempt() {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    let server = create_auth_test_server("secret-key");
    let _guard = TestGuard { _guard: guard };

    let response = server.get("/health").await;
    response.assert_status_ok();
}
