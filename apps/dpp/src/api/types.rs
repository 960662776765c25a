//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API that are not
//! already core wire types (passport records, receipts and jobs serialize
//! straight from `dpp-core`).

use dpp_core::{
    DigitalProductPassport, DppError, FrequencyCount, ImportJobStatus, Supplier,
    primitives::{MAX_IDENTIFIER_LENGTH, MAX_IMPORT_BATCH},
};
use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTIFIER VALIDATION
// =============================================================================

/// Validate a path identifier before it reaches the store.
///
/// Rejects empty and oversized identifiers at the API boundary to prevent
/// abusive payloads from reaching the core.
pub fn validate_identifier(id: &str) -> Result<(), DppError> {
    if id.trim().is_empty() {
        return Err(DppError::Validation(
            "identifier must not be empty".to_string(),
        ));
    }
    if id.len() > MAX_IDENTIFIER_LENGTH {
        return Err(DppError::Validation(format!(
            "identifier length {} exceeds maximum {} bytes",
            id.len(),
            MAX_IDENTIFIER_LENGTH
        )));
    }
    Ok(())
}

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Store counters response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub passport_count: usize,
    pub active_count: usize,
    pub archived_count: usize,
    pub supplier_count: usize,
    pub import_job_count: usize,
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Uniform failure body carrying a human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// =============================================================================
// ARCHIVE RESPONSE
// =============================================================================

/// Confirmation returned by the soft-delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveResponse {
    pub id: String,
    pub message: String,
}

impl ArchiveResponse {
    pub fn for_record(id: &str) -> Self {
        Self {
            id: id.to_string(),
            message: format!("Passport {id} archived"),
        }
    }
}

// =============================================================================
// LEDGER REQUESTS
// =============================================================================

/// Anchor request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorRequest {
    pub platform: String,
}

/// Token mint request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub contract_address: String,
    pub recipient_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_uri: Option<String>,
}

/// DAO ownership-transfer request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub new_owner_address: String,
}

/// Token metadata-update request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadataRequest {
    pub metadata_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
}

// =============================================================================
// STATS RESPONSES
// =============================================================================

/// One `{countryCode, count}` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryCount {
    pub country_code: String,
    pub count: u64,
}

impl From<FrequencyCount> for CountryCount {
    fn from(entry: FrequencyCount) -> Self {
        Self {
            country_code: entry.key,
            count: entry.count,
        }
    }
}

/// One `{category, count}` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

impl From<FrequencyCount> for CategoryCount {
    fn from(entry: FrequencyCount) -> Self {
        Self {
            category: entry.key,
            count: entry.count,
        }
    }
}

/// One `{status, count}` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

impl From<FrequencyCount> for StatusCount {
    fn from(entry: FrequencyCount) -> Self {
        Self {
            status: entry.key,
            count: entry.count,
        }
    }
}

// =============================================================================
// BATCH IMPORT
// =============================================================================

/// Batch import request: fully formed passports (with ids) and optionally
/// the suppliers they reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRequest {
    pub passports: Vec<DigitalProductPassport>,
    pub suppliers: Vec<Supplier>,
}

impl ImportRequest {
    /// Validate batch shape before any insertion happens.
    pub fn validate(&self) -> Result<(), DppError> {
        if self.passports.is_empty() && self.suppliers.is_empty() {
            return Err(DppError::Validation(
                "import batch must not be empty".to_string(),
            ));
        }
        if self.passports.len() > MAX_IMPORT_BATCH {
            return Err(DppError::Validation(format!(
                "import batch of {} passports exceeds maximum {}",
                self.passports.len(),
                MAX_IMPORT_BATCH
            )));
        }
        for passport in &self.passports {
            validate_identifier(&passport.id)?;
        }
        for supplier in &self.suppliers {
            validate_identifier(&supplier.id)?;
        }
        Ok(())
    }
}

/// Accepted batch import: the job to poll for progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportAccepted {
    pub job_id: String,
    pub status: ImportJobStatus,
}

// =============================================================================
// TESTS
// =============================================================================
