//! # Core Type Definitions
//!
//! This module contains all core types for the Digital Product Passport
//! store:
//! - The passport record and its owned substructures
//! - The supplier registry entity (`Supplier`)
//! - Asynchronous batch-import jobs (`ImportJob`, `ImportJobStatus`)
//! - Error types (`DppError`)
//!
//! ## Wire Shape
//!
//! All types serialize with camelCase field names to match the legacy JSON
//! payloads produced and consumed by existing clients. Optional
//! substructures are omitted from output when absent.
//!
//! ## Determinism Guarantees
//!
//! - Maps use `BTreeMap` for deterministic ordering
//! - Timestamps are `time::OffsetDateTime` serialized as RFC 3339; they are
//!   only ever produced through the injectable [`crate::clock::Clock`]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use time::OffsetDateTime;

// =============================================================================
// PASSPORT RECORD
// =============================================================================

/// A Digital Product Passport record — the central entity of the store.
///
/// The `id` is opaque, unique across the store and immutable after
/// creation. Every mutating operation refreshes `metadata.last_updated`
/// exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalProductPassport {
    /// Opaque unique identifier, assigned at creation.
    pub id: String,
    /// Display name of the product.
    pub product_name: String,
    /// Product category (free-form, e.g. "Textiles").
    pub category: String,
    /// Global Trade Item Number.
    #[serde(default)]
    pub gtin: String,
    /// Manufacturer model number.
    #[serde(default)]
    pub model_number: String,
    /// Verifiable-credential id authenticating the passport, if issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_vc_id: Option<String>,
    /// Link to the ownership NFT, if one has been minted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership_nft_link: Option<String>,
    /// The manufacturer block, owned by the record.
    #[serde(default)]
    pub manufacturer: Manufacturer,
    /// Record lifecycle metadata.
    pub metadata: Metadata,
    /// Product detail block; merged field-by-field on update.
    #[serde(default)]
    pub product_details: ProductDetails,
    /// Regulation-check results keyed by regulation name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub compliance: BTreeMap<String, serde_json::Value>,
    /// EBSI verification state, if a verification has ever run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebsi_verification: Option<EbsiVerification>,
    /// Ledger anchoring identifiers; merged additively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_identifiers: Option<BlockchainIdentifiers>,
    /// Attached documents; replaced wholesale on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentRef>>,
    /// Textile-specific disclosure block; replaced wholesale on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textile_information: Option<serde_json::Value>,
    /// Construction-product disclosure block; replaced wholesale on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction_product_information: Option<serde_json::Value>,
    /// Ordered supplier references; weak links resolved at read time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supply_chain_links: Vec<SupplyChainLink>,
    /// Ordered lifecycle events.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lifecycle_events: Vec<LifecycleEvent>,
}

impl DigitalProductPassport {
    /// Create a minimal record with the given identity fields.
    ///
    /// All optional blocks start empty; `metadata` starts active with the
    /// supplied timestamp.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        product_name: impl Into<String>,
        category: impl Into<String>,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            product_name: product_name.into(),
            category: category.into(),
            gtin: String::new(),
            model_number: String::new(),
            authentication_vc_id: None,
            ownership_nft_link: None,
            manufacturer: Manufacturer::default(),
            metadata: Metadata::new(now),
            product_details: ProductDetails::default(),
            compliance: BTreeMap::new(),
            ebsi_verification: None,
            blockchain_identifiers: None,
            documents: None,
            textile_information: None,
            construction_product_information: None,
            supply_chain_links: Vec::new(),
            lifecycle_events: Vec::new(),
        }
    }

    /// Whether the record is visible to active-only read paths.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.metadata.is_archived
    }
}

// =============================================================================
// OWNED SUBSTRUCTURES
// =============================================================================

/// Manufacturer block owned by a passport record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manufacturer {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Decentralized identifier, if registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Economic Operators Registration and Identification number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eori: Option<String>,
}

/// Record lifecycle metadata.
///
/// `last_updated` is monotonically non-decreasing under this core's own
/// mutations; `is_archived` defaults to false and is one-way true-able.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Free-form record status (e.g. "draft", "published").
    #[serde(default)]
    pub status: String,
    /// Timestamp of the most recent mutation.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    /// Soft-delete marker; archived records are hidden from active reads.
    #[serde(default)]
    pub is_archived: bool,
    /// Anchoring status as mirrored from the ledger facade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_chain_status: Option<String>,
}

impl Metadata {
    /// Fresh metadata for a newly created record.
    #[must_use]
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            status: "draft".to_string(),
            last_updated: now,
            is_archived: false,
            on_chain_status: None,
        }
    }

    /// Refresh `last_updated`, never moving it backwards.
    pub fn touch(&mut self, now: OffsetDateTime) {
        if now > self.last_updated {
            self.last_updated = now;
        }
    }
}

/// Product detail block; merged field-by-field on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    /// Free-form product description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO country code of origin; aggregated by the stats module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,
    /// Ordered key/value attributes supplied by the manufacturer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_attributes: Vec<CustomAttribute>,
}

/// One ordered key/value entry in `ProductDetails::custom_attributes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAttribute {
    pub key: String,
    pub value: String,
}

/// EBSI verification state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbsiVerification {
    /// Verification status reported by the checker.
    pub status: String,
    /// When the status was last confirmed.
    #[serde(with = "time::serde::rfc3339")]
    pub last_checked: OffsetDateTime,
}

/// Ledger anchoring identifiers, merged additively: existing fields are
/// preserved unless explicitly overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainIdentifiers {
    /// Ledger platform name (e.g. "EBSI").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Transaction hash of the anchoring transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_transaction_hash: Option<String>,
    /// Token contract address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    /// Token id within the contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}

/// Reference to an attached document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub name: String,
    pub url: String,
    /// Document kind (e.g. "certificate", "manual").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
}

/// One ordered entry of the supply chain, referencing a [`Supplier`] by id.
///
/// The reference is weak: resolution happens at read time against the
/// supplier registry, and a dangling id is tolerated by all consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyChainLink {
    /// Id of the supplier in the global registry.
    pub supplier_id: String,
    /// The item this supplier provides for the product.
    pub supplied_item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One ordered lifecycle event of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
    /// Event id, unique within the record.
    pub id: String,
    /// Event kind (e.g. "manufactured", "shipped", "repaired").
    #[serde(rename = "type")]
    pub event_type: String,
    /// When the event occurred.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_party: Option<String>,
    /// Free-form event payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// =============================================================================
// SUPPLIER
// =============================================================================

/// A supplier in the global registry.
///
/// Suppliers are owned by [`crate::store::SupplierRegistry`] and referenced
/// weakly from `supply_chain_links`; records never embed supplier copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials_supplied: Vec<String>,
    #[serde(default)]
    pub contact_person: String,
}

// =============================================================================
// IMPORT JOBS
// =============================================================================

/// Status of an asynchronous batch-import job.
///
/// `PendingProcessing` is the only non-terminal state; transitions run
/// forward only and a terminal job never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportJobStatus {
    PendingProcessing,
    Completed,
    Failed,
}

impl ImportJobStatus {
    /// Whether the status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// An asynchronous batch-import job tracked by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub id: String,
    pub status: ImportJobStatus,
    /// Human-readable progress or outcome message.
    pub message: String,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the passport core.
///
/// All core operations return `Result<T, DppError>`; the core never panics
/// and never throws across the collaborator boundary. Messages carry the
/// offending identifier so callers can render actionable failures;
/// `Configuration` details are for logs only and must not reach callers.
#[derive(Debug, Error)]
pub enum DppError {
    /// Unknown or archived passport id on an active-visibility path.
    #[error("passport not found: {0}")]
    PassportNotFound(String),

    /// Unknown supplier id.
    #[error("supplier not found: {0}")]
    SupplierNotFound(String),

    /// Unknown import-job id.
    #[error("import job not found: {0}")]
    JobNotFound(String),

    /// Malformed payload, missing required field or malformed address.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Missing or unusable external configuration. Log the detail; callers
    /// only ever see a generic message.
    #[error("server configuration error: {0}")]
    Configuration(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred (seed loading, server bind).
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
