//! # Passport Record Store
//!
//! The keyed in-memory repository of passport records plus the global
//! supplier registry.
//!
//! All collections are `BTreeMap` for deterministic iteration. The store
//! is the only place that stamps `metadata.last_updated`: every mutating
//! operation refreshes it exactly once, through the injected clock, and
//! never moves it backwards.

use crate::clock::{Clock, SystemClock};
use crate::ids::{IdSource, SequentialIds};
use crate::merge::{UpdatePayload, merge_update};
use crate::types::{
    DigitalProductPassport, DocumentRef, DppError, LifecycleEvent, Manufacturer, Metadata,
    ProductDetails, Supplier, SupplyChainLink,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

// =============================================================================
// PASSPORT STORE TRAIT
// =============================================================================

/// The repository interface over a keyed passport collection.
///
/// Read paths respect active-only visibility: an archived record behaves
/// like a missing one for `get`, `update` and `modify`, but remains
/// addressable for `archive` (idempotent soft delete).
pub trait PassportStore {
    /// Return the record if it exists and is not archived.
    fn get(&self, id: &str) -> Result<DigitalProductPassport, DppError>;

    /// Whether any record (active or archived) occupies this id.
    fn contains(&self, id: &str) -> bool;

    /// Insert a new record under a fresh store-assigned id.
    fn create(&mut self, draft: PassportDraft) -> Result<DigitalProductPassport, DppError>;

    /// Insert a fully formed record, rejecting duplicate ids. Used by
    /// seeding and batch import; timestamps are taken as supplied.
    fn insert(&mut self, record: DigitalProductPassport) -> Result<(), DppError>;

    /// Merge a partial update into an active record and store the result.
    fn update(
        &mut self,
        id: &str,
        payload: &UpdatePayload,
    ) -> Result<DigitalProductPassport, DppError>;

    /// Soft-delete a record. Succeeds on already-archived records (the
    /// timestamp refreshes again, the flag never clears) and fails only
    /// for ids that were never present.
    fn archive(&mut self, id: &str) -> Result<DigitalProductPassport, DppError>;

    /// Apply an in-place mutation to an active record, then refresh
    /// `last_updated`. This is the seam the ledger facade writes through.
    fn modify(
        &mut self,
        id: &str,
        mutate: &mut dyn FnMut(&mut DigitalProductPassport),
    ) -> Result<DigitalProductPassport, DppError>;

    /// Clone of every record, archived included — the aggregator input.
    fn snapshot(&self) -> Vec<DigitalProductPassport>;

    /// Total number of records, archived included.
    fn len(&self) -> usize;

    /// Whether the store holds no records at all.
    fn is_empty(&self) -> bool;

    /// Number of records visible to active-only reads.
    fn active_count(&self) -> usize;
}

// =============================================================================
// PASSPORT DRAFT
// =============================================================================

/// Creation payload for a new record: everything but the id and the
/// store-owned metadata.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassportDraft {
    pub product_name: String,
    pub category: String,
    pub gtin: String,
    pub model_number: String,
    pub authentication_vc_id: Option<String>,
    pub ownership_nft_link: Option<String>,
    pub manufacturer: Manufacturer,
    pub product_details: ProductDetails,
    pub compliance: BTreeMap<String, serde_json::Value>,
    pub documents: Option<Vec<DocumentRef>>,
    pub textile_information: Option<serde_json::Value>,
    pub construction_product_information: Option<serde_json::Value>,
    pub supply_chain_links: Vec<SupplyChainLink>,
    pub lifecycle_events: Vec<LifecycleEvent>,
}

impl PassportDraft {
    fn into_record(self, id: String, metadata: Metadata) -> DigitalProductPassport {
        DigitalProductPassport {
            id,
            product_name: self.product_name,
            category: self.category,
            gtin: self.gtin,
            model_number: self.model_number,
            authentication_vc_id: self.authentication_vc_id,
            ownership_nft_link: self.ownership_nft_link,
            manufacturer: self.manufacturer,
            metadata,
            product_details: self.product_details,
            compliance: self.compliance,
            ebsi_verification: None,
            blockchain_identifiers: None,
            documents: self.documents,
            textile_information: self.textile_information,
            construction_product_information: self.construction_product_information,
            supply_chain_links: self.supply_chain_links,
            lifecycle_events: self.lifecycle_events,
        }
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// The process-lifetime [`PassportStore`] implementation.
#[derive(Clone)]
pub struct InMemoryStore {
    records: BTreeMap<String, DigitalProductPassport>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// An empty store with the system clock and sequential ids.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(Arc::new(SystemClock), Arc::new(SequentialIds::new()))
    }

    /// An empty store with injected clock and id source.
    #[must_use]
    pub fn with_parts(clock: Arc<dyn Clock>, ids: Arc<dyn IdSource>) -> Self {
        Self {
            records: BTreeMap::new(),
            clock,
            ids,
        }
    }

    fn active_record(&self, id: &str) -> Result<&DigitalProductPassport, DppError> {
        self.records
            .get(id)
            .filter(|record| record.is_active())
            .ok_or_else(|| DppError::PassportNotFound(id.to_string()))
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("records", &self.records.len())
            .finish()
    }
}

impl PassportStore for InMemoryStore {
    fn get(&self, id: &str) -> Result<DigitalProductPassport, DppError> {
        self.active_record(id).cloned()
    }

    fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    fn create(&mut self, draft: PassportDraft) -> Result<DigitalProductPassport, DppError> {
        if draft.product_name.trim().is_empty() {
            return Err(DppError::Validation(
                "productName must not be empty".to_string(),
            ));
        }

        // The counter can trail seeded records; skip occupied ids.
        let mut id = self.ids.next_passport_id();
        while self.records.contains_key(&id) {
            id = self.ids.next_passport_id();
        }

        let record = draft.into_record(id.clone(), Metadata::new(self.clock.now()));
        self.records.insert(id.clone(), record);
        self.get(&id)
    }

    fn insert(&mut self, record: DigitalProductPassport) -> Result<(), DppError> {
        if record.id.trim().is_empty() {
            return Err(DppError::Validation(
                "passport id must not be empty".to_string(),
            ));
        }
        if self.records.contains_key(&record.id) {
            return Err(DppError::Validation(format!(
                "duplicate passport id: {}",
                record.id
            )));
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    fn update(
        &mut self,
        id: &str,
        payload: &UpdatePayload,
    ) -> Result<DigitalProductPassport, DppError> {
        let now = self.clock.now();
        let existing = self.active_record(id)?;

        let mut merged = merge_update(existing, payload, now);
        merged.metadata.touch(now);
        self.records.insert(id.to_string(), merged.clone());
        Ok(merged)
    }

    fn archive(&mut self, id: &str) -> Result<DigitalProductPassport, DppError> {
        let now = self.clock.now();
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| DppError::PassportNotFound(id.to_string()))?;

        record.metadata.is_archived = true;
        record.metadata.touch(now);
        Ok(record.clone())
    }

    fn modify(
        &mut self,
        id: &str,
        mutate: &mut dyn FnMut(&mut DigitalProductPassport),
    ) -> Result<DigitalProductPassport, DppError> {
        let now = self.clock.now();
        let record = self
            .records
            .get_mut(id)
            .filter(|record| record.is_active())
            .ok_or_else(|| DppError::PassportNotFound(id.to_string()))?;

        mutate(record);
        record.metadata.touch(now);
        Ok(record.clone())
    }

    fn snapshot(&self) -> Vec<DigitalProductPassport> {
        self.records.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn active_count(&self) -> usize {
        self.records.values().filter(|r| r.is_active()).count()
    }
}

// =============================================================================
// SUPPLIER REGISTRY
// =============================================================================

/// The global keyed registry of suppliers.
///
/// Supply-chain links reference entries here by id only; resolution
/// happens at read time and a dangling id is not an error for consumers
/// that tolerate it (graph derivation).
#[derive(Debug, Clone, Default)]
pub struct SupplierRegistry {
    suppliers: BTreeMap<String, Supplier>,
}

impl SupplierRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a supplier, rejecting empty and duplicate ids.
    pub fn insert(&mut self, supplier: Supplier) -> Result<(), DppError> {
        if supplier.id.trim().is_empty() {
            return Err(DppError::Validation(
                "supplier id must not be empty".to_string(),
            ));
        }
        if self.suppliers.contains_key(&supplier.id) {
            return Err(DppError::Validation(format!(
                "duplicate supplier id: {}",
                supplier.id
            )));
        }
        self.suppliers.insert(supplier.id.clone(), supplier);
        Ok(())
    }

    /// Strict lookup for callers that treat a missing supplier as an error.
    pub fn get(&self, id: &str) -> Result<Supplier, DppError> {
        self.suppliers
            .get(id)
            .cloned()
            .ok_or_else(|| DppError::SupplierNotFound(id.to_string()))
    }

    /// Weak lookup used by graph derivation; a missing supplier is `None`.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.get(id)
    }

    /// Number of registered suppliers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
