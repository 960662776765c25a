//! # Partial-Update Merge Engine
//!
//! Computes the result of a partial update against an existing passport
//! record, field by field. Presence is `Option::Some`: a field omitted from
//! the payload never changes the record, and a present field always
//! overwrites — including overwriting with an empty string.
//!
//! The merge itself is infallible; structurally invalid payloads are
//! rejected by serde at the API boundary before this module runs. The
//! engine does not stamp `metadata.last_updated` — the store does that,
//! exactly once per mutating call.

use crate::types::{
    BlockchainIdentifiers, CustomAttribute, DigitalProductPassport, DocumentRef, EbsiVerification,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

// =============================================================================
// UPDATE PAYLOAD
// =============================================================================

/// A partial-update document for one passport record.
///
/// `id`, `metadata.isArchived`, `supplyChainLinks` and `lifecycleEvents`
/// are deliberately absent: they cannot be changed through a partial
/// update and are preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePayload {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub gtin: Option<String>,
    pub model_number: Option<String>,
    pub authentication_vc_id: Option<String>,
    pub ownership_nft_link: Option<String>,
    pub manufacturer: Option<ManufacturerPatch>,
    pub metadata: Option<MetadataPatch>,
    pub product_details: Option<ProductDetailsPatch>,
    pub compliance: Option<BTreeMap<String, serde_json::Value>>,
    pub ebsi_verification: Option<EbsiVerificationPatch>,
    pub blockchain_identifiers: Option<BlockchainIdentifiersPatch>,
    pub documents: Option<Vec<DocumentRef>>,
    pub textile_information: Option<serde_json::Value>,
    pub construction_product_information: Option<serde_json::Value>,
}

/// Manufacturer patch: only the name is updatable through a partial
/// update; other manufacturer sub-fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManufacturerPatch {
    pub name: Option<String>,
}

/// Shallow metadata patch. `lastUpdated` and `isArchived` are owned by the
/// store and cannot be supplied here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataPatch {
    pub status: Option<String>,
    pub on_chain_status: Option<String>,
}

/// Shallow product-details patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDetailsPatch {
    pub description: Option<String>,
    pub country_of_origin: Option<String>,
    pub custom_attributes: Option<Vec<CustomAttribute>>,
}

/// EBSI verification patch. Supplying `status` refreshes `lastChecked`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EbsiVerificationPatch {
    pub status: Option<String>,
}

/// Additive patch for ledger identifiers: present fields overwrite, absent
/// fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockchainIdentifiersPatch {
    pub platform: Option<String>,
    pub anchor_transaction_hash: Option<String>,
    pub contract_address: Option<String>,
    pub token_id: Option<String>,
}

// =============================================================================
// MERGE
// =============================================================================

/// Produce the merged record for `payload` applied to `existing`.
///
/// `now` feeds only `ebsiVerification.lastChecked` (refreshed when the
/// payload supplies a verification status, or initialized when the block
/// never existed).
#[must_use]
pub fn merge_update(
    existing: &DigitalProductPassport,
    payload: &UpdatePayload,
    now: OffsetDateTime,
) -> DigitalProductPassport {
    let mut merged = existing.clone();

    // Scalar fields: present overwrites, absent preserves.
    overwrite(&mut merged.product_name, payload.product_name.as_ref());
    overwrite(&mut merged.category, payload.category.as_ref());
    overwrite(&mut merged.gtin, payload.gtin.as_ref());
    overwrite(&mut merged.model_number, payload.model_number.as_ref());
    if payload.authentication_vc_id.is_some() {
        merged
            .authentication_vc_id
            .clone_from(&payload.authentication_vc_id);
    }
    if payload.ownership_nft_link.is_some() {
        merged
            .ownership_nft_link
            .clone_from(&payload.ownership_nft_link);
    }

    if let Some(patch) = &payload.manufacturer {
        overwrite(&mut merged.manufacturer.name, patch.name.as_ref());
    }

    if let Some(patch) = &payload.metadata {
        overwrite(&mut merged.metadata.status, patch.status.as_ref());
        if patch.on_chain_status.is_some() {
            merged
                .metadata
                .on_chain_status
                .clone_from(&patch.on_chain_status);
        }
    }

    if let Some(patch) = &payload.product_details {
        if patch.description.is_some() {
            merged
                .product_details
                .description
                .clone_from(&patch.description);
        }
        if patch.country_of_origin.is_some() {
            merged
                .product_details
                .country_of_origin
                .clone_from(&patch.country_of_origin);
        }
        // payload -> existing -> empty, in that priority
        merged.product_details.custom_attributes = patch
            .custom_attributes
            .clone()
            .unwrap_or_else(|| existing.product_details.custom_attributes.clone());
    }

    if let Some(patch) = &payload.compliance {
        for (key, value) in patch {
            merged.compliance.insert(key.clone(), value.clone());
        }
    }

    if let Some(patch) = &payload.ebsi_verification {
        merged.ebsi_verification = Some(merge_ebsi(
            existing.ebsi_verification.as_ref(),
            patch,
            now,
        ));
    }

    if let Some(patch) = &payload.blockchain_identifiers {
        let identifiers = merged
            .blockchain_identifiers
            .get_or_insert_with(BlockchainIdentifiers::default);
        if patch.platform.is_some() {
            identifiers.platform.clone_from(&patch.platform);
        }
        if patch.anchor_transaction_hash.is_some() {
            identifiers
                .anchor_transaction_hash
                .clone_from(&patch.anchor_transaction_hash);
        }
        if patch.contract_address.is_some() {
            identifiers
                .contract_address
                .clone_from(&patch.contract_address);
        }
        if patch.token_id.is_some() {
            identifiers.token_id.clone_from(&patch.token_id);
        }
    }

    // Wholesale replacement blocks: present replaces, absent preserves.
    if payload.documents.is_some() {
        merged.documents.clone_from(&payload.documents);
    }
    if payload.textile_information.is_some() {
        merged
            .textile_information
            .clone_from(&payload.textile_information);
    }
    if payload.construction_product_information.is_some() {
        merged
            .construction_product_information
            .clone_from(&payload.construction_product_information);
    }

    merged
}

/// Overwrite `target` when the payload supplied a value.
fn overwrite(target: &mut String, supplied: Option<&String>) {
    if let Some(value) = supplied {
        target.clone_from(value);
    }
}

/// `lastChecked` refreshes only when the payload supplies `status`;
/// otherwise it is preserved, or initialized when the block never existed.
fn merge_ebsi(
    existing: Option<&EbsiVerification>,
    patch: &EbsiVerificationPatch,
    now: OffsetDateTime,
) -> EbsiVerification {
    let status = patch
        .status
        .clone()
        .or_else(|| existing.map(|e| e.status.clone()))
        .unwrap_or_default();

    let last_checked = if patch.status.is_some() {
        now
    } else {
        existing.map_or(now, |e| e.last_checked)
    };

    EbsiVerification {
        status,
        last_checked,
    }
}

// =============================================================================
// TESTS
// =============================================================================
