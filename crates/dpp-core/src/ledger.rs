//! # Ledger Anchoring Facade
//!
//! Simulates the on-chain side of a passport record: anchoring a record to
//! a ledger platform, minting an ownership token, transferring token
//! ownership and updating token metadata. No real ledger is ever invoked;
//! synthetic transaction identifiers come from the injected [`IdSource`]
//! and are unique per call.
//!
//! A configured placeholder contract address short-circuits every action
//! into a mock-success response. That check runs before validation, lookup
//! and dispatch, and the short-circuit never mutates a record.

use crate::ids::IdSource;
use crate::primitives::{
    ADDRESS_HEX_LEN, FALLBACK_PLATFORM, PLACEHOLDER_CONTRACT_ADDRESS, PLACEHOLDER_TX_HASH,
};
use crate::store::PassportStore;
use crate::types::{BlockchainIdentifiers, DigitalProductPassport, DppError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Message attached to every placeholder short-circuit response.
const MOCK_SUCCESS_MESSAGE: &str =
    "Simulated success: placeholder contract address configured, no ledger invocation attempted";

// =============================================================================
// CONFIGURATION
// =============================================================================

/// External configuration of the ledger facade.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Token contract address used when a request does not carry one.
    /// Setting this to [`PLACEHOLDER_CONTRACT_ADDRESS`] turns every ledger
    /// action into a mock-success no-op.
    pub contract_address: Option<String>,
    /// Platform recorded on mint when the record was never anchored to a
    /// named platform.
    pub platform_hint: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            contract_address: None,
            platform_hint: FALLBACK_PLATFORM.to_string(),
        }
    }
}

// =============================================================================
// RECEIPTS
// =============================================================================

/// Result of a simulated token mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintReceipt {
    pub token_id: String,
    pub contract_address: String,
    pub transaction_hash: String,
    pub message: String,
}

/// Result of a simulated DAO ownership transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub token_id: String,
    pub new_owner_address: String,
    pub transaction_hash: String,
    pub message: String,
}

/// Result of a simulated token-metadata update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataReceipt {
    pub token_id: String,
    pub contract_address: String,
    pub transaction_hash: String,
    pub message: String,
}

// =============================================================================
// ADDRESS VALIDATION
// =============================================================================

/// Whether `value` is address-shaped: `0x` followed by exactly 40 hex
/// digits.
#[must_use]
pub fn is_address(value: &str) -> bool {
    value.strip_prefix("0x").is_some_and(|hex| {
        hex.len() == ADDRESS_HEX_LEN && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

// =============================================================================
// FACADE
// =============================================================================

/// The simulated ledger boundary. Holds configuration and the id source;
/// all record mutations go through the store's `modify` seam so the
/// timestamp rules stay in one place.
pub struct LedgerFacade {
    config: LedgerConfig,
    ids: Arc<dyn IdSource>,
}

impl LedgerFacade {
    /// Create a facade with the given configuration and id source.
    #[must_use]
    pub fn new(config: LedgerConfig, ids: Arc<dyn IdSource>) -> Self {
        Self { config, ids }
    }

    fn placeholder_configured(&self) -> bool {
        self.config.contract_address.as_deref() == Some(PLACEHOLDER_CONTRACT_ADDRESS)
    }

    /// Anchor a record to a ledger platform.
    ///
    /// Sets `platform` and a fresh `anchorTransactionHash`; contract
    /// address and token id are defaulted only when not already present.
    pub fn anchor<S: PassportStore>(
        &self,
        store: &mut S,
        id: &str,
        platform: &str,
    ) -> Result<DigitalProductPassport, DppError> {
        if self.placeholder_configured() {
            // Mock-success: the record is returned as-is, nothing dispatched.
            return store.get(id);
        }

        if platform.trim().is_empty() {
            return Err(DppError::Validation(format!(
                "platform must not be empty when anchoring {id}"
            )));
        }

        let transaction_hash = self.ids.next_transaction_hash();
        let ids = Arc::clone(&self.ids);
        store.modify(id, &mut |record| {
            let identifiers = record
                .blockchain_identifiers
                .get_or_insert_with(BlockchainIdentifiers::default);
            identifiers.platform = Some(platform.to_string());
            identifiers.anchor_transaction_hash = Some(transaction_hash.clone());
            if identifiers.contract_address.is_none() {
                identifiers.contract_address = Some(ids.next_contract_address());
            }
            if identifiers.token_id.is_none() {
                identifiers.token_id = Some(ids.next_token_id());
            }
            record.metadata.on_chain_status = Some("anchored".to_string());
        })
    }

    /// Mint an ownership token for a record.
    ///
    /// Merges additively into `blockchainIdentifiers`: the platform is
    /// preserved unless absent (then the configured hint is recorded), the
    /// contract address and token id are overwritten with the minted
    /// values. The mint transaction hash lives in the receipt only.
    pub fn mint<S: PassportStore>(
        &self,
        store: &mut S,
        id: &str,
        contract_address: &str,
        recipient_address: &str,
        metadata_uri: Option<&str>,
    ) -> Result<MintReceipt, DppError> {
        if self.placeholder_configured() || contract_address == PLACEHOLDER_CONTRACT_ADDRESS {
            return Ok(MintReceipt {
                token_id: "0".to_string(),
                contract_address: PLACEHOLDER_CONTRACT_ADDRESS.to_string(),
                transaction_hash: PLACEHOLDER_TX_HASH.to_string(),
                message: MOCK_SUCCESS_MESSAGE.to_string(),
            });
        }

        if contract_address.trim().is_empty() {
            return Err(DppError::Validation(format!(
                "contractAddress must not be empty when minting for {id}"
            )));
        }
        if recipient_address.trim().is_empty() {
            return Err(DppError::Validation(format!(
                "recipientAddress must not be empty when minting for {id}"
            )));
        }

        let token_id = self.ids.next_token_id();
        let transaction_hash = self.ids.next_transaction_hash();
        let platform_hint = self.config.platform_hint.clone();

        store.modify(id, &mut |record| {
            let identifiers = record
                .blockchain_identifiers
                .get_or_insert_with(BlockchainIdentifiers::default);
            if identifiers.platform.is_none() {
                identifiers.platform = Some(platform_hint.clone());
            }
            identifiers.contract_address = Some(contract_address.to_string());
            identifiers.token_id = Some(token_id.clone());
        })?;

        let message = match metadata_uri {
            Some(uri) if !uri.trim().is_empty() => {
                format!("Token minted to {recipient_address} with metadata {uri}")
            }
            _ => format!("Token minted to {recipient_address}"),
        };

        Ok(MintReceipt {
            token_id,
            contract_address: contract_address.to_string(),
            transaction_hash,
            message,
        })
    }

    /// Simulate a DAO-governed ownership transfer. Not tied to a record
    /// lookup; validates the target address shape only.
    pub fn dao_transfer(
        &self,
        token_id: &str,
        new_owner_address: &str,
    ) -> Result<TransferReceipt, DppError> {
        if self.placeholder_configured() {
            return Ok(TransferReceipt {
                token_id: token_id.to_string(),
                new_owner_address: new_owner_address.to_string(),
                transaction_hash: PLACEHOLDER_TX_HASH.to_string(),
                message: MOCK_SUCCESS_MESSAGE.to_string(),
            });
        }

        if token_id.trim().is_empty() {
            return Err(DppError::Validation(
                "token id must not be empty".to_string(),
            ));
        }
        if !is_address(new_owner_address) {
            return Err(DppError::Validation(format!(
                "newOwnerAddress is not a valid address: {new_owner_address}"
            )));
        }

        Ok(TransferReceipt {
            token_id: token_id.to_string(),
            new_owner_address: new_owner_address.to_string(),
            transaction_hash: self.ids.next_transaction_hash(),
            message: format!("Ownership of token {token_id} transferred"),
        })
    }

    /// Simulate a token-metadata update against the contract resolved from
    /// the request or the configured default.
    pub fn update_token_metadata(
        &self,
        token_id: &str,
        metadata_uri: &str,
        contract_address: Option<&str>,
    ) -> Result<MetadataReceipt, DppError> {
        let supplied = contract_address
            .map(str::trim)
            .filter(|address| !address.is_empty());

        if self.placeholder_configured() || supplied == Some(PLACEHOLDER_CONTRACT_ADDRESS) {
            return Ok(MetadataReceipt {
                token_id: token_id.to_string(),
                contract_address: PLACEHOLDER_CONTRACT_ADDRESS.to_string(),
                transaction_hash: PLACEHOLDER_TX_HASH.to_string(),
                message: MOCK_SUCCESS_MESSAGE.to_string(),
            });
        }

        if token_id.trim().is_empty() {
            return Err(DppError::Validation(
                "token id must not be empty".to_string(),
            ));
        }
        if metadata_uri.trim().is_empty() {
            return Err(DppError::Validation(format!(
                "metadataUri must not be empty for token {token_id}"
            )));
        }

        let contract = supplied
            .map(str::to_string)
            .or_else(|| self.config.contract_address.clone())
            .ok_or_else(|| {
                DppError::Configuration(
                    "no token contract address configured and none supplied".to_string(),
                )
            })?;

        Ok(MetadataReceipt {
            token_id: token_id.to_string(),
            contract_address: contract,
            transaction_hash: self.ids.next_transaction_hash(),
            message: format!("Metadata of token {token_id} updated to {metadata_uri}"),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
