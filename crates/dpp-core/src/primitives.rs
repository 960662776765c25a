//! # Innate Primitives
//!
//! Hardcoded runtime constants for the passport core.
//!
//! These values are compiled into the binary and immutable at runtime;
//! changing any of them is a behavioral change for every consumer.

/// Sentinel contract address that short-circuits every ledger action into a
/// mock-success response.
///
/// When the facade is configured with this address, no simulated dispatch
/// runs and no record is mutated. The check precedes all other ledger
/// logic.
pub const PLACEHOLDER_CONTRACT_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Transaction hash returned by the placeholder short-circuit path.
pub const PLACEHOLDER_TX_HASH: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Hex digit count of an address-shaped string (after the `0x` prefix).
pub const ADDRESS_HEX_LEN: usize = 40;

/// Hex digit count of a transaction hash (after the `0x` prefix).
pub const TX_HASH_HEX_LEN: usize = 64;

/// Ledger platform recorded when minting against a record that was never
/// anchored to a named platform.
pub const FALLBACK_PLATFORM: &str = "SIMULATED";

/// Maximum number of lifecycle events represented in a derived
/// relationship graph.
///
/// Only the first events (in stored order) are emitted; the rest are
/// omitted to keep the graph readable.
pub const GRAPH_EVENT_LIMIT: usize = 3;

/// Aggregation bucket for records without a country of origin.
pub const UNKNOWN_COUNTRY: &str = "UNKNOWN";

// =============================================================================
// IMPORT JOB TRANSITIONS
// =============================================================================

/// Percent chance that a pending import job transitions on a status poll.
pub const JOB_TRANSITION_PERCENT: u32 = 30;

/// Percent chance that a firing transition resolves to `Completed`
/// (the remainder resolves to `Failed`).
pub const JOB_COMPLETION_PERCENT: u32 = 70;

/// Inclusive bounds of the processed-record count reported by a completed
/// import job.
pub const IMPORT_PROCESSED_MIN: u32 = 10;

/// See [`IMPORT_PROCESSED_MIN`].
pub const IMPORT_PROCESSED_MAX: u32 = 500;

/// Canned reasons attached to failed import jobs.
pub const IMPORT_FAILURE_REASONS: [&str; 3] = [
    "Source file contained malformed rows",
    "GTIN column failed checksum validation",
    "Duplicate passport identifiers in batch",
];

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum byte length accepted for record, supplier and job identifiers.
///
/// Longer identifiers are rejected at the API boundary before reaching the
/// store.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Maximum number of passports accepted in a single batch import.
pub const MAX_IMPORT_BATCH: usize = 500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_address_is_address_shaped() {
        let hex = PLACEHOLDER_CONTRACT_ADDRESS
            .strip_prefix("0x")
            .expect("0x prefix");
        assert_eq!(hex.len(), ADDRESS_HEX_LEN);
    }

    #[test]
    fn transition_percentages_are_probabilities() {
        assert!(JOB_TRANSITION_PERCENT <= 100);
        assert!(JOB_COMPLETION_PERCENT <= 100);
        assert!(IMPORT_PROCESSED_MIN <= IMPORT_PROCESSED_MAX);
    }
}
