//! # Identifier Generation
//!
//! Fresh identifiers — record ids, job ids, token ids, synthetic
//! transaction hashes and contract-address placeholders — come from the
//! [`IdSource`] capability. The default implementation is a single atomic
//! counter formatted per kind, which keeps every generated value unique per
//! process and the whole core deterministic under test.

use std::sync::atomic::{AtomicU64, Ordering};

/// Capability for minting fresh identifiers.
pub trait IdSource: Send + Sync {
    /// Fresh passport record id.
    fn next_passport_id(&self) -> String;

    /// Fresh batch-import job id.
    fn next_job_id(&self) -> String;

    /// Fresh token id.
    fn next_token_id(&self) -> String;

    /// Fresh synthetic transaction hash. Unique per call.
    fn next_transaction_hash(&self) -> String;

    /// Fresh contract-address placeholder. Unique per call.
    fn next_contract_address(&self) -> String;
}

// =============================================================================
// SEQUENTIAL IDS
// =============================================================================

/// Monotonic-counter [`IdSource`]; the default for store, ledger facade and
/// job tracker.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    /// A source counting from zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source counting from `start`; useful when seeding a store whose
    /// records already occupy low ids.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }

    fn bump(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst).saturating_add(1)
    }
}

impl IdSource for SequentialIds {
    fn next_passport_id(&self) -> String {
        format!("DPP{:03}", self.bump())
    }

    fn next_job_id(&self) -> String {
        format!("IMP-{:06}", self.bump())
    }

    fn next_token_id(&self) -> String {
        self.bump().to_string()
    }

    fn next_transaction_hash(&self) -> String {
        format!("0x{:064x}", self.bump())
    }

    fn next_contract_address(&self) -> String {
        format!("0x{:040x}", self.bump())
    }
}

// =============================================================================
// TESTS
// =============================================================================
