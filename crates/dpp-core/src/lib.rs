//! # dpp-core
//!
//! The Digital Product Passport record store and derived-view engine -
//! THE LOGIC.
//!
//! This crate owns the passport data model and every operation with real
//! invariants: partial-update merge semantics, soft-delete visibility,
//! idempotent ledger anchoring, relationship-graph derivation, cross-record
//! aggregation and the probabilistic import-job state machine.
//!
//! ## Architectural Constraints
//!
//! - The core is the only place where passport state lives (in-memory,
//!   process-lifetime; durability is explicitly out of scope)
//! - No async, no network dependencies (pure Rust)
//! - `BTreeMap` everywhere for deterministic ordering
//! - Time, randomness and identifier generation enter exclusively through
//!   injectable capabilities (`Clock`, `RandomSource`, `IdSource`)

// =============================================================================
// MODULES
// =============================================================================

pub mod clock;
pub mod graph;
pub mod ids;
pub mod jobs;
pub mod ledger;
pub mod merge;
pub mod primitives;
pub mod stats;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    BlockchainIdentifiers, CustomAttribute, DigitalProductPassport, DocumentRef, DppError,
    EbsiVerification, ImportJob, ImportJobStatus, LifecycleEvent, Manufacturer, Metadata,
    ProductDetails, Supplier, SupplyChainLink,
};

// =============================================================================
// RE-EXPORTS: Store & Merge Engine
// =============================================================================

pub use merge::{MetadataPatch, ProductDetailsPatch, UpdatePayload, merge_update};
pub use store::{InMemoryStore, PassportDraft, PassportStore, SupplierRegistry};

// =============================================================================
// RE-EXPORTS: Derived Views
// =============================================================================

pub use graph::{EdgeLabel, GraphEdge, GraphNode, NodeType, RelationshipGraph, derive_graph, slug};
pub use stats::{FrequencyCount, category_stats, country_stats, status_stats};

// =============================================================================
// RE-EXPORTS: Ledger Facade & Jobs
// =============================================================================

pub use jobs::{ImportJobTracker, RandomSource, ScriptedRandom, ThreadRandom};
pub use ledger::{
    LedgerConfig, LedgerFacade, MetadataReceipt, MintReceipt, TransferReceipt, is_address,
};

// =============================================================================
// RE-EXPORTS: Capabilities
// =============================================================================

pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::{IdSource, SequentialIds};
