//! # Property-Based Tests
//!
//! Invariant verification for the passport core using proptest:
//! merge preservation, archive idempotence, aggregation totals and graph
//! shape bounds.

use dpp_core::{
    DigitalProductPassport, InMemoryStore, PassportStore, SequentialIds, SupplierRegistry,
    UpdatePayload, country_stats, derive_graph, merge_update,
};
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use std::sync::Arc;
use time::OffsetDateTime;

fn record(id: &str, country: Option<String>) -> DigitalProductPassport {
    let mut record =
        DigitalProductPassport::new(id, "Product", "Category", OffsetDateTime::UNIX_EPOCH);
    record.product_details.country_of_origin = country;
    record
}

/// Scalar-only update payloads with arbitrary presence.
fn scalar_payload_strategy() -> impl Strategy<Value = UpdatePayload> {
    (
        option::of("[a-zA-Z0-9 ]{0,12}"),
        option::of("[a-zA-Z0-9 ]{0,12}"),
        option::of("[0-9]{0,14}"),
        option::of("[a-zA-Z0-9-]{0,10}"),
    )
        .prop_map(|(product_name, category, gtin, model_number)| UpdatePayload {
            product_name,
            category,
            gtin,
            model_number,
            ..UpdatePayload::default()
        })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Fields absent from the payload are byte-identical after the merge,
    /// and present fields always win.
    #[test]
    fn merge_preserves_unspecified_fields(payload in scalar_payload_strategy()) {
        let existing = record("DPP001", Some("PT".to_string()));
        let merged = merge_update(&existing, &payload, OffsetDateTime::UNIX_EPOCH);

        match &payload.product_name {
            Some(value) => prop_assert_eq!(&merged.product_name, value),
            None => prop_assert_eq!(&merged.product_name, &existing.product_name),
        }
        match &payload.category {
            Some(value) => prop_assert_eq!(&merged.category, value),
            None => prop_assert_eq!(&merged.category, &existing.category),
        }
        match &payload.gtin {
            Some(value) => prop_assert_eq!(&merged.gtin, value),
            None => prop_assert_eq!(&merged.gtin, &existing.gtin),
        }

        // Blocks never named by the payload are untouched
        prop_assert_eq!(&merged.manufacturer, &existing.manufacturer);
        prop_assert_eq!(&merged.product_details, &existing.product_details);
        prop_assert_eq!(&merged.supply_chain_links, &existing.supply_chain_links);
        prop_assert_eq!(&merged.lifecycle_events, &existing.lifecycle_events);
        prop_assert_eq!(merged.metadata.last_updated, existing.metadata.last_updated);
    }

    /// Merging the same payload twice is idempotent.
    #[test]
    fn merge_is_idempotent(payload in scalar_payload_strategy()) {
        let existing = record("DPP001", None);
        let once = merge_update(&existing, &payload, OffsetDateTime::UNIX_EPOCH);
        let twice = merge_update(&once, &payload, OffsetDateTime::UNIX_EPOCH);
        prop_assert_eq!(once, twice);
    }

    /// Country-stat counts always sum to the number of records scanned.
    #[test]
    fn country_counts_sum_to_records_scanned(
        countries in vec(option::of("[a-zA-Z]{2}"), 0..40)
    ) {
        let records: Vec<_> = countries
            .iter()
            .enumerate()
            .map(|(index, country)| record(&format!("DPP{index:03}"), country.clone()))
            .collect();

        let stats = country_stats(&records);
        let total: u64 = stats.iter().map(|s| s.count).sum();
        prop_assert_eq!(total, records.len() as u64);

        // Every key is uppercased or the unknown bucket
        for entry in &stats {
            prop_assert!(entry.key.chars().all(|c| !c.is_lowercase()));
        }
    }

    /// A record with no supply chain links derives exactly one product node
    /// plus, when a manufacturer name is present, one manufacturer node and
    /// one edge.
    #[test]
    fn linkless_graph_has_bounded_shape(manufacturer_name in "[a-zA-Z ]{0,16}") {
        let mut rec = record("DPP001", None);
        rec.manufacturer.name = manufacturer_name.clone();

        let graph = derive_graph(&rec, &SupplierRegistry::new());

        if manufacturer_name.trim().is_empty() {
            prop_assert_eq!(graph.nodes.len(), 1);
            prop_assert_eq!(graph.edges.len(), 0);
        } else {
            prop_assert_eq!(graph.nodes.len(), 2);
            prop_assert_eq!(graph.edges.len(), 1);
        }
    }

    /// Archiving any number of times leaves the record archived and
    /// addressable, and never resurfaces it on active reads.
    #[test]
    fn archive_is_idempotent(archive_count in 1usize..5) {
        let mut store = InMemoryStore::with_parts(
            Arc::new(dpp_core::SystemClock),
            Arc::new(SequentialIds::new()),
        );
        store.insert(record("DPP001", None)).expect("insert");

        for _ in 0..archive_count {
            let archived = store.archive("DPP001").expect("archive");
            prop_assert!(archived.metadata.is_archived);
        }

        prop_assert!(store.get("DPP001").is_err());
        prop_assert!(store.contains("DPP001"));
    }
}
