//! # Relationship Graph Deriver
//!
//! Derives a node/edge view of one passport record: the product, its
//! manufacturer, resolved suppliers, supplied components and the leading
//! lifecycle events.
//!
//! Derivation is deterministic and order-preserving: nodes and edges are
//! emitted in a fixed pass order, duplicates are suppressed by key while
//! first-emission order is kept, and unresolved supplier references are
//! tolerated (the component node is still created).

use crate::primitives::GRAPH_EVENT_LIMIT;
use crate::store::SupplierRegistry;
use crate::types::DigitalProductPassport;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// GRAPH SHAPE
// =============================================================================

/// Kind of a derived graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Product,
    Manufacturer,
    Supplier,
    Component,
    LifecycleEvent,
}

/// Label of a derived graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeLabel {
    ManufacturedBy,
    SuppliesItem,
    IsPartOf,
    UnderwentEvent,
}

/// One node of the derived relationship graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Deduplication key and wire id.
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    /// Display attributes carried by the node.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

/// One directed edge of the derived relationship graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub label: EdgeLabel,
}

/// The derived node/edge view of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

// =============================================================================
// SLUG
// =============================================================================

/// Normalize a display string into a lowercase, whitespace-free key.
///
/// Whitespace runs collapse to a single underscore; used for manufacturer
/// and component deduplication keys.
#[must_use]
pub fn slug(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

// =============================================================================
// DERIVATION
// =============================================================================

/// Collects nodes in insertion order with key-based deduplication.
#[derive(Default)]
struct NodeSink {
    nodes: Vec<GraphNode>,
    seen: BTreeSet<String>,
}

impl NodeSink {
    fn push(&mut self, node: GraphNode) {
        if self.seen.insert(node.id.clone()) {
            self.nodes.push(node);
        }
    }
}

/// Derive the relationship graph for one record.
///
/// The caller resolves the record first (unknown ids surface as NotFound at
/// the store); supplier references that fail to resolve are tolerated.
#[must_use]
pub fn derive_graph(
    record: &DigitalProductPassport,
    suppliers: &SupplierRegistry,
) -> RelationshipGraph {
    let mut sink = NodeSink::default();
    let mut edges = Vec::new();

    // 1. The product itself.
    let mut product_data = BTreeMap::new();
    product_data.insert("category".to_string(), record.category.clone());
    product_data.insert("model".to_string(), record.model_number.clone());
    product_data.insert("gtin".to_string(), record.gtin.clone());
    sink.push(GraphNode {
        id: record.id.clone(),
        node_type: NodeType::Product,
        label: record.product_name.clone(),
        data: product_data,
    });

    // 2. Manufacturer, keyed by name slug.
    if !record.manufacturer.name.trim().is_empty() {
        let manufacturer_id = slug(&record.manufacturer.name);
        sink.push(GraphNode {
            id: manufacturer_id.clone(),
            node_type: NodeType::Manufacturer,
            label: record.manufacturer.name.clone(),
            data: BTreeMap::new(),
        });
        edges.push(GraphEdge {
            from: manufacturer_id,
            to: record.id.clone(),
            label: EdgeLabel::ManufacturedBy,
        });
    }

    // 3. Supply chain, in stored order. The index disambiguates duplicate
    //    item names across links.
    for (index, link) in record.supply_chain_links.iter().enumerate() {
        let resolved = suppliers.resolve(&link.supplier_id);

        if let Some(supplier) = resolved {
            let mut supplier_data = BTreeMap::new();
            if !supplier.location.is_empty() {
                supplier_data.insert("location".to_string(), supplier.location.clone());
            }
            sink.push(GraphNode {
                id: supplier.id.clone(),
                node_type: NodeType::Supplier,
                label: supplier.name.clone(),
                data: supplier_data,
            });
        }

        let component_id = format!("{}_{}_{}", record.id, slug(&link.supplied_item), index);
        let mut component_data = BTreeMap::new();
        if let Some(notes) = &link.notes {
            component_data.insert("notes".to_string(), notes.clone());
        }
        sink.push(GraphNode {
            id: component_id.clone(),
            node_type: NodeType::Component,
            label: link.supplied_item.clone(),
            data: component_data,
        });

        if resolved.is_some() {
            edges.push(GraphEdge {
                from: link.supplier_id.clone(),
                to: component_id.clone(),
                label: EdgeLabel::SuppliesItem,
            });
        }
        edges.push(GraphEdge {
            from: component_id,
            to: record.id.clone(),
            label: EdgeLabel::IsPartOf,
        });
    }

    // 4. Leading lifecycle events, stored order, not re-sorted.
    for event in record.lifecycle_events.iter().take(GRAPH_EVENT_LIMIT) {
        let event_node_id = format!("{}_event_{}", record.id, event.id);
        let mut event_data = BTreeMap::new();
        if let Some(location) = &event.location {
            event_data.insert("location".to_string(), location.clone());
        }
        sink.push(GraphNode {
            id: event_node_id.clone(),
            node_type: NodeType::LifecycleEvent,
            label: event.event_type.clone(),
            data: event_data,
        });
        edges.push(GraphEdge {
            from: record.id.clone(),
            to: event_node_id,
            label: EdgeLabel::UnderwentEvent,
        });
    }

    RelationshipGraph {
        nodes: sink.nodes,
        edges,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LifecycleEvent, Manufacturer, Supplier, SupplyChainLink};
    use time::OffsetDateTime;
    use time::macros::datetime;

    fn record_with_manufacturer() -> DigitalProductPassport {
        let mut record = DigitalProductPassport::new(
            "DPP001",
            "Wool Coat",
            "Textiles",
            OffsetDateTime::UNIX_EPOCH,
        );
        record.manufacturer = Manufacturer {
            name: "Atlantic Textiles".to_string(),
            did: None,
            address: None,
            eori: None,
        };
        record
    }

    fn registry_with(ids: &[&str]) -> SupplierRegistry {
        let mut registry = SupplierRegistry::new();
        for id in ids {
            registry
                .insert(Supplier {
                    id: (*id).to_string(),
                    name: format!("Supplier {id}"),
                    location: "PT".to_string(),
                    materials_supplied: vec![],
                    contact_person: String::new(),
                })
                .expect("insert");
        }
        registry
    }

    fn link(supplier_id: &str, item: &str) -> SupplyChainLink {
        SupplyChainLink {
            supplier_id: supplier_id.to_string(),
            supplied_item: item.to_string(),
            notes: None,
        }
    }

    fn event(id: &str, kind: &str) -> LifecycleEvent {
        LifecycleEvent {
            id: id.to_string(),
            event_type: kind.to_string(),
            timestamp: datetime!(2024-01-01 00:00 UTC),
            location: None,
            responsible_party: None,
            data: None,
        }
    }

    #[test]
    fn slug_lowercases_and_replaces_whitespace() {
        assert_eq!(slug("Atlantic Textiles"), "atlantic_textiles");
        assert_eq!(slug("  Merino   Wool "), "merino_wool");
        assert_eq!(slug("plain"), "plain");
    }

    #[test]
    fn linkless_record_derives_product_and_manufacturer_only() {
        let record = record_with_manufacturer();
        let graph = derive_graph(&record, &SupplierRegistry::new());

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].node_type, NodeType::Product);
        assert_eq!(graph.nodes[0].id, "DPP001");
        assert_eq!(graph.nodes[1].node_type, NodeType::Manufacturer);
        assert_eq!(graph.nodes[1].id, "atlantic_textiles");

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].label, EdgeLabel::ManufacturedBy);
        assert_eq!(graph.edges[0].from, "atlantic_textiles");
        assert_eq!(graph.edges[0].to, "DPP001");
    }

    #[test]
    fn nameless_manufacturer_is_omitted() {
        let record = DigitalProductPassport::new(
            "DPP001",
            "Wool Coat",
            "Textiles",
            OffsetDateTime::UNIX_EPOCH,
        );
        let graph = derive_graph(&record, &SupplierRegistry::new());

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn supply_links_emit_supplier_component_and_edges() {
        let mut record = record_with_manufacturer();
        record.supply_chain_links = vec![link("SUP1", "Merino wool"), link("SUP2", "Horn buttons")];
        let registry = registry_with(&["SUP1", "SUP2"]);

        let graph = derive_graph(&record, &registry);

        // product + manufacturer + 2 suppliers + 2 components
        assert_eq!(graph.nodes.len(), 6);
        let component_ids: Vec<_> = graph
            .nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Component)
            .map(|n| n.id.clone())
            .collect();
        assert_eq!(
            component_ids,
            vec!["DPP001_merino_wool_0", "DPP001_horn_buttons_1"]
        );

        let supplies: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.label == EdgeLabel::SuppliesItem)
            .collect();
        assert_eq!(supplies.len(), 2);
        assert_eq!(supplies[0].from, "SUP1");
        assert_eq!(supplies[0].to, "DPP001_merino_wool_0");

        let parts: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.label == EdgeLabel::IsPartOf)
            .collect();
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn unresolved_supplier_still_creates_component() {
        let mut record = record_with_manufacturer();
        record.supply_chain_links = vec![link("GHOST", "Mystery lining")];

        let graph = derive_graph(&record, &SupplierRegistry::new());

        // No supplier node, but the component and its is_part_of edge exist
        assert!(
            graph
                .nodes
                .iter()
                .all(|n| n.node_type != NodeType::Supplier)
        );
        assert!(
            graph
                .nodes
                .iter()
                .any(|n| n.id == "DPP001_mystery_lining_0")
        );
        assert!(
            graph
                .edges
                .iter()
                .all(|e| e.label != EdgeLabel::SuppliesItem)
        );
        assert!(graph.edges.iter().any(|e| e.label == EdgeLabel::IsPartOf));
    }

    #[test]
    fn duplicate_item_names_disambiguated_by_index() {
        let mut record = record_with_manufacturer();
        record.supply_chain_links = vec![link("SUP1", "Zipper"), link("SUP1", "Zipper")];
        let registry = registry_with(&["SUP1"]);

        let graph = derive_graph(&record, &registry);

        let component_ids: Vec<_> = graph
            .nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Component)
            .map(|n| n.id.clone())
            .collect();
        assert_eq!(component_ids, vec!["DPP001_zipper_0", "DPP001_zipper_1"]);

        // Supplier node emitted once despite two links
        let supplier_nodes = graph
            .nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Supplier)
            .count();
        assert_eq!(supplier_nodes, 1);
    }

    #[test]
    fn lifecycle_events_capped_and_in_order() {
        let mut record = record_with_manufacturer();
        record.lifecycle_events = vec![
            event("E1", "manufactured"),
            event("E2", "shipped"),
            event("E3", "sold"),
            event("E4", "repaired"),
        ];

        let graph = derive_graph(&record, &SupplierRegistry::new());

        let event_ids: Vec<_> = graph
            .nodes
            .iter()
            .filter(|n| n.node_type == NodeType::LifecycleEvent)
            .map(|n| n.id.clone())
            .collect();
        assert_eq!(
            event_ids,
            vec!["DPP001_event_E1", "DPP001_event_E2", "DPP001_event_E3"]
        );

        let event_edges: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.label == EdgeLabel::UnderwentEvent)
            .collect();
        assert_eq!(event_edges.len(), 3);
        assert!(event_edges.iter().all(|e| e.from == "DPP001"));
    }

    #[test]
    fn derivation_is_deterministic() {
        let mut record = record_with_manufacturer();
        record.supply_chain_links = vec![link("SUP1", "Merino wool")];
        record.lifecycle_events = vec![event("E1", "manufactured")];
        let registry = registry_with(&["SUP1"]);

        let first = derive_graph(&record, &registry);
        let second = derive_graph(&record, &registry);
        assert_eq!(first, second);
    }
}
