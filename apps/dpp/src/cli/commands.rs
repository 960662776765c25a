//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands, plus
//! loading of the JSON seed bundle they operate on.

use crate::api::{self, Stores};
use crate::cli::StatsDimension;
use dpp_core::{
    DigitalProductPassport, DppError, PassportStore, Supplier, category_stats, country_stats,
    derive_graph, status_stats,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// SEED BUNDLE
// =============================================================================

/// Maximum seed file size (50 MB).
///
/// This prevents memory exhaustion from malicious or accidental large
/// files.
const MAX_SEED_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// A JSON bundle of passports and suppliers used to pre-populate the
/// in-memory stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedBundle {
    pub passports: Vec<DigitalProductPassport>,
    pub suppliers: Vec<Supplier>,
}

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), DppError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| DppError::Io(format!("Cannot read file metadata: {e}")))?;

    if metadata.len() > max_size {
        return Err(DppError::Validation(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Load and parse a seed bundle from disk.
pub fn load_seed(path: &Path) -> Result<SeedBundle, DppError> {
    validate_file_size(path, MAX_SEED_FILE_SIZE)?;

    let raw = std::fs::read_to_string(path)
        .map_err(|e| DppError::Io(format!("Cannot read seed file '{}': {e}", path.display())))?;

    serde_json::from_str(&raw).map_err(|e| {
        DppError::Serialization(format!("Invalid seed file '{}': {e}", path.display()))
    })
}

/// Build populated stores from a seed bundle.
pub fn build_stores(bundle: SeedBundle) -> Result<Stores, DppError> {
    let mut stores = Stores::new();
    for supplier in bundle.suppliers {
        stores.suppliers.insert(supplier)?;
    }
    for passport in bundle.passports {
        stores.passports.insert(passport)?;
    }
    Ok(stores)
}

/// Resolve the seed option: absent means an empty bundle.
fn load_optional_seed(seed: Option<&Path>) -> Result<SeedBundle, DppError> {
    seed.map_or_else(|| Ok(SeedBundle::default()), load_seed)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server, optionally pre-seeded.
pub async fn cmd_server(seed: Option<&Path>, host: &str, port: u16) -> Result<(), DppError> {
    let bundle = load_optional_seed(seed)?;
    let seeded = bundle.passports.len();
    let stores = build_stores(bundle)?;

    println!("Digital Product Passport Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {host}");
    println!("  Port:     {port}");
    match seed {
        Some(path) => println!("  Seed:     {} ({seeded} passports)", path.display()),
        None => println!("  Seed:     none (empty store)"),
    }
    println!();
    println!("Endpoints:");
    println!("  POST   /passports            - Create a record");
    println!("  GET    /passports/{{id}}       - Get a record");
    println!("  PATCH  /passports/{{id}}       - Partial update");
    println!("  DELETE /passports/{{id}}       - Archive (soft delete)");
    println!("  GET    /passports/{{id}}/graph - Relationship graph");
    println!("  GET    /stats/countries      - Country aggregation");
    println!("  POST   /passports/{{id}}/anchor - Ledger anchoring");
    println!("  POST   /imports              - Batch import");
    println!("  GET    /health               - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{host}:{port}");
    api::run_server(&addr, stores).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show store counters for the seed bundle.
pub fn cmd_status(seed: Option<&Path>, json_mode: bool) -> Result<(), DppError> {
    let bundle = load_optional_seed(seed)?;
    let stores = build_stores(bundle)?;

    let passport_count = stores.passports.len();
    let active_count = stores.passports.active_count();

    if json_mode {
        let output = serde_json::json!({
            "passport_count": passport_count,
            "active_count": active_count,
            "archived_count": passport_count.saturating_sub(active_count),
            "supplier_count": stores.suppliers.len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Passport Store Status");
    println!("=====================");
    println!("Passports: {passport_count}");
    println!("Active:    {active_count}");
    println!(
        "Archived:  {}",
        passport_count.saturating_sub(active_count)
    );
    println!("Suppliers: {}", stores.suppliers.len());

    Ok(())
}

// =============================================================================
// GRAPH COMMAND
// =============================================================================

/// Derive and print the relationship graph of one record.
pub fn cmd_graph(seed: Option<&Path>, id: &str, json_mode: bool) -> Result<(), DppError> {
    let Some(path) = seed else {
        return Err(DppError::Validation(
            "--seed <file> is required for the graph command".to_string(),
        ));
    };
    let stores = build_stores(load_seed(path)?)?;

    let record = stores.passports.get(id)?;
    let graph = derive_graph(&record, &stores.suppliers);

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&graph).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Relationship graph for {id}");
    println!("===========================");
    println!("Nodes:");
    for node in &graph.nodes {
        println!("  [{:?}] {} ({})", node.node_type, node.label, node.id);
    }
    println!("Edges:");
    for edge in &graph.edges {
        println!("  {} -[{:?}]-> {}", edge.from, edge.label, edge.to);
    }

    Ok(())
}

// =============================================================================
// STATS COMMAND
// =============================================================================

/// Aggregate the seed bundle along one dimension.
pub fn cmd_stats(
    seed: Option<&Path>,
    by: StatsDimension,
    json_mode: bool,
) -> Result<(), DppError> {
    let bundle = load_optional_seed(seed)?;
    let stores = build_stores(bundle)?;
    let snapshot = stores.passports.snapshot();

    let (label, counts) = match by {
        StatsDimension::Countries => ("country", country_stats(&snapshot)),
        StatsDimension::Categories => ("category", category_stats(&snapshot)),
        StatsDimension::Status => ("status", status_stats(&snapshot)),
    };

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&counts).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Passports by {label}");
    println!("====================");
    for entry in &counts {
        println!("  {:<12} {}", entry.key, entry.count);
    }
    if counts.is_empty() {
        println!("  (no records)");
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn seed_json() -> &'static str {
        r#"{
            "passports": [
                {
                    "id": "DPP001",
                    "productName": "Wool Coat",
                    "category": "Textiles",
                    "metadata": {"status": "draft", "lastUpdated": "2024-05-01T12:00:00Z"}
                }
            ],
            "suppliers": [
                {"id": "SUP1", "name": "Merino Farms"}
            ]
        }"#
    }

    #[test]
    fn load_seed_parses_bundle() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(seed_json().as_bytes()).expect("write");

        let bundle = load_seed(file.path()).expect("load");
        assert_eq!(bundle.passports.len(), 1);
        assert_eq!(bundle.passports[0].id, "DPP001");
        assert_eq!(bundle.suppliers.len(), 1);
    }

    #[test]
    fn load_seed_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"{not json").expect("write");

        assert!(matches!(
            load_seed(file.path()),
            Err(DppError::Serialization(_))
        ));
    }

    #[test]
    fn load_seed_missing_file_is_io_error() {
        assert!(matches!(
            load_seed(Path::new("/nonexistent/seed.json")),
            Err(DppError::Io(_))
        ));
    }

    #[test]
    fn build_stores_populates_both_collections() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(seed_json().as_bytes()).expect("write");

        let stores = build_stores(load_seed(file.path()).expect("load")).expect("build");
        assert_eq!(stores.passports.len(), 1);
        assert_eq!(stores.suppliers.len(), 1);
        assert!(stores.passports.get("DPP001").is_ok());
    }
}
