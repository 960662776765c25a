//! # Cross-Record Aggregation
//!
//! Frequency counts over a snapshot of the record store. Country stats
//! scan every record, archived included; narrower consumers filter the
//! snapshot before calling in.
//!
//! Output ordering is NOT part of the contract. Accumulation happens in a
//! `BTreeMap`, so the result happens to be key-sorted, but callers must
//! not rely on that.

use crate::primitives::UNKNOWN_COUNTRY;
use crate::types::DigitalProductPassport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One `{key, count}` pair of an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyCount {
    pub key: String,
    pub count: u64,
}

fn count_by<F>(records: &[DigitalProductPassport], key_of: F) -> Vec<FrequencyCount>
where
    F: Fn(&DigitalProductPassport) -> String,
{
    let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        *buckets.entry(key_of(record)).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(key, count)| FrequencyCount { key, count })
        .collect()
}

/// Records per country of origin, keyed by the uppercased country code,
/// with records lacking one counted under `UNKNOWN`.
#[must_use]
pub fn country_stats(records: &[DigitalProductPassport]) -> Vec<FrequencyCount> {
    count_by(records, |record| {
        record
            .product_details
            .country_of_origin
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map_or_else(|| UNKNOWN_COUNTRY.to_string(), str::to_uppercase)
    })
}

/// Records per product category.
#[must_use]
pub fn category_stats(records: &[DigitalProductPassport]) -> Vec<FrequencyCount> {
    count_by(records, |record| {
        let category = record.category.trim();
        if category.is_empty() {
            UNKNOWN_COUNTRY.to_string()
        } else {
            category.to_string()
        }
    })
}

/// Records per `metadata.status`.
#[must_use]
pub fn status_stats(records: &[DigitalProductPassport]) -> Vec<FrequencyCount> {
    count_by(records, |record| {
        let status = record.metadata.status.trim();
        if status.is_empty() {
            UNKNOWN_COUNTRY.to_string()
        } else {
            status.to_string()
        }
    })
}

// =============================================================================
// TESTS
// =============================================================================
