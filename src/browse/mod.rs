//! browse
//!
//! Alphabetic "Browse by Category" support.
//!
//! # Modules
//!
//! - [`partition`] - Pure bin-splitting algorithm with boundary labels
//! - [`query`] - Range queries derived from a selected bin
//! - [`cache`] - Bounded-TTL memo for partition results
//!
//! # Flow
//!
//! A caller rendering a browse page collects the normalized sibling keys
//! with [`sibling_keys`], partitions them, and turns the bin a user picks
//! into a [`query::RangeQuery`] against the store.

pub mod cache;
pub mod partition;
pub mod query;

pub use cache::{PartitionCache, PartitionKey};
pub use partition::{partition, partition_with, Bin, Partition};
pub use query::RangeQuery;

use crate::core::types::{FieldId, Fingerprint, NodeId};
use crate::store::TaxonomyStore;

/// Normalized, ascending browse keys of one sibling set.
///
/// Blank keys (names with no browsable characters) are discarded, matching
/// the partitioner's input contract.
pub fn sibling_keys(store: &TaxonomyStore, field: FieldId, parent: Option<NodeId>) -> Vec<String> {
    let mut keys: Vec<String> = store
        .children(field, parent)
        .iter()
        .map(|node| node.browse_key())
        .filter(|key| !key.is_empty())
        .collect();
    keys.sort();
    keys
}

/// Fingerprint of one sibling set, for cache revalidation.
pub fn sibling_fingerprint(keys: &[String]) -> Fingerprint {
    Fingerprint::compute(keys.iter().map(|k| k.as_str()))
}
