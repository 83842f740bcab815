//! verify
//!
//! Deterministic invariant verification for one vocabulary.
//!
//! # Checks
//!
//! - Structure is acyclic
//! - `depth == parent.depth + 1` (0 at a root)
//! - `full_name` is exactly the ancestor-to-self segment join
//! - `full_resource_count == resource_count + Σ child aggregates`
//! - `resource_count` agrees with the association table
//! - Sibling labels are unique case-insensitively
//! - Pending count-repair flags are surfaced
//!
//! # Invariants
//!
//! - Never mutates the store
//! - Must be deterministic

use std::collections::HashMap;

use thiserror::Error;

use crate::core::types::{FieldId, NodeId, FULL_NAME_SEPARATOR};
use crate::store::TaxonomyStore;

/// Problems found during verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyIssue {
    #[error("cycle detected through node {0}")]
    CycleDetected(NodeId),

    #[error("node {node}: depth {actual}, expected {expected}")]
    DepthMismatch {
        node: NodeId,
        expected: u32,
        actual: u32,
    },

    #[error("node {node}: full name '{actual}', expected '{expected}'")]
    FullNameMismatch {
        node: NodeId,
        expected: String,
        actual: String,
    },

    #[error("node {node}: resource count {actual}, association table has {expected}")]
    ResourceCountMismatch {
        node: NodeId,
        expected: u64,
        actual: u64,
    },

    #[error("node {node}: aggregate count {actual}, expected {expected}")]
    AggregateMismatch {
        node: NodeId,
        expected: u64,
        actual: u64,
    },

    #[error("nodes {a} and {b} are siblings with the same folded name")]
    DuplicateSiblings { a: NodeId, b: NodeId },

    #[error("field {0} is flagged for a count repair pass")]
    RecountPending(FieldId),
}

/// Result of verifying one field.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether verification passed
    pub ok: bool,
    /// Issues found during verification
    pub issues: Vec<VerifyIssue>,
}

impl VerifyResult {
    fn from_issues(issues: Vec<VerifyIssue>) -> Self {
        Self {
            ok: issues.is_empty(),
            issues,
        }
    }
}

/// Verify every invariant of one field.
///
/// A cycle aborts the positional checks (paths are undefined on a cyclic
/// structure) but still reports the cycle itself.
pub fn verify_field(store: &TaxonomyStore, field: FieldId) -> VerifyResult {
    let mut issues = Vec::new();

    if let Some(node) = store.tree().find_cycle() {
        issues.push(VerifyIssue::CycleDetected(node));
        return VerifyResult::from_issues(issues);
    }

    let mut ids: Vec<NodeId> = store.nodes_in_field(field).map(|n| n.id).collect();
    ids.sort();

    for &id in &ids {
        let node = match store.node(id) {
            Ok(n) => n,
            Err(_) => continue,
        };

        match node.parent_id {
            None => {
                if node.depth != 0 {
                    issues.push(VerifyIssue::DepthMismatch {
                        node: id,
                        expected: 0,
                        actual: node.depth,
                    });
                }
                if node.full_name != node.segment_name.as_str() {
                    issues.push(VerifyIssue::FullNameMismatch {
                        node: id,
                        expected: node.segment_name.as_str().to_string(),
                        actual: node.full_name.clone(),
                    });
                }
            }
            Some(parent_id) => {
                if let Ok(parent) = store.node(parent_id) {
                    let expected_depth = parent.depth + 1;
                    if node.depth != expected_depth {
                        issues.push(VerifyIssue::DepthMismatch {
                            node: id,
                            expected: expected_depth,
                            actual: node.depth,
                        });
                    }
                    let expected_full = format!(
                        "{}{}{}",
                        parent.full_name,
                        FULL_NAME_SEPARATOR,
                        node.segment_name.as_str()
                    );
                    if node.full_name != expected_full {
                        issues.push(VerifyIssue::FullNameMismatch {
                            node: id,
                            expected: expected_full,
                            actual: node.full_name.clone(),
                        });
                    }
                }
            }
        }

        let attached = store.association_count(id);
        if node.resource_count != attached {
            issues.push(VerifyIssue::ResourceCountMismatch {
                node: id,
                expected: attached,
                actual: node.resource_count,
            });
        }

        let child_sum: u64 = store
            .tree()
            .children(id)
            .filter_map(|c| store.node(c).ok())
            .map(|c| c.full_resource_count)
            .sum();
        let expected_aggregate = node.resource_count + child_sum;
        if node.full_resource_count != expected_aggregate {
            issues.push(VerifyIssue::AggregateMismatch {
                node: id,
                expected: expected_aggregate,
                actual: node.full_resource_count,
            });
        }
    }

    // Sibling uniqueness, grouped by parent position.
    let mut seen: HashMap<(Option<NodeId>, String), NodeId> = HashMap::new();
    for &id in &ids {
        if let Ok(node) = store.node(id) {
            let key = (node.parent_id, node.segment_name.folded());
            if let Some(&other) = seen.get(&key) {
                issues.push(VerifyIssue::DuplicateSiblings { a: other, b: id });
            } else {
                seen.insert(key, id);
            }
        }
    }

    if store.needs_recount(field) {
        issues.push(VerifyIssue::RecountPending(field));
    }

    VerifyResult::from_issues(issues)
}
