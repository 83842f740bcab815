//! store::node
//!
//! The taxonomy node entity.
//!
//! # Schema
//!
//! A node carries its own label (`segment_name`) plus two denormalized
//! values maintained by the library: `full_name`/`depth` (path position)
//! and `resource_count`/`full_resource_count` (item aggregates). The
//! denormalized values are never computed lazily at read time; mutations
//! run the relevant maintainer so readers always see consistent rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{
    FieldId, NodeId, QualifierId, SegmentName, FULL_NAME_SEPARATOR,
};

/// One entry in a hierarchical controlled vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    /// Stable arena id
    pub id: NodeId,

    /// Which vocabulary this node belongs to
    pub field_id: FieldId,

    /// Parent node, `None` for a root
    pub parent_id: Option<NodeId>,

    /// Own label
    pub segment_name: SegmentName,

    /// Denormalized ancestor-to-self path, segments joined by `" -- "`
    pub full_name: String,

    /// 0 at a root, parent depth + 1 otherwise
    pub depth: u32,

    /// Optional authority-record link
    pub qualifier_id: Option<QualifierId>,

    /// Items attached directly to this node
    pub resource_count: u64,

    /// Items attached here or anywhere in the subtree
    pub full_resource_count: u64,

    /// When the node was created
    pub created_at: DateTime<Utc>,

    /// When the node was last mutated
    pub updated_at: DateTime<Utc>,
}

impl TaxonomyNode {
    /// Create a fresh node under the given parent position.
    ///
    /// `full_name` and `depth` are derived from the parent's values; counts
    /// start at zero.
    pub(crate) fn new(
        id: NodeId,
        field_id: FieldId,
        parent: Option<&TaxonomyNode>,
        segment_name: SegmentName,
        qualifier_id: Option<QualifierId>,
    ) -> Self {
        let now = Utc::now();
        let (full_name, depth) = derive_position(parent, &segment_name);
        Self {
            id,
            field_id,
            parent_id: parent.map(|p| p.id),
            segment_name,
            full_name,
            depth,
            qualifier_id,
            resource_count: 0,
            full_resource_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this node is a root of its vocabulary.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Normalized browse key for this node's own label.
    pub fn browse_key(&self) -> String {
        self.segment_name.browse_key()
    }

    /// Record a mutation timestamp.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Compute a node's `(full_name, depth)` from its parent's position.
pub(crate) fn derive_position(
    parent: Option<&TaxonomyNode>,
    segment: &SegmentName,
) -> (String, u32) {
    match parent {
        None => (segment.as_str().to_string(), 0),
        Some(p) => (
            format!("{}{}{}", p.full_name, FULL_NAME_SEPARATOR, segment.as_str()),
            p.depth + 1,
        ),
    }
}
