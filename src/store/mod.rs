//! store
//!
//! The node arena and its CRUD/query surface.
//!
//! # Architecture
//!
//! Nodes live in an arena keyed by [`NodeId`]; parent/child structure is a
//! [`TreeIndex`] kept consistent with the arena on every mutation, and
//! item associations live in a separate table from which the denormalized
//! counts can always be recomputed.
//!
//! # Invariants
//!
//! - Every non-root node's parent exists, in the same field
//! - The structure is acyclic (`reparent` checks explicitly)
//! - Sibling labels are unique case-insensitively
//! - Mutations validate before touching state, so a returned error
//!   implies the store is unchanged
//!
//! # Example
//!
//! ```
//! use vocabtree::store::TaxonomyStore;
//! use vocabtree::core::types::{FieldId, SegmentName};
//!
//! let mut store = TaxonomyStore::new();
//! let field = FieldId(1);
//! let animals = store
//!     .create_node(field, None, SegmentName::new("Animals").unwrap(), None)
//!     .unwrap();
//! let mammals = store
//!     .create_node(field, Some(animals), SegmentName::new("Mammals").unwrap(), None)
//!     .unwrap();
//!
//! assert_eq!(store.node(mammals).unwrap().full_name, "Animals -- Mammals");
//! ```

pub mod node;
pub mod snapshot;

pub use node::TaxonomyNode;
pub use snapshot::{SnapshotError, SnapshotFile};

use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;
use tracing::debug;

use crate::core::tree::TreeIndex;
use crate::core::types::{FieldId, ItemId, NodeId, QualifierId, SegmentName, TypeError};
use crate::maintain;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A sibling already carries this label (case-insensitive).
    #[error("duplicate sibling name '{name}' in field {field}")]
    DuplicateName { field: FieldId, name: String },

    /// The requested parent would create a cycle or crosses fields.
    #[error("invalid parent {parent}: {reason}")]
    InvalidParent {
        parent: NodeId,
        reason: &'static str,
    },

    /// Destroy without cascade on a node that still has children.
    #[error("node {0} has children; pass cascade to destroy the subtree")]
    HasChildren(NodeId),

    /// Unresolved node id.
    #[error("node not found: {0}")]
    NotFound(NodeId),

    /// Label validation failed.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Arena-backed taxonomy store.
///
/// One store holds any number of independent vocabularies, distinguished
/// by [`FieldId`]. All reads ordered "by full name" use ascending
/// lexicographic order of the denormalized `full_name`.
#[derive(Debug, Default)]
pub struct TaxonomyStore {
    nodes: HashMap<NodeId, TaxonomyNode>,
    tree: TreeIndex,
    roots: HashMap<FieldId, BTreeSet<NodeId>>,
    associations: HashMap<NodeId, BTreeSet<ItemId>>,
    fields_needing_recount: BTreeSet<FieldId>,
    next_id: u64,
}

impl TaxonomyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes across all fields.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Fields that currently have at least one node.
    pub fn fields(&self) -> Vec<FieldId> {
        let mut fields: BTreeSet<FieldId> = self.nodes.values().map(|n| n.field_id).collect();
        // Roots of empty fields have been destroyed with their subtrees, so
        // the node scan is authoritative.
        fields.extend(self.fields_needing_recount.iter().copied());
        fields.into_iter().collect()
    }

    /// Look up a node by id.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` for an unresolved id; read paths treat this
    /// as recoverable.
    pub fn node(&self, id: NodeId) -> Result<&TaxonomyNode, StoreError> {
        self.nodes.get(&id).ok_or(StoreError::NotFound(id))
    }

    /// Create a node under the given parent (`None` = new root).
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the parent does not exist
    /// - `StoreError::InvalidParent` if the parent is in another field
    /// - `StoreError::DuplicateName` on a case-insensitive sibling collision
    pub fn create_node(
        &mut self,
        field: FieldId,
        parent: Option<NodeId>,
        name: SegmentName,
        qualifier: Option<QualifierId>,
    ) -> Result<NodeId, StoreError> {
        if let Some(parent_id) = parent {
            let parent_node = self.node(parent_id)?;
            if parent_node.field_id != field {
                return Err(StoreError::InvalidParent {
                    parent: parent_id,
                    reason: "parent belongs to a different field",
                });
            }
        }
        self.check_sibling_name(field, parent, &name, None)?;

        let id = NodeId(self.next_id);
        self.next_id += 1;

        let parent_node = parent.map(|p| &self.nodes[&p]);
        let node = TaxonomyNode::new(id, field, parent_node, name, qualifier);
        debug!(node = %id, field = %field, full_name = %node.full_name, "create node");
        self.nodes.insert(id, node);

        match parent {
            Some(p) => self.tree.attach(id, p),
            None => {
                self.roots.entry(field).or_default().insert(id);
            }
        }

        Ok(id)
    }

    /// Children of a parent (or roots for `None`), ordered by full name.
    ///
    /// An unresolved or foreign-field parent yields an empty list; browse
    /// rendering must degrade, not abort.
    pub fn children(&self, field: FieldId, parent: Option<NodeId>) -> Vec<&TaxonomyNode> {
        let ids: Vec<NodeId> = match parent {
            Some(p) => match self.nodes.get(&p) {
                Some(node) if node.field_id == field => self.tree.children(p).collect(),
                _ => return Vec::new(),
            },
            None => self
                .roots
                .get(&field)
                .into_iter()
                .flatten()
                .copied()
                .collect(),
        };

        let mut result: Vec<&TaxonomyNode> = ids.iter().map(|id| &self.nodes[id]).collect();
        result.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        result
    }

    /// Root nodes of a field, ordered by full name.
    pub fn root_nodes(&self, field: FieldId) -> Vec<&TaxonomyNode> {
        self.children(field, None)
    }

    /// Rename a node, keeping the whole subtree's paths consistent.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` for an unresolved id
    /// - `StoreError::DuplicateName` if a sibling (other than the node
    ///   itself) already carries the label
    pub fn rename(&mut self, id: NodeId, new_name: SegmentName) -> Result<(), StoreError> {
        let (field, parent) = {
            let node = self.node(id)?;
            (node.field_id, node.parent_id)
        };
        self.check_sibling_name(field, parent, &new_name, Some(id))?;

        let node = self.nodes.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        node.segment_name = new_name;
        node.touch();
        debug!(node = %id, "rename node");

        maintain::fullname::refresh_subtree(self, id)?;
        Ok(())
    }

    /// Move a node (and its subtree) under a new parent (`None` = to root).
    ///
    /// Ancestor aggregate counts are moved with the subtree so the count
    /// invariant holds across the mutation.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` for an unresolved node or parent id
    /// - `StoreError::InvalidParent` if the target is the node itself, one
    ///   of its descendants, or a node in another field
    /// - `StoreError::DuplicateName` on a sibling collision at the target
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), StoreError> {
        let (field, old_parent, name, contribution) = {
            let node = self.node(id)?;
            (
                node.field_id,
                node.parent_id,
                node.segment_name.clone(),
                node.full_resource_count,
            )
        };

        if old_parent == new_parent {
            return Ok(());
        }

        if let Some(parent_id) = new_parent {
            let parent_node = self.node(parent_id)?;
            if parent_node.field_id != field {
                return Err(StoreError::InvalidParent {
                    parent: parent_id,
                    reason: "parent belongs to a different field",
                });
            }
            if self.tree.is_self_or_descendant(id, parent_id) {
                return Err(StoreError::InvalidParent {
                    parent: parent_id,
                    reason: "parent is the node itself or one of its descendants",
                });
            }
        }
        self.check_sibling_name(field, new_parent, &name, Some(id))?;

        // Move the subtree's aggregate contribution between ancestor chains.
        for ancestor in self.tree.ancestors(id) {
            self.adjust_full_count(ancestor, -(contribution as i64));
        }

        match old_parent {
            Some(_) => self.tree.detach(id),
            None => {
                if let Some(roots) = self.roots.get_mut(&field) {
                    roots.remove(&id);
                }
            }
        }
        match new_parent {
            Some(p) => self.tree.attach(id, p),
            None => {
                self.roots.entry(field).or_default().insert(id);
            }
        }

        for ancestor in self.tree.ancestors(id) {
            self.adjust_full_count(ancestor, contribution as i64);
        }

        let node = self.nodes.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        node.parent_id = new_parent;
        node.touch();
        debug!(node = %id, parent = ?new_parent, "reparent node");

        maintain::fullname::refresh_subtree(self, id)?;
        Ok(())
    }

    /// Destroy a node, optionally with its whole subtree.
    ///
    /// Ancestor aggregate counts drop by the destroyed subtree's
    /// contribution; associations of destroyed nodes are dropped.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` for an unresolved id
    /// - `StoreError::HasChildren` if children exist and `cascade` is false
    pub fn destroy(&mut self, id: NodeId, cascade: bool) -> Result<(), StoreError> {
        let (field, contribution) = {
            let node = self.node(id)?;
            (node.field_id, node.full_resource_count)
        };

        if self.tree.has_children(id) && !cascade {
            return Err(StoreError::HasChildren(id));
        }

        for ancestor in self.tree.ancestors(id) {
            self.adjust_full_count(ancestor, -(contribution as i64));
        }

        let mut doomed = vec![id];
        doomed.extend(self.tree.descendants(id));
        debug!(node = %id, subtree = doomed.len(), cascade, "destroy node");

        for victim in doomed {
            self.nodes.remove(&victim);
            self.associations.remove(&victim);
            self.tree.remove(victim);
        }
        if let Some(roots) = self.roots.get_mut(&field) {
            roots.remove(&id);
        }

        Ok(())
    }

    /// Attach an item to a node, updating counts up the ancestor chain.
    ///
    /// Attaching an already-attached item is a no-op.
    pub fn associate_item(&mut self, node: NodeId, item: ItemId) -> Result<(), StoreError> {
        maintain::counts::on_item_associated(self, node, item)
    }

    /// Detach an item from a node, updating counts up the ancestor chain.
    ///
    /// Detaching an item that was never attached clamps instead of
    /// failing: the request succeeds and the field is flagged for repair.
    pub fn dissociate_item(&mut self, node: NodeId, item: ItemId) -> Result<(), StoreError> {
        maintain::counts::on_item_dissociated(self, node, item)
    }

    /// Items directly attached to a node.
    pub fn items(&self, node: NodeId) -> impl Iterator<Item = ItemId> + '_ {
        self.associations.get(&node).into_iter().flatten().copied()
    }

    /// Whether a field has been flagged for a count repair pass.
    pub fn needs_recount(&self, field: FieldId) -> bool {
        self.fields_needing_recount.contains(&field)
    }

    // ---- crate-internal access for maintainers, verify, and snapshots ----

    pub(crate) fn tree(&self) -> &TreeIndex {
        &self.tree
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut TaxonomyNode, StoreError> {
        self.nodes.get_mut(&id).ok_or(StoreError::NotFound(id))
    }

    pub(crate) fn all_nodes(&self) -> impl Iterator<Item = &TaxonomyNode> {
        self.nodes.values()
    }

    pub(crate) fn nodes_in_field(&self, field: FieldId) -> impl Iterator<Item = &TaxonomyNode> {
        self.nodes.values().filter(move |n| n.field_id == field)
    }

    pub(crate) fn association_count(&self, node: NodeId) -> u64 {
        self.associations.get(&node).map_or(0, |s| s.len() as u64)
    }

    pub(crate) fn insert_association(&mut self, node: NodeId, item: ItemId) -> bool {
        self.associations.entry(node).or_default().insert(item)
    }

    pub(crate) fn remove_association(&mut self, node: NodeId, item: ItemId) -> bool {
        self.associations
            .get_mut(&node)
            .is_some_and(|s| s.remove(&item))
    }

    pub(crate) fn flag_for_recount(&mut self, field: FieldId) {
        self.fields_needing_recount.insert(field);
    }

    pub(crate) fn clear_recount_flag(&mut self, field: FieldId) {
        self.fields_needing_recount.remove(&field);
    }

    /// Saturating adjust of a node's aggregate count; flags the field for
    /// repair when a decrement would have gone negative.
    pub(crate) fn adjust_full_count(&mut self, id: NodeId, delta: i64) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let field = node.field_id;
        if delta >= 0 {
            node.full_resource_count += delta as u64;
        } else {
            let dec = (-delta) as u64;
            if node.full_resource_count < dec {
                node.full_resource_count = 0;
                tracing::warn!(node = %id, field = %field, "aggregate count underflow clamped");
                self.flag_for_recount(field);
            } else {
                node.full_resource_count -= dec;
            }
        }
    }

    /// Sibling uniqueness check, case-insensitive, optionally excluding one
    /// node (rename/reparent re-validate excluding self).
    fn check_sibling_name(
        &self,
        field: FieldId,
        parent: Option<NodeId>,
        name: &SegmentName,
        exclude: Option<NodeId>,
    ) -> Result<(), StoreError> {
        let folded = name.folded();
        let sibling_ids: Vec<NodeId> = match parent {
            Some(p) => self.tree.children(p).collect(),
            None => self
                .roots
                .get(&field)
                .into_iter()
                .flatten()
                .copied()
                .collect(),
        };
        for sibling in sibling_ids {
            if Some(sibling) == exclude {
                continue;
            }
            if self.nodes[&sibling].segment_name.folded() == folded {
                return Err(StoreError::DuplicateName {
                    field,
                    name: name.as_str().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Rebuild a store from snapshot parts, restoring the indexes.
    ///
    /// Returns a description of the first structural problem found, so a
    /// corrupt snapshot never produces a half-indexed store.
    pub(crate) fn restore(
        nodes: Vec<TaxonomyNode>,
        associations: BTreeMap<NodeId, BTreeSet<ItemId>>,
        fields_needing_recount: BTreeSet<FieldId>,
        next_id: u64,
    ) -> Result<Self, String> {
        let mut store = TaxonomyStore {
            next_id,
            fields_needing_recount,
            ..Default::default()
        };

        for node in nodes {
            if node.id.0 >= next_id {
                return Err(format!("node id {} not below next_id {}", node.id, next_id));
            }
            if store.nodes.insert(node.id, node).is_some() {
                return Err("duplicate node id in snapshot".to_string());
            }
        }

        let ids: Vec<NodeId> = store.nodes.keys().copied().collect();
        for id in ids {
            let (field, parent) = {
                let node = &store.nodes[&id];
                (node.field_id, node.parent_id)
            };
            match parent {
                Some(p) => {
                    match store.nodes.get(&p) {
                        Some(parent_node) if parent_node.field_id == field => {}
                        Some(_) => {
                            return Err(format!("node {} crosses fields to parent {}", id, p))
                        }
                        None => return Err(format!("node {} references missing parent {}", id, p)),
                    }
                    store.tree.attach(id, p);
                }
                None => {
                    store.roots.entry(field).or_default().insert(id);
                }
            }
        }

        if let Some(node) = store.tree.find_cycle() {
            return Err(format!("cycle through node {}", node));
        }

        for (node, items) in associations {
            if !store.nodes.contains_key(&node) {
                return Err(format!("association references missing node {}", node));
            }
            store.associations.insert(node, items);
        }

        Ok(store)
    }

    pub(crate) fn to_parts(
        &self,
    ) -> (
        Vec<TaxonomyNode>,
        BTreeMap<NodeId, BTreeSet<ItemId>>,
        BTreeSet<FieldId>,
        u64,
    ) {
        let mut nodes: Vec<TaxonomyNode> = self.nodes.values().cloned().collect();
        nodes.sort_by_key(|n| n.id);
        let associations: BTreeMap<NodeId, BTreeSet<ItemId>> = self
            .associations
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(id, items)| (*id, items.clone()))
            .collect();
        (
            nodes,
            associations,
            self.fields_needing_recount.clone(),
            self.next_id,
        )
    }
}
