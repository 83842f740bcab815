//! maintain::counts
//!
//! Keeps per-node and ancestor aggregate item counts correct.
//!
//! # Invariant
//!
//! `full_resource_count(n) = resource_count(n) + Σ full_resource_count(child)`
//! for every node n.
//!
//! # Clamp policy
//!
//! A decrement that would go negative never fails the triggering request:
//! the count clamps at 0, a warning is logged, and the field is flagged so
//! [`recount`] can repair it out of band.

use std::collections::HashMap;

use tracing::warn;

use crate::core::types::{FieldId, ItemId, NodeId};
use crate::store::{StoreError, TaxonomyStore};

/// Record an item attached to a node.
///
/// Increments the node's own count and the aggregate of the node and every
/// ancestor. Attaching an already-attached item is a no-op.
///
/// # Errors
///
/// `StoreError::NotFound` if the node does not exist.
pub fn on_item_associated(
    store: &mut TaxonomyStore,
    node: NodeId,
    item: ItemId,
) -> Result<(), StoreError> {
    store.node(node)?;

    if !store.insert_association(node, item) {
        return Ok(());
    }

    {
        let entry = store.node_mut(node)?;
        entry.resource_count += 1;
        entry.touch();
    }
    store.adjust_full_count(node, 1);
    for ancestor in store.tree().ancestors(node) {
        store.adjust_full_count(ancestor, 1);
    }
    Ok(())
}

/// Record an item detached from a node.
///
/// Inverse of [`on_item_associated`]. A detach for an item that was never
/// attached, or a count already at zero, clamps and flags the field for
/// repair instead of failing.
///
/// # Errors
///
/// `StoreError::NotFound` if the node does not exist.
pub fn on_item_dissociated(
    store: &mut TaxonomyStore,
    node: NodeId,
    item: ItemId,
) -> Result<(), StoreError> {
    let field = store.node(node)?.field_id;

    if !store.remove_association(node, item) {
        warn!(node = %node, item = %item, "dissociate of unattached item; flagging for recount");
        store.flag_for_recount(field);
        return Ok(());
    }

    let clamped = {
        let entry = store.node_mut(node)?;
        if entry.resource_count == 0 {
            true
        } else {
            entry.resource_count -= 1;
            entry.touch();
            false
        }
    };
    if clamped {
        warn!(node = %node, "resource count underflow clamped");
        // adjust_full_count below does not flag when the aggregates still
        // cover the decrement, so flag here.
        store.flag_for_recount(field);
    }
    store.adjust_full_count(node, -1);
    for ancestor in store.tree().ancestors(node) {
        store.adjust_full_count(ancestor, -1);
    }
    Ok(())
}

/// Full O(n) count repair for one field.
///
/// Recomputes every node's own count directly from the association table,
/// then propagates aggregates bottom-up (children strictly before
/// parents). Idempotent; clears the field's repair flag.
pub fn recount(store: &mut TaxonomyStore, field: FieldId) -> Result<(), StoreError> {
    let ids: Vec<NodeId> = store.nodes_in_field(field).map(|n| n.id).collect();

    let mut own: HashMap<NodeId, u64> = HashMap::with_capacity(ids.len());
    for id in &ids {
        own.insert(*id, store.association_count(*id));
    }

    // Post-order over the structure itself, so stale depth values cannot
    // skew the propagation order.
    let mut full: HashMap<NodeId, u64> = HashMap::with_capacity(ids.len());
    let roots: Vec<NodeId> = store.root_nodes(field).iter().map(|n| n.id).collect();
    for root in roots {
        let mut stack = vec![(root, false)];
        while let Some((current, children_done)) = stack.pop() {
            if children_done {
                let sum: u64 = store.tree().children(current).map(|c| full[&c]).sum();
                full.insert(current, own[&current] + sum);
            } else {
                stack.push((current, true));
                for child in store.tree().children(current) {
                    stack.push((child, false));
                }
            }
        }
    }

    for id in ids {
        let node = store.node_mut(id)?;
        node.resource_count = own[&id];
        node.full_resource_count = full.get(&id).copied().unwrap_or(own[&id]);
    }

    store.clear_recount_flag(field);
    Ok(())
}
