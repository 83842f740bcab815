//! maintain::fullname
//!
//! Keeps `depth` and `full_name` correct after structural edits.
//!
//! After a rename or reparent of node N, N's position is recomputed from
//! its parent and the same formula is applied to every descendant, each
//! from its already-updated parent. The pass is idempotent and costs
//! O(subtree size), so it doubles as a periodic full-tree consistency
//! sweep via [`refresh_field`].

use crate::core::types::{FieldId, NodeId, FULL_NAME_SEPARATOR};
use crate::store::{StoreError, TaxonomyStore};

/// Recompute `full_name`/`depth` for a node and its whole subtree.
///
/// The node's parent is assumed correct; descendants are visited parents
/// before children, so each reads an already-updated parent.
///
/// # Errors
///
/// `StoreError::NotFound` if the node does not exist.
pub fn refresh_subtree(store: &mut TaxonomyStore, id: NodeId) -> Result<(), StoreError> {
    store.node(id)?;

    let mut order = vec![id];
    order.extend(store.tree().descendants(id));

    for current in order {
        let parent_position = match store.tree().parent(current) {
            Some(p) => {
                let parent = store.node(p)?;
                Some((parent.full_name.clone(), parent.depth))
            }
            None => None,
        };

        let node = store.node_mut(current)?;
        match parent_position {
            None => {
                node.full_name = node.segment_name.as_str().to_string();
                node.depth = 0;
            }
            Some((parent_full, parent_depth)) => {
                node.full_name = format!(
                    "{}{}{}",
                    parent_full,
                    FULL_NAME_SEPARATOR,
                    node.segment_name.as_str()
                );
                node.depth = parent_depth + 1;
            }
        }
    }

    Ok(())
}

/// Full-tree consistency pass over one field.
///
/// Safe to run at any time; a consistent field is left byte-identical.
pub fn refresh_field(store: &mut TaxonomyStore, field: FieldId) -> Result<(), StoreError> {
    let roots: Vec<NodeId> = store.root_nodes(field).iter().map(|n| n.id).collect();
    for root in roots {
        refresh_subtree(store, root)?;
    }
    Ok(())
}
