//! attach/detach commands - Item association changes

use anyhow::Result;

use super::{with_store_mut, Context};
use crate::core::types::{ItemId, NodeId};

/// Attach an item to a node.
pub fn attach(ctx: &Context, node: u64, item: u64) -> Result<()> {
    with_store_mut(ctx, |store| {
        store.associate_item(NodeId(node), ItemId(item))?;
        Ok(format!("attached item {} to node {}", item, node))
    })
}

/// Detach an item from a node.
pub fn detach(ctx: &Context, node: u64, item: u64) -> Result<()> {
    with_store_mut(ctx, |store| {
        let id = NodeId(node);
        store.dissociate_item(id, ItemId(item))?;
        let field = store.node(id)?.field_id;
        let suffix = if store.needs_recount(field) {
            "; field flagged for recount"
        } else {
            ""
        };
        Ok(format!("detached item {} from node {}{}", item, node, suffix))
    })
}
