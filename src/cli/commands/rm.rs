//! rm command - Destroy a node

use anyhow::Result;

use super::{with_store_mut, Context};
use crate::core::types::NodeId;

/// Destroy a node, optionally cascading over its subtree.
pub fn rm(ctx: &Context, node: u64, cascade: bool) -> Result<()> {
    with_store_mut(ctx, |store| {
        let id = NodeId(node);
        let full_name = store.node(id)?.full_name.clone();
        store.destroy(id, cascade)?;
        Ok(format!("destroyed node {} ('{}')", id, full_name))
    })
}
