//! move command - Reparent a node and its subtree

use anyhow::{bail, Result};

use super::{with_store_mut, Context};
use crate::core::types::NodeId;

/// Move a node under a new parent, or to the root of its vocabulary.
pub fn move_node(ctx: &Context, node: u64, parent: Option<u64>, to_root: bool) -> Result<()> {
    if parent.is_none() && !to_root {
        bail!("pass --parent <id> or --to-root");
    }

    with_store_mut(ctx, |store| {
        let id = NodeId(node);
        store.reparent(id, parent.map(NodeId))?;
        let moved = store.node(id)?;
        Ok(format!("moved node {} to '{}'", id, moved.full_name))
    })
}
