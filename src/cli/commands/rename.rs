//! rename command - Rename a node

use anyhow::{Context as _, Result};

use super::{with_store_mut, Context};
use crate::core::types::{NodeId, SegmentName};

/// Rename a node; descendant paths are recomputed with it.
pub fn rename(ctx: &Context, node: u64, name: &str) -> Result<()> {
    let segment = SegmentName::new(name).context("Invalid node name")?;

    with_store_mut(ctx, |store| {
        let id = NodeId(node);
        store.rename(id, segment)?;
        let renamed = store.node(id)?;
        Ok(format!("renamed node {} to '{}'", id, renamed.full_name))
    })
}
