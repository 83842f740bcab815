//! add command - Add a node to a vocabulary

use anyhow::{Context as _, Result};

use super::{with_store_mut, Context};
use crate::core::types::{FieldId, NodeId, QualifierId, SegmentName};

/// Add a node under the given parent (or as a root).
pub fn add(
    ctx: &Context,
    field: u32,
    parent: Option<u64>,
    name: &str,
    qualifier: Option<&str>,
) -> Result<()> {
    let segment = SegmentName::new(name).context("Invalid node name")?;
    let qualifier = qualifier
        .map(QualifierId::parse)
        .transpose()
        .context("Invalid qualifier")?;

    with_store_mut(ctx, |store| {
        let id = store.create_node(
            FieldId(field),
            parent.map(NodeId),
            segment,
            qualifier,
        )?;
        let node = store.node(id)?;
        Ok(format!("created node {} ({})", id, node.full_name))
    })
}
