//! ls command - List children or roots

use anyhow::Result;

use super::{load_store, Context};
use crate::core::types::{FieldId, NodeId};

/// List a node's children, or a vocabulary's roots, ordered by full name.
pub fn ls(ctx: &Context, field: u32, parent: Option<u64>) -> Result<()> {
    let store = load_store(ctx)?;
    let children = store.children(FieldId(field), parent.map(NodeId));

    if children.is_empty() {
        if !ctx.quiet {
            println!("(empty)");
        }
        return Ok(());
    }

    for node in children {
        println!(
            "{}\t{}\t{}/{}",
            node.id, node.full_name, node.resource_count, node.full_resource_count
        );
    }
    Ok(())
}
