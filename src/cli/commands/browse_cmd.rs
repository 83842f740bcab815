//! browse command - Partition links and range queries

use anyhow::Result;

use super::{load_store, Context};
use crate::browse::{partition_with, sibling_keys, Partition, RangeQuery};
use crate::core::types::{FieldId, NodeId};

/// Browse one sibling set.
///
/// Without `--start`/`--end`, prints the partition links a browse page
/// would offer. With a selected range, runs the range query and prints the
/// matching nodes.
pub fn browse(
    ctx: &Context,
    field: u32,
    parent: Option<u64>,
    max_per_page: Option<usize>,
    show_empty: bool,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    let store = load_store(ctx)?;
    let field = FieldId(field);
    let parent = parent.map(NodeId);
    let include_empty = show_empty || ctx.config.show_empty();

    if let (Some(start), Some(end)) = (start, end) {
        let query = RangeQuery::build(field, parent, Some(start), Some(end), include_empty);
        for node in query.run(&store) {
            println!(
                "{}\t{}\t{}/{}",
                node.id, node.full_name, node.resource_count, node.full_resource_count
            );
        }
        return Ok(());
    }

    let keys = sibling_keys(&store, field, parent);
    let max = max_per_page.unwrap_or_else(|| ctx.config.max_per_page());
    match partition_with(&keys, max, ctx.config.fill_factor()) {
        Partition::SinglePage => {
            println!("single page ({} names)", keys.len());
        }
        Partition::Bins(bins) => {
            for bin in bins {
                println!(
                    "{}\t{} names\t[{} .. {}]",
                    bin.display_label(),
                    bin.len,
                    bin.first_name,
                    bin.last_name
                );
            }
        }
    }
    Ok(())
}
