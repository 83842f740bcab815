//! recount command - Repair item counts for a vocabulary

use anyhow::Result;

use super::{with_store_mut, Context};
use crate::core::types::FieldId;
use crate::maintain;

/// Recompute every count in a field from the association table.
pub fn recount(ctx: &Context, field: u32) -> Result<()> {
    with_store_mut(ctx, |store| {
        maintain::counts::recount(store, FieldId(field))?;
        Ok(format!("recounted field {}", field))
    })
}
