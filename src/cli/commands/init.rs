//! init command - Create an empty snapshot file

use anyhow::{bail, Context as _, Result};

use super::Context;
use crate::store::{SnapshotFile, TaxonomyStore};

/// Create an empty snapshot at the configured path.
pub fn init(ctx: &Context) -> Result<()> {
    let file = SnapshotFile::new(&ctx.file);
    if file.exists() {
        bail!("'{}' already exists", ctx.file.display());
    }

    let _lock = file
        .lock()
        .with_context(|| format!("Failed to lock snapshot '{}'", ctx.file.display()))?;
    file.save(&TaxonomyStore::new())
        .with_context(|| format!("Failed to write '{}'", ctx.file.display()))?;

    if !ctx.quiet {
        println!("initialized empty vocabulary store at '{}'", ctx.file.display());
    }
    Ok(())
}
