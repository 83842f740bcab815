//! cli::commands
//!
//! Command handlers for the `vt` binary.
//!
//! Read-only commands load the snapshot without locking; mutating commands
//! acquire the snapshot lock, load, apply one library operation, and save,
//! so a failed operation never leaves a half-written file behind.

mod add;
mod browse_cmd;
mod completion;
mod init;
mod items;
mod ls;
mod move_cmd;
mod recount;
mod rename;
mod rm;
mod verify_cmd;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::args::Command;
use crate::core::config::Config;
use crate::store::{SnapshotFile, TaxonomyStore};

/// Execution context shared by all command handlers.
pub struct Context {
    /// Snapshot file to operate on
    pub file: PathBuf,
    /// Minimal output
    pub quiet: bool,
    /// Loaded configuration
    pub config: Config,
}

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init => init::init(ctx),
        Command::Add {
            field,
            parent,
            name,
            qualifier,
        } => add::add(ctx, field, parent, &name, qualifier.as_deref()),
        Command::Rename { node, name } => rename::rename(ctx, node, &name),
        Command::Move {
            node,
            parent,
            to_root,
        } => move_cmd::move_node(ctx, node, parent, to_root),
        Command::Rm { node, cascade } => rm::rm(ctx, node, cascade),
        Command::Ls { field, parent } => ls::ls(ctx, field, parent),
        Command::Attach { node, item } => items::attach(ctx, node, item),
        Command::Detach { node, item } => items::detach(ctx, node, item),
        Command::Browse {
            field,
            parent,
            max_per_page,
            show_empty,
            start,
            end,
        } => browse_cmd::browse(
            ctx,
            field,
            parent,
            max_per_page,
            show_empty,
            start.as_deref(),
            end.as_deref(),
        ),
        Command::Verify { field } => verify_cmd::verify(ctx, field),
        Command::Recount { field } => recount::recount(ctx, field),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load the snapshot for a read-only command.
pub(crate) fn load_store(ctx: &Context) -> Result<TaxonomyStore> {
    SnapshotFile::new(&ctx.file)
        .load()
        .with_context(|| format!("Failed to load snapshot '{}'", ctx.file.display()))
}

/// Run one mutation under the snapshot lock and save the result.
///
/// The closure returns the success message to print (suppressed by
/// `--quiet`). Any error aborts before the save, leaving the file as it
/// was.
pub(crate) fn with_store_mut<F>(ctx: &Context, mutate: F) -> Result<()>
where
    F: FnOnce(&mut TaxonomyStore) -> Result<String>,
{
    let file = SnapshotFile::new(&ctx.file);
    let _lock = file
        .lock()
        .with_context(|| format!("Failed to lock snapshot '{}'", ctx.file.display()))?;

    let mut store = file
        .load()
        .with_context(|| format!("Failed to load snapshot '{}'", ctx.file.display()))?;

    let message = mutate(&mut store)?;

    file.save(&store)
        .with_context(|| format!("Failed to save snapshot '{}'", ctx.file.display()))?;

    if !ctx.quiet {
        println!("{}", message);
    }
    Ok(())
}
