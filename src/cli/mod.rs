//! cli
//!
//! Command-line interface layer for the `vt` maintenance binary.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT mutate the store directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that load a snapshot, call the library, and save. Mutating
//! commands hold the snapshot lock for the whole load-modify-save cycle.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::Config;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load().context("Failed to load configuration")?;

    let ctx = commands::Context {
        file: cli.file.clone(),
        quiet: cli.quiet,
        config,
    };

    commands::dispatch(cli.command, &ctx)
}
