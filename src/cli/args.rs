//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! Available on all commands:
//! - `--file` / `-f`: Snapshot file to operate on (or `$VOCABTREE_FILE`)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Vocabtree - hierarchical vocabularies with alphabetic browse
#[derive(Parser, Debug)]
#[command(name = "vt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Snapshot file holding the vocabulary store
    #[arg(
        short,
        long,
        global = true,
        env = "VOCABTREE_FILE",
        default_value = "vocab.json"
    )]
    pub file: PathBuf,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty snapshot file
    Init,

    /// Add a node to a vocabulary
    Add {
        /// Vocabulary the node belongs to
        #[arg(long)]
        field: u32,

        /// Parent node id; omit to create a root
        #[arg(long)]
        parent: Option<u64>,

        /// Label for the new node
        name: String,

        /// Authority-record UUID to qualify the node
        #[arg(long)]
        qualifier: Option<String>,
    },

    /// Rename a node (descendant paths follow)
    Rename {
        /// Node id
        node: u64,

        /// New label
        name: String,
    },

    /// Move a node and its subtree under a new parent
    Move {
        /// Node id
        node: u64,

        /// New parent node id
        #[arg(long, conflicts_with = "to_root")]
        parent: Option<u64>,

        /// Make the node a root of its vocabulary
        #[arg(long)]
        to_root: bool,
    },

    /// Destroy a node
    Rm {
        /// Node id
        node: u64,

        /// Also destroy the whole subtree
        #[arg(long)]
        cascade: bool,
    },

    /// List children of a node (or a vocabulary's roots)
    Ls {
        /// Vocabulary to list
        #[arg(long)]
        field: u32,

        /// Parent node id; omit to list roots
        #[arg(long)]
        parent: Option<u64>,
    },

    /// Attach an item to a node
    Attach {
        /// Node id
        node: u64,

        /// Item id
        item: u64,
    },

    /// Detach an item from a node
    Detach {
        /// Node id
        node: u64,

        /// Item id
        item: u64,
    },

    /// Show browse partition links, or run a selected range
    Browse {
        /// Vocabulary to browse
        #[arg(long)]
        field: u32,

        /// Parent node id; omit to browse roots
        #[arg(long)]
        parent: Option<u64>,

        /// Override the configured page capacity
        #[arg(long)]
        max_per_page: Option<usize>,

        /// Include zero-count nodes (administrative mode)
        #[arg(long)]
        show_empty: bool,

        /// Range start label (with --end: run the range query)
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// Range end label
        #[arg(long, requires = "start")]
        end: Option<String>,
    },

    /// Check vocabulary invariants
    Verify {
        /// Restrict to one vocabulary
        #[arg(long)]
        field: Option<u32>,
    },

    /// Repair item counts for a vocabulary
    Recount {
        /// Vocabulary to repair
        #[arg(long)]
        field: u32,
    },

    /// Generate shell completion scripts
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported completion shells.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_add() {
        let cli = Cli::try_parse_from([
            "vt", "add", "--field", "1", "--parent", "3", "Mammals", "-f", "x.json",
        ])
        .unwrap();
        assert_eq!(cli.file, PathBuf::from("x.json"));
        match cli.command {
            Command::Add {
                field,
                parent,
                name,
                qualifier,
            } => {
                assert_eq!(field, 1);
                assert_eq!(parent, Some(3));
                assert_eq!(name, "Mammals");
                assert!(qualifier.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn move_rejects_parent_with_to_root() {
        let result =
            Cli::try_parse_from(["vt", "move", "5", "--parent", "1", "--to-root"]);
        assert!(result.is_err());
    }

    #[test]
    fn browse_start_requires_end() {
        let result = Cli::try_parse_from(["vt", "browse", "--field", "1", "--start", "a"]);
        assert!(result.is_err());
    }

    #[test]
    fn verify_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
