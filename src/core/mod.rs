//! core
//!
//! Core domain types and structures for vocabtree.
//!
//! # Modules
//!
//! - [`types`] - Strong types: NodeId, FieldId, SegmentName, etc.
//! - [`tree`] - Parent/child index over the node arena
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Derived values (paths, counts) are maintained eagerly, never lazily
//! - All verification is deterministic

pub mod config;
pub mod tree;
pub mod types;
