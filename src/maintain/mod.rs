//! maintain
//!
//! Maintenance passes that keep denormalized node values consistent.
//!
//! # Modules
//!
//! - [`fullname`] - Depth and full-name recomputation after structural edits
//! - [`counts`] - Per-node and ancestor aggregate item counts
//!
//! # Design Principles
//!
//! - Every pass is idempotent: re-running on a consistent tree changes
//!   nothing
//! - Passes are invoked inside the triggering mutation, never deferred,
//!   so readers only observe fully propagated state
//! - `counts::recount` is additionally safe as a standalone repair task

pub mod counts;
pub mod fullname;
