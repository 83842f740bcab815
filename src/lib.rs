//! Vocabtree - hierarchical controlled-vocabulary taxonomies with
//! alphabetic browse partitioning.
//!
//! Vocabtree manages the n-ary classification trees behind "Browse by
//! Category" pages: nodes with denormalized path and aggregate-count
//! columns, the maintainers that keep those columns correct under
//! mutation, and the partitioning algorithm that splits a large sorted
//! sibling set into bounded, boundary-labeled browse pages.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the library)
//! - [`browse`] - Partitioning, range queries, and the partition cache
//! - [`maintain`] - Full-name/depth and count maintenance passes
//! - [`store`] - The node arena, associations, and snapshot persistence
//! - [`verify`] - Deterministic invariant verification
//! - [`core`] - Strong types, the tree index, and configuration
//!
//! # Correctness Invariants
//!
//! 1. Every mutation validates before touching state; an error implies no
//!    state change
//! 2. Denormalized paths and counts are propagated inside the triggering
//!    mutation, never deferred
//! 3. Count underflow never fails a request; it clamps, logs, and flags
//!    the field for an idempotent repair pass

pub mod browse;
pub mod cli;
pub mod core;
pub mod maintain;
pub mod store;
pub mod verify;
