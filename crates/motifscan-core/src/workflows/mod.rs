//! # Workflows Module
//!
//! The public entry points of motifscan. Each workflow validates its inputs
//! eagerly, runs the engine pipeline and returns ranked matches.
//!
//! - **Single-target search** ([`search`]) - One motif against one structure,
//!   returning a [`MatchSet`](crate::engine::matches::MatchSet) or a configuration
//!   or geometry error.
//! - **Batch search** ([`batch`]) - One motif against a stream of structures,
//!   searched by a worker pool; failing targets are skipped and reported, never
//!   fatal to the batch.

pub mod batch;
pub mod search;
