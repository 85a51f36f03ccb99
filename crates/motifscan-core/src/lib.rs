//! # motifscan Core Library
//!
//! Structural motif search: find every occurrence of a small, ordered set of
//! residues (a query motif) in target structures, ranked by the RMSD of the
//! optimal rigid superimposition.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Structural data models (`MolecularSystem`,
//!   residue families), geometry helpers and the structure-source abstraction.
//!
//! - **[`engine`]: The Logic Core.** Reference-point selection, distance
//!   matrices, environment pruning, candidate and alignment enumeration,
//!   Kabsch superimposition and match collection.
//!
//! - **[`workflows`]: The Public API.** Single-target and batch searches that tie
//!   `engine` and `core` together behind a validated configuration.

pub mod core;
pub mod engine;
pub mod workflows;
