//! # Engine Module
//!
//! The search machinery behind motif detection: everything between a parsed
//! structure and a ranked list of matches.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Search parameters, target pre-filters and settings files
//! - **Query Motif** ([`motif`]) - Motif residues and their allowed exchange families
//! - **Geometry** ([`representation`], [`distance`], [`extent`]) - Reference points per
//!   residue, pairwise distance matrices and the motif extent
//! - **Tasks** ([`tasks`]) - Target reduction, environments, candidates and alignments
//! - **Superimposition** ([`superposition`]) - Optimal rigid fitting without reflections
//! - **Results** ([`matches`]) - Matches collected under an RMSD cutoff, ranked by RMSD
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - The engine error type wrapping every failure category

pub mod config;
pub mod context;
pub mod distance;
pub mod error;
pub mod extent;
pub mod matches;
pub mod motif;
pub mod progress;
pub mod representation;
pub mod superposition;
pub mod tasks;
