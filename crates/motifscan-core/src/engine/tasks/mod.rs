//! Per-target computational steps of a motif search.
//!
//! Each submodule implements one stage of the pipeline run on a reduced target:
//! environment composition around every residue, enumeration of candidate residue
//! sets, and enumeration of the type-valid alignments of a candidate onto the motif.

pub mod alignments;
pub mod candidates;
pub mod environment;
