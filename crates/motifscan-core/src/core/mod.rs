//! # Core Module
//!
//! The stateless foundation of the library: the structural model that searches
//! operate on, small geometry helpers, and the structure-source interface through
//! which batch searches obtain their targets.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains and systems
//! - **Structure Sources** ([`io`]) - The provider interface for target structures
//! - **Utilities** ([`utils`]) - Geometry and atom-name helpers

pub mod io;
pub mod models;
pub mod utils;
