//! # Core Models Module
//!
//! Data structures describing molecular structures: atoms, residues, chains and
//! the [`system::MolecularSystem`] that owns them.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom name, element, role and coordinates
//! - [`family`] - Residue type tags (amino acids, nucleotides, ligands)
//! - [`residue`] - Residues with their family and declared exchange families
//! - [`chain`] - Chain organization and metadata
//! - [`system`] - Complete structure plus the [`system::ResidueKey`] identity tuple
//! - [`ids`] - Slot-map handles for atoms, residues and chains
//!
//! ## Usage
//!
//! ```ignore
//! use motifscan::core::models::{atom::Atom, chain::ChainType, system::MolecularSystem};
//!
//! let mut system = MolecularSystem::new("1abc");
//! let chain_id = system.add_chain('A', ChainType::Protein);
//! let residue_id = system.add_residue(chain_id, 57, "HIS").unwrap();
//! system.add_atom_to_residue(
//!     residue_id,
//!     Atom::with_inferred_role("CA", residue_id, Point3::new(0.0, 0.0, 0.0)),
//! );
//! ```

pub mod atom;
pub mod chain;
pub mod family;
pub mod ids;
pub mod residue;
pub mod system;
