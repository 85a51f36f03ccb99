use super::ids::ResidueId;
use crate::core::utils::identifiers::{element_from_atom_name, is_backbone_atom};
use nalgebra::Point3;

/// Represents the role or classification of an atom within a residue.
///
/// Atom filters and representation schemes use the role to tell backbone from
/// side-chain atoms without re-parsing atom names on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomRole {
    /// Backbone atom of an amino acid (e.g., N, CA, C, O).
    Backbone,
    /// Sidechain atom, part of the side groups attached to the backbone.
    Sidechain,
    /// Ligand atom, associated with small molecules bound to the structure.
    Ligand,
    /// Water molecule atom.
    Water,
    /// Unknown or unclassified atom role.
    #[default]
    Other,
}

/// An atom of a residue: its name, chemical element and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N", "OD1").
    pub name: String,
    /// The element symbol (e.g., "C", "N", "O").
    pub element: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The role or classification of the atom in the molecular structure.
    pub role: AtomRole,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` with an element guessed from its name and the default role.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: element_from_atom_name(name).to_string(),
            residue_id,
            role: AtomRole::default(),
            position,
        }
    }

    /// Creates a polymer atom whose role is derived from its name.
    ///
    /// Names from the standard backbone set become [`AtomRole::Backbone`], every
    /// other name becomes [`AtomRole::Sidechain`].
    pub fn with_inferred_role(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        let mut atom = Self::new(name, residue_id, position);
        atom.role = if is_backbone_atom(name) {
            AtomRole::Backbone
        } else {
            AtomRole::Sidechain
        };
        atom
    }

    /// Returns `true` for any atom that is not a hydrogen (or deuterium).
    pub fn is_heavy(&self) -> bool {
        !matches!(self.element.as_str(), "H" | "D")
    }
}
