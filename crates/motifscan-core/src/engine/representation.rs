use crate::core::models::atom::{Atom, AtomRole};
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::{centroid, squared_distance};
use crate::core::utils::identifiers::{ALPHA_CARBON_ATOM_NAME, BETA_CARBON_ATOM_NAME};
use nalgebra::Point3;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Residue {residue} has no usable reference point")]
    NoReferencePoint { residue: String },

    #[error("Extent is undefined for {residues} residue(s); at least 2 are required")]
    UndefinedExtent { residues: usize },
}

pub type AtomPredicate = Arc<dyn Fn(&Atom) -> bool + Send + Sync>;
pub type RepresentationFn =
    Arc<dyn Fn(&MolecularSystem, ResidueId) -> Option<Point3<f64>> + Send + Sync>;

/// Selects which atoms of a residue contribute to its reference point.
#[derive(Clone)]
pub enum AtomFilter {
    All,
    Backbone,
    Sidechain,
    AlphaCarbon,
    BetaCarbon,
    HeavyAtoms,
    Names(Vec<String>),
    Custom(AtomPredicate),
}

impl AtomFilter {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Atom) -> bool + Send + Sync + 'static,
    {
        AtomFilter::Custom(Arc::new(predicate))
    }

    pub fn accepts(&self, atom: &Atom) -> bool {
        match self {
            AtomFilter::All => true,
            AtomFilter::Backbone => atom.role == AtomRole::Backbone,
            AtomFilter::Sidechain => atom.role == AtomRole::Sidechain,
            AtomFilter::AlphaCarbon => atom.name.trim() == ALPHA_CARBON_ATOM_NAME,
            AtomFilter::BetaCarbon => atom.name.trim() == BETA_CARBON_ATOM_NAME,
            AtomFilter::HeavyAtoms => atom.is_heavy(),
            AtomFilter::Names(names) => names.iter().any(|name| name == atom.name.trim()),
            AtomFilter::Custom(predicate) => predicate(atom),
        }
    }
}

impl fmt::Debug for AtomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomFilter::All => f.write_str("All"),
            AtomFilter::Backbone => f.write_str("Backbone"),
            AtomFilter::Sidechain => f.write_str("Sidechain"),
            AtomFilter::AlphaCarbon => f.write_str("AlphaCarbon"),
            AtomFilter::BetaCarbon => f.write_str("BetaCarbon"),
            AtomFilter::HeavyAtoms => f.write_str("HeavyAtoms"),
            AtomFilter::Names(names) => f.debug_tuple("Names").field(names).finish(),
            AtomFilter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Reduces a residue to a single representative point.
#[derive(Clone)]
pub enum RepresentationScheme {
    AlphaCarbon,
    /// CB, or CA for residues without one (glycine).
    BetaCarbon,
    /// Centroid of all atoms.
    Centroid,
    /// Centroid of the side-chain atoms, or CA when there are none.
    SideChainCentroid,
    /// The side-chain heavy atom furthest from CA, or CA when there is none.
    LastHeavySideChain,
    Custom(RepresentationFn),
}

impl RepresentationScheme {
    pub fn custom<F>(scheme: F) -> Self
    where
        F: Fn(&MolecularSystem, ResidueId) -> Option<Point3<f64>> + Send + Sync + 'static,
    {
        RepresentationScheme::Custom(Arc::new(scheme))
    }

    pub fn represent(&self, system: &MolecularSystem, residue_id: ResidueId) -> Option<Point3<f64>> {
        let named = |name: &str| {
            system
                .residue_atoms(residue_id)
                .find(|atom| atom.name.trim() == name)
                .map(|atom| atom.position)
        };
        match self {
            RepresentationScheme::AlphaCarbon => named(ALPHA_CARBON_ATOM_NAME),
            RepresentationScheme::BetaCarbon => {
                named(BETA_CARBON_ATOM_NAME).or_else(|| named(ALPHA_CARBON_ATOM_NAME))
            }
            RepresentationScheme::Centroid => {
                centroid(system.residue_atoms(residue_id).map(|atom| &atom.position))
            }
            RepresentationScheme::SideChainCentroid => centroid(
                system
                    .residue_atoms(residue_id)
                    .filter(|atom| atom.role == AtomRole::Sidechain)
                    .map(|atom| &atom.position),
            )
            .or_else(|| named(ALPHA_CARBON_ATOM_NAME)),
            RepresentationScheme::LastHeavySideChain => {
                let alpha = named(ALPHA_CARBON_ATOM_NAME)?;
                let furthest = system
                    .residue_atoms(residue_id)
                    .filter(|atom| atom.role == AtomRole::Sidechain && atom.is_heavy())
                    .map(|atom| atom.position)
                    .max_by(|a, b| {
                        squared_distance(a, &alpha).total_cmp(&squared_distance(b, &alpha))
                    });
                Some(furthest.unwrap_or(alpha))
            }
            RepresentationScheme::Custom(scheme) => scheme(system, residue_id),
        }
    }
}

impl fmt::Debug for RepresentationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RepresentationScheme::AlphaCarbon => "AlphaCarbon",
            RepresentationScheme::BetaCarbon => "BetaCarbon",
            RepresentationScheme::Centroid => "Centroid",
            RepresentationScheme::SideChainCentroid => "SideChainCentroid",
            RepresentationScheme::LastHeavySideChain => "LastHeavySideChain",
            RepresentationScheme::Custom(_) => "Custom(..)",
        })
    }
}

/// How a residue is turned into the single point used for distances and fitting.
///
/// The same selection drives the distance index, the motif extent and the
/// superimposition, so all geometry of one search is measured consistently.
#[derive(Debug, Clone)]
pub enum ReferenceSelection {
    /// Centroid of the atoms accepted by the filter.
    Atoms(AtomFilter),
    Representation(RepresentationScheme),
}

impl Default for ReferenceSelection {
    fn default() -> Self {
        ReferenceSelection::Atoms(AtomFilter::All)
    }
}

impl ReferenceSelection {
    /// Computes the reference point of a residue.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NoReferencePoint`] if the residue is unknown, has no
    /// atom passing the filter, or the scheme cannot place a point for it.
    pub fn reference_point(
        &self,
        system: &MolecularSystem,
        residue_id: ResidueId,
    ) -> Result<Point3<f64>, GeometryError> {
        let point = match self {
            ReferenceSelection::Atoms(filter) => centroid(
                system
                    .residue_atoms(residue_id)
                    .filter(|atom| filter.accepts(atom))
                    .map(|atom| &atom.position),
            ),
            ReferenceSelection::Representation(scheme) => scheme.represent(system, residue_id),
        };
        point.ok_or_else(|| GeometryError::NoReferencePoint {
            residue: system
                .residue_key(residue_id)
                .map(|key| key.to_string())
                .unwrap_or_else(|| format!("{residue_id:?}")),
        })
    }

    /// Computes reference points for a list of residues, in order.
    pub fn reference_points(
        &self,
        system: &MolecularSystem,
        residue_ids: &[ResidueId],
    ) -> Result<Vec<Point3<f64>>, GeometryError> {
        residue_ids
            .iter()
            .map(|&residue_id| self.reference_point(system, residue_id))
            .collect()
    }
}

/// Plain-data names of the built-in atom filters, as used in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomFilterKind {
    All,
    Backbone,
    Sidechain,
    AlphaCarbon,
    BetaCarbon,
    HeavyAtoms,
}

impl From<AtomFilterKind> for AtomFilter {
    fn from(kind: AtomFilterKind) -> Self {
        match kind {
            AtomFilterKind::All => AtomFilter::All,
            AtomFilterKind::Backbone => AtomFilter::Backbone,
            AtomFilterKind::Sidechain => AtomFilter::Sidechain,
            AtomFilterKind::AlphaCarbon => AtomFilter::AlphaCarbon,
            AtomFilterKind::BetaCarbon => AtomFilter::BetaCarbon,
            AtomFilterKind::HeavyAtoms => AtomFilter::HeavyAtoms,
        }
    }
}

/// Plain-data names of the built-in representation schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepresentationKind {
    AlphaCarbon,
    BetaCarbon,
    Centroid,
    SideChainCentroid,
    LastHeavySideChain,
}

impl From<RepresentationKind> for RepresentationScheme {
    fn from(kind: RepresentationKind) -> Self {
        match kind {
            RepresentationKind::AlphaCarbon => RepresentationScheme::AlphaCarbon,
            RepresentationKind::BetaCarbon => RepresentationScheme::BetaCarbon,
            RepresentationKind::Centroid => RepresentationScheme::Centroid,
            RepresentationKind::SideChainCentroid => RepresentationScheme::SideChainCentroid,
            RepresentationKind::LastHeavySideChain => RepresentationScheme::LastHeavySideChain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chain::ChainType;

    struct Fixture {
        system: MolecularSystem,
        lys: ResidueId,
        gly: ResidueId,
        empty: ResidueId,
    }

    fn fixture() -> Fixture {
        let mut system = MolecularSystem::new("fx");
        let chain = system.add_chain('A', ChainType::Protein);

        let lys = system.add_residue(chain, 1, "LYS").unwrap();
        for (name, pos) in [
            ("N", [0.0, 1.0, 0.0]),
            ("CA", [0.0, 0.0, 0.0]),
            ("C", [1.0, 0.0, 0.0]),
            ("CB", [0.0, 0.0, 1.5]),
            ("CG", [0.0, 0.0, 3.0]),
            ("NZ", [0.0, 0.0, 6.0]),
            ("HZ1", [0.0, 0.0, 7.0]),
        ] {
            system.add_atom_to_residue(lys, Atom::with_inferred_role(name, lys, Point3::from(pos)));
        }

        let gly = system.add_residue(chain, 2, "GLY").unwrap();
        for (name, pos) in [("N", [4.0, 1.0, 0.0]), ("CA", [4.0, 0.0, 0.0])] {
            system.add_atom_to_residue(gly, Atom::with_inferred_role(name, gly, Point3::from(pos)));
        }

        let empty = system.add_residue(chain, 3, "ALA").unwrap();

        Fixture {
            system,
            lys,
            gly,
            empty,
        }
    }

    #[test]
    fn atom_filters_select_expected_atoms() {
        let fx = fixture();
        let backbone = ReferenceSelection::Atoms(AtomFilter::Backbone);
        let point = backbone.reference_point(&fx.system, fx.lys).unwrap();
        assert!((point - Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0)).norm() < 1e-12);

        let names = ReferenceSelection::Atoms(AtomFilter::Names(vec!["CB".into(), "CG".into()]));
        let point = names.reference_point(&fx.system, fx.lys).unwrap();
        assert!((point - Point3::new(0.0, 0.0, 2.25)).norm() < 1e-12);
    }

    #[test]
    fn custom_atom_filter_is_applied() {
        let fx = fixture();
        let filter = AtomFilter::custom(|atom| atom.element == "N");
        let selection = ReferenceSelection::Atoms(filter);
        let point = selection.reference_point(&fx.system, fx.lys).unwrap();
        assert!((point - Point3::new(0.0, 0.5, 3.0)).norm() < 1e-12);
    }

    #[test]
    fn beta_carbon_falls_back_to_alpha_carbon_for_glycine() {
        let fx = fixture();
        let scheme = RepresentationScheme::BetaCarbon;
        assert_eq!(
            scheme.represent(&fx.system, fx.gly),
            Some(Point3::new(4.0, 0.0, 0.0))
        );
        assert_eq!(
            scheme.represent(&fx.system, fx.lys),
            Some(Point3::new(0.0, 0.0, 1.5))
        );
    }

    #[test]
    fn last_heavy_side_chain_ignores_hydrogens() {
        let fx = fixture();
        let scheme = RepresentationScheme::LastHeavySideChain;
        assert_eq!(
            scheme.represent(&fx.system, fx.lys),
            Some(Point3::new(0.0, 0.0, 6.0))
        );
        assert_eq!(
            scheme.represent(&fx.system, fx.gly),
            Some(Point3::new(4.0, 0.0, 0.0))
        );
    }

    #[test]
    fn side_chain_centroid_falls_back_to_alpha_carbon() {
        let fx = fixture();
        let scheme = RepresentationScheme::SideChainCentroid;
        assert_eq!(
            scheme.represent(&fx.system, fx.gly),
            Some(Point3::new(4.0, 0.0, 0.0))
        );
    }

    #[test]
    fn residue_without_atoms_is_a_geometry_error() {
        let fx = fixture();
        let err = ReferenceSelection::default()
            .reference_point(&fx.system, fx.empty)
            .unwrap_err();
        assert_eq!(
            err,
            GeometryError::NoReferencePoint {
                residue: "fx:1:A:3".to_string()
            }
        );
    }

    #[test]
    fn custom_scheme_is_called_per_residue() {
        let fx = fixture();
        let scheme = RepresentationScheme::custom(|system, id| {
            system
                .residue(id)
                .map(|r| Point3::new(r.residue_number as f64, 0.0, 0.0))
        });
        let selection = ReferenceSelection::Representation(scheme);
        let points = selection
            .reference_points(&fx.system, &[fx.gly, fx.lys])
            .unwrap();
        assert_eq!(points, vec![Point3::new(2.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]);
    }
}
