use crate::core::models::family::ResidueFamily;
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use crate::engine::distance::DistanceMatrix;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Removes every residue whose family no motif position accepts.
///
/// Returns the number of removed residues.
#[instrument(skip_all, name = "target_reduction")]
pub fn reduce_target(target: &mut MolecularSystem, families: &BTreeSet<ResidueFamily>) -> usize {
    let removed = target.retain_residues(|residue| families.contains(&residue.family));
    debug!(
        removed,
        remaining = target.residue_count(),
        "Reduced target to motif families."
    );
    removed
}

/// The residues around one center residue, all within the pruning radius of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub center: ResidueId,
    /// Members in distance-matrix order; the center is included.
    pub members: Vec<ResidueId>,
}

impl Environment {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Builds one environment per indexed residue, keeping those with at least `min_size` members.
///
/// A residue belongs to the environment of `center` when its squared distance to
/// the center is at most `radius_squared`.
#[instrument(skip_all, name = "environment_composition", fields(residues = matrix.len()))]
pub fn compose_environments(
    matrix: &DistanceMatrix,
    radius_squared: f64,
    min_size: usize,
) -> Vec<Environment> {
    let environments: Vec<Environment> = (0..matrix.len())
        .filter_map(|i| {
            let members: Vec<ResidueId> = matrix
                .row(i)
                .filter(|&(_, d)| d <= radius_squared)
                .map(|(id, _)| id)
                .collect();
            (members.len() >= min_size).then(|| Environment {
                center: matrix.residue_ids()[i],
                members,
            })
        })
        .collect();
    debug!(
        environments = environments.len(),
        radius_squared, "Composed residue environments."
    );
    environments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::core::models::family::AminoAcidType;
    use nalgebra::Point3;

    fn system(entries: &[(&str, f64)]) -> (MolecularSystem, Vec<ResidueId>) {
        let mut system = MolecularSystem::new("env");
        let chain = system.add_chain('A', ChainType::Protein);
        let ids = entries
            .iter()
            .enumerate()
            .map(|(i, &(name, x))| {
                let id = system.add_residue(chain, i as isize + 1, name).unwrap();
                system.add_atom_to_residue(
                    id,
                    Atom::with_inferred_role("CA", id, Point3::new(x, 0.0, 0.0)),
                );
                id
            })
            .collect();
        (system, ids)
    }

    #[test]
    fn reduction_drops_foreign_families() {
        let (mut target, ids) = system(&[("SER", 0.0), ("HOH", 1.0), ("ALA", 2.0), ("SER", 3.0)]);
        let families = BTreeSet::from([ResidueFamily::from(AminoAcidType::Serine)]);

        let removed = reduce_target(&mut target, &families);

        assert_eq!(removed, 2);
        assert_eq!(target.ordered_residue_ids(), vec![ids[0], ids[3]]);
    }

    #[test]
    fn environments_include_the_center_and_respect_the_radius() {
        let (target, ids) = system(&[("SER", 0.0), ("SER", 2.0), ("SER", 5.0)]);
        let matrix = DistanceMatrix::from_points(
            ids.clone(),
            ids.iter()
                .map(|&id| target.residue_atoms(id).next().unwrap().position)
                .collect(),
        );

        let environments = compose_environments(&matrix, 4.0, 1);

        assert_eq!(environments.len(), 3);
        assert_eq!(environments[0].members, vec![ids[0], ids[1]]);
        assert_eq!(environments[1].members, vec![ids[0], ids[1]]);
        assert_eq!(environments[2].members, vec![ids[2]]);
        assert_eq!(environments[2].center, ids[2]);
    }

    #[test]
    fn small_environments_are_discarded() {
        let (target, ids) = system(&[("SER", 0.0), ("SER", 2.0), ("SER", 5.0)]);
        let points = ids
            .iter()
            .map(|&id| target.residue_atoms(id).next().unwrap().position)
            .collect();
        let matrix = DistanceMatrix::from_points(ids.clone(), points);

        let environments = compose_environments(&matrix, 4.0, 2);

        assert_eq!(environments.len(), 2);
        assert!(environments.iter().all(|env| env.center != ids[2]));
    }
}
