use super::environment::Environment;
use crate::core::models::family::ResidueFamily;
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use itertools::Itertools;
use std::collections::{BTreeSet, HashSet};
use tracing::trace;

/// An unordered set of target residues, one per motif position, stored in
/// distance-matrix order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    residues: Vec<ResidueId>,
}

impl Candidate {
    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// `true` if every position can be given a distinct residue whose family it accepts.
///
/// Solved as a bipartite matching between positions and residues with augmenting
/// paths; `families[r]` is the family of residue `r`.
pub fn is_feasible(allowed: &[BTreeSet<ResidueFamily>], families: &[&ResidueFamily]) -> bool {
    if allowed.len() != families.len() {
        return false;
    }
    let compatible: Vec<Vec<usize>> = allowed
        .iter()
        .map(|accepted| {
            families
                .iter()
                .enumerate()
                .filter(|(_, family)| accepted.contains(**family))
                .map(|(r, _)| r)
                .collect()
        })
        .collect();
    if compatible.iter().any(Vec::is_empty) {
        return false;
    }

    let mut owner: Vec<Option<usize>> = vec![None; families.len()];
    (0..allowed.len()).all(|position| {
        let mut visited = vec![false; families.len()];
        augment(position, &compatible, &mut owner, &mut visited)
    })
}

fn augment(
    position: usize,
    compatible: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &residue in &compatible[position] {
        if visited[residue] {
            continue;
        }
        visited[residue] = true;
        let free = match owner[residue] {
            None => true,
            Some(other) => augment(other, compatible, owner, visited),
        };
        if free {
            owner[residue] = Some(position);
            return true;
        }
    }
    false
}

/// Enumerates candidate residue sets from environments, each set at most once.
pub struct CandidateGenerator<'a> {
    allowed: &'a [BTreeSet<ResidueFamily>],
    universe: BTreeSet<ResidueFamily>,
    seen: HashSet<Candidate>,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(allowed: &'a [BTreeSet<ResidueFamily>]) -> Self {
        Self {
            allowed,
            universe: allowed.iter().flatten().cloned().collect(),
            seen: HashSet::new(),
        }
    }

    /// Returns the feasible candidates of `environment` not produced by an earlier call.
    pub fn generate(&mut self, target: &MolecularSystem, environment: &Environment) -> Vec<Candidate> {
        let size = self.allowed.len();
        let usable: Vec<(ResidueId, &ResidueFamily)> = environment
            .members
            .iter()
            .filter_map(|&id| target.residue(id).map(|residue| (id, &residue.family)))
            .filter(|(_, family)| self.universe.contains(*family))
            .collect();
        if usable.len() < size {
            return Vec::new();
        }

        let mut fresh = Vec::new();
        for combination in usable.into_iter().combinations(size) {
            let families: Vec<&ResidueFamily> = combination.iter().map(|(_, f)| *f).collect();
            let candidate = Candidate {
                residues: combination.iter().map(|(id, _)| *id).collect(),
            };
            if self.seen.contains(&candidate) || !is_feasible(self.allowed, &families) {
                continue;
            }
            self.seen.insert(candidate.clone());
            fresh.push(candidate);
        }
        trace!(
            center = ?environment.center,
            candidates = fresh.len(),
            "Generated candidates for environment."
        );
        fresh
    }

    /// Number of distinct candidates produced so far.
    pub fn produced(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chain::ChainType;
    use crate::core::models::family::AminoAcidType::{self, *};

    fn sets(positions: &[&[AminoAcidType]]) -> Vec<BTreeSet<ResidueFamily>> {
        positions
            .iter()
            .map(|families| families.iter().copied().map(ResidueFamily::from).collect())
            .collect()
    }

    fn fam(aa: AminoAcidType) -> ResidueFamily {
        aa.into()
    }

    #[test]
    fn feasibility_requires_a_perfect_assignment() {
        let allowed = sets(&[&[Serine, Threonine], &[Serine]]);
        let (ser, thr) = (fam(Serine), fam(Threonine));

        assert!(is_feasible(&allowed, &[&thr, &ser]));
        assert!(is_feasible(&allowed, &[&ser, &ser]));
        assert!(!is_feasible(&allowed, &[&thr, &thr]));
    }

    #[test]
    fn feasibility_uses_augmenting_paths() {
        // Greedy assignment of position 0 to the first SER would strand position 1.
        let allowed = sets(&[&[Serine, Histidine], &[Serine]]);
        let (ser, his) = (fam(Serine), fam(Histidine));
        assert!(is_feasible(&allowed, &[&ser, &his]));
    }

    #[test]
    fn feasibility_rejects_size_mismatch() {
        let allowed = sets(&[&[Serine]]);
        let ser = fam(Serine);
        assert!(!is_feasible(&allowed, &[&ser, &ser]));
    }

    fn target(names: &[&str]) -> (MolecularSystem, Vec<ResidueId>) {
        let mut system = MolecularSystem::new("cand");
        let chain = system.add_chain('A', ChainType::Protein);
        let ids = names
            .iter()
            .enumerate()
            .map(|(i, name)| system.add_residue(chain, i as isize + 1, name).unwrap())
            .collect();
        (system, ids)
    }

    #[test]
    fn generator_yields_only_feasible_combinations() {
        let allowed = sets(&[&[AsparticAcid], &[Histidine]]);
        let (system, ids) = target(&["ASP", "HIS", "ASP", "SER"]);
        let environment = Environment {
            center: ids[0],
            members: ids.clone(),
        };

        let mut generator = CandidateGenerator::new(&allowed);
        let candidates = generator.generate(&system, &environment);

        let sets: Vec<_> = candidates.iter().map(|c| c.residues().to_vec()).collect();
        assert_eq!(sets, vec![vec![ids[0], ids[1]], vec![ids[1], ids[2]]]);
    }

    #[test]
    fn generator_skips_candidates_seen_in_earlier_environments() {
        let allowed = sets(&[&[Serine], &[Serine]]);
        let (system, ids) = target(&["SER", "SER", "SER"]);
        let mut generator = CandidateGenerator::new(&allowed);

        let first = generator.generate(
            &system,
            &Environment {
                center: ids[0],
                members: vec![ids[0], ids[1]],
            },
        );
        let second = generator.generate(
            &system,
            &Environment {
                center: ids[1],
                members: vec![ids[0], ids[1], ids[2]],
            },
        );

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert!(second.iter().all(|c| c.residues() != [ids[0], ids[1]]));
        assert_eq!(generator.produced(), 3);
    }

    #[test]
    fn environment_smaller_than_motif_yields_nothing() {
        let allowed = sets(&[&[Serine], &[Serine], &[Serine]]);
        let (system, ids) = target(&["SER", "SER", "ALA"]);
        let mut generator = CandidateGenerator::new(&allowed);
        let candidates = generator.generate(
            &system,
            &Environment {
                center: ids[0],
                members: ids,
            },
        );
        assert!(candidates.is_empty());
    }
}
