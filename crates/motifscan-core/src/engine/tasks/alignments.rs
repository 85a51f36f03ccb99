use super::candidates::Candidate;
use crate::core::models::family::ResidueFamily;
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use std::collections::BTreeSet;

/// A type-valid assignment of candidate residues to motif positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// `assignment[position]` is the residue filling that position.
    pub assignment: Vec<ResidueId>,
}

/// Enumerates every bijection from motif positions to the candidate's residues in
/// which each residue's family is accepted by its position.
///
/// Positions are filled in order and residues tried in candidate order, so the
/// output order is deterministic.
pub fn enumerate_alignments(
    allowed: &[BTreeSet<ResidueFamily>],
    candidate: &Candidate,
    target: &MolecularSystem,
) -> Vec<Alignment> {
    let residues = candidate.residues();
    if residues.len() != allowed.len() {
        return Vec::new();
    }
    let compatible: Vec<Vec<usize>> = allowed
        .iter()
        .map(|accepted| {
            residues
                .iter()
                .enumerate()
                .filter(|&(_, &id)| {
                    target
                        .residue(id)
                        .is_some_and(|residue| accepted.contains(&residue.family))
                })
                .map(|(r, _)| r)
                .collect()
        })
        .collect();

    let mut search = AlignmentSearch {
        residues,
        compatible: &compatible,
        used: vec![false; residues.len()],
        current: Vec::with_capacity(residues.len()),
        found: Vec::new(),
    };
    search.extend();
    search.found
}

struct AlignmentSearch<'a> {
    residues: &'a [ResidueId],
    compatible: &'a [Vec<usize>],
    used: Vec<bool>,
    current: Vec<usize>,
    found: Vec<Alignment>,
}

impl AlignmentSearch<'_> {
    fn extend(&mut self) {
        let position = self.current.len();
        if position == self.compatible.len() {
            self.found.push(Alignment {
                assignment: self.current.iter().map(|&r| self.residues[r]).collect(),
            });
            return;
        }
        for &r in &self.compatible[position] {
            if self.used[r] {
                continue;
            }
            self.used[r] = true;
            self.current.push(r);
            self.extend();
            self.current.pop();
            self.used[r] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chain::ChainType;
    use crate::core::models::family::AminoAcidType;
    use crate::engine::tasks::candidates::CandidateGenerator;
    use crate::engine::tasks::environment::Environment;

    fn setup(
        names: &[&str],
        positions: &[&[AminoAcidType]],
    ) -> (MolecularSystem, Vec<ResidueId>, Vec<BTreeSet<ResidueFamily>>) {
        let mut system = MolecularSystem::new("aln");
        let chain = system.add_chain('A', ChainType::Protein);
        let ids: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| system.add_residue(chain, i as isize + 1, name).unwrap())
            .collect();
        let allowed = positions
            .iter()
            .map(|families| families.iter().copied().map(ResidueFamily::from).collect())
            .collect();
        (system, ids, allowed)
    }

    fn single_candidate(
        system: &MolecularSystem,
        ids: &[ResidueId],
        allowed: &[BTreeSet<ResidueFamily>],
    ) -> Candidate {
        let mut generator = CandidateGenerator::new(allowed);
        let mut candidates = generator.generate(
            system,
            &Environment {
                center: ids[0],
                members: ids.to_vec(),
            },
        );
        assert_eq!(candidates.len(), 1);
        candidates.remove(0)
    }

    #[test]
    fn distinct_families_give_a_single_alignment() {
        use AminoAcidType::*;
        let (system, ids, allowed) = setup(&["HIS", "ASP"], &[&[AsparticAcid], &[Histidine]]);
        let candidate = single_candidate(&system, &ids, &allowed);

        let alignments = enumerate_alignments(&allowed, &candidate, &system);

        assert_eq!(
            alignments,
            vec![Alignment {
                assignment: vec![ids[1], ids[0]]
            }]
        );
    }

    #[test]
    fn interchangeable_residues_give_every_permutation() {
        use AminoAcidType::*;
        let (system, ids, allowed) = setup(
            &["SER", "SER", "SER"],
            &[&[Serine], &[Serine], &[Serine]],
        );
        let candidate = single_candidate(&system, &ids, &allowed);

        let alignments = enumerate_alignments(&allowed, &candidate, &system);

        assert_eq!(alignments.len(), 6);
        assert_eq!(alignments[0].assignment, ids);
        assert_eq!(alignments[5].assignment, vec![ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn exchanges_widen_the_alignment_set() {
        use AminoAcidType::*;
        let (system, ids, allowed) = setup(
            &["SER", "THR"],
            &[&[Serine, Threonine], &[Serine, Threonine]],
        );
        let candidate = single_candidate(&system, &ids, &allowed);
        assert_eq!(enumerate_alignments(&allowed, &candidate, &system).len(), 2);
    }
}
