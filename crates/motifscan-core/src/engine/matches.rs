use super::superposition::Superimposition;
use crate::core::models::family::ResidueFamily;
use crate::core::models::system::ResidueKey;
use std::cmp::Ordering;

/// A target residue assigned to one motif position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchedResidue {
    pub position: usize,
    pub key: ResidueKey,
    pub family: ResidueFamily,
}

/// One occurrence of the motif in a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Label of the target structure.
    pub target: String,
    pub rmsd: f64,
    /// Target residues in motif position order.
    pub residues: Vec<MatchedResidue>,
    /// Transformation taking the matched target residues onto the motif.
    pub superimposition: Superimposition,
}

impl Match {
    pub fn residue_keys(&self) -> impl Iterator<Item = &ResidueKey> {
        self.residues.iter().map(|r| &r.key)
    }
}

#[derive(Debug, Clone)]
struct RankedMatch {
    target_index: usize,
    sequence: usize,
    item: Match,
}

impl RankedMatch {
    fn rank(&self, other: &Self) -> Ordering {
        self.item
            .rmsd
            .total_cmp(&other.item.rmsd)
            .then(self.target_index.cmp(&other.target_index))
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// Matches in ascending RMSD order.
///
/// Equal RMSDs keep their order of discovery; matches from different targets are
/// ordered by target index first, so merging per-target sets yields the same
/// order no matter which set arrives first.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    entries: Vec<RankedMatch>,
    next_sequence: usize,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, target_index: usize, item: Match) {
        let entry = RankedMatch {
            target_index,
            sequence: self.next_sequence,
            item,
        };
        self.next_sequence += 1;
        let at = self
            .entries
            .partition_point(|existing| existing.rank(&entry) != Ordering::Greater);
        self.entries.insert(at, entry);
    }

    /// Moves every match of `other` into this set, keeping the ranking.
    pub fn merge(&mut self, other: MatchSet) {
        self.next_sequence = self.next_sequence.max(other.next_sequence);
        self.entries.extend(other.entries);
        self.entries.sort_by(RankedMatch::rank);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.entries.iter().map(|entry| &entry.item)
    }

    /// The match with the lowest RMSD.
    pub fn best(&self) -> Option<&Match> {
        self.entries.first().map(|entry| &entry.item)
    }

    pub fn rmsd_values(&self) -> Vec<f64> {
        self.iter().map(|m| m.rmsd).collect()
    }

    pub fn top(&self, n: usize) -> impl Iterator<Item = &Match> {
        self.iter().take(n)
    }

    pub fn into_vec(self) -> Vec<Match> {
        self.entries.into_iter().map(|entry| entry.item).collect()
    }
}

impl FromIterator<MatchSet> for MatchSet {
    fn from_iter<I: IntoIterator<Item = MatchSet>>(sets: I) -> Self {
        let mut merged = MatchSet::new();
        for set in sets {
            merged.next_sequence = merged.next_sequence.max(set.next_sequence);
            merged.entries.extend(set.entries);
        }
        merged.entries.sort_by(RankedMatch::rank);
        merged
    }
}

impl IntoIterator for MatchSet {
    type Item = Match;
    type IntoIter = std::vec::IntoIter<Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

/// Accepts matches up to an RMSD cutoff into a [`MatchSet`].
#[derive(Debug)]
pub struct MatchCollector {
    cutoff: f64,
    target_index: usize,
    matches: MatchSet,
    rejected: usize,
}

impl MatchCollector {
    pub fn new(cutoff: f64, target_index: usize) -> Self {
        Self {
            cutoff,
            target_index,
            matches: MatchSet::new(),
            rejected: 0,
        }
    }

    /// `true` if a match with this RMSD would be kept.
    pub fn admits(&self, rmsd: f64) -> bool {
        rmsd <= self.cutoff
    }

    /// Keeps `candidate` if its RMSD does not exceed the cutoff; returns whether it was kept.
    pub fn offer(&mut self, candidate: Match) -> bool {
        if self.admits(candidate.rmsd) {
            self.matches.insert(self.target_index, candidate);
            true
        } else {
            self.rejected += 1;
            false
        }
    }

    pub fn accepted(&self) -> usize {
        self.matches.len()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn finish(self) -> MatchSet {
        self.matches
    }
}
