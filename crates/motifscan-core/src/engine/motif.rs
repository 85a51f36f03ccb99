use super::config::ConfigError;
use crate::core::models::family::{AminoAcidType, ResidueFamily};
use crate::core::models::ids::ResidueId;
use crate::core::models::residue::Residue;
use crate::core::models::system::{MolecularSystem, ResidueKey};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueSpecifier {
    pub chain_id: char,
    pub residue_number: isize,
}

impl fmt::Display for ResidueSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chain_id, self.residue_number)
    }
}

/// Sets of residue families that may substitute for one another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeGroups {
    groups: Vec<BTreeSet<ResidueFamily>>,
}

impl ExchangeGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group<I>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = ResidueFamily>,
    {
        let group: BTreeSet<_> = families.into_iter().collect();
        if group.len() > 1 {
            self.groups.push(group);
        }
        self
    }

    /// Groups of amino acids sharing a functional side-chain chemistry.
    pub fn functional() -> Self {
        use AminoAcidType::*;
        fn group(members: &[AminoAcidType]) -> Vec<ResidueFamily> {
            members.iter().copied().map(ResidueFamily::from).collect()
        }
        Self::new()
            .with_group(group(&[AsparticAcid, GlutamicAcid]))
            .with_group(group(&[Asparagine, Glutamine]))
            .with_group(group(&[Lysine, Arginine]))
            .with_group(group(&[Serine, Threonine]))
            .with_group(group(&[Phenylalanine, Tyrosine, Tryptophan]))
            .with_group(group(&[Isoleucine, Leucine, Valine]))
    }

    /// Every family sharing a group with `family`, excluding `family` itself.
    pub fn partners(&self, family: &ResidueFamily) -> BTreeSet<ResidueFamily> {
        self.groups
            .iter()
            .filter(|group| group.contains(family))
            .flat_map(|group| group.iter().cloned())
            .filter(|member| member != family)
            .collect()
    }

    pub fn groups(&self) -> &[BTreeSet<ResidueFamily>] {
        &self.groups
    }
}

/// An ordered list of residues to look for, each with the families it accepts.
///
/// The motif owns a private copy of its residues, so editing exchanges never
/// touches the structure it was taken from.
#[derive(Debug, Clone)]
pub struct QueryMotif {
    system: MolecularSystem,
    positions: Vec<ResidueId>,
}

impl QueryMotif {
    /// Uses every residue of `source`, in structure order.
    pub fn from_system(source: &MolecularSystem) -> Result<Self, ConfigError> {
        Self::from_residue_ids(source, &source.ordered_residue_ids())
    }

    /// Uses the listed residues of `source`, in the given order.
    pub fn from_residues(
        source: &MolecularSystem,
        specifiers: &[ResidueSpecifier],
    ) -> Result<Self, ConfigError> {
        let residue_ids = specifiers
            .iter()
            .map(|specifier| {
                source
                    .find_chain_by_id(specifier.chain_id)
                    .and_then(|chain_id| source.find_residue_by_id(chain_id, specifier.residue_number))
                    .ok_or_else(|| ConfigError::ResidueNotFound(specifier.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_residue_ids(source, &residue_ids)
    }

    fn from_residue_ids(
        source: &MolecularSystem,
        residue_ids: &[ResidueId],
    ) -> Result<Self, ConfigError> {
        let (system, id_map) = source.extract_residues(residue_ids);
        let mut positions = Vec::with_capacity(residue_ids.len());
        for id in residue_ids {
            if let Some(&copied) = id_map.get(id) {
                if !positions.contains(&copied) {
                    positions.push(copied);
                }
            }
        }
        if positions.is_empty() {
            return Err(ConfigError::EmptyMotif);
        }
        Ok(Self { system, positions })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The motif's private structure, holding exactly its residues.
    pub fn system(&self) -> &MolecularSystem {
        &self.system
    }

    /// Residue handles into [`QueryMotif::system`], in position order.
    pub fn residue_ids(&self) -> &[ResidueId] {
        &self.positions
    }

    pub fn residue(&self, position: usize) -> Option<&Residue> {
        self.positions
            .get(position)
            .and_then(|&id| self.system.residue(id))
    }

    pub fn residue_key(&self, position: usize) -> Option<ResidueKey> {
        self.positions
            .get(position)
            .and_then(|&id| self.system.residue_key(id))
    }

    pub fn allowed_families(&self, position: usize) -> Option<BTreeSet<ResidueFamily>> {
        self.residue(position).map(Residue::allowed_families)
    }

    /// Allowed families of every position, in position order.
    pub fn allowed_family_sets(&self) -> Vec<BTreeSet<ResidueFamily>> {
        self.positions
            .iter()
            .filter_map(|&id| self.system.residue(id))
            .map(Residue::allowed_families)
            .collect()
    }

    /// Union of the allowed families of all positions.
    pub fn family_universe(&self) -> BTreeSet<ResidueFamily> {
        self.allowed_family_sets().into_iter().flatten().collect()
    }

    pub fn add_exchange(
        &mut self,
        position: usize,
        family: ResidueFamily,
    ) -> Result<(), ConfigError> {
        let size = self.len();
        let residue = self
            .positions
            .get(position)
            .and_then(|&id| self.system.residue_mut(id))
            .ok_or(ConfigError::UnknownPosition { position, size })?;
        residue.add_exchange(family);
        Ok(())
    }

    pub fn add_exchange_to_all(&mut self, family: ResidueFamily) {
        for &id in &self.positions {
            if let Some(residue) = self.system.residue_mut(id) {
                residue.add_exchange(family.clone());
            }
        }
    }

    /// Adds, for every position, the group partners of its own family.
    pub fn apply_exchange_groups(&mut self, groups: &ExchangeGroups) {
        for &id in &self.positions {
            if let Some(residue) = self.system.residue_mut(id) {
                for partner in groups.partners(&residue.family) {
                    residue.add_exchange(partner);
                }
            }
        }
    }
}
