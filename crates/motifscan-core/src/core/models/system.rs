use super::atom::{Atom, AtomRole};
use super::chain::{Chain, ChainType};
use super::family::ResidueFamily;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use crate::core::utils::identifiers::ALPHA_CARBON_ATOM_NAME;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::fmt;

/// The identity tuple of a residue: structure, model, chain and sequence position.
///
/// Keys survive copying a system, unlike the slot-map [`ResidueId`] handles which
/// are only meaningful inside the system that issued them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub structure: String,
    pub model: usize,
    pub chain: char,
    pub residue_number: isize,
    pub insertion_code: Option<char>,
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.structure, self.model, self.chain, self.residue_number
        )?;
        if let Some(code) = self.insertion_code {
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}

/// A molecular structure: chains of residues, each owning its atoms.
///
/// Storage follows a slot-map layout so handles stay valid while residues are
/// removed from a working copy. Iteration via [`MolecularSystem::ordered_residue_ids`]
/// is deterministic: chains in insertion order, residues in insertion order
/// within their chain.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Human-readable structure identifier (e.g. a PDB id), used in residue keys.
    label: String,
    /// Model number inside a multi-model source.
    model: usize,
    atoms: SlotMap<AtomId, Atom>,
    residues: SlotMap<ResidueId, Residue>,
    chains: SlotMap<ChainId, Chain>,
    /// Chains in insertion order.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding residues by chain ID, residue number and insertion code.
    residue_id_map: HashMap<(ChainId, isize, Option<char>), ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system with the given label and model 1.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            model: 1,
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: usize) -> Self {
        self.model = model;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn model(&self) -> usize {
        self.model
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn residue_mut(&mut self, id: ResidueId) -> Option<&mut Residue> {
        self.residues.get_mut(id)
    }

    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue ID by its chain ID and residue number (without insertion code).
    pub fn find_residue_by_id(
        &self,
        chain_id: ChainId,
        residue_number: isize,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, residue_number, None))
            .copied()
    }

    /// Returns every residue ID in deterministic structure order.
    pub fn ordered_residue_ids(&self) -> Vec<ResidueId> {
        self.chain_order
            .iter()
            .filter_map(|&chain_id| self.chains.get(chain_id))
            .flat_map(|chain| chain.residues.iter().copied())
            .collect()
    }

    /// Iterates over the atoms of one residue, in insertion order.
    ///
    /// Yields nothing for an unknown residue.
    pub fn residue_atoms(&self, residue_id: ResidueId) -> impl Iterator<Item = &Atom> {
        self.residues
            .get(residue_id)
            .map(|residue| residue.atoms.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&atom_id| self.atoms.get(atom_id))
    }

    /// Returns the identity tuple of a residue.
    pub fn residue_key(&self, residue_id: ResidueId) -> Option<ResidueKey> {
        let residue = self.residues.get(residue_id)?;
        let chain = self.chains.get(residue.chain_id)?;
        Some(ResidueKey {
            structure: self.label.clone(),
            model: self.model,
            chain: chain.id,
            residue_number: residue.residue_number,
            insertion_code: residue.insertion_code,
        })
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given ID already exists,
    /// it returns the existing chain ID without creating a duplicate.
    pub fn add_chain(&mut self, id: char, chain_type: ChainType) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id, chain_type));
        self.chain_order.push(chain_id);
        self.chain_id_map.insert(id, chain_id);
        chain_id
    }

    /// Adds a residue whose family is derived from its name.
    ///
    /// Returns `None` when the chain does not exist.
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        name: &str,
    ) -> Option<ResidueId> {
        self.add_residue_with_family(
            chain_id,
            residue_number,
            None,
            name,
            ResidueFamily::from_residue_name(name),
        )
    }

    /// Adds a new residue to the system or returns the existing one.
    ///
    /// This method is idempotent; if a residue with the same chain, number and
    /// insertion code already exists, its ID is returned unchanged.
    pub fn add_residue_with_family(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
        family: ResidueFamily,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, residue_number, insertion_code);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let mut residue = Residue::new(residue_number, name, family, chain_id);
            residue.insertion_code = insertion_code;
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// The atom's `residue_id` is overwritten with the target residue.
    /// Returns `None` if the residue doesn't exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }
        atom.residue_id = residue_id;
        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.residues.get_mut(residue_id)?.add_atom(&name, atom_id);
        Some(atom_id)
    }

    /// Removes an atom from the system and from its parent residue.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(atom_id)?;
        if let Some(residue) = self.residues.get_mut(atom.residue_id) {
            residue.remove_atom(&atom.name, atom_id);
        }
        Some(atom)
    }

    /// Removes a residue and all its atoms, updating the parent chain and lookup maps.
    pub fn remove_residue(&mut self, residue_id: ResidueId) -> Option<Residue> {
        let residue = self.residues.remove(residue_id)?;

        for &atom_id in &residue.atoms {
            self.atoms.remove(atom_id);
        }

        if let Some(chain) = self.chains.get_mut(residue.chain_id) {
            chain.residues.retain(|&id| id != residue_id);
        }

        self.residue_id_map.remove(&(
            residue.chain_id,
            residue.residue_number,
            residue.insertion_code,
        ));

        Some(residue)
    }

    /// Keeps only the residues for which `keep` returns `true`.
    ///
    /// Returns the number of removed residues.
    pub fn retain_residues<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Residue) -> bool,
    {
        let doomed: Vec<ResidueId> = self
            .residues
            .iter()
            .filter(|(_, residue)| !keep(residue))
            .map(|(id, _)| id)
            .collect();
        for &residue_id in &doomed {
            self.remove_residue(residue_id);
        }
        doomed.len()
    }

    /// Copies the given residues (with their chains and atoms) into a new system.
    ///
    /// Residues keep the order of `residue_ids`; unknown IDs are skipped. The
    /// returned map translates source handles to handles of the new system.
    pub fn extract_residues(
        &self,
        residue_ids: &[ResidueId],
    ) -> (MolecularSystem, HashMap<ResidueId, ResidueId>) {
        let mut extracted = MolecularSystem::new(&self.label).with_model(self.model);
        let mut id_map = HashMap::with_capacity(residue_ids.len());

        for &source_id in residue_ids {
            let Some(residue) = self.residues.get(source_id) else {
                continue;
            };
            let Some(chain) = self.chains.get(residue.chain_id) else {
                continue;
            };
            let chain_id = extracted.add_chain(chain.id, chain.chain_type);
            let Some(new_id) = extracted.add_residue_with_family(
                chain_id,
                residue.residue_number,
                residue.insertion_code,
                &residue.name,
                residue.family.clone(),
            ) else {
                continue;
            };
            if let Some(copy) = extracted.residues.get_mut(new_id) {
                copy.exchanges = residue.exchanges.clone();
            }
            for atom in self.residue_atoms(source_id) {
                extracted.add_atom_to_residue(new_id, atom.clone());
            }
            id_map.insert(source_id, new_id);
        }

        (extracted, id_map)
    }

    /// `true` if every atom of the system is a backbone atom.
    ///
    /// An empty system is not considered backbone-only.
    pub fn is_backbone_only(&self) -> bool {
        !self.atoms.is_empty()
            && self
                .atoms
                .values()
                .all(|atom| atom.role == AtomRole::Backbone)
    }

    /// `true` if every residue carries only an alpha carbon (a CA trace).
    pub fn is_alpha_carbon_only(&self) -> bool {
        !self.atoms.is_empty()
            && self
                .atoms
                .values()
                .all(|atom| atom.name.trim() == ALPHA_CARBON_ATOM_NAME)
    }
}
