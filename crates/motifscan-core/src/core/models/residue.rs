use super::family::ResidueFamily;
use super::ids::{AtomId, ChainId};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub residue_number: isize,        // Residue sequence number from source file
    pub insertion_code: Option<char>, // Optional PDB insertion code
    pub name: String,                 // Name of the residue (e.g., "ALA", "HEM")
    pub family: ResidueFamily,        // Type tag used for motif matching
    pub chain_id: ChainId,            // ID of the parent chain
    pub(crate) exchanges: BTreeSet<ResidueFamily>, // Families this residue may be exchanged with
    pub(crate) atoms: Vec<AtomId>,    // Atoms belonging to this residue, in insertion order
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its stable ID
}

impl Residue {
    pub(crate) fn new(
        residue_number: isize,
        name: &str,
        family: ResidueFamily,
        chain_id: ChainId,
    ) -> Self {
        Self {
            residue_number,
            insertion_code: None,
            name: name.to_string(),
            family,
            exchanges: BTreeSet::new(),
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_insert(atom_id);
    }

    pub(crate) fn remove_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.retain(|&id| id != atom_id);
        if self.atom_name_map.get(atom_name) == Some(&atom_id) {
            self.atom_name_map.remove(atom_name);
        }
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// Returns the first atom registered under `name`, if any.
    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    /// Families this residue may be substituted with, excluding its own family.
    pub fn exchanges(&self) -> &BTreeSet<ResidueFamily> {
        &self.exchanges
    }

    /// Declares that `family` may stand in for this residue.
    ///
    /// Adding the residue's own family is a no-op.
    pub fn add_exchange(&mut self, family: ResidueFamily) {
        if family != self.family {
            self.exchanges.insert(family);
        }
    }

    /// The residue's own family together with every declared exchange.
    pub fn allowed_families(&self) -> BTreeSet<ResidueFamily> {
        let mut allowed = self.exchanges.clone();
        allowed.insert(self.family.clone());
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::family::AminoAcidType;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    fn dummy_chain_id(n: u64) -> ChainId {
        ChainId::from(KeyData::from_ffi(n))
    }

    fn family(aa: AminoAcidType) -> ResidueFamily {
        ResidueFamily::AminoAcid(aa)
    }

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let chain_id = dummy_chain_id(1);
        let residue = Residue::new(10, "GLY", family(AminoAcidType::Glycine), chain_id);
        assert_eq!(residue.residue_number, 10);
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.chain_id, chain_id);
        assert!(residue.insertion_code.is_none());
        assert!(residue.atoms().is_empty());
        assert!(residue.exchanges().is_empty());
    }

    #[test]
    fn add_atom_keeps_first_atom_for_duplicate_names() {
        let mut residue = Residue::new(5, "ALA", family(AminoAcidType::Alanine), dummy_chain_id(2));
        let first = dummy_atom_id(1);
        let second = dummy_atom_id(2);
        residue.add_atom("CA", first);
        residue.add_atom("CA", second);
        assert_eq!(residue.atoms(), &[first, second]);
        assert_eq!(residue.get_atom_id_by_name("CA"), Some(first));
    }

    #[test]
    fn remove_atom_removes_atom_and_name_mapping() {
        let mut residue = Residue::new(8, "THR", family(AminoAcidType::Threonine), dummy_chain_id(4));
        let atom_id = dummy_atom_id(100);
        residue.add_atom("OG1", atom_id);
        residue.remove_atom("OG1", atom_id);
        assert!(residue.atoms().is_empty());
        assert!(residue.get_atom_id_by_name("OG1").is_none());
    }

    #[test]
    fn allowed_families_include_own_family_and_exchanges() {
        let mut residue = Residue::new(1, "ASP", family(AminoAcidType::AsparticAcid), dummy_chain_id(1));
        residue.add_exchange(family(AminoAcidType::GlutamicAcid));
        residue.add_exchange(family(AminoAcidType::AsparticAcid));

        let allowed = residue.allowed_families();
        assert_eq!(allowed.len(), 2);
        assert!(allowed.contains(&family(AminoAcidType::AsparticAcid)));
        assert!(allowed.contains(&family(AminoAcidType::GlutamicAcid)));
        assert_eq!(residue.exchanges().len(), 1);
    }
}
