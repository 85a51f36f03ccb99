use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of an atom inside one `MolecularSystem`.
    pub struct AtomId;
    /// Stable handle of a residue inside one `MolecularSystem`.
    pub struct ResidueId;
    /// Stable handle of a chain inside one `MolecularSystem`.
    pub struct ChainId;
}
