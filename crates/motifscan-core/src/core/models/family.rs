use phf::{Map, phf_map};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcidType {
    // --- Aliphatic, Nonpolar ---
    Alanine,
    Glycine,
    Isoleucine,
    Leucine,
    Proline,
    Valine,

    // --- Aromatic ---
    Phenylalanine,
    Tryptophan,
    Tyrosine,

    // --- Polar, Uncharged ---
    Asparagine,
    Cysteine,
    Glutamine,
    Serine,
    Threonine,
    Methionine,

    // --- Positively Charged (Basic) ---
    Arginine,
    Histidine,
    Lysine,

    // --- Negatively Charged (Acidic) ---
    AsparticAcid,
    GlutamicAcid,

    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NucleotideType {
    Adenosine,
    Cytidine,
    Guanosine,
    Thymidine,
    Uridine,
    Unknown,
}

/// The type tag of a residue, used to decide which query positions it may fill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidueFamily {
    AminoAcid(AminoAcidType),
    Nucleotide(NucleotideType),
    /// Any other het group, identified by its (upper-case) component code.
    Ligand(String),
}

static AMINO_ACID_NAMES: Map<&'static str, AminoAcidType> = phf_map! {
    "ALA" => AminoAcidType::Alanine,
    "GLY" => AminoAcidType::Glycine,
    "ILE" => AminoAcidType::Isoleucine,
    "LEU" => AminoAcidType::Leucine,
    "PRO" => AminoAcidType::Proline,
    "VAL" => AminoAcidType::Valine,
    "PHE" => AminoAcidType::Phenylalanine,
    "TRP" => AminoAcidType::Tryptophan,
    "TYR" => AminoAcidType::Tyrosine,
    "ASN" => AminoAcidType::Asparagine,
    "CYS" => AminoAcidType::Cysteine,
    "CYX" => AminoAcidType::Cysteine,
    "GLN" => AminoAcidType::Glutamine,
    "SER" => AminoAcidType::Serine,
    "THR" => AminoAcidType::Threonine,
    "MET" => AminoAcidType::Methionine,
    "MSE" => AminoAcidType::Methionine,
    "ARG" => AminoAcidType::Arginine,
    "HIS" => AminoAcidType::Histidine,
    "HSE" => AminoAcidType::Histidine,
    "HSD" => AminoAcidType::Histidine,
    "HSP" => AminoAcidType::Histidine,
    "LYS" => AminoAcidType::Lysine,
    "ASP" => AminoAcidType::AsparticAcid,
    "GLU" => AminoAcidType::GlutamicAcid,
    "UNK" => AminoAcidType::Unknown,
};

static NUCLEOTIDE_NAMES: Map<&'static str, NucleotideType> = phf_map! {
    "A" => NucleotideType::Adenosine,
    "DA" => NucleotideType::Adenosine,
    "C" => NucleotideType::Cytidine,
    "DC" => NucleotideType::Cytidine,
    "G" => NucleotideType::Guanosine,
    "DG" => NucleotideType::Guanosine,
    "T" => NucleotideType::Thymidine,
    "DT" => NucleotideType::Thymidine,
    "U" => NucleotideType::Uridine,
    "DU" => NucleotideType::Uridine,
    "N" => NucleotideType::Unknown,
    "DN" => NucleotideType::Unknown,
};

impl AminoAcidType {
    pub fn to_three_letter(self) -> &'static str {
        match self {
            AminoAcidType::Alanine => "ALA",
            AminoAcidType::Glycine => "GLY",
            AminoAcidType::Isoleucine => "ILE",
            AminoAcidType::Leucine => "LEU",
            AminoAcidType::Proline => "PRO",
            AminoAcidType::Valine => "VAL",
            AminoAcidType::Phenylalanine => "PHE",
            AminoAcidType::Tryptophan => "TRP",
            AminoAcidType::Tyrosine => "TYR",
            AminoAcidType::Asparagine => "ASN",
            AminoAcidType::Cysteine => "CYS",
            AminoAcidType::Glutamine => "GLN",
            AminoAcidType::Serine => "SER",
            AminoAcidType::Threonine => "THR",
            AminoAcidType::Methionine => "MET",
            AminoAcidType::Arginine => "ARG",
            AminoAcidType::Histidine => "HIS",
            AminoAcidType::Lysine => "LYS",
            AminoAcidType::AsparticAcid => "ASP",
            AminoAcidType::GlutamicAcid => "GLU",
            AminoAcidType::Unknown => "UNK",
        }
    }

    pub fn from_three_letter(name: &str) -> Option<Self> {
        AMINO_ACID_NAMES
            .get(name.trim().to_ascii_uppercase().as_str())
            .copied()
    }
}

impl NucleotideType {
    pub fn to_code(self) -> &'static str {
        match self {
            NucleotideType::Adenosine => "A",
            NucleotideType::Cytidine => "C",
            NucleotideType::Guanosine => "G",
            NucleotideType::Thymidine => "T",
            NucleotideType::Uridine => "U",
            NucleotideType::Unknown => "N",
        }
    }
}

impl ResidueFamily {
    /// Classifies a residue by its name as found in a structure file.
    ///
    /// Amino acid names (including common protonation and modification aliases
    /// such as HSE, CYX or MSE) win over nucleotide codes; anything else is a ligand.
    pub fn from_residue_name(name: &str) -> Self {
        let normalized = name.trim().to_ascii_uppercase();
        if let Some(amino_acid) = AMINO_ACID_NAMES.get(normalized.as_str()) {
            return ResidueFamily::AminoAcid(*amino_acid);
        }
        if let Some(nucleotide) = NUCLEOTIDE_NAMES.get(normalized.as_str()) {
            return ResidueFamily::Nucleotide(*nucleotide);
        }
        ResidueFamily::Ligand(normalized)
    }

    pub fn code(&self) -> &str {
        match self {
            ResidueFamily::AminoAcid(aa) => aa.to_three_letter(),
            ResidueFamily::Nucleotide(nt) => nt.to_code(),
            ResidueFamily::Ligand(code) => code,
        }
    }
}

impl From<AminoAcidType> for ResidueFamily {
    fn from(value: AminoAcidType) -> Self {
        ResidueFamily::AminoAcid(value)
    }
}

impl From<NucleotideType> for ResidueFamily {
    fn from(value: NucleotideType) -> Self {
        ResidueFamily::Nucleotide(value)
    }
}

impl fmt::Display for ResidueFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
