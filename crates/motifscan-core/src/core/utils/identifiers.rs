use phf::{Set, phf_set};

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "H", "HN", "CA", "HA", "C", "O", "OXT", "H1", "H2", "H3", "NT",
    "HT1", "HT2", "HT3", "OT1", "OT2", "HC", "HOXT", "HA1", "HA2", "HA3", "1HA", "2HA",
};

static TWO_LETTER_ELEMENTS: Set<&'static str> = phf_set! {
    "FE", "ZN", "MG", "MN", "CU", "CO", "NI", "NA", "CL", "BR", "SE", "MO",
};

pub const ALPHA_CARBON_ATOM_NAME: &str = "CA";
pub const BETA_CARBON_ATOM_NAME: &str = "CB";

pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

/// Guesses the element symbol of a polymer atom from its name.
///
/// Polymer atom names start with their element ("CA" is an alpha carbon, "OD1"
/// an oxygen), so only the first letter is used. Ion-style names that are
/// exactly an unambiguous two-letter element ("ZN", "MG") are kept whole;
/// "CA", "CD" and "HG" stay carbon and hydrogen names.
pub fn element_from_atom_name(atom_name: &str) -> &str {
    let trimmed = atom_name
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit());
    if trimmed.len() == 2 && TWO_LETTER_ELEMENTS.contains(trimmed) {
        return trimmed;
    }
    trimmed.get(0..1).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_backbone_atom_recognizes_standard_backbone_atoms() {
        assert!(is_backbone_atom("N"));
        assert!(is_backbone_atom("CA"));
        assert!(is_backbone_atom(" C "));
        assert!(is_backbone_atom("O"));
        assert!(!is_backbone_atom("CB"));
        assert!(!is_backbone_atom("OG1"));
    }

    #[test]
    fn element_is_guessed_from_atom_name() {
        assert_eq!(element_from_atom_name("CA"), "C");
        assert_eq!(element_from_atom_name("OD1"), "O");
        assert_eq!(element_from_atom_name("2HB"), "H");
        assert_eq!(element_from_atom_name("ZN"), "ZN");
        assert_eq!(element_from_atom_name(""), "");
    }
}
