use super::representation::{
    AtomFilter, AtomFilterKind, ReferenceSelection, RepresentationKind,
};
use crate::core::models::system::MolecularSystem;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_DISTANCE_TOLERANCE: f64 = 1.0;
pub const DEFAULT_RMSD_CUTOFF: f64 = 2.5;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Distance tolerance must be a positive finite number, got {0}")]
    InvalidDistanceTolerance(f64),

    #[error("RMSD cutoff must be a positive finite number, got {0}")]
    InvalidRmsdCutoff(f64),

    #[error("Parallelism must be at least 1")]
    InvalidParallelism,

    #[error("Query motif contains no residues")]
    EmptyMotif,

    #[error("Query motif has no position {position} (motif size {size})")]
    UnknownPosition { position: usize, size: usize },

    #[error("Motif residue {0} not found in the source structure")]
    ResidueNotFound(String),

    #[error(
        "Target '{target}' has {target_size} residue(s), fewer than the {motif_size} of the query motif"
    )]
    TargetTooSmall {
        target: String,
        target_size: usize,
        motif_size: usize,
    },

    #[error("Invalid settings: {0}")]
    Settings(String),
}

/// Batch pre-filters that skip targets which cannot be searched meaningfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetFilter {
    /// Skip structures made only of backbone atoms.
    pub skip_backbone_only: bool,
    /// Skip structures that are pure CA traces.
    pub skip_alpha_carbon_only: bool,
}

impl TargetFilter {
    /// Returns the reason a target is rejected, or `None` if it should be searched.
    pub fn rejects(&self, target: &MolecularSystem) -> Option<&'static str> {
        if self.skip_alpha_carbon_only && target.is_alpha_carbon_only() {
            return Some("structure contains only alpha carbons");
        }
        if self.skip_backbone_only && target.is_backbone_only() {
            return Some("structure contains only backbone atoms");
        }
        None
    }
}

/// The complete, validated parameter set of a motif search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Added to the motif's squared extent to obtain the squared pruning radius.
    /// Expressed in squared coordinate units (Å²).
    pub distance_tolerance: f64,
    /// Largest RMSD (Å) a match may have.
    pub rmsd_cutoff: f64,
    pub reference: ReferenceSelection,
    /// Number of batch workers.
    pub parallelism: usize,
    pub target_filter: TargetFilter,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            distance_tolerance: DEFAULT_DISTANCE_TOLERANCE,
            rmsd_cutoff: DEFAULT_RMSD_CUTOFF,
            reference: ReferenceSelection::default(),
            parallelism: default_parallelism(),
            target_filter: TargetFilter::default(),
        }
    }
}

impl SearchConfig {
    /// Checks every field, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.distance_tolerance.is_finite() && self.distance_tolerance > 0.0) {
            return Err(ConfigError::InvalidDistanceTolerance(
                self.distance_tolerance,
            ));
        }
        if !(self.rmsd_cutoff.is_finite() && self.rmsd_cutoff > 0.0) {
            return Err(ConfigError::InvalidRmsdCutoff(self.rmsd_cutoff));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::InvalidParallelism);
        }
        Ok(())
    }

    /// Parses [`SearchSettings`] from TOML and converts them into a validated config.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: SearchSettings =
            toml::from_str(content).map_err(|e| ConfigError::Settings(e.to_string()))?;
        Self::try_from(settings)
    }
}

pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// The plain-data part of [`SearchConfig`], as read from a settings file.
///
/// At most one of `representation`, `atom_filter` and `atom_names` may be set;
/// with none, the default reference selection applies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
    pub distance_tolerance: f64,
    pub rmsd_cutoff: f64,
    pub parallelism: Option<usize>,
    pub representation: Option<RepresentationKind>,
    pub atom_filter: Option<AtomFilterKind>,
    pub atom_names: Option<Vec<String>>,
    pub skip_backbone_only: bool,
    pub skip_alpha_carbon_only: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            distance_tolerance: DEFAULT_DISTANCE_TOLERANCE,
            rmsd_cutoff: DEFAULT_RMSD_CUTOFF,
            parallelism: None,
            representation: None,
            atom_filter: None,
            atom_names: None,
            skip_backbone_only: false,
            skip_alpha_carbon_only: false,
        }
    }
}

impl TryFrom<SearchSettings> for SearchConfig {
    type Error = ConfigError;

    fn try_from(settings: SearchSettings) -> Result<Self, Self::Error> {
        let reference = match (
            settings.representation,
            settings.atom_filter,
            settings.atom_names,
        ) {
            (None, None, None) => ReferenceSelection::default(),
            (Some(kind), None, None) => ReferenceSelection::Representation(kind.into()),
            (None, Some(kind), None) => ReferenceSelection::Atoms(kind.into()),
            (None, None, Some(names)) => ReferenceSelection::Atoms(AtomFilter::Names(names)),
            _ => {
                return Err(ConfigError::Settings(
                    "only one of 'representation', 'atom_filter' and 'atom_names' may be set"
                        .to_string(),
                ));
            }
        };

        let config = SearchConfig {
            distance_tolerance: settings.distance_tolerance,
            rmsd_cutoff: settings.rmsd_cutoff,
            reference,
            parallelism: settings.parallelism.unwrap_or_else(default_parallelism),
            target_filter: TargetFilter {
                skip_backbone_only: settings.skip_backbone_only,
                skip_alpha_carbon_only: settings.skip_alpha_carbon_only,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::engine::representation::RepresentationScheme;
    use nalgebra::Point3;

    fn structure(label: &str, atom_names: &[&str]) -> MolecularSystem {
        let mut system = MolecularSystem::new(label);
        let chain = system.add_chain('A', ChainType::Protein);
        for number in 1..=3 {
            let id = system.add_residue(chain, number, "ALA").unwrap();
            for (i, name) in atom_names.iter().enumerate() {
                let position = Point3::new(number as f64 * 3.8, i as f64, 0.0);
                system.add_atom_to_residue(id, Atom::with_inferred_role(name, id, position));
            }
        }
        system
    }

    #[test]
    fn alpha_carbon_filter_rejects_only_ca_traces() {
        let filter = TargetFilter {
            skip_backbone_only: false,
            skip_alpha_carbon_only: true,
        };
        assert_eq!(
            filter.rejects(&structure("trace", &["CA"])),
            Some("structure contains only alpha carbons")
        );
        assert_eq!(filter.rejects(&structure("backbone", &["N", "CA", "C", "O"])), None);
        assert_eq!(filter.rejects(&structure("full", &["N", "CA", "CB"])), None);
    }

    #[test]
    fn backbone_filter_rejects_backbone_and_ca_traces() {
        let filter = TargetFilter {
            skip_backbone_only: true,
            skip_alpha_carbon_only: false,
        };
        assert!(filter.rejects(&structure("trace", &["CA"])).is_some());
        assert!(filter.rejects(&structure("backbone", &["N", "CA", "C", "O"])).is_some());
        assert_eq!(filter.rejects(&structure("full", &["N", "CA", "CB"])), None);
        assert_eq!(TargetFilter::default().rejects(&structure("trace", &["CA"])), None);
    }

    #[test]
    fn default_config_is_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.distance_tolerance, 1.0);
        assert_eq!(config.rmsd_cutoff, 2.5);
        assert!(config.parallelism >= 1);
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        for tolerance in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SearchConfig {
                distance_tolerance: tolerance,
                ..SearchConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidDistanceTolerance(_))
            ));
        }
    }

    #[test]
    fn non_positive_cutoff_is_rejected() {
        let config = SearchConfig {
            rmsd_cutoff: 0.0,
            ..SearchConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRmsdCutoff(0.0)));
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let config = SearchConfig {
            parallelism: 0,
            ..SearchConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidParallelism));
    }

    #[test]
    fn settings_are_parsed_from_toml() {
        let config = SearchConfig::from_toml_str(
            r#"
distance_tolerance = 2.0
rmsd_cutoff = 1.5
parallelism = 3
representation = "side_chain_centroid"
skip_backbone_only = true
"#,
        )
        .unwrap();

        assert_eq!(config.distance_tolerance, 2.0);
        assert_eq!(config.rmsd_cutoff, 1.5);
        assert_eq!(config.parallelism, 3);
        assert!(matches!(
            config.reference,
            ReferenceSelection::Representation(RepresentationScheme::SideChainCentroid)
        ));
        assert!(config.target_filter.skip_backbone_only);
        assert!(!config.target_filter.skip_alpha_carbon_only);
    }

    #[test]
    fn empty_settings_yield_defaults() {
        let config = SearchConfig::from_toml_str("").unwrap();
        assert_eq!(config.distance_tolerance, DEFAULT_DISTANCE_TOLERANCE);
        assert_eq!(config.rmsd_cutoff, DEFAULT_RMSD_CUTOFF);
        assert!(matches!(
            config.reference,
            ReferenceSelection::Atoms(AtomFilter::All)
        ));
    }

    #[test]
    fn atom_names_setting_builds_name_filter() {
        let config = SearchConfig::from_toml_str(r#"atom_names = ["CA", "CB"]"#).unwrap();
        match config.reference {
            ReferenceSelection::Atoms(AtomFilter::Names(names)) => {
                assert_eq!(names, vec!["CA".to_string(), "CB".to_string()])
            }
            other => panic!("unexpected reference selection: {other:?}"),
        }
    }

    #[test]
    fn conflicting_reference_settings_are_rejected() {
        let result = SearchConfig::from_toml_str(
            r#"
representation = "alpha_carbon"
atom_filter = "backbone"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Settings(_))));
    }

    #[test]
    fn invalid_values_in_settings_are_rejected_eagerly() {
        let result = SearchConfig::from_toml_str("rmsd_cutoff = -1.0");
        assert_eq!(result.unwrap_err(), ConfigError::InvalidRmsdCutoff(-1.0));
    }

    #[test]
    fn unknown_settings_keys_are_rejected() {
        let result = SearchConfig::from_toml_str("rmsd = 1.0");
        assert!(matches!(result, Err(ConfigError::Settings(_))));
    }
}
