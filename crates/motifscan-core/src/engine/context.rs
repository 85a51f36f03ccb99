use super::config::SearchConfig;
use super::extent::MotifExtent;
use super::motif::QueryMotif;
use super::progress::ProgressReporter;
use super::representation::GeometryError;
use crate::core::models::family::ResidueFamily;
use nalgebra::Point3;
use std::collections::BTreeSet;

/// Everything derived from the motif once and shared by every target searched.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    /// Allowed families per position.
    pub allowed: Vec<BTreeSet<ResidueFamily>>,
    /// Union of all allowed families; target residues outside it are dropped.
    pub families: BTreeSet<ResidueFamily>,
    /// Reference points per position.
    pub points: Vec<Point3<f64>>,
    pub extent: MotifExtent,
}

impl PreparedQuery {
    pub fn new(motif: &QueryMotif, config: &SearchConfig) -> Result<Self, GeometryError> {
        let points = config
            .reference
            .reference_points(motif.system(), motif.residue_ids())?;
        let extent = MotifExtent::of_motif(&points)?;
        Ok(Self {
            allowed: motif.allowed_family_sets(),
            families: motif.family_universe(),
            points,
            extent,
        })
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub motif: &'a QueryMotif,
    pub query: &'a PreparedQuery,
    pub config: &'a SearchConfig,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        motif: &'a QueryMotif,
        query: &'a PreparedQuery,
        config: &'a SearchConfig,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            motif,
            query,
            config,
            reporter,
        }
    }

    /// Squared radius of a residue environment: motif extent plus tolerance.
    pub fn environment_radius_squared(&self) -> f64 {
        self.query.extent.squared() + self.config.distance_tolerance
    }
}
