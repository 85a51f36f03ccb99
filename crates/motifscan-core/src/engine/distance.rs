use super::representation::{GeometryError, ReferenceSelection};
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::squared_distance;
use nalgebra::{DMatrix, Point3};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Pairwise squared distances between the reference points of a set of residues.
///
/// The matrix is symmetric with a zero diagonal. Row order equals the order of
/// the residue list it was built from, and the reference point of every residue
/// is kept for later superimposition.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    residue_ids: Vec<ResidueId>,
    index: HashMap<ResidueId, usize>,
    points: Vec<Point3<f64>>,
    values: DMatrix<f64>,
}

impl DistanceMatrix {
    /// Computes reference points for `residue_ids` and all pairwise squared distances.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if any residue has no usable reference point.
    #[instrument(skip_all, name = "distance_matrix", fields(residues = residue_ids.len()))]
    pub fn compute(
        system: &MolecularSystem,
        residue_ids: &[ResidueId],
        reference: &ReferenceSelection,
    ) -> Result<Self, GeometryError> {
        let points = reference.reference_points(system, residue_ids)?;
        let matrix = Self::from_points(residue_ids.to_vec(), points);
        debug!(pairs = matrix.len() * matrix.len().saturating_sub(1) / 2, "Distance matrix ready.");
        Ok(matrix)
    }

    /// Builds the matrix from precomputed points; `points[i]` belongs to `residue_ids[i]`.
    pub fn from_points(residue_ids: Vec<ResidueId>, points: Vec<Point3<f64>>) -> Self {
        let n = residue_ids.len().min(points.len());
        let mut values = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = squared_distance(&points[i], &points[j]);
                values[(i, j)] = d;
                values[(j, i)] = d;
            }
        }
        let index = residue_ids
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();
        Self {
            residue_ids: residue_ids.into_iter().take(n).collect(),
            index,
            points: points.into_iter().take(n).collect(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.residue_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residue_ids.is_empty()
    }

    pub fn residue_ids(&self) -> &[ResidueId] {
        &self.residue_ids
    }

    pub fn index_of(&self, residue_id: ResidueId) -> Option<usize> {
        self.index.get(&residue_id).copied()
    }

    pub fn reference_point(&self, residue_id: ResidueId) -> Option<&Point3<f64>> {
        self.index_of(residue_id).map(|i| &self.points[i])
    }

    /// Squared distance between two residues, `None` if either is not indexed.
    pub fn get(&self, a: ResidueId, b: ResidueId) -> Option<f64> {
        Some(self.values[(self.index_of(a)?, self.index_of(b)?)])
    }

    /// Squared distances from the residue at row `i` to every indexed residue.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (ResidueId, f64)> + '_ {
        self.residue_ids
            .iter()
            .enumerate()
            .map(move |(j, &id)| (id, self.values[(i, j)]))
    }
}
