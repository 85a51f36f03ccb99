use super::representation::GeometryError;
use crate::core::utils::geometry::max_pairwise_squared_distance;
use nalgebra::Point3;

/// The largest pairwise squared distance among the motif's reference points.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MotifExtent(f64);

impl MotifExtent {
    pub const ZERO: MotifExtent = MotifExtent(0.0);

    /// Extent of a point set with at least two points.
    pub fn from_points(points: &[Point3<f64>]) -> Result<Self, GeometryError> {
        max_pairwise_squared_distance(points)
            .map(MotifExtent)
            .ok_or(GeometryError::UndefinedExtent {
                residues: points.len(),
            })
    }

    /// Extent of a query motif; a single-residue motif has zero extent.
    pub fn of_motif(points: &[Point3<f64>]) -> Result<Self, GeometryError> {
        match points.len() {
            1 => Ok(Self::ZERO),
            _ => Self::from_points(points),
        }
    }

    pub fn squared(&self) -> f64 {
        self.0
    }

    pub fn diameter(&self) -> f64 {
        self.0.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_is_the_largest_pairwise_squared_distance() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ];
        let extent = MotifExtent::from_points(&points).unwrap();
        assert_eq!(extent.squared(), 25.0);
        assert_eq!(extent.diameter(), 5.0);
    }

    #[test]
    fn extent_needs_two_points() {
        let single = [Point3::new(1.0, 2.0, 3.0)];
        assert_eq!(
            MotifExtent::from_points(&single),
            Err(GeometryError::UndefinedExtent { residues: 1 })
        );
        assert_eq!(MotifExtent::of_motif(&single), Ok(MotifExtent::ZERO));
        assert!(MotifExtent::of_motif(&[]).is_err());
    }
}
