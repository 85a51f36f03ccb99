use crate::core::utils::geometry::{calculate_rmsd, centroid};
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use thiserror::Error;

/// Relative size of the second singular value below which the cross-covariance
/// is treated as rank-deficient.
const RANK_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SuperimpositionError {
    #[error("Point sets differ in size (reference {reference}, mobile {mobile})")]
    SizeMismatch { reference: usize, mobile: usize },

    #[error("Cannot superimpose empty point sets")]
    Empty,
}

/// A rigid transformation taking mobile points onto reference points.
#[derive(Debug, Clone, PartialEq)]
pub struct Superimposition {
    pub rmsd: f64,
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
    /// `true` when the rotation is not unique: the points are collinear (any
    /// spin about their common line fits equally well) or coincide, in which
    /// case only the centroids are aligned.
    pub approximate: bool,
}

impl Superimposition {
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    pub fn apply_all(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.apply(p)).collect()
    }
}

/// Finds the rotation and translation minimizing the RMSD between `mobile` and
/// `reference` (Kabsch), never producing a reflection.
///
/// With two points, or points lying on a line, the rotation is not unique: the
/// line is still aligned optimally and the result is flagged
/// [`Superimposition::approximate`]. When either point set collapses to its
/// centroid, only the centroids are aligned.
pub fn superimpose(
    reference: &[Point3<f64>],
    mobile: &[Point3<f64>],
) -> Result<Superimposition, SuperimpositionError> {
    if reference.len() != mobile.len() {
        return Err(SuperimpositionError::SizeMismatch {
            reference: reference.len(),
            mobile: mobile.len(),
        });
    }
    let (Some(reference_centroid), Some(mobile_centroid)) = (centroid(reference), centroid(mobile))
    else {
        return Err(SuperimpositionError::Empty);
    };

    let (rotation, approximate) =
        match optimal_rotation(reference, mobile, &reference_centroid, &mobile_centroid) {
            Some(fit) => (fit.rotation, !fit.unique),
            None => (Rotation3::identity(), true),
        };
    let translation = reference_centroid.coords - rotation * mobile_centroid.coords;

    let moved: Vec<_> = mobile.iter().map(|p| rotation * p + translation).collect();
    let rmsd = calculate_rmsd(reference, &moved).ok_or(SuperimpositionError::Empty)?;

    Ok(Superimposition {
        rmsd,
        rotation,
        translation,
        approximate,
    })
}

struct RotationFit {
    rotation: Rotation3<f64>,
    unique: bool,
}

/// `None` when the cross-covariance vanishes and no direction can be aligned.
fn optimal_rotation(
    reference: &[Point3<f64>],
    mobile: &[Point3<f64>],
    reference_centroid: &Point3<f64>,
    mobile_centroid: &Point3<f64>,
) -> Option<RotationFit> {
    let h = mobile
        .iter()
        .zip(reference.iter())
        .fold(Matrix3::zeros(), |acc, (f, t)| {
            acc + (t - reference_centroid) * (f - mobile_centroid).transpose()
        });

    let svd = h.svd(true, true);
    let mut singular: Vec<(usize, f64)> = svd.singular_values.iter().copied().enumerate().collect();
    singular.sort_by(|a, b| b.1.total_cmp(&a.1));
    let (largest, middle, smallest) = (singular[0].1, singular[1].1, singular[2].0);
    if largest.is_nan() || largest <= f64::EPSILON {
        return None;
    }
    let unique = middle > RANK_TOLERANCE * largest;

    let u = svd.u?;
    let v_t = svd.v_t?;

    let mut correction = Matrix3::identity();
    if (u * v_t).determinant() < 0.0 {
        correction[(smallest, smallest)] = -1.0;
    }

    // U and V are orthogonal, so the product is already a proper rotation.
    Some(RotationFit {
        rotation: Rotation3::from_matrix_unchecked(u * correction * v_t),
        unique,
    })
}
