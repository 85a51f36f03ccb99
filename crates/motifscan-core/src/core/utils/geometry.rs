use nalgebra::{Point3, Vector3};

pub fn centroid<'a, I>(points: I) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = &'a Point3<f64>>,
{
    let (sum, count) = points
        .into_iter()
        .fold((Vector3::zeros(), 0usize), |(sum, count), p| {
            (sum + p.coords, count + 1)
        });
    if count == 0 {
        None
    } else {
        Some(Point3::from(sum / count as f64))
    }
}

#[inline]
pub fn squared_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm_squared()
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// Largest pairwise squared distance within a point set.
///
/// Returns `None` when fewer than two points are given.
pub fn max_pairwise_squared_distance(points: &[Point3<f64>]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let mut max = 0.0f64;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            max = max.max(squared_distance(a, b));
        }
    }
    Some(max)
}
