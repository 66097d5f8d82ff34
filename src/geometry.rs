//! Small vector helpers shared by the layout and the checks.

use nalgebra::{Matrix3, Vector3};

pub type Point = Vector3<f64>;

/// Projection of `v` onto the direction of `onto`.
///
/// Projecting onto a zero vector yields the zero vector instead of NaN.
pub fn vector_projection(v: &Point, onto: &Point) -> Point {
    let norm_sq = onto.norm_squared();
    if norm_sq == 0.0 {
        return Point::zeros();
    }
    onto * (v.dot(onto) / norm_sq)
}

/// Euclidean distance between two points.
pub fn segment_length(start: &Point, end: &Point) -> f64 {
    (end - start).norm()
}

/// Element-wise closeness with the usual `atol = 1e-8`, `rtol = 1e-5`.
pub fn all_close(a: &Point, b: &Point) -> bool {
    const ATOL: f64 = 1e-8;
    const RTOL: f64 = 1e-5;
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y).abs() <= ATOL + RTOL * y.abs())
}

/// Spread of a point cloud along each of its principal axes.
///
/// The points are centred, the axes come from the eigen-decomposition of
/// their covariance matrix and the extent along an axis is the distance
/// between the extreme scalar projections on it. The order follows the
/// eigen solver; callers that care about ordering sort the result.
pub fn principal_direction_extent(points: &[Point]) -> [f64; 3] {
    if points.len() < 2 {
        return [0.0; 3];
    }

    let n = points.len() as f64;
    let mean = points.iter().fold(Point::zeros(), |acc, p| acc + p) / n;

    let mut covariance = Matrix3::zeros();
    for p in points {
        let d = p - mean;
        covariance += d * d.transpose();
    }
    covariance /= n;

    let eigen = covariance.symmetric_eigen();

    let mut extent = [0.0; 3];
    for (i, value) in extent.iter_mut().enumerate() {
        let axis: Point = eigen.eigenvectors.column(i).into_owned();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for p in points {
            let proj = (p - mean).dot(&axis);
            min = min.min(proj);
            max = max.max(proj);
        }
        *value = max - min;
    }
    extent
}
