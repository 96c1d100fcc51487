use nalgebra::{Point3, Vector3};

/// Component-wise difference `a - b` between two particle positions.
///
/// The result is anti-symmetric: `displacement(a, b) == -displacement(b, a)`.
#[inline]
pub fn displacement(a: &Point3<f64>, b: &Point3<f64>) -> Vector3<f64> {
    a - b
}

/// Euclidean length `sqrt(x² + y² + z²)` of a vector. Never negative.
///
/// Evaluated with `hypot` so that squaring tiny components cannot underflow to zero.
#[inline]
pub fn length(v: &Vector3<f64>) -> f64 {
    v.x.hypot(v.y).hypot(v.z)
}

#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    length(&displacement(a, b))
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Axis-aligned bounding box as `(min, max)` corners.
pub fn bounding_box(points: &[Point3<f64>]) -> Option<(Point3<f64>, Point3<f64>)> {
    let first = points.first()?;
    let (mut min, mut max) = (*first, *first);
    for p in &points[1..] {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    Some((min, max))
}
