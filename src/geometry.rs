//! Geometry utilities shared by the culler, cluster analyzer and trail builder.

use crate::{BoundingVolume, Point3, Rgba};

/// Euclidean distance between two points.
pub fn euclidean_distance(a: &Point3, b: &Point3) -> f64 {
    distance_squared(a, b).sqrt()
}

/// Squared Euclidean distance, for comparisons that don't need the root.
#[inline]
pub fn distance_squared(a: &Point3, b: &Point3) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    dx * dx + dy * dy + dz * dz
}

/// Compute the axis-aligned bounds of a point cloud.
///
/// Returns `None` for an empty slice.
pub fn compute_bounds(points: &[Point3]) -> Option<BoundingVolume> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;

    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }

    Some(BoundingVolume { min, max })
}

/// Compute the centroid of a point cloud (origin for an empty slice).
pub fn compute_center(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return Point3::ORIGIN;
    }
    let n = points.len() as f64;
    let (sx, sy, sz) = points
        .iter()
        .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
    Point3::new(sx / n, sy / n, sz / n)
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point3]) -> f64 {
    points
        .windows(2)
        .map(|w| euclidean_distance(&w[0], &w[1]))
        .sum()
}

/// Linear colour interpolation, `t` clamped to [0, 1].
///
/// `t = 0` yields `low`, `t = 1` yields `high` exactly.
pub fn lerp_color(low: &Rgba, high: &Rgba, t: f64) -> Rgba {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let t = t as f32;
    let s = 1.0 - t;
    Rgba {
        r: low.r * s + high.r * t,
        g: low.g * s + high.g * t,
        b: low.b * s + high.b * t,
        a: low.a * s + high.a * t,
    }
}
