//! # Route Simplification
//!
//! Adaptive Douglas-Peucker: the tolerance grows geometrically until the
//! retained point count fits the budget.

use config::constants::{SIMPLIFY_INITIAL_TOLERANCE, SIMPLIFY_MAX_ITERATIONS, SIMPLIFY_TOLERANCE_GROWTH};
use glam::DVec3;

/// Reduces `points` to at most `max_count` points while preserving shape.
///
/// - If `max_count >= points.len()` the input is returned unchanged.
/// - The first and last points are always retained, so a budget below 2 is
///   treated as 2.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use sculpture_mesh::simplify;
///
/// let points: Vec<DVec3> = (0..100)
///     .map(|i| DVec3::new(i as f64, (i as f64 * 0.3).sin(), 0.0))
///     .collect();
/// let simplified = simplify(&points, 20);
/// assert!(simplified.len() <= 20);
/// assert_eq!(simplified.first(), points.first());
/// assert_eq!(simplified.last(), points.last());
/// ```
pub fn simplify(points: &[DVec3], max_count: usize) -> Vec<DVec3> {
    if max_count >= points.len() {
        return points.to_vec();
    }
    let max_count = max_count.max(2);

    let extent = bounding_diagonal(points);
    if extent <= 0.0 {
        return endpoints(points);
    }

    let mut tolerance = extent * SIMPLIFY_INITIAL_TOLERANCE;
    for _ in 0..SIMPLIFY_MAX_ITERATIONS {
        let keep = douglas_peucker(points, tolerance);
        let kept = keep.iter().filter(|k| **k).count();
        if kept <= max_count {
            return points
                .iter()
                .zip(keep)
                .filter_map(|(p, k)| k.then_some(*p))
                .collect();
        }
        tolerance *= SIMPLIFY_TOLERANCE_GROWTH;
    }

    endpoints(points)
}

fn endpoints(points: &[DVec3]) -> Vec<DVec3> {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 => vec![*first, *last],
        _ => points.to_vec(),
    }
}

fn bounding_diagonal(points: &[DVec3]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let (min, max) = points
        .iter()
        .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
    (max - min).length()
}

/// Marks the points kept by one Douglas-Peucker pass at `tolerance`.
fn douglas_peucker(points: &[DVec3], tolerance: f64) -> Vec<bool> {
    let n = points.len();
    let mut keep = vec![false; n];
    if n == 0 {
        return keep;
    }
    keep[0] = true;
    keep[n - 1] = true;

    // Explicit stack; long tracks would overflow a recursive version.
    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (a, b) = (points[start], points[end]);
        let (index, distance) = (start + 1..end)
            .map(|i| (i, point_segment_distance(points[i], a, b)))
            .fold((start, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if distance > tolerance {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }

    keep
}

/// Distance from `p` to the segment `a`–`b`.
pub(crate) fn point_segment_distance(p: DVec3, a: DVec3, b: DVec3) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
