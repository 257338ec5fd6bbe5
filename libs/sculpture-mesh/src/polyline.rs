//! Nearest-point queries against a route polyline in the horizontal plane.
//!
//! Shared by the terrain clearance and groove steps, which both need the
//! distance to the route and the route height at the closest point. The
//! clearance step also needs every segment passing near a position, with
//! its steepness, since a tube segment that is not the closest can still
//! overhang it.

use glam::{DVec2, DVec3, Vec3Swizzles};

/// Closest point on a polyline to a horizontal position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Horizontal distance to the polyline
    pub distance: f64,
    /// Route height interpolated at the closest point
    pub height: f64,
    /// Rise over horizontal run of the segment; zero for a vertical or
    /// single-point segment
    pub slope: f64,
    /// Lower endpoint height of the segment
    pub low: f64,
}

/// Polyline with a cached horizontal bounding box for early rejection.
#[derive(Debug, Clone)]
pub struct RoutePolyline<'a> {
    points: &'a [DVec3],
    min: DVec2,
    max: DVec2,
}

impl<'a> RoutePolyline<'a> {
    pub fn new(points: &'a [DVec3]) -> Self {
        let (min, max) = points.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(p.xz()), hi.max(p.xz())),
        );
        Self { points, min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn misses_box(&self, p: DVec2, radius: f64) -> bool {
        p.x < self.min.x - radius
            || p.y < self.min.y - radius
            || p.x > self.max.x + radius
            || p.y > self.max.y + radius
    }

    /// Nearest point within `radius` of `(x, z)`, if any.
    pub fn nearest_within(&self, x: f64, z: f64, radius: f64) -> Option<Nearest> {
        if self.points.is_empty() || self.misses_box(DVec2::new(x, z), radius) {
            return None;
        }
        self.nearest(x, z).filter(|n| n.distance <= radius)
    }

    /// Closest point of every segment that passes within `radius` of
    /// `(x, z)`, in route order.
    pub fn within(&self, x: f64, z: f64, radius: f64) -> impl Iterator<Item = Nearest> + 'a {
        let p = DVec2::new(x, z);
        let points = if self.misses_box(p, radius) { &[][..] } else { self.points };
        let single = match points {
            [only] => Some(point_nearest(p, *only)),
            _ => None,
        };
        points
            .windows(2)
            .map(move |w| segment_nearest(p, w[0], w[1]))
            .chain(single)
            .filter(move |n| n.distance <= radius)
    }

    /// Nearest point over all segments, or the only point of a
    /// single-point polyline.
    pub fn nearest(&self, x: f64, z: f64) -> Option<Nearest> {
        let p = DVec2::new(x, z);
        match self.points {
            [] => None,
            [only] => Some(point_nearest(p, *only)),
            points => points
                .windows(2)
                .map(|w| segment_nearest(p, w[0], w[1]))
                .min_by(|a, b| a.distance.total_cmp(&b.distance)),
        }
    }
}

fn point_nearest(p: DVec2, point: DVec3) -> Nearest {
    Nearest {
        distance: p.distance(point.xz()),
        height: point.y,
        slope: 0.0,
        low: point.y,
    }
}

fn segment_nearest(p: DVec2, a: DVec3, b: DVec3) -> Nearest {
    let (a2, b2) = (a.xz(), b.xz());
    let ab = b2 - a2;
    let len_sq = ab.length_squared();
    let low = a.y.min(b.y);
    if len_sq <= f64::EPSILON {
        // Stacked endpoints: only the lower one bounds what hangs below.
        return Nearest {
            distance: p.distance(a2),
            height: low,
            slope: 0.0,
            low,
        };
    }
    let t = ((p - a2).dot(ab) / len_sq).clamp(0.0, 1.0);
    Nearest {
        distance: p.distance(a2 + ab * t),
        height: a.y + (b.y - a.y) * t,
        slope: (b.y - a.y).abs() / len_sq.sqrt(),
        low,
    }
}
