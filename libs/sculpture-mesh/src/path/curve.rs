//! # Catmull-Rom Curve
//!
//! Open Catmull-Rom spline with arc-length parameterized sampling.
//! End tangents are built from reflected phantom points.

use config::constants::ARC_LENGTH_SAMPLES_PER_SPAN;
use glam::DVec3;

/// Open Catmull-Rom curve through a sequence of points.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<DVec3>,
    tension: f64,
    /// Cumulative arc length at evenly spaced parameter values
    arc_lengths: Vec<f64>,
}

impl CatmullRom {
    /// Builds the curve. Returns `None` for fewer than 2 points.
    pub fn new(points: Vec<DVec3>, tension: f64) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let mut curve = Self {
            points,
            tension,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.build_arc_lengths();
        Some(curve)
    }

    /// Total arc length (polyline approximation).
    pub fn length(&self) -> f64 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at parameter `t` in `[0, 1]`, uniform per span.
    pub fn point(&self, t: f64) -> DVec3 {
        let n = self.points.len();
        let p = (n - 1) as f64 * t.clamp(0.0, 1.0);
        let mut span = p.floor() as usize;
        let mut weight = p - span as f64;
        if span >= n - 1 {
            span = n - 2;
            weight = 1.0;
        }

        let p1 = self.points[span];
        let p2 = self.points[span + 1];
        let p0 = if span > 0 {
            self.points[span - 1]
        } else {
            p1 * 2.0 - p2
        };
        let p3 = if span + 2 < n {
            self.points[span + 2]
        } else {
            p2 * 2.0 - p1
        };

        let t0 = (p2 - p0) * self.tension;
        let t1 = (p3 - p1) * self.tension;

        // Cubic Hermite basis
        let c2 = p1 * -3.0 + p2 * 3.0 - t0 * 2.0 - t1;
        let c3 = p1 * 2.0 - p2 * 2.0 + t0 + t1;
        p1 + t0 * weight + c2 * weight * weight + c3 * weight * weight * weight
    }

    /// Point at arc-length fraction `u` in `[0, 1]`.
    pub fn point_at(&self, u: f64) -> DVec3 {
        self.point(self.parameter_for(u))
    }

    /// `segments + 1` points evenly spaced by arc length, ends included.
    pub fn sample_even(&self, segments: u32) -> Vec<DVec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    fn build_arc_lengths(&self) -> Vec<f64> {
        let divisions = (self.points.len() - 1) * ARC_LENGTH_SAMPLES_PER_SPAN;
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut total = 0.0;
        let mut last = self.point(0.0);
        lengths.push(0.0);
        for i in 1..=divisions {
            let current = self.point(i as f64 / divisions as f64);
            total += current.distance(last);
            lengths.push(total);
            last = current;
        }
        lengths
    }

    /// Maps an arc-length fraction to the curve parameter.
    fn parameter_for(&self, u: f64) -> f64 {
        let total = self.length();
        let divisions = self.arc_lengths.len() - 1;
        if total <= 0.0 || divisions == 0 {
            return u.clamp(0.0, 1.0);
        }

        let target = u.clamp(0.0, 1.0) * total;
        // First index whose cumulative length reaches the target.
        let upper = self
            .arc_lengths
            .partition_point(|len| *len < target)
            .clamp(1, divisions);
        let lower = upper - 1;
        let span_length = self.arc_lengths[upper] - self.arc_lengths[lower];
        let fraction = if span_length > 0.0 {
            (target - self.arc_lengths[lower]) / span_length
        } else {
            0.0
        };
        (lower as f64 + fraction) / divisions as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_requires_two_points() {
        assert!(CatmullRom::new(vec![DVec3::ZERO], 0.5).is_none());
    }

    #[test]
    fn test_interpolates_control_points() {
        let points = vec![
            DVec3::ZERO,
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(2.0, 0.0, 1.0),
            DVec3::new(3.0, 2.0, 1.0),
        ];
        let curve = CatmullRom::new(points.clone(), 0.5).unwrap();
        for (i, p) in points.iter().enumerate() {
            let t = i as f64 / 3.0;
            assert_relative_eq!(curve.point(t).distance(*p), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_straight_line_length() {
        let curve = CatmullRom::new(vec![DVec3::ZERO, DVec3::X, DVec3::X * 2.0], 0.5).unwrap();
        assert_relative_eq!(curve.length(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_even_sampling_spacing() {
        let end = DVec3::new(3.0, 0.0, 1.5);
        let points = vec![DVec3::ZERO, DVec3::X, DVec3::new(2.0, 0.0, 0.5), end];
        let curve = CatmullRom::new(points, 0.5).unwrap();
        let samples = curve.sample_even(30);
        assert_eq!(samples.len(), 31);
        assert_relative_eq!(samples[0].distance(DVec3::ZERO), 0.0, epsilon = 1e-12);
        assert_relative_eq!(samples[30].distance(end), 0.0, epsilon = 1e-9);
        let steps: Vec<f64> = samples.windows(2).map(|w| w[0].distance(w[1])).collect();
        let expected = curve.length() / 30.0;
        for step in steps {
            assert_relative_eq!(step, expected, max_relative = 0.05);
        }
    }

    #[test]
    fn test_zero_length_curve_is_finite() {
        let curve = CatmullRom::new(vec![DVec3::ONE, DVec3::ONE], 0.5).unwrap();
        assert_eq!(curve.length(), 0.0);
        assert!(curve.sample_even(4).iter().all(|p| *p == DVec3::ONE));
    }
}
