//! # Route Path
//!
//! Tube mesh following the route for the raised style.
//!
//! A Catmull-Rom curve is fitted through the normalized, simplified route
//! points and resampled evenly by arc length. Every sample's height is
//! clamped into the terrain's height range before the tube centre is placed
//! with [`Dimensions::tube_center_height`], the same formula the terrain
//! clearance step subtracts from.

mod curve;
mod frame;

pub use curve::CatmullRom;
pub use frame::{parallel_transport_frames, Frame};

use crate::error::{SculptureError, SculptureResult};
use crate::mesh::Mesh;
use crate::normalize::clip_to_circle;
use crate::primitives::{cuboid, sphere};
use crate::sculpture::{Dimensions, Shape};
use config::constants::{
    tubular_segments, CATMULL_ROM_TENSION, END_MARKER_SIZE_FACTOR, MARKER_SEGMENTS,
    START_MARKER_RADIUS_FACTOR,
};
use glam::{DVec2, DVec3};
use std::f64::consts::PI;
use tracing::debug;

/// Geometry produced for a raised route.
#[derive(Debug, Clone)]
pub struct RoutePath {
    /// Evenly spaced route samples; `y` is the clamped route height, not the
    /// tube centre height
    pub samples: Vec<DVec3>,
    /// Open tube body, `tubular × radial × 2` triangles
    pub tube: Mesh,
    /// Fan caps closing both tube ends
    pub caps: Mesh,
    /// Sphere at the route start
    pub start_marker: Mesh,
    /// Box at the route end
    pub end_marker: Mesh,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    /// Arc length of the fitted curve in scene units
    pub length: f64,
}

impl RoutePath {
    /// Tube body and caps as one closed solid.
    pub fn solid(&self) -> Mesh {
        let mut solid = self.tube.clone();
        solid.merge(&self.caps);
        solid
    }

    /// Tube centre at the first sample.
    pub fn start_center(&self, dims: &Dimensions) -> Option<DVec3> {
        self.samples.first().map(|s| tube_center(*s, dims))
    }

    /// Tube centre at the last sample.
    pub fn end_center(&self, dims: &Dimensions) -> Option<DVec3> {
        self.samples.last().map(|s| tube_center(*s, dims))
    }
}

fn tube_center(sample: DVec3, dims: &Dimensions) -> DVec3 {
    DVec3::new(sample.x, dims.tube_center_height(sample.y), sample.z)
}

/// Builds the route tube, caps and markers from normalized points.
///
/// # Errors
///
/// Returns [`SculptureError::Input`] for fewer than 2 points and
/// [`SculptureError::Compute`] if a marker primitive cannot be built.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use sculpture_mesh::path::build_route_path;
/// use sculpture_mesh::{Dimensions, QualityPreset, SculptureConfig};
///
/// let dims = Dimensions::resolve(&SculptureConfig::default(), QualityPreset::Preview).unwrap();
/// let points = vec![DVec3::new(-0.3, 0.01, 0.0), DVec3::new(0.3, 0.05, 0.1)];
/// let path = build_route_path(&points, &dims).unwrap();
/// assert_eq!(
///     path.tube.triangle_count() as u32,
///     path.tubular_segments * path.radial_segments * 2
/// );
/// ```
pub fn build_route_path(points: &[DVec3], dims: &Dimensions) -> SculptureResult<RoutePath> {
    let curve = CatmullRom::new(points.to_vec(), CATMULL_ROM_TENSION).ok_or_else(|| {
        SculptureError::input(format!(
            "route needs at least 2 points, got {}",
            points.len()
        ))
    })?;

    let length = curve.length();
    let tubular = tubular_segments(length, dims.mesh_size);
    let radial = dims.quality.radial_segments.max(3);

    let samples: Vec<DVec3> = curve
        .sample_even(tubular)
        .into_iter()
        .map(|p| {
            let mut xz = DVec2::new(p.x, p.z);
            if dims.shape == Shape::Circular {
                xz = clip_to_circle(xz, dims.route_clip_radius);
            }
            let y = p.y.clamp(dims.min_terrain_height, dims.max_height);
            DVec3::new(xz.x, y, xz.y)
        })
        .collect();

    let centers: Vec<DVec3> = samples.iter().map(|s| tube_center(*s, dims)).collect();
    let frames = parallel_transport_frames(&centers);
    let tube = sweep_tube(&centers, &frames, dims.tube_radius, radial);
    let caps = end_caps(&centers, &frames, dims.tube_radius, radial);

    let start_marker = sphere(
        centers[0],
        dims.tube_radius * START_MARKER_RADIUS_FACTOR,
        MARKER_SEGMENTS,
    )?;
    let half = DVec3::splat(dims.tube_radius * END_MARKER_SIZE_FACTOR / 2.0);
    let end = centers[centers.len() - 1];
    let end_marker = cuboid(end - half, end + half)?;

    debug!(
        tubular,
        radial,
        length,
        triangles = tube.triangle_count(),
        "built route tube"
    );

    Ok(RoutePath {
        samples,
        tube,
        caps,
        start_marker,
        end_marker,
        tubular_segments: tubular,
        radial_segments: radial,
        length,
    })
}

fn ring_offset(frame: &Frame, radius: f64, index: u32, radial: u32) -> DVec3 {
    let angle = 2.0 * PI * index as f64 / radial as f64;
    (frame.normal * angle.cos() + frame.binormal * angle.sin()) * radius
}

/// One ring of `radial` vertices per centre, quads between rings.
fn sweep_tube(centers: &[DVec3], frames: &[Frame], radius: f64, radial: u32) -> Mesh {
    let n = radial as usize;
    let rings = centers.len();
    let mut mesh = Mesh::with_capacity(rings * n, (rings - 1) * n * 2);

    for (center, frame) in centers.iter().zip(frames) {
        for j in 0..radial {
            mesh.add_vertex(*center + ring_offset(frame, radius, j, radial));
        }
    }

    for ring in 0..rings - 1 {
        let base = ring * n;
        let next = base + n;
        for j in 0..n {
            let k = (j + 1) % n;
            let (a, b) = ((base + j) as u32, (base + k) as u32);
            let (c, d) = ((next + j) as u32, (next + k) as u32);
            mesh.add_triangle(a, b, c);
            mesh.add_triangle(b, d, c);
        }
    }

    mesh
}

/// Fans closing the first and last rings, wound away from the tube.
fn end_caps(centers: &[DVec3], frames: &[Frame], radius: f64, radial: u32) -> Mesh {
    let n = radial as usize;
    let mut mesh = Mesh::with_capacity(2 * (n + 1), 2 * n);

    for (index, outward_first) in [(0, true), (centers.len() - 1, false)] {
        let (center, frame) = (centers[index], frames[index]);
        let hub = mesh.add_vertex(center);
        let first = hub + 1;
        for j in 0..radial {
            mesh.add_vertex(center + ring_offset(&frame, radius, j, radial));
        }
        for j in 0..radial {
            let a = first + j;
            let b = first + (j + 1) % radial;
            if outward_first {
                mesh.add_triangle(hub, b, a);
            } else {
                mesh.add_triangle(hub, a, b);
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityPreset;
    use crate::sculpture::SculptureConfig;
    use approx::assert_relative_eq;

    fn dims() -> Dimensions {
        Dimensions::resolve(&SculptureConfig::default(), QualityPreset::Standard).unwrap()
    }

    fn wiggle() -> Vec<DVec3> {
        (0..12)
            .map(|i| {
                let t = i as f64 / 11.0;
                DVec3::new(t - 0.5, 0.1 * t, 0.2 * (t * 6.0).sin())
            })
            .collect()
    }

    #[test]
    fn test_tube_triangle_count() {
        let d = dims();
        let path = build_route_path(&wiggle(), &d).unwrap();
        assert_eq!(
            path.tube.triangle_count(),
            (path.tubular_segments * path.radial_segments * 2) as usize
        );
        assert_eq!(path.radial_segments, d.quality.radial_segments);
        assert_eq!(path.samples.len(), path.tubular_segments as usize + 1);
    }

    #[test]
    fn test_tubular_segments_follow_length() {
        let d = dims();
        let short = build_route_path(&[DVec3::ZERO, DVec3::X * 0.01], &d).unwrap();
        assert_eq!(short.tubular_segments, 64);
        let long = build_route_path(&[DVec3::new(-0.6, 0.0, 0.0), DVec3::new(0.6, 0.0, 0.0)], &d).unwrap();
        assert_eq!(long.tubular_segments, 120);
    }

    #[test]
    fn test_solid_is_closed() {
        let path = build_route_path(&wiggle(), &dims()).unwrap();
        assert_eq!(path.tube.open_edge_count(), 2 * path.radial_segments as usize);
        assert_eq!(path.solid().open_edge_count(), 0);
    }

    #[test]
    fn test_tube_faces_outward() {
        let d = dims();
        let points = vec![DVec3::new(-0.4, 0.05, 0.0), DVec3::new(0.4, 0.05, 0.0)];
        let path = build_route_path(&points, &d).unwrap();
        let mut tube = path.tube.clone();
        tube.compute_normals();
        let axis_y = d.tube_center_height(0.05);
        for (v, n) in tube.vertices().iter().zip(tube.normals().unwrap()) {
            let radial = DVec3::new(0.0, v.y - axis_y, v.z);
            assert!(radial.dot(*n) > 0.0);
        }
    }

    #[test]
    fn test_centre_height_uses_shared_formula() {
        let d = dims();
        let points = vec![
            DVec3::new(-0.3, 0.0, 0.0),
            DVec3::new(0.0, d.max_height * 3.0, 0.0),
            DVec3::new(0.3, 0.0, 0.0),
        ];
        let path = build_route_path(&points, &d).unwrap();
        for s in &path.samples {
            assert!(s.y <= d.max_height && s.y >= d.min_terrain_height);
        }
        let (_, max) = path.tube.bounding_box();
        assert!(max.y <= d.max_height + d.route_vertical_offset + d.tube_radius + 1e-12);
        let start = path.start_center(&d).unwrap();
        assert_relative_eq!(start.y, d.tube_center_height(path.samples[0].y), epsilon = 1e-12);
    }

    #[test]
    fn test_markers_at_ends() {
        let d = dims();
        let path = build_route_path(&wiggle(), &d).unwrap();
        let start = path.start_center(&d).unwrap();
        let end = path.end_center(&d).unwrap();
        let (smin, smax) = path.start_marker.bounding_box();
        assert!(((smin + smax) / 2.0).distance(start) < 1e-9);
        let (emin, emax) = path.end_marker.bounding_box();
        assert!(((emin + emax) / 2.0).distance(end) < 1e-12);
        assert_relative_eq!(emax.x - emin.x, d.tube_radius * END_MARKER_SIZE_FACTOR, epsilon = 1e-12);
    }

    #[test]
    fn test_circular_samples_stay_in_clip_radius() {
        let d = dims();
        let r = d.route_clip_radius;
        let points = vec![DVec3::new(-r, 0.0, 0.0), DVec3::new(0.0, 0.0, r), DVec3::new(r, 0.0, 0.0)];
        let path = build_route_path(&points, &d).unwrap();
        for s in &path.samples {
            assert!(DVec2::new(s.x, s.z).length() <= r + 1e-12);
        }
    }

    #[test]
    fn test_rejects_single_point() {
        let err = build_route_path(&[DVec3::ZERO], &dims()).unwrap_err();
        assert!(err.is_input_error());
    }
}
