//! # Revolve
//!
//! Full revolution of a closed profile around the vertical axis.
//!
//! The profile lives in the `(radius, height)` half-plane and must be wound
//! counter-clockwise for the result to face outward. Each profile edge
//! becomes a band of quads; a full turn needs no end caps.
//!
//! A [`Footprint`] with a flat bends the revolution to follow a circle cut
//! by the half-plane `z <= flat_z`: a profile point at radius `r` is read
//! as an inset of `radius - r` from that outline, so rings keep their
//! spacing along the flat as they do around the circle.

use crate::error::{SculptureError, SculptureResult};
use crate::mesh::Mesh;
use config::constants::EPSILON;
use glam::{DVec2, DVec3};
use std::f64::consts::PI;

/// Outline a profile is revolved along.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub radius: f64,
    /// `z` of a straight cut across the front, if any
    pub flat_z: Option<f64>,
}

impl Footprint {
    pub fn circle(radius: f64) -> Self {
        Self { radius, flat_z: None }
    }

    pub fn with_flat(radius: f64, flat_z: f64) -> Self {
        Self {
            radius,
            flat_z: Some(flat_z),
        }
    }

    /// Distance from the axis, at angle `theta`, of the outline pulled in
    /// by `inset`.
    fn reach(&self, inset: f64, theta: f64) -> f64 {
        let round = self.radius - inset;
        match self.flat_z {
            // Vertices sit at z = -reach * sin(theta).
            Some(flat_z) if -theta.sin() > EPSILON => round.min((flat_z - inset) / -theta.sin()),
            _ => round,
        }
    }
}

/// Revolves a closed `(radius, height)` profile a full turn around `y`,
/// following `footprint`.
pub fn revolve(profile: &[DVec2], footprint: Footprint, segments: u32) -> SculptureResult<Mesh> {
    if profile.len() < 3 {
        return Err(SculptureError::compute("revolve profile needs at least 3 points"));
    }
    if profile.iter().any(|p| p.x < -EPSILON) {
        return Err(SculptureError::compute("revolve profile must have radius >= 0"));
    }
    if segments < 3 {
        return Err(SculptureError::compute(format!(
            "revolve segments must be at least 3: {segments}"
        )));
    }
    if let Some(flat_z) = footprint.flat_z {
        let deepest = profile.iter().map(|p| footprint.radius - p.x).fold(f64::NEG_INFINITY, f64::max);
        if flat_z - deepest <= EPSILON {
            return Err(SculptureError::compute(format!(
                "revolve flat at z {flat_z} does not clear an inset of {deepest}"
            )));
        }
    }

    let n = profile.len();
    let steps = segments as usize;
    let mut mesh = Mesh::with_capacity(n * steps, n * steps * 2);

    for step in 0..steps {
        let theta = 2.0 * PI * step as f64 / steps as f64;
        let (sin, cos) = theta.sin_cos();
        for p in profile {
            let reach = footprint.reach(footprint.radius - p.x, theta);
            mesh.add_vertex(DVec3::new(reach * cos, p.y, -reach * sin));
        }
    }

    for step in 0..steps {
        let base = step * n;
        let next = ((step + 1) % steps) * n;
        for i in 0..n {
            let j = (i + 1) % n;
            mesh.add_triangle((base + i) as u32, (next + i) as u32, (next + j) as u32);
            mesh.add_triangle((base + i) as u32, (next + j) as u32, (base + j) as u32);
        }
    }

    Ok(mesh)
}

/// Torus around the vertical axis whose outer edge follows `footprint`.
///
/// `minor` is the tube radius and `center_y` the height of the tube
/// centre; the tube centre runs `minor` inside the footprint.
pub fn torus(footprint: Footprint, minor: f64, center_y: f64, segments: u32, tube_segments: u32) -> SculptureResult<Mesh> {
    let major = footprint.radius - minor;
    if !(minor > 0.0 && major > minor) {
        return Err(SculptureError::compute(format!(
            "torus radii invalid: major {major}, minor {minor}"
        )));
    }
    let tube_segments = tube_segments.max(3);
    let profile: Vec<DVec2> = (0..tube_segments)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / tube_segments as f64;
            DVec2::new(major + minor * angle.cos(), center_y + minor * angle.sin())
        })
        .collect();
    revolve(&profile, footprint, segments)
}
