//! # Sphere Primitive
//!
//! Latitude/longitude sphere around the vertical axis.

use crate::error::{SculptureError, SculptureResult};
use crate::mesh::Mesh;
use glam::DVec3;
use std::f64::consts::PI;

/// Creates a sphere centred at `center`.
///
/// Rings sit at polar angles `π (i + 0.5) / rings` with no pole vertices;
/// the first and last rings are closed by polygon fans.
pub fn sphere(center: DVec3, radius: f64, segments: u32) -> SculptureResult<Mesh> {
    if !(radius > 0.0) {
        return Err(SculptureError::compute(format!(
            "sphere radius must be positive: {radius}"
        )));
    }
    if segments < 3 {
        return Err(SculptureError::compute(format!(
            "sphere segments must be at least 3: {segments}"
        )));
    }

    let num_rings = ((segments + 1) / 2).max(2);
    let mut mesh = Mesh::with_capacity(
        (num_rings * segments) as usize,
        (num_rings * segments * 2) as usize,
    );

    let rings: Vec<Vec<u32>> = (0..num_rings)
        .map(|i| {
            // Polar angle from +y
            let phi = PI * (i as f64 + 0.5) / num_rings as f64;
            let ring_radius = radius * phi.sin();
            let y = radius * phi.cos();
            (0..segments)
                .map(|j| {
                    let theta = 2.0 * PI * j as f64 / segments as f64;
                    mesh.add_vertex(
                        center + DVec3::new(ring_radius * theta.cos(), y, -ring_radius * theta.sin()),
                    )
                })
                .collect()
        })
        .collect();

    let n = segments as usize;

    let top = &rings[0];
    for j in 1..n - 1 {
        mesh.add_triangle(top[0], top[j], top[j + 1]);
    }

    for pair in rings.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        for j in 0..n {
            let k = (j + 1) % n;
            mesh.add_triangle(upper[j], lower[j], lower[k]);
            mesh.add_triangle(upper[j], lower[k], upper[k]);
        }
    }

    let bottom = &rings[rings.len() - 1];
    for j in 1..n - 1 {
        mesh.add_triangle(bottom[0], bottom[j + 1], bottom[j]);
    }

    Ok(mesh)
}
