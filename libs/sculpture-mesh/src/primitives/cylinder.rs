//! # Cylinder and Prism Primitives
//!
//! Vertical extrusions of convex outlines in the `(x, z)` plane.

use crate::error::{SculptureError, SculptureResult};
use crate::mesh::Mesh;
use glam::{DVec2, DVec3};
use std::f64::consts::PI;

/// Regular polygon approximating a circle, counter-clockwise seen from
/// above. Outline points are `(x, z)`.
pub fn circle_outline(radius: f64, segments: u32) -> Vec<DVec2> {
    (0..segments)
        .map(|j| {
            let theta = 2.0 * PI * j as f64 / segments as f64;
            DVec2::new(radius * theta.cos(), -radius * theta.sin())
        })
        .collect()
}

/// Cuts a convex outline with the half-plane `z <= max_z`, keeping order.
pub fn clip_outline(outline: &[DVec2], max_z: f64) -> Vec<DVec2> {
    let n = outline.len();
    let mut clipped = Vec::with_capacity(n + 1);
    for i in 0..n {
        let (a, b) = (outline[i], outline[(i + 1) % n]);
        let (a_in, b_in) = (a.y <= max_z, b.y <= max_z);
        if a_in {
            clipped.push(a);
        }
        if a_in != b_in {
            let t = (max_z - a.y) / (b.y - a.y);
            clipped.push(DVec2::new(a.x + (b.x - a.x) * t, max_z));
        }
    }
    clipped
}

/// Extrudes a convex outline from `bottom` to `top` in `y`, capped.
///
/// The outline must wind counter-clockwise seen from above, as
/// [`circle_outline`] does.
pub fn prism(outline: &[DVec2], bottom: f64, top: f64) -> SculptureResult<Mesh> {
    if !(top > bottom) {
        return Err(SculptureError::compute(format!(
            "prism height must be positive: {bottom}..{top}"
        )));
    }
    if outline.len() < 3 {
        return Err(SculptureError::compute(format!(
            "prism outline needs at least 3 points, got {}",
            outline.len()
        )));
    }

    let n = outline.len();
    let mut mesh = Mesh::with_capacity(2 * n, 4 * n);

    let mut ring = |y: f64| -> Vec<u32> {
        outline
            .iter()
            .map(|p| mesh.add_vertex(DVec3::new(p.x, y, p.y)))
            .collect()
    };
    let lower = ring(bottom);
    let upper = ring(top);

    for j in 0..n {
        let k = (j + 1) % n;
        mesh.add_triangle(lower[j], lower[k], upper[k]);
        mesh.add_triangle(lower[j], upper[k], upper[j]);
    }

    for j in 1..n - 1 {
        mesh.add_triangle(lower[0], lower[j + 1], lower[j]);
        mesh.add_triangle(upper[0], upper[j], upper[j + 1]);
    }

    Ok(mesh)
}

/// Creates a capped cylinder of `radius` spanning `bottom..top` in `y`.
///
/// # Example
///
/// ```rust
/// use sculpture_mesh::primitives::cylinder;
///
/// let mesh = cylinder(1.0, -0.1, 0.0, 32).unwrap();
/// assert_eq!(mesh.vertex_count(), 64);
/// assert_eq!(mesh.open_edge_count(), 0);
/// ```
pub fn cylinder(radius: f64, bottom: f64, top: f64, segments: u32) -> SculptureResult<Mesh> {
    if !(radius > 0.0) {
        return Err(SculptureError::compute(format!(
            "cylinder radius must be positive: {radius}"
        )));
    }
    if segments < 3 {
        return Err(SculptureError::compute(format!(
            "cylinder segments must be at least 3: {segments}"
        )));
    }
    prism(&circle_outline(radius, segments), bottom, top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cylinder_bounds() {
        let mesh = cylinder(2.0, -1.0, 0.0, 64).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(max.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(max.x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_is_closed_and_outward() {
        let mut mesh = cylinder(1.0, -0.5, 0.5, 24).unwrap();
        assert_eq!(mesh.open_edge_count(), 0);
        mesh.compute_normals();
        for (v, n) in mesh.vertices().iter().zip(mesh.normals().unwrap()) {
            assert!(v.dot(*n) > 0.0);
        }
    }

    #[test]
    fn test_cylinder_rejects_inverted_span() {
        assert!(cylinder(1.0, 0.0, 0.0, 16).is_err());
        assert!(cylinder(1.0, 1.0, 0.0, 16).is_err());
        assert!(cylinder(-1.0, 0.0, 1.0, 16).is_err());
    }

    #[test]
    fn test_clip_outline_adds_flat() {
        let circle = circle_outline(1.0, 64);
        let clipped = clip_outline(&circle, 0.8);
        assert!(clipped.iter().all(|p| p.y <= 0.8 + 1e-12));
        let flat: Vec<&DVec2> = clipped.iter().filter(|p| (p.y - 0.8).abs() < 1e-12).collect();
        assert_eq!(flat.len(), 2);
        assert!(clipped.iter().all(|p| p.length() <= 1.0 + 1e-12));
    }

    #[test]
    fn test_clipped_prism_is_closed() {
        let outline = clip_outline(&circle_outline(1.0, 32), 0.5);
        let mesh = prism(&outline, -0.2, 0.0).unwrap();
        assert_eq!(mesh.open_edge_count(), 0);
        let (_, max) = mesh.bounding_box();
        assert_relative_eq!(max.z, 0.5, epsilon = 1e-12);
    }
}
