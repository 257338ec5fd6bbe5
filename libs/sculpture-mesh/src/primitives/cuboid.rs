//! # Cuboid Primitive
//!
//! Axis-aligned box between two corners.

use crate::error::{SculptureError, SculptureResult};
use crate::mesh::Mesh;
use glam::DVec3;

/// Creates an axis-aligned box spanning `min`..`max`.
///
/// Returns a mesh with 8 vertices and 12 triangles (2 per face).
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use sculpture_mesh::primitives::cuboid;
///
/// let mesh = cuboid(DVec3::ZERO, DVec3::ONE).unwrap();
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn cuboid(min: DVec3, max: DVec3) -> SculptureResult<Mesh> {
    let size = max - min;
    if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
        return Err(SculptureError::compute(format!(
            "box extents must be positive: {size:?}"
        )));
    }

    let mut mesh = Mesh::with_capacity(8, 12);

    // Lower layer (y = min.y)
    let v0 = mesh.add_vertex(DVec3::new(min.x, min.y, min.z));
    let v1 = mesh.add_vertex(DVec3::new(max.x, min.y, min.z));
    let v2 = mesh.add_vertex(DVec3::new(max.x, min.y, max.z));
    let v3 = mesh.add_vertex(DVec3::new(min.x, min.y, max.z));

    // Upper layer (y = max.y)
    let v4 = mesh.add_vertex(DVec3::new(min.x, max.y, min.z));
    let v5 = mesh.add_vertex(DVec3::new(max.x, max.y, min.z));
    let v6 = mesh.add_vertex(DVec3::new(max.x, max.y, max.z));
    let v7 = mesh.add_vertex(DVec3::new(min.x, max.y, max.z));

    // Bottom (-y)
    mesh.add_triangle(v0, v1, v2);
    mesh.add_triangle(v0, v2, v3);
    // Top (+y)
    mesh.add_triangle(v4, v6, v5);
    mesh.add_triangle(v4, v7, v6);
    // Back (-z)
    mesh.add_triangle(v0, v4, v5);
    mesh.add_triangle(v0, v5, v1);
    // Front (+z)
    mesh.add_triangle(v3, v2, v6);
    mesh.add_triangle(v3, v6, v7);
    // Left (-x)
    mesh.add_triangle(v0, v3, v7);
    mesh.add_triangle(v0, v7, v4);
    // Right (+x)
    mesh.add_triangle(v1, v5, v6);
    mesh.add_triangle(v1, v6, v2);

    Ok(mesh)
}
