//! # Mesh Merging and Orientation
//!
//! Concatenates the part solids into one non-indexed mesh and bakes a
//! single rotation about the vertical axis into it.
//!
//! Parts are not welded; coincident vertices at contact surfaces stay
//! duplicated.

use crate::error::{SculptureError, SculptureResult};
use crate::mesh::Mesh;
use crate::sculpture::{Orientation, Shape};
use config::constants::approx_zero;
use glam::{DMat3, DVec2};
use std::f64::consts::FRAC_PI_2;
use tracing::debug;

/// Concatenates `parts` into one non-indexed mesh with facet normals.
///
/// Empty parts are skipped.
///
/// # Errors
///
/// Returns [`SculptureError::Compute`] when no part has any triangles.
pub fn merge_parts<'a>(parts: impl IntoIterator<Item = &'a Mesh>) -> SculptureResult<Mesh> {
    let mut combined = Mesh::new();
    let mut merged = 0usize;
    for part in parts.into_iter().filter(|p| p.triangle_count() > 0) {
        combined.merge(part);
        merged += 1;
    }
    if merged == 0 {
        return Err(SculptureError::compute("merge called with no meshes"));
    }

    let flat = combined.to_non_indexed();
    debug!(
        parts = merged,
        triangles = flat.triangle_count(),
        "merged parts"
    );
    Ok(flat)
}

/// Rotation angle in radians about `+y` for `orientation`.
///
/// `start` is the route start in `(x, z)`. Auto mode turns it towards `+z`
/// and does nothing when the start is missing or at the centre. Rectangular
/// shapes snap to quarter turns so the footprint stays aligned.
pub fn orientation_angle(orientation: Orientation, shape: Shape, start: Option<DVec2>) -> Option<f64> {
    let angle = match orientation {
        Orientation::None => return None,
        Orientation::Fixed { degrees } => degrees.to_radians(),
        Orientation::Auto => {
            let start = start.filter(|s| s.length_squared() > f64::EPSILON)?;
            -start.x.atan2(start.y)
        }
    };
    let angle = match shape {
        Shape::Rectangular => (angle / FRAC_PI_2).round() * FRAC_PI_2,
        Shape::Circular => angle,
    };
    Some(angle)
}

/// Rotates `mesh` in place by `angle` radians about `+y`.
pub fn orient(mesh: &mut Mesh, angle: f64) {
    if approx_zero(angle) {
        return;
    }
    mesh.rotate(&DMat3::from_rotation_y(angle));
    debug!(degrees = angle.to_degrees(), "oriented mesh");
}
