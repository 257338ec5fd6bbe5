//! # Base
//!
//! Platform under the terrain, occupying `y ∈ [-base_height, 0]`, plus an
//! optional rim on its top face.
//!
//! - Circular: a cylinder, a torus ring at the outer edge and a thin
//!   annulus covering the top between the terrain disc and the ring. With a
//!   text plaque the cylinder is cut flat where the plaque's back rests,
//!   and the ring and annulus follow the flat.
//! - Rectangular: a box and four non-overlapping frame boxes.
//!
//! Config-driven only; nothing here reads route data.

use crate::error::SculptureResult;
use crate::mesh::Mesh;
use crate::primitives::{circle_outline, clip_outline, cuboid, cylinder, prism, revolve, torus, Footprint};
use crate::sculpture::{Dimensions, Shape};
use crate::text::PlaquePlacement;
use config::constants::{
    mm_to_scene, ANNULUS_THICKNESS_MM, BASE_CIRCLE_SEGMENTS, RIM_TUBE_SEGMENTS,
    TERRAIN_TRIM_FRACTION,
};
use glam::{DVec2, DVec3};
use tracing::debug;

/// Platform and rim, each made of closed solids.
#[derive(Debug, Clone)]
pub struct BaseMesh {
    pub platform: Mesh,
    /// Empty when the rim height is zero
    pub rim: Mesh,
}

impl BaseMesh {
    /// Platform and rim as one mesh.
    pub fn combined(&self) -> Mesh {
        let mut mesh = self.platform.clone();
        mesh.merge(&self.rim);
        mesh
    }
}

/// Builds the base for `dims.shape`, leaving room for `plaque` if given.
///
/// # Errors
///
/// Returns [`crate::SculptureError::Compute`] if a primitive is degenerate.
pub fn build_base(dims: &Dimensions, plaque: Option<&PlaquePlacement>) -> SculptureResult<BaseMesh> {
    let mut base = match dims.shape {
        Shape::Circular => circular(dims, plaque)?,
        Shape::Rectangular => rectangular(dims)?,
    };
    base.platform.compute_normals();
    base.rim.compute_normals();
    debug!(
        shape = ?dims.shape,
        platform = base.platform.triangle_count(),
        rim = base.rim.triangle_count(),
        "built base"
    );
    Ok(base)
}

fn circular(dims: &Dimensions, plaque: Option<&PlaquePlacement>) -> SculptureResult<BaseMesh> {
    let radius = dims.radius;
    let platform = match plaque {
        Some(plaque) => {
            let circle = circle_outline(radius, BASE_CIRCLE_SEGMENTS);
            let outline = clip_outline(&circle, plaque.back_z());
            prism(&outline, -dims.base_height, 0.0)?
        }
        None => cylinder(radius, -dims.base_height, 0.0, BASE_CIRCLE_SEGMENTS)?,
    };

    let footprint = match plaque {
        Some(plaque) => Footprint::with_flat(radius, plaque.back_z()),
        None => Footprint::circle(radius),
    };

    let mut rim = Mesh::new();
    if dims.rim_height > 0.0 {
        let minor = dims.rim_height / 2.0;
        rim.merge(&torus(footprint, minor, minor, BASE_CIRCLE_SEGMENTS, RIM_TUBE_SEGMENTS)?);

        let inner = radius * TERRAIN_TRIM_FRACTION;
        let outer = radius - minor;
        if inner < outer {
            let thickness = mm_to_scene(ANNULUS_THICKNESS_MM);
            let profile = [
                DVec2::new(inner, 0.0),
                DVec2::new(outer, 0.0),
                DVec2::new(outer, thickness),
                DVec2::new(inner, thickness),
            ];
            rim.merge(&revolve(&profile, footprint, BASE_CIRCLE_SEGMENTS)?);
        }
    }

    Ok(BaseMesh { platform, rim })
}

fn rectangular(dims: &Dimensions) -> SculptureResult<BaseMesh> {
    let r = dims.radius;
    let platform = cuboid(DVec3::new(-r, -dims.base_height, -r), DVec3::new(r, 0.0, r))?;

    let mut rim = Mesh::new();
    let (w, h) = (dims.rim_frame_width, dims.rim_height);
    if h > 0.0 && w > 0.0 {
        // North and south span the full width; east and west fit between.
        let bars = [
            (DVec3::new(-r, 0.0, -r), DVec3::new(r, h, -r + w)),
            (DVec3::new(-r, 0.0, r - w), DVec3::new(r, h, r)),
            (DVec3::new(-r, 0.0, -r + w), DVec3::new(-r + w, h, r - w)),
            (DVec3::new(r - w, 0.0, -r + w), DVec3::new(r, h, r - w)),
        ];
        for (min, max) in bars {
            rim.merge(&cuboid(min, max)?);
        }
    }

    Ok(BaseMesh { platform, rim })
}
