//! # Terrain
//!
//! Height-displaced grid surface covering the sculpture footprint.
//!
//! ## Pipeline
//!
//! 1. Sample the elevation grid (nearest cell) or the nearest route point
//! 2. Gaussian smoothing, borders untouched
//! 3. [`shape_height`]: ceiling clamp, route clearance, groove, floor clamp
//! 4. Circular trim onto the disc edge at height 0
//! 5. Collapsed triangles removed, normals recomputed
//!
//! [`TerrainMesh::solid`] closes the surface with perimeter walls and a flat
//! underside at `y = 0` for export.

mod heights;

#[cfg(test)]
mod tests;

pub use heights::{groove_profile, sample_heights, shape_height, smooth, trim_to_disc, RouteInfluence};

use crate::elevation::ElevationGrid;
use crate::error::{SculptureError, SculptureResult};
use crate::grid::{close_surface, remove_collapsed, Grid};
use crate::mesh::Mesh;
use crate::normalize::Projection;
use crate::sculpture::{Dimensions, Shape};
use glam::{DVec2, DVec3};
use tracing::debug;

/// Inputs the terrain samples heights from.
#[derive(Debug, Clone, Copy)]
pub struct TerrainSource<'a> {
    pub projection: &'a Projection,
    pub elevation: Option<&'a ElevationGrid>,
    /// Normalized, simplified route points used when no grid is supplied
    pub route_points: &'a [DVec3],
}

/// Terrain surface plus what is needed to close it.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    /// Displaced surface; collapsed disc-edge triangles removed
    pub surface: Mesh,
    /// Grid quads per side
    pub resolution: u32,
    /// Triangles dropped by the circular trim
    pub collapsed: usize,
    /// Vertices pulled onto the disc edge
    pub trimmed: usize,
    /// Grid perimeter in surface-boundary order
    perimeter: Vec<u32>,
}

impl TerrainMesh {
    /// Triangles in the displaced surface.
    pub fn surface_triangle_count(&self) -> usize {
        self.surface.triangle_count()
    }

    /// Closes the surface into a solid: walls from the perimeter down to
    /// `y = 0` and a flat underside with reversed winding.
    pub fn solid(&self) -> Mesh {
        close_surface(&self.surface, &self.perimeter, |v| DVec3::new(v.x, 0.0, v.z))
    }
}

/// Builds the terrain surface.
///
/// # Errors
///
/// Returns [`SculptureError::Compute`] if every triangle collapses.
pub fn build_terrain(
    source: &TerrainSource<'_>,
    route: &RouteInfluence<'_>,
    dims: &Dimensions,
) -> SculptureResult<TerrainMesh> {
    let resolution = dims.quality.terrain_resolution.max(2);
    let size = resolution as usize + 1;
    let half = dims.terrain_half_extent;
    let step = 2.0 * half / resolution as f64;

    let positions: Vec<DVec2> = (0..size)
        .flat_map(|row| {
            (0..size).map(move |col| DVec2::new(-half + col as f64 * step, -half + row as f64 * step))
        })
        .collect();

    let mut heights = sample_heights(&positions, source.projection, source.elevation, source.route_points);
    smooth(&mut heights, size, dims.quality.smoothing_passes);

    let mut surface = Mesh::with_capacity(size * size, resolution as usize * resolution as usize * 2);
    let mut uvs = Vec::with_capacity(size * size);
    let mut trimmed = 0;
    for (index, (p, sampled)) in positions.iter().zip(&heights).enumerate() {
        let height = shape_height(*sampled, p.x, p.y, route, dims);
        let mut vertex = DVec3::new(p.x, height, p.y);
        if dims.shape == Shape::Circular && trim_to_disc(&mut vertex, dims.radius) {
            trimmed += 1;
        }
        surface.add_vertex(vertex);
        uvs.push(DVec2::new(
            (index % size) as f64 / resolution as f64,
            (index / size) as f64 / resolution as f64,
        ));
    }

    let grid = Grid::new(size, size);
    grid.add_triangles(&mut surface);

    let collapsed = remove_collapsed(&mut surface);
    if surface.triangle_count() == 0 {
        return Err(SculptureError::compute("terrain surface collapsed entirely"));
    }
    surface.set_uvs(uvs);
    surface.compute_normals();

    debug!(
        resolution,
        triangles = surface.triangle_count(),
        collapsed,
        trimmed,
        "built terrain"
    );

    Ok(TerrainMesh {
        surface,
        resolution,
        collapsed,
        trimmed,
        perimeter: grid.perimeter(),
    })
}
