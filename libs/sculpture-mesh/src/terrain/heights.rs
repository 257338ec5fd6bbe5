//! Height shaping shared by preview and export.
//!
//! Everything that turns a sampled elevation into a terrain height lives
//! here as pure functions over [`Dimensions`], so both render paths use the
//! same formulas and only the quality preset differs.

use crate::elevation::ElevationGrid;
use crate::normalize::Projection;
use crate::polyline::{Nearest, RoutePolyline};
use crate::sculpture::Dimensions;
use config::constants::{ENGRAVE_FALLOFF_EXPONENT, GAUSSIAN_KERNEL_3X3, TERRAIN_TRIM_FRACTION};
use glam::{DVec2, DVec3};
use std::f64::consts::PI;

/// How the route deforms the terrain around it.
#[derive(Debug, Clone)]
pub enum RouteInfluence<'a> {
    /// No route adjustment
    None,
    /// Terrain yields below the tube; the polyline is the sampled tube
    /// centreline with route heights
    Raised(RoutePolyline<'a>),
    /// Terrain blends into a valley and carries a groove
    Engraved(RoutePolyline<'a>),
}

/// Raw relief heights for grid positions.
///
/// Uses the nearest elevation cell when a grid is supplied, otherwise the
/// height of the nearest route point.
pub fn sample_heights(
    positions: &[DVec2],
    projection: &Projection,
    elevation: Option<&ElevationGrid>,
    route_points: &[DVec3],
) -> Vec<f64> {
    match elevation {
        Some(grid) => positions
            .iter()
            .map(|p| projection.sample_grid(grid, p.x, p.y))
            .collect(),
        None => positions
            .iter()
            .map(|p| nearest_route_height(*p, route_points))
            .collect(),
    }
}

fn nearest_route_height(p: DVec2, route_points: &[DVec3]) -> f64 {
    route_points
        .iter()
        .map(|r| (p.distance_squared(DVec2::new(r.x, r.z)), r.y))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map_or(0.0, |(_, y)| y)
}

/// Applies the 3×3 Gaussian kernel `passes` times to a `size × size`
/// row-major grid. Border rows and columns are left untouched.
pub fn smooth(heights: &mut [f64], size: usize, passes: u32) {
    if size < 3 {
        return;
    }
    let mut scratch = heights.to_vec();
    for _ in 0..passes {
        for row in 1..size - 1 {
            for col in 1..size - 1 {
                let mut sum = 0.0;
                for (kr, kernel_row) in GAUSSIAN_KERNEL_3X3.iter().enumerate() {
                    for (kc, weight) in kernel_row.iter().enumerate() {
                        sum += weight * heights[(row + kr - 1) * size + col + kc - 1];
                    }
                }
                scratch[row * size + col] = sum;
            }
        }
        heights.copy_from_slice(&scratch);
    }
}

/// Final height of a terrain vertex at `(x, z)` from its smoothed sample.
///
/// Order: ceiling clamp, route clearance, groove, floor clamp. The result
/// is always within `[min_terrain_height, max_height]`.
pub fn shape_height(sampled: f64, x: f64, z: f64, route: &RouteInfluence<'_>, dims: &Dimensions) -> f64 {
    let mut height = sampled.min(dims.max_height);

    match route {
        RouteInfluence::None => {}
        RouteInfluence::Raised(line) => {
            // Crossings and switchbacks put several segments overhead.
            for segment in line.within(x, z, dims.clearance_radius) {
                height = height.min(tube_ceiling(&segment, dims));
            }
        }
        RouteInfluence::Engraved(line) => {
            let half_groove = dims.groove_width / 2.0;
            let reach = dims.clearance_radius.max(half_groove);
            if let Some(nearest) = line.nearest_within(x, z, reach) {
                if dims.clearance_radius > 0.0 && nearest.distance < dims.clearance_radius {
                    let falloff = (nearest.distance / dims.clearance_radius).powf(ENGRAVE_FALLOFF_EXPONENT);
                    height = nearest.height + (height - nearest.height) * falloff;
                }
                if half_groove > 0.0 && nearest.distance < half_groove {
                    height -= dims.groove_depth * groove_profile(nearest.distance / half_groove);
                }
            }
        }
    }

    height.max(dims.min_terrain_height)
}

/// Highest terrain height that stays clear of one tube segment.
///
/// A tube of radius `r` around a centreline rising at slope `s` reaches
/// `r * sqrt(1 + s^2)` below it, bounded here by `r * (1 + s)`. It never
/// reaches more than `r` below its lower end, which caps the slope term
/// for near-vertical segments.
fn tube_ceiling(segment: &Nearest, dims: &Dimensions) -> f64 {
    let sloped = dims.clearance_ceiling(segment.height) - dims.tube_radius * segment.slope;
    sloped.max(dims.clearance_ceiling(segment.low))
}

/// Raised-cosine groove depth fraction: 1 on the centreline, 0 at the edge.
#[inline]
pub fn groove_profile(fraction: f64) -> f64 {
    let taper = 0.5 * (1.0 - (PI * fraction.clamp(0.0, 1.0)).cos());
    1.0 - taper
}

/// Pulls a vertex outside the disc trim radius onto it at height 0.
/// Returns `true` if the vertex was trimmed.
pub fn trim_to_disc(vertex: &mut DVec3, radius: f64) -> bool {
    let trim = radius * TERRAIN_TRIM_FRACTION;
    let r = DVec2::new(vertex.x, vertex.z).length();
    if r <= trim {
        return false;
    }
    let scale = trim / r;
    *vertex = DVec3::new(vertex.x * scale, 0.0, vertex.z * scale);
    true
}
