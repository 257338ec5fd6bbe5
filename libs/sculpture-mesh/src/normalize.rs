//! # Route Normalization
//!
//! Maps geographic coordinates into sculpture-local space and back.
//!
//! Longitude maps to `x` (east = +x), latitude to `z` (north = -z), and
//! normalized elevation times the height scale to `y`. The same
//! [`Projection`] is used to sample the elevation grid under each terrain
//! vertex, so route and terrain share one mapping.

use crate::elevation::ElevationGrid;
use crate::route::{GeoBounds, RouteData};
use crate::sculpture::{Dimensions, Shape};
use config::constants::{BOUNDS_PADDING_FRACTION, MIN_BOUNDS_EXTENT_DEG, MIN_ELEVATION_RANGE_M};
use glam::{DVec2, DVec3};

/// Linear mapping between geographic and sculpture-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    center_lon: f64,
    center_lat: f64,
    lon_span: f64,
    lat_span: f64,
    padded_lon_span: f64,
    padded_lat_span: f64,
    /// Width of the square the padded bounds map onto
    extent: f64,
    min_elevation: f64,
    elevation_span: f64,
    height_scale: f64,
}

impl Projection {
    /// Builds the projection for a route's bounds and elevation range.
    ///
    /// Zero-extent bounds are widened to a minimum span around their centre.
    pub fn new(bounds: GeoBounds, elevation_range: (f64, f64), dims: &Dimensions) -> Self {
        let lon_span = bounds.lon_span().max(MIN_BOUNDS_EXTENT_DEG);
        let lat_span = bounds.lat_span().max(MIN_BOUNDS_EXTENT_DEG);
        let (min_elevation, max_elevation) = elevation_range;

        Self {
            center_lon: (bounds.min_lon + bounds.max_lon) / 2.0,
            center_lat: (bounds.min_lat + bounds.max_lat) / 2.0,
            lon_span,
            lat_span,
            padded_lon_span: lon_span * (1.0 + 2.0 * BOUNDS_PADDING_FRACTION),
            padded_lat_span: lat_span * (1.0 + 2.0 * BOUNDS_PADDING_FRACTION),
            extent: dims.terrain_half_extent * 2.0,
            min_elevation,
            elevation_span: (max_elevation - min_elevation).max(MIN_ELEVATION_RANGE_M),
            height_scale: dims.height_scale,
        }
    }

    /// Projection for a route, using its own bounds and elevation statistics.
    pub fn for_route(route: &RouteData, dims: &Dimensions) -> Self {
        Self::new(route.bounds, route.elevation_range(), dims)
    }

    /// Local `(x, z)` of a geographic position.
    pub fn to_local(&self, lat: f64, lon: f64) -> DVec2 {
        DVec2::new(
            (lon - self.center_lon) / self.padded_lon_span * self.extent,
            -(lat - self.center_lat) / self.padded_lat_span * self.extent,
        )
    }

    /// Fractional position `(u, v)` of local `(x, z)` inside the unpadded
    /// route bounds; `u` runs west→east, `v` south→north.
    pub fn to_bounds_fraction(&self, x: f64, z: f64) -> (f64, f64) {
        let lon_offset = x / self.extent * self.padded_lon_span;
        let lat_offset = -z / self.extent * self.padded_lat_span;
        (lon_offset / self.lon_span + 0.5, lat_offset / self.lat_span + 0.5)
    }

    /// Unclamped relief height of an elevation in metres.
    pub fn height(&self, elevation: f64) -> f64 {
        (elevation - self.min_elevation) / self.elevation_span * self.height_scale
    }

    /// Relief height of the nearest grid cell under local `(x, z)`.
    pub fn sample_grid(&self, grid: &ElevationGrid, x: f64, z: f64) -> f64 {
        let (u, v) = self.to_bounds_fraction(x, z);
        self.height(grid.nearest(u, v))
    }
}

/// Pulls a point farther than `radius` from the origin radially onto the
/// circle. Points are never dropped.
#[inline]
pub fn clip_to_circle(point: DVec2, radius: f64) -> DVec2 {
    let distance = point.length();
    if distance > radius {
        point * (radius / distance)
    } else {
        point
    }
}

/// Normalizes route points into sculpture-local `(x, y, z)`.
///
/// `y` is pre-clamped to the maximum terrain height; points without an
/// elevation sit at the route minimum. For circular shapes, points outside
/// the clip radius are rescaled onto it.
///
/// # Example
///
/// ```rust
/// use sculpture_mesh::{normalize_route, Dimensions, QualityPreset, RouteData, RoutePoint, SculptureConfig};
///
/// let route = RouteData::from_points(vec![
///     RoutePoint::new(0.0, 0.0, Some(0.0)),
///     RoutePoint::new(0.01, 0.01, Some(100.0)),
/// ]);
/// let dims = Dimensions::resolve(&SculptureConfig::default(), QualityPreset::Preview).unwrap();
/// let points = normalize_route(&route, &dims);
/// assert_eq!(points.len(), 2);
/// assert!(points.iter().all(|p| p.y <= dims.max_height));
/// ```
pub fn normalize_route(route: &RouteData, dims: &Dimensions) -> Vec<DVec3> {
    let projection = Projection::for_route(route, dims);
    let (min_elevation, _) = route.elevation_range();

    route
        .points
        .iter()
        .map(|p| {
            let mut xz = projection.to_local(p.lat, p.lon);
            if dims.shape == Shape::Circular {
                xz = clip_to_circle(xz, dims.route_clip_radius);
            }
            let height = projection
                .height(p.elevation.unwrap_or(min_elevation))
                .min(dims.max_height);
            DVec3::new(xz.x, height, xz.y)
        })
        .collect()
}
