//! # Route Data
//!
//! Geographic route input: ordered points, bounds and summary statistics.
//! Route data is read-only for the whole pipeline.

use config::constants::EARTH_RADIUS_M;
use serde::{Deserialize, Serialize};

/// A single GPS sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Elevation in metres, if recorded
    #[serde(default)]
    pub elevation: Option<f64>,
    /// Unix timestamp in milliseconds, if recorded
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl RoutePoint {
    /// Creates a point with an elevation and no timestamp.
    pub fn new(lat: f64, lon: f64, elevation: Option<f64>) -> Self {
        Self {
            lat,
            lon,
            elevation,
            timestamp: None,
        }
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Smallest box containing every point; all zeros for an empty slice.
    pub fn from_points(points: &[RoutePoint]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        points.iter().skip(1).fold(
            Self {
                min_lat: first.lat,
                max_lat: first.lat,
                min_lon: first.lon,
                max_lon: first.lon,
            },
            |b, p| Self {
                min_lat: b.min_lat.min(p.lat),
                max_lat: b.max_lat.max(p.lat),
                min_lon: b.min_lon.min(p.lon),
                max_lon: b.max_lon.max(p.lon),
            },
        )
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

/// Summary statistics of a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteStats {
    /// Great-circle length in metres
    pub distance_m: f64,
    /// Sum of positive elevation steps in metres
    pub elevation_gain_m: f64,
    /// Sum of negative elevation steps in metres (positive number)
    pub elevation_loss_m: f64,
    /// Lowest recorded elevation, if any point has one
    pub min_elevation_m: Option<f64>,
    /// Highest recorded elevation, if any point has one
    pub max_elevation_m: Option<f64>,
}

/// An ordered GPS track with its bounds and statistics.
///
/// Insertion order is path order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteData {
    pub points: Vec<RoutePoint>,
    pub stats: RouteStats,
    pub bounds: GeoBounds,
}

impl RouteData {
    /// Builds route data from raw points, computing bounds and statistics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sculpture_mesh::{RouteData, RoutePoint};
    ///
    /// let route = RouteData::from_points(vec![
    ///     RoutePoint::new(46.0, 7.0, Some(1000.0)),
    ///     RoutePoint::new(46.01, 7.0, Some(1100.0)),
    /// ]);
    /// assert_eq!(route.stats.elevation_gain_m, 100.0);
    /// assert!(route.stats.distance_m > 1000.0);
    /// ```
    pub fn from_points(points: Vec<RoutePoint>) -> Self {
        let bounds = GeoBounds::from_points(&points);
        let stats = compute_stats(&points);
        Self {
            points,
            stats,
            bounds,
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the route has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Elevation range used to normalize heights: the recorded min/max, or
    /// zero when no point carries an elevation.
    pub fn elevation_range(&self) -> (f64, f64) {
        match (self.stats.min_elevation_m, self.stats.max_elevation_m) {
            (Some(min), Some(max)) => (min, max),
            _ => (0.0, 0.0),
        }
    }
}

fn compute_stats(points: &[RoutePoint]) -> RouteStats {
    let mut stats = RouteStats::default();

    for pair in points.windows(2) {
        stats.distance_m += haversine_m(&pair[0], &pair[1]);
        if let (Some(a), Some(b)) = (pair[0].elevation, pair[1].elevation) {
            let step = b - a;
            if step > 0.0 {
                stats.elevation_gain_m += step;
            } else {
                stats.elevation_loss_m -= step;
            }
        }
    }

    for elevation in points.iter().filter_map(|p| p.elevation) {
        stats.min_elevation_m = Some(stats.min_elevation_m.map_or(elevation, |m| m.min(elevation)));
        stats.max_elevation_m = Some(stats.max_elevation_m.map_or(elevation, |m| m.max(elevation)));
    }

    stats
}

/// Great-circle distance between two points in metres.
pub fn haversine_m(a: &RoutePoint, b: &RoutePoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}
