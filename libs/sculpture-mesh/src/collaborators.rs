//! External data sources behind traits.
//!
//! The pipeline itself never fetches or parses; hosts supply an elevation
//! provider and a route parser. In-memory implementations back tests and
//! batch tools.

use crate::elevation::ElevationGrid;
use crate::error::{SculptureError, SculptureResult};
use crate::quality::QualityPreset;
use crate::route::{GeoBounds, RouteData, RoutePoint};

/// Supplies an elevation grid covering route bounds.
pub trait ElevationProvider {
    /// Fetches a grid of about `resolution × resolution` samples over
    /// `bounds`. `quality` lets a provider pick a cheaper source for preview.
    ///
    /// # Errors
    ///
    /// Returns [`SculptureError::Input`] if no grid can be produced.
    fn fetch(&self, bounds: GeoBounds, resolution: u32, quality: QualityPreset) -> SculptureResult<ElevationGrid>;
}

/// Turns a raw track file into route data.
pub trait RouteParser {
    /// # Errors
    ///
    /// Returns [`SculptureError::Input`] if the bytes are not a route.
    fn parse(&self, bytes: &[u8]) -> SculptureResult<RouteData>;
}

/// Provider that always returns the same pre-fetched grid.
#[derive(Debug, Clone)]
pub struct StaticElevation {
    grid: ElevationGrid,
}

impl StaticElevation {
    pub fn new(grid: ElevationGrid) -> Self {
        Self { grid }
    }
}

impl ElevationProvider for StaticElevation {
    fn fetch(&self, _bounds: GeoBounds, _resolution: u32, _quality: QualityPreset) -> SculptureResult<ElevationGrid> {
        Ok(self.grid.clone())
    }
}

/// Parses a JSON array of route points, or a full [`RouteData`] document.
///
/// Bounds and statistics are always recomputed from the points.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRouteParser;

impl RouteParser for JsonRouteParser {
    fn parse(&self, bytes: &[u8]) -> SculptureResult<RouteData> {
        if let Ok(points) = serde_json::from_slice::<Vec<RoutePoint>>(bytes) {
            return Ok(RouteData::from_points(points));
        }
        serde_json::from_slice::<RouteData>(bytes)
            .map(|route| RouteData::from_points(route.points))
            .map_err(|e| SculptureError::input(format!("Invalid route JSON: {e}")))
    }
}
