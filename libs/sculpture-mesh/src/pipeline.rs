//! # Sculpture Pipeline
//!
//! Runs every builder for one route and configuration.
//!
//! ```text
//! RouteData ─► normalize ─► simplify ─┬─► route tube (raised) ─┐
//!                                     └─► terrain ◄────────────┘ clearance
//! config ─► text plaque ─► base (cut for the plaque)
//! parts ─► merge ─► orient ─► binary STL
//! ```
//!
//! Preview and export share this code; only the [`QualityPreset`] differs.
//! Each call owns its buffers, so one pipeline can serve concurrent callers
//! that each hold their own inputs.

use crate::base::build_base;
use crate::elevation::ElevationGrid;
use crate::error::{SculptureError, SculptureResult, TextError};
use crate::export::{export_stl, StlExport};
use crate::merge::{merge_parts, orient, orientation_angle};
use crate::mesh::Mesh;
use crate::normalize::{normalize_route, Projection};
use crate::path::build_route_path;
use crate::polyline::RoutePolyline;
use crate::quality::QualityPreset;
use crate::route::RouteData;
use crate::sculpture::{positive, Dimensions, RouteStyle, SculptureConfig};
use crate::simplify::simplify;
use crate::terrain::{build_terrain, RouteInfluence, TerrainSource};
use crate::text::{engrave, TextLayout, TextPlaque, TextRasterizer};
use config::constants::STL_MM_PER_SCENE_UNIT;
use glam::DVec2;
use tracing::{debug, info, warn};

/// Everything one run reads. Nothing here is modified.
#[derive(Debug, Clone, Copy)]
pub struct SculptureInput<'a> {
    pub route: &'a RouteData,
    /// Pre-fetched grid; without one the terrain follows the route heights
    pub elevation: Option<&'a ElevationGrid>,
    pub config: &'a SculptureConfig,
}

/// Individual closed part meshes with normals, for rendering.
#[derive(Debug, Clone)]
pub struct SculptureParts {
    pub dims: Dimensions,
    pub terrain: Mesh,
    /// Triangles of the terrain surface before it was closed
    pub terrain_surface_triangles: usize,
    /// Platform and rim
    pub base: Mesh,
    /// Tube with end caps; `None` for the engraved style
    pub route: Option<Mesh>,
    /// Start and end markers; preview only, never exported
    pub markers: Option<Mesh>,
    pub text: Option<Mesh>,
    /// Route start in `(x, z)`, used for auto orientation
    pub start: Option<DVec2>,
    /// Route points after normalization and simplification
    pub route_points: usize,
}

impl SculptureParts {
    /// Parts by name, markers included.
    pub fn named(&self) -> Vec<(&'static str, &Mesh)> {
        let mut parts = vec![("terrain", &self.terrain), ("base", &self.base)];
        let optional = [
            ("route", self.route.as_ref()),
            ("markers", self.markers.as_ref()),
            ("text", self.text.as_ref()),
        ];
        parts.extend(optional.into_iter().filter_map(|(name, mesh)| mesh.map(|m| (name, m))));
        parts
    }

    /// Parts that make up the printed sculpture.
    pub fn printable(&self) -> Vec<&Mesh> {
        self.named()
            .into_iter()
            .filter(|(name, _)| *name != "markers")
            .map(|(_, mesh)| mesh)
            .collect()
    }
}

/// Sculpture generator for one quality preset.
///
/// # Example
///
/// ```rust
/// use sculpture_mesh::pipeline::{SculptureInput, SculpturePipeline};
/// use sculpture_mesh::{QualityPreset, RouteData, RoutePoint, SculptureConfig};
///
/// let route = RouteData::from_points(vec![
///     RoutePoint::new(46.00, 7.00, Some(1200.0)),
///     RoutePoint::new(46.01, 7.01, Some(1350.0)),
///     RoutePoint::new(46.02, 7.00, Some(1500.0)),
/// ]);
/// let config = SculptureConfig::default();
/// let input = SculptureInput { route: &route, elevation: None, config: &config };
///
/// let export = SculpturePipeline::new(QualityPreset::Preview).export(&input).unwrap();
/// assert_eq!(export.byte_size, 84 + 50 * export.triangle_count);
/// ```
pub struct SculpturePipeline {
    quality: QualityPreset,
    rasterizer: Option<Box<dyn TextRasterizer>>,
    stl_scale: f64,
}

impl std::fmt::Debug for SculpturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SculpturePipeline")
            .field("quality", &self.quality)
            .field("rasterizer", &self.rasterizer.is_some())
            .field("stl_scale", &self.stl_scale)
            .finish()
    }
}

impl SculpturePipeline {
    pub fn new(quality: QualityPreset) -> Self {
        Self {
            quality,
            rasterizer: None,
            stl_scale: STL_MM_PER_SCENE_UNIT,
        }
    }

    /// Enables text plaques. Without a rasterizer, text is skipped.
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn TextRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Output millimetres per scene unit in the STL file.
    ///
    /// # Errors
    ///
    /// Returns [`SculptureError::Config`] unless `scale` is finite and
    /// positive; a negative scale would mirror the solid inside out.
    pub fn with_stl_scale(mut self, scale: f64) -> SculptureResult<Self> {
        positive("stl_scale", scale)?;
        self.stl_scale = scale;
        Ok(self)
    }

    pub fn quality(&self) -> QualityPreset {
        self.quality
    }

    /// Builds every part without merging.
    ///
    /// # Errors
    ///
    /// - [`SculptureError::Config`] for an invalid configuration
    /// - [`SculptureError::Input`] for fewer than 2 route points or a
    ///   non-finite coordinate
    /// - [`SculptureError::Compute`] if a builder produces no geometry
    ///
    /// Text failures are logged and leave `text` empty.
    pub fn build_parts(&self, input: &SculptureInput<'_>) -> SculptureResult<SculptureParts> {
        let dims = Dimensions::resolve(input.config, self.quality)?;
        let route = input.route;
        check_route(route)?;

        let normalized = normalize_route(route, &dims);
        let points = simplify(&normalized, dims.quality.max_route_points);
        debug!(
            input = route.len(),
            simplified = points.len(),
            quality = %self.quality,
            "normalized route"
        );

        let path = match dims.route_style {
            RouteStyle::Raised => Some(build_route_path(&points, &dims)?),
            RouteStyle::Engraved => None,
        };
        let influence = match &path {
            Some(path) => RouteInfluence::Raised(RoutePolyline::new(&path.samples)),
            None => RouteInfluence::Engraved(RoutePolyline::new(&points)),
        };

        let projection = Projection::for_route(route, &dims);
        let source = TerrainSource {
            projection: &projection,
            elevation: input.elevation,
            route_points: &points,
        };
        let terrain = build_terrain(&source, &influence, &dims)?;

        let plaque = self.text_plaque(input.config, &dims);
        let base = build_base(&dims, plaque.as_ref().map(|p| &p.placement))?;

        let start = match &path {
            Some(path) => path.samples.first(),
            None => points.first(),
        }
        .map(|p| DVec2::new(p.x, p.z));

        let (route_mesh, markers) = match path {
            Some(path) => {
                let mut solid = path.solid();
                solid.compute_normals();
                let mut markers = path.start_marker;
                markers.merge(&path.end_marker);
                markers.compute_normals();
                (Some(solid), Some(markers))
            }
            None => (None, None),
        };

        Ok(SculptureParts {
            dims,
            terrain: terrain.solid(),
            terrain_surface_triangles: terrain.surface_triangle_count(),
            base: base.combined(),
            route: route_mesh,
            markers,
            text: plaque.map(|p| p.mesh),
            start,
            route_points: points.len(),
        })
    }

    fn text_plaque(&self, config: &SculptureConfig, dims: &Dimensions) -> Option<TextPlaque> {
        if !config.text.has_text() {
            return None;
        }
        let layout = TextLayout::from_config(&config.text);
        let result = match &self.rasterizer {
            Some(rasterizer) => engrave(&layout, rasterizer.as_ref(), dims),
            None => Err(TextError::Unavailable),
        };
        match result {
            Ok(plaque) => Some(plaque),
            Err(error) => {
                warn!(%error, "skipping text plaque");
                None
            }
        }
    }

    /// Builds, merges and orients the printable sculpture.
    ///
    /// # Errors
    ///
    /// See [`Self::build_parts`]; merging fails only if every part is empty.
    pub fn build_mesh(&self, input: &SculptureInput<'_>) -> SculptureResult<Mesh> {
        let parts = self.build_parts(input)?;
        let mut mesh = merge_parts(parts.printable())?;
        if let Some(angle) = orientation_angle(input.config.orientation, parts.dims.shape, parts.start) {
            orient(&mut mesh, angle);
        }
        Ok(mesh)
    }

    /// Builds the sculpture and serializes it as binary STL.
    ///
    /// # Errors
    ///
    /// See [`Self::build_mesh`]; serialization adds the triangle limit.
    pub fn export(&self, input: &SculptureInput<'_>) -> SculptureResult<StlExport> {
        let mesh = self.build_mesh(input)?;
        let export = export_stl(&mesh, self.stl_scale)?;
        info!(
            quality = %self.quality,
            vertices = export.vertex_count,
            triangles = export.triangle_count,
            bytes = export.byte_size,
            "exported sculpture"
        );
        Ok(export)
    }
}

/// Rejects routes the projection cannot place.
fn check_route(route: &RouteData) -> SculptureResult<()> {
    if route.len() < 2 {
        return Err(SculptureError::input(format!(
            "route needs at least 2 points, got {}",
            route.len()
        )));
    }
    for (index, point) in route.points.iter().enumerate() {
        let elevation_ok = point.elevation.map_or(true, f64::is_finite);
        if !(point.lat.is_finite() && point.lon.is_finite() && elevation_ok) {
            return Err(SculptureError::input(format!(
                "route point {index} is not finite: lat {}, lon {}, elevation {:?}",
                point.lat, point.lon, point.elevation
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RoutePoint;
    use crate::sculpture::{Orientation, Shape, TextConfig};
    use image::{GrayImage, Luma};

    struct Blank;

    impl TextRasterizer for Blank {
        fn rasterize(&self, _: &TextLayout, w: u32, h: u32) -> Result<GrayImage, TextError> {
            Ok(GrayImage::from_pixel(w, h, Luma([255])))
        }
    }

    fn route() -> RouteData {
        RouteData::from_points(
            (0..20)
                .map(|i| {
                    let t = i as f64 / 19.0;
                    RoutePoint::new(45.0 + 0.01 * t, 6.0 + 0.01 * (t * 3.0).sin(), Some(500.0 + 300.0 * t))
                })
                .collect(),
        )
    }

    fn with_text() -> SculptureConfig {
        SculptureConfig {
            text: TextConfig {
                enabled: true,
                title: "PEAK".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_raised_parts() {
        let route = route();
        let config = SculptureConfig::default();
        let input = SculptureInput {
            route: &route,
            elevation: None,
            config: &config,
        };
        let parts = SculpturePipeline::new(QualityPreset::Preview).build_parts(&input).unwrap();
        let names: Vec<_> = parts.named().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["terrain", "base", "route", "markers"]);
        assert_eq!(parts.printable().len(), 3);
        for (name, mesh) in parts.named() {
            assert!(mesh.normals().is_some(), "{name} has no normals");
        }
    }

    #[test]
    fn test_engraved_has_no_tube() {
        let route = route();
        let config = SculptureConfig {
            route_style: RouteStyle::Engraved,
            ..Default::default()
        };
        let input = SculptureInput {
            route: &route,
            elevation: None,
            config: &config,
        };
        let parts = SculpturePipeline::new(QualityPreset::Preview).build_parts(&input).unwrap();
        assert!(parts.route.is_none());
        assert!(parts.markers.is_none());
        assert!(parts.start.is_some());
    }

    #[test]
    fn test_text_without_rasterizer_is_skipped() {
        let route = route();
        let config = with_text();
        let input = SculptureInput {
            route: &route,
            elevation: None,
            config: &config,
        };
        let parts = SculpturePipeline::new(QualityPreset::Preview).build_parts(&input).unwrap();
        assert!(parts.text.is_none());
    }

    #[test]
    fn test_text_with_rasterizer() {
        let route = route();
        let config = with_text();
        let input = SculptureInput {
            route: &route,
            elevation: None,
            config: &config,
        };
        let pipeline = SculpturePipeline::new(QualityPreset::Preview).with_rasterizer(Box::new(Blank));
        let parts = pipeline.build_parts(&input).unwrap();
        assert!(parts.text.is_some());
        assert_eq!(parts.printable().len(), 4);
    }

    #[test]
    fn test_route_too_short() {
        let route = RouteData::from_points(vec![RoutePoint::new(0.0, 0.0, None)]);
        let config = SculptureConfig::default();
        let input = SculptureInput {
            route: &route,
            elevation: None,
            config: &config,
        };
        let err = SculpturePipeline::new(QualityPreset::Preview).export(&input).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_non_finite_coordinates_are_input_errors() {
        let config = SculptureConfig::default();
        let pipeline = SculpturePipeline::new(QualityPreset::Preview);
        let bad = [
            RoutePoint::new(f64::NAN, 6.0, None),
            RoutePoint::new(45.0, f64::INFINITY, None),
            RoutePoint::new(45.0, 6.0, Some(f64::NEG_INFINITY)),
        ];
        for point in bad {
            let mut points = route().points;
            points[3] = point;
            let route = RouteData::from_points(points);
            let input = SculptureInput {
                route: &route,
                elevation: None,
                config: &config,
            };
            let err = pipeline.build_parts(&input).unwrap_err();
            assert!(err.is_input_error(), "{err}");
            assert!(err.to_string().contains("route point 3"));
        }
    }

    #[test]
    fn test_bad_config_is_config_error() {
        let route = route();
        let config = SculptureConfig {
            size_cm: -1.0,
            ..Default::default()
        };
        let input = SculptureInput {
            route: &route,
            elevation: None,
            config: &config,
        };
        let err = SculpturePipeline::new(QualityPreset::Preview).export(&input).unwrap_err();
        assert!(matches!(err, SculptureError::Config(_)));
    }

    #[test]
    fn test_oversized_rim_is_config_error() {
        let route = route();
        let config = SculptureConfig {
            size_cm: 7.0,
            rim_height_mm: 80.0,
            ..Default::default()
        };
        let input = SculptureInput {
            route: &route,
            elevation: None,
            config: &config,
        };
        let err = SculpturePipeline::new(QualityPreset::Preview).export(&input).unwrap_err();
        assert!(matches!(err, SculptureError::Config(_)), "{err}");
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_stl_scale_must_be_positive() {
        for scale in [-1.0, 0.0, f64::NAN] {
            let err = SculpturePipeline::new(QualityPreset::Preview)
                .with_stl_scale(scale)
                .unwrap_err();
            assert!(matches!(err, SculptureError::Config(_)), "scale {scale} accepted");
        }

        let route = route();
        let config = SculptureConfig::default();
        let input = SculptureInput {
            route: &route,
            elevation: None,
            config: &config,
        };
        let pipeline = SculpturePipeline::new(QualityPreset::Preview).with_stl_scale(10.0).unwrap();
        let export = pipeline.export(&input).unwrap();
        assert_eq!(export.byte_size, 84 + 50 * export.triangle_count);
    }

    #[test]
    fn test_rectangular_orientation_keeps_footprint() {
        let route = route();
        let config = SculptureConfig {
            shape: Shape::Rectangular,
            orientation: Orientation::Auto,
            ..Default::default()
        };
        let input = SculptureInput {
            route: &route,
            elevation: None,
            config: &config,
        };
        let pipeline = SculpturePipeline::new(QualityPreset::Preview);
        let dims = pipeline.build_parts(&input).unwrap().dims;
        let (min, max) = pipeline.build_mesh(&input).unwrap().bounding_box();
        let r = dims.radius + 1e-9;
        assert!(min.x >= -r && max.x <= r && min.z >= -r && max.z <= r);
    }
}
