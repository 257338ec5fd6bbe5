//! # Sculpture Configuration
//!
//! User-facing settings ([`SculptureConfig`]) and the derived scene-space
//! measurements ([`Dimensions`]) every builder reads.
//!
//! `size` is in centimetres, every other length in millimetres. Scene units
//! are `size / 10` across, so one scene unit is 100 mm.

use crate::error::ConfigError;
use crate::quality::{QualityParams, QualityPreset};
use config::constants::{
    mm_to_scene, CLEARANCE_SAFETY_MARGIN_MM, END_MARKER_SIZE_FACTOR, GROOVE_DEPTH_FACTOR,
    GROOVE_WIDTH_FACTOR, MAX_RIM_HEIGHT_FRACTION, MAX_ROUTE_THICKNESS_FRACTION,
    MAX_TERRAIN_RESOLUTION, MIN_TERRAIN_HEIGHT_MM, MIN_TERRAIN_RESOLUTION,
    RIM_FRAME_WIDTH_FRACTION, ROUTE_CLIP_FRACTION, SCENE_UNITS_PER_CM,
    START_MARKER_RADIUS_FACTOR,
};
use serde::{Deserialize, Serialize};

/// Footprint of the sculpture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Circular,
    Rectangular,
}

/// Print material. Cosmetic only; no geometry depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Pla,
    Resin,
    Wood,
    Metal,
}

/// How the route is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStyle {
    /// Separate tube above the terrain
    #[default]
    Raised,
    /// Groove carved into the terrain
    Engraved,
}

/// Rotation baked into the merged mesh before export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum Orientation {
    /// Rotate so the route start faces the front (+z)
    #[default]
    Auto,
    /// Rotate by a fixed angle about the vertical axis
    Fixed { degrees: f64 },
    /// Leave the mesh as built
    None,
}

/// Engraved label settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub enabled: bool,
    pub title: String,
    pub subtitle: String,
    /// Engraving depth in mm; the quality preset supplies it when absent
    pub depth_mm: Option<f64>,
}

impl TextConfig {
    /// True when enabled and at least one line has visible characters.
    pub fn has_text(&self) -> bool {
        self.enabled && !(self.title.trim().is_empty() && self.subtitle.trim().is_empty())
    }
}

/// Sculpture settings collected by the UI.
///
/// # Example
///
/// ```rust
/// use sculpture_mesh::{RouteStyle, SculptureConfig, Shape};
///
/// let config: SculptureConfig =
///     serde_json::from_str(r#"{"shape": "rectangular", "route_style": "engraved"}"#).unwrap();
/// assert_eq!(config.shape, Shape::Rectangular);
/// assert_eq!(config.route_style, RouteStyle::Engraved);
/// assert_eq!(config.size_cm, 15.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SculptureConfig {
    pub shape: Shape,
    /// Footprint width (diameter or side) in cm
    pub size_cm: f64,
    pub material: Material,
    pub route_style: RouteStyle,
    /// Tube diameter (raised) or groove reference width (engraved), mm
    pub route_thickness_mm: f64,
    /// Vertical exaggeration of the relief
    pub elevation_scale: f64,
    /// Terrain quads per side; the quality preset supplies it when absent
    pub terrain_resolution: Option<u32>,
    /// Gaussian passes; the quality preset supplies it when absent
    pub terrain_smoothing: Option<u32>,
    /// Fraction of the full relief height the terrain may reach
    pub terrain_height_limit: f64,
    /// Radius around the route where terrain yields, mm
    pub route_clearance_mm: f64,
    /// Lift of the tube centre above the route height, mm
    pub route_vertical_offset_mm: f64,
    pub rim_height_mm: f64,
    pub base_height_mm: f64,
    pub text: TextConfig,
    pub orientation: Orientation,
}

impl Default for SculptureConfig {
    fn default() -> Self {
        Self {
            shape: Shape::Circular,
            size_cm: 15.0,
            material: Material::Pla,
            route_style: RouteStyle::Raised,
            route_thickness_mm: 2.0,
            elevation_scale: 1.5,
            terrain_resolution: None,
            terrain_smoothing: None,
            terrain_height_limit: 0.7,
            route_clearance_mm: 4.0,
            route_vertical_offset_mm: 1.5,
            rim_height_mm: 3.0,
            base_height_mm: 10.0,
            text: TextConfig::default(),
            orientation: Orientation::Auto,
        }
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn at_most(field: &'static str, value: f64, max: f64) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max,
        })
    }
}

impl SculptureConfig {
    /// Checks numeric ranges.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("size_cm", self.size_cm)?;
        positive("route_thickness_mm", self.route_thickness_mm)?;
        positive("elevation_scale", self.elevation_scale)?;
        positive("base_height_mm", self.base_height_mm)?;
        non_negative("rim_height_mm", self.rim_height_mm)?;
        non_negative("route_clearance_mm", self.route_clearance_mm)?;
        non_negative("route_vertical_offset_mm", self.route_vertical_offset_mm)?;

        let size_mm = self.size_cm * 10.0;
        at_most("route_thickness_mm", self.route_thickness_mm, size_mm * MAX_ROUTE_THICKNESS_FRACTION)?;
        at_most("rim_height_mm", self.rim_height_mm, size_mm * MAX_RIM_HEIGHT_FRACTION)?;

        let limit = self.terrain_height_limit;
        if !(limit > 0.0 && limit <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "terrain_height_limit",
                value: limit,
                min: 0.0,
                max: 1.0,
            });
        }

        if let Some(resolution) = self.terrain_resolution {
            if !(MIN_TERRAIN_RESOLUTION..=MAX_TERRAIN_RESOLUTION).contains(&resolution) {
                return Err(ConfigError::OutOfRange {
                    field: "terrain_resolution",
                    value: resolution as f64,
                    min: MIN_TERRAIN_RESOLUTION as f64,
                    max: MAX_TERRAIN_RESOLUTION as f64,
                });
            }
        }

        if let Some(depth) = self.text.depth_mm {
            positive("text.depth_mm", depth)?;
        }

        if let Orientation::Fixed { degrees } = self.orientation {
            if !degrees.is_finite() {
                return Err(ConfigError::OutOfRange {
                    field: "orientation.degrees",
                    value: degrees,
                    min: f64::MIN,
                    max: f64::MAX,
                });
            }
        }

        Ok(())
    }
}

/// Scene-space measurements derived once per run from a validated config
/// and a quality preset.
///
/// Every builder reads lengths from here, never from the raw config, so
/// the tube height and the terrain clearance use one formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub shape: Shape,
    pub route_style: RouteStyle,
    /// Footprint width in scene units (`size / 10`)
    pub mesh_size: f64,
    /// Half the footprint width
    pub radius: f64,
    /// Half-width of the square area covered by the terrain grid
    pub terrain_half_extent: f64,
    /// Radius of the circle route points are clipped onto, pulled in far
    /// enough that the tube and markers stay inside the footprint
    pub route_clip_radius: f64,
    /// Height of the full (unlimited) relief
    pub height_scale: f64,
    /// Terrain and route ceiling, never below `min_terrain_height`
    pub max_height: f64,
    /// Terrain floor above the base top
    pub min_terrain_height: f64,
    pub tube_radius: f64,
    /// At least `tube_radius + safety_margin`
    pub route_vertical_offset: f64,
    /// At least `tube_radius + safety_margin`
    pub clearance_radius: f64,
    pub safety_margin: f64,
    pub groove_width: f64,
    pub groove_depth: f64,
    pub base_height: f64,
    pub rim_height: f64,
    /// Width of the rectangular rim frame (zero without a rim)
    pub rim_frame_width: f64,
    /// Resolved preset parameters with config overrides applied
    pub quality: QualityParams,
    /// Engraving depth in scene units
    pub text_depth: f64,
}

impl Dimensions {
    /// Validates `config` and derives scene-space measurements.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config is out of range.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sculpture_mesh::{Dimensions, QualityPreset, SculptureConfig};
    ///
    /// let dims = Dimensions::resolve(&SculptureConfig::default(), QualityPreset::Preview).unwrap();
    /// assert!((dims.mesh_size - 1.5).abs() < 1e-12);
    /// // 0.7 * 1.5 * (15 / 100)
    /// assert!((dims.max_height - 0.1575).abs() < 1e-12);
    /// ```
    pub fn resolve(config: &SculptureConfig, preset: QualityPreset) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut quality = preset.params();
        if let Some(resolution) = config.terrain_resolution {
            quality.terrain_resolution = resolution;
        }
        if let Some(passes) = config.terrain_smoothing {
            quality.smoothing_passes = passes;
        }

        let mesh_size = config.size_cm * SCENE_UNITS_PER_CM;
        let radius = mesh_size / 2.0;
        let height_scale = config.elevation_scale * (config.size_cm / 100.0);
        let rim_height = mm_to_scene(config.rim_height_mm);
        let thickness = mm_to_scene(config.route_thickness_mm);
        let tube_radius = thickness / 2.0;
        let safety_margin = mm_to_scene(CLEARANCE_SAFETY_MARGIN_MM);
        // The tube bottom must clear the terrain floor, and the yielding
        // terrain must cover the tube footprint.
        let tube_reach = tube_radius + safety_margin;
        let min_terrain_height = mm_to_scene(MIN_TERRAIN_HEIGHT_MM);

        let rim_frame_width = match config.shape {
            Shape::Rectangular if rim_height > 0.0 => mesh_size * RIM_FRAME_WIDTH_FRACTION,
            _ => 0.0,
        };
        let terrain_half_extent = radius - rim_frame_width;
        // Widest horizontal reach of the tube and its markers around a
        // clipped centre: start sphere radius or end box corner.
        let marker_reach = tube_radius
            * START_MARKER_RADIUS_FACTOR.max(END_MARKER_SIZE_FACTOR / 2.0 * std::f64::consts::SQRT_2);
        let clip_extent = match config.shape {
            Shape::Circular => radius,
            Shape::Rectangular => terrain_half_extent,
        };
        let route_clip_radius = (clip_extent * ROUTE_CLIP_FRACTION).min(clip_extent - marker_reach);

        Ok(Self {
            shape: config.shape,
            route_style: config.route_style,
            mesh_size,
            radius,
            terrain_half_extent,
            route_clip_radius,
            height_scale,
            max_height: (config.terrain_height_limit * height_scale).max(min_terrain_height),
            min_terrain_height,
            tube_radius,
            route_vertical_offset: mm_to_scene(config.route_vertical_offset_mm).max(tube_reach),
            clearance_radius: mm_to_scene(config.route_clearance_mm).max(tube_reach),
            safety_margin,
            groove_width: thickness * GROOVE_WIDTH_FACTOR,
            groove_depth: thickness * GROOVE_DEPTH_FACTOR,
            base_height: mm_to_scene(config.base_height_mm),
            rim_height,
            rim_frame_width,
            quality,
            text_depth: mm_to_scene(config.text.depth_mm.unwrap_or(quality.text_depth_mm)),
        })
    }

    /// Tube centre height for a route height.
    ///
    /// This is the single formula shared by the tube builder and the terrain
    /// clearance step: `min(routeHeight, maxHeight) + verticalOffset`.
    #[inline]
    pub fn tube_center_height(&self, route_height: f64) -> f64 {
        route_height.min(self.max_height) + self.route_vertical_offset
    }

    /// Highest terrain height allowed under the tube at a route height.
    #[inline]
    pub fn clearance_ceiling(&self, route_height: f64) -> f64 {
        self.tube_center_height(route_height) - self.tube_radius - self.safety_margin
    }
}
