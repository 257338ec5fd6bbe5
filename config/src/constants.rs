//! # Configuration Constants
//!
//! Centralized constants for the route sculpture pipeline. All geometry
//! fractions, unit conversions and tessellation bounds are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Units**: Centimetre / millimetre / scene-unit conversions
//! - **Footprint**: Clip and trim fractions of the sculpture radius
//! - **Terrain**: Smoothing kernel, clearance and groove shaping
//! - **Route**: Curve tension and tube tessellation bounds
//! - **Base & Text**: Rim, annulus and plaque proportions
//! - **Export**: Binary STL layout

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Minimum triangle area (doubled cross-product length) below which a
/// triangle is treated as degenerate.
///
/// Collapsed disc-edge cells of the circular terrain fall under this
/// threshold and are dropped.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-12;

// =============================================================================
// UNIT CONSTANTS
// =============================================================================

/// Scene units per centimetre of sculpture size (`meshSize = size / 10`).
///
/// # Example
///
/// ```rust
/// use config::constants::SCENE_UNITS_PER_CM;
///
/// let mesh_size = 15.0 * SCENE_UNITS_PER_CM;
/// assert!((mesh_size - 1.5).abs() < 1e-12);
/// ```
pub const SCENE_UNITS_PER_CM: f64 = 0.1;

/// Scene units per millimetre (`L / 100`).
pub const SCENE_UNITS_PER_MM: f64 = 0.01;

/// Millimetres per scene unit baked into STL coordinates at write time.
pub const STL_MM_PER_SCENE_UNIT: f64 = 100.0;

/// Mean Earth radius in metres, used for route distance statistics.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// =============================================================================
// FOOTPRINT CONSTANTS
// =============================================================================

/// Fraction of each bounds extent added as padding on every side before
/// normalizing geographic coordinates into the footprint.
pub const BOUNDS_PADDING_FRACTION: f64 = 0.1;

/// Smallest longitude/latitude extent (degrees) used as a divisor.
///
/// Single-point routes have zero-extent bounds; this keeps normalization
/// finite.
pub const MIN_BOUNDS_EXTENT_DEG: f64 = 1e-6;

/// Smallest elevation range (metres) used as a divisor.
pub const MIN_ELEVATION_RANGE_M: f64 = 1.0;

/// Route points farther than this fraction of the sculpture radius are
/// pulled radially onto the clip circle. The remainder is reserved for the rim.
pub const ROUTE_CLIP_FRACTION: f64 = 0.88;

/// Terrain vertices beyond this fraction of the sculpture radius are pulled
/// onto it and pinned to height zero, giving a clean disc edge.
pub const TERRAIN_TRIM_FRACTION: f64 = 0.95;

/// Largest route thickness as a fraction of the sculpture size (both in
/// millimetres). Keeps the tube radius within a quarter of the base radius.
pub const MAX_ROUTE_THICKNESS_FRACTION: f64 = 0.25;

/// Largest rim height as a fraction of the sculpture size (both in
/// millimetres). Keeps the rim tube radius within a quarter of the base radius.
pub const MAX_RIM_HEIGHT_FRACTION: f64 = 0.25;

// =============================================================================
// TERRAIN CONSTANTS
// =============================================================================

/// Normalized 3x3 Gaussian smoothing kernel.
///
/// # Example
///
/// ```rust
/// use config::constants::GAUSSIAN_KERNEL_3X3;
///
/// let sum: f64 = GAUSSIAN_KERNEL_3X3.iter().flatten().sum();
/// assert!((sum - 1.0).abs() < 1e-12);
/// ```
pub const GAUSSIAN_KERNEL_3X3: [[f64; 3]; 3] = [
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

/// Terrain floor above the base top, in millimetres.
pub const MIN_TERRAIN_HEIGHT_MM: f64 = 0.5;

/// Extra gap between the terrain and the underside of a raised tube, in
/// millimetres.
pub const CLEARANCE_SAFETY_MARGIN_MM: f64 = 0.3;

/// Exponent of the engraved-style valley falloff `(d / r)^k`.
pub const ENGRAVE_FALLOFF_EXPONENT: f64 = 0.5;

/// Engraved groove width as a multiple of the route thickness.
pub const GROOVE_WIDTH_FACTOR: f64 = 1.0;

/// Engraved groove depth as a multiple of the route thickness.
pub const GROOVE_DEPTH_FACTOR: f64 = 0.5;

/// Valid range for the terrain grid resolution (quads per side).
pub const MIN_TERRAIN_RESOLUTION: u32 = 2;

/// Upper bound for the terrain grid resolution (quads per side).
pub const MAX_TERRAIN_RESOLUTION: u32 = 1024;

// =============================================================================
// ROUTE CONSTANTS
// =============================================================================

/// Catmull-Rom tension for the route curve.
pub const CATMULL_ROM_TENSION: f64 = 0.5;

/// Lower bound on tube samples along the curve.
pub const MIN_TUBULAR_SEGMENTS: u32 = 64;

/// Upper bound on tube samples along the curve.
pub const MAX_TUBULAR_SEGMENTS: u32 = 500;

/// Tube samples per mesh-size of curve arc length.
pub const TUBULAR_SEGMENTS_PER_MESH_SIZE: f64 = 150.0;

/// Arc-length lookup resolution per Catmull-Rom span.
pub const ARC_LENGTH_SAMPLES_PER_SPAN: usize = 16;

/// Start sphere radius as a multiple of the tube radius.
pub const START_MARKER_RADIUS_FACTOR: f64 = 1.6;

/// End box edge length as a multiple of the tube radius.
pub const END_MARKER_SIZE_FACTOR: f64 = 2.6;

/// Angular segments used for marker spheres.
pub const MARKER_SEGMENTS: u32 = 16;

/// Douglas-Peucker starting tolerance as a fraction of the route extent.
pub const SIMPLIFY_INITIAL_TOLERANCE: f64 = 1e-4;

/// Multiplicative tolerance growth per adaptive iteration.
pub const SIMPLIFY_TOLERANCE_GROWTH: f64 = 1.5;

/// Hard cap on adaptive Douglas-Peucker iterations.
pub const SIMPLIFY_MAX_ITERATIONS: u32 = 96;

// =============================================================================
// BASE & TEXT CONSTANTS
// =============================================================================

/// Angular segments for the base cylinder, rim torus and annulus.
pub const BASE_CIRCLE_SEGMENTS: u32 = 128;

/// Segments of the rim torus cross-section.
pub const RIM_TUBE_SEGMENTS: u32 = 16;

/// Rectangular rim frame width as a fraction of mesh size.
pub const RIM_FRAME_WIDTH_FRACTION: f64 = 0.04;

/// Thickness of the flat annulus between terrain disc and rim, in millimetres.
pub const ANNULUS_THICKNESS_MM: f64 = 0.4;

/// Circular-base nameplate width as a fraction of the diameter.
pub const NAMEPLATE_WIDTH_FRACTION: f64 = 0.08;

/// Rectangular-base face plate width as a fraction of the size.
pub const FACEPLATE_WIDTH_FRACTION: f64 = 0.7;

/// Plaque height as a fraction of the base height.
pub const PLAQUE_HEIGHT_FRACTION: f64 = 0.6;

/// Plaque slab thickness, in millimetres.
pub const PLAQUE_THICKNESS_MM: f64 = 2.0;

/// Canvas margin on each side as a fraction of the canvas height.
pub const TEXT_MARGIN_FRACTION: f64 = 0.12;

// =============================================================================
// EXPORT CONSTANTS
// =============================================================================

/// Text written (space padded) into the 80-byte binary STL header.
pub const STL_HEADER_TEXT: &str = "route sculpture binary STL";

/// Size of the binary STL header in bytes.
pub const STL_HEADER_LEN: usize = 80;

/// Bytes per triangle record in a binary STL file.
pub const STL_TRIANGLE_RECORD_LEN: usize = 50;

/// Maximum number of triangles accepted by the exporter.
///
/// Safety limit to prevent memory exhaustion from runaway presets.
pub const MAX_TRIANGLES: usize = 10_000_000;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Converts millimetres to scene units.
///
/// # Example
///
/// ```rust
/// use config::constants::mm_to_scene;
///
/// assert!((mm_to_scene(2.0) - 0.02).abs() < 1e-12);
/// ```
#[inline]
pub fn mm_to_scene(mm: f64) -> f64 {
    mm * SCENE_UNITS_PER_MM
}

/// Number of tube samples for a curve of the given arc length.
///
/// Proportional to arc length relative to the mesh size, clamped to
/// [`MIN_TUBULAR_SEGMENTS`, `MAX_TUBULAR_SEGMENTS`].
///
/// # Example
///
/// ```rust
/// use config::constants::{tubular_segments, MAX_TUBULAR_SEGMENTS, MIN_TUBULAR_SEGMENTS};
///
/// assert_eq!(tubular_segments(0.0, 1.5), MIN_TUBULAR_SEGMENTS);
/// assert_eq!(tubular_segments(1000.0, 1.5), MAX_TUBULAR_SEGMENTS);
/// ```
pub fn tubular_segments(arc_length: f64, mesh_size: f64) -> u32 {
    if !(arc_length.is_finite() && mesh_size > 0.0) {
        return MIN_TUBULAR_SEGMENTS;
    }
    let wanted = (arc_length / mesh_size * TUBULAR_SEGMENTS_PER_MESH_SIZE).round();
    (wanted.min(MAX_TUBULAR_SEGMENTS as f64) as u32).clamp(MIN_TUBULAR_SEGMENTS, MAX_TUBULAR_SEGMENTS)
}

/// Checks if a f64 value is approximately zero within EPSILON.
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
