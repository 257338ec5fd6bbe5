//! # Sculpture Mesh
//!
//! Turns a GPS route and an elevation field into a closed, printable
//! sculpture: terrain relief, the route as a raised tube or an engraved
//! groove, a base platform with rim, and an optional engraved text plaque.
//!
//! ## Architecture
//!
//! ```text
//! RouteData + SculptureConfig + QualityPreset
//!   → normalize → simplify → {terrain, route path} → base, text
//!   → merge → orient → binary STL
//! ```
//!
//! Every builder reads its lengths from one [`Dimensions`] value, so the
//! tube height and the terrain clearance below it come from the same
//! formula. Geometry is computed in `f64` scene units (one unit is 100 mm)
//! with `y` up; the STL writer converts to millimetres and `z` up.
//!
//! ## Usage
//!
//! ```rust
//! use sculpture_mesh::pipeline::{SculptureInput, SculpturePipeline};
//! use sculpture_mesh::{QualityPreset, RouteData, RoutePoint, SculptureConfig};
//!
//! let route = RouteData::from_points(vec![
//!     RoutePoint::new(47.10, 8.50, Some(400.0)),
//!     RoutePoint::new(47.11, 8.52, Some(650.0)),
//! ]);
//! let config = SculptureConfig::default();
//! let input = SculptureInput { route: &route, elevation: None, config: &config };
//! let stl = SculpturePipeline::new(QualityPreset::Preview).export(&input)?;
//! assert!(stl.triangle_count > 0);
//! # Ok::<(), sculpture_mesh::SculptureError>(())
//! ```

pub mod base;
pub mod collaborators;
pub mod elevation;
pub mod error;
pub mod export;
mod grid;
pub mod merge;
pub mod mesh;
pub mod normalize;
pub mod path;
pub mod pipeline;
pub mod polyline;
pub mod primitives;
pub mod quality;
pub mod route;
pub mod sculpture;
pub mod simplify;
pub mod terrain;
pub mod text;

pub use elevation::ElevationGrid;
pub use error::{ConfigError, SculptureError, SculptureResult, TextError};
pub use mesh::Mesh;
pub use normalize::{normalize_route, Projection};
pub use pipeline::{SculptureInput, SculptureParts, SculpturePipeline};
pub use quality::{QualityParams, QualityPreset};
pub use route::{GeoBounds, RouteData, RoutePoint, RouteStats};
pub use sculpture::{Dimensions, Material, Orientation, RouteStyle, SculptureConfig, Shape, TextConfig};
pub use simplify::simplify;
