//! # Config Crate
//!
//! Centralized constants for the route sculpture pipeline.
//! Every magic number shared by the terrain, route, base, text and export
//! stages lives here so preview and export geometry stay formula-identical.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{mm_to_scene, EPSILON, STL_MM_PER_SCENE_UNIT};
//!
//! // A 10 mm base is a tenth of a scene unit.
//! let base = mm_to_scene(10.0);
//! assert!((base - 0.1).abs() < EPSILON);
//!
//! // The STL writer scales scene units back to millimetres.
//! assert_eq!(base * STL_MM_PER_SCENE_UNIT, 10.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Browser-Safe**: No platform-specific values
//! - **Unit-Explicit**: Every length documents whether it is mm, cm or scene units

pub mod constants;
