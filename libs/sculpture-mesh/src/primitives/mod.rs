//! # Primitives
//!
//! Closed, outward-wound solids in Y-up scene space used by the base and
//! marker builders.

pub mod cuboid;
pub mod cylinder;
pub mod revolve;
pub mod sphere;

pub use cuboid::cuboid;
pub use cylinder::{circle_outline, clip_outline, cylinder, prism};
pub use revolve::{revolve, torus, Footprint};
pub use sphere::sphere;
