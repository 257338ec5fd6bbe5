//! # Quality Presets
//!
//! Named fidelity levels expanded once per run into a fully-populated
//! parameter struct. Preview and export differ only in the preset they
//! resolve; the geometry formulas are shared.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named quality level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// Fast, faceted geometry for interactive preview
    Preview,
    /// Balanced default
    #[default]
    Standard,
    /// Print-ready export
    High,
}

/// Concrete parameters consumed by every builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityParams {
    /// Terrain grid quads per side
    pub terrain_resolution: u32,
    /// Gaussian smoothing passes over the terrain heights
    pub smoothing_passes: u32,
    /// Segments around the route tube cross-section
    pub radial_segments: u32,
    /// Route point budget after simplification
    pub max_route_points: usize,
    /// Text canvas size in pixels (width, height)
    pub text_canvas: (u32, u32),
    /// Plaque displacement grid size in quads (width, height)
    pub text_grid: (u32, u32),
    /// Default engraving depth in millimetres
    pub text_depth_mm: f64,
}

impl QualityPreset {
    /// All presets, lowest fidelity first.
    pub const ALL: [QualityPreset; 3] = [Self::Preview, Self::Standard, Self::High];

    /// Expands the preset into concrete parameters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sculpture_mesh::QualityPreset;
    ///
    /// let preview = QualityPreset::Preview.params();
    /// let high = QualityPreset::High.params();
    /// assert!(preview.terrain_resolution < high.terrain_resolution);
    /// ```
    pub fn params(self) -> QualityParams {
        match self {
            Self::Preview => QualityParams {
                terrain_resolution: 64,
                smoothing_passes: 1,
                radial_segments: 8,
                max_route_points: 200,
                text_canvas: (512, 128),
                text_grid: (96, 24),
                text_depth_mm: 0.6,
            },
            Self::Standard => QualityParams {
                terrain_resolution: 128,
                smoothing_passes: 2,
                radial_segments: 12,
                max_route_points: 500,
                text_canvas: (1024, 256),
                text_grid: (160, 40),
                text_depth_mm: 0.6,
            },
            Self::High => QualityParams {
                terrain_resolution: 256,
                smoothing_passes: 3,
                radial_segments: 16,
                max_route_points: 1000,
                text_canvas: (2048, 512),
                text_grid: (240, 60),
                text_depth_mm: 0.6,
            },
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Standard => "standard",
            Self::High => "high",
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualityPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preview" | "low" => Ok(Self::Preview),
            "standard" | "medium" => Ok(Self::Standard),
            "high" | "export" => Ok(Self::High),
            _ => Err(ConfigError::UnknownQuality(s.to_string())),
        }
    }
}
