//! # Elevation Grid
//!
//! Row-major elevation samples covering the route bounds.
//! Row 0 is the northern edge, column 0 the western edge.

use crate::error::{SculptureError, SculptureResult};
use serde::{Deserialize, Serialize};

/// Pre-fetched elevation samples in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawElevationGrid")]
pub struct ElevationGrid {
    rows: usize,
    cols: usize,
    samples: Vec<f64>,
}

#[derive(Deserialize)]
struct RawElevationGrid {
    rows: usize,
    cols: usize,
    samples: Vec<f64>,
}

impl TryFrom<RawElevationGrid> for ElevationGrid {
    type Error = SculptureError;

    fn try_from(raw: RawElevationGrid) -> Result<Self, Self::Error> {
        Self::new(raw.rows, raw.cols, raw.samples)
    }
}

impl ElevationGrid {
    /// Creates a grid, validating its shape.
    ///
    /// Non-finite samples are replaced by the smallest finite sample.
    ///
    /// # Errors
    ///
    /// Returns [`SculptureError::Input`] if the grid is empty, the sample
    /// count does not match `rows * cols`, or no sample is finite.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sculpture_mesh::ElevationGrid;
    ///
    /// let grid = ElevationGrid::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(grid.get(1, 0), 3.0);
    /// assert!(ElevationGrid::new(2, 2, vec![1.0]).is_err());
    /// ```
    pub fn new(rows: usize, cols: usize, mut samples: Vec<f64>) -> SculptureResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(SculptureError::input(format!(
                "Elevation grid must be at least 1x1: {rows}x{cols}"
            )));
        }
        if rows.checked_mul(cols) != Some(samples.len()) {
            return Err(SculptureError::input(format!(
                "Elevation grid {rows}x{cols} needs {} samples, got {}",
                rows.saturating_mul(cols),
                samples.len()
            )));
        }

        let floor = samples
            .iter()
            .copied()
            .filter(|s| s.is_finite())
            .reduce(f64::min)
            .ok_or_else(|| SculptureError::input("Elevation grid has no finite samples"))?;
        for sample in samples.iter_mut().filter(|s| !s.is_finite()) {
            *sample = floor;
        }

        Ok(Self {
            rows,
            cols,
            samples,
        })
    }

    /// Number of rows (north to south).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (west to east).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Sample at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.samples[row * self.cols + col]
    }

    /// Nearest sample to fractional coordinates `u` (west→east) and `v`
    /// (south→north), both in `[0, 1]` and clamped.
    ///
    /// No interpolation is performed.
    pub fn nearest(&self, u: f64, v: f64) -> f64 {
        let col = (u.clamp(0.0, 1.0) * (self.cols - 1) as f64).round() as usize;
        let row = ((1.0 - v.clamp(0.0, 1.0)) * (self.rows - 1) as f64).round() as usize;
        self.get(row.min(self.rows - 1), col.min(self.cols - 1))
    }

    /// Raw samples in row-major order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}
