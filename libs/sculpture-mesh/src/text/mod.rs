//! # Text Plaque
//!
//! Engraves title and subtitle into a plaque set against the front (`+z`)
//! edge of the base.
//!
//! The rasterized canvas is read back as luminance: white is flush with the
//! plaque face, black is carved to the full engraving depth. The displaced
//! front surface is sampled on its own grid, so the canvas resolution and
//! the mesh density are independent.
//!
//! Circular bases carry a small nameplate whose corners touch the circle;
//! the base is flattened behind it. Rectangular bases carry a wide face
//! plate against the front face of the box.

mod raster;

pub use raster::{FontRasterizer, LineBand, TextLayout, TextRasterizer};

use crate::error::TextError;
use crate::grid::{close_surface, Grid};
use crate::mesh::Mesh;
use crate::sculpture::{Dimensions, Shape};
use config::constants::{
    mm_to_scene, FACEPLATE_WIDTH_FRACTION, NAMEPLATE_WIDTH_FRACTION, PLAQUE_HEIGHT_FRACTION,
    PLAQUE_THICKNESS_MM,
};
use glam::{DVec2, DVec3};
use image::GrayImage;
use tracing::debug;

/// Maximum share of the plaque thickness the engraving may remove.
const MAX_DEPTH_FRACTION: f64 = 0.9;

/// Where the plaque sits, in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaquePlacement {
    pub width: f64,
    pub height: f64,
    /// Vertical centre of the plaque
    pub center_y: f64,
    /// `z` of the un-engraved front face
    pub front_z: f64,
    pub thickness: f64,
}

impl PlaquePlacement {
    /// Placement for the base described by `dims`.
    pub fn for_dims(dims: &Dimensions) -> Self {
        let thickness = mm_to_scene(PLAQUE_THICKNESS_MM);
        let height = dims.base_height * PLAQUE_HEIGHT_FRACTION;
        let center_y = -dims.base_height / 2.0;
        match dims.shape {
            Shape::Circular => {
                let width = dims.mesh_size * NAMEPLATE_WIDTH_FRACTION;
                let half = width / 2.0;
                Self {
                    width,
                    height,
                    center_y,
                    front_z: (dims.radius * dims.radius - half * half).max(0.0).sqrt(),
                    thickness,
                }
            }
            Shape::Rectangular => Self {
                width: dims.mesh_size * FACEPLATE_WIDTH_FRACTION,
                height,
                center_y,
                front_z: dims.radius + thickness,
                thickness,
            },
        }
    }

    /// `z` of the back face, where the plaque meets the base.
    pub fn back_z(&self) -> f64 {
        self.front_z - self.thickness
    }

    pub fn top(&self) -> f64 {
        self.center_y + self.height / 2.0
    }

    pub fn left(&self) -> f64 {
        -self.width / 2.0
    }
}

/// Closed plaque solid and how it was built.
#[derive(Debug, Clone)]
pub struct TextPlaque {
    pub mesh: Mesh,
    pub placement: PlaquePlacement,
    /// Front grid size in quads (width, height)
    pub grid: (u32, u32),
}

impl TextPlaque {
    /// Width of the front face.
    pub fn front_width(&self) -> f64 {
        let front = self.placement.front_z;
        let (min_x, max_x) = self
            .mesh
            .vertices()
            .iter()
            .filter(|v| (v.z - front).abs() < 1e-12)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.x), hi.max(v.x))
            });
        (max_x - min_x).max(0.0)
    }
}

/// Rasterizes `layout` and builds the engraved plaque.
///
/// # Errors
///
/// Returns a [`TextError`] when there is nothing to engrave or the
/// rasterizer fails. Callers treat every variant as "skip the plaque".
pub fn engrave(
    layout: &TextLayout,
    rasterizer: &dyn TextRasterizer,
    dims: &Dimensions,
) -> Result<TextPlaque, TextError> {
    if layout.is_empty() {
        return Err(TextError::EmptyText);
    }

    let placement = PlaquePlacement::for_dims(dims);
    if !(placement.width > 0.0 && placement.height > 0.0 && placement.thickness > 0.0) {
        return Err(TextError::Degenerate(format!(
            "plaque {}x{}",
            placement.width, placement.height
        )));
    }

    let (canvas_w, canvas_h) = dims.quality.text_canvas;
    let canvas = rasterizer.rasterize(layout, canvas_w, canvas_h)?;

    let (grid_w, grid_h) = dims.quality.text_grid;
    if grid_w == 0 || grid_h == 0 {
        return Err(TextError::Degenerate(format!("grid {grid_w}x{grid_h}")));
    }

    let depth = dims.text_depth.min(placement.thickness * MAX_DEPTH_FRACTION);
    let mesh = plaque_solid(&canvas, &placement, (grid_w, grid_h), depth);

    debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        width = placement.width,
        "built text plaque"
    );

    Ok(TextPlaque {
        mesh,
        placement,
        grid: (grid_w, grid_h),
    })
}

/// Displaced front grid closed onto the back plane.
fn plaque_solid(canvas: &GrayImage, placement: &PlaquePlacement, grid_size: (u32, u32), depth: f64) -> Mesh {
    let (grid_w, grid_h) = (grid_size.0 as usize, grid_size.1 as usize);
    // Rows run downwards and columns rightwards, so the front faces +z.
    let grid = Grid::new(grid_h + 1, grid_w + 1);
    let mut surface = Mesh::with_capacity(grid.rows * grid.cols, grid_w * grid_h * 2);

    for row in 0..grid.rows {
        let v = row as f64 / grid_h as f64;
        for col in 0..grid.cols {
            let u = col as f64 / grid_w as f64;
            let carve = 1.0 - luminance(canvas, u, v);
            surface.add_vertex(DVec3::new(
                placement.left() + u * placement.width,
                placement.top() - v * placement.height,
                placement.front_z - carve * depth,
            ));
        }
    }
    grid.add_triangles(&mut surface);

    let back_z = placement.back_z();
    close_surface(&surface, &grid.perimeter(), |p| DVec3::new(p.x, p.y, back_z))
}

/// Bilinear luminance in `[0, 1]` at canvas fractions `(u, v)`.
fn luminance(canvas: &GrayImage, u: f64, v: f64) -> f64 {
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return 1.0;
    }
    let pixel = DVec2::new(u * (w - 1) as f64, v * (h - 1) as f64);
    let (x0, y0) = (pixel.x.floor() as u32, pixel.y.floor() as u32);
    let (x1, y1) = ((x0 + 1).min(w - 1), (y0 + 1).min(h - 1));
    let (fx, fy) = (pixel.x - x0 as f64, pixel.y - y0 as f64);

    let at = |x: u32, y: u32| canvas.get_pixel(x, y).0[0] as f64 / 255.0;
    let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
    let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
    top * (1.0 - fy) + bottom * fy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityPreset;
    use crate::sculpture::SculptureConfig;
    use approx::assert_relative_eq;
    use image::Luma;

    /// Paints a black bar across the middle third of the canvas.
    struct BarRasterizer;

    impl TextRasterizer for BarRasterizer {
        fn rasterize(&self, _: &TextLayout, width: u32, height: u32) -> Result<GrayImage, TextError> {
            Ok(GrayImage::from_fn(width, height, |x, _| {
                if x > width / 3 && x < 2 * width / 3 {
                    Luma([0])
                } else {
                    Luma([255])
                }
            }))
        }
    }

    struct NoFont;

    impl TextRasterizer for NoFont {
        fn rasterize(&self, _: &TextLayout, _: u32, _: u32) -> Result<GrayImage, TextError> {
            Err(TextError::Unavailable)
        }
    }

    fn dims(shape: Shape) -> Dimensions {
        let config = SculptureConfig {
            shape,
            ..Default::default()
        };
        Dimensions::resolve(&config, QualityPreset::Preview).unwrap()
    }

    #[test]
    fn test_circular_nameplate_width() {
        let d = dims(Shape::Circular);
        let plaque = engrave(&TextLayout::new("SUMMIT", ""), &BarRasterizer, &d).unwrap();
        assert!(plaque.mesh.vertex_count() > 0);
        assert_relative_eq!(plaque.front_width(), 0.08 * d.mesh_size, epsilon = 1e-9);
    }

    #[test]
    fn test_nameplate_corners_touch_circle() {
        let d = dims(Shape::Circular);
        let p = PlaquePlacement::for_dims(&d);
        let corner = DVec2::new(p.width / 2.0, p.front_z);
        assert_relative_eq!(corner.length(), d.radius, epsilon = 1e-12);
        assert!(p.back_z() < p.front_z);
    }

    #[test]
    fn test_rectangular_faceplate_outside_box() {
        let d = dims(Shape::Rectangular);
        let p = PlaquePlacement::for_dims(&d);
        assert_relative_eq!(p.width, 0.7 * d.mesh_size, epsilon = 1e-12);
        assert_relative_eq!(p.back_z(), d.radius, epsilon = 1e-12);
    }

    #[test]
    fn test_plaque_is_closed() {
        for shape in [Shape::Circular, Shape::Rectangular] {
            let plaque = engrave(&TextLayout::new("A", "B"), &BarRasterizer, &dims(shape)).unwrap();
            assert_eq!(plaque.mesh.open_edge_count(), 0);
            assert!(plaque.mesh.validate());
        }
    }

    #[test]
    fn test_engraving_depth_follows_ink() {
        let d = dims(Shape::Circular);
        let plaque = engrave(&TextLayout::new("A", ""), &BarRasterizer, &d).unwrap();
        let p = plaque.placement;
        let (min, max) = plaque.mesh.bounding_box();
        assert_relative_eq!(max.z, p.front_z, epsilon = 1e-12);
        assert_relative_eq!(min.z, p.back_z(), epsilon = 1e-12);

        let deepest = plaque
            .mesh
            .vertices()
            .iter()
            .filter(|v| v.z > p.back_z() + 1e-12)
            .map(|v| v.z)
            .fold(f64::INFINITY, f64::min);
        assert_relative_eq!(deepest, p.front_z - d.text_depth, epsilon = 1e-9);
    }

    #[test]
    fn test_depth_capped_by_thickness() {
        let config = SculptureConfig {
            text: crate::sculpture::TextConfig {
                depth_mm: Some(50.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let d = Dimensions::resolve(&config, QualityPreset::Preview).unwrap();
        let plaque = engrave(&TextLayout::new("A", ""), &BarRasterizer, &d).unwrap();
        let p = plaque.placement;
        let min_front = plaque
            .mesh
            .vertices()
            .iter()
            .filter(|v| v.z > p.back_z() + 1e-12)
            .map(|v| v.z)
            .fold(f64::INFINITY, f64::min);
        assert!(min_front >= p.back_z() + p.thickness * 0.1 - 1e-12);
    }

    #[test]
    fn test_grid_decoupled_from_canvas() {
        let d = dims(Shape::Rectangular);
        let plaque = engrave(&TextLayout::new("A", ""), &BarRasterizer, &d).unwrap();
        let (gw, gh) = d.quality.text_grid;
        assert_eq!(plaque.grid, (gw, gh));
        // Front surface plus its back copy.
        assert_eq!(plaque.mesh.vertex_count(), 2 * ((gw + 1) * (gh + 1)) as usize);
    }

    #[test]
    fn test_errors_pass_through() {
        let d = dims(Shape::Circular);
        assert_eq!(
            engrave(&TextLayout::default(), &BarRasterizer, &d).unwrap_err(),
            TextError::EmptyText
        );
        assert_eq!(
            engrave(&TextLayout::new("A", ""), &NoFont, &d).unwrap_err(),
            TextError::Unavailable
        );
    }

    #[test]
    fn test_luminance_interpolates() {
        let canvas = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 0 } else { 255 }]));
        assert_relative_eq!(luminance(&canvas, 0.0, 0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(luminance(&canvas, 0.5, 0.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(luminance(&canvas, 1.0, 1.0), 1.0, epsilon = 1e-12);
    }
}
