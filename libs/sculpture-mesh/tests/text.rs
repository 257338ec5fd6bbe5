//! Text plaques drawn with a real font through `rusttype`.
//!
//! The fixture is DejaVu Sans; its license sits next to it in `fixtures/`.

use image::GrayImage;
use sculpture_mesh::text::{engrave, FontRasterizer, TextLayout, TextRasterizer};
use sculpture_mesh::{
    Dimensions, QualityPreset, RouteData, RoutePoint, SculptureConfig, SculptureInput,
    SculpturePipeline, TextConfig,
};

const FONT: &[u8] = include_bytes!("fixtures/DejaVuSans.ttf");

fn rasterizer() -> FontRasterizer {
    FontRasterizer::from_bytes(FONT.to_vec()).unwrap()
}

/// Row and column extent of the dark pixels in rows `top..bottom`.
fn ink_extent(canvas: &GrayImage, top: u32, bottom: u32) -> Option<((u32, u32), (u32, u32))> {
    let mut extent: Option<((u32, u32), (u32, u32))> = None;
    for (x, y, pixel) in canvas.enumerate_pixels() {
        if y < top || y >= bottom || pixel.0[0] >= 128 {
            continue;
        }
        extent = Some(match extent {
            None => ((y, y), (x, x)),
            Some(((r0, r1), (c0, c1))) => ((r0.min(y), r1.max(y)), (c0.min(x), c1.max(x))),
        });
    }
    extent
}

#[test]
fn test_lines_are_drawn_inside_their_bands() {
    let layout = TextLayout::new("SUMMIT", "2024");
    let (width, height) = (512, 128);
    let canvas = rasterizer().rasterize(&layout, width, height).unwrap();
    assert_eq!(canvas.dimensions(), (width, height));

    let mut spans = Vec::new();
    for band in layout.bands() {
        let top = (band.top * height as f64).round() as u32;
        let bottom = ((band.top + band.height) * height as f64).round() as u32;
        let ((r0, r1), (c0, c1)) = ink_extent(&canvas, top, bottom)
            .unwrap_or_else(|| panic!("no ink for {:?}", band.text));
        // Margins keep the glyphs off the band edges.
        assert!(r0 > top && r1 + 1 < bottom, "{:?} rows {r0}..={r1} in {top}..{bottom}", band.text);
        // Centred horizontally.
        let center = (c0 + c1) as f64 / 2.0;
        assert!((center - width as f64 / 2.0).abs() < width as f64 * 0.05, "{:?} centred at {center}", band.text);
        spans.push(r1 - r0);
    }
    // The title gets the larger share of the height.
    assert!(spans[0] > spans[1]);
}

#[test]
fn test_long_title_is_scaled_to_fit() {
    let layout = TextLayout::new("A VERY LONG MOUNTAIN PASS TITLE", "");
    let (width, height) = (256, 64);
    let canvas = rasterizer().rasterize(&layout, width, height).unwrap();
    let ((_, _), (c0, c1)) = ink_extent(&canvas, 0, height).unwrap();
    assert!(c0 > 0 && c1 + 1 < width, "ink spans columns {c0}..={c1}");
}

#[test]
fn test_font_engraves_plaque() {
    let dims = Dimensions::resolve(&SculptureConfig::default(), QualityPreset::Preview).unwrap();
    let layout = TextLayout::new("SUMMIT", "2024");
    let plaque = engrave(&layout, &rasterizer(), &dims).unwrap();
    assert_eq!(plaque.mesh.open_edge_count(), 0);

    let p = plaque.placement;
    let front: Vec<f64> = plaque
        .mesh
        .vertices()
        .iter()
        .map(|v| v.z)
        .filter(|z| *z > p.back_z() + 1e-12)
        .collect();
    let carved = front.iter().filter(|z| **z < p.front_z - 1e-9).count();
    assert!(carved > 0, "no vertex carved below the front face");
    assert!(carved < front.len(), "the whole face was carved");
    for z in front {
        assert!(z >= p.front_z - dims.text_depth - 1e-12);
    }
}

#[test]
fn test_pipeline_with_font_adds_text_part() {
    let route = RouteData::from_points(vec![
        RoutePoint::new(46.00, 7.00, Some(1200.0)),
        RoutePoint::new(46.01, 7.01, Some(1350.0)),
        RoutePoint::new(46.02, 7.00, Some(1500.0)),
    ]);
    let config = SculptureConfig {
        text: TextConfig {
            enabled: true,
            title: "Col du Galibier".into(),
            subtitle: "2642 m".into(),
            depth_mm: None,
        },
        terrain_resolution: Some(16),
        ..Default::default()
    };
    let input = SculptureInput {
        route: &route,
        elevation: None,
        config: &config,
    };
    let pipeline = SculpturePipeline::new(QualityPreset::Preview).with_rasterizer(Box::new(rasterizer()));
    let parts = pipeline.build_parts(&input).unwrap();
    let text = parts.text.expect("font rasterizer yields a plaque");
    assert!(text.triangle_count() > 0);
}
