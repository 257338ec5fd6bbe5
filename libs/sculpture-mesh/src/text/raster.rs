//! Text rasterization onto a grayscale canvas.
//!
//! The canvas is white with black text. [`TextRasterizer`] is the seam a
//! host replaces when it has its own text renderer; [`FontRasterizer`]
//! draws with `rusttype` from caller-supplied font bytes.

use crate::error::TextError;
use crate::sculpture::TextConfig;
use config::constants::TEXT_MARGIN_FRACTION;
use image::{GrayImage, Luma};
use rusttype::{point, Font, PositionedGlyph, Scale};

/// Share of the canvas height given to the title when a subtitle is present.
const TITLE_SHARE: f64 = 0.6;

/// Lines to draw on the plaque.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLayout {
    pub title: String,
    pub subtitle: String,
}

/// One line and the horizontal band it is centred in, as canvas fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBand<'a> {
    pub text: &'a str,
    pub top: f64,
    pub height: f64,
}

impl TextLayout {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    /// Layout from the label settings, trimmed.
    pub fn from_config(text: &TextConfig) -> Self {
        Self::new(text.title.trim(), text.subtitle.trim())
    }

    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.subtitle.trim().is_empty()
    }

    /// Non-empty lines with their bands. A lone line fills the canvas.
    pub fn bands(&self) -> Vec<LineBand<'_>> {
        match (self.title.trim(), self.subtitle.trim()) {
            ("", "") => Vec::new(),
            (line, "") | ("", line) => vec![LineBand {
                text: line,
                top: 0.0,
                height: 1.0,
            }],
            (title, subtitle) => vec![
                LineBand {
                    text: title,
                    top: 0.0,
                    height: TITLE_SHARE,
                },
                LineBand {
                    text: subtitle,
                    top: TITLE_SHARE,
                    height: 1.0 - TITLE_SHARE,
                },
            ],
        }
    }
}

/// Draws a [`TextLayout`] onto a white canvas with black text.
pub trait TextRasterizer {
    /// # Errors
    ///
    /// Returns a [`TextError`] when nothing can be drawn.
    fn rasterize(&self, layout: &TextLayout, width: u32, height: u32) -> Result<GrayImage, TextError>;
}

/// `rusttype` rasterizer over a TTF/OTF font.
pub struct FontRasterizer {
    font: Font<'static>,
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontRasterizer {
    /// Parses font bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::InvalidFont`] if the bytes are not a font.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, TextError> {
        Font::try_from_vec(bytes)
            .map(|font| Self { font })
            .ok_or(TextError::InvalidFont)
    }

    fn layout_line(&self, text: &str, scale: Scale, x: f32, baseline: f32) -> Vec<PositionedGlyph<'static>> {
        self.font.layout(text, scale, point(x, baseline)).collect()
    }

    /// Advance width of a laid-out line.
    fn line_width(glyphs: &[PositionedGlyph<'_>]) -> f32 {
        glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn draw_band(&self, canvas: &mut GrayImage, band: &LineBand<'_>) {
        let (width, height) = canvas.dimensions();
        let band_top = band.top * height as f64;
        let band_height = band.height * height as f64;
        let margin = TEXT_MARGIN_FRACTION;

        let mut scale = Scale::uniform((band_height * (1.0 - 2.0 * margin)) as f32);
        let available = (width as f64 * (1.0 - 2.0 * margin)) as f32;
        let natural = Self::line_width(&self.layout_line(band.text, scale, 0.0, 0.0));
        if natural > available && natural > 0.0 {
            scale = Scale::uniform(scale.y * available / natural);
        }

        let metrics = self.font.v_metrics(scale);
        let text_height = metrics.ascent - metrics.descent;
        let baseline = band_top as f32 + (band_height as f32 - text_height) / 2.0 + metrics.ascent;
        let probe = self.layout_line(band.text, scale, 0.0, baseline);
        let left = (width as f32 - Self::line_width(&probe)) / 2.0;

        for glyph in self.layout_line(band.text, scale, left, baseline) {
            let Some(bounds) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let x = bounds.min.x + gx as i32;
                let y = bounds.min.y + gy as i32;
                if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                    return;
                }
                let ink = (255.0 * (1.0 - coverage.clamp(0.0, 1.0))).round() as u8;
                let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                pixel.0[0] = pixel.0[0].min(ink);
            });
        }
    }
}

impl TextRasterizer for FontRasterizer {
    fn rasterize(&self, layout: &TextLayout, width: u32, height: u32) -> Result<GrayImage, TextError> {
        if layout.is_empty() {
            return Err(TextError::EmptyText);
        }
        if width == 0 || height == 0 {
            return Err(TextError::Degenerate(format!("canvas {width}x{height}")));
        }

        let mut canvas = GrayImage::from_pixel(width, height, Luma([255]));
        for band in layout.bands() {
            self.draw_band(&mut canvas, &band);
        }
        Ok(canvas)
    }
}
