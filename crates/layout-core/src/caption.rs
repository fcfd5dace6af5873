//! Caption block and pillar geometry.
//!
//! Every size is defined on a 1080 px reference canvas and scales linearly,
//! so the overlay preview at any on-screen size and the export raster agree
//! on line breaks and on the pillar height.

use crate::metrics::TextMetrics;
use crate::wrap::wrap_words;

/// Side length of the canvas the style values are defined for.
pub const REFERENCE_CANVAS_PX: u32 = 1080;

/// Text shown (and laid out) when a slide has no caption yet.
pub const PLACEHOLDER_CAPTION: &str = "Placeholder content";

/// The caption text actually drawn for `content`.
pub fn display_caption(content: &str) -> &str {
    if content.trim().is_empty() {
        PLACEHOLDER_CAPTION
    } else {
        content
    }
}

/// Typographic constants for the caption and its pillar, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionStyle {
    pub font_size_px: f32,
    pub line_height_px: f32,
    /// Extra pillar length beyond the text block.
    pub pillar_padding_px: f32,
    pub pillar_width_px: f32,
}

impl CaptionStyle {
    /// Values at [`REFERENCE_CANVAS_PX`].
    pub fn reference() -> Self {
        Self {
            font_size_px: 40.0,
            line_height_px: 52.0,
            pillar_padding_px: 10.0,
            pillar_width_px: 12.0,
        }
    }

    /// Reference values scaled to a canvas of `canvas_px`.
    pub fn for_canvas(canvas_px: u32) -> Self {
        let scale = canvas_px as f32 / REFERENCE_CANVAS_PX as f32;
        let reference = Self::reference();
        Self {
            font_size_px: reference.font_size_px * scale,
            line_height_px: reference.line_height_px * scale,
            pillar_padding_px: reference.pillar_padding_px * scale,
            pillar_width_px: reference.pillar_width_px * scale,
        }
    }
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self::reference()
    }
}

/// A laid-out caption.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    pub lines: Vec<String>,
    pub line_height_px: f32,
    /// `lines.len() * line_height_px`.
    pub block_height_px: f32,
    /// Block height plus the pillar padding.
    pub pillar_height_px: f32,
}

impl CaptionLayout {
    /// Lay out `text` in a box `width_percent` of the canvas wide.
    pub fn compute(
        text: &str,
        width_percent: f64,
        canvas_px: u32,
        style: &CaptionStyle,
        metrics: &dyn TextMetrics,
    ) -> Self {
        let max_width = (width_percent.clamp(0.0, 100.0) / 100.0 * canvas_px as f64) as f32;
        let lines = wrap_words(text, max_width, style.font_size_px, metrics);
        let block_height_px = lines.len() as f32 * style.line_height_px;
        tracing::trace!(
            lines = lines.len(),
            max_width,
            block_height_px,
            "Laid out caption"
        );
        Self {
            line_height_px: style.line_height_px,
            pillar_height_px: block_height_px + style.pillar_padding_px,
            block_height_px,
            lines,
        }
    }

    /// Pillar height as a percentage of a `canvas_px` canvas, clamped to 100.
    pub fn pillar_height_percent(&self, canvas_px: u32) -> f64 {
        if canvas_px == 0 {
            return 0.0;
        }
        (self.pillar_height_px as f64 / canvas_px as f64 * 100.0).min(100.0)
    }

    /// Top of line `index`, relative to the block top.
    pub fn line_offset_px(&self, index: usize) -> f32 {
        index as f32 * self.line_height_px
    }
}
