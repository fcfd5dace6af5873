//! Text width measurement.

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont};

/// Measures the advance width of a run of text at a pixel size.
pub trait TextMetrics {
    /// Width in pixels of `text` rendered at `size_px`.
    fn measure(&self, text: &str, size_px: f32) -> f32;
}

/// Width model that gives every character the same advance.
///
/// Used when no font file is configured; layout stays deterministic and
/// roughly matches a proportional sans-serif.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMetrics {
    /// Advance of a non-whitespace character, in ems.
    pub advance_em: f32,
    /// Advance of a whitespace character, in ems.
    pub space_em: f32,
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self {
            advance_em: 0.55,
            space_em: 0.28,
        }
    }
}

impl TextMetrics for FixedAdvanceMetrics {
    fn measure(&self, text: &str, size_px: f32) -> f32 {
        text.chars()
            .map(|c| {
                if c.is_whitespace() {
                    self.space_em
                } else {
                    self.advance_em
                }
            })
            .sum::<f32>()
            * size_px
    }
}

/// Glyph-advance measurement from an outline font, kerning included.
#[derive(Clone)]
pub struct FontMetrics {
    font: FontArc,
}

impl FontMetrics {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }
}

impl std::fmt::Debug for FontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetrics")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl TextMetrics for FontMetrics {
    fn measure(&self, text: &str, size_px: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(size_px));
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn measure(&self, text: &str, size_px: f32) -> f32 {
        (**self).measure(text, size_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_advance_scales_with_size() {
        let metrics = FixedAdvanceMetrics::default();
        let small = metrics.measure("abc d", 10.0);
        let large = metrics.measure("abc d", 20.0);
        assert!((small - (4.0 * 0.55 + 0.28) * 10.0).abs() < 1e-4);
        assert!((large - 2.0 * small).abs() < 1e-4);
    }

    #[test]
    fn test_empty_text_has_no_width() {
        assert_eq!(FixedAdvanceMetrics::default().measure("", 40.0), 0.0);
    }
}
