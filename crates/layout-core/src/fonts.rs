//! Font loading for layout and rendering.

use std::path::{Path, PathBuf};

use ab_glyph::FontArc;

use crate::metrics::{FixedAdvanceMetrics, FontMetrics, TextMetrics};

/// Errors raised while loading fonts.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("I/O error reading font {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a usable TrueType/OpenType font")]
    InvalidFont { path: PathBuf },

    #[error("bundled {face} face could not be parsed")]
    InvalidBundled { face: &'static str },
}

const BUNDLED_REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
const BUNDLED_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

/// Regular and bold faces used on a slide.
///
/// [`FontSet::load`] falls back to the bundled DejaVu Sans faces for any
/// face that is not configured. A [`FontSet::empty`] set measures with
/// [`FixedAdvanceMetrics`] and cannot draw glyphs.
#[derive(Clone, Default)]
pub struct FontSet {
    regular: Option<FontMetrics>,
    bold: Option<FontMetrics>,
    fallback: FixedAdvanceMetrics,
}

impl FontSet {
    /// A set with no outline fonts.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(regular: Option<FontArc>, bold: Option<FontArc>) -> Self {
        Self {
            regular: regular.map(FontMetrics::new),
            bold: bold.map(FontMetrics::new),
            fallback: FixedAdvanceMetrics::default(),
        }
    }

    /// The bundled DejaVu Sans regular and bold faces.
    pub fn bundled() -> Result<Self, FontError> {
        Ok(Self::new(Some(bundled_regular()?), Some(bundled_bold()?)))
    }

    /// Load faces from optional file paths.
    ///
    /// Without a regular path the bundled face is used. Without a bold
    /// path a configured regular face doubles as bold; otherwise the
    /// bundled bold face is used.
    pub fn load(regular: Option<&Path>, bold: Option<&Path>) -> Result<Self, FontError> {
        tracing::debug!(regular = ?regular, bold = ?bold, "Loading slide fonts");
        let bold = match (bold, regular) {
            (Some(path), _) | (None, Some(path)) => load_font(path)?,
            (None, None) => bundled_bold()?,
        };
        let regular = match regular {
            Some(path) => load_font(path)?,
            None => bundled_regular()?,
        };
        Ok(Self::new(Some(regular), Some(bold)))
    }

    pub fn regular(&self) -> Option<&FontArc> {
        self.regular.as_ref().map(FontMetrics::font)
    }

    /// Bold face, or the regular face when no bold one is set.
    pub fn bold(&self) -> Option<&FontArc> {
        self.bold
            .as_ref()
            .or(self.regular.as_ref())
            .map(FontMetrics::font)
    }

    /// Whether glyphs can actually be drawn.
    pub fn can_draw_text(&self) -> bool {
        self.regular.is_some()
    }
}

impl TextMetrics for FontSet {
    fn measure(&self, text: &str, size_px: f32) -> f32 {
        match &self.regular {
            Some(metrics) => metrics.measure(text, size_px),
            None => self.fallback.measure(text, size_px),
        }
    }
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("regular", &self.regular.is_some())
            .field("bold", &self.bold.is_some())
            .finish()
    }
}

fn bundled_regular() -> Result<FontArc, FontError> {
    FontArc::try_from_slice(BUNDLED_REGULAR)
        .map_err(|_| FontError::InvalidBundled { face: "regular" })
}

fn bundled_bold() -> Result<FontArc, FontError> {
    FontArc::try_from_slice(BUNDLED_BOLD).map_err(|_| FontError::InvalidBundled { face: "bold" })
}

fn load_font(path: &Path) -> Result<FontArc, FontError> {
    let bytes = std::fs::read(path).map_err(|e| FontError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    FontArc::try_from_vec(bytes).map_err(|_| FontError::InvalidFont {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_measures_with_fallback() {
        let fonts = FontSet::empty();
        assert!(!fonts.can_draw_text());
        let expected = FixedAdvanceMetrics::default().measure("hello", 40.0);
        assert_eq!(fonts.measure("hello", 40.0), expected);
    }

    #[test]
    fn test_load_without_paths_uses_bundled_faces() {
        let fonts = FontSet::load(None, None).unwrap();
        assert!(fonts.can_draw_text());
        assert!(fonts.bold().is_some());

        let fixed = FixedAdvanceMetrics::default().measure("Ship it", 40.0);
        let measured = fonts.measure("Ship it", 40.0);
        assert!(measured > 0.0);
        assert_ne!(measured, fixed);
    }

    #[test]
    fn test_bundled_bold_is_wider_than_regular() {
        let fonts = FontSet::bundled().unwrap();
        let regular = FontMetrics::new(fonts.regular().unwrap().clone());
        let bold = FontMetrics::new(fonts.bold().unwrap().clone());
        assert!(bold.measure("Ship small", 32.0) > regular.measure("Ship small", 32.0));
    }

    #[test]
    fn test_missing_font_file_errors() {
        let result = FontSet::load(Some(Path::new("/definitely/not/here.ttf")), None);
        assert!(matches!(result, Err(FontError::Io { .. })));
    }
}
