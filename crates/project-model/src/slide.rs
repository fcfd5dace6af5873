//! Carousel slides.

use serde::{Deserialize, Serialize};

use crate::image_data::ImageData;
use crate::position::SlidePositions;

/// Opaque slide identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(String);

impl SlideId {
    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SlideId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for SlideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Background brightness class; selects overlay text color.
///
/// A `Light` background gets black text, a `Dark` one white text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Primary text color as RGB.
    pub fn text_rgb(&self) -> [u8; 3] {
        match self {
            Theme::Dark => [0xFF, 0xFF, 0xFF],
            Theme::Light => [0x00, 0x00, 0x00],
        }
    }

    /// Secondary text color as RGB (slide counter).
    pub fn secondary_rgb(&self) -> [u8; 3] {
        match self {
            Theme::Dark => [0xD1, 0xD5, 0xDB],
            Theme::Light => [0x37, 0x41, 0x51],
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// Suggested vertical zone for the caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Top,
    Center,
    Bottom,
}

impl Placement {
    /// Caption (and pillar) y percentage for this zone.
    pub fn content_y(&self) -> f64 {
        match self {
            Placement::Top => 15.0,
            Placement::Center => 35.0,
            Placement::Bottom => 65.0,
        }
    }
}

impl std::str::FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Placement::Top),
            "center" | "centre" | "middle" => Ok(Placement::Center),
            "bottom" => Ok(Placement::Bottom),
            other => Err(format!("unknown placement '{other}'")),
        }
    }
}

/// Result of analysing a slide's source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideAnalysis {
    pub theme: Theme,
    pub caption: String,
    pub placement: Placement,
}

impl Default for SlideAnalysis {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            caption: String::new(),
            placement: Placement::Top,
        }
    }
}

/// Processing state of a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SlideStatus {
    #[default]
    Idle,
    Analyzing,
    Error {
        message: String,
    },
}

impl SlideStatus {
    /// Overlays are editable in every state except while analysing.
    pub fn overlay_visible(&self) -> bool {
        !matches!(self, SlideStatus::Analyzing)
    }
}

/// One carousel slide: a background image plus positioned overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,

    /// Background raster. Never replaced once set.
    source_image: ImageData,

    /// Caption text burned into the slide.
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub status: SlideStatus,

    #[serde(default)]
    pub positions: SlidePositions,
}

impl Slide {
    /// A slide freshly attached to an image, waiting for analysis.
    pub fn analyzing(source_image: ImageData) -> Self {
        Self {
            id: SlideId::generate(),
            source_image,
            content: String::new(),
            theme: Theme::Dark,
            status: SlideStatus::Analyzing,
            positions: SlidePositions::default(),
        }
    }

    /// A slide that skips analysis.
    pub fn idle(source_image: ImageData) -> Self {
        Self {
            status: SlideStatus::Idle,
            ..Self::analyzing(source_image)
        }
    }

    pub fn source_image(&self) -> &ImageData {
        &self.source_image
    }

    /// Apply an analysis result: theme, caption and vertical placement.
    pub fn apply_analysis(&mut self, analysis: SlideAnalysis) {
        self.theme = analysis.theme;
        self.content = analysis.caption;
        self.positions.set_vertical(analysis.placement.content_y());
        self.status = SlideStatus::Idle;
    }

    /// Record a failed analysis. Caption stays untouched.
    pub fn fail_analysis(&mut self, message: impl Into<String>) {
        self.status = SlideStatus::Error {
            message: message.into(),
        };
    }

    /// Apply a user edit as a whole-record replacement of the touched fields.
    pub fn apply_edit(&mut self, edit: SlideEdit) {
        match edit {
            SlideEdit::Content(text) => self.content = text,
            SlideEdit::Theme(theme) => self.theme = theme,
            SlideEdit::Positions(positions) => self.positions = positions,
        }
    }
}

/// A user edit to one field group of a slide.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideEdit {
    Content(String),
    Theme(Theme),
    Positions(SlidePositions),
}
