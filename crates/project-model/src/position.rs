//! Overlay positions for the four slide elements.
//!
//! All coordinates are percentages `[0.0, 100.0]` of the square slide
//! canvas, so one record drives both the interactive overlay (any on-screen
//! size) and the fixed-size export raster.

use serde::{Deserialize, Serialize};

/// Lower bound of the percentage range.
pub const PERCENT_MIN: f64 = 0.0;
/// Upper bound of the percentage range.
pub const PERCENT_MAX: f64 = 100.0;

/// Clamp a value into `[0, 100]`. NaN collapses to 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return PERCENT_MIN;
    }
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}

/// Convert a percentage of the canvas into pixels.
pub fn percent_to_px(percent: f64, canvas_px: u32) -> f64 {
    percent / PERCENT_MAX * canvas_px as f64
}

/// Identifies one of the four draggable overlay elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementId {
    Content,
    Pillar,
    Branding,
    Navigation,
}

impl ElementId {
    pub const ALL: [ElementId; 4] = [
        ElementId::Content,
        ElementId::Pillar,
        ElementId::Branding,
        ElementId::Navigation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::Content => "content",
            ElementId::Pillar => "pillar",
            ElementId::Branding => "branding",
            ElementId::Navigation => "navigation",
        }
    }
}

impl std::str::FromStr for ElementId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "content" => Ok(ElementId::Content),
            "pillar" => Ok(ElementId::Pillar),
            "branding" => Ok(ElementId::Branding),
            "navigation" => Ok(ElementId::Navigation),
            other => Err(format!(
                "unknown element '{other}' (expected content, pillar, branding, navigation)"
            )),
        }
    }
}

/// A point-positioned element (branding block, navigation pill).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    /// Create an anchor, clamping into range.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
        }
    }
}

/// The caption text block. `width` bounds the wrap width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl ContentBox {
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
            width: clamp_percent(width),
        }
    }
}

/// The vertical accent bar beside the caption.
///
/// `height` is derived from the caption layout; see
/// `slidemint_overlay_editor::feedback`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarBar {
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

impl PillarBar {
    pub fn new(x: f64, y: f64, height: f64) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
            height: clamp_percent(height),
        }
    }
}

/// A single, strongly typed position change for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "lowercase")]
pub enum PositionUpdate {
    Content(ContentBox),
    Pillar(PillarBar),
    Branding(Anchor),
    Navigation(Anchor),
}

impl PositionUpdate {
    pub fn element(&self) -> ElementId {
        match self {
            PositionUpdate::Content(_) => ElementId::Content,
            PositionUpdate::Pillar(_) => ElementId::Pillar,
            PositionUpdate::Branding(_) => ElementId::Branding,
            PositionUpdate::Navigation(_) => ElementId::Navigation,
        }
    }
}

/// Positions of all four overlay elements on one slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlidePositions {
    pub content: ContentBox,
    pub pillar: PillarBar,
    pub branding: Anchor,
    pub navigation: Anchor,
}

impl Default for SlidePositions {
    fn default() -> Self {
        Self {
            content: ContentBox {
                x: 14.0,
                y: 35.0,
                width: 75.0,
            },
            pillar: PillarBar {
                x: 10.0,
                y: 35.0,
                height: 25.0,
            },
            branding: Anchor { x: 8.0, y: 88.0 },
            navigation: Anchor { x: 85.0, y: 88.0 },
        }
    }
}

impl SlidePositions {
    /// Top-left corner of an element.
    pub fn origin(&self, element: ElementId) -> (f64, f64) {
        match element {
            ElementId::Content => (self.content.x, self.content.y),
            ElementId::Pillar => (self.pillar.x, self.pillar.y),
            ElementId::Branding => (self.branding.x, self.branding.y),
            ElementId::Navigation => (self.navigation.x, self.navigation.y),
        }
    }

    /// Horizontal distance from the pillar to the caption.
    pub fn caption_offset(&self) -> f64 {
        self.content.x - self.pillar.x
    }

    /// Apply an update to its own element only, clamping every field.
    pub fn apply(&mut self, update: PositionUpdate) {
        match update {
            PositionUpdate::Content(c) => self.content = ContentBox::new(c.x, c.y, c.width),
            PositionUpdate::Pillar(p) => self.pillar = PillarBar::new(p.x, p.y, p.height),
            PositionUpdate::Branding(a) => self.branding = Anchor::new(a.x, a.y),
            PositionUpdate::Navigation(a) => self.navigation = Anchor::new(a.x, a.y),
        }
    }

    /// Copy-on-write variant of [`SlidePositions::apply`].
    pub fn with(mut self, update: PositionUpdate) -> Self {
        self.apply(update);
        self
    }

    /// Move the caption and its pillar to the same vertical position.
    pub fn set_vertical(&mut self, y: f64) {
        let y = clamp_percent(y);
        self.content.y = y;
        self.pillar.y = y;
    }

    /// Set the caption wrap width.
    pub fn set_content_width(&mut self, width: f64) {
        self.content.width = clamp_percent(width);
    }

    /// Whether every coordinate sits inside `[0, 100]`.
    pub fn in_bounds(&self) -> bool {
        let values = [
            self.content.x,
            self.content.y,
            self.content.width,
            self.pillar.x,
            self.pillar.y,
            self.pillar.height,
            self.branding.x,
            self.branding.y,
            self.navigation.x,
            self.navigation.y,
        ];
        values
            .iter()
            .all(|v| (PERCENT_MIN..=PERCENT_MAX).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_lock_pillar_to_caption() {
        let positions = SlidePositions::default();
        assert_eq!(positions.pillar.y, positions.content.y);
        assert!((positions.caption_offset() - 4.0).abs() < 1e-9);
        assert!(positions.in_bounds());
    }

    #[test]
    fn test_apply_clamps_only_target_element() {
        let mut positions = SlidePositions::default();
        positions.apply(PositionUpdate::Navigation(Anchor {
            x: 140.0,
            y: -3.0,
        }));
        assert_eq!(positions.navigation, Anchor { x: 100.0, y: 0.0 });
        assert_eq!(positions.content, SlidePositions::default().content);
    }

    #[test]
    fn test_set_vertical_moves_both() {
        let mut positions = SlidePositions::default();
        positions.set_vertical(65.0);
        assert_eq!(positions.content.y, 65.0);
        assert_eq!(positions.pillar.y, 65.0);
    }

    #[test]
    fn test_element_id_parse() {
        assert_eq!("Pillar".parse::<ElementId>().unwrap(), ElementId::Pillar);
        assert!("footer".parse::<ElementId>().is_err());
    }

    #[test]
    fn test_serialized_shape_is_flat_percentages() {
        let json = serde_json::to_value(SlidePositions::default()).unwrap();
        assert_eq!(json["content"]["width"], 75.0);
        assert_eq!(json["pillar"]["height"], 25.0);
        assert_eq!(json["branding"]["x"], 8.0);
    }

    #[test]
    fn test_nan_clamps_to_zero() {
        assert_eq!(clamp_percent(f64::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn prop_apply_keeps_bounds(x in -500.0f64..500.0, y in -500.0f64..500.0, w in -50.0f64..250.0) {
            let mut positions = SlidePositions::default();
            positions.apply(PositionUpdate::Content(ContentBox { x, y, width: w }));
            positions.apply(PositionUpdate::Branding(Anchor { x: y, y: x }));
            prop_assert!(positions.in_bounds());
        }
    }
}
