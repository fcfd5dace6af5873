//! Slide compositor: turns a slide record into a pixel-space paint plan.
//!
//! The plan is pure data. [`crate::raster`] paints it; tests and the CLI
//! inspect it directly.

use slidemint_layout_core::caption::{display_caption, CaptionLayout, CaptionStyle};
use slidemint_layout_core::metrics::TextMetrics;
use slidemint_project_model::position::percent_to_px;
use slidemint_project_model::slide::Slide;

/// Export canvas side in pixels.
pub const CANVAS_PX: u32 = 1080;

/// Pillar and navigation accent color (#32cd32).
pub const ACCENT_RGB: [u8; 3] = [0x32, 0xCD, 0x32];

/// Sizes on the 1080 px reference canvas.
const AVATAR_PX: f32 = 80.0;
const LABEL_OFFSET_X: f32 = 100.0;
const USERNAME_OFFSET_Y: f32 = 24.0;
const USERNAME_SIZE: f32 = 32.0;
const COUNTER_OFFSET_Y: f32 = 60.0;
const COUNTER_SIZE: f32 = 24.0;
const NAV_WIDTH: f32 = 120.0;
const NAV_HEIGHT: f32 = 80.0;
const NAV_RADIUS: f32 = 40.0;
const NAV_STROKE: f32 = 6.0;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A single run of text with its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size_px: f32,
    pub bold: bool,
    pub rgb: [u8; 3],
}

/// The wrapped caption block.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionBlock {
    pub x: f32,
    pub y: f32,
    pub font_size_px: f32,
    pub layout: CaptionLayout,
    pub rgb: [u8; 3],
}

impl CaptionBlock {
    /// One label per wrapped line, stacked by line height.
    pub fn labels(&self) -> Vec<TextLabel> {
        self.layout
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| TextLabel {
                text: line.clone(),
                x: self.x,
                y: self.y + self.layout.line_offset_px(i),
                size_px: self.font_size_px,
                bold: false,
                rgb: self.rgb,
            })
            .collect()
    }
}

/// Which mark sits inside the navigation pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavGlyph {
    /// More slides follow.
    Arrow,
    /// Last slide.
    Check,
}

/// The outlined navigation pill.
#[derive(Debug, Clone, PartialEq)]
pub struct NavPill {
    pub rect: PixelRect,
    pub radius: f32,
    pub stroke: f32,
    pub glyph: NavGlyph,
}

impl NavPill {
    /// Glyph strokes as polylines in canvas pixels.
    pub fn glyph_strokes(&self) -> Vec<Vec<(f32, f32)>> {
        let s = self.rect.width / NAV_WIDTH;
        let at = |dx: f32, dy: f32| (self.rect.x + dx * s, self.rect.y + dy * s);
        match self.glyph {
            NavGlyph::Arrow => vec![
                vec![at(42.0, 40.0), at(78.0, 40.0)],
                vec![at(64.0, 27.0), at(78.0, 40.0), at(64.0, 53.0)],
            ],
            NavGlyph::Check => vec![vec![at(44.0, 41.0), at(55.0, 52.0), at(77.0, 29.0)]],
        }
    }
}

/// Everything needed to paint one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideComposition {
    pub canvas_px: u32,
    pub pillar: PixelRect,
    pub accent_rgb: [u8; 3],
    pub caption: CaptionBlock,
    /// Square the avatar is scaled into, clipped to its inscribed circle.
    pub avatar: PixelRect,
    pub username: TextLabel,
    pub counter: TextLabel,
    pub nav: NavPill,
}

/// Build the paint plan for slide `index` of `total`.
pub fn compose_slide(
    slide: &Slide,
    index: usize,
    total: usize,
    username: &str,
    canvas_px: u32,
    metrics: &dyn TextMetrics,
) -> SlideComposition {
    let scale = canvas_px as f32 / CANVAS_PX as f32;
    let px = |percent: f64| percent_to_px(percent, canvas_px) as f32;
    let positions = &slide.positions;

    let style = CaptionStyle::for_canvas(canvas_px);
    let layout = CaptionLayout::compute(
        display_caption(&slide.content),
        positions.content.width,
        canvas_px,
        &style,
        metrics,
    );

    let pillar = PixelRect::new(
        px(positions.pillar.x),
        px(positions.pillar.y),
        style.pillar_width_px,
        layout.pillar_height_px,
    );

    let text_rgb = slide.theme.text_rgb();
    let caption = CaptionBlock {
        x: px(positions.content.x),
        y: px(positions.content.y),
        font_size_px: style.font_size_px,
        layout,
        rgb: text_rgb,
    };

    let bx = px(positions.branding.x);
    let by = px(positions.branding.y);
    let avatar = PixelRect::new(bx, by, AVATAR_PX * scale, AVATAR_PX * scale);
    let username = TextLabel {
        text: username.to_string(),
        x: bx + LABEL_OFFSET_X * scale,
        y: by + USERNAME_OFFSET_Y * scale,
        size_px: USERNAME_SIZE * scale,
        bold: true,
        rgb: text_rgb,
    };
    let counter = TextLabel {
        text: format!("{} of {}", index + 1, total),
        x: bx + LABEL_OFFSET_X * scale,
        y: by + COUNTER_OFFSET_Y * scale,
        size_px: COUNTER_SIZE * scale,
        bold: false,
        rgb: slide.theme.secondary_rgb(),
    };

    let nav = NavPill {
        rect: PixelRect::new(
            px(positions.navigation.x),
            px(positions.navigation.y),
            NAV_WIDTH * scale,
            NAV_HEIGHT * scale,
        ),
        radius: NAV_RADIUS * scale,
        stroke: NAV_STROKE * scale,
        glyph: if index + 1 >= total {
            NavGlyph::Check
        } else {
            NavGlyph::Arrow
        },
    };

    SlideComposition {
        canvas_px,
        pillar,
        accent_rgb: ACCENT_RGB,
        caption,
        avatar,
        username,
        counter,
        nav,
    }
}
