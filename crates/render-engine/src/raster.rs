//! Slide rasterizer.
//!
//! Paints a [`SlideComposition`] onto an RGBA canvas. Painting order is
//! fixed: background, pillar, caption, avatar, username, counter, then the
//! navigation pill and its glyph. The same inputs always produce the same
//! pixels.

use std::io::Cursor;

use ab_glyph::PxScale;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use slidemint_common::config::ExportDefaults;
use slidemint_common::error::{SlidemintError, SlidemintResult};
use slidemint_layout_core::fonts::FontSet;
use slidemint_project_model::image_data::ImageData;
use slidemint_project_model::profile::Profile;
use slidemint_project_model::slide::Slide;

use crate::compositor::{compose_slide, NavPill, PixelRect, SlideComposition, TextLabel};

/// Renders slides to square rasters.
#[derive(Debug, Clone)]
pub struct SlideRenderer {
    fonts: FontSet,
    canvas_px: u32,
}

impl SlideRenderer {
    pub fn new(fonts: FontSet, canvas_px: u32) -> Self {
        Self {
            fonts,
            canvas_px: canvas_px.max(1),
        }
    }

    /// A renderer at `canvas_px` using the bundled fonts.
    pub fn with_bundled_fonts(canvas_px: u32) -> SlidemintResult<Self> {
        let fonts = FontSet::bundled().map_err(|e| SlidemintError::render(e.to_string()))?;
        Ok(Self::new(fonts, canvas_px))
    }

    /// Build a renderer from the configured canvas size and font files.
    /// Unconfigured faces use the bundled fonts.
    pub fn from_defaults(defaults: &ExportDefaults) -> SlidemintResult<Self> {
        let fonts = FontSet::load(defaults.regular_font.as_deref(), defaults.bold_font.as_deref())
            .map_err(|e| SlidemintError::config(e.to_string()))?;
        Ok(Self::new(fonts, defaults.canvas_px))
    }

    pub fn canvas_px(&self) -> u32 {
        self.canvas_px
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    /// Paint plan for a slide, without touching any image data.
    pub fn compose(
        &self,
        slide: &Slide,
        index: usize,
        total: usize,
        username: &str,
    ) -> SlideComposition {
        compose_slide(slide, index, total, username, self.canvas_px, &self.fonts)
    }

    /// Render slide `index` of `total`.
    ///
    /// Fails without painting anything when there is no profile, when
    /// either the background or the avatar cannot be decoded, or when the
    /// font set has no face to draw text with.
    pub fn render(
        &self,
        slide: &Slide,
        index: usize,
        total: usize,
        profile: Option<&Profile>,
    ) -> SlidemintResult<RgbaImage> {
        let profile =
            profile.ok_or_else(|| SlidemintError::render("A profile is required to render slides"))?;

        let background = decode(slide.source_image(), "slide background")?;
        let avatar = decode(&profile.profile_pic, "profile picture")?;
        if !self.fonts.can_draw_text() {
            return Err(SlidemintError::render("No font available to draw slide text"));
        }

        let plan = self.compose(slide, index, total, &profile.username);
        let size = self.canvas_px;

        let mut canvas = fit(background, size);
        fill_rect(&mut canvas, &plan.pillar, plan.accent_rgb);
        for label in plan.caption.labels() {
            self.draw_label(&mut canvas, &label)?;
        }
        paint_avatar(&mut canvas, avatar, &plan.avatar);
        self.draw_label(&mut canvas, &plan.username)?;
        self.draw_label(&mut canvas, &plan.counter)?;
        stroke_pill(&mut canvas, &plan.nav, plan.accent_rgb);
        for polyline in plan.nav.glyph_strokes() {
            stroke_polyline(&mut canvas, &polyline, plan.nav.stroke, plan.accent_rgb);
        }

        tracing::debug!(
            slide = %slide.id,
            index,
            total,
            lines = plan.caption.layout.lines.len(),
            "Rendered slide"
        );
        Ok(canvas)
    }

    /// Render and encode as PNG.
    pub fn render_png(
        &self,
        slide: &Slide,
        index: usize,
        total: usize,
        profile: Option<&Profile>,
    ) -> SlidemintResult<Vec<u8>> {
        let canvas = self.render(slide, index, total, profile)?;
        encode_png(&canvas)
    }

    fn draw_label(&self, canvas: &mut RgbaImage, label: &TextLabel) -> SlidemintResult<()> {
        if label.text.is_empty() {
            return Ok(());
        }
        let font = if label.bold {
            self.fonts.bold()
        } else {
            self.fonts.regular()
        };
        let font = font.ok_or_else(|| {
            SlidemintError::render(format!("No font available to draw '{}'", label.text))
        })?;
        draw_text_mut(
            canvas,
            opaque(label.rgb),
            label.x.round() as i32,
            label.y.round() as i32,
            PxScale::from(label.size_px),
            font,
            &label.text,
        );
        Ok(())
    }
}

/// Encode an RGBA canvas as PNG bytes.
pub fn encode_png(canvas: &RgbaImage) -> SlidemintResult<Vec<u8>> {
    let mut bytes = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| SlidemintError::image(format!("PNG encoding failed: {e}")))?;
    Ok(bytes)
}

fn decode(data: &ImageData, what: &str) -> SlidemintResult<RgbaImage> {
    image::load_from_memory(data.bytes())
        .map(|img| img.to_rgba8())
        .map_err(|e| SlidemintError::image(format!("Failed to decode {what}: {e}")))
}

/// Stretch `img` to a `size`-pixel square.
fn fit(img: RgbaImage, size: u32) -> RgbaImage {
    if img.dimensions() == (size, size) {
        return img;
    }
    imageops::resize(&img, size, size, FilterType::Triangle)
}

fn opaque(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

fn fill_rect(canvas: &mut RgbaImage, rect: &PixelRect, rgb: [u8; 3]) {
    let width = rect.width.round().max(1.0) as u32;
    let height = rect.height.round().max(1.0) as u32;
    draw_filled_rect_mut(
        canvas,
        Rect::at(rect.x.round() as i32, rect.y.round() as i32).of_size(width, height),
        opaque(rgb),
    );
}

/// Source-over blend of `src` onto `dst`.
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let value = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

/// Scale the avatar into `rect` and keep only its inscribed circle.
fn paint_avatar(canvas: &mut RgbaImage, avatar: RgbaImage, rect: &PixelRect) {
    let size = rect.width.round().max(1.0) as u32;
    let scaled = fit(avatar, size);
    let radius = size as f32 / 2.0;
    let left = rect.x.round() as i64;
    let top = rect.y.round() as i64;

    for (dx, dy, pixel) in scaled.enumerate_pixels() {
        let fx = dx as f32 + 0.5 - radius;
        let fy = dy as f32 + 0.5 - radius;
        if fx * fx + fy * fy > radius * radius {
            continue;
        }
        let (x, y) = (left + dx as i64, top + dy as i64);
        if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
            continue;
        }
        blend(canvas.get_pixel_mut(x as u32, y as u32), *pixel);
    }
}

/// Outline a rounded rectangle with a stroke centred on its edge.
fn stroke_pill(canvas: &mut RgbaImage, pill: &NavPill, rgb: [u8; 3]) {
    let rect = &pill.rect;
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;
    let radius = pill.radius.min(half_w).min(half_h);
    let cx = rect.x + half_w;
    let cy = rect.y + half_h;
    let half_stroke = pill.stroke / 2.0;
    let color = opaque(rgb);

    let x0 = (rect.x - pill.stroke).floor().max(0.0) as u32;
    let y0 = (rect.y - pill.stroke).floor().max(0.0) as u32;
    let x1 = ((rect.right() + pill.stroke).ceil().max(0.0) as u32).min(canvas.width());
    let y1 = ((rect.bottom() + pill.stroke).ceil().max(0.0) as u32).min(canvas.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let qx = (x as f32 + 0.5 - cx).abs() - (half_w - radius);
            let qy = (y as f32 + 0.5 - cy).abs() - (half_h - radius);
            let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
            let distance = outside + qx.max(qy).min(0.0) - radius;
            if distance.abs() <= half_stroke {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// Stroke a polyline with round joins and caps.
fn stroke_polyline(canvas: &mut RgbaImage, points: &[(f32, f32)], width: f32, rgb: [u8; 3]) {
    let radius = (width / 2.0).round().max(1.0) as i32;
    let color = opaque(rgb);
    for segment in points.windows(2) {
        let (ax, ay) = segment[0];
        let (bx, by) = segment[1];
        let steps = (bx - ax).abs().max((by - ay).abs()).ceil().max(1.0) as u32;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = ax + (bx - ax) * t;
            let y = ay + (by - ay) * t;
            draw_filled_circle_mut(canvas, (x.round() as i32, y.round() as i32), radius, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::CANVAS_PX;
    use slidemint_project_model::slide::Theme;

    fn png(width: u32, height: u32, rgba: [u8; 4]) -> ImageData {
        let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
        ImageData::png(encode_png(&img).unwrap())
    }

    fn renderer() -> SlideRenderer {
        SlideRenderer::with_bundled_fonts(CANVAS_PX).unwrap()
    }

    fn profile() -> Profile {
        Profile::new("ada", png(80, 80, [200, 40, 40, 255])).unwrap()
    }

    fn slide(theme: Theme) -> Slide {
        let mut slide = Slide::idle(png(1080, 1080, [20, 30, 120, 255]));
        slide.content = "Ship small, ship often".to_string();
        slide.theme = theme;
        slide
    }

    #[test]
    fn test_render_requires_profile() {
        let renderer = renderer();
        let err = renderer.render(&slide(Theme::Dark), 0, 1, None).unwrap_err();
        assert!(matches!(err, SlidemintError::Render { .. }));
    }

    #[test]
    fn test_undecodable_background_fails() {
        let renderer = renderer();
        let broken = Slide::idle(ImageData::png(vec![1, 2, 3, 4]));
        let err = renderer.render(&broken, 0, 1, Some(&profile())).unwrap_err();
        assert!(matches!(err, SlidemintError::Image { .. }));
    }

    #[test]
    fn test_undecodable_avatar_fails() {
        let renderer = renderer();
        let bad_profile = Profile::new("ada", ImageData::png(vec![9, 9])).unwrap();
        assert!(renderer
            .render(&slide(Theme::Dark), 0, 1, Some(&bad_profile))
            .is_err());
    }

    #[test]
    fn test_render_paints_overlays() {
        let renderer = renderer();
        let canvas = renderer
            .render(&slide(Theme::Dark), 0, 2, Some(&profile()))
            .unwrap();
        assert_eq!(canvas.dimensions(), (1080, 1080));

        let accent = Rgba([0x32, 0xCD, 0x32, 255]);
        // Inside the pillar (x 108..120, y from 378).
        assert_eq!(*canvas.get_pixel(113, 400), accent);
        // Background stays visible away from overlays.
        assert_eq!(*canvas.get_pixel(540, 100), Rgba([20, 30, 120, 255]));
        // Avatar centre is the profile colour, its corner is clipped.
        assert_eq!(*canvas.get_pixel(126, 990), Rgba([200, 40, 40, 255]));
        assert_eq!(*canvas.get_pixel(87, 951), Rgba([20, 30, 120, 255]));
        // Pill outline: left edge mid-height, interior left untouched.
        assert_eq!(*canvas.get_pixel(918, 990), accent);
        assert_eq!(*canvas.get_pixel(940, 960), Rgba([20, 30, 120, 255]));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = renderer();
        let profile = profile();
        let a = renderer
            .render_png(&slide(Theme::Light), 1, 3, Some(&profile))
            .unwrap();
        let b = renderer
            .render_png(&slide(Theme::Light), 1, 3, Some(&profile))
            .unwrap();
        assert_eq!(a, b);
    }

    /// Pixels inside `area` that differ from `background`.
    fn painted_pixels(
        canvas: &RgbaImage,
        area: (u32, u32, u32, u32),
        background: Rgba<u8>,
    ) -> usize {
        let (x0, y0, x1, y1) = area;
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| *canvas.get_pixel(x, y) != background)
            .count()
    }

    #[test]
    fn test_caption_text_is_painted() {
        let renderer = renderer();
        let profile = profile();
        let background = Rgba([20, 30, 120, 255]);
        // Right of the pillar, across the first caption line.
        let caption_area = (160, 380, 1000, 430);

        let mut first = slide(Theme::Dark);
        first.content = "Hiring is a product problem and your careers page".to_string();
        let mut second = slide(Theme::Dark);
        second.content = "Most teams measure output when they should measure flow".to_string();

        let a = renderer.render(&first, 0, 2, Some(&profile)).unwrap();
        let b = renderer.render(&second, 0, 2, Some(&profile)).unwrap();

        assert!(painted_pixels(&a, caption_area, background) > 500);
        let white = a
            .enumerate_pixels()
            .filter(|(x, y, p)| {
                (160..1000).contains(x)
                    && (380..430).contains(y)
                    && p.0[..3].iter().all(|&c| c >= 230)
            })
            .count();
        assert!(white > 100, "dark theme captions are white, found {white} white pixels");

        let differing = a.pixels().zip(b.pixels()).filter(|(p, q)| p != q).count();
        assert!(differing > 500, "different captions should differ, got {differing}");
    }

    #[test]
    fn test_placeholder_username_and_counter_are_painted() {
        let renderer = renderer();
        let background = Rgba([20, 30, 120, 255]);
        let mut empty = slide(Theme::Dark);
        empty.content.clear();

        let canvas = renderer.render(&empty, 0, 2, Some(&profile())).unwrap();

        // Placeholder caption beside the pillar.
        assert!(painted_pixels(&canvas, (160, 380, 700, 430), background) > 200);
        // Username and counter to the right of the avatar.
        assert!(painted_pixels(&canvas, (186, 974, 400, 1006), background) > 50);
        assert!(painted_pixels(&canvas, (186, 1010, 400, 1034), background) > 30);
    }

    #[test]
    fn test_render_without_fonts_fails() {
        let renderer = SlideRenderer::new(FontSet::empty(), CANVAS_PX);
        let err = renderer
            .render(&slide(Theme::Dark), 0, 1, Some(&profile()))
            .unwrap_err();
        assert!(matches!(err, SlidemintError::Render { .. }));
    }

    #[test]
    fn test_from_default_config_draws_text() {
        let renderer = SlideRenderer::from_defaults(&ExportDefaults::default()).unwrap();
        assert!(renderer.fonts().can_draw_text());
        let canvas = renderer
            .render(&slide(Theme::Dark), 0, 1, Some(&profile()))
            .unwrap();
        assert!(painted_pixels(&canvas, (160, 380, 1000, 430), Rgba([20, 30, 120, 255])) > 500);
    }

    #[test]
    fn test_small_background_is_stretched() {
        let renderer = renderer();
        let small = Slide::idle(png(8, 4, [10, 10, 10, 255]));
        let canvas = renderer.render(&small, 0, 1, Some(&profile())).unwrap();
        assert_eq!(canvas.dimensions(), (1080, 1080));
    }

    #[test]
    fn test_blend_respects_alpha() {
        let mut dst = Rgba([0, 0, 0, 255]);
        blend(&mut dst, Rgba([255, 255, 255, 0]));
        assert_eq!(dst, Rgba([0, 0, 0, 255]));
        blend(&mut dst, Rgba([255, 0, 0, 255]));
        assert_eq!(dst, Rgba([255, 0, 0, 255]));
    }
}
