//! Caption height feedback.
//!
//! The pillar is as tall as the caption block it sits beside. Instead of
//! measuring the rendered caption, the height is derived from the same
//! [`CaptionLayout`] the export renderer uses, so it is known as soon as the
//! caption text or width changes.

use slidemint_layout_core::caption::{display_caption, CaptionLayout, CaptionStyle};
use slidemint_layout_core::metrics::TextMetrics;
use slidemint_project_model::slide::{Slide, SlideEdit};

/// Keeps `positions.pillar.height` in step with the caption.
#[derive(Debug, Clone)]
pub struct HeightFeedback<M> {
    metrics: M,
    canvas_px: u32,
}

impl<M: TextMetrics> HeightFeedback<M> {
    /// Feedback for a slide shown `canvas_px` wide.
    pub fn new(metrics: M, canvas_px: u32) -> Self {
        Self { metrics, canvas_px }
    }

    pub fn layout(&self, slide: &Slide) -> CaptionLayout {
        CaptionLayout::compute(
            display_caption(&slide.content),
            slide.positions.content.width,
            self.canvas_px,
            &CaptionStyle::for_canvas(self.canvas_px),
            &self.metrics,
        )
    }

    /// Pillar height for `slide`, as a percentage of the canvas.
    pub fn pillar_height_percent(&self, slide: &Slide) -> f64 {
        self.layout(slide).pillar_height_percent(self.canvas_px)
    }

    /// Write the derived pillar height into the slide. Returns whether it
    /// changed.
    pub fn refresh(&self, slide: &mut Slide) -> bool {
        let height = self.pillar_height_percent(slide);
        let changed = (slide.positions.pillar.height - height).abs() > f64::EPSILON;
        if changed {
            tracing::trace!(
                slide = %slide.id,
                from = slide.positions.pillar.height,
                to = height,
                "Pillar height updated"
            );
            slide.positions.pillar.height = height;
        }
        changed
    }

    /// Apply a user edit and re-derive the pillar height.
    pub fn apply_edit(&self, slide: &mut Slide, edit: SlideEdit) {
        slide.apply_edit(edit);
        self.refresh(slide);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidemint_layout_core::metrics::FixedAdvanceMetrics;
    use slidemint_project_model::image_data::ImageData;

    fn slide(content: &str) -> Slide {
        let mut slide = Slide::idle(ImageData::png(vec![0]));
        slide.content = content.to_string();
        slide
    }

    #[test]
    fn test_single_line_height() {
        let feedback = HeightFeedback::new(FixedAdvanceMetrics::default(), 1080);
        let height = feedback.pillar_height_percent(&slide("Ship it"));
        assert!((height - 62.0 / 1080.0 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_longer_caption_grows_pillar() {
        let feedback = HeightFeedback::new(FixedAdvanceMetrics::default(), 1080);
        let mut s = slide("Short");
        feedback.refresh(&mut s);
        let before = s.positions.pillar.height;

        feedback.apply_edit(
            &mut s,
            SlideEdit::Content(
                "A much longer caption that will certainly need more than one line to fit"
                    .to_string(),
            ),
        );
        assert!(s.positions.pillar.height > before);
    }

    #[test]
    fn test_narrower_box_grows_pillar() {
        let feedback = HeightFeedback::new(FixedAdvanceMetrics::default(), 1080);
        let mut s = slide("Teams that document decisions move faster every quarter");
        feedback.refresh(&mut s);
        let wide = s.positions.pillar.height;

        let mut positions = s.positions;
        positions.set_content_width(25.0);
        feedback.apply_edit(&mut s, SlideEdit::Positions(positions));
        assert!(s.positions.pillar.height > wide);
    }

    #[test]
    fn test_blank_caption_uses_placeholder_height() {
        let feedback = HeightFeedback::new(FixedAdvanceMetrics::default(), 1080);
        let blank = feedback.pillar_height_percent(&slide(""));
        let placeholder = feedback.pillar_height_percent(&slide("Placeholder content"));
        assert_eq!(blank, placeholder);
    }

    #[test]
    fn test_refresh_reports_no_change_when_stable() {
        let feedback = HeightFeedback::new(FixedAdvanceMetrics::default(), 1080);
        let mut s = slide("Stable");
        feedback.refresh(&mut s);
        assert!(!feedback.refresh(&mut s));
    }
}
