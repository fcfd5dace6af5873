//! Edit-mode gated drag controller.
//!
//! A drag starts on pointer-down over an element of the slide in edit mode
//! and ends on the next pointer-up, wherever it happens. While dragging,
//! each pointer-move maps the pointer into the slide's percentage space and
//! produces a new [`SlidePositions`] record for the host to store.
//!
//! The caption and its pillar move as one unit: they always share `y`, and
//! the horizontal gap captured at drag start is kept for the whole drag.

use slidemint_project_model::position::{clamp_percent, ElementId, SlidePositions, PERCENT_MAX};
use slidemint_project_model::slide::SlideId;

/// On-screen bounds of the slide container, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Map a client-space pointer into clamped container percentages.
    ///
    /// A zero-sized (or degenerate) axis maps to 0.
    pub fn to_percent(&self, px: f64, py: f64) -> (f64, f64) {
        (
            axis_percent(px - self.left, self.width),
            axis_percent(py - self.top, self.height),
        )
    }
}

fn axis_percent(offset: f64, extent: f64) -> f64 {
    if extent.is_nan() || extent <= 0.0 {
        return 0.0;
    }
    clamp_percent(offset / extent * PERCENT_MAX)
}

/// Current drag, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        slide: SlideId,
        element: ElementId,
        /// `content.x - pillar.x` when the drag started.
        offset_x: f64,
    },
}

/// Edit mode and drag state for a whole carousel.
///
/// At most one slide is in edit mode at a time, and only that slide accepts
/// drags.
#[derive(Debug, Clone, Default)]
pub struct OverlayEditor {
    editing: Option<SlideId>,
    drag: DragState,
}

impl OverlayEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slide currently in edit mode.
    pub fn editing(&self) -> Option<&SlideId> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self, slide: &SlideId) -> bool {
        self.editing.as_ref() == Some(slide)
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Element being dragged, if any.
    pub fn dragging(&self) -> Option<ElementId> {
        match &self.drag {
            DragState::Dragging { element, .. } => Some(*element),
            DragState::Idle => None,
        }
    }

    /// Toggle edit mode for `slide`. Returns whether it is now editing.
    ///
    /// Turning edit mode on for one slide turns it off for any other.
    /// Leaving edit mode ends any drag in progress.
    pub fn toggle_edit(&mut self, slide: &SlideId) -> bool {
        if self.is_editing(slide) {
            self.exit_edit();
            false
        } else {
            self.drag = DragState::Idle;
            self.editing = Some(slide.clone());
            tracing::debug!(slide = %slide, "Entered edit mode");
            true
        }
    }

    /// Leave edit mode, ending any drag.
    pub fn exit_edit(&mut self) {
        if let Some(slide) = self.editing.take() {
            tracing::debug!(slide = %slide, "Left edit mode");
        }
        self.drag = DragState::Idle;
    }

    /// Drop any state tied to a slide that no longer exists.
    pub fn forget_slide(&mut self, slide: &SlideId) {
        if self.is_editing(slide) {
            self.exit_edit();
        }
    }

    /// Begin dragging `element` on `slide`.
    ///
    /// Ignored (returns `false`) unless `slide` is in edit mode.
    pub fn pointer_down(
        &mut self,
        slide: &SlideId,
        element: ElementId,
        positions: &SlidePositions,
    ) -> bool {
        if !self.is_editing(slide) {
            return false;
        }
        let offset_x = positions.caption_offset();
        tracing::trace!(slide = %slide, element = element.as_str(), offset_x, "Drag started");
        self.drag = DragState::Dragging {
            slide: slide.clone(),
            element,
            offset_x,
        };
        true
    }

    /// Compute the positions produced by moving the pointer to `pointer`.
    ///
    /// Returns `None` when nothing on `slide` is being dragged. The input
    /// record is never modified.
    pub fn pointer_move(
        &self,
        slide: &SlideId,
        pointer: (f64, f64),
        rect: &ContainerRect,
        positions: &SlidePositions,
    ) -> Option<SlidePositions> {
        let DragState::Dragging {
            slide: dragged,
            element,
            offset_x,
        } = &self.drag
        else {
            return None;
        };
        if dragged != slide {
            return None;
        }
        let (x, y) = rect.to_percent(pointer.0, pointer.1);
        Some(move_element(positions, *element, *offset_x, x, y))
    }

    /// End the drag. Safe to call when nothing is being dragged.
    pub fn pointer_up(&mut self) {
        if let DragState::Dragging { element, .. } = &self.drag {
            tracing::trace!(element = element.as_str(), "Drag ended");
        }
        self.drag = DragState::Idle;
    }
}

/// Place `element` at `(x, y)` and carry its companion along.
///
/// For the caption and the pillar, `x` is limited to the range that keeps
/// the companion inside `[0, 100]` at the same `offset_x`.
pub fn move_element(
    positions: &SlidePositions,
    element: ElementId,
    offset_x: f64,
    x: f64,
    y: f64,
) -> SlidePositions {
    let mut next = *positions;
    let y = clamp_percent(y);
    match element {
        ElementId::Content => {
            let x = clamp_linked(x, offset_x);
            next.content.x = x;
            next.content.y = y;
            next.pillar.x = clamp_percent(x - offset_x);
            next.pillar.y = y;
        }
        ElementId::Pillar => {
            let x = clamp_linked(x, -offset_x);
            next.pillar.x = x;
            next.pillar.y = y;
            next.content.x = clamp_percent(x + offset_x);
            next.content.y = y;
        }
        ElementId::Branding => {
            next.branding.x = clamp_percent(x);
            next.branding.y = y;
        }
        ElementId::Navigation => {
            next.navigation.x = clamp_percent(x);
            next.navigation.y = y;
        }
    }
    next
}

/// Clamp `x` so both `x` and `x - companion_offset` stay in range.
fn clamp_linked(x: f64, companion_offset: f64) -> f64 {
    let low = companion_offset.max(0.0);
    let high = (PERCENT_MAX + companion_offset).min(PERCENT_MAX);
    if low > high {
        // Only reachable with an out-of-range offset.
        return clamp_percent(x);
    }
    clamp_percent(x).clamp(low, high)
}
