//! SlideMint Overlay Editor
//!
//! Interactive editing of the four slide overlays:
//! - **Drag:** Edit-mode gated drag state machine that turns pointer
//!   positions into clamped percentage coordinates, keeping the caption and
//!   its pillar moving as one unit
//! - **Feedback:** Derives the pillar height from the shared caption layout
//!   whenever caption text or width changes
//!
//! Pure state and arithmetic; the host UI feeds pointer events in and
//! writes the returned positions back to its slide list.

pub mod drag;
pub mod feedback;

pub use drag::{ContainerRect, DragState, OverlayEditor};
pub use feedback::HeightFeedback;
