//! SlideMint Layout Core
//!
//! One text-layout function used by both the interactive overlay and the
//! export renderer, so caption height (and therefore pillar height) is
//! computed from `(text, width, font metrics)` instead of being measured
//! after rendering.
//!
//! - **Metrics:** glyph-advance measurement from a font, or a fixed-advance
//!   fallback when no font is configured
//! - **Wrap:** greedy word wrapping
//! - **Caption:** caption block and pillar geometry for a given canvas size

pub mod caption;
pub mod fonts;
pub mod metrics;
pub mod wrap;

pub use caption::*;
pub use fonts::*;
pub use metrics::*;
pub use wrap::*;
