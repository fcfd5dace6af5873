//! SlideMint Render Engine
//!
//! Deterministic rasterization of carousel slides and the export
//! pipeline built on it.
//!
//! # Pipeline Architecture
//!
//! ```text
//! slide record ──┐
//!                ├── compose (pixel plan, shared caption layout)
//! profile ───────┘         │
//!                          ├── background (stretched to canvas)
//!                          ├── pillar + caption
//!                          ├── avatar (circle clip) + username + counter
//!                          └── navigation pill + glyph
//!                                   │
//!                       ┌───────────┴───────────┐
//!                       ▼                       ▼
//!                 slide-<n>.png           carousel.pdf
//! ```

pub mod compositor;
pub mod export;
pub mod raster;

pub use compositor::{compose_slide, SlideComposition, ACCENT_RGB, CANVAS_PX};
pub use export::*;
pub use raster::{encode_png, SlideRenderer};
