//! SlideMint Project Model
//!
//! Defines the core data contracts for SlideMint carousels:
//! - **Positions:** Percentage coordinates for the four overlay elements
//! - **Slides:** Background image, caption, theme, and processing status
//! - **Deck:** The ordered slide sequence and its on-disk file
//! - **Profile:** Username and avatar used for branding
//! - **Draft:** Narrative post requests and generated results
//!
//! All overlay coordinates are percentages `[0.0, 100.0]` of the square
//! slide canvas so the same record drives the live editor and the export
//! raster.

pub mod deck;
pub mod draft;
pub mod image_data;
pub mod position;
pub mod profile;
pub mod project;
pub mod slide;

pub use deck::*;
pub use draft::*;
pub use image_data::*;
pub use position::*;
pub use profile::*;
pub use project::*;
pub use slide::*;
