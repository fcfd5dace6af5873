//! SlideMint Studio
//!
//! Drives the generative backend for the two authoring flows:
//! - **Draft session:** narrative post, then one image per point, fanned
//!   out concurrently and applied as each finishes
//! - **Carousel studio:** background images attached to a deck and
//!   analysed concurrently
//!
//! Every in-flight call holds a [`Ticket`] for the record it will update.
//! Removing or re-requesting a record invalidates its ticket, so a late
//! response can never land on the wrong point or slide.

pub mod carousel;
pub mod error;
pub mod registry;
pub mod session;

#[cfg(test)]
mod testing;

pub use carousel::{CarouselStudio, UploadedImage};
pub use error::{StudioError, UserFacingError};
pub use registry::{ApplyOutcome, TaskRegistry, Ticket};
pub use session::DraftSession;
