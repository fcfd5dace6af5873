//! SlideMint Generative AI
//!
//! Client for the hosted generative model behind SlideMint:
//! - **Narrative:** Long-form post plus one title/image prompt per insight,
//!   grounded with web search
//! - **Imagery:** Square slide images generated from a prompt or edited
//!   from an existing image
//! - **Analysis:** Theme, caption, and caption placement for an uploaded
//!   background image
//!
//! Every call goes through [`GenerativeBackend`], so the studio can be
//! driven by [`GeminiClient`] or by a test double.

pub mod analysis;
pub mod client;
pub mod error;
pub mod imagery;
pub mod json;
pub mod narrative;
pub mod protocol;

pub use client::{AiConfig, GeminiClient, GenerativeBackend};
pub use error::{AiError, ErrorCategory};
