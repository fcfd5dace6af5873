//! SlideMint Common Utilities
//!
//! Shared infrastructure for all SlideMint crates:
//! - Error types and result aliases
//! - Configuration loading
//! - API credential storage
//! - Tracing/logging initialization

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;

pub use config::*;
pub use credentials::*;
pub use error::*;
