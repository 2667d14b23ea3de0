//! Image captioning provider abstraction.
//!
//! This module provides a trait-based abstraction over captioning backends,
//! so the pipeline can work with any service that turns an image into a
//! natural-language description.

mod inference;
mod provider;

pub use inference::InferenceCaptioner;
pub use provider::{CaptionError, Captioner};
