//! Negative Develop - library crate.
//!
//! Converts photographed colour negatives into positives: film-base
//! sampling, the per-channel conversion pipeline, and the preview /
//! full-resolution originals it runs against.

pub mod buffer;
pub mod color;
pub mod error;
pub mod generation;
pub mod image_io;
pub mod params;
pub mod pipeline;
pub mod resolution;

pub use buffer::PixelBuffer;
pub use error::{Error, Result};
pub use params::{BaseColor, GlobalTone, NegativeParams, ParamsUpdate, ToneParameters};
pub use resolution::{RenderTarget, ResolutionManager};
