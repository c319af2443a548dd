//! Conversion engine for the fragments core.
//!
//! Produces target-type bytes from source-type bytes along the closed
//! conversion graph defined in `frag-types`. Text conversions are pure string
//! transforms; image conversions are straight container re-encodes through a
//! raster codec, with no resizing, cropping, or quality negotiation.
//!
//! # Key Types
//!
//! - [`ConversionEngine`] — resolves the requested target, checks the graph,
//!   and dispatches to the concrete transform
//! - [`ConvertError`] / [`ConvertResult`] — failure taxonomy for callers

pub mod engine;
pub mod error;
pub mod raster;
pub mod text;

pub use engine::ConversionEngine;
pub use error::{ConvertError, ConvertResult};
