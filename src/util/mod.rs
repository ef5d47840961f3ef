//! Utility types shared by the loader, the encoders and the frame loop.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam plus [`Bounds3`]

mod error;
mod math;

pub use error::*;
pub use math::*;
