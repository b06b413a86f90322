//! Per-pixel arithmetic, noise generation and statistics over [`PixelBuffer`]s.
//!
//! Every function is generic over the storage type through
//! [`ik_core::Pixel`]. Arithmetic runs in the storage type's accumulator
//! (`Pixel::Sum`) and is narrowed back to storage at the end; `_bounded`
//! variants clip in the accumulator first.
//!
//! Functions taking more than one buffer fail with
//! [`Error::ShapeMismatch`] before writing anything. Outputs are written in
//! row-major order right after the matching inputs are read, so the same
//! buffer may be passed as input and output.
//!
//! [`PixelBuffer`]: ik_core::PixelBuffer
//! [`Error::ShapeMismatch`]: ik_core::Error::ShapeMismatch

pub mod misc;
pub mod noise;
pub mod pixel_math;
pub mod statistics;

mod rows;

pub use misc::{fill, fill_rectangle, flip_horizontal, flip_vertical};
pub use noise::{NoiseSource, add_gaussian, add_uniform, fill_gaussian, fill_uniform};
pub use pixel_math::{
    abs, add, average_band, bound_image, diff_abs, divide, divide_bounded, multiply,
    multiply_bounded, plus, plus_bounded, subtract,
};
pub use statistics::{max_abs, max_value, mean, min_value, sum, variance};

use ik_core::Error;

pub(crate) fn reject(msg: impl Into<String>) -> Error {
    let msg = msg.into();
    tracing::trace!(%msg, "rejecting arguments");
    Error::InvalidArgument(msg)
}
