//! Interpolation kernels for sampling pixel buffers at fractional coordinates.
//!
//! ## Sampling Coordinates
//! Integer coordinates refer to pixel centers. Nearest-neighbor rounds to the
//! closest center; bilinear uses the floor-based 2x2 neighborhood; bicubic
//! uses the 4x4 neighborhood around `floor(x), floor(y)`.
//!
//! ## Safe Domain
//! [`Interpolate::sample`] may only be called where the kernel's footprint
//! stays inside the image. Each kernel declares its footprint as a
//! [`Margin`], and [`SafeDomain`] turns that into a coordinate test callers
//! can evaluate once per image instead of per pixel.
//!
//! ## Border Modes
//! [`Interpolate::sample_border`] samples anywhere by resolving outside taps
//! with clamp, constant fill, reflect-101 or wrap.

mod bicubic;
mod bilinear;
mod border;
mod kernel;
mod nearest;

pub use bicubic::Bicubic;
pub use bilinear::Bilinear;
pub use border::BorderMode;
pub use kernel::{Interpolate, InterpolationType, Margin, SafeDomain};
pub use nearest::NearestNeighbor;
