//! Geometric resampling of pixel buffers.
//!
//! Every entry point walks the output grid in row-major order, maps each
//! output pixel through a [`PixelTransform`] to a source point, and samples
//! the input there with an [`ik_interp::Interpolate`] kernel.
//!
//! Output pixels whose source point falls outside the kernel's safe domain
//! are left untouched under [`DomainPolicy::Skip`]. Fill the output first when
//! those pixels need a defined value, or use [`DomainPolicy::Border`].

mod distort;
mod transform;

pub use distort::{
    DistortStats, DomainPolicy, affine, distort, distort_with_policy, rotate, rotate_with, scale,
    scale_with,
};
pub use transform::{Affine2, PixelTransform, ScaleTransform};
