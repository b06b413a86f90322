//! Umbrella crate for the `image-kernels` workspace.
//!
//! Buffers, interpolation kernels and the distortion engine are re-exported
//! at the top level. Per-pixel arithmetic lives under [`math`], since its
//! function names (`add`, `abs`, `sum`, ...) read best with a prefix.

pub use ik_core::*;
pub use ik_distort::*;
pub use ik_interp::*;
pub use ik_math as math;
