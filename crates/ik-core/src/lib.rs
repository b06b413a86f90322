//! Foundational primitives for pixel kernels.
//!
//! ## Buffers, Stride and Views
//! [`PixelBuffer`] addresses pixel `(x, y)` at `start + y * stride + x` in
//! element units. `stride` may exceed `width`, which is how padded storage
//! and sub-views are expressed. Views share reference-counted storage with
//! the buffer they came from, so writes through a view show up in the parent.
//!
//! ## Numeric Policy
//! Each storage type implements [`Pixel`], which fixes the accumulator
//! (`Pixel::Sum`) used during arithmetic, the saturation range, and the rules
//! for narrowing results back to storage. Kernels are written once against
//! this trait.
//!
//! ## Errors
//! Checked accessors fail with [`Error::OutOfBounds`]; multi-buffer operations
//! fail with [`Error::ShapeMismatch`] before touching any pixel.

mod buffer;
mod dynamic;
mod error;
mod geom;
mod multiband;
mod pixel;

pub use buffer::{PixelBuffer, check_same_shape};
pub use dynamic::DynBuffer;
pub use error::{Error, Shape};
pub use geom::Point2f;
pub use multiband::MultiBand;
pub use pixel::{Accumulator, Pixel, SignedPixel, StorageType, Widen};
