//! Row-major loop skeletons shared by the kernels.
//!
//! Each output element is written right after the input elements at the same
//! position are read, so an input may be passed again as the output.

use ik_core::{Error, Pixel, PixelBuffer, check_same_shape};

#[inline]
pub(crate) fn update<T: Pixel>(img: &PixelBuffer<T>, mut f: impl FnMut(T) -> T) {
    for y in 0..img.height() {
        for cell in img.row(y) {
            cell.set(f(cell.get()));
        }
    }
}

#[inline]
pub(crate) fn map_into<A: Pixel, B: Pixel>(
    input: &PixelBuffer<A>,
    output: &PixelBuffer<B>,
    mut f: impl FnMut(A) -> B,
) -> Result<(), Error> {
    check_same_shape(input, output)?;

    for y in 0..input.height() {
        for (src, dst) in input.row(y).iter().zip(output.row(y)) {
            dst.set(f(src.get()));
        }
    }
    Ok(())
}

#[inline]
pub(crate) fn zip_into<A: Pixel, B: Pixel, C: Pixel>(
    a: &PixelBuffer<A>,
    b: &PixelBuffer<B>,
    output: &PixelBuffer<C>,
    mut f: impl FnMut(A, B) -> C,
) -> Result<(), Error> {
    check_same_shape(a, b)?;
    check_same_shape(a, output)?;

    for y in 0..a.height() {
        let rows = a.row(y).iter().zip(b.row(y)).zip(output.row(y));
        for ((pa, pb), dst) in rows {
            dst.set(f(pa.get(), pb.get()));
        }
    }
    Ok(())
}
