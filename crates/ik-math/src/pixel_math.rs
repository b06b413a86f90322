//! Per-pixel arithmetic between buffers and scalars.

use ik_core::{
    Accumulator, Error, MultiBand, Pixel, PixelBuffer, SignedPixel, Widen, check_same_shape,
};

use crate::reject;
use crate::rows::{map_into, update, zip_into};

/// `output = input * scalar`, computed in floating point and truncated toward
/// zero for integer storage.
pub fn multiply<T: Pixel>(
    input: &PixelBuffer<T>,
    scalar: f64,
    output: &PixelBuffer<T>,
) -> Result<(), Error> {
    map_into(input, output, |p| T::from_f64(p.to_f64() * scalar))
}

/// Like [`multiply`], clipping the product to `[lower, upper]` before it is
/// narrowed to storage.
pub fn multiply_bounded<T: Pixel>(
    input: &PixelBuffer<T>,
    scalar: f64,
    lower: T::Sum,
    upper: T::Sum,
    output: &PixelBuffer<T>,
) -> Result<(), Error> {
    check_bounds(lower, upper)?;
    map_into(input, output, |p| {
        T::from_sum(T::Sum::from_f64(p.to_f64() * scalar).clip(lower, upper))
    })
}

/// `output = input / denominator`. A zero denominator is rejected.
pub fn divide<T: Pixel>(
    input: &PixelBuffer<T>,
    denominator: f64,
    output: &PixelBuffer<T>,
) -> Result<(), Error> {
    check_denominator(denominator)?;
    map_into(input, output, |p| T::from_f64(p.to_f64() / denominator))
}

pub fn divide_bounded<T: Pixel>(
    input: &PixelBuffer<T>,
    denominator: f64,
    lower: T::Sum,
    upper: T::Sum,
    output: &PixelBuffer<T>,
) -> Result<(), Error> {
    check_denominator(denominator)?;
    check_bounds(lower, upper)?;
    map_into(input, output, |p| {
        T::from_sum(T::Sum::from_f64(p.to_f64() / denominator).clip(lower, upper))
    })
}

/// `output = input + value` in the accumulator, narrowed by plain cast.
///
/// The addition saturates at the accumulator's range, so an extreme `value`
/// is pinned there before the cast.
pub fn plus<T: Pixel>(
    input: &PixelBuffer<T>,
    value: T::Sum,
    output: &PixelBuffer<T>,
) -> Result<(), Error> {
    map_into(input, output, |p| T::from_sum(p.to_sum().saturating_add(value)))
}

pub fn plus_bounded<T: Pixel>(
    input: &PixelBuffer<T>,
    value: T::Sum,
    lower: T::Sum,
    upper: T::Sum,
    output: &PixelBuffer<T>,
) -> Result<(), Error> {
    check_bounds(lower, upper)?;
    map_into(input, output, |p| {
        T::from_sum(p.to_sum().saturating_add(value).clip(lower, upper))
    })
}

/// Clips every pixel into `[min, max]` in place.
pub fn bound_image<T: Pixel>(img: &PixelBuffer<T>, min: T::Sum, max: T::Sum) -> Result<(), Error> {
    check_bounds(min, max)?;
    update(img, |p| T::from_sum(p.to_sum().clip(min, max)));
    Ok(())
}

/// Absolute value of every pixel. The most negative integer maps to itself.
pub fn abs<T: SignedPixel>(input: &PixelBuffer<T>, output: &PixelBuffer<T>) -> Result<(), Error> {
    map_into(input, output, |p| T::from_sum(p.to_sum().abs()))
}

/// `output = |a - b|`, with the difference taken in the accumulator.
pub fn diff_abs<T: Pixel>(
    a: &PixelBuffer<T>,
    b: &PixelBuffer<T>,
    output: &PixelBuffer<T>,
) -> Result<(), Error> {
    zip_into(a, b, output, |pa, pb| {
        T::from_sum((pa.to_sum() - pb.to_sum()).abs())
    })
}

/// `output = a + b` into the wider storage type.
pub fn add<T: Widen>(
    a: &PixelBuffer<T>,
    b: &PixelBuffer<T>,
    output: &PixelBuffer<T::Wide>,
) -> Result<(), Error> {
    zip_into(a, b, output, |pa, pb| {
        <T::Wide as Pixel>::from_sum(pa.widen().to_sum() + pb.widen().to_sum())
    })
}

/// `output = a - b` into the wider storage type.
pub fn subtract<T: Widen>(
    a: &PixelBuffer<T>,
    b: &PixelBuffer<T>,
    output: &PixelBuffer<T::Wide>,
) -> Result<(), Error> {
    zip_into(a, b, output, |pa, pb| {
        <T::Wide as Pixel>::from_sum(pa.widen().to_sum() - pb.widen().to_sum())
    })
}

/// Per-pixel mean across all bands. Integer storage uses integer division.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(bands = input.num_bands(), width = input.width(), height = input.height())
)]
pub fn average_band<T: Pixel>(input: &MultiBand<T>, output: &PixelBuffer<T>) -> Result<(), Error> {
    let bands = input.bands();
    check_same_shape(&bands[0], output)?;

    let n = T::Sum::from_usize(bands.len());
    for y in 0..output.height() {
        let rows: Vec<_> = bands.iter().map(|b| b.row(y)).collect();
        for (x, dst) in output.row(y).iter().enumerate() {
            let mut total = T::Sum::ZERO;
            for row in &rows {
                total += row[x].get().to_sum();
            }
            dst.set(T::from_sum(total / n));
        }
    }
    Ok(())
}

fn check_bounds<S: Accumulator>(lower: S, upper: S) -> Result<(), Error> {
    if lower <= upper {
        Ok(())
    } else {
        Err(reject(format!(
            "bounds require lower <= upper, got [{lower:?}, {upper:?}]"
        )))
    }
}

fn check_denominator(denominator: f64) -> Result<(), Error> {
    if denominator == 0.0 {
        Err(reject("division by zero"))
    } else {
        Ok(())
    }
}
