//! Random fills and additive noise.
//!
//! Integer storage draws integer offsets, float storage draws real ones.
//! Arguments are validated before the first pixel is touched.

use std::cmp::Ordering;

use ik_core::{Accumulator, Error, Pixel, PixelBuffer};
use rand::Rng;
use rand::distributions::{Distribution, Standard};
use rand_distr::StandardNormal;

use crate::reject;
use crate::rows::update;

/// Source of the random draws used by the noise functions.
pub trait NoiseSource {
    /// Uniform integer in `[0, bound)`. `bound` is never zero.
    fn next_below(&mut self, bound: u64) -> u64;

    /// Uniform real in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Standard normal draw.
    fn next_gaussian(&mut self) -> f64;
}

impl<R: Rng> NoiseSource for R {
    #[inline]
    fn next_below(&mut self, bound: u64) -> u64 {
        self.gen_range(0..bound)
    }

    #[inline]
    fn next_unit(&mut self) -> f64 {
        Standard.sample(self)
    }

    #[inline]
    fn next_gaussian(&mut self) -> f64 {
        StandardNormal.sample(self)
    }
}

/// Draws an offset from `[0, span)` and adds it to `min`, where `span` is the
/// checked `max - min`.
///
/// Float draws that round up to `max` are redrawn so the upper bound stays
/// exclusive.
fn draw_uniform<T: Pixel>(rng: &mut impl NoiseSource, min: T::Sum, span: T::Sum) -> T::Sum {
    if T::STORAGE.is_integer() {
        return min + T::Sum::from_u64(rng.next_below(span.to_u64()));
    }

    let max = min + span;
    loop {
        let v = min + T::Sum::from_f64(rng.next_unit() * span.to_f64());
        if v < max {
            return v;
        }
    }
}

/// Returns the width of `[min, max)`. Rejects empty ranges and ranges whose
/// width the accumulator cannot represent, such as `[-f32::MAX, f32::MAX)`.
fn check_uniform_range<S: Accumulator>(min: S, max: S) -> Result<S, Error> {
    if min.partial_cmp(&max) != Some(Ordering::Less) {
        return Err(reject(format!(
            "uniform range requires min < max, got [{min:?}, {max:?})"
        )));
    }
    max.checked_sub(min).ok_or_else(|| {
        reject(format!(
            "uniform range [{min:?}, {max:?}) is wider than the accumulator"
        ))
    })
}

fn check_clip_range<S: Accumulator>(lower: S, upper: S) -> Result<(), Error> {
    if lower <= upper {
        Ok(())
    } else {
        Err(reject(format!(
            "clip range requires lower <= upper, got [{lower:?}, {upper:?}]"
        )))
    }
}

fn check_sigma(sigma: f64) -> Result<(), Error> {
    if sigma.is_finite() && sigma >= 0.0 {
        Ok(())
    } else {
        Err(reject(format!("sigma must be finite and >= 0, got {sigma}")))
    }
}

/// Replaces every pixel with a draw from `[min, max)`.
pub fn fill_uniform<T: Pixel>(
    img: &PixelBuffer<T>,
    rng: &mut impl NoiseSource,
    min: T::Sum,
    max: T::Sum,
) -> Result<(), Error> {
    let span = check_uniform_range(min, max)?;
    update(img, |_| T::from_sum(draw_uniform::<T>(rng, min, span)));
    Ok(())
}

/// Replaces every pixel with `mean + sigma * Z`, clipped to `[lower, upper]`.
pub fn fill_gaussian<T: Pixel>(
    img: &PixelBuffer<T>,
    rng: &mut impl NoiseSource,
    mean: f64,
    sigma: f64,
    lower: T::Sum,
    upper: T::Sum,
) -> Result<(), Error> {
    check_sigma(sigma)?;
    check_clip_range(lower, upper)?;

    update(img, |_| {
        let v = T::Sum::from_f64(rng.next_gaussian() * sigma + mean);
        T::from_sum(v.clip(lower, upper))
    });
    Ok(())
}

/// Adds a draw from `[min, max)` to every pixel. Integer storage saturates at
/// its range instead of wrapping.
pub fn add_uniform<T: Pixel>(
    img: &PixelBuffer<T>,
    rng: &mut impl NoiseSource,
    min: T::Sum,
    max: T::Sum,
) -> Result<(), Error> {
    let span = check_uniform_range(min, max)?;
    update(img, |p| {
        T::saturate(p.to_sum().saturating_add(draw_uniform::<T>(rng, min, span)))
    });
    Ok(())
}

/// Adds `sigma * Z` to every pixel and clips the result to `[lower, upper]`.
pub fn add_gaussian<T: Pixel>(
    img: &PixelBuffer<T>,
    rng: &mut impl NoiseSource,
    sigma: f64,
    lower: T::Sum,
    upper: T::Sum,
) -> Result<(), Error> {
    check_sigma(sigma)?;
    check_clip_range(lower, upper)?;

    update(img, |p| {
        let v = p
            .to_sum()
            .saturating_add(T::Sum::from_f64(rng.next_gaussian() * sigma));
        T::from_sum(v.clip(lower, upper))
    });
    Ok(())
}
