//! Whole-image reductions.
//!
//! Reductions over an unshaped placeholder return the fold's starting value:
//! `T::MAX` for [`min_value`], `T::MIN` for [`max_value`], zero for sums and
//! NaN for [`mean`] and [`variance`].

use ik_core::{Accumulator, Pixel, PixelBuffer};

fn fold<T: Pixel, A>(img: &PixelBuffer<T>, init: A, mut f: impl FnMut(A, T) -> A) -> A {
    let mut acc = init;
    for y in 0..img.height() {
        for cell in img.row(y) {
            acc = f(acc, cell.get());
        }
    }
    acc
}

pub fn min_value<T: Pixel>(img: &PixelBuffer<T>) -> T {
    fold(img, T::MAX, |m, p| if p < m { p } else { m })
}

pub fn max_value<T: Pixel>(img: &PixelBuffer<T>) -> T {
    fold(img, T::MIN, |m, p| if p > m { p } else { m })
}

/// Largest absolute pixel value, in the accumulator so that `|i8::MIN|` fits.
pub fn max_abs<T: Pixel>(img: &PixelBuffer<T>) -> T::Sum {
    fold(img, T::Sum::ZERO, |m, p| {
        let a = p.to_sum().abs();
        if a > m { a } else { m }
    })
}

/// Total of all pixels, accumulated in `f64`.
///
/// The per-type accumulator is sized for a handful of operands, not for a
/// whole image, so a u16 image of 200x200 already overflows `i32`. Integer
/// totals stay exact up to 2^53.
pub fn sum<T: Pixel>(img: &PixelBuffer<T>) -> f64 {
    fold(img, 0.0, |s, p| s + p.to_f64())
}

pub fn mean<T: Pixel>(img: &PixelBuffer<T>) -> f64 {
    let n = img.width() * img.height();
    sum(img) / n as f64
}

/// Population variance around a caller-supplied mean.
pub fn variance<T: Pixel>(img: &PixelBuffer<T>, mean: f64) -> f64 {
    let n = img.width() * img.height();
    let ss = fold(img, 0.0f64, |s, p| {
        let d = p.to_f64() - mean;
        s + d * d
    });
    ss / n as f64
}

#[cfg(test)]
mod tests {
    use ik_core::PixelBuffer;

    use super::{max_abs, max_value, mean, min_value, sum, variance};

    #[test]
    fn reductions_over_a_view() {
        let parent = PixelBuffer::from_vec(
            3,
            3,
            vec![
                100i8, 100, 100, //
                100, -128, 4, //
                100, 7, -2,
            ],
        )
        .expect("valid image");
        let view = parent.subview(1, 1, 2, 2).expect("valid view");

        assert_eq!(min_value(&view), -128);
        assert_eq!(max_value(&view), 7);
        assert_eq!(max_abs(&view), 128);
        assert_eq!(sum(&view), -119.0);
        assert!((mean(&view) + 29.75).abs() < 1e-12);
    }

    #[test]
    fn sum_does_not_overflow_storage() {
        let img = PixelBuffer::new_fill(16, 16, 255u8).expect("valid image");
        assert_eq!(sum(&img), 255.0 * 256.0);
        assert_eq!(mean(&img), 255.0);
    }

    #[test]
    fn sum_outgrows_the_pixel_accumulator() {
        let img = PixelBuffer::new_fill(200, 200, u16::MAX).expect("valid image");
        assert_eq!(sum(&img), 65_535.0 * 40_000.0);
        assert_eq!(mean(&img), 65_535.0);

        let wide = PixelBuffer::new_fill(4096, 2200, 255u8).expect("valid image");
        assert_eq!(sum(&wide), 255.0 * 4096.0 * 2200.0);
        assert_eq!(mean(&wide), 255.0);
    }

    #[test]
    fn variance_around_supplied_mean() {
        let img = PixelBuffer::from_vec(4, 1, vec![1.0f32, 3.0, 5.0, 7.0]).expect("valid image");
        let m = mean(&img);
        assert_eq!(m, 4.0);
        assert!((variance(&img, m) - 5.0).abs() < 1e-12);
        assert!((variance(&img, 0.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn unshaped_placeholder_returns_fold_seeds() {
        let img = PixelBuffer::<u16>::unshaped();
        assert_eq!(min_value(&img), u16::MAX);
        assert_eq!(max_value(&img), u16::MIN);
        assert_eq!(sum(&img), 0.0);
        assert!(mean(&img).is_nan());
    }
}
