use ik_core::{Error, Pixel, PixelBuffer};
use ik_interp::{
    Bicubic, Bilinear, BorderMode, Interpolate, InterpolationType, NearestNeighbor, SafeDomain,
};

use crate::transform::{Affine2, PixelTransform, ScaleTransform};

/// What the engine does with output pixels whose source point lies outside
/// the interpolation kernel's safe domain.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DomainPolicy {
    /// Leave the output pixel untouched.
    #[default]
    Skip,
    /// Sample anyway, resolving outside taps with the border mode.
    Border(BorderMode<f64>),
}

/// Output pixel counts of one distortion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DistortStats {
    pub written: usize,
    pub skipped: usize,
}

/// Resamples `input` into `output` through `transform`, skipping output pixels
/// that map outside the safe domain.
///
/// `transform` maps output coordinates to input coordinates. `interp` is bound
/// to `input` for the duration of the call.
pub fn distort<T, I, M>(
    input: &PixelBuffer<T>,
    output: &PixelBuffer<T>,
    interp: &mut I,
    transform: &M,
) -> Result<DistortStats, Error>
where
    T: Pixel,
    I: Interpolate<T>,
    M: PixelTransform + ?Sized,
{
    distort_with_policy(input, output, interp, transform, DomainPolicy::Skip)
}

#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(input = %input.shape(), output = %output.shape(), ?policy)
)]
pub fn distort_with_policy<T, I, M>(
    input: &PixelBuffer<T>,
    output: &PixelBuffer<T>,
    interp: &mut I,
    transform: &M,
    policy: DomainPolicy,
) -> Result<DistortStats, Error>
where
    T: Pixel,
    I: Interpolate<T>,
    M: PixelTransform + ?Sized,
{
    if input.is_unshaped() {
        return Err(Error::invalid_argument("cannot distort an unshaped input"));
    }

    interp.bind(input);
    let domain = SafeDomain::new(input.width(), input.height(), interp.margin());
    let mut stats = DistortStats::default();

    for y in 0..output.height() {
        for (x, dst) in output.row(y).iter().enumerate() {
            let p = transform.map(x as f32, y as f32);
            match &policy {
                DomainPolicy::Skip => {
                    if domain.is_some_and(|d| d.contains(p.x, p.y)) {
                        dst.set(T::from_f64(interp.sample(p.x, p.y)));
                        stats.written += 1;
                    } else {
                        stats.skipped += 1;
                    }
                }
                DomainPolicy::Border(mode) => {
                    dst.set(T::from_f64(interp.sample_border(p.x, p.y, mode)));
                    stats.written += 1;
                }
            }
        }
    }

    tracing::debug!(
        written = stats.written,
        skipped = stats.skipped,
        "distortion pass finished"
    );
    Ok(stats)
}

/// Stretches `input` to the size of `output`.
pub fn scale<T, I>(
    input: &PixelBuffer<T>,
    output: &PixelBuffer<T>,
    interp: &mut I,
) -> Result<DistortStats, Error>
where
    T: Pixel,
    I: Interpolate<T>,
{
    let t = ScaleTransform::between(
        input.width(),
        input.height(),
        output.width(),
        output.height(),
    );
    distort(input, output, interp, &t)
}

/// Rotates `input` by `angle` radians about its center and places that center
/// at the center of `output`. Centers are `(width / 2, height / 2)` in integer
/// division.
pub fn rotate<T, I>(
    input: &PixelBuffer<T>,
    output: &PixelBuffer<T>,
    interp: &mut I,
    angle: f32,
) -> Result<DistortStats, Error>
where
    T: Pixel,
    I: Interpolate<T>,
{
    let t = Affine2::rotation_about(-(angle as f64), center(output), center(input));
    distort(input, output, interp, &t)
}

/// Warps `input` by `forward`, an input-to-output affine map.
///
/// Fails with [`Error::InvalidArgument`] when `forward` is not invertible.
pub fn affine<T, I>(
    input: &PixelBuffer<T>,
    output: &PixelBuffer<T>,
    interp: &mut I,
    forward: &Affine2,
) -> Result<DistortStats, Error>
where
    T: Pixel,
    I: Interpolate<T>,
{
    let Some(inverse) = forward.inverse() else {
        tracing::trace!(?forward, "rejecting singular affine");
        return Err(Error::invalid_argument(format!(
            "affine transform is not invertible (det = {})",
            forward.determinant()
        )));
    };
    distort(input, output, interp, &inverse)
}

/// [`scale`] with the kernel picked by `kind`.
pub fn scale_with<T: Pixel>(
    input: &PixelBuffer<T>,
    output: &PixelBuffer<T>,
    kind: InterpolationType,
) -> Result<DistortStats, Error> {
    match kind {
        InterpolationType::Nearest => scale(input, output, &mut NearestNeighbor::new()),
        InterpolationType::Bilinear => scale(input, output, &mut Bilinear::new()),
        InterpolationType::Bicubic => scale(input, output, &mut Bicubic::new()),
    }
}

/// [`rotate`] with the kernel picked by `kind`.
pub fn rotate_with<T: Pixel>(
    input: &PixelBuffer<T>,
    output: &PixelBuffer<T>,
    kind: InterpolationType,
    angle: f32,
) -> Result<DistortStats, Error> {
    match kind {
        InterpolationType::Nearest => rotate(input, output, &mut NearestNeighbor::new(), angle),
        InterpolationType::Bilinear => rotate(input, output, &mut Bilinear::new(), angle),
        InterpolationType::Bicubic => rotate(input, output, &mut Bicubic::new(), angle),
    }
}

fn center<T>(img: &PixelBuffer<T>) -> (f64, f64) {
    ((img.width() / 2) as f64, (img.height() / 2) as f64)
}

#[cfg(test)]
mod tests {
    use core::f32::consts::FRAC_PI_2;

    use ik_core::{Error, Point2f, PixelBuffer};
    use ik_interp::{Bicubic, Bilinear, BorderMode, InterpolationType, NearestNeighbor};

    use super::{
        Affine2, DistortStats, DomainPolicy, affine, distort, distort_with_policy, rotate,
        rotate_with, scale, scale_with,
    };

    fn ramp(width: usize, height: usize) -> PixelBuffer<f32> {
        let data = (0..width * height)
            .map(|i| ((i * 37) % 101) as f32 * 0.5)
            .collect();
        PixelBuffer::from_vec(width, height, data).expect("valid image")
    }

    #[test]
    fn identity_scale_reproduces_input() {
        let input = ramp(7, 5);
        let output = PixelBuffer::new(7, 5).expect("valid image");

        let stats = scale(&input, &output, &mut Bilinear::new()).expect("shaped input");
        assert_eq!(
            stats,
            DistortStats {
                written: 35,
                skipped: 0
            }
        );
        assert_eq!(output.to_vec(), input.to_vec());
    }

    #[test]
    fn quarter_turn_moves_pixels() {
        let input = ramp(20, 30);
        let output = PixelBuffer::new(30, 20).expect("valid image");

        rotate(&input, &output, &mut Bilinear::new(), FRAC_PI_2).expect("shaped input");

        let mut total = 0.0f64;
        let mut count = 0usize;
        for y in 1..29 {
            for x in 1..19 {
                let want = input.get(x, y).expect("in bounds");
                let got = output.get(30 - y, x).expect("in bounds");
                total += (want - got).abs() as f64;
                count += 1;
            }
        }
        assert!(total / (count as f64) < 0.1, "mean abs error {}", total / count as f64);
    }

    #[test]
    fn skipped_pixels_keep_their_value() {
        let input = PixelBuffer::new_fill(4, 4, 10u8).expect("valid image");
        let output = PixelBuffer::new_fill(6, 4, 99u8).expect("valid image");
        let shift = |x: f32, y: f32| Point2f::new(x - 2.0, y);

        let stats = distort(&input, &output, &mut NearestNeighbor::new(), &shift)
            .expect("shaped input");
        assert_eq!(stats.written, 16);
        assert_eq!(stats.skipped, 8);
        for y in 0..4 {
            assert_eq!(output.get(0, y), Ok(99));
            assert_eq!(output.get(1, y), Ok(99));
            assert_eq!(output.get(2, y), Ok(10));
        }
    }

    #[test]
    fn border_policy_writes_everything() {
        let input = PixelBuffer::new_fill(4, 4, 10u8).expect("valid image");
        let output = PixelBuffer::new_fill(6, 4, 99u8).expect("valid image");
        let shift = |x: f32, y: f32| Point2f::new(x - 2.0, y);

        let stats = distort_with_policy(
            &input,
            &output,
            &mut NearestNeighbor::new(),
            &shift,
            DomainPolicy::Border(BorderMode::Constant(3.0)),
        )
        .expect("shaped input");
        assert_eq!(stats.skipped, 0);
        assert_eq!(stats.written, 24);
        assert_eq!(output.get(0, 2), Ok(3));
        assert_eq!(output.get(5, 2), Ok(10));
    }

    #[test]
    fn border_policy_survives_non_finite_source_points() {
        let input = PixelBuffer::from_vec(3, 3, (1u8..=9).collect()).expect("valid image");
        let to_infinity = |_: f32, _: f32| Point2f::new(f32::INFINITY, 0.0);
        let to_nan = |_: f32, _: f32| Point2f::new(f32::NAN, f32::NAN);
        let policy = DomainPolicy::Border(BorderMode::Clamp);

        for kind in [
            InterpolationType::Nearest,
            InterpolationType::Bilinear,
            InterpolationType::Bicubic,
        ] {
            let output = PixelBuffer::new_fill(2, 2, 0u8).expect("valid image");
            let stats = match kind {
                InterpolationType::Nearest => distort_with_policy(
                    &input,
                    &output,
                    &mut NearestNeighbor::new(),
                    &to_infinity,
                    policy.clone(),
                ),
                InterpolationType::Bilinear => distort_with_policy(
                    &input,
                    &output,
                    &mut Bilinear::new(),
                    &to_infinity,
                    policy.clone(),
                ),
                InterpolationType::Bicubic => distort_with_policy(
                    &input,
                    &output,
                    &mut Bicubic::new(),
                    &to_infinity,
                    policy.clone(),
                ),
            }
            .expect("shaped input");
            assert_eq!(stats.written, 4, "{}", kind.name());
            assert_eq!(output.to_vec(), vec![3; 4], "{}", kind.name());
        }

        let output = PixelBuffer::new_fill(2, 2, 0u8).expect("valid image");
        distort_with_policy(&input, &output, &mut Bicubic::new(), &to_nan, policy)
            .expect("shaped input");
        assert_eq!(output.to_vec(), vec![1; 4]);
    }

    #[test]
    fn selector_matches_explicit_kernel() {
        let input = ramp(9, 6);
        let a = PixelBuffer::new(5, 4).expect("valid image");
        let b = PixelBuffer::new(5, 4).expect("valid image");

        scale(&input, &a, &mut Bilinear::new()).expect("shaped input");
        scale_with(&input, &b, InterpolationType::Bilinear).expect("shaped input");
        assert_eq!(a.to_vec(), b.to_vec());

        rotate(&input, &a, &mut NearestNeighbor::new(), 0.3).expect("shaped input");
        rotate_with(&input, &b, InterpolationType::Nearest, 0.3).expect("shaped input");
        assert_eq!(a.to_vec(), b.to_vec());
    }

    #[test]
    fn bicubic_scale_skips_the_rim() {
        let input = ramp(8, 8);
        let output = PixelBuffer::new_fill(8, 8, -1.0f32).expect("valid image");

        let stats = scale_with(&input, &output, InterpolationType::Bicubic).expect("shaped input");
        assert_eq!(stats.written, 25);
        assert_eq!(stats.skipped, 39);
        assert_eq!(output.get(0, 0), Ok(-1.0));
        assert_eq!(output.get(7, 7), Ok(-1.0));
        assert_eq!(output.get(3, 4), input.get(3, 4));
    }

    #[test]
    fn affine_rejects_singular_maps() {
        let input = ramp(4, 4);
        let output = PixelBuffer::new(4, 4).expect("valid image");

        let res = affine(
            &input,
            &output,
            &mut Bilinear::new(),
            &Affine2::scaling(2.0, 0.0),
        );
        assert!(matches!(res, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn affine_translation_shifts_content() {
        let input = ramp(6, 6);
        let output = PixelBuffer::new(6, 6).expect("valid image");

        affine(
            &input,
            &output,
            &mut Bilinear::new(),
            &Affine2::translation(1.0, 2.0),
        )
        .expect("invertible");
        assert_eq!(output.get(3, 4), input.get(2, 2));
    }

    #[test]
    fn unshaped_input_is_rejected() {
        let input = PixelBuffer::<u8>::unshaped();
        let output = PixelBuffer::new(2, 2).expect("valid image");
        assert!(scale(&input, &output, &mut Bilinear::new()).is_err());
    }
}
