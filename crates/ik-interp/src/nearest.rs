use ik_core::{Pixel, PixelBuffer};

use crate::border::BorderMode;
use crate::kernel::{Interpolate, Margin, border_coord, bound, tap, tap_border};

/// Nearest-neighbor sampling; coordinates round to the closest pixel center.
#[derive(Debug, Clone)]
pub struct NearestNeighbor<T> {
    image: Option<PixelBuffer<T>>,
}

impl<T> NearestNeighbor<T> {
    pub fn new() -> Self {
        Self { image: None }
    }
}

impl<T> Default for NearestNeighbor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pixel> Interpolate<T> for NearestNeighbor<T> {
    fn bind(&mut self, image: &PixelBuffer<T>) {
        self.image = Some(image.clone());
    }

    fn image(&self) -> Option<&PixelBuffer<T>> {
        self.image.as_ref()
    }

    fn margin(&self) -> Margin {
        Margin::new(0, 0)
    }

    #[inline]
    fn sample(&self, x: f32, y: f32) -> f64 {
        tap(bound(&self.image), x.round() as isize, y.round() as isize)
    }

    fn sample_border(&self, x: f32, y: f32, border: &BorderMode<f64>) -> f64 {
        tap_border(
            bound(&self.image),
            border_coord(x).round() as isize,
            border_coord(y).round() as isize,
            border,
        )
    }
}

#[cfg(test)]
mod tests {
    use ik_core::PixelBuffer;

    use super::NearestNeighbor;
    use crate::{BorderMode, Interpolate};

    #[test]
    fn rounds_to_the_closest_center_and_resolves_borders() {
        let img = PixelBuffer::from_vec(4, 2, vec![5u16, 15, 25, 35, 45, 55, 65, 75])
            .expect("valid image");
        let mut nn = NearestNeighbor::new();
        nn.bind(&img);

        assert_eq!(nn.sample(2.4, 0.6), 65.0);
        assert_eq!(nn.sample(0.49, 0.2), 5.0);
        assert_eq!(nn.sample(2.5, 0.0), 35.0);
        assert!(nn.is_in_safe_bounds(3.0, 1.0));
        assert!(!nn.is_in_safe_bounds(3.2, 0.0));

        assert_eq!(nn.sample_border(-3.0, 0.0, &BorderMode::Clamp), 5.0);
        assert_eq!(nn.sample_border(7.0, 4.0, &BorderMode::Clamp), 75.0);
        assert_eq!(nn.sample_border(-0.6, 1.0, &BorderMode::Constant(-1.0)), -1.0);
        assert_eq!(nn.sample_border(4.0, 0.0, &BorderMode::Wrap), 5.0);
        assert_eq!(nn.sample_border(-1.0, 1.0, &BorderMode::Reflect101), 55.0);
    }

    #[test]
    fn border_sampling_accepts_unbounded_coordinates() {
        let img = PixelBuffer::from_vec(2, 2, vec![1u8, 2, 3, 4]).expect("valid image");
        let mut nn = NearestNeighbor::new();
        nn.bind(&img);

        assert_eq!(nn.sample_border(f32::INFINITY, 1.0, &BorderMode::Clamp), 4.0);
        assert_eq!(nn.sample_border(f32::MIN, f32::MAX, &BorderMode::Clamp), 3.0);
        assert_eq!(nn.sample_border(f32::NEG_INFINITY, 0.0, &BorderMode::Constant(9.0)), 9.0);
    }

    #[test]
    #[should_panic(expected = "before an image was bound")]
    fn unbound_kernel_panics() {
        let nn = NearestNeighbor::<u8>::new();
        let _ = nn.sample(0.0, 0.0);
    }
}
