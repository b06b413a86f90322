use ik_core::{Pixel, PixelBuffer};

use crate::border::BorderMode;
use crate::kernel::{Interpolate, Margin, border_coord, bound, tap, tap_border};

/// Floor-based 2x2 bilinear interpolation.
///
/// The safe domain is the whole image, `[0, w-1] x [0, h-1]`: on the last
/// row or column the far tap has zero weight and is clamped onto the near one.
#[derive(Debug, Clone)]
pub struct Bilinear<T> {
    image: Option<PixelBuffer<T>>,
}

impl<T> Bilinear<T> {
    pub fn new() -> Self {
        Self { image: None }
    }
}

impl<T> Default for Bilinear<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pixel> Interpolate<T> for Bilinear<T> {
    fn bind(&mut self, image: &PixelBuffer<T>) {
        self.image = Some(image.clone());
    }

    fn image(&self) -> Option<&PixelBuffer<T>> {
        self.image.as_ref()
    }

    fn margin(&self) -> Margin {
        Margin::new(0, 0)
    }

    fn sample(&self, x: f32, y: f32) -> f64 {
        let img = bound(&self.image);

        let x0 = x.floor() as isize;
        let y0 = y.floor() as isize;
        let x1 = (x0 + 1).min(img.width() as isize - 1);
        let y1 = (y0 + 1).min(img.height() as isize - 1);

        let dx = (x - x0 as f32) as f64;
        let dy = (y - y0 as f32) as f64;

        let p00 = tap(img, x0, y0);
        let p10 = tap(img, x1, y0);
        let p01 = tap(img, x0, y1);
        let p11 = tap(img, x1, y1);

        blend(p00, p10, p01, p11, dx, dy)
    }

    fn sample_border(&self, x: f32, y: f32, border: &BorderMode<f64>) -> f64 {
        let img = bound(&self.image);
        let (x, y) = (border_coord(x), border_coord(y));

        let x0 = x.floor() as isize;
        let y0 = y.floor() as isize;
        let x1 = x0 + 1;
        let y1 = y0 + 1;

        let dx = (x - x0 as f32) as f64;
        let dy = (y - y0 as f32) as f64;

        let p00 = tap_border(img, x0, y0, border);
        let p10 = tap_border(img, x1, y0, border);
        let p01 = tap_border(img, x0, y1, border);
        let p11 = tap_border(img, x1, y1, border);

        blend(p00, p10, p01, p11, dx, dy)
    }
}

#[inline]
fn blend(p00: f64, p10: f64, p01: f64, p11: f64, dx: f64, dy: f64) -> f64 {
    let top = p00 * (1.0 - dx) + p10 * dx;
    let bottom = p01 * (1.0 - dx) + p11 * dx;
    top * (1.0 - dy) + bottom * dy
}
