use ik_core::{Pixel, PixelBuffer};

use crate::border::BorderMode;
use crate::kernel::{Interpolate, Margin, border_coord, bound, tap, tap_border};

/// Keys cubic convolution over a 4x4 neighborhood.
///
/// The footprint of `x` is `floor(x) - 1 ..= floor(x) + 2`, so the safe
/// domain is `[1, w-3] x [1, h-3]`.
#[derive(Debug, Clone)]
pub struct Bicubic<T> {
    image: Option<PixelBuffer<T>>,
    a: f64,
}

impl<T> Bicubic<T> {
    /// Catmull-Rom style kernel, `a = -0.5`.
    pub fn new() -> Self {
        Self::with_param(-0.5)
    }

    pub fn with_param(a: f64) -> Self {
        Self { image: None, a }
    }

    pub fn param(&self) -> f64 {
        self.a
    }

    fn weights(&self, t: f64) -> [f64; 4] {
        [
            keys(self.a, 1.0 + t),
            keys(self.a, t),
            keys(self.a, 1.0 - t),
            keys(self.a, 2.0 - t),
        ]
    }

    fn convolve(&self, x: f32, y: f32, mut fetch: impl FnMut(isize, isize) -> f64) -> f64 {
        let x0 = x.floor() as isize;
        let y0 = y.floor() as isize;
        let wx = self.weights((x - x0 as f32) as f64);
        let wy = self.weights((y - y0 as f32) as f64);

        let mut acc = 0.0;
        for (j, wyj) in wy.iter().enumerate() {
            let yy = y0 - 1 + j as isize;
            let mut row = 0.0;
            for (i, wxi) in wx.iter().enumerate() {
                row += wxi * fetch(x0 - 1 + i as isize, yy);
            }
            acc += wyj * row;
        }
        acc
    }
}

impl<T> Default for Bicubic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pixel> Interpolate<T> for Bicubic<T> {
    fn bind(&mut self, image: &PixelBuffer<T>) {
        self.image = Some(image.clone());
    }

    fn image(&self) -> Option<&PixelBuffer<T>> {
        self.image.as_ref()
    }

    fn margin(&self) -> Margin {
        Margin::new(1, 2)
    }

    fn sample(&self, x: f32, y: f32) -> f64 {
        let img = bound(&self.image);
        self.convolve(x, y, |xi, yi| tap(img, xi, yi))
    }

    fn sample_border(&self, x: f32, y: f32, border: &BorderMode<f64>) -> f64 {
        let img = bound(&self.image);
        self.convolve(border_coord(x), border_coord(y), |xi, yi| {
            tap_border(img, xi, yi, border)
        })
    }
}

fn keys(a: f64, d: f64) -> f64 {
    let d = d.abs();
    if d <= 1.0 {
        ((a + 2.0) * d - (a + 3.0)) * d * d + 1.0
    } else if d < 2.0 {
        ((a * d - 5.0 * a) * d + 8.0 * a) * d - 4.0 * a
    } else {
        0.0
    }
}
