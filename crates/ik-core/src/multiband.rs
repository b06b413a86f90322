use crate::buffer::check_same_shape;
use crate::error::Shape;
use crate::{Error, Pixel, PixelBuffer};

/// An ordered set of same-shape single-band buffers.
///
/// Bands keep their own stride and start index; only the logical shape has
/// to agree. The set is never empty.
#[derive(Debug, Clone)]
pub struct MultiBand<T> {
    bands: Vec<PixelBuffer<T>>,
}

impl<T: Pixel> MultiBand<T> {
    /// Allocates `num_bands` independent, zero-filled bands.
    pub fn new(width: usize, height: usize, num_bands: usize) -> Result<Self, Error> {
        if num_bands == 0 {
            return Err(Error::invalid_argument("a multi-band image needs at least one band"));
        }
        let bands = (0..num_bands)
            .map(|_| PixelBuffer::new(width, height))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bands })
    }

    pub fn from_bands(bands: Vec<PixelBuffer<T>>) -> Result<Self, Error> {
        let first = bands
            .first()
            .ok_or_else(|| Error::invalid_argument("a multi-band image needs at least one band"))?;
        for band in &bands[1..] {
            check_same_shape(first, band)?;
        }
        Ok(Self { bands })
    }

    /// Sub-view of the same rectangle in every band.
    pub fn subview(&self, x: usize, y: usize, width: usize, height: usize) -> Result<Self, Error> {
        let bands = self
            .bands
            .iter()
            .map(|b| b.subview(x, y, width, height))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bands })
    }
}

impl<T> MultiBand<T> {
    pub fn width(&self) -> usize {
        self.bands[0].width()
    }

    pub fn height(&self) -> usize {
        self.bands[0].height()
    }

    pub fn shape(&self) -> Shape {
        self.bands[0].shape()
    }

    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    pub fn band(&self, i: usize) -> Option<&PixelBuffer<T>> {
        self.bands.get(i)
    }

    pub fn bands(&self) -> &[PixelBuffer<T>] {
        &self.bands
    }

    pub fn into_bands(self) -> Vec<PixelBuffer<T>> {
        self.bands
    }
}
