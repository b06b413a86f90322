use core::cell::Cell;
use core::fmt;
use std::rc::Rc;

use crate::error::Shape;
use crate::{Error, Pixel};

/// A typed, strided, single-band image.
///
/// A `PixelBuffer` is a handle onto reference-counted storage. Cloning the
/// handle or taking a [`subview`](PixelBuffer::subview) shares that storage:
/// a write through any handle is visible through every other handle that
/// covers the same element. Storage is freed when the last handle is dropped.
///
/// Writes go through `&self` because storage is shared. Buffers are not
/// `Send`; kernels run on the calling thread.
#[derive(Clone)]
pub struct PixelBuffer<T> {
    width: usize,
    height: usize,
    stride: usize,
    start: usize,
    data: Rc<[Cell<T>]>,
}

impl<T: Pixel> PixelBuffer<T> {
    /// Allocates a zero-filled (`T::default()`) buffer.
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        Self::new_fill(width, height, T::default())
    }

    pub fn new_fill(width: usize, height: usize, value: T) -> Result<Self, Error> {
        let len = checked_area(width, height)?;
        Ok(Self {
            width,
            height,
            stride: width,
            start: 0,
            data: (0..len).map(|_| Cell::new(value)).collect(),
        })
    }

    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = checked_area(width, height)?;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            stride: width,
            start: 0,
            data: data.into_iter().map(Cell::new).collect(),
        })
    }

    /// Wraps padded storage where rows start `stride` elements apart.
    pub fn from_vec_strided(
        width: usize,
        height: usize,
        stride: usize,
        data: Vec<T>,
    ) -> Result<Self, Error> {
        checked_area(width, height)?;
        if stride < width {
            return Err(Error::InvalidStride);
        }

        let min_len = min_required_len(width, height, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            start: 0,
            data: data.into_iter().map(Cell::new).collect(),
        })
    }

    /// A buffer with no shape and no storage, used as a type witness until
    /// [`reshape`](PixelBuffer::reshape) gives it one.
    pub fn unshaped() -> Self {
        Self {
            width: 0,
            height: 0,
            stride: 0,
            start: 0,
            data: Rc::from(Vec::new()),
        }
    }

    /// Allocates an independent buffer of the same storage type.
    pub fn create_new(&self, width: usize, height: usize) -> Result<Self, Error> {
        Self::new(width, height)
    }

    /// Gives this handle fresh, zero-filled storage of the requested shape.
    ///
    /// The handle is detached from whatever storage it shared before; other
    /// views of the old storage are unaffected.
    pub fn reshape(&mut self, width: usize, height: usize) -> Result<(), Error> {
        if !self.is_unshaped() && self.width == width && self.height == height {
            return Ok(());
        }
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Deep copy into new, contiguous storage.
    pub fn duplicate(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            stride: self.width,
            start: 0,
            data: (0..self.height)
                .flat_map(|y| self.row(y).iter().map(|c| Cell::new(c.get())))
                .collect(),
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<T, Error> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        Ok(self.data[self.index(x, y)].get())
    }

    pub fn set(&self, x: usize, y: usize, value: T) -> Result<(), Error> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        self.data[self.index(x, y)].set(value);
        Ok(())
    }

    /// Returns a pixel without bounds checks.
    ///
    /// # Safety
    /// Caller must guarantee `x < self.width()` and `y < self.height()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, x: usize, y: usize) -> T {
        // SAFETY: Caller guarantees `x < width` and `y < height`. The
        // construction invariants then put `index(x, y)` inside `data`.
        unsafe { self.data.get_unchecked(self.index(x, y)).get() }
    }

    /// Writes a pixel without bounds checks.
    ///
    /// # Safety
    /// Caller must guarantee `x < self.width()` and `y < self.height()`.
    #[inline]
    pub unsafe fn set_unchecked(&self, x: usize, y: usize, value: T) {
        // SAFETY: Same contract as `get_unchecked`.
        unsafe { self.data.get_unchecked(self.index(x, y)).set(value) }
    }

    /// Copies every pixel of `src` into this buffer.
    pub fn copy_from(&self, src: &PixelBuffer<T>) -> Result<(), Error> {
        check_same_shape(self, src)?;
        for y in 0..self.height {
            for (dst, src) in self.row(y).iter().zip(src.row(y)) {
                dst.set(src.get());
            }
        }
        Ok(())
    }

    /// Row-major copy of the visible pixels, without padding.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            out.extend(self.row(y).iter().map(Cell::get));
        }
        out
    }
}

impl<T> PixelBuffer<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn start_index(&self) -> usize {
        self.start
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.width, self.height)
    }

    pub fn is_unshaped(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width
    }

    /// Storage index of pixel `(x, y)`. Only meaningful for in-bounds pixels.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        self.start + y * self.stride + x
    }

    #[inline]
    pub fn is_in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// True when both handles address the same allocation.
    pub fn shares_storage_with(&self, other: &PixelBuffer<T>) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Cells of row `y`, for row-major kernels.
    ///
    /// # Panics
    /// Panics if `y >= self.height()`.
    #[inline]
    pub fn row(&self, y: usize) -> &[Cell<T>] {
        assert!(y < self.height, "row index out of bounds");
        let start = self.index(0, y);
        &self.data[start..start + self.width]
    }

    /// A view of the rectangle `(x, y, width, height)` sharing this buffer's
    /// storage.
    pub fn subview(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<PixelBuffer<T>, Error> {
        if width == 0
            || height == 0
            || x > self.width
            || y > self.height
            || width > (self.width - x)
            || height > (self.height - y)
        {
            return Err(Error::RegionOutOfBounds {
                x,
                y,
                width,
                height,
                shape: self.shape(),
            });
        }

        Ok(PixelBuffer {
            width,
            height,
            stride: self.stride,
            start: self.index(x, y),
            data: Rc::clone(&self.data),
        })
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> Error {
        Error::OutOfBounds {
            x: x as isize,
            y: y as isize,
            shape: self.shape(),
        }
    }
}

impl<T> fmt::Debug for PixelBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("start", &self.start)
            .field("storage_len", &self.data.len())
            .finish()
    }
}

/// Fails with [`Error::ShapeMismatch`] unless both buffers have the same
/// width and height. Storage types may differ.
pub fn check_same_shape<A, B>(a: &PixelBuffer<A>, b: &PixelBuffer<B>) -> Result<(), Error> {
    if a.shape() != b.shape() {
        return Err(Error::ShapeMismatch {
            expected: a.shape(),
            actual: b.shape(),
        });
    }
    Ok(())
}

fn checked_area(width: usize, height: usize) -> Result<usize, Error> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_argument(format!(
            "buffer dimensions must be positive, got {width}x{height}"
        )));
    }
    width
        .checked_mul(height)
        .ok_or_else(|| Error::invalid_argument("buffer size overflow"))
}

fn min_required_len(width: usize, height: usize, stride: usize) -> Option<usize> {
    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(width)
}

#[cfg(test)]
mod tests {
    use super::{PixelBuffer, check_same_shape};
    use crate::Error;
    use crate::error::Shape;

    #[test]
    fn strided_indexing_skips_padding() {
        let data = vec![1u8, 2, 3, 99, 4, 5, 6, 88];
        let img = PixelBuffer::from_vec_strided(3, 2, 4, data).expect("valid buffer");

        assert_eq!(img.get(0, 1), Ok(4));
        assert_eq!(img.get(2, 1), Ok(6));
        assert_eq!(img.index(2, 1), 6);
        assert!(!img.is_contiguous());
        assert_eq!(img.to_vec(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn checked_accessors_report_out_of_bounds() {
        let img = PixelBuffer::<i16>::new(3, 2).expect("valid buffer");

        assert_eq!(
            img.get(3, 0),
            Err(Error::OutOfBounds {
                x: 3,
                y: 0,
                shape: Shape::new(3, 2)
            })
        );
        assert!(matches!(img.set(0, 2, 7), Err(Error::OutOfBounds { .. })));

        img.set(2, 1, -7).expect("in bounds");
        assert_eq!(img.get(2, 1), Ok(-7));
    }

    #[test]
    fn unchecked_accessors_match_checked_ones() {
        let img = PixelBuffer::from_vec(2, 2, vec![1.5f32, 2.5, 3.5, 4.5]).expect("valid buffer");
        // SAFETY: (1, 1) is inside a 2x2 buffer.
        unsafe {
            img.set_unchecked(1, 1, 9.0);
            assert_eq!(img.get_unchecked(1, 1), 9.0);
        }
        assert_eq!(img.get(1, 1), Ok(9.0));
    }

    #[test]
    fn construction_rejects_bad_shapes() {
        assert!(matches!(
            PixelBuffer::<u8>::new(0, 4),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(
            PixelBuffer::from_vec(2, 2, vec![0u8; 3]).err(),
            Some(Error::SizeMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            PixelBuffer::from_vec_strided(4, 2, 3, vec![0u8; 8]).err(),
            Some(Error::InvalidStride)
        );
        assert_eq!(
            PixelBuffer::from_vec_strided(3, 2, 5, vec![0u8; 7]).err(),
            Some(Error::SizeMismatch {
                expected: 8,
                actual: 7
            })
        );
    }

    #[test]
    fn subview_shares_storage_both_ways() {
        let data = vec![
            10u8, 11, 12, 13, 99, // row 0
            20, 21, 22, 23, 98, // row 1
            30, 31, 32, 33, 97, // row 2
        ];
        let parent = PixelBuffer::from_vec_strided(4, 3, 5, data).expect("valid parent");
        let sub = parent.subview(1, 1, 3, 2).expect("valid subview");

        assert_eq!(sub.shape(), Shape::new(3, 2));
        assert_eq!(sub.stride(), 5);
        assert_eq!(sub.start_index(), 6);
        assert_eq!(sub.to_vec(), vec![21, 22, 23, 31, 32, 33]);
        assert!(sub.shares_storage_with(&parent));

        sub.set(2, 1, 42).expect("in bounds");
        assert_eq!(parent.get(3, 2), Ok(42));

        parent.set(1, 1, 7).expect("in bounds");
        assert_eq!(sub.get(0, 0), Ok(7));

        let nested = sub.subview(1, 0, 2, 1).expect("valid nested view");
        assert_eq!(nested.to_vec(), vec![22, 23]);
    }

    #[test]
    fn subview_outlives_parent_handle() {
        let sub = {
            let parent = PixelBuffer::new_fill(4, 4, 5u16).expect("valid parent");
            parent.subview(2, 2, 2, 2).expect("valid subview")
        };
        assert_eq!(sub.to_vec(), vec![5; 4]);
    }

    #[test]
    fn subview_rejects_regions_outside_parent() {
        let parent = PixelBuffer::<u8>::new(4, 3).expect("valid parent");
        assert!(matches!(
            parent.subview(2, 0, 3, 1),
            Err(Error::RegionOutOfBounds { .. })
        ));
        assert!(parent.subview(5, 0, 1, 1).is_err());
        assert!(parent.subview(0, 0, 0, 1).is_err());
        assert!(parent.subview(0, 0, 4, 3).is_ok());
    }

    #[test]
    fn create_new_duplicate_and_copy_are_independent() {
        let img = PixelBuffer::from_vec(2, 2, vec![1i32, 2, 3, 4]).expect("valid buffer");

        let fresh = img.create_new(3, 1).expect("valid shape");
        assert_eq!(fresh.to_vec(), vec![0, 0, 0]);
        assert!(!fresh.shares_storage_with(&img));

        let copy = img.duplicate();
        copy.set(0, 0, 100).expect("in bounds");
        assert_eq!(img.get(0, 0), Ok(1));

        let target = PixelBuffer::<i32>::new(2, 2).expect("valid buffer");
        target.copy_from(&img).expect("same shape");
        assert_eq!(target.to_vec(), vec![1, 2, 3, 4]);
        assert!(fresh.copy_from(&img).is_err());
    }

    #[test]
    fn placeholder_reshapes_into_real_buffer() {
        let mut img = PixelBuffer::<f64>::unshaped();
        assert!(img.is_unshaped());
        assert_eq!(img.shape(), Shape::new(0, 0));
        assert!(img.to_vec().is_empty());

        img.reshape(3, 2).expect("valid shape");
        assert!(!img.is_unshaped());
        assert_eq!(img.to_vec(), vec![0.0; 6]);
    }

    #[test]
    fn shape_check_ignores_storage_type() {
        let a = PixelBuffer::<u8>::new(3, 2).expect("valid buffer");
        let b = PixelBuffer::<f32>::new(3, 2).expect("valid buffer");
        let c = PixelBuffer::<f32>::new(2, 3).expect("valid buffer");

        assert!(check_same_shape(&a, &b).is_ok());
        assert_eq!(
            check_same_shape(&a, &c),
            Err(Error::ShapeMismatch {
                expected: Shape::new(3, 2),
                actual: Shape::new(2, 3)
            })
        );
    }
}
