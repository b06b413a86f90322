use ik_core::{Pixel, PixelBuffer};

use crate::rows::update;

/// Sets every pixel to `value`.
pub fn fill<T: Pixel>(img: &PixelBuffer<T>, value: T) {
    update(img, |_| value);
}

/// Fills the axis-aligned rectangle with top-left corner `(x0, y0)`.
///
/// The part of the rectangle outside the image is ignored, so the origin may
/// be negative and the extent may run past the far edges.
pub fn fill_rectangle<T: Pixel>(
    img: &PixelBuffer<T>,
    value: T,
    x0: isize,
    y0: isize,
    width: usize,
    height: usize,
) {
    let Some((xs, xe)) = clip_span(x0, width, img.width()) else {
        return;
    };
    let Some((ys, ye)) = clip_span(y0, height, img.height()) else {
        return;
    };

    for y in ys..ye {
        for cell in &img.row(y)[xs..xe] {
            cell.set(value);
        }
    }
}

/// Swaps row `y` with row `height - 1 - y`. Applying it twice is a no-op.
pub fn flip_vertical<T: Pixel>(img: &PixelBuffer<T>) {
    let h = img.height();
    for y in 0..h / 2 {
        for (top, bottom) in img.row(y).iter().zip(img.row(h - 1 - y)) {
            top.swap(bottom);
        }
    }
}

/// Mirrors every row left to right. Applying it twice is a no-op.
pub fn flip_horizontal<T: Pixel>(img: &PixelBuffer<T>) {
    for y in 0..img.height() {
        let row = img.row(y);
        let w = row.len();
        for x in 0..w / 2 {
            row[x].swap(&row[w - 1 - x]);
        }
    }
}

/// Intersection of `[start, start + len)` with `[0, limit)`.
fn clip_span(start: isize, len: usize, limit: usize) -> Option<(usize, usize)> {
    let end = start.saturating_add(len.min(isize::MAX as usize) as isize);
    let s = start.max(0) as usize;
    let e = end.max(0) as usize;
    let e = e.min(limit);
    (s < e).then_some((s, e))
}
