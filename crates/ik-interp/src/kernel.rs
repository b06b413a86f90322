use ik_core::{Pixel, PixelBuffer};

use crate::border::BorderMode;

/// Whole pixels an interpolation footprint reaches before and after the
/// sample position, on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margin {
    pub before: usize,
    pub after: usize,
}

impl Margin {
    pub const fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }
}

/// Source coordinates whose interpolation footprint lies inside an image:
/// `[before, width - 1 - after] x [before, height - 1 - after]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeDomain {
    x_min: f32,
    x_max: f32,
    y_min: f32,
    y_max: f32,
}

impl SafeDomain {
    /// Returns `None` when the image is too small for the footprint.
    pub fn new(width: usize, height: usize, margin: Margin) -> Option<Self> {
        let need = margin.before + margin.after + 1;
        if width < need || height < need {
            return None;
        }

        Some(Self {
            x_min: margin.before as f32,
            x_max: (width - 1 - margin.after) as f32,
            y_min: margin.before as f32,
            y_max: (height - 1 - margin.after) as f32,
        })
    }

    /// NaN coordinates are never contained.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

/// Samples a bound image at fractional coordinates.
///
/// Integer coordinates are pixel centers. Implementations return the value
/// widened to `f64`; callers narrow it with [`Pixel::from_f64`].
pub trait Interpolate<T: Pixel> {
    /// Attaches `image` as the sampling source, replacing any previous one.
    /// The kernel keeps a shared handle, not a copy.
    fn bind(&mut self, image: &PixelBuffer<T>);

    fn image(&self) -> Option<&PixelBuffer<T>>;

    fn margin(&self) -> Margin;

    /// Samples at `(x, y)`, which must lie in the safe domain of the bound
    /// image.
    ///
    /// # Panics
    /// Panics if no image is bound, or if the footprint leaves the image.
    fn sample(&self, x: f32, y: f32) -> f64;

    /// Samples anywhere, resolving taps outside the image with `border`.
    ///
    /// # Panics
    /// Panics if no image is bound.
    fn sample_border(&self, x: f32, y: f32, border: &BorderMode<f64>) -> f64;

    fn is_in_safe_bounds(&self, x: f32, y: f32) -> bool {
        self.image()
            .and_then(|img| SafeDomain::new(img.width(), img.height(), self.margin()))
            .is_some_and(|domain| domain.contains(x, y))
    }
}

/// Interpolation selector for entry points that build the kernel themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationType {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
}

impl InterpolationType {
    pub const fn margin(self) -> Margin {
        match self {
            Self::Nearest | Self::Bilinear => Margin::new(0, 0),
            Self::Bicubic => Margin::new(1, 2),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
        }
    }
}

pub(crate) fn bound<T>(image: &Option<PixelBuffer<T>>) -> &PixelBuffer<T> {
    image
        .as_ref()
        .expect("interpolation kernel used before an image was bound")
}

/// Reads one footprint tap; the caller guarantees it is inside the image.
#[inline]
pub(crate) fn tap<T: Pixel>(img: &PixelBuffer<T>, x: isize, y: isize) -> f64 {
    img.get(x as usize, y as usize)
        .map(Pixel::to_f64)
        .expect("interpolation footprint inside the image")
}

/// Reads one footprint tap, resolving outside taps through `border`.
pub(crate) fn tap_border<T: Pixel>(
    img: &PixelBuffer<T>,
    x: isize,
    y: isize,
    border: &BorderMode<f64>,
) -> f64 {
    if let BorderMode::Constant(c) = border
        && !img.is_in_bounds(x, y)
    {
        return *c;
    }

    match (
        border.map_index(x, img.width()),
        border.map_index(y, img.height()),
    ) {
        (Some(xi), Some(yi)) => img
            .get(xi, yi)
            .map(Pixel::to_f64)
            .expect("border mapping returns in-range indices"),
        _ => match border {
            BorderMode::Constant(c) => *c,
            _ => panic!("cannot sample an empty image with a non-constant border"),
        },
    }
}

/// f32 has no fractional part at or beyond 2^24.
const BORDER_LIMIT: f32 = 16_777_216.0;

/// Pulls a border-sampled coordinate into `[-2^24, 2^24]` so footprint
/// offsets stay far from the `isize` range. NaN maps to zero.
#[inline]
pub(crate) fn border_coord(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-BORDER_LIMIT, BORDER_LIMIT)
    }
}
