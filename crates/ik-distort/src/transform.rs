use ik_core::Point2f;

/// Maps an output pixel coordinate to the source coordinate it samples from.
pub trait PixelTransform {
    fn map(&self, x: f32, y: f32) -> Point2f;
}

impl<F> PixelTransform for F
where
    F: Fn(f32, f32) -> Point2f,
{
    #[inline]
    fn map(&self, x: f32, y: f32) -> Point2f {
        self(x, y)
    }
}

/// Axis-aligned scaling `(x * sx, y * sy)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    pub sx: f32,
    pub sy: f32,
}

impl ScaleTransform {
    pub const fn new(sx: f32, sy: f32) -> Self {
        Self { sx, sy }
    }

    /// Output-to-input mapping that stretches an `out_w x out_h` grid over an
    /// `in_w x in_h` image.
    pub fn between(in_w: usize, in_h: usize, out_w: usize, out_h: usize) -> Self {
        Self::new(
            in_w as f32 / out_w.max(1) as f32,
            in_h as f32 / out_h.max(1) as f32,
        )
    }
}

impl PixelTransform for ScaleTransform {
    #[inline]
    fn map(&self, x: f32, y: f32) -> Point2f {
        Point2f::new(x * self.sx, y * self.sy)
    }
}

/// 2D affine map `p' = A p + t`.
///
/// Composition and inversion run in `f64`; only [`PixelTransform::map`]
/// narrows to `f32`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2 {
    pub a11: f64,
    pub a12: f64,
    pub a21: f64,
    pub a22: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Affine2 {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a11: f64, a12: f64, a21: f64, a22: f64, tx: f64, ty: f64) -> Self {
        Self {
            a11,
            a12,
            a21,
            a22,
            tx,
            ty,
        }
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation about the origin. With `y` pointing down, a positive angle
    /// turns clockwise on screen.
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, -s, s, c, 0.0, 0.0)
    }

    /// `p' = R(angle) (p - from) + to`.
    pub fn rotation_about(angle: f64, from: (f64, f64), to: (f64, f64)) -> Self {
        Self::translation(-from.0, -from.1)
            .then(&Self::rotation(angle))
            .then(&Self::translation(to.0, to.1))
    }

    /// Applies `self` first, then `next`.
    pub fn then(&self, next: &Affine2) -> Affine2 {
        Affine2 {
            a11: next.a11 * self.a11 + next.a12 * self.a21,
            a12: next.a11 * self.a12 + next.a12 * self.a22,
            a21: next.a21 * self.a11 + next.a22 * self.a21,
            a22: next.a21 * self.a12 + next.a22 * self.a22,
            tx: next.a11 * self.tx + next.a12 * self.ty + next.tx,
            ty: next.a21 * self.tx + next.a22 * self.ty + next.ty,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a11 * self.a22 - self.a12 * self.a21
    }

    /// `None` when the linear part is singular or not finite.
    pub fn inverse(&self) -> Option<Affine2> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            return None;
        }

        let inv = 1.0 / det;
        let a11 = self.a22 * inv;
        let a12 = -self.a12 * inv;
        let a21 = -self.a21 * inv;
        let a22 = self.a11 * inv;
        Some(Affine2 {
            a11,
            a12,
            a21,
            a22,
            tx: -(a11 * self.tx + a12 * self.ty),
            ty: -(a21 * self.tx + a22 * self.ty),
        })
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a11 * x + self.a12 * y + self.tx,
            self.a21 * x + self.a22 * y + self.ty,
        )
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PixelTransform for Affine2 {
    #[inline]
    fn map(&self, x: f32, y: f32) -> Point2f {
        let (u, v) = self.apply(x as f64, y as f64);
        Point2f::new(u as f32, v as f32)
    }
}
