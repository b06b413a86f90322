use core::ops::{Add, Sub};

/// A point in pixel coordinates; integer values are pixel centers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(self, rhs: Self) -> f32 {
        let dx = self.x - rhs.x;
        let dy = self.y - rhs.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point2f {
    type Output = Point2f;

    fn add(self, rhs: Point2f) -> Self::Output {
        Point2f {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point2f {
    type Output = Point2f;

    fn sub(self, rhs: Point2f) -> Self::Output {
        Point2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl From<(f32, f32)> for Point2f {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}
