use core::fmt;

/// Width and height of a buffer, used in error reports and shape checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    pub width: usize,
    pub height: usize,
}

impl Shape {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A checked accessor was given a pixel outside the buffer.
    #[error("pixel ({x}, {y}) is out of bounds for a {shape} buffer")]
    OutOfBounds { x: isize, y: isize, shape: Shape },

    /// A requested sub-view rectangle is not contained in its parent.
    #[error("region at ({x}, {y}) of size {width}x{height} is out of bounds for a {shape} buffer")]
    RegionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        shape: Shape,
    },

    /// Operands of a multi-buffer operation disagree in width/height.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: Shape, actual: Shape },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("invalid stride")]
    InvalidStride,
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, Shape};

    #[test]
    fn display_names_the_offending_values() {
        let err = Error::OutOfBounds {
            x: -1,
            y: 4,
            shape: Shape::new(3, 2),
        };
        assert_eq!(
            err.to_string(),
            "pixel (-1, 4) is out of bounds for a 3x2 buffer"
        );

        let err = Error::ShapeMismatch {
            expected: Shape::new(4, 4),
            actual: Shape::new(4, 5),
        };
        assert_eq!(err.to_string(), "shape mismatch: expected 4x4, got 4x5");

        assert!(
            Error::invalid_argument("denominator is zero")
                .to_string()
                .starts_with("invalid argument:")
        );
    }
}
