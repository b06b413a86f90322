/// How taps that fall outside the image are resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum BorderMode<T> {
    /// Repeat the nearest edge pixel.
    Clamp,
    /// Every outside tap reads this value.
    Constant(T),
    /// Mirror around the edge pixel without repeating it (`dcb|abcd|cba`).
    Reflect101,
    /// Periodic continuation (`bcd|abcd|abc`).
    Wrap,
}

impl<T> BorderMode<T> {
    /// Maps a possibly out-of-range index into `[0, len)`.
    ///
    /// Returns `None` for [`BorderMode::Constant`] when `i` is outside, and
    /// for any mode when `len == 0`.
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }

        match self {
            Self::Constant(_) => None,
            Self::Clamp => Some(if i < 0 { 0 } else { len - 1 }),
            Self::Reflect101 => {
                if len == 1 {
                    return Some(0);
                }
                let period = (2 * len - 2) as isize;
                let r = i.rem_euclid(period) as usize;
                Some(if r < len { r } else { period as usize - r })
            }
            Self::Wrap => Some(i.rem_euclid(len as isize) as usize),
        }
    }
}
