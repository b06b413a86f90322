//! Per-storage-type numeric policy.
//!
//! Every kernel reads pixels into the storage type's accumulator
//! ([`Pixel::Sum`]), does its arithmetic there, and narrows the result back
//! with [`Pixel::from_sum`] (or [`Pixel::saturate`] for bounded variants).

use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, Sub};
use core::str::FromStr;

use crate::Error;

/// Runtime tag for the supported storage types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl StorageType {
    pub const ALL: [StorageType; 10] = [
        Self::U8,
        Self::I8,
        Self::U16,
        Self::I16,
        Self::U32,
        Self::I32,
        Self::U64,
        Self::I64,
        Self::F32,
        Self::F64,
    ];

    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::F32 | Self::F64)
    }

    pub const fn is_signed(self) -> bool {
        !matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    pub const fn bits(self) -> u32 {
        match self {
            Self::U8 | Self::I8 => 8,
            Self::U16 | Self::I16 => 16,
            Self::U32 | Self::I32 | Self::F32 => 32,
            Self::U64 | Self::I64 | Self::F64 => 64,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StorageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_argument(format!("unknown storage type '{s}'")))
    }
}

/// Widened arithmetic type a pixel is promoted to during computation.
pub trait Accumulator:
    Copy
    + PartialOrd
    + fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
{
    const ZERO: Self;

    /// Truncates toward zero for integer accumulators.
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    fn from_u64(v: u64) -> Self;
    fn from_usize(v: usize) -> Self;
    /// Saturates at zero and `u64::MAX`.
    fn to_u64(self) -> u64;
    fn abs(self) -> Self;

    /// Integers stop at their range; floats add normally.
    fn saturating_add(self, rhs: Self) -> Self;

    /// `None` when the difference overflows an integer or is not finite.
    fn checked_sub(self, rhs: Self) -> Option<Self>;

    #[inline]
    fn clip(self, lower: Self, upper: Self) -> Self {
        if self < lower {
            lower
        } else if self > upper {
            upper
        } else {
            self
        }
    }
}

macro_rules! impl_int_accumulator {
    ($($t:ty),*) => {$(
        impl Accumulator for $t {
            const ZERO: Self = 0;

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_u64(v: u64) -> Self {
                v as $t
            }

            #[inline]
            fn from_usize(v: usize) -> Self {
                v as $t
            }

            #[inline]
            fn to_u64(self) -> u64 {
                if self < 0 { 0 } else { self as u64 }
            }

            #[inline]
            fn abs(self) -> Self {
                self.wrapping_abs()
            }

            #[inline]
            fn saturating_add(self, rhs: Self) -> Self {
                <$t>::saturating_add(self, rhs)
            }

            #[inline]
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                <$t>::checked_sub(self, rhs)
            }
        }
    )*};
}

macro_rules! impl_float_accumulator {
    ($($t:ty),*) => {$(
        impl Accumulator for $t {
            const ZERO: Self = 0.0;

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_u64(v: u64) -> Self {
                v as $t
            }

            #[inline]
            fn from_usize(v: usize) -> Self {
                v as $t
            }

            #[inline]
            fn to_u64(self) -> u64 {
                self as u64
            }

            #[inline]
            fn abs(self) -> Self {
                <$t>::abs(self)
            }

            #[inline]
            fn saturating_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                Some(self - rhs).filter(|d| d.is_finite())
            }
        }
    )*};
}

impl_int_accumulator!(i32, i64, i128);
impl_float_accumulator!(f32, f64);

/// Numeric policy of a pixel storage type.
///
/// Promotion to [`Pixel::Sum`] never sign-extends unsigned storage, so a
/// `u8` value of 200 is 200 in the accumulator, not -56.
pub trait Pixel: Copy + PartialEq + PartialOrd + Default + fmt::Debug + 'static {
    type Sum: Accumulator;

    const STORAGE: StorageType;
    const MIN: Self;
    const MAX: Self;

    fn to_sum(self) -> Self::Sum;

    /// Narrows an accumulator value back to storage. Integers are truncated
    /// to the low bits (a plain cast); floats pass through.
    fn from_sum(v: Self::Sum) -> Self;

    /// Like [`Pixel::from_sum`] but integer storage clips to `[MIN, MAX]`
    /// first. Floats pass through unclipped.
    fn saturate(v: Self::Sum) -> Self;

    fn to_f64(self) -> f64;

    /// Truncates toward zero; integer storage saturates at its range and maps
    /// NaN to zero.
    fn from_f64(v: f64) -> Self;
}

macro_rules! impl_int_pixel {
    ($($t:ty => $sum:ty, $tag:ident;)*) => {$(
        impl Pixel for $t {
            type Sum = $sum;

            const STORAGE: StorageType = StorageType::$tag;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn to_sum(self) -> $sum {
                self as $sum
            }

            #[inline]
            fn from_sum(v: $sum) -> Self {
                v as $t
            }

            #[inline]
            fn saturate(v: $sum) -> Self {
                v.clip(<$t>::MIN as $sum, <$t>::MAX as $sum) as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
        }
    )*};
}

macro_rules! impl_float_pixel {
    ($($t:ty, $tag:ident;)*) => {$(
        impl Pixel for $t {
            type Sum = $t;

            const STORAGE: StorageType = StorageType::$tag;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn to_sum(self) -> $t {
                self
            }

            #[inline]
            fn from_sum(v: $t) -> Self {
                v
            }

            #[inline]
            fn saturate(v: $t) -> Self {
                v
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
        }
    )*};
}

impl_int_pixel! {
    u8 => i32, U8;
    i8 => i32, I8;
    u16 => i32, U16;
    i16 => i32, I16;
    u32 => i64, U32;
    i32 => i64, I32;
    u64 => i128, U64;
    i64 => i128, I64;
}

impl_float_pixel! {
    f32, F32;
    f64, F64;
}

/// Storage types that can hold negative values.
pub trait SignedPixel: Pixel {}

impl SignedPixel for i8 {}
impl SignedPixel for i16 {}
impl SignedPixel for i32 {}
impl SignedPixel for i64 {}
impl SignedPixel for f32 {}
impl SignedPixel for f64 {}

/// Output storage of pairwise `add`/`subtract`, wide enough that the sum or
/// difference of two inputs does not overflow.
pub trait Widen: Pixel {
    type Wide: Pixel;

    fn widen(self) -> Self::Wide;
}

macro_rules! impl_widen {
    ($($t:ty => $wide:ty;)*) => {$(
        impl Widen for $t {
            type Wide = $wide;

            #[inline]
            fn widen(self) -> $wide {
                self as $wide
            }
        }
    )*};
}

impl_widen! {
    u8 => i16;
    i8 => i16;
    u16 => i32;
    i16 => i32;
    u32 => i64;
    i32 => i64;
    i64 => i64;
    f32 => f32;
    f64 => f64;
}
