use core::any::Any;

use crate::error::Shape;
use crate::{Error, Pixel, PixelBuffer, StorageType};

/// A pixel buffer whose storage type is chosen at runtime.
#[derive(Debug, Clone)]
pub enum DynBuffer {
    U8(PixelBuffer<u8>),
    I8(PixelBuffer<i8>),
    U16(PixelBuffer<u16>),
    I16(PixelBuffer<i16>),
    U32(PixelBuffer<u32>),
    I32(PixelBuffer<i32>),
    U64(PixelBuffer<u64>),
    I64(PixelBuffer<i64>),
    F32(PixelBuffer<f32>),
    F64(PixelBuffer<f64>),
}

macro_rules! dispatch {
    ($self:expr, $buf:ident => $body:expr) => {
        match $self {
            DynBuffer::U8($buf) => $body,
            DynBuffer::I8($buf) => $body,
            DynBuffer::U16($buf) => $body,
            DynBuffer::I16($buf) => $body,
            DynBuffer::U32($buf) => $body,
            DynBuffer::I32($buf) => $body,
            DynBuffer::U64($buf) => $body,
            DynBuffer::I64($buf) => $body,
            DynBuffer::F32($buf) => $body,
            DynBuffer::F64($buf) => $body,
        }
    };
}

macro_rules! construct {
    ($storage:expr, $ctor:expr) => {
        match $storage {
            StorageType::U8 => DynBuffer::U8($ctor),
            StorageType::I8 => DynBuffer::I8($ctor),
            StorageType::U16 => DynBuffer::U16($ctor),
            StorageType::I16 => DynBuffer::I16($ctor),
            StorageType::U32 => DynBuffer::U32($ctor),
            StorageType::I32 => DynBuffer::I32($ctor),
            StorageType::U64 => DynBuffer::U64($ctor),
            StorageType::I64 => DynBuffer::I64($ctor),
            StorageType::F32 => DynBuffer::F32($ctor),
            StorageType::F64 => DynBuffer::F64($ctor),
        }
    };
}

impl DynBuffer {
    pub fn new(storage: StorageType, width: usize, height: usize) -> Result<Self, Error> {
        Ok(construct!(storage, PixelBuffer::new(width, height)?))
    }

    pub fn unshaped(storage: StorageType) -> Self {
        construct!(storage, PixelBuffer::unshaped())
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::U8(_) => StorageType::U8,
            Self::I8(_) => StorageType::I8,
            Self::U16(_) => StorageType::U16,
            Self::I16(_) => StorageType::I16,
            Self::U32(_) => StorageType::U32,
            Self::I32(_) => StorageType::I32,
            Self::U64(_) => StorageType::U64,
            Self::I64(_) => StorageType::I64,
            Self::F32(_) => StorageType::F32,
            Self::F64(_) => StorageType::F64,
        }
    }

    pub fn width(&self) -> usize {
        dispatch!(self, b => b.width())
    }

    pub fn height(&self) -> usize {
        dispatch!(self, b => b.height())
    }

    pub fn shape(&self) -> Shape {
        dispatch!(self, b => b.shape())
    }

    pub fn is_unshaped(&self) -> bool {
        dispatch!(self, b => b.is_unshaped())
    }

    /// Pixel `(x, y)` widened to `f64`.
    pub fn get_f64(&self, x: usize, y: usize) -> Result<f64, Error> {
        dispatch!(self, b => b.get(x, y).map(Pixel::to_f64))
    }

    /// Writes `value` with the storage type's float cast-back rule.
    pub fn set_f64(&self, x: usize, y: usize, value: f64) -> Result<(), Error> {
        dispatch!(self, b => b.set(x, y, Pixel::from_f64(value)))
    }

    pub fn downcast_ref<T: Pixel>(&self) -> Option<&PixelBuffer<T>> {
        let any: &dyn Any = dispatch!(self, b => b);
        any.downcast_ref()
    }

    pub fn into_typed<T: Pixel>(self) -> Result<PixelBuffer<T>, Self> {
        if let Some(b) = self.downcast_ref::<T>() {
            return Ok(b.clone());
        }
        Err(self)
    }
}

macro_rules! impl_from_buffer {
    ($($t:ty => $variant:ident),*) => {$(
        impl From<PixelBuffer<$t>> for DynBuffer {
            fn from(buffer: PixelBuffer<$t>) -> Self {
                Self::$variant(buffer)
            }
        }
    )*};
}

impl_from_buffer!(
    u8 => U8, i8 => I8, u16 => U16, i16 => I16, u32 => U32,
    i32 => I32, u64 => U64, i64 => I64, f32 => F32, f64 => F64
);
