//! Codecs for fixed-width scalar values.
//!
//! # Byte order
//!
//! Every [Pod] codec carries an explicit [ByteOrder]. Values are byte-swapped on write and read
//! only when that order differs from the host's, so the wire format never depends on the
//! architecture that produced it. The constants in this module mirror the common choices:
//! `U32` is a little-endian `u32`, `U32_BE` its big-endian counterpart.
//!
//! # Size fields
//!
//! Length-prefixed codecs take their count field as a [SizeField]. Only the 1, 2 and 4-byte
//! unsigned codecs implement it, so an illegal count width does not type-check.
//!
//! # Identifiers
//!
//! Each [Pod] reports a [PodId] naming its value type. The low bit of a multi-byte identifier
//! is set for big-endian codecs, so `U32.pod_id()` is [PodId::UInt32] and `U32_BE.pod_id()` is
//! [PodId::UInt32B].

use crate::{util::at_least, BufferClass, ByteOrder, Codec, Error, TypeId};
use bytes::{Buf, BufMut};
use core::{any::type_name, marker::PhantomData};
use paste::paste;

/// Identifier of the value type of a [Pod] codec.
///
/// Even identifiers are little-endian (or have no byte order), odd identifiers big-endian.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum PodId {
    Char8 = 0,
    Char16 = 2,
    Char16B = 3,
    Char32 = 4,
    Char32B = 5,

    UInt8 = 16,
    Int8 = 17,
    UInt16 = 18,
    UInt16B = 19,
    Int16 = 20,
    Int16B = 21,
    UInt32 = 22,
    UInt32B = 23,
    Int32 = 24,
    Int32B = 25,
    UInt64 = 26,
    UInt64B = 27,
    Int64 = 28,
    Int64B = 29,

    Float = 32,
    FloatB = 33,
    Double = 34,
    DoubleB = 35,

    Day = 64,
    Month = 65,
    Weekday = 66,
    Year = 68,
    YearB = 69,
    Date = 70,
    DateB = 71,
    Time = 72,
    TimeB = 73,
    DateTime = 74,
    DateTimeB = 75,

    Bool = 128,
    Unspecified = 130,
}

impl PodId {
    /// Returns the big-endian counterpart, or `self` if the type has no byte order.
    pub const fn big(self) -> Self {
        match self {
            Self::Char16 => Self::Char16B,
            Self::Char32 => Self::Char32B,
            Self::UInt16 => Self::UInt16B,
            Self::Int16 => Self::Int16B,
            Self::UInt32 => Self::UInt32B,
            Self::Int32 => Self::Int32B,
            Self::UInt64 => Self::UInt64B,
            Self::Int64 => Self::Int64B,
            Self::Float => Self::FloatB,
            Self::Double => Self::DoubleB,
            Self::Year => Self::YearB,
            Self::Date => Self::DateB,
            Self::Time => Self::TimeB,
            Self::DateTime => Self::DateTimeB,
            other => other,
        }
    }
}

/// A scalar type with a fixed encoded width.
pub trait Scalar: Copy + Default + 'static {
    /// The encoded width in bytes.
    const WIDTH: u32;

    /// The little-endian identifier of the type.
    const ID: PodId;

    /// Writes the value in the given byte order.
    ///
    /// Fails if the value has no representation in the encoded width.
    fn put(self, order: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error>;

    /// Reads a value stored in the given byte order.
    fn get(order: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error>;
}

// Scalar implementation for multi-byte numeric types
macro_rules! impl_scalar {
    ($type:ident, $id:ident) => {
        paste! {
            impl Scalar for $type {
                const WIDTH: u32 = core::mem::size_of::<$type>() as u32;
                const ID: PodId = PodId::$id;

                #[inline]
                fn put(self, order: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error> {
                    match order {
                        ByteOrder::Little => buf.[<put_ $type _le>](self),
                        ByteOrder::Big => buf.[<put_ $type>](self),
                    }
                    Ok(())
                }

                #[inline]
                fn get(order: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error> {
                    at_least(buf, Self::WIDTH as usize)?;
                    Ok(match order {
                        ByteOrder::Little => buf.[<get_ $type _le>](),
                        ByteOrder::Big => buf.[<get_ $type>](),
                    })
                }
            }
        }
    };
}

impl_scalar!(u16, UInt16);
impl_scalar!(u32, UInt32);
impl_scalar!(u64, UInt64);
impl_scalar!(u128, Unspecified);
impl_scalar!(i16, Int16);
impl_scalar!(i32, Int32);
impl_scalar!(i64, Int64);
impl_scalar!(i128, Unspecified);
impl_scalar!(f32, Float);
impl_scalar!(f64, Double);

// Single bytes have no order
macro_rules! impl_byte {
    ($type:ident, $id:ident) => {
        paste! {
            impl Scalar for $type {
                const WIDTH: u32 = 1;
                const ID: PodId = PodId::$id;

                #[inline]
                fn put(self, _: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error> {
                    buf.[<put_ $type>](self);
                    Ok(())
                }

                #[inline]
                fn get(_: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error> {
                    at_least(buf, 1)?;
                    Ok(buf.[<get_ $type>]())
                }
            }
        }
    };
}

impl_byte!(u8, UInt8);
impl_byte!(i8, Int8);

impl Scalar for bool {
    const WIDTH: u32 = 1;
    const ID: PodId = PodId::Bool;

    #[inline]
    fn put(self, _: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error> {
        buf.put_u8(u8::from(self));
        Ok(())
    }

    #[inline]
    fn get(order: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error> {
        match u8::get(order, buf)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidBool),
        }
    }
}

impl Scalar for char {
    const WIDTH: u32 = 4;
    const ID: PodId = PodId::Char32;

    #[inline]
    fn put(self, order: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error> {
        u32::from(self).put(order, buf)
    }

    #[inline]
    fn get(order: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error> {
        let raw = u32::get(order, buf)?;
        char::from_u32(raw).ok_or_else(|| {
            Error::InvalidData("char".to_string(), format!("invalid scalar value {raw:#x}"))
        })
    }
}

/// A UTF-16 code unit.
///
/// Unlike `char`, any `u16` is a valid code unit: surrogates are only meaningful in pairs and
/// are not checked here.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Char16(pub u16);

impl Scalar for Char16 {
    const WIDTH: u32 = 2;
    const ID: PodId = PodId::Char16;

    #[inline]
    fn put(self, order: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error> {
        self.0.put(order, buf)
    }

    #[inline]
    fn get(order: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error> {
        u16::get(order, buf).map(Self)
    }
}

/// Codec for a [Scalar] in a fixed byte order.
#[derive(Debug)]
pub struct Pod<T> {
    order: ByteOrder,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Pod<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Pod<T> {}

impl<T> Default for Pod<T> {
    fn default() -> Self {
        Self::new(ByteOrder::Little)
    }
}

impl<T> Pod<T> {
    /// Creates a codec writing values in `order`.
    pub const fn new(order: ByteOrder) -> Self {
        Self {
            order,
            _marker: PhantomData,
        }
    }

    /// Creates a little-endian codec.
    pub const fn le() -> Self {
        Self::new(ByteOrder::Little)
    }

    /// Creates a big-endian codec.
    pub const fn be() -> Self {
        Self::new(ByteOrder::Big)
    }

    /// Returns the byte order of the codec.
    pub const fn order(&self) -> ByteOrder {
        self.order
    }
}

impl<T: Scalar> Pod<T> {
    /// Returns the identifier of the value type, with the low bit set if it is big-endian.
    pub const fn pod_id(&self) -> PodId {
        match self.order {
            ByteOrder::Little => T::ID,
            ByteOrder::Big => T::ID.big(),
        }
    }

    /// Reads a value and converts it to `U`, failing if it does not fit.
    pub fn read_cast<U: TryFrom<T>>(&self, buf: &mut impl Buf) -> Result<U, Error> {
        let value = T::get(self.order, buf)?;
        U::try_from(value).map_err(|_| Error::OutOfRange(type_name::<U>()))
    }

    /// Converts `value` to `T` and writes it, failing if it does not fit.
    pub fn write_cast<U>(&self, value: U, buf: &mut impl BufMut) -> Result<(), Error>
    where
        T: TryFrom<U>,
    {
        let value = T::try_from(value).map_err(|_| Error::OutOfRange(type_name::<T>()))?;
        value.put(self.order, buf)
    }
}

impl<T: Scalar> Codec for Pod<T> {
    type Value = T;

    #[inline]
    fn type_id(&self) -> TypeId {
        TypeId::Pod
    }

    #[inline]
    fn buffer_class(&self) -> BufferClass {
        BufferClass::Static
    }

    #[inline]
    fn max_size(&self) -> Result<u32, Error> {
        Ok(T::WIDTH)
    }

    #[inline]
    fn size_of(&self, _: &T) -> Result<u32, Error> {
        Ok(T::WIDTH)
    }

    #[inline]
    fn write(&self, value: &T, buf: &mut impl BufMut) -> Result<(), Error> {
        value.put(self.order, buf)
    }

    #[inline]
    fn read_into(&self, buf: &mut impl Buf, value: &mut T) -> Result<(), Error> {
        *value = T::get(self.order, buf)?;
        Ok(())
    }
}

/// The element count prefix of a length-prefixed codec.
pub trait SizeField: Copy {
    /// The encoded width of the count in bytes.
    const WIDTH: u32;

    /// The largest count the field can represent.
    const MAX: u32;

    /// Checks that `count` fits in the field.
    fn check(count: usize) -> Result<u32, Error> {
        u32::try_from(count)
            .ok()
            .filter(|count| *count <= Self::MAX)
            .ok_or(Error::SequenceTooLong {
                count,
                max: Self::MAX,
            })
    }

    /// Writes `count`, failing if it does not fit in the field.
    fn write_count(&self, count: usize, buf: &mut impl BufMut) -> Result<(), Error>;

    /// Reads a count.
    fn read_count(&self, buf: &mut impl Buf) -> Result<usize, Error>;
}

macro_rules! impl_size_field {
    ($type:ty) => {
        impl SizeField for Pod<$type> {
            const WIDTH: u32 = <$type as Scalar>::WIDTH;
            const MAX: u32 = <$type>::MAX as u32;

            #[inline]
            fn write_count(&self, count: usize, buf: &mut impl BufMut) -> Result<(), Error> {
                let count = <$type>::try_from(count).map_err(|_| Error::SequenceTooLong {
                    count,
                    max: Self::MAX,
                })?;
                count.put(self.order, buf)
            }

            #[inline]
            fn read_count(&self, buf: &mut impl Buf) -> Result<usize, Error> {
                let count = <$type as Scalar>::get(self.order, buf)?;
                usize::try_from(count).map_err(|_| Error::OutOfRange("usize"))
            }
        }
    };
}

impl_size_field!(u8);
impl_size_field!(u16);
impl_size_field!(u32);

// Named codecs
pub const U8: Pod<u8> = Pod::le();
pub const I8: Pod<i8> = Pod::le();
pub const U16: Pod<u16> = Pod::le();
pub const U16_BE: Pod<u16> = Pod::be();
pub const I16: Pod<i16> = Pod::le();
pub const I16_BE: Pod<i16> = Pod::be();
pub const U32: Pod<u32> = Pod::le();
pub const U32_BE: Pod<u32> = Pod::be();
pub const I32: Pod<i32> = Pod::le();
pub const I32_BE: Pod<i32> = Pod::be();
pub const U64: Pod<u64> = Pod::le();
pub const U64_BE: Pod<u64> = Pod::be();
pub const I64: Pod<i64> = Pod::le();
pub const I64_BE: Pod<i64> = Pod::be();
pub const U128: Pod<u128> = Pod::le();
pub const U128_BE: Pod<u128> = Pod::be();
pub const I128: Pod<i128> = Pod::le();
pub const I128_BE: Pod<i128> = Pod::be();
pub const F32: Pod<f32> = Pod::le();
pub const F32_BE: Pod<f32> = Pod::be();
pub const F64: Pod<f64> = Pod::le();
pub const F64_BE: Pod<f64> = Pod::be();
pub const BOOL: Pod<bool> = Pod::le();
pub const CHAR: Pod<char> = Pod::le();
pub const CHAR_BE: Pod<char> = Pod::be();
pub const CHAR16: Pod<Char16> = Pod::le();
pub const CHAR16_BE: Pod<Char16> = Pod::be();
