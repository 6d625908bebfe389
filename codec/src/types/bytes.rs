//! Codecs for length-prefixed strings and byte blobs.
//!
//! Each writes its length using a [SizeField], followed by the contents:
//! - [Text]: UTF-8, length in bytes
//! - [Utf16]: UTF-16 code units, length in units
//! - [Utf32]: Unicode scalar values, length in characters
//! - [Blob]: raw bytes, length in bytes
//!
//! The field width bounds the longest value that can be encoded. A [RangeCfg] narrows the
//! lengths accepted on decode.

use crate::{
    math,
    primitives::{Scalar, SizeField},
    util::at_least,
    BufferClass, ByteOrder, Codec, Error, Overflow, RangeCfg, TypeId,
};
use bytes::{Buf, BufMut, Bytes};

/// The length prefix shared by the string codecs.
#[derive(Clone, Copy, Debug, Default)]
struct Prefix<S> {
    size: S,
    overflow: Overflow,
    limit: RangeCfg,
}

impl<S: SizeField> Prefix<S> {
    fn new(size: S) -> Self {
        Self {
            size,
            overflow: Overflow::default(),
            limit: RangeCfg::default(),
        }
    }

    fn bound(&self, unit: u32) -> Result<u32, Error> {
        let body = math::mul(unit, S::MAX, self.overflow)?;
        math::add(S::WIDTH, body, self.overflow)
    }

    fn size(&self, len: usize, unit: u32) -> Result<u32, Error> {
        let body = math::mul(unit, S::check(len)?, self.overflow)?;
        math::add(S::WIDTH, body, self.overflow)
    }

    fn read_len(&self, buf: &mut impl Buf, unit: usize) -> Result<usize, Error> {
        let len = self.limit.check(self.size.read_count(buf)?)?;
        at_least(buf, len.saturating_mul(unit))?;
        Ok(len)
    }
}

// Builders shared by every string codec
macro_rules! impl_builders {
    ($name:ident) => {
        impl<S: SizeField> $name<S> {
            /// Sets the policy used when a size computation overflows.
            pub fn with_overflow(mut self, overflow: Overflow) -> Self {
                self.prefix.overflow = overflow;
                self
            }

            /// Rejects decoded lengths outside `limit` with [Error::InvalidLength].
            pub fn with_limit(mut self, limit: impl Into<RangeCfg>) -> Self {
                self.prefix.limit = limit.into();
                self
            }
        }
    };
}

/// Codec for a UTF-8 `String` preceded by its length in bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Text<S> {
    prefix: Prefix<S>,
}

impl<S: SizeField> Text<S> {
    /// Creates a codec whose length prefix is written with `size`.
    pub fn new(size: S) -> Self {
        Self {
            prefix: Prefix::new(size),
        }
    }
}

impl_builders!(Text);

impl<S: SizeField> Codec for Text<S> {
    type Value = String;

    fn type_id(&self) -> TypeId {
        TypeId::Range
    }

    fn buffer_class(&self) -> BufferClass {
        BufferClass::Dynamic
    }

    fn max_size(&self) -> Result<u32, Error> {
        self.prefix.bound(1)
    }

    fn size_of(&self, value: &String) -> Result<u32, Error> {
        self.prefix.size(value.len(), 1)
    }

    fn write(&self, value: &String, buf: &mut impl BufMut) -> Result<(), Error> {
        self.prefix.size.write_count(value.len(), buf)?;
        buf.put_slice(value.as_bytes());
        Ok(())
    }

    fn read_into(&self, buf: &mut impl Buf, value: &mut String) -> Result<(), Error> {
        let len = self.prefix.read_len(buf, 1)?;
        let raw = buf.copy_to_bytes(len);
        let text = core::str::from_utf8(&raw)
            .map_err(|err| Error::InvalidData("String".to_string(), err.to_string()))?;
        value.clear();
        value.push_str(text);
        Ok(())
    }
}

/// Codec for a `String` written as UTF-16 code units, preceded by the number of units.
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf16<S> {
    prefix: Prefix<S>,
    order: ByteOrder,
}

impl<S: SizeField> Utf16<S> {
    /// Creates a codec writing code units in `order`.
    pub fn new(size: S, order: ByteOrder) -> Self {
        Self {
            prefix: Prefix::new(size),
            order,
        }
    }
}

impl_builders!(Utf16);

impl<S: SizeField> Codec for Utf16<S> {
    type Value = String;

    fn type_id(&self) -> TypeId {
        TypeId::Range
    }

    fn buffer_class(&self) -> BufferClass {
        BufferClass::Dynamic
    }

    fn max_size(&self) -> Result<u32, Error> {
        self.prefix.bound(u16::WIDTH)
    }

    fn size_of(&self, value: &String) -> Result<u32, Error> {
        self.prefix.size(value.encode_utf16().count(), u16::WIDTH)
    }

    fn write(&self, value: &String, buf: &mut impl BufMut) -> Result<(), Error> {
        self.prefix
            .size
            .write_count(value.encode_utf16().count(), buf)?;
        for unit in value.encode_utf16() {
            unit.put(self.order, buf)?;
        }
        Ok(())
    }

    fn read_into(&self, buf: &mut impl Buf, value: &mut String) -> Result<(), Error> {
        let len = self.prefix.read_len(buf, u16::WIDTH as usize)?;
        let units = (0..len)
            .map(|_| u16::get(self.order, buf))
            .collect::<Result<Vec<_>, _>>()?;
        *value = String::from_utf16(&units)
            .map_err(|err| Error::InvalidData("Utf16".to_string(), err.to_string()))?;
        Ok(())
    }
}

/// Codec for a `String` written as 4-byte scalar values, preceded by the number of characters.
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf32<S> {
    prefix: Prefix<S>,
    order: ByteOrder,
}

impl<S: SizeField> Utf32<S> {
    /// Creates a codec writing characters in `order`.
    pub fn new(size: S, order: ByteOrder) -> Self {
        Self {
            prefix: Prefix::new(size),
            order,
        }
    }
}

impl_builders!(Utf32);

impl<S: SizeField> Codec for Utf32<S> {
    type Value = String;

    fn type_id(&self) -> TypeId {
        TypeId::Range
    }

    fn buffer_class(&self) -> BufferClass {
        BufferClass::Dynamic
    }

    fn max_size(&self) -> Result<u32, Error> {
        self.prefix.bound(char::WIDTH)
    }

    fn size_of(&self, value: &String) -> Result<u32, Error> {
        self.prefix.size(value.chars().count(), char::WIDTH)
    }

    fn write(&self, value: &String, buf: &mut impl BufMut) -> Result<(), Error> {
        self.prefix.size.write_count(value.chars().count(), buf)?;
        for c in value.chars() {
            c.put(self.order, buf)?;
        }
        Ok(())
    }

    fn read_into(&self, buf: &mut impl Buf, value: &mut String) -> Result<(), Error> {
        let len = self.prefix.read_len(buf, char::WIDTH as usize)?;
        let text = (0..len)
            .map(|_| char::get(self.order, buf))
            .collect::<Result<String, _>>()?;
        *value = text;
        Ok(())
    }
}

/// Codec for [Bytes] preceded by their length.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blob<S> {
    prefix: Prefix<S>,
}

impl<S: SizeField> Blob<S> {
    /// Creates a codec whose length prefix is written with `size`.
    pub fn new(size: S) -> Self {
        Self {
            prefix: Prefix::new(size),
        }
    }
}

impl_builders!(Blob);

impl<S: SizeField> Codec for Blob<S> {
    type Value = Bytes;

    fn type_id(&self) -> TypeId {
        TypeId::Range
    }

    fn buffer_class(&self) -> BufferClass {
        BufferClass::Dynamic
    }

    fn max_size(&self) -> Result<u32, Error> {
        self.prefix.bound(1)
    }

    fn size_of(&self, value: &Bytes) -> Result<u32, Error> {
        self.prefix.size(value.len(), 1)
    }

    fn write(&self, value: &Bytes, buf: &mut impl BufMut) -> Result<(), Error> {
        self.prefix.size.write_count(value.len(), buf)?;
        buf.put_slice(value);
        Ok(())
    }

    fn read_into(&self, buf: &mut impl Buf, value: &mut Bytes) -> Result<(), Error> {
        let len = self.prefix.read_len(buf, 1)?;
        *value = buf.copy_to_bytes(len);
        Ok(())
    }
}
