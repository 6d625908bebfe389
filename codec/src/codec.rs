//! Core codec trait

use crate::error::Error;
use bytes::{Buf, BufMut, BytesMut};

/// Whether the encoded size of a codec's values is known without inspecting them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BufferClass {
    /// Every value encodes to exactly [Codec::max_size] bytes.
    Static,
    /// The encoded size depends on the value.
    Dynamic,
}

impl BufferClass {
    /// Combines the classes of two children laid out one after the other.
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Static, Self::Static) => Self::Static,
            _ => Self::Dynamic,
        }
    }

    /// Returns true if the class is [BufferClass::Static].
    pub const fn is_static(self) -> bool {
        matches!(self, Self::Static)
    }
}

/// The structural kind of a codec.
///
/// Codecs that only wrap another codec ([crate::Reference], [crate::Custom]) report the kind
/// of the codec they wrap. A [crate::Pointer] is a union of "absent" and "present", so it
/// reports [TypeId::Variant], and a [crate::Struct] reports [TypeId::Tuple].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum TypeId {
    Void,
    Pod,
    Range,
    Array,
    Tuple,
    Variant,
    Const,
}

/// A description of how values of [Codec::Value] are laid out in a buffer.
///
/// Codecs hold no mutable state: a codec is built once (possibly from other codecs) and can
/// then be shared and used concurrently for any number of values.
///
/// Implementations must uphold:
/// - `size_of(v) <= max_size()` for every value (when `max_size` has not saturated).
/// - `write(v)` writes exactly `size_of(v)` bytes.
/// - `read_into` consumes exactly the bytes written by `write` for an equal value.
/// - If [Codec::buffer_class] is [BufferClass::Static], `size_of(v) == max_size()` for every value.
pub trait Codec {
    /// The type of values this codec encodes and decodes.
    type Value;

    /// Returns the structural kind of the codec.
    fn type_id(&self) -> TypeId;

    /// Returns whether the encoded size is independent of the value.
    fn buffer_class(&self) -> BufferClass;

    /// Returns an upper bound on the encoded size of any value.
    ///
    /// The bound is computed with the codec's overflow policy, so it may be the policy's
    /// substitute (e.g. `u32::MAX`) rather than an exact figure when no finite `u32` bound exists.
    fn max_size(&self) -> Result<u32, Error>;

    /// Returns the exact encoded size of `value`.
    fn size_of(&self, value: &Self::Value) -> Result<u32, Error>;

    /// Encodes `value` by writing to a buffer.
    ///
    /// Implementations should panic if the buffer doesn't have enough capacity. On error, the
    /// buffer may hold a partial encoding and should be discarded.
    fn write(&self, value: &Self::Value, buf: &mut impl BufMut) -> Result<(), Error>;

    /// Decodes a value from the buffer into `value`, consuming the necessary bytes.
    ///
    /// Containers and handles already present in `value` are reused where the codec allows it.
    fn read_into(&self, buf: &mut impl Buf, value: &mut Self::Value) -> Result<(), Error>;

    /// Decodes a value from the buffer into a freshly defaulted value.
    ///
    /// (Provided method).
    fn read(&self, buf: &mut impl Buf) -> Result<Self::Value, Error>
    where
        Self::Value: Default,
    {
        let mut value = Self::Value::default();
        self.read_into(buf, &mut value)?;
        Ok(value)
    }

    /// Encodes a value to a `BytesMut` buffer of exactly [Codec::size_of] bytes.
    ///
    /// Panics if the `write` implementation does not write the expected number of bytes.
    ///
    /// (Provided method).
    fn encode(&self, value: &Self::Value) -> Result<BytesMut, Error> {
        let len = self.size_of(value)? as usize;
        let mut buffer = BytesMut::with_capacity(len);
        self.write(value, &mut buffer)?;
        assert_eq!(buffer.len(), len, "write() did not write expected bytes");
        Ok(buffer)
    }

    /// Decodes a value from a buffer, ensuring the buffer is fully consumed.
    ///
    /// (Provided method).
    fn decode(&self, mut buf: impl Buf) -> Result<Self::Value, Error>
    where
        Self::Value: Default,
    {
        let value = self.read(&mut buf)?;

        // Check that the buffer is fully consumed.
        let remaining = buf.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }

        Ok(value)
    }
}

// Codecs are descriptions, so a shared reference is as good as the codec itself.
impl<C: Codec> Codec for &C {
    type Value = C::Value;

    #[inline]
    fn type_id(&self) -> TypeId {
        (**self).type_id()
    }

    #[inline]
    fn buffer_class(&self) -> BufferClass {
        (**self).buffer_class()
    }

    #[inline]
    fn max_size(&self) -> Result<u32, Error> {
        (**self).max_size()
    }

    #[inline]
    fn size_of(&self, value: &Self::Value) -> Result<u32, Error> {
        (**self).size_of(value)
    }

    #[inline]
    fn write(&self, value: &Self::Value, buf: &mut impl BufMut) -> Result<(), Error> {
        (**self).write(value, buf)
    }

    #[inline]
    fn read_into(&self, buf: &mut impl Buf, value: &mut Self::Value) -> Result<(), Error> {
        (**self).read_into(buf, value)
    }
}
