//! Codec for a fixed number of homogeneous elements.

use crate::{
    container::{Sink, Source},
    math,
    util::count_u32,
    BufferClass, Codec, Error, Overflow, TypeId,
};
use bytes::{Buf, BufMut};
use core::marker::PhantomData;

/// Codec for exactly `N` elements, written back to back with no count.
///
/// The container defaults to `[E::Value; N]` but may be any [Sink], for example a `Vec` that is
/// resized to `N` on decode.
#[derive(Debug)]
pub struct Array<E: Codec, const N: usize, T = [<E as Codec>::Value; N]> {
    elem: E,
    overflow: Overflow,
    max: Result<u32, Error>,
    _container: PhantomData<fn() -> T>,
}

impl<E: Codec + Clone, const N: usize, T> Clone for Array<E, N, T> {
    fn clone(&self) -> Self {
        Self {
            elem: self.elem.clone(),
            overflow: self.overflow,
            max: self.max.clone(),
            _container: PhantomData,
        }
    }
}

impl<E: Codec, const N: usize> Array<E, N> {
    /// Creates a codec for `[E::Value; N]`.
    pub fn new(elem: E) -> Self {
        Self::with_container(elem)
    }
}

impl<E: Codec, const N: usize, T> Array<E, N, T> {
    /// Creates a codec for `N` elements stored in `T`.
    pub fn with_container(elem: E) -> Self {
        let overflow = Overflow::default();
        Self {
            max: Self::bound(&elem, overflow),
            elem,
            overflow,
            _container: PhantomData,
        }
    }

    /// Sets the policy used when a size computation overflows.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self.max = Self::bound(&self.elem, overflow);
        self
    }

    /// Returns the element codec.
    pub fn elem(&self) -> &E {
        &self.elem
    }

    fn bound(elem: &E, overflow: Overflow) -> Result<u32, Error> {
        math::mul(elem.max_size()?, count_u32(N)?, overflow)
    }

    fn check_count(count: usize) -> Result<(), Error> {
        if count < N {
            return Err(Error::ShortInputRange {
                expected: N,
                found: count,
            });
        }
        Ok(())
    }
}

impl<E, const N: usize, T> Codec for Array<E, N, T>
where
    E: Codec,
    T: Sink<Item = E::Value>,
{
    type Value = T;

    fn type_id(&self) -> TypeId {
        TypeId::Array
    }

    fn buffer_class(&self) -> BufferClass {
        self.elem.buffer_class()
    }

    fn max_size(&self) -> Result<u32, Error> {
        self.max.clone()
    }

    fn size_of(&self, value: &T) -> Result<u32, Error> {
        Self::check_count(value.count())?;
        if self.buffer_class().is_static() {
            return self.max.clone();
        }
        math::sum(
            value.items().take(N).map(|item| self.elem.size_of(item)),
            self.overflow,
        )
    }

    fn write(&self, value: &T, buf: &mut impl BufMut) -> Result<(), Error> {
        Self::check_count(value.count())?;
        for item in value.items().take(N) {
            self.elem.write(item, buf)?;
        }
        Ok(())
    }

    fn read_into(&self, buf: &mut impl Buf, value: &mut T) -> Result<(), Error> {
        value.fill(N, |item| self.elem.read_into(buf, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        primitives::{U16, U32, U64, U8},
        Sequence, Text,
    };
    use bytes::{Bytes, BytesMut};

    #[test]
    fn test_static_array() {
        let codec = Array::<_, 3>::new(U64);
        assert_eq!(codec.type_id(), TypeId::Array);
        assert_eq!(codec.buffer_class(), BufferClass::Static);
        assert_eq!(codec.max_size(), Ok(24));

        let value = [112345678u64, 99999999, 123123123123];
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(encoded.len(), 24);
        assert_eq!(&encoded[..8], &112345678u64.to_le_bytes()[..]);
        assert_eq!(codec.decode(encoded).unwrap(), value);
    }

    #[test]
    fn test_no_count_written() {
        let codec = Array::<_, 2>::new(U8);
        assert_eq!(codec.encode(&[7, 9]).unwrap(), &[7, 9][..]);
    }

    #[test]
    fn test_dynamic_array() {
        let codec = Array::<_, 2>::new(Text::new(U8));
        assert_eq!(codec.buffer_class(), BufferClass::Dynamic);
        assert_eq!(codec.max_size(), Ok(2 * 256));

        let value = [String::from("ab"), String::from("")];
        assert_eq!(codec.size_of(&value), Ok(3 + 1));
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(encoded, &[2, b'a', b'b', 0][..]);
        assert_eq!(codec.decode(encoded).unwrap(), value);
    }

    #[test]
    fn test_vec_container() {
        let codec = Array::<_, 3, Vec<u16>>::with_container(U16);

        // Only the first N elements are written
        let value = vec![1, 2, 3, 4];
        assert_eq!(codec.size_of(&value), Ok(6));
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(encoded.len(), 6);

        // Decoding resizes to N
        let mut decoded = vec![0u16; 8];
        codec.read_into(&mut encoded.freeze(), &mut decoded).unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn test_short_input_range() {
        let codec = Array::<_, 3, Vec<u16>>::with_container(U16);
        let value = vec![1, 2];
        let expected = Error::ShortInputRange {
            expected: 3,
            found: 2,
        };
        assert_eq!(codec.size_of(&value), Err(expected.clone()));
        let mut buf = BytesMut::new();
        assert_eq!(codec.write(&value, &mut buf), Err(expected));
    }

    #[test]
    fn test_capacity_mismatch() {
        let codec = Array::<_, 3, [u16; 2]>::with_container(U16);
        let mut value = [0u16; 2];
        let mut buf = Bytes::from_static(&[1, 0, 2, 0, 3, 0]);
        assert_eq!(
            codec.read_into(&mut buf, &mut value),
            Err(Error::CapacityMismatch {
                needed: 3,
                capacity: 2
            })
        );
    }

    #[test]
    fn test_end_of_buffer() {
        let codec = Array::<_, 3>::new(U16);
        assert!(matches!(
            codec.decode(Bytes::from_static(&[1, 0, 2, 0])),
            Err(Error::EndOfBuffer)
        ));
    }

    #[test]
    fn test_overflow_policy() {
        // A u32-prefixed sequence saturates on its own, so two of them cannot fit
        let inner = Sequence::new(U32, U8);
        let codec = Array::<_, 2, [Vec<u8>; 2]>::with_container(inner);
        assert_eq!(codec.max_size(), Ok(u32::MAX));

        let raising = codec.with_overflow(Overflow::Raise);
        assert_eq!(raising.max_size(), Err(Error::SizeOverflow("mul")));

        // Value sizes are unaffected when they fit
        let value = [vec![1u8], vec![]];
        assert_eq!(raising.size_of(&value), Ok(5 + 4));
    }
}
