//! Codecs for values that are never written.

use crate::{BufferClass, Codec, Error, TypeId};
use bytes::{Buf, BufMut};

/// Codec for a value fixed at definition time.
///
/// Nothing is written and nothing is consumed. Reading replaces the target with a copy of the
/// fixed value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Const<T> {
    value: T,
}

impl<T> Const<T> {
    /// Creates a codec that always produces `value`.
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Returns the fixed value.
    pub const fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Clone> Codec for Const<T> {
    type Value = T;

    fn type_id(&self) -> TypeId {
        TypeId::Const
    }

    fn buffer_class(&self) -> BufferClass {
        BufferClass::Static
    }

    fn max_size(&self) -> Result<u32, Error> {
        Ok(0)
    }

    fn size_of(&self, _: &T) -> Result<u32, Error> {
        Ok(0)
    }

    fn write(&self, _: &T, _: &mut impl BufMut) -> Result<(), Error> {
        Ok(())
    }

    fn read_into(&self, _: &mut impl Buf, value: &mut T) -> Result<(), Error> {
        value.clone_from(&self.value);
        Ok(())
    }
}

/// Codec for `()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Void;

impl Codec for Void {
    type Value = ();

    fn type_id(&self) -> TypeId {
        TypeId::Void
    }

    fn buffer_class(&self) -> BufferClass {
        BufferClass::Static
    }

    fn max_size(&self) -> Result<u32, Error> {
        Ok(0)
    }

    fn size_of(&self, _: &()) -> Result<u32, Error> {
        Ok(0)
    }

    fn write(&self, _: &(), _: &mut impl BufMut) -> Result<(), Error> {
        Ok(())
    }

    fn read_into(&self, _: &mut impl Buf, _: &mut ()) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{Bytes, BytesMut};

    #[test]
    fn test_const_writes_nothing() {
        let codec = Const::new(42u32);
        assert_eq!(codec.type_id(), TypeId::Const);
        assert_eq!(codec.buffer_class(), BufferClass::Static);
        assert_eq!(codec.max_size(), Ok(0));
        assert_eq!(codec.size_of(&7), Ok(0));

        let mut buf = BytesMut::new();
        codec.write(&7, &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_const_reads_fixed_value() {
        let codec = Const::new(String::from("fixed"));
        let mut buf = Bytes::from_static(&[0xAA]);
        let mut value = String::from("other");
        codec.read_into(&mut buf, &mut value).unwrap();
        assert_eq!(value, "fixed");

        // No bytes consumed
        assert_eq!(buf.remaining(), 1);
    }

    #[test]
    fn test_const_decode_empty() {
        let codec = Const::new(9u8);
        assert_eq!(codec.decode(Bytes::new()), Ok(9));
        assert!(matches!(
            codec.decode(Bytes::from_static(&[0])),
            Err(Error::ExtraData(1))
        ));
    }

    #[test]
    fn test_void() {
        assert_eq!(Void.type_id(), TypeId::Void);
        assert_eq!(Void.max_size(), Ok(0));
        assert!(Void.encode(&()).unwrap().is_empty());
        assert_eq!(Void.decode(Bytes::new()), Ok(()));
    }
}
