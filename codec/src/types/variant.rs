//! Codec for tagged unions.
//!
//! A [Variant] holds an ordered list of alternative codecs. Its values are the sum types
//! [OneOf1] through [OneOf8], whose variants `A`, `B`, ... correspond positionally to the
//! alternatives. A value is encoded as a single tag byte holding the zero-based index of its
//! variant, followed by that alternative's encoding.
//!
//! Decoding a tag with no matching alternative fails with [Error::UnknownDiscriminant].

use crate::{math, util::at_least, BufferClass, Codec, Error, Overflow, TypeId};
use bytes::{Buf, BufMut};
use paste::paste;
use tracing::debug;

/// An ordered list of alternative codecs.
pub trait Alternatives {
    /// The number of alternatives.
    const COUNT: usize;

    /// Returns [BufferClass::Static] if every alternative is static with the same size.
    fn class(&self) -> BufferClass;

    /// Returns one byte plus the largest alternative bound.
    fn bound(&self, overflow: Overflow) -> Result<u32, Error>;
}

/// Codec for a tagged union of the values of its alternatives.
#[derive(Clone, Debug)]
pub struct Variant<L> {
    list: L,
    overflow: Overflow,
    class: BufferClass,
    max: Result<u32, Error>,
}

impl<L: Alternatives> Variant<L> {
    /// Creates a codec from a tuple of alternative codecs.
    pub fn new(list: L) -> Self {
        let overflow = Overflow::default();
        Self {
            class: list.class(),
            max: list.bound(overflow),
            list,
            overflow,
        }
    }

    /// Sets the policy used when a size computation overflows.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self.max = self.list.bound(overflow);
        self
    }

    /// Returns the alternative codecs.
    pub fn alternatives(&self) -> &L {
        &self.list
    }
}

fn unknown(tag: u8, alternatives: usize) -> Error {
    debug!(tag, alternatives, "unknown discriminant");
    Error::UnknownDiscriminant { tag, alternatives }
}

macro_rules! impl_variant {
    ($name:ident, $count:literal; $($index:literal => $alt:ident),+) => {
        paste! {
            /// A value of one of several types, tagged by position.
            #[derive(Clone, Debug, PartialEq, Eq, Hash)]
            pub enum $name<$( [<T $index>] ),+> {
                $( $alt([<T $index>]), )+
            }

            impl<$( [<T $index>] ),+> $name<$( [<T $index>] ),+> {
                /// Returns the zero-based index of the active variant.
                pub const fn index(&self) -> u8 {
                    match self {
                        $( Self::$alt(_) => $index, )+
                    }
                }
            }

            impl<$( [<T $index>] ),+> Default for $name<$( [<T $index>] ),+>
            where
                T0: Default,
            {
                fn default() -> Self {
                    Self::A(T0::default())
                }
            }

            impl<$( [<C $index>]: Codec ),+> Alternatives for ( $( [<C $index>], )+ ) {
                const COUNT: usize = $count;

                fn class(&self) -> BufferClass {
                    let classes = [ $( self.$index.buffer_class(), )+ ];
                    let sizes = [ $( self.$index.max_size(), )+ ];
                    let uniform = sizes.iter().all(|size| size.is_ok() && *size == sizes[0]);
                    if uniform && classes.iter().all(|class| class.is_static()) {
                        BufferClass::Static
                    } else {
                        BufferClass::Dynamic
                    }
                }

                fn bound(&self, overflow: Overflow) -> Result<u32, Error> {
                    let widest = [ $( self.$index.max_size()?, )+ ]
                        .into_iter()
                        .max()
                        .unwrap_or(0);
                    math::add(1, widest, overflow)
                }
            }

            impl<$( [<C $index>] ),+> Variant<( $( [<C $index>], )+ )>
            where
                $( [<C $index>]: Codec, [<C $index>]::Value: Default, )+
            {
                /// Decodes the alternative at `index` without inspecting the tag byte.
                ///
                /// The tag byte is skipped. The caller must know that it holds `index`; if it
                /// does not, the remaining bytes are decoded as the wrong alternative.
                pub fn read_known(
                    &self,
                    buf: &mut impl Buf,
                    index: u8,
                    value: &mut $name<$( [<C $index>]::Value ),+>,
                ) -> Result<(), Error> {
                    at_least(buf, 1)?;
                    buf.advance(1);
                    self.dispatch(buf, index, value)
                }

                fn dispatch(
                    &self,
                    buf: &mut impl Buf,
                    index: u8,
                    value: &mut $name<$( [<C $index>]::Value ),+>,
                ) -> Result<(), Error> {
                    match index {
                        $(
                            $index => {
                                // Decode in place when the alternative is already active
                                if let $name::$alt(inner) = value {
                                    return self.list.$index.read_into(buf, inner);
                                }
                                let mut inner = Default::default();
                                self.list.$index.read_into(buf, &mut inner)?;
                                *value = $name::$alt(inner);
                                Ok(())
                            }
                        )+
                        _ => Err(unknown(index, $count)),
                    }
                }
            }

            impl<$( [<C $index>] ),+> Codec for Variant<( $( [<C $index>], )+ )>
            where
                $( [<C $index>]: Codec, [<C $index>]::Value: Default, )+
            {
                type Value = $name<$( [<C $index>]::Value ),+>;

                fn type_id(&self) -> TypeId {
                    TypeId::Variant
                }

                #[inline]
                fn buffer_class(&self) -> BufferClass {
                    self.class
                }

                #[inline]
                fn max_size(&self) -> Result<u32, Error> {
                    self.max.clone()
                }

                fn size_of(&self, value: &Self::Value) -> Result<u32, Error> {
                    let size = match value {
                        $( $name::$alt(inner) => self.list.$index.size_of(inner)?, )+
                    };
                    math::add(1, size, self.overflow)
                }

                fn write(&self, value: &Self::Value, buf: &mut impl BufMut) -> Result<(), Error> {
                    buf.put_u8(value.index());
                    match value {
                        $( $name::$alt(inner) => self.list.$index.write(inner, buf), )+
                    }
                }

                fn read_into(
                    &self,
                    buf: &mut impl Buf,
                    value: &mut Self::Value,
                ) -> Result<(), Error> {
                    at_least(buf, 1)?;
                    let tag = buf.get_u8();
                    self.dispatch(buf, tag, value)
                }
            }
        }
    };
}

impl_variant!(OneOf1, 1; 0 => A);
impl_variant!(OneOf2, 2; 0 => A, 1 => B);
impl_variant!(OneOf3, 3; 0 => A, 1 => B, 2 => C);
impl_variant!(OneOf4, 4; 0 => A, 1 => B, 2 => C, 3 => D);
impl_variant!(OneOf5, 5; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_variant!(OneOf6, 6; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
impl_variant!(OneOf7, 7; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G);
impl_variant!(OneOf8, 8; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        primitives::{I32, U16, U32, U64, U8},
        Text, Tuple, Void,
    };
    use bytes::Bytes;

    #[test]
    fn test_string_alternative() {
        let codec = Variant::new((U8, Text::new(U32)));
        let value = OneOf2::B(String::from("ab"));
        assert_eq!(codec.size_of(&value), Ok(1 + 4 + 2));
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(encoded, &[1, 2, 0, 0, 0, b'a', b'b'][..]);
        assert_eq!(codec.decode(encoded).unwrap(), value);
    }

    #[test]
    fn test_tag_determinism() {
        let codec = Variant::new((U8, U16, U32));
        for _ in 0..3 {
            let encoded = codec.encode(&OneOf3::B(5)).unwrap();
            assert_eq!(encoded, &[1, 5, 0][..]);
            assert!(matches!(codec.decode(encoded), Ok(OneOf3::B(5))));
        }
        assert_eq!(codec.encode(&OneOf3::A(5)).unwrap(), &[0, 5][..]);
        assert_eq!(codec.encode(&OneOf3::C(5)).unwrap(), &[2, 5, 0, 0, 0][..]);
    }

    #[test]
    fn test_buffer_class() {
        // Same static size
        let codec = Variant::new((U32, I32));
        assert_eq!(codec.buffer_class(), BufferClass::Static);
        assert_eq!(codec.max_size(), Ok(5));
        assert_eq!(codec.size_of(&OneOf2::B(-1)), Ok(5));

        // Different static sizes
        let codec = Variant::new((U8, U64));
        assert_eq!(codec.buffer_class(), BufferClass::Dynamic);
        assert_eq!(codec.max_size(), Ok(9));
        assert_eq!(codec.size_of(&OneOf2::A(1)), Ok(2));

        // A dynamic alternative
        let codec = Variant::new((Text::new(U8),));
        assert_eq!(codec.buffer_class(), BufferClass::Dynamic);
        assert_eq!(codec.max_size(), Ok(257));
    }

    #[test]
    fn test_overflow_policy() {
        // The tag byte does not fit beside the widest alternative
        let codec = Variant::new((U8, Text::new(U32)));
        assert_eq!(codec.type_id(), TypeId::Variant);
        assert_eq!(codec.max_size(), Ok(u32::MAX));
        assert_eq!(
            codec.clone().with_overflow(Overflow::Max).max_size(),
            Ok(u32::MAX)
        );
        assert_eq!(codec.clone().with_overflow(Overflow::Zero).max_size(), Ok(0));

        let codec = codec.with_overflow(Overflow::Raise);
        assert_eq!(codec.max_size(), Err(Error::SizeOverflow("add")));

        // Values are still sized exactly
        assert_eq!(codec.size_of(&OneOf2::B(String::from("ab"))), Ok(1 + 4 + 2));
    }

    #[test]
    fn test_unknown_discriminant() {
        let codec = Variant::new((U8, U16));
        let mut value = OneOf2::A(9);
        let mut buf = Bytes::from_static(&[2, 0, 0]);
        assert_eq!(
            codec.read_into(&mut buf, &mut value),
            Err(Error::UnknownDiscriminant {
                tag: 2,
                alternatives: 2
            })
        );

        // Output untouched
        assert_eq!(value, OneOf2::A(9));
    }

    #[test]
    fn test_switches_alternative() {
        let codec = Variant::new((U8, Text::new(U8)));
        let mut value = OneOf2::A(3);
        let mut buf = Bytes::from_static(&[1, 1, b'z']);
        codec.read_into(&mut buf, &mut value).unwrap();
        assert_eq!(value, OneOf2::B(String::from("z")));

        // Same alternative decodes in place
        let mut buf = Bytes::from_static(&[1, 2, b'x', b'y']);
        codec.read_into(&mut buf, &mut value).unwrap();
        assert_eq!(value, OneOf2::B(String::from("xy")));
    }

    #[test]
    fn test_read_known() {
        let codec = Variant::new((U8, U16));
        let encoded = codec.encode(&OneOf2::B(0x0102)).unwrap();
        let mut value = OneOf2::default();
        codec
            .read_known(&mut encoded.freeze(), 1, &mut value)
            .unwrap();
        assert_eq!(value, OneOf2::B(0x0102));

        let mut buf = Bytes::from_static(&[0, 0]);
        assert!(matches!(
            codec.read_known(&mut buf, 4, &mut value),
            Err(Error::UnknownDiscriminant { tag: 4, .. })
        ));
    }

    #[test]
    fn test_unit_alternatives() {
        let codec = Variant::new((Void, Tuple::new((U8, U8)), Void));
        assert_eq!(codec.buffer_class(), BufferClass::Dynamic);
        assert_eq!(codec.encode(&OneOf3::C(())).unwrap(), &[2][..]);
        assert_eq!(codec.decode(Bytes::from_static(&[0])), Ok(OneOf3::A(())));
    }

    #[test]
    fn test_index() {
        assert_eq!(OneOf4::<u8, u8, u8, u8>::D(0).index(), 3);
        assert_eq!(OneOf8::<u8, u8, u8, u8, u8, u8, u8, u8>::H(0).index(), 7);
        assert_eq!(OneOf1::<u8>::default(), OneOf1::A(0));
    }

    #[test]
    fn test_empty_buffer() {
        let codec = Variant::new((U8,));
        assert!(matches!(codec.decode(Bytes::new()), Err(Error::EndOfBuffer)));
    }
}
