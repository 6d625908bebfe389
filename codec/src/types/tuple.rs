//! Codec for heterogeneous records.
//!
//! A [Tuple] holds an ordered list of child codecs, written as a Rust tuple. The value is the
//! tuple of the children's values, and each child is encoded in declaration order directly after
//! the previous one. The order is part of the wire format.

use crate::{math, BufferClass, Codec, Error, Overflow, TypeId};
use bytes::{Buf, BufMut};
use paste::paste;

/// An ordered list of child codecs.
pub trait Children {
    /// Returns [BufferClass::Static] if every child is static.
    fn class(&self) -> BufferClass;

    /// Returns the sum of the children's bounds.
    fn bound(&self, overflow: Overflow) -> Result<u32, Error>;
}

/// Codec for a tuple of values, one per child codec.
#[derive(Clone, Debug)]
pub struct Tuple<L> {
    list: L,
    overflow: Overflow,
    class: BufferClass,
    max: Result<u32, Error>,
}

impl<L: Children> Tuple<L> {
    /// Creates a codec from a tuple of child codecs.
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

    /// Returns the child codecs.
    pub fn children(&self) -> &L {
        &self.list
    }
}

// Tuple implementation
macro_rules! impl_codec_for_tuple {
    ($($index:literal),*) => {
        paste! {
            impl<$( [<C $index>]: Codec ),*> Children for ( $( [<C $index>], )* ) {
                #[inline]
                fn class(&self) -> BufferClass {
                    BufferClass::Static $( .and(self.$index.buffer_class()) )*
                }

                #[allow(unused_variables)]
                fn bound(&self, overflow: Overflow) -> Result<u32, Error> {
                    math::sum([ $( self.$index.max_size(), )* ], overflow)
                }
            }

            impl<$( [<C $index>]: Codec ),*> Codec for Tuple<( $( [<C $index>], )* )> {
                type Value = ( $( [<C $index>]::Value, )* );

                fn type_id(&self) -> TypeId {
                    TypeId::Tuple
                }

                #[inline]
                fn buffer_class(&self) -> BufferClass {
                    self.class
                }

                #[inline]
                fn max_size(&self) -> Result<u32, Error> {
                    self.max.clone()
                }

                #[allow(unused_variables)]
                fn size_of(&self, value: &Self::Value) -> Result<u32, Error> {
                    math::sum([ $( self.list.$index.size_of(&value.$index), )* ], self.overflow)
                }

                #[allow(unused_variables)]
                fn write(&self, value: &Self::Value, buf: &mut impl BufMut) -> Result<(), Error> {
                    $( self.list.$index.write(&value.$index, buf)?; )*
                    Ok(())
                }

                #[allow(unused_variables)]
                fn read_into(
                    &self,
                    buf: &mut impl Buf,
                    value: &mut Self::Value,
                ) -> Result<(), Error> {
                    $( self.list.$index.read_into(buf, &mut value.$index)?; )*
                    Ok(())
                }
            }
        }
    };
}

// Generate implementations for tuple sizes 0 through 12
impl_codec_for_tuple!();
impl_codec_for_tuple!(0);
impl_codec_for_tuple!(0, 1);
impl_codec_for_tuple!(0, 1, 2);
impl_codec_for_tuple!(0, 1, 2, 3);
impl_codec_for_tuple!(0, 1, 2, 3, 4);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);
