//! Codecs that adapt user types to existing codecs.
//!
//! - [Struct] encodes an aggregate field by field, each through its own codec. The layout is
//!   the same as a [crate::Tuple] of the field codecs.
//! - [Custom] converts the user type to and from the value of a base codec on every call.

use crate::{math, BufferClass, Codec, Error, Overflow, TypeId};
use bytes::{Buf, BufMut};
use core::{fmt, marker::PhantomData};
use paste::paste;

/// A field of `T` together with the codec for its value.
pub struct Field<T, C: Codec> {
    codec: C,
    get: fn(&T) -> &C::Value,
    get_mut: fn(&mut T) -> &mut C::Value,
}

impl<T, C: Codec> Field<T, C> {
    /// Creates a field from its codec and a pair of accessors.
    pub const fn new(
        codec: C,
        get: fn(&T) -> &C::Value,
        get_mut: fn(&mut T) -> &mut C::Value,
    ) -> Self {
        Self {
            codec,
            get,
            get_mut,
        }
    }
}

impl<T, C: Codec + Clone> Clone for Field<T, C> {
    fn clone(&self) -> Self {
        Self {
            codec: self.codec.clone(),
            get: self.get,
            get_mut: self.get_mut,
        }
    }
}

impl<T, C: Codec + fmt::Debug> fmt::Debug for Field<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

/// Creates a [Field] for `$type.$field` encoded with `$codec`.
///
/// # Example
///
/// ```
/// use serdes_codec::{field, primitives::U16, Codec, Struct};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Port {
///     number: u16,
/// }
///
/// let codec = Struct::new((field!(Port, number, U16),));
/// let encoded = codec.encode(&Port { number: 443 }).unwrap();
/// assert_eq!(codec.decode(encoded).unwrap(), Port { number: 443 });
/// ```
#[macro_export]
macro_rules! field {
    ($type:ty, $field:tt, $codec:expr) => {
        $crate::Field::<$type, _>::new(
            $codec,
            |value: &$type| &value.$field,
            |value: &mut $type| &mut value.$field,
        )
    };
}

/// An ordered list of [Field]s of `T`.
pub trait Fields<T> {
    /// Returns [BufferClass::Static] if every field codec is static.
    fn class(&self) -> BufferClass;

    /// Returns the sum of the field codecs' bounds.
    fn bound(&self, overflow: Overflow) -> Result<u32, Error>;
}

/// Codec for an aggregate, encoded as its fields in order.
#[derive(Clone, Debug)]
pub struct Struct<T, L> {
    fields: L,
    overflow: Overflow,
    class: BufferClass,
    max: Result<u32, Error>,
    _aggregate: PhantomData<fn() -> T>,
}

impl<T, L: Fields<T>> Struct<T, L> {
    /// Creates a codec from a tuple of fields.
    pub fn new(fields: L) -> Self {
        let overflow = Overflow::default();
        Self {
            class: fields.class(),
            max: fields.bound(overflow),
            fields,
            overflow,
            _aggregate: PhantomData,
        }
    }

    /// Sets the policy used when a size computation overflows.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self.max = self.fields.bound(overflow);
        self
    }
}

macro_rules! impl_struct {
    ($($index:literal),+) => {
        paste! {
            impl<T, $( [<C $index>]: Codec ),+> Fields<T> for ( $( Field<T, [<C $index>]>, )+ ) {
                #[inline]
                fn class(&self) -> BufferClass {
                    BufferClass::Static $( .and(self.$index.codec.buffer_class()) )+
                }

                fn bound(&self, overflow: Overflow) -> Result<u32, Error> {
                    math::sum([ $( self.$index.codec.max_size(), )+ ], overflow)
                }
            }

            impl<T, $( [<C $index>]: Codec ),+> Codec
                for Struct<T, ( $( Field<T, [<C $index>]>, )+ )>
            {
                type Value = T;

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

                fn size_of(&self, value: &T) -> Result<u32, Error> {
                    math::sum(
                        [ $(
                            self.fields.$index.codec.size_of((self.fields.$index.get)(value)),
                        )+ ],
                        self.overflow,
                    )
                }

                fn write(&self, value: &T, buf: &mut impl BufMut) -> Result<(), Error> {
                    $( self.fields.$index.codec.write((self.fields.$index.get)(value), buf)?; )+
                    Ok(())
                }

                fn read_into(&self, buf: &mut impl Buf, value: &mut T) -> Result<(), Error> {
                    $(
                        let field = (self.fields.$index.get_mut)(value);
                        self.fields.$index.codec.read_into(buf, field)?;
                    )+
                    Ok(())
                }
            }
        }
    };
}

impl_struct!(0);
impl_struct!(0, 1);
impl_struct!(0, 1, 2);
impl_struct!(0, 1, 2, 3);
impl_struct!(0, 1, 2, 3, 4);
impl_struct!(0, 1, 2, 3, 4, 5);
impl_struct!(0, 1, 2, 3, 4, 5, 6);
impl_struct!(0, 1, 2, 3, 4, 5, 6, 7);
impl_struct!(0, 1, 2, 3, 4, 5, 6, 7, 8);
impl_struct!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
impl_struct!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
impl_struct!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);

/// Codec for `T` through conversions to and from the value of a base codec.
///
/// `into_base` runs on every size and write call; `from_base` runs on every read and may reject
/// the decoded base value.
#[derive(Clone)]
pub struct Custom<T, B, F, G> {
    base: B,
    into_base: F,
    from_base: G,
    _user: PhantomData<fn() -> T>,
}

impl<T, B: fmt::Debug, F, G> fmt::Debug for Custom<T, B, F, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl<T, B, F, G> Custom<T, B, F, G>
where
    B: Codec,
    F: Fn(&T) -> B::Value,
    G: Fn(B::Value) -> Result<T, Error>,
{
    /// Creates a codec from a base codec and a pair of conversions.
    pub fn new(base: B, into_base: F, from_base: G) -> Self {
        Self {
            base,
            into_base,
            from_base,
            _user: PhantomData,
        }
    }
}

impl<T, B, F, G> Codec for Custom<T, B, F, G>
where
    B: Codec,
    B::Value: Default,
    F: Fn(&T) -> B::Value,
    G: Fn(B::Value) -> Result<T, Error>,
{
    type Value = T;

    fn type_id(&self) -> TypeId {
        self.base.type_id()
    }

    fn buffer_class(&self) -> BufferClass {
        self.base.buffer_class()
    }

    fn max_size(&self) -> Result<u32, Error> {
        self.base.max_size()
    }

    fn size_of(&self, value: &T) -> Result<u32, Error> {
        self.base.size_of(&(self.into_base)(value))
    }

    fn write(&self, value: &T, buf: &mut impl BufMut) -> Result<(), Error> {
        self.base.write(&(self.into_base)(value), buf)
    }

    fn read_into(&self, buf: &mut impl Buf, value: &mut T) -> Result<(), Error> {
        let base = self.base.read(buf)?;
        *value = (self.from_base)(base)?;
        Ok(())
    }
}
