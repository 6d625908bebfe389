//! Codec for a length-prefixed run of homogeneous elements.
//!
//! The element count is written first using a [SizeField] (1, 2 or 4 bytes), followed by each
//! element in iteration order. Because the count is part of the encoding, the class is always
//! [BufferClass::Dynamic] and [Codec::max_size] assumes the largest count the field can hold.

use crate::{
    container::{Sink, Source},
    math,
    primitives::SizeField,
    BufferClass, Codec, Error, Overflow, RangeCfg, TypeId,
};
use bytes::{Buf, BufMut};
use core::marker::PhantomData;

/// Codec for a variable number of elements preceded by their count.
#[derive(Debug)]
pub struct Sequence<S, E: Codec, T = Vec<<E as Codec>::Value>> {
    size: S,
    elem: E,
    overflow: Overflow,
    limit: RangeCfg,
    max: Result<u32, Error>,
    _container: PhantomData<fn() -> T>,
}

impl<S: Clone, E: Codec + Clone, T> Clone for Sequence<S, E, T> {
    fn clone(&self) -> Self {
        Self {
            size: self.size.clone(),
            elem: self.elem.clone(),
            overflow: self.overflow,
            limit: self.limit,
            max: self.max.clone(),
            _container: PhantomData,
        }
    }
}

impl<S: SizeField, E: Codec> Sequence<S, E> {
    /// Creates a codec for `Vec<E::Value>`.
    pub fn new(size: S, elem: E) -> Self {
        Self::with_container(size, elem)
    }
}

impl<S: SizeField, E: Codec, T> Sequence<S, E, T> {
    /// Creates a codec for elements stored in `T`.
    pub fn with_container(size: S, elem: E) -> Self {
        let overflow = Overflow::default();
        Self {
            max: Self::bound(&elem, overflow),
            size,
            elem,
            overflow,
            limit: RangeCfg::default(),
            _container: PhantomData,
        }
    }

    /// Sets the policy used when a size computation overflows.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self.max = Self::bound(&self.elem, overflow);
        self
    }

    /// Rejects decoded counts outside `limit` with [Error::InvalidLength].
    ///
    /// The count is otherwise only bounded by the field width, and elements that occupy no
    /// bytes are never checked against the input length.
    pub fn with_limit(mut self, limit: impl Into<RangeCfg>) -> Self {
        self.limit = limit.into();
        self
    }

    /// Returns the element codec.
    pub fn elem(&self) -> &E {
        &self.elem
    }

    fn bound(elem: &E, overflow: Overflow) -> Result<u32, Error> {
        let elems = math::mul(elem.max_size()?, S::MAX, overflow)?;
        math::add(S::WIDTH, elems, overflow)
    }
}

impl<S, E, T> Codec for Sequence<S, E, T>
where
    S: SizeField,
    E: Codec,
    T: Sink<Item = E::Value>,
{
    type Value = T;

    fn type_id(&self) -> TypeId {
        TypeId::Range
    }

    fn buffer_class(&self) -> BufferClass {
        BufferClass::Dynamic
    }

    fn max_size(&self) -> Result<u32, Error> {
        self.max.clone()
    }

    fn size_of(&self, value: &T) -> Result<u32, Error> {
        let count = S::check(value.count())?;
        let elems = if self.elem.buffer_class().is_static() {
            math::mul(self.elem.max_size()?, count, self.overflow)?
        } else {
            math::sum(
                value.items().map(|item| self.elem.size_of(item)),
                self.overflow,
            )?
        };
        math::add(S::WIDTH, elems, self.overflow)
    }

    fn write(&self, value: &T, buf: &mut impl BufMut) -> Result<(), Error> {
        self.size.write_count(value.count(), buf)?;
        for item in value.items() {
            self.elem.write(item, buf)?;
        }
        Ok(())
    }

    fn read_into(&self, buf: &mut impl Buf, value: &mut T) -> Result<(), Error> {
        let count = self.limit.check(self.size.read_count(buf)?)?;
        value.fill(count, |item| self.elem.read_into(buf, item))
    }
}
