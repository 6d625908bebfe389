//! Codecs for values behind a pointer.
//!
//! # Handles
//!
//! A [Handle] is anything that may own a heap value: `Box`, `Rc` and `Arc`, which always point
//! somewhere, and their `Option` forms, which may be null ([Nullable]). Shared handles are
//! decoded through `make_mut`, so a value shared with another handle is cloned before it is
//! overwritten.
//!
//! # Allocation
//!
//! Before a present value is decoded, an [Allocate] hook prepares the handle. The default,
//! [IfNull], allocates only when the handle is null, so an existing allocation is reused. If
//! the hook leaves the handle null, decoding fails with [Error::Unallocated].

use crate::{math, util::at_least, BufferClass, Codec, Error, Overflow, TypeId};
use bytes::{Buf, BufMut};
use core::marker::PhantomData;
use std::{rc::Rc, sync::Arc};
use tracing::debug;

/// An owning pointer to a value.
pub trait Handle {
    /// The type pointed to.
    type Target;

    /// Returns the value pointed to, if any.
    fn target(&self) -> Option<&Self::Target>;

    /// Returns the value pointed to for writing, if any.
    fn target_mut(&mut self) -> Option<&mut Self::Target>;

    /// Points the handle at a new default value, releasing the previous one.
    fn allocate(&mut self)
    where
        Self::Target: Default;
}

/// A [Handle] that may be null.
pub trait Nullable: Handle {
    /// Makes the handle null, releasing the value pointed to.
    fn clear(&mut self);
}

impl<T> Handle for Box<T> {
    type Target = T;

    fn target(&self) -> Option<&T> {
        Some(&**self)
    }

    fn target_mut(&mut self) -> Option<&mut T> {
        Some(&mut **self)
    }

    fn allocate(&mut self)
    where
        T: Default,
    {
        *self = Box::default();
    }
}

impl<T> Handle for Option<Box<T>> {
    type Target = T;

    fn target(&self) -> Option<&T> {
        self.as_deref()
    }

    fn target_mut(&mut self) -> Option<&mut T> {
        self.as_deref_mut()
    }

    fn allocate(&mut self)
    where
        T: Default,
    {
        *self = Some(Box::default());
    }
}

impl<T> Nullable for Option<Box<T>> {
    fn clear(&mut self) {
        *self = None;
    }
}

// Shared handles are written through `make_mut`
macro_rules! impl_shared {
    ($handle:ident) => {
        impl<T: Clone> Handle for $handle<T> {
            type Target = T;

            fn target(&self) -> Option<&T> {
                Some(&**self)
            }

            fn target_mut(&mut self) -> Option<&mut T> {
                Some($handle::make_mut(self))
            }

            fn allocate(&mut self)
            where
                T: Default,
            {
                *self = $handle::default();
            }
        }

        impl<T: Clone> Handle for Option<$handle<T>> {
            type Target = T;

            fn target(&self) -> Option<&T> {
                self.as_deref()
            }

            fn target_mut(&mut self) -> Option<&mut T> {
                self.as_mut().map($handle::make_mut)
            }

            fn allocate(&mut self)
            where
                T: Default,
            {
                *self = Some($handle::default());
            }
        }

        impl<T: Clone> Nullable for Option<$handle<T>> {
            fn clear(&mut self) {
                *self = None;
            }
        }
    };
}

impl_shared!(Rc);
impl_shared!(Arc);

/// Prepares a handle before a value is decoded into it.
pub trait Allocate<P> {
    /// Prepares `handle` so that it points at storage for the decoded value.
    fn prepare(&self, handle: &mut P);
}

/// Allocates only if the handle is null.
#[derive(Clone, Copy, Debug, Default)]
pub struct IfNull;

impl<P: Handle> Allocate<P> for IfNull
where
    P::Target: Default,
{
    fn prepare(&self, handle: &mut P) {
        if handle.target().is_none() {
            handle.allocate();
        }
    }
}

/// Always allocates, replacing any existing value.
#[derive(Clone, Copy, Debug, Default)]
pub struct Always;

impl<P: Handle> Allocate<P> for Always
where
    P::Target: Default,
{
    fn prepare(&self, handle: &mut P) {
        handle.allocate();
    }
}

/// Never allocates. Decoding into a null handle fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct Never;

impl<P> Allocate<P> for Never {
    fn prepare(&self, _: &mut P) {}
}

/// Releases any existing value, then allocates.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reallocate;

impl<P: Nullable> Allocate<P> for Reallocate
where
    P::Target: Default,
{
    fn prepare(&self, handle: &mut P) {
        handle.clear();
        handle.allocate();
    }
}

/// A user supplied allocation hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hook<F>(pub F);

impl<P, F: Fn(&mut P)> Allocate<P> for Hook<F> {
    fn prepare(&self, handle: &mut P) {
        (self.0)(handle)
    }
}

fn unallocated() -> Error {
    debug!("allocation hook left the handle null");
    Error::Unallocated
}

/// Codec for a nullable handle, preceded by a presence byte.
///
/// A null handle is written as a single `0`. Otherwise a `1` is written, followed by the value.
#[derive(Debug)]
pub struct Pointer<C: Codec, P = Option<Box<<C as Codec>::Value>>, H = IfNull> {
    child: C,
    hook: H,
    overflow: Overflow,
    max: Result<u32, Error>,
    _handle: PhantomData<fn() -> P>,
}

impl<C: Codec + Clone, P, H: Clone> Clone for Pointer<C, P, H> {
    fn clone(&self) -> Self {
        Self {
            child: self.child.clone(),
            hook: self.hook.clone(),
            overflow: self.overflow,
            max: self.max.clone(),
            _handle: PhantomData,
        }
    }
}

impl<C: Codec> Pointer<C> {
    /// Creates a codec for `Option<Box<C::Value>>` that allocates only when null.
    pub fn new(child: C) -> Self {
        Self::with_hook(child, IfNull)
    }
}

impl<C: Codec, P, H> Pointer<C, P, H> {
    /// Creates a codec for the handle `P`, prepared before decoding with `hook`.
    pub fn with_hook(child: C, hook: H) -> Self {
        let overflow = Overflow::default();
        Self {
            max: Self::bound(&child, overflow),
            child,
            hook,
            overflow,
            _handle: PhantomData,
        }
    }

    /// Sets the policy used when a size computation overflows.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self.max = Self::bound(&self.child, overflow);
        self
    }

    fn bound(child: &C, overflow: Overflow) -> Result<u32, Error> {
        math::add(child.max_size()?, 1, overflow)
    }
}

impl<C, P, H> Codec for Pointer<C, P, H>
where
    C: Codec,
    P: Nullable<Target = C::Value>,
    H: Allocate<P>,
{
    type Value = P;

    fn type_id(&self) -> TypeId {
        TypeId::Variant
    }

    fn buffer_class(&self) -> BufferClass {
        BufferClass::Dynamic
    }

    fn max_size(&self) -> Result<u32, Error> {
        self.max.clone()
    }

    fn size_of(&self, value: &P) -> Result<u32, Error> {
        match value.target() {
            None => Ok(1),
            Some(target) => math::add(self.child.size_of(target)?, 1, self.overflow),
        }
    }

    fn write(&self, value: &P, buf: &mut impl BufMut) -> Result<(), Error> {
        match value.target() {
            None => {
                buf.put_u8(0);
                Ok(())
            }
            Some(target) => {
                buf.put_u8(1);
                self.child.write(target, buf)
            }
        }
    }

    fn read_into(&self, buf: &mut impl Buf, value: &mut P) -> Result<(), Error> {
        at_least(buf, 1)?;
        match buf.get_u8() {
            0 => {
                value.clear();
                Ok(())
            }
            1 => {
                self.hook.prepare(value);
                let target = value.target_mut().ok_or_else(unallocated)?;
                self.child.read_into(buf, target)
            }
            _ => Err(Error::InvalidBool),
        }
    }
}

/// Codec for a handle that must not be null.
///
/// The encoding is exactly the child's: no presence byte is written. Sizing or writing a null
/// handle fails with [Error::NullRequired].
#[derive(Debug)]
pub struct Reference<C: Codec, P = Box<<C as Codec>::Value>, H = IfNull> {
    child: C,
    hook: H,
    _handle: PhantomData<fn() -> P>,
}

impl<C: Codec + Clone, P, H: Clone> Clone for Reference<C, P, H> {
    fn clone(&self) -> Self {
        Self {
            child: self.child.clone(),
            hook: self.hook.clone(),
            _handle: PhantomData,
        }
    }
}

impl<C: Codec> Reference<C> {
    /// Creates a codec for `Box<C::Value>`.
    pub fn new(child: C) -> Self {
        Self::with_hook(child, IfNull)
    }
}

impl<C: Codec, P, H> Reference<C, P, H> {
    /// Creates a codec for the handle `P`, prepared before decoding with `hook`.
    pub fn with_hook(child: C, hook: H) -> Self {
        Self {
            child,
            hook,
            _handle: PhantomData,
        }
    }
}

impl<C, P, H> Reference<C, P, H>
where
    C: Codec,
    P: Handle,
{
    fn require(value: &P) -> Result<&P::Target, Error> {
        value.target().ok_or_else(|| {
            debug!("null value given to a reference codec");
            Error::NullRequired
        })
    }
}

impl<C, P, H> Codec for Reference<C, P, H>
where
    C: Codec,
    P: Handle<Target = C::Value>,
    H: Allocate<P>,
{
    type Value = P;

    fn type_id(&self) -> TypeId {
        self.child.type_id()
    }

    fn buffer_class(&self) -> BufferClass {
        self.child.buffer_class()
    }

    fn max_size(&self) -> Result<u32, Error> {
        self.child.max_size()
    }

    fn size_of(&self, value: &P) -> Result<u32, Error> {
        self.child.size_of(Self::require(value)?)
    }

    fn write(&self, value: &P, buf: &mut impl BufMut) -> Result<(), Error> {
        self.child.write(Self::require(value)?, buf)
    }

    fn read_into(&self, buf: &mut impl Buf, value: &mut P) -> Result<(), Error> {
        self.hook.prepare(value);
        let target = value.target_mut().ok_or_else(unallocated)?;
        self.child.read_into(buf, target)
    }
}
