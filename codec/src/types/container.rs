//! Containers that homogeneous codecs read from and write into.
//!
//! Encoding only needs a [Source] (a count and an iteration order). Decoding fills a [Sink],
//! which decides how decoded elements land in the container:
//! - Growable sequences (`Vec`, `VecDeque`, `LinkedList`) are resized to the decoded count and
//!   overwritten positionally, reusing existing elements.
//! - Fixed arrays are overwritten positionally and must be at least as long as the count.
//! - Sets are cleared and each decoded element is inserted in the order read.
//!
//! Maps are handled separately by [Table], since their entries are split into a key and a value.

use crate::Error;
use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque},
    hash::{BuildHasher, Hash},
};

/// A container whose elements can be encoded.
pub trait Source {
    /// The element type.
    type Item;

    /// Returns the number of elements.
    fn count(&self) -> usize;

    /// Iterates over the elements in wire order.
    fn items(&self) -> impl Iterator<Item = &Self::Item>;
}

/// A container that decoded elements can be written into.
pub trait Sink: Source {
    /// Makes the container hold exactly `count` elements, each populated by `read` in order.
    ///
    /// Stops at the first error, in which case the container holds an unspecified prefix.
    fn fill<F>(&mut self, count: usize, read: F) -> Result<(), Error>
    where
        F: FnMut(&mut Self::Item) -> Result<(), Error>;
}

/// A map whose entries can be encoded and decoded.
pub trait Table {
    /// The key type.
    type Key;

    /// The value type.
    type Val;

    /// Returns the number of entries.
    fn count(&self) -> usize;

    /// Iterates over the entries in wire order.
    fn entries(&self) -> impl Iterator<Item = (&Self::Key, &Self::Val)>;

    /// Removes all entries.
    fn clear(&mut self);

    /// Inserts an entry, replacing any entry with an equal key.
    fn insert(&mut self, key: Self::Key, val: Self::Val);
}

// Growable sequences: overwrite what is there, then append until `count` is reached
macro_rules! impl_growable {
    ($container:ident, $push:ident) => {
        impl<T> Source for $container<T> {
            type Item = T;

            #[inline]
            fn count(&self) -> usize {
                self.len()
            }

            #[inline]
            fn items(&self) -> impl Iterator<Item = &T> {
                self.iter()
            }
        }

        impl<T: Default> Sink for $container<T> {
            fn fill<F>(&mut self, count: usize, mut read: F) -> Result<(), Error>
            where
                F: FnMut(&mut T) -> Result<(), Error>,
            {
                while self.len() > count {
                    self.pop_back_item();
                }
                for item in self.iter_mut() {
                    read(item)?;
                }

                // No reservation up front: the count is unchecked unless the codec has a limit
                while self.len() < count {
                    let mut item = T::default();
                    read(&mut item)?;
                    self.$push(item);
                }
                Ok(())
            }
        }
    };
}

/// Removes the last element of a growable sequence.
trait PopBack {
    fn pop_back_item(&mut self);
}

impl<T> PopBack for Vec<T> {
    fn pop_back_item(&mut self) {
        self.pop();
    }
}

impl<T> PopBack for VecDeque<T> {
    fn pop_back_item(&mut self) {
        self.pop_back();
    }
}

impl<T> PopBack for LinkedList<T> {
    fn pop_back_item(&mut self) {
        self.pop_back();
    }
}

impl_growable!(Vec, push);
impl_growable!(VecDeque, push_back);
impl_growable!(LinkedList, push_back);

impl<T, const N: usize> Source for [T; N] {
    type Item = T;

    #[inline]
    fn count(&self) -> usize {
        N
    }

    #[inline]
    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }
}

impl<T, const N: usize> Sink for [T; N] {
    fn fill<F>(&mut self, count: usize, mut read: F) -> Result<(), Error>
    where
        F: FnMut(&mut T) -> Result<(), Error>,
    {
        if count > N {
            return Err(Error::CapacityMismatch {
                needed: count,
                capacity: N,
            });
        }
        for item in self.iter_mut().take(count) {
            read(item)?;
        }
        Ok(())
    }
}

impl<T: Ord> Source for BTreeSet<T> {
    type Item = T;

    #[inline]
    fn count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }
}

impl<T: Ord + Default> Sink for BTreeSet<T> {
    fn fill<F>(&mut self, count: usize, mut read: F) -> Result<(), Error>
    where
        F: FnMut(&mut T) -> Result<(), Error>,
    {
        self.clear();
        for _ in 0..count {
            let mut item = T::default();
            read(&mut item)?;
            self.insert(item);
        }
        Ok(())
    }
}

impl<T: Eq + Hash, H: BuildHasher> Source for HashSet<T, H> {
    type Item = T;

    #[inline]
    fn count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }
}

impl<T: Eq + Hash + Default, H: BuildHasher> Sink for HashSet<T, H> {
    fn fill<F>(&mut self, count: usize, mut read: F) -> Result<(), Error>
    where
        F: FnMut(&mut T) -> Result<(), Error>,
    {
        self.clear();
        for _ in 0..count {
            let mut item = T::default();
            read(&mut item)?;
            self.insert(item);
        }
        Ok(())
    }
}

impl<K: Ord, V> Table for BTreeMap<K, V> {
    type Key = K;
    type Val = V;

    #[inline]
    fn count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }

    #[inline]
    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    #[inline]
    fn insert(&mut self, key: K, val: V) {
        BTreeMap::insert(self, key, val);
    }
}

impl<K: Eq + Hash, V, H: BuildHasher> Table for HashMap<K, V, H> {
    type Key = K;
    type Val = V;

    #[inline]
    fn count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }

    #[inline]
    fn clear(&mut self) {
        HashMap::clear(self);
    }

    #[inline]
    fn insert(&mut self, key: K, val: V) {
        HashMap::insert(self, key, val);
    }
}
