//! Codec for maps.
//!
//! A map is encoded exactly like a [crate::Sequence] of key/value tuples: the entry count,
//! then each key followed by its value. Only decoding differs: the map is cleared and every
//! decoded entry is inserted, so a repeated key keeps the last value read.

use crate::{
    container::Table, math, primitives::SizeField, BufferClass, Codec, Error, Overflow, RangeCfg,
    TypeId,
};
use bytes::{Buf, BufMut};
use core::marker::PhantomData;
use std::collections::BTreeMap;

/// Codec for a map of `K::Value` to `V::Value` preceded by its entry count.
#[derive(Debug)]
pub struct Assoc<S, K: Codec, V: Codec, M = BTreeMap<<K as Codec>::Value, <V as Codec>::Value>> {
    size: S,
    key: K,
    val: V,
    overflow: Overflow,
    limit: RangeCfg,
    max: Result<u32, Error>,
    _map: PhantomData<fn() -> M>,
}

impl<S: Clone, K: Codec + Clone, V: Codec + Clone, M> Clone for Assoc<S, K, V, M> {
    fn clone(&self) -> Self {
        Self {
            size: self.size.clone(),
            key: self.key.clone(),
            val: self.val.clone(),
            overflow: self.overflow,
            limit: self.limit,
            max: self.max.clone(),
            _map: PhantomData,
        }
    }
}

impl<S: SizeField, K: Codec, V: Codec> Assoc<S, K, V> {
    /// Creates a codec for a `BTreeMap`.
    pub fn new(size: S, key: K, val: V) -> Self {
        Self::with_map(size, key, val)
    }
}

impl<S: SizeField, K: Codec, V: Codec, M> Assoc<S, K, V, M> {
    /// Creates a codec for entries stored in `M`.
    pub fn with_map(size: S, key: K, val: V) -> Self {
        let overflow = Overflow::default();
        Self {
            max: Self::bound(&key, &val, overflow),
            size,
            key,
            val,
            overflow,
            limit: RangeCfg::default(),
            _map: PhantomData,
        }
    }

    /// Sets the policy used when a size computation overflows.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self.max = Self::bound(&self.key, &self.val, overflow);
        self
    }

    /// Rejects decoded entry counts outside `limit` with [Error::InvalidLength].
    pub fn with_limit(mut self, limit: impl Into<RangeCfg>) -> Self {
        self.limit = limit.into();
        self
    }

    fn bound(key: &K, val: &V, overflow: Overflow) -> Result<u32, Error> {
        let entry = math::add(key.max_size()?, val.max_size()?, overflow)?;
        let entries = math::mul(entry, S::MAX, overflow)?;
        math::add(S::WIDTH, entries, overflow)
    }
}

impl<S, K, V, M> Codec for Assoc<S, K, V, M>
where
    S: SizeField,
    K: Codec,
    V: Codec,
    K::Value: Default,
    V::Value: Default,
    M: Table<Key = K::Value, Val = V::Value>,
{
    type Value = M;

    fn type_id(&self) -> TypeId {
        TypeId::Range
    }

    fn buffer_class(&self) -> BufferClass {
        BufferClass::Dynamic
    }

    fn max_size(&self) -> Result<u32, Error> {
        self.max.clone()
    }

    fn size_of(&self, value: &M) -> Result<u32, Error> {
        let count = S::check(value.count())?;
        let entries = if self
            .key
            .buffer_class()
            .and(self.val.buffer_class())
            .is_static()
        {
            let entry = math::add(self.key.max_size()?, self.val.max_size()?, self.overflow)?;
            math::mul(entry, count, self.overflow)?
        } else {
            math::sum(
                value.entries().map(|(key, val)| {
                    math::add(self.key.size_of(key)?, self.val.size_of(val)?, self.overflow)
                }),
                self.overflow,
            )?
        };
        math::add(S::WIDTH, entries, self.overflow)
    }

    fn write(&self, value: &M, buf: &mut impl BufMut) -> Result<(), Error> {
        self.size.write_count(value.count(), buf)?;
        for (key, val) in value.entries() {
            self.key.write(key, buf)?;
            self.val.write(val, buf)?;
        }
        Ok(())
    }

    fn read_into(&self, buf: &mut impl Buf, value: &mut M) -> Result<(), Error> {
        let count = self.limit.check(self.size.read_count(buf)?)?;
        value.clear();
        for _ in 0..count {
            let key = self.key.read(buf)?;
            let val = self.val.read(buf)?;
            value.insert(key, val);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        primitives::{U16, U32, U64, U8},
        Sequence, Text, Tuple, Void,
    };
    use bytes::Bytes;
    use std::collections::HashMap;

    #[test]
    fn test_map() {
        let codec = Assoc::new(U8, U8, U16);
        assert_eq!(codec.buffer_class(), BufferClass::Dynamic);
        assert_eq!(codec.max_size(), Ok(1 + 3 * 255));

        let value = BTreeMap::from([(2u8, 0x0201u16), (1, 7)]);
        assert_eq!(codec.size_of(&value), Ok(1 + 3 * 2));
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(encoded, &[2, 1, 7, 0, 2, 0x01, 0x02][..]);
        assert_eq!(codec.decode(encoded).unwrap(), value);
    }

    #[test]
    fn test_wire_matches_sequence_of_pairs() {
        let map = Assoc::new(U32, Text::new(U8), U32);
        let seq = Sequence::new(U32, Tuple::new((Text::new(U8), U32)));

        let value = BTreeMap::from([(String::from("a"), 1u32), (String::from("bcd"), 2)]);
        let pairs: Vec<(String, u32)> = value.iter().map(|(k, v)| (k.clone(), *v)).collect();

        assert_eq!(map.size_of(&value), seq.size_of(&pairs));
        assert_eq!(map.max_size(), seq.max_size());
        let encoded = map.encode(&value).unwrap();
        assert_eq!(encoded, seq.encode(&pairs).unwrap());

        // Either codec decodes the other's output
        assert_eq!(seq.decode(encoded.clone()).unwrap(), pairs);
        assert_eq!(map.decode(encoded).unwrap(), value);
    }

    #[test]
    fn test_duplicate_keys_keep_last() {
        let codec = Assoc::new(U8, U8, U8);
        let encoded = Bytes::from_static(&[3, 1, 10, 2, 20, 1, 30]);
        let decoded = codec.decode(encoded).unwrap();
        assert_eq!(decoded, BTreeMap::from([(1, 30), (2, 20)]));
    }

    #[test]
    fn test_decode_clears() {
        let codec = Assoc::new(U8, U8, U8);
        let mut value = BTreeMap::from([(9u8, 9u8)]);
        codec
            .read_into(&mut Bytes::from_static(&[1, 4, 5]), &mut value)
            .unwrap();
        assert_eq!(value, BTreeMap::from([(4, 5)]));
    }

    #[test]
    fn test_hash_map() {
        let codec = Assoc::<_, _, _, HashMap<u16, String>>::with_map(U16, U16, Text::new(U16));
        let value = HashMap::from([(1u16, String::from("one")), (2, String::from("two"))]);
        assert_eq!(codec.size_of(&value), Ok(2 + 2 * (2 + 2 + 3)));
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(codec.decode(encoded).unwrap(), value);
    }

    #[test]
    fn test_max_size_overflow() {
        // 4 + 12 * (2^32 - 1) does not fit in a u32
        let codec = Assoc::new(U32, U32, U64);
        assert_eq!(codec.type_id(), TypeId::Range);
        assert_eq!(codec.max_size(), Ok(u32::MAX));

        let codec = Assoc::new(U32, U32, U64).with_overflow(Overflow::Zero);
        assert_eq!(codec.max_size(), Ok(4));

        let codec = Assoc::new(U32, U32, U64).with_overflow(Overflow::Raise);
        assert_eq!(codec.max_size(), Err(Error::SizeOverflow("mul")));

        // Entries are still sized exactly
        let value = BTreeMap::from([(1u32, 2u64)]);
        assert_eq!(codec.size_of(&value), Ok(4 + 12));
    }

    #[test]
    fn test_limit() {
        let codec = Assoc::new(U8, U8, U8).with_limit(..=1);
        assert_eq!(
            codec.decode(Bytes::from_static(&[1, 4, 5])),
            Ok(BTreeMap::from([(4, 5)]))
        );
        assert_eq!(
            codec.decode(Bytes::from_static(&[2, 4, 5, 6, 7])),
            Err(Error::InvalidLength(2))
        );

        // Entries of no width are only bounded by the limit
        let codec = Assoc::new(U16, Void, Void).with_limit(..=16);
        assert_eq!(
            codec.decode(Bytes::from_static(&[0xFF, 0xFF])),
            Err(Error::InvalidLength(65535))
        );
    }

    #[test]
    fn test_too_many_entries() {
        let codec = Assoc::new(U8, U16, U8);
        let value: BTreeMap<u16, u8> = (0..256).map(|k| (k, 0)).collect();
        assert_eq!(
            codec.size_of(&value),
            Err(Error::SequenceTooLong {
                count: 256,
                max: 255
            })
        );
    }
}
