//! End-to-end encoding scenarios across composed codecs.

use bytes::{Buf, Bytes, BytesMut};
use chrono::{NaiveDate, NaiveTime};
use serdes_codec::{
    calendar::{DATE, TIME_BE},
    field,
    primitives::{F32, I32, U16, U32, U64, U8},
    Array, Assoc, BufferClass, ByteOrder, Codec, Const, Error, OneOf2, Overflow, Pointer,
    Reference, Sequence, Struct, Text, Tuple, TypeId, Utf16, Variant,
};
use std::collections::BTreeMap;

#[test]
#[allow(clippy::approx_constant)]
fn test_primitives_then_strings() {
    let int = U64;
    let float = F32;
    let strings = Sequence::new(U32, Text::new(U32));

    let words: Vec<String> = ["one", "two", "three"].map(String::from).into();
    let size = int.size_of(&2024).unwrap()
        + float.size_of(&3.14).unwrap()
        + strings.size_of(&words).unwrap();
    assert_eq!(size, 8 + 4 + (4 + (4 + 3) + (4 + 3) + (4 + 5)));

    let mut buf = BytesMut::with_capacity(size as usize);
    int.write(&2024, &mut buf).unwrap();
    float.write(&3.14, &mut buf).unwrap();
    strings.write(&words, &mut buf).unwrap();
    assert_eq!(buf.len(), size as usize);

    let mut buf = buf.freeze();
    assert_eq!(int.read(&mut buf).unwrap(), 2024);
    assert_eq!(float.read(&mut buf).unwrap(), 3.14);
    assert_eq!(strings.read(&mut buf).unwrap(), words);
    assert_eq!(buf.remaining(), 0);
}

#[test]
fn test_fixed_array_from_raw_bytes() {
    let codec = Array::<_, 3>::new(U64);
    let value = [112345678u64, 99999999, 123123123123];

    let encoded = codec.encode(&value).unwrap();
    assert_eq!(encoded.len(), 24);

    // Build the same bytes independently
    let mut raw = Vec::new();
    for v in value {
        raw.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(encoded, &raw[..]);
    assert_eq!(codec.decode(Bytes::from(raw)).unwrap(), value);
}

#[test]
fn test_string_and_integer_tuple() {
    let codec = Tuple::new((Text::new(U32), U64));
    let value = (String::from("Hello World!"), 2025u64);
    let size = codec.size_of(&value).unwrap();
    assert_eq!(size, 24);

    let encoded = codec.encode(&value).unwrap();
    assert_eq!(encoded.len(), size as usize);
    assert_eq!(codec.decode(encoded).unwrap(), value);
}

#[test]
fn test_variant_string_alternative() {
    let codec = Variant::new((U8, Text::new(U32)));
    let value = OneOf2::B(String::from("ab"));
    let encoded = codec.encode(&value).unwrap();
    assert_eq!(encoded, &[1, 2, 0, 0, 0, b'a', b'b'][..]);

    let decoded = codec.decode(encoded).unwrap();
    assert!(matches!(&decoded, OneOf2::B(s) if s == "ab"));
}

#[test]
fn test_pointer_null_and_present() {
    let codec = Pointer::new(I32);

    let null = codec.encode(&None).unwrap();
    assert_eq!(null, &[0][..]);
    let present = codec.encode(&Some(Box::new(42))).unwrap();
    assert_eq!(present, &[1, 42, 0, 0, 0][..]);

    assert_eq!(codec.decode(null).unwrap(), None);
    assert_eq!(codec.decode(present).unwrap(), Some(Box::new(42)));
}

#[test]
fn test_tuple_order_changes_layout() {
    let a = Tuple::new((U8, U32));
    let b = Tuple::new((U32, U8));
    let left = a.encode(&(0xAA, 0x11223344)).unwrap();
    let right = b.encode(&(0x11223344, 0xAA)).unwrap();
    assert_eq!(left.len(), right.len());
    assert_ne!(left, right);
}

#[test]
fn test_sequence_bound_saturates() {
    let codec = Sequence::new(U32, U64);
    assert_eq!(codec.max_size(), Ok(u32::MAX));

    let codec = Sequence::new(U32, U64).with_overflow(Overflow::Raise);
    assert!(matches!(codec.max_size(), Err(Error::SizeOverflow(_))));

    let codec = Sequence::new(U32, U64).with_overflow(Overflow::Min);
    assert_eq!(codec.max_size(), Ok(0));
}

#[test]
fn test_map_wire_equals_pair_sequence() {
    let map = Assoc::new(U8, U32, Text::new(U8));
    let pairs = Sequence::new(U8, Tuple::new((U32, Text::new(U8))));

    let value = BTreeMap::from([(3u32, String::from("c")), (1, String::from("a"))]);
    let as_pairs: Vec<(u32, String)> = value.clone().into_iter().collect();
    assert_eq!(
        map.encode(&value).unwrap(),
        pairs.encode(&as_pairs).unwrap()
    );
}

#[test]
fn test_nullable_asymmetry() {
    let pointer = Pointer::new(U64);
    let reference = Reference::new(U64);

    assert_eq!(pointer.size_of(&None), Ok(1));
    assert_eq!(pointer.size_of(&Some(Box::new(1))), Ok(9));
    assert_eq!(reference.size_of(&Box::new(1)), Ok(8));
    assert_eq!(pointer.buffer_class(), BufferClass::Dynamic);
    assert_eq!(reference.buffer_class(), BufferClass::Static);

    let rejecting = Reference::<_, Option<Box<u64>>, _>::with_hook(U64, serdes_codec::IfNull);
    assert_eq!(rejecting.size_of(&None), Err(Error::NullRequired));
}

#[derive(Debug, Default, PartialEq)]
struct Header {
    version: u8,
    length: u32,
    flags: Vec<u8>,
}

#[test]
fn test_struct_with_constant_version() {
    let codec = Struct::new((
        field!(Header, version, Const::new(2u8)),
        field!(Header, length, U32),
        field!(Header, flags, Sequence::new(U8, U8)),
    ));

    // The version is never written
    let header = Header {
        version: 9,
        length: 5,
        flags: vec![1, 2],
    };
    let encoded = codec.encode(&header).unwrap();
    assert_eq!(encoded, &[5, 0, 0, 0, 2, 1, 2][..]);

    // Decoding restores the constant
    let decoded = codec.decode(encoded).unwrap();
    assert_eq!(
        decoded,
        Header {
            version: 2,
            length: 5,
            flags: vec![1, 2],
        }
    );
}

#[test]
fn test_shared_codec_across_threads() {
    let codec = std::sync::Arc::new(Sequence::new(U8, Text::new(U8)));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let codec = codec.clone();
            std::thread::spawn(move || {
                let value = vec![format!("thread-{i}"); i + 1];
                let encoded = codec.encode(&value).unwrap();
                assert_eq!(codec.decode(encoded).unwrap(), value);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[derive(Debug, Default, PartialEq)]
struct Appointment {
    day: NaiveDate,
    at: NaiveTime,
    title: String,
    notes: Option<Box<String>>,
}

#[test]
fn test_calendar_record() {
    let codec = Struct::new((
        field!(Appointment, day, DATE),
        field!(Appointment, at, TIME_BE),
        field!(Appointment, title, Utf16::new(U16, ByteOrder::Little)),
        field!(Appointment, notes, Pointer::new(Text::new(U8))),
    ));
    assert_eq!(codec.type_id(), TypeId::Tuple);
    assert_eq!(codec.buffer_class(), BufferClass::Dynamic);

    let value = Appointment {
        day: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        at: NaiveTime::from_hms_milli_opt(9, 30, 0, 250).unwrap(),
        title: String::from("Démo"),
        notes: Some(Box::new(String::from("bring ID"))),
    };
    assert_eq!(codec.size_of(&value), Ok(4 + 4 + (2 + 2 * 4) + (1 + 1 + 8)));

    let encoded = codec.encode(&value).unwrap();
    assert_eq!(&encoded[..4], &[0xE8, 0x07, 2, 29][..]);
    let millis: u32 = (9 * 3600 + 30 * 60) * 1000 + 250;
    assert_eq!(&encoded[4..8], &millis.to_be_bytes()[..]);
    assert_eq!(&encoded[8..12], &[4, 0, b'D', 0][..]);
    assert_eq!(codec.decode(encoded).unwrap(), value);
}

#[test]
fn test_type_ids_follow_structure() {
    assert_eq!(U8.type_id(), TypeId::Pod);
    assert_eq!(Text::new(U8).type_id(), TypeId::Range);
    assert_eq!(Sequence::new(U8, U8).type_id(), TypeId::Range);
    assert_eq!(Array::<_, 2>::new(U8).type_id(), TypeId::Array);
    assert_eq!(Tuple::new((U8, U8)).type_id(), TypeId::Tuple);
    assert_eq!(Variant::new((U8, U16)).type_id(), TypeId::Variant);
    assert_eq!(Pointer::new(U8).type_id(), TypeId::Variant);
    assert_eq!(Const::new(1u8).type_id(), TypeId::Const);

    // Wrappers report what they wrap
    assert_eq!(Reference::new(Text::new(U8)).type_id(), TypeId::Range);
    assert_eq!(
        Reference::new(Sequence::new(U8, U8)).type_id(),
        TypeId::Range
    );
}
