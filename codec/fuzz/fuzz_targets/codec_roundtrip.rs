#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use serdes_codec::{
    field,
    primitives::{
        BOOL, CHAR, F32, F64_BE, I128, I16_BE, I32, I64, I8, U128_BE, U16, U16_BE, U32, U32_BE,
        U64, U64_BE, U8,
    },
    Array, Assoc, Blob, ByteOrder, Codec, OneOf3, Pointer, Sequence, Struct, Text, Tuple, Utf16,
    Utf32, Variant,
};
use std::{
    collections::{BTreeMap, HashSet},
    fmt::Debug,
};

#[derive(Arbitrary, Debug, Default, PartialEq)]
struct Record {
    id: u32,
    label: String,
    weights: Vec<u16>,
    parent: Option<Box<u64>>,
}

#[derive(Arbitrary, Debug)]
enum Choice {
    Small(u8),
    Text(String),
    Large(u64),
}

impl From<Choice> for OneOf3<u8, String, u64> {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Small(v) => OneOf3::A(v),
            Choice::Text(v) => OneOf3::B(v),
            Choice::Large(v) => OneOf3::C(v),
        }
    }
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    // Untrusted input
    Decode(&'a [u8]),

    // Primitives
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Bool(bool),
    Char(char),
    F32(f32),
    F64(f64),

    // Strings
    Text(String),
    Utf16(String),
    Utf32(String),
    Blob(&'a [u8]),

    // Collections
    Sequence(Vec<u32>),
    Set(HashSet<u64>),
    Array([u16; 8]),
    Map(BTreeMap<u16, String>),

    // Composites
    Tuple(u8, String, i64),
    Variant(Choice),
    Pointer(Option<u32>),
    Record(Record),
}

fn roundtrip<C>(codec: &C, value: &C::Value)
where
    C: Codec,
    C::Value: Default + Debug + PartialEq,
{
    // Values too long for their size fields cannot be encoded
    let Ok(size) = codec.size_of(value) else {
        return;
    };
    let encoded = codec.encode(value).expect("Failed to encode a sized input!");
    assert_eq!(encoded.len(), size as usize);

    let max = codec.max_size().expect("Bounds saturate by default");
    assert!(size <= max);
    if codec.buffer_class().is_static() {
        assert_eq!(size, max);
    }

    let decoded = codec
        .decode(encoded)
        .expect("Failed to decode a successfully encoded input!");
    assert_eq!(value, &decoded);
}

fn roundtrip_float<C, F>(codec: &C, value: F, bits: impl Fn(F) -> u64)
where
    C: Codec<Value = F>,
    F: Copy + Default,
{
    let encoded = codec.encode(&value).expect("Failed to encode a float!");
    let decoded = codec.decode(encoded).expect("Failed to decode a float!");
    assert_eq!(bits(value), bits(decoded));
}

fn record() -> impl Codec<Value = Record> {
    Struct::new((
        field!(Record, id, U32_BE),
        field!(Record, label, Text::new(U8)),
        field!(Record, weights, Sequence::new(U16, U16_BE)),
        field!(Record, parent, Pointer::new(U64)),
    ))
}

fn decode_untrusted(data: &[u8]) {
    let codec = Tuple::new((
        Variant::new((U8, Text::new(U16), U64)),
        Sequence::new(U8, record()).with_limit(..=64),
        Assoc::new(U8, U32, Blob::new(U8)),
    ));
    let _ = codec.decode(Bytes::copy_from_slice(data));
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Decode(data) => decode_untrusted(data),
        // Primitives
        FuzzInput::U8(v) => roundtrip(&U8, &v),
        FuzzInput::U16(v) => roundtrip(&U16, &v),
        FuzzInput::U32(v) => roundtrip(&U32, &v),
        FuzzInput::U64(v) => roundtrip(&U64_BE, &v),
        FuzzInput::U128(v) => roundtrip(&U128_BE, &v),
        FuzzInput::I8(v) => roundtrip(&I8, &v),
        FuzzInput::I16(v) => roundtrip(&I16_BE, &v),
        FuzzInput::I32(v) => roundtrip(&I32, &v),
        FuzzInput::I64(v) => roundtrip(&I64, &v),
        FuzzInput::I128(v) => roundtrip(&I128, &v),
        FuzzInput::Bool(v) => roundtrip(&BOOL, &v),
        FuzzInput::Char(v) => roundtrip(&CHAR, &v),
        FuzzInput::F32(v) => roundtrip_float(&F32, v, |f| u64::from(f.to_bits())),
        FuzzInput::F64(v) => roundtrip_float(&F64_BE, v, f64::to_bits),
        // Strings
        FuzzInput::Text(v) => roundtrip(&Text::new(U16), &v),
        FuzzInput::Utf16(v) => roundtrip(&Utf16::new(U16, ByteOrder::Big), &v),
        FuzzInput::Utf32(v) => roundtrip(&Utf32::new(U32, ByteOrder::Little), &v),
        FuzzInput::Blob(v) => roundtrip(&Blob::new(U8), &Bytes::copy_from_slice(v)),
        // Collections
        FuzzInput::Sequence(v) => roundtrip(&Sequence::new(U8, U32), &v),
        FuzzInput::Set(v) => roundtrip(
            &Sequence::<_, _, HashSet<u64>>::with_container(U16, U64),
            &v,
        ),
        FuzzInput::Array(v) => roundtrip(&Array::<_, 8>::new(U16_BE), &v),
        FuzzInput::Map(v) => roundtrip(&Assoc::new(U16, U16, Text::new(U8)), &v),
        // Composites
        FuzzInput::Tuple(a, b, c) => {
            roundtrip(&Tuple::new((U8, Text::new(U32), I64)), &(a, b, c))
        }
        FuzzInput::Variant(v) => {
            roundtrip(&Variant::new((U8, Text::new(U8), U64)), &v.into())
        }
        FuzzInput::Pointer(v) => roundtrip(&Pointer::new(U32), &v.map(Box::new)),
        FuzzInput::Record(v) => roundtrip(&record(), &v),
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
