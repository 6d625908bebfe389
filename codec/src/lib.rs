//! Serialize structured data with composable codecs.
//!
//! # Overview
//!
//! A binary serialization library in which the wire format of a type is described by a value:
//! a [Codec]. Codecs are small, immutable descriptions built once (usually from other codecs)
//! and then used to size, encode and decode any number of values.
//!
//! Every codec answers four questions:
//! - [Codec::buffer_class]: is the encoded size the same for every value?
//! - [Codec::max_size]: how large can an encoding be?
//! - [Codec::size_of]: how large is the encoding of this value?
//! - [Codec::write] / [Codec::read_into]: encode a value, or decode one in place.
//!
//! Each codec also reports its structural kind as a [TypeId], and each [Pod] the [PodId] of its
//! value type.
//!
//! Sizes are `u32`. Composite codecs accumulate them with the overflow-safe arithmetic in
//! [math], resolving an overflow with the [Overflow] policy chosen when the codec was built.
//!
//! # Supported Layouts
//!
//! - Primitives: [Pod] codecs for integers, floats, `bool`, `char` and [Char16] in either byte
//!   order, plus the date and time types in [calendar]
//! - Constants: [Const] and [Void], which occupy no bytes
//! - Homogeneous collections: [Array] (fixed count), [Sequence] (count prefixed), [Assoc] (maps),
//!   and the [Text], [Utf16], [Utf32] and [Blob] strings
//! - Heterogeneous records and unions: [Tuple] and [Variant]
//! - Indirection: [Pointer] (nullable, with a presence byte) and [Reference] (never null)
//! - User types: [Struct] (field by field) and [Custom] (through conversions)
//!
//! There is no padding, alignment, or self-description anywhere: the layout of every value is
//! the concatenation of the layouts of its parts.
//!
//! # Example
//!
//! ```
//! use serdes_codec::{
//!     field,
//!     primitives::{U16, U32, U64, U8},
//!     Codec, Pointer, Sequence, Struct, Text,
//! };
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Item {
//!     id: u64,
//!     tags: Vec<String>,
//!     parent: Option<Box<u32>>,
//! }
//!
//! let codec = Struct::new((
//!     field!(Item, id, U64),
//!     field!(Item, tags, Sequence::new(U8, Text::new(U16))),
//!     field!(Item, parent, Pointer::new(U32)),
//! ));
//!
//! let item = Item {
//!     id: 2024,
//!     tags: vec!["a".into(), "bc".into()],
//!     parent: None,
//! };
//! assert_eq!(codec.size_of(&item), Ok(8 + (1 + 3 + 4) + 1));
//!
//! let encoded = codec.encode(&item).unwrap();
//! assert_eq!(codec.decode(encoded).unwrap(), item);
//! ```
//!
//! # Example (Tagged Union)
//!
//! ```
//! use serdes_codec::{primitives::{U32, U8}, Codec, OneOf2, Text, Variant};
//!
//! let codec = Variant::new((U8, Text::new(U32)));
//! let encoded = codec.encode(&OneOf2::B("ab".to_string())).unwrap();
//! assert_eq!(encoded, &[1, 2, 0, 0, 0, b'a', b'b'][..]);
//! assert_eq!(codec.decode(encoded).unwrap(), OneOf2::B("ab".to_string()));
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod math;
pub mod types;
pub mod util;

// Re-export main types and traits
pub use codec::{BufferClass, Codec, TypeId};
pub use config::{ByteOrder, Overflow, RangeCfg};
pub use error::Error;
pub use types::{
    adapter::{Custom, Field, Fields, Struct},
    array::Array,
    assoc::Assoc,
    bytes::{Blob, Text, Utf16, Utf32},
    calendar,
    constant::{Const, Void},
    container,
    pointer::{
        Allocate, Always, Handle, Hook, IfNull, Never, Nullable, Pointer, Reallocate, Reference,
    },
    primitives,
    primitives::{Char16, Pod, PodId, Scalar, SizeField},
    sequence::Sequence,
    tuple::{Children, Tuple},
    variant::{
        Alternatives, OneOf1, OneOf2, OneOf3, OneOf4, OneOf5, OneOf6, OneOf7, OneOf8, Variant,
    },
};
