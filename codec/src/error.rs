//! Error types for codec operations

use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("invalid data in {0}: {1}")]
    InvalidData(String, String), // context, message
    #[error("invalid bool")]
    InvalidBool,
    #[error("size overflow in {0}")]
    SizeOverflow(&'static str), // operation
    #[error("invalid length: {0}")]
    InvalidLength(usize),
    #[error("sequence too long: {count} > {max}")]
    SequenceTooLong { count: usize, max: u32 },
    #[error("input range too short: expected {expected} elements, got {found}")]
    ShortInputRange { expected: usize, found: usize },
    #[error("capacity mismatch: need {needed} slots, target holds {capacity}")]
    CapacityMismatch { needed: usize, capacity: usize },
    #[error("reference must not be null")]
    NullRequired,
    #[error("allocation hook left a present value unallocated")]
    Unallocated,
    #[error("unknown discriminant: {tag} (alternatives: {alternatives})")]
    UnknownDiscriminant { tag: u8, alternatives: usize },
    #[error("value out of range for {0}")]
    OutOfRange(&'static str), // target type
}
