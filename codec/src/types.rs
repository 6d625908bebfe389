//! Codec implementations, from primitives up to adapters for user types.

pub mod adapter;
pub mod array;
pub mod assoc;
pub mod bytes;
pub mod calendar;
pub mod constant;
pub mod container;
pub mod pointer;
pub mod primitives;
pub mod sequence;
pub mod tuple;
pub mod variant;
