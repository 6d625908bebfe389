//! Definition-time options for codec descriptions.
//!
//! None of these are read from the environment: each one is chosen when a
//! codec is constructed and stays fixed for the codec's lifetime.

use crate::Error;
use core::ops::{Bound, RangeBounds};
use tracing::debug;

/// Byte order of a primitive value on the wire.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

impl ByteOrder {
    /// The byte order of the host.
    pub const NATIVE: Self = if cfg!(target_endian = "big") {
        Self::Big
    } else {
        Self::Little
    };

    /// Returns true if values in this order must be byte-swapped on the host.
    pub const fn is_swapped(self) -> bool {
        !matches!(
            (self, Self::NATIVE),
            (Self::Little, Self::Little) | (Self::Big, Self::Big)
        )
    }
}

/// Response to an overflow during size arithmetic.
///
/// # Examples
///
/// ```
/// use serdes_codec::{math, Overflow};
///
/// assert_eq!(math::add(u8::MAX, 1, Overflow::Max), Ok(u8::MAX));
/// assert_eq!(math::mul(200u8, 2, Overflow::Larger), Ok(200));
/// assert!(math::add(u8::MAX, 1, Overflow::Raise).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Overflow {
    /// Fail with [crate::Error::SizeOverflow].
    Raise,
    /// Return the maximum value of the type.
    #[default]
    Max,
    /// Return the minimum value of the type.
    Min,
    /// Return the larger operand.
    Larger,
    /// Return the smaller operand.
    Smaller,
    /// Return the left operand.
    Left,
    /// Return the right operand.
    Right,
    /// Return zero.
    Zero,
}

/// Range of element counts a length-prefixed codec accepts on decode.
///
/// The count field only bounds how many elements may follow. A count for elements that occupy
/// no bytes is never checked against the input length, so a codec decoding untrusted input
/// should carry a tighter limit.
///
/// # Examples
///
/// ```
/// use serdes_codec::RangeCfg;
///
/// let cfg = RangeCfg::new(1..=1024);
/// assert!(cfg.contains(1024));
/// assert!(!cfg.contains(0));
/// assert!(RangeCfg::default().contains(usize::MAX));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg {
    start: Bound<usize>,
    end: Bound<usize>,
}

impl Default for RangeCfg {
    fn default() -> Self {
        Self::new(..)
    }
}

impl RangeCfg {
    /// Creates a limit from any range of counts.
    pub fn new(range: impl RangeBounds<usize>) -> Self {
        Self {
            start: range.start_bound().cloned(),
            end: range.end_bound().cloned(),
        }
    }

    /// Creates a limit that only accepts `count`.
    pub const fn exact(count: usize) -> Self {
        Self {
            start: Bound::Included(count),
            end: Bound::Included(count),
        }
    }

    /// Returns true if `count` is within the limit.
    pub fn contains(&self, count: usize) -> bool {
        match self.start {
            Bound::Included(start) if count < start => return false,
            Bound::Excluded(start) if count <= start => return false,
            _ => {}
        }
        match self.end {
            Bound::Included(end) if count > end => return false,
            Bound::Excluded(end) if count >= end => return false,
            _ => {}
        }
        true
    }

    /// Fails with [crate::Error::InvalidLength] if `count` is outside the limit.
    pub fn check(&self, count: usize) -> Result<usize, Error> {
        if !self.contains(count) {
            debug!(count, limit = ?self, "decoded count outside limit");
            return Err(Error::InvalidLength(count));
        }
        Ok(count)
    }
}

macro_rules! impl_from_range {
    ($range:ty) => {
        impl From<$range> for RangeCfg {
            fn from(range: $range) -> Self {
                Self::new(range)
            }
        }
    };
}

impl_from_range!(core::ops::Range<usize>);
impl_from_range!(core::ops::RangeInclusive<usize>);
impl_from_range!(core::ops::RangeFrom<usize>);
impl_from_range!(core::ops::RangeTo<usize>);
impl_from_range!(core::ops::RangeToInclusive<usize>);
impl_from_range!(core::ops::RangeFull);
