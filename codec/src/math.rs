//! Overflow-safe arithmetic for size computations.
//!
//! Every size a composite codec reports is accumulated through [add] and [mul]. Instead of
//! wrapping (or panicking with overflow checks enabled), an overflow is resolved by the
//! [Overflow] policy chosen when the codec was defined.

use crate::{Error, Overflow};
use tracing::debug;

/// A trait for unsigned integers usable in size arithmetic.
pub trait Unsigned: Copy + Ord + core::fmt::Debug {
    /// The smallest value of the type.
    const MIN: Self;

    /// The largest value of the type.
    const MAX: Self;

    /// The additive identity.
    const ZERO: Self;

    /// Addition returning `None` on overflow.
    fn checked_add(self, rhs: Self) -> Option<Self>;

    /// Multiplication returning `None` on overflow.
    fn checked_mul(self, rhs: Self) -> Option<Self>;
}

// Implements the `Unsigned` trait for all unsigned integer types.
macro_rules! impl_unsigned {
    ($type:ty) => {
        impl Unsigned for $type {
            const MIN: Self = <$type>::MIN;
            const MAX: Self = <$type>::MAX;
            const ZERO: Self = 0;

            #[inline]
            fn checked_add(self, rhs: Self) -> Option<Self> {
                <$type>::checked_add(self, rhs)
            }

            #[inline]
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                <$type>::checked_mul(self, rhs)
            }
        }
    };
}
impl_unsigned!(u8);
impl_unsigned!(u16);
impl_unsigned!(u32);
impl_unsigned!(u64);
impl_unsigned!(u128);
impl_unsigned!(usize);

/// Resolves an overflow of `op` on `left` and `right` according to `policy`.
fn resolve<T: Unsigned>(
    op: &'static str,
    left: T,
    right: T,
    policy: Overflow,
) -> Result<T, Error> {
    debug!(op, ?left, ?right, ?policy, "size arithmetic overflowed");
    match policy {
        Overflow::Raise => Err(Error::SizeOverflow(op)),
        Overflow::Max => Ok(T::MAX),
        Overflow::Min => Ok(T::MIN),
        Overflow::Larger => Ok(left.max(right)),
        Overflow::Smaller => Ok(left.min(right)),
        Overflow::Left => Ok(left),
        Overflow::Right => Ok(right),
        Overflow::Zero => Ok(T::ZERO),
    }
}

/// Adds two unsigned integers, resolving overflow with `policy`.
#[inline]
pub fn add<T: Unsigned>(left: T, right: T, policy: Overflow) -> Result<T, Error> {
    match left.checked_add(right) {
        Some(sum) => Ok(sum),
        None => resolve("add", left, right, policy),
    }
}

/// Multiplies two unsigned integers, resolving overflow with `policy`.
#[inline]
pub fn mul<T: Unsigned>(left: T, right: T, policy: Overflow) -> Result<T, Error> {
    match left.checked_mul(right) {
        Some(product) => Ok(product),
        None => resolve("mul", left, right, policy),
    }
}

/// Sums a sequence of fallible sizes, resolving each overflow with `policy`.
pub fn sum<I>(sizes: I, policy: Overflow) -> Result<u32, Error>
where
    I: IntoIterator<Item = Result<u32, Error>>,
{
    sizes
        .into_iter()
        .try_fold(0u32, |total, size| add(total, size?, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Overflow::Max, 255; "max")]
    #[test_case(Overflow::Min, 0; "min")]
    #[test_case(Overflow::Larger, 200; "larger")]
    #[test_case(Overflow::Smaller, 100; "smaller")]
    #[test_case(Overflow::Left, 200; "left")]
    #[test_case(Overflow::Right, 100; "right")]
    #[test_case(Overflow::Zero, 0; "zero")]
    fn test_add_overflow_policy(policy: Overflow, expected: u8) {
        assert_eq!(add(200u8, 100, policy), Ok(expected));
    }

    #[test_case(Overflow::Max, u32::MAX; "max")]
    #[test_case(Overflow::Min, 0; "min")]
    #[test_case(Overflow::Larger, 0x1_0000; "larger")]
    #[test_case(Overflow::Smaller, 0x1_0000; "smaller")]
    #[test_case(Overflow::Left, 0x1_0000; "left")]
    #[test_case(Overflow::Zero, 0; "zero")]
    fn test_mul_overflow_policy(policy: Overflow, expected: u32) {
        assert_eq!(mul(0x1_0000u32, 0x1_0000, policy), Ok(expected));
    }

    #[test]
    fn test_raise() {
        assert_eq!(
            add(u64::MAX, 1, Overflow::Raise),
            Err(Error::SizeOverflow("add"))
        );
        assert_eq!(
            mul(u16::MAX, 2, Overflow::Raise),
            Err(Error::SizeOverflow("mul"))
        );
    }

    #[test]
    fn test_no_overflow_ignores_policy() {
        for policy in [Overflow::Raise, Overflow::Zero, Overflow::Left] {
            assert_eq!(add(2u32, 3, policy), Ok(5));
            assert_eq!(mul(2u32, 3, policy), Ok(6));
            assert_eq!(mul(0u32, u32::MAX, policy), Ok(0));
            assert_eq!(mul(u32::MAX, 1, policy), Ok(u32::MAX));
        }
    }

    #[test]
    fn test_sum() {
        let sizes = [Ok(1), Ok(2), Ok(3)];
        assert_eq!(sum(sizes, Overflow::Raise), Ok(6));

        let sizes = [Ok(u32::MAX), Ok(1)];
        assert_eq!(sum(sizes, Overflow::Max), Ok(u32::MAX));
        assert_eq!(
            sum([Ok(u32::MAX), Ok(1)], Overflow::Raise),
            Err(Error::SizeOverflow("add"))
        );

        // Errors from the inputs short-circuit.
        let sizes = [Ok(1), Err(Error::NullRequired), Ok(3)];
        assert_eq!(sum(sizes, Overflow::Max), Err(Error::NullRequired));
    }
}
