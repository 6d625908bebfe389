//! Codec utility functions

use crate::Error;
use bytes::Buf;

/// Checks that the buffer has at least `len` bytes remaining.
#[inline]
pub fn at_least<B: Buf>(buf: &mut B, len: usize) -> Result<(), Error> {
    let rem = buf.remaining();
    if rem < len {
        return Err(Error::EndOfBuffer);
    }
    Ok(())
}

/// Converts a container length to a size, failing if it exceeds `u32`.
#[inline]
pub(crate) fn count_u32(count: usize) -> Result<u32, Error> {
    u32::try_from(count).map_err(|_| Error::SequenceTooLong {
        count,
        max: u32::MAX,
    })
}
