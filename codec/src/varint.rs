//! Variable-length encoding of `u32` lengths.
//!
//! Each byte carries 7 bits of the value (least significant group first) and a continuation bit
//! in its most significant position. This is the same 7-bit length prefix used for strings by
//! common binary writers, so a column name of fewer than 128 bytes costs a single length byte.

use crate::Error;
use bytes::{Buf, BufMut};

const DATA_BITS_PER_BYTE: u32 = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// Maximum number of bytes a `u32` occupies once encoded.
pub const MAX_SIZE: usize = 5;

/// Encodes `value` as a varint.
pub fn write(value: u32, buf: &mut impl BufMut) {
    let mut val = value;
    while val >= u32::from(CONTINUATION_BIT_MASK) {
        buf.put_u8((val as u8 & DATA_BITS_MASK) | CONTINUATION_BIT_MASK);
        val >>= DATA_BITS_PER_BYTE;
    }
    buf.put_u8(val as u8);
}

/// Decodes a varint, rejecting overlong or overflowing encodings.
pub fn read(buf: &mut impl Buf) -> Result<u32, Error> {
    let mut result: u32 = 0;
    for index in 0..MAX_SIZE {
        if !buf.has_remaining() {
            return Err(Error::EndOfBuffer);
        }
        let byte = buf.get_u8();
        let shift = DATA_BITS_PER_BYTE * index as u32;

        // The fifth byte may only carry the 4 bits left over in a u32.
        if index == MAX_SIZE - 1 && byte > 0x0F {
            return Err(Error::InvalidVarint);
        }

        // A trailing zero group means the value could have been encoded in fewer bytes.
        if index > 0 && byte == 0 {
            return Err(Error::InvalidVarint);
        }

        result |= u32::from(byte & DATA_BITS_MASK) << shift;
        if byte & CONTINUATION_BIT_MASK == 0 {
            return Ok(result);
        }
    }
    Err(Error::InvalidVarint)
}

/// Returns the number of bytes `value` occupies once encoded.
pub fn size(value: u32) -> usize {
    let bits = u32::BITS - value.leading_zeros();
    (bits.max(1)).div_ceil(DATA_BITS_PER_BYTE) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use test_case::test_case;

    #[test_case(0, &[0x00]; "zero")]
    #[test_case(1, &[0x01]; "one")]
    #[test_case(127, &[0x7F]; "largest single byte")]
    #[test_case(128, &[0x80, 0x01]; "smallest two bytes")]
    #[test_case(300, &[0xAC, 0x02]; "three hundred")]
    #[test_case(u32::MAX, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]; "max")]
    fn test_known_encodings(value: u32, expected: &[u8]) {
        let mut buf = Vec::new();
        write(value, &mut buf);
        assert_eq!(buf, expected);
        assert_eq!(size(value), expected.len());
        let mut reader = Bytes::copy_from_slice(expected);
        assert_eq!(read(&mut reader).unwrap(), value);
        assert!(!reader.has_remaining());
    }

    #[test]
    fn test_truncated() {
        let mut reader = Bytes::from_static(&[0x80, 0x80]);
        assert_eq!(read(&mut reader), Err(Error::EndOfBuffer));
    }

    #[test]
    fn test_overflow() {
        let mut reader = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF, 0x1F]);
        assert_eq!(read(&mut reader), Err(Error::InvalidVarint));
    }

    #[test]
    fn test_overlong() {
        let mut reader = Bytes::from_static(&[0x81, 0x00]);
        assert_eq!(read(&mut reader), Err(Error::InvalidVarint));
    }
}
