//! Core codec traits

use crate::error::Error;
use bytes::{Buf, BufMut, BytesMut};

/// Trait for types that can be written (encoded) to a buffer.
pub trait Write {
    /// Encodes this value by writing to a buffer.
    ///
    /// Implementations should panic if the buffer doesn't have enough capacity.
    fn write(&self, buf: &mut impl BufMut);
}

/// Trait for types that know how many bytes their encoding occupies.
pub trait EncodeSize {
    /// Returns the encoded length of this value.
    ///
    /// This method MUST return the exact number of bytes that will be written by `write()`.
    fn encode_size(&self) -> usize;
}

/// Trait for types that can be read (decoded) from a buffer.
pub trait Read: Sized {
    /// Reads a value from the buffer, consuming the necessary bytes.
    ///
    /// Returns an error if decoding fails (e.g., invalid data, not enough bytes).
    fn read(buf: &mut impl Buf) -> Result<Self, Error>;
}

/// Trait for types with a known, fixed encoded length.
pub trait FixedSize {
    /// The length of the encoded value.
    const SIZE: usize;
}

/// Trait for types that can be encoded to a fresh buffer.
pub trait Encode: Write + EncodeSize {
    /// Encodes a value to a `BytesMut` buffer.
    ///
    /// Panics if the `write` implementation does not write the expected number of bytes.
    fn encode(&self) -> BytesMut {
        let len = self.encode_size();
        let mut buffer = BytesMut::with_capacity(len);
        self.write(&mut buffer);
        assert_eq!(buffer.len(), len, "write() did not write expected bytes");
        buffer
    }
}

impl<T: Write + EncodeSize> Encode for T {}

/// Trait for types that can be decoded from a buffer that holds exactly one value.
pub trait Decode: Read {
    /// Decodes a value, ensuring the buffer is fully consumed.
    fn decode(mut buf: impl Buf) -> Result<Self, Error> {
        let value = Self::read(&mut buf)?;
        let remaining = buf.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }
        Ok(value)
    }

    /// Decodes a value from a buffer that may be followed by zero padding.
    ///
    /// Any trailing byte that is not zero is reported as [Error::ExtraData].
    fn decode_padded(mut buf: impl Buf) -> Result<Self, Error> {
        let value = Self::read(&mut buf)?;
        let remaining = buf.remaining();
        while buf.has_remaining() {
            let chunk = buf.chunk();
            if chunk.iter().any(|b| *b != 0) {
                return Err(Error::ExtraData(remaining));
            }
            let len = chunk.len();
            buf.advance(len);
        }
        Ok(value)
    }
}

impl<T: Read> Decode for T {}

/// Returns [Error::EndOfBuffer] if `buf` holds fewer than `len` bytes.
#[inline]
pub fn at_least(buf: &impl Buf, len: usize) -> Result<(), Error> {
    if buf.remaining() < len {
        return Err(Error::EndOfBuffer);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_insufficient_buffer() {
        let mut reader = Bytes::from_static(&[0x01, 0x02]);
        assert!(matches!(u32::read(&mut reader), Err(Error::EndOfBuffer)));
    }

    #[test]
    fn test_extra_data() {
        let encoded = Bytes::from_static(&[0x01, 0x02]);
        assert!(matches!(u8::decode(encoded), Err(Error::ExtraData(1))));
    }

    #[test]
    fn test_decode_padded_accepts_zeros() {
        let encoded = Bytes::from_static(&[0x2a, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(u32::decode_padded(encoded).unwrap(), 42);
    }

    #[test]
    fn test_decode_padded_rejects_garbage() {
        let encoded = Bytes::from_static(&[0x2a, 0x00, 0x00, 0x00, 0x00, 0x07]);
        assert_eq!(u32::decode_padded(encoded), Err(Error::ExtraData(2)));
    }

    #[test]
    #[should_panic(expected = "write() did not write expected bytes")]
    fn test_encode_size_mismatch_panics() {
        struct Liar;
        impl Write for Liar {
            fn write(&self, buf: &mut impl BufMut) {
                buf.put_u8(1);
            }
        }
        impl EncodeSize for Liar {
            fn encode_size(&self) -> usize {
                2
            }
        }
        Liar.encode();
    }
}
