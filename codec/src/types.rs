//! Codec implementations for primitive types.
//!
//! Integers are little-endian, matching the byte order of the table file header. `String` is a
//! varint byte length followed by UTF-8, and `[u8; N]` is written as-is.

use crate::{
    codec::{at_least, EncodeSize, FixedSize, Read, Write},
    varint, Error,
};
use bytes::{Buf, BufMut};

macro_rules! impl_numeric {
    ($type:ty, $read_method:ident, $write_method:ident) => {
        impl Write for $type {
            #[inline]
            fn write(&self, buf: &mut impl BufMut) {
                buf.$write_method(*self);
            }
        }

        impl Read for $type {
            #[inline]
            fn read(buf: &mut impl Buf) -> Result<Self, Error> {
                at_least(buf, std::mem::size_of::<$type>())?;
                Ok(buf.$read_method())
            }
        }

        impl FixedSize for $type {
            const SIZE: usize = std::mem::size_of::<$type>();
        }

        impl EncodeSize for $type {
            #[inline]
            fn encode_size(&self) -> usize {
                Self::SIZE
            }
        }
    };
}

impl_numeric!(u16, get_u16_le, put_u16_le);
impl_numeric!(u32, get_u32_le, put_u32_le);
impl_numeric!(u64, get_u64_le, put_u64_le);
impl_numeric!(i32, get_i32_le, put_i32_le);
impl_numeric!(i64, get_i64_le, put_i64_le);

impl Write for u8 {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(*self);
    }
}

impl Read for u8 {
    #[inline]
    fn read(buf: &mut impl Buf) -> Result<Self, Error> {
        at_least(buf, 1)?;
        Ok(buf.get_u8())
    }
}

impl FixedSize for u8 {
    const SIZE: usize = 1;
}

impl EncodeSize for u8 {
    #[inline]
    fn encode_size(&self) -> usize {
        Self::SIZE
    }
}

impl Write for bool {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(u8::from(*self));
    }
}

impl Read for bool {
    #[inline]
    fn read(buf: &mut impl Buf) -> Result<Self, Error> {
        match u8::read(buf)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidBool),
        }
    }
}

impl FixedSize for bool {
    const SIZE: usize = 1;
}

impl EncodeSize for bool {
    #[inline]
    fn encode_size(&self) -> usize {
        Self::SIZE
    }
}

impl<const N: usize> Write for [u8; N] {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_slice(self);
    }
}

impl<const N: usize> Read for [u8; N] {
    #[inline]
    fn read(buf: &mut impl Buf) -> Result<Self, Error> {
        at_least(buf, N)?;
        let mut dst = [0; N];
        buf.copy_to_slice(&mut dst);
        Ok(dst)
    }
}

impl<const N: usize> FixedSize for [u8; N] {
    const SIZE: usize = N;
}

impl<const N: usize> EncodeSize for [u8; N] {
    #[inline]
    fn encode_size(&self) -> usize {
        N
    }
}

impl Write for String {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        self.as_str().write(buf);
    }
}

impl EncodeSize for String {
    #[inline]
    fn encode_size(&self) -> usize {
        self.as_str().encode_size()
    }
}

impl Write for str {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        let len = u32::try_from(self.len()).expect("string length exceeds u32");
        varint::write(len, buf);
        buf.put_slice(self.as_bytes());
    }
}

impl EncodeSize for str {
    #[inline]
    fn encode_size(&self) -> usize {
        let len = u32::try_from(self.len()).expect("string length exceeds u32");
        varint::size(len) + self.len()
    }
}

impl Read for String {
    #[inline]
    fn read(buf: &mut impl Buf) -> Result<Self, Error> {
        let len = varint::read(buf)? as usize;
        at_least(buf, len)?;
        let mut bytes = vec![0; len];
        buf.copy_to_slice(&mut bytes);
        String::from_utf8(bytes).map_err(|e| Error::InvalidData("String".into(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decode, Encode};
    use bytes::Bytes;

    #[test]
    fn test_little_endian() {
        assert_eq!(0x0102_0304u32.encode().as_ref(), &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!((-2i32).encode().as_ref(), &[0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(0x0102u16.encode().as_ref(), &[0x02, 0x01]);
    }

    #[test]
    fn test_integer_bounds() {
        for value in [0u64, 1, 42, u64::MAX] {
            assert_eq!(u64::decode(value.encode()).unwrap(), value);
        }
        for value in [i64::MIN, -1, 0, i64::MAX] {
            assert_eq!(i64::decode(value.encode()).unwrap(), value);
        }
    }

    #[test]
    fn test_bool() {
        assert_eq!(true.encode().as_ref(), &[1]);
        assert!(!bool::decode(Bytes::from_static(&[0])).unwrap());
        assert_eq!(
            bool::decode(Bytes::from_static(&[2])),
            Err(Error::InvalidBool)
        );
    }

    #[test]
    fn test_array() {
        let value = [7u8; 5];
        assert_eq!(value.encode_size(), 5);
        assert_eq!(<[u8; 5]>::decode(value.encode()).unwrap(), value);
        assert_eq!(
            <[u8; 5]>::decode(Bytes::from_static(&[1, 2])),
            Err(Error::EndOfBuffer)
        );
    }

    #[test]
    fn test_string() {
        let value = String::from("hello");
        let encoded = value.encode();
        assert_eq!(encoded.as_ref(), b"\x05hello");
        assert_eq!(String::decode(encoded).unwrap(), value);
    }

    #[test]
    fn test_string_invalid_utf8() {
        let encoded = Bytes::from_static(&[0x02, 0xC3, 0x28]);
        assert!(matches!(
            String::decode(encoded),
            Err(Error::InvalidData(ctx, _)) if ctx == "String"
        ));
    }

    #[test]
    fn test_string_truncated() {
        let encoded = Bytes::from_static(&[0x05, b'h', b'i']);
        assert_eq!(String::decode(encoded), Err(Error::EndOfBuffer));
    }
}
