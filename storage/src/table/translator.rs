//! Row index to byte offset arithmetic.

use super::Error;

/// Maps row indices to stream offsets for a table with a committed row width.
///
/// Row `i` occupies `[header_size + i * row_width, header_size + (i + 1) * row_width)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Translator {
    header_size: u64,
    row_width: u64,
}

impl Translator {
    pub const fn new(header_size: u64, row_width: u32) -> Self {
        Self {
            header_size,
            row_width: row_width as u64,
        }
    }

    /// Offset of the first byte of row `index`.
    ///
    /// Indices are not checked against the number of stored rows.
    pub fn offset(&self, index: u64) -> Result<u64, Error> {
        index
            .checked_mul(self.row_width)
            .and_then(|rows| rows.checked_add(self.header_size))
            .ok_or(Error::OffsetOverflow)
    }

    /// Number of rows held by a stream of `len` bytes.
    ///
    /// Fails with [Error::CorruptFile] if the stream is shorter than the header or ends partway
    /// through a row.
    pub fn rows(&self, len: u64) -> Result<u64, Error> {
        let body = len.checked_sub(self.header_size).ok_or_else(|| {
            Error::CorruptFile(format!(
                "length {len} is shorter than header size {}",
                self.header_size
            ))
        })?;
        if body % self.row_width != 0 {
            return Err(Error::CorruptFile(format!(
                "{body} bytes after header is not a multiple of row width {}",
                self.row_width
            )));
        }
        Ok(body / self.row_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 8; "first row")]
    #[test_case(1, 18; "second row")]
    #[test_case(7, 78; "eighth row")]
    fn test_offset(index: u64, expected: u64) {
        let translator = Translator::new(8, 10);
        assert_eq!(translator.offset(index).unwrap(), expected);
    }

    #[test]
    fn test_offset_overflow() {
        let translator = Translator::new(8, u32::MAX);
        assert!(matches!(
            translator.offset(u64::MAX / 2),
            Err(Error::OffsetOverflow)
        ));
    }

    #[test_case(8, 0; "header only")]
    #[test_case(18, 1; "one row")]
    #[test_case(58, 5; "five rows")]
    fn test_rows(len: u64, expected: u64) {
        let translator = Translator::new(8, 10);
        assert_eq!(translator.rows(len).unwrap(), expected);
    }

    #[test_case(7; "shorter than header")]
    #[test_case(19; "partial row")]
    #[test_case(27; "one byte short of two rows")]
    fn test_rows_corrupt(len: u64) {
        let translator = Translator::new(8, 10);
        assert!(matches!(translator.rows(len), Err(Error::CorruptFile(_))));
    }
}
