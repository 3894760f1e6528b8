//! Column metadata for tables whose rows are laid out as a fixed sequence of cells.
//!
//! # Format
//!
//! A [Schema] is persisted as a column count followed by one `(size, name)` pair per column, in
//! column order:
//!
//! ```text
//! +-----------+---------+------------------+--------+---------+------------------+-----+
//! | count(u8) | size(u8)| len(varint) name | ...... | size(u8)| len(varint) name | ... |
//! +-----------+---------+------------------+--------+---------+------------------+-----+
//! ```
//!
//! The width of a row is the sum of all column sizes.

use crate::{
    codec::{at_least, EncodeSize, Read, Write},
    varint, Error,
};
use bytes::{Buf, BufMut};
use std::ops::Range;

/// Maximum number of columns in a [Schema].
pub const MAX_COLUMNS: usize = u8::MAX as usize;

/// Maximum length (in bytes) of a column name.
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// Upper bound on the encoded size of any valid [Schema].
pub const MAX_ENCODED_SIZE: usize = 1 + MAX_COLUMNS * (1 + 2 + MAX_NAME_LEN);

/// A named column holding cells of a fixed byte width.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Column {
    name: String,
    size: u8,
}

impl Column {
    /// Create a column, rejecting zero-width cells and overlong names.
    pub fn new(name: impl Into<String>, size: u8) -> Result<Self, Error> {
        let name = name.into();
        if size == 0 {
            return Err(Error::ZeroSizeColumn(name));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(Error::LengthExceeded(name.len(), MAX_NAME_LEN));
        }
        Ok(Self { name, size })
    }

    /// The name of the column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The byte width of every cell in the column.
    pub fn size(&self) -> u8 {
        self.size
    }
}

impl Write for Column {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.size);
        self.name.write(buf);
    }
}

impl EncodeSize for Column {
    fn encode_size(&self) -> usize {
        1 + self.name.encode_size()
    }
}

impl Read for Column {
    fn read(buf: &mut impl Buf) -> Result<Self, Error> {
        let size = u8::read(buf)?;
        let len = varint::read(buf)? as usize;
        if len > MAX_NAME_LEN {
            return Err(Error::LengthExceeded(len, MAX_NAME_LEN));
        }
        at_least(buf, len)?;
        let mut name = vec![0; len];
        buf.copy_to_slice(&mut name);
        let name = String::from_utf8(name)
            .map_err(|e| Error::InvalidData("Column".into(), e.to_string()))?;
        Self::new(name, size)
    }
}

/// An ordered, non-empty list of columns.
///
/// Column order is significant: it defines where each cell lives inside a row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Schema {
    columns: Vec<Column>,
    width: u32,
}

impl Schema {
    /// Create a schema from a list of columns.
    pub fn new(columns: Vec<Column>) -> Result<Self, Error> {
        if columns.is_empty() {
            return Err(Error::NoColumns);
        }
        if columns.len() > MAX_COLUMNS {
            return Err(Error::TooManyColumns(columns.len()));
        }
        let width = columns.iter().map(|c| u32::from(c.size)).sum();
        Ok(Self { columns, width })
    }

    /// Start building a schema one column at a time.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The columns, in row order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false: a schema has at least one column.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Byte width of a row (the sum of all column sizes).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Position of the column called `name`, if any.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Byte range occupied by column `index` inside a row.
    pub fn range(&self, index: usize) -> Option<Range<usize>> {
        let column = self.columns.get(index)?;
        let start: usize = self.columns[..index]
            .iter()
            .map(|c| usize::from(c.size))
            .sum();
        Some(start..start + usize::from(column.size))
    }
}

impl Write for Schema {
    fn write(&self, buf: &mut impl BufMut) {
        // Construction guarantees 1..=255 columns.
        buf.put_u8(self.columns.len() as u8);
        for column in &self.columns {
            column.write(buf);
        }
    }
}

impl EncodeSize for Schema {
    fn encode_size(&self) -> usize {
        1 + self.columns.iter().map(EncodeSize::encode_size).sum::<usize>()
    }
}

impl Read for Schema {
    fn read(buf: &mut impl Buf) -> Result<Self, Error> {
        let count = u8::read(buf)?;
        let mut columns = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            columns.push(Column::read(buf)?);
        }
        Self::new(columns)
    }
}

/// Accumulates columns for a [Schema].
#[derive(Default)]
pub struct Builder {
    columns: Vec<Column>,
}

impl Builder {
    /// Append a column. Columns are laid out in the order they are added.
    pub fn column(mut self, name: impl Into<String>, size: u8) -> Result<Self, Error> {
        if self.columns.len() >= MAX_COLUMNS {
            return Err(Error::TooManyColumns(self.columns.len() + 1));
        }
        self.columns.push(Column::new(name, size)?);
        Ok(self)
    }

    /// Finish the schema.
    pub fn build(self) -> Result<Schema, Error> {
        Schema::new(self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decode, Encode};
    use bytes::Bytes;

    fn sample() -> Schema {
        Schema::builder()
            .column("id", 4)
            .unwrap()
            .column("flag", 1)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_width_and_ranges() {
        let schema = sample();
        assert_eq!(schema.width(), 5);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.range(0), Some(0..4));
        assert_eq!(schema.range(1), Some(4..5));
        assert_eq!(schema.range(2), None);
        assert_eq!(schema.index_of("flag"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
    }

    #[test]
    fn test_encoding() {
        let schema = sample();
        let encoded = schema.encode();
        assert_eq!(encoded.as_ref(), b"\x02\x04\x02id\x01\x04flag");
        assert_eq!(schema.encode_size(), encoded.len());
        assert_eq!(Schema::decode(encoded).unwrap(), schema);
    }

    #[test]
    fn test_zero_size_column() {
        assert_eq!(
            Column::new("empty", 0),
            Err(Error::ZeroSizeColumn("empty".into()))
        );
        let encoded = Bytes::from_static(b"\x01\x00\x01x");
        assert_eq!(
            Schema::decode(encoded),
            Err(Error::ZeroSizeColumn("x".into()))
        );
    }

    #[test]
    fn test_no_columns() {
        assert_eq!(Schema::new(Vec::new()), Err(Error::NoColumns));
        assert_eq!(
            Schema::decode(Bytes::from_static(&[0])),
            Err(Error::NoColumns)
        );
    }

    #[test]
    fn test_too_many_columns() {
        let mut builder = Schema::builder();
        for i in 0..MAX_COLUMNS {
            builder = builder.column(format!("c{i}"), 1).unwrap();
        }
        assert!(matches!(
            builder.column("overflow", 1),
            Err(Error::TooManyColumns(256))
        ));
    }

    #[test]
    fn test_name_too_long() {
        let name = "n".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            Column::new(name, 1),
            Err(Error::LengthExceeded(MAX_NAME_LEN + 1, MAX_NAME_LEN))
        );
    }

    #[test]
    fn test_truncated() {
        let encoded = Bytes::from_static(b"\x02\x04\x02id\x01\x04fl");
        assert_eq!(Schema::decode(encoded), Err(Error::EndOfBuffer));
    }

    #[test]
    fn test_max_encoded_size_bound() {
        let mut columns = Vec::new();
        for _ in 0..MAX_COLUMNS {
            columns.push(Column::new("n".repeat(MAX_NAME_LEN), u8::MAX).unwrap());
        }
        let schema = Schema::new(columns).unwrap();
        assert_eq!(schema.encode_size(), MAX_ENCODED_SIZE);
        assert_eq!(schema.width(), 255 * 255);
    }
}
