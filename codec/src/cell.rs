//! Column-ordered access to the cells of a row.
//!
//! A [CellWriter] fills a zeroed row buffer one column at a time; a [CellReader] walks the same
//! columns over a stored row. Values narrower than their column are zero-padded, and a value
//! read back from a cell must be followed only by that padding.

use crate::{
    codec::{Decode, Encode, Read},
    schema::Schema,
    Error,
};

/// Writes values into consecutive cells of a row.
pub struct CellWriter<'a> {
    schema: &'a Schema,
    row: &'a mut [u8],
    next: usize,
}

impl<'a> CellWriter<'a> {
    /// Create a writer over `row`, which must be exactly `schema.width()` zeroed bytes.
    pub(crate) fn new(schema: &'a Schema, row: &'a mut [u8]) -> Self {
        debug_assert_eq!(row.len(), schema.width() as usize);
        Self {
            schema,
            row,
            next: 0,
        }
    }

    /// Index of the column the next call writes to.
    pub fn position(&self) -> usize {
        self.next
    }

    /// Encode `value` into the next cell.
    pub fn put<T: Encode>(&mut self, value: &T) -> Result<(), Error> {
        let encoded = value.encode();
        self.put_bytes(&encoded)
    }

    /// Copy raw bytes into the next cell.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let index = self.next;
        let column = self
            .schema
            .columns()
            .get(index)
            .ok_or(Error::MissingCell(index))?;
        if bytes.len() > usize::from(column.size()) {
            return Err(Error::CellOverflow {
                column: column.name().to_string(),
                size: column.size(),
                found: bytes.len(),
            });
        }
        let range = self.schema.range(index).ok_or(Error::MissingCell(index))?;
        self.row[range.start..range.start + bytes.len()].copy_from_slice(bytes);
        self.next += 1;
        Ok(())
    }

    /// Leave the next cell zeroed.
    pub fn skip(&mut self) -> Result<(), Error> {
        if self.next >= self.schema.len() {
            return Err(Error::MissingCell(self.next));
        }
        self.next += 1;
        Ok(())
    }
}

/// Reads values from consecutive cells of a stored row.
pub struct CellReader<'a> {
    schema: &'a Schema,
    row: &'a [u8],
    next: usize,
}

impl<'a> CellReader<'a> {
    /// Create a reader over `row`, which must be exactly `schema.width()` bytes.
    pub(crate) fn new(schema: &'a Schema, row: &'a [u8]) -> Self {
        debug_assert_eq!(row.len(), schema.width() as usize);
        Self {
            schema,
            row,
            next: 0,
        }
    }

    /// Index of the column the next call reads from.
    pub fn position(&self) -> usize {
        self.next
    }

    /// Decode a value from the next cell.
    pub fn get<T: Read>(&mut self) -> Result<T, Error> {
        let cell = self.get_bytes()?;
        T::decode_padded(cell)
    }

    /// Borrow the raw bytes of the next cell, padding included.
    pub fn get_bytes(&mut self) -> Result<&'a [u8], Error> {
        let index = self.next;
        let range = self.schema.range(index).ok_or(Error::MissingCell(index))?;
        self.next += 1;
        Ok(&self.row[range])
    }

    /// Borrow the raw bytes of the column called `name`, independent of the cursor.
    pub fn column(&self, name: &str) -> Option<&'a [u8]> {
        let index = self.schema.index_of(name)?;
        let range = self.schema.range(index)?;
        Some(&self.row[range])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::builder()
            .column("id", 4)
            .unwrap()
            .column("name", 8)
            .unwrap()
            .column("flag", 1)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_write_then_read() {
        let schema = schema();
        let mut row = vec![0u8; schema.width() as usize];
        let mut writer = CellWriter::new(&schema, &mut row);
        writer.put(&7u32).unwrap();
        writer.put(&String::from("bob")).unwrap();
        writer.put(&true).unwrap();
        assert_eq!(writer.position(), 3);
        assert_eq!(row, b"\x07\x00\x00\x00\x03bob\x00\x00\x00\x00\x01");

        let mut reader = CellReader::new(&schema, &row);
        assert_eq!(reader.get::<u32>().unwrap(), 7);
        assert_eq!(reader.get::<String>().unwrap(), "bob");
        assert!(reader.get::<bool>().unwrap());
        assert_eq!(reader.get::<u8>(), Err(Error::MissingCell(3)));
        assert_eq!(reader.column("flag"), Some(&[1u8][..]));
    }

    #[test]
    fn test_cell_overflow() {
        let schema = schema();
        let mut row = vec![0u8; schema.width() as usize];
        let mut writer = CellWriter::new(&schema, &mut row);
        let err = writer.put(&u64::MAX).unwrap_err();
        assert_eq!(
            err,
            Error::CellOverflow {
                column: "id".into(),
                size: 4,
                found: 8,
            }
        );
        assert_eq!(writer.position(), 0);
    }

    #[test]
    fn test_skip_leaves_zeros() {
        let schema = schema();
        let mut row = vec![0u8; schema.width() as usize];
        let mut writer = CellWriter::new(&schema, &mut row);
        writer.skip().unwrap();
        writer.skip().unwrap();
        writer.put(&1u8).unwrap();
        assert_eq!(writer.skip(), Err(Error::MissingCell(3)));
        assert_eq!(&row[..12], &[0u8; 12]);
    }

    #[test]
    fn test_read_rejects_dirty_padding() {
        let schema = schema();
        let mut row = vec![0u8; schema.width() as usize];
        row[0] = 1;
        row[3] = 9;
        let mut reader = CellReader::new(&schema, &row);
        assert_eq!(reader.get::<u16>(), Err(Error::ExtraData(2)));
    }
}
