//! Strategies for turning a row value into table bytes and back.
//!
//! A table is bound to exactly one [RowCodec] for its lifetime. Two strategies are provided:
//!
//! - [Columnar]: rows are a fixed sequence of cells described by a [Schema]. The row width is
//!   known before any row exists.
//! - [Opaque]: rows serialize themselves. The row width is learned from the first row written
//!   and acts as a ceiling for every later row.
//!
//! Once a width is committed, the table stores every row as exactly that many bytes, padding
//! shorter encodings with zeros. Decoders therefore always see a full-width buffer and must treat
//! trailing zeros as padding.

use crate::{
    cell::{CellReader, CellWriter},
    codec::{Decode, Encode, Read},
    schema::Schema,
    Error,
};
use bytes::BytesMut;
use std::marker::PhantomData;

/// How a codec determines the width of a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout<'a> {
    /// Width is learned from the first encoded row.
    Opaque,
    /// Width is the sum of the schema's column sizes.
    Columnar(&'a Schema),
}

/// Converts rows to and from their stored bytes.
pub trait RowCodec {
    /// The value stored in each row.
    type Row;

    /// The layout this codec writes.
    fn layout(&self) -> Layout<'_>;

    /// Encode `row`. The result may be shorter than the committed row width but never longer.
    fn encode(&self, row: &Self::Row) -> Result<BytesMut, Error>;

    /// Decode a row from exactly one stored row of bytes.
    fn decode(&self, buf: &[u8]) -> Result<Self::Row, Error>;
}

/// Rows that describe their own encoding.
///
/// `R` is written with [Encode] and read back with [Read]. Anything after the value in the stored
/// row must be zero padding.
pub struct Opaque<R> {
    _row: PhantomData<fn() -> R>,
}

impl<R> Opaque<R> {
    pub fn new() -> Self {
        Self { _row: PhantomData }
    }
}

impl<R> Default for Opaque<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for Opaque<R> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<R: Encode + Read> RowCodec for Opaque<R> {
    type Row = R;

    fn layout(&self) -> Layout<'_> {
        Layout::Opaque
    }

    fn encode(&self, row: &R) -> Result<BytesMut, Error> {
        Ok(row.encode())
    }

    fn decode(&self, buf: &[u8]) -> Result<R, Error> {
        R::decode_padded(buf)
    }
}

/// Rows stored as a fixed sequence of cells.
pub trait Cells: Sized {
    /// Write each cell, in column order.
    fn write_cells(&self, cells: &mut CellWriter<'_>) -> Result<(), Error>;

    /// Read each cell, in column order.
    fn read_cells(cells: &mut CellReader<'_>) -> Result<Self, Error>;
}

/// Rows laid out according to a [Schema].
pub struct Columnar<R> {
    schema: Schema,
    _row: PhantomData<fn() -> R>,
}

impl<R> Columnar<R> {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            _row: PhantomData,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl<R> Clone for Columnar<R> {
    fn clone(&self) -> Self {
        Self::new(self.schema.clone())
    }
}

impl<R: Cells> RowCodec for Columnar<R> {
    type Row = R;

    fn layout(&self) -> Layout<'_> {
        Layout::Columnar(&self.schema)
    }

    fn encode(&self, row: &R) -> Result<BytesMut, Error> {
        let mut buf = BytesMut::zeroed(self.schema.width() as usize);
        row.write_cells(&mut CellWriter::new(&self.schema, &mut buf))?;
        Ok(buf)
    }

    fn decode(&self, buf: &[u8]) -> Result<R, Error> {
        let width = self.schema.width() as usize;
        if buf.len() < width {
            return Err(Error::EndOfBuffer);
        }
        if buf.len() > width {
            return Err(Error::ExtraData(buf.len() - width));
        }
        R::read_cells(&mut CellReader::new(&self.schema, buf))
    }
}
