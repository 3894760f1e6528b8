//! Encode rows into fixed-width binary table cells.
//!
//! # Overview
//!
//! Every row of a binary table occupies the same number of bytes. This crate provides the pieces
//! a row is made of:
//!
//! - [Write], [Read], [EncodeSize], and [FixedSize] for little-endian binary values.
//! - [Column] and [Schema] to describe a row as a fixed sequence of named cells.
//! - [RowCodec], the capability a table uses to convert rows, with two strategies: [Columnar]
//!   (schema-driven) and [Opaque] (self-describing rows).
//!
//! # Example (Columnar)
//!
//! ```
//! use bintable_codec::{CellReader, CellWriter, Cells, Columnar, Error, RowCodec, Schema};
//!
//! #[derive(Debug, PartialEq)]
//! struct Account {
//!     id: u32,
//!     active: bool,
//! }
//!
//! impl Cells for Account {
//!     fn write_cells(&self, cells: &mut CellWriter<'_>) -> Result<(), Error> {
//!         cells.put(&self.id)?;
//!         cells.put(&self.active)
//!     }
//!
//!     fn read_cells(cells: &mut CellReader<'_>) -> Result<Self, Error> {
//!         Ok(Self { id: cells.get()?, active: cells.get()? })
//!     }
//! }
//!
//! let schema = Schema::builder().column("id", 4)?.column("active", 1)?.build()?;
//! let codec = Columnar::<Account>::new(schema);
//! let row = Account { id: 1, active: true };
//! let encoded = codec.encode(&row)?;
//! assert_eq!(encoded.len(), 5);
//! assert_eq!(codec.decode(&encoded)?, row);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Example (Opaque)
//!
//! ```
//! use bytes::{Buf, BufMut};
//! use bintable_codec::{EncodeSize, Error, Opaque, Read, RowCodec, Write};
//!
//! #[derive(Debug, PartialEq)]
//! struct Reading {
//!     sensor: String,
//!     value: i64,
//! }
//!
//! impl Write for Reading {
//!     fn write(&self, buf: &mut impl BufMut) {
//!         self.sensor.write(buf);
//!         self.value.write(buf);
//!     }
//! }
//!
//! impl EncodeSize for Reading {
//!     fn encode_size(&self) -> usize {
//!         self.sensor.encode_size() + self.value.encode_size()
//!     }
//! }
//!
//! impl Read for Reading {
//!     fn read(buf: &mut impl Buf) -> Result<Self, Error> {
//!         Ok(Self { sensor: String::read(buf)?, value: i64::read(buf)? })
//!     }
//! }
//!
//! let codec = Opaque::<Reading>::new();
//! let row = Reading { sensor: "t1".into(), value: -4 };
//! let encoded = codec.encode(&row)?;
//! assert_eq!(codec.decode(&encoded)?, row);
//! # Ok::<(), Error>(())
//! ```

pub mod cell;
pub mod codec;
pub mod error;
pub mod row;
pub mod schema;
pub mod types;
pub mod varint;

pub use cell::{CellReader, CellWriter};
pub use codec::{Decode, Encode, EncodeSize, FixedSize, Read, Write};
pub use error::Error;
pub use row::{Cells, Columnar, Layout, Opaque, RowCodec};
pub use schema::{Column, Schema};
