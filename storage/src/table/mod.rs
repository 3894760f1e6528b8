//! A table of fixed-width rows stored in a single seekable stream.
//!
//! Rows are addressed by their zero-based index. Every row occupies exactly the same number of
//! bytes (the row width), so any row can be read or overwritten in place without scanning.
//!
//! # Format
//!
//! A table begins with a header, followed by rows packed with no gaps. Two header layouts exist,
//! selected by the [bintable_codec::RowCodec] the table is created with.
//!
//! Opaque rows (the row type serializes itself):
//!
//! ```text
//! +---+---+---+---+---+---+---+---+-----------+-----------+-----+
//! | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 |     8     |  8 + w    | ... |
//! +---+---+---+---+---+---+---+---+-----------+-----------+-----+
//! | "BT"  | V |  Width (u32 LE) | R |  Row 0    |  Row 1    | ... |
//! +---+---+---+---+---+---+---+---+-----------+-----------+-----+
//!
//! V = Version (1), R = Reserved (0), w = Width
//! ```
//!
//! The width is zero until the first row is appended, at which point it is set to the length of
//! that row's encoding and never changes again.
//!
//! Columnar rows (a [bintable_codec::Schema] describes each cell):
//!
//! ```text
//! +-------+------+--------------+-----+-------+-------+-----+
//! | Count | Size | Name (varint | ... | Row 0 | Row 1 | ... |
//! | (u8)  | (u8) | len + UTF-8) |     |       |       |     |
//! +-------+------+--------------+-----+-------+-------+-----+
//! ```
//!
//! The width is the sum of all column sizes and is known as soon as the table is created.
//!
//! # Row Width
//!
//! Rows whose encoding is shorter than the width are padded with zeros. Rows whose encoding is
//! longer are rejected before anything is written.
//!
//! # Durability
//!
//! Every write (rows and the one-time header update) is followed by a flush of the stream. There
//! is no write-ahead log: a crash in the middle of an append can leave a torn row, which every
//! later row access reports as [Error::CorruptFile].
//!
//! # Example
//!
//! ```rust
//! use bintable_codec::Opaque;
//! use bintable_storage::{stream::memory::Memory, table::{Config, Table}};
//!
//! let mut table = Table::init(Memory::new(), Config::new(Opaque::<u64>::new())).unwrap();
//! assert_eq!(table.row_count().unwrap(), 0);
//!
//! table.append_row(&7).unwrap();
//! table.append_row(&11).unwrap();
//! table.write_row(0, &3).unwrap();
//!
//! assert_eq!(table.row_width(), Some(8));
//! assert_eq!(table.first_row().unwrap(), 3);
//! assert_eq!(table.last_row().unwrap(), 11);
//! ```

mod header;
mod storage;
mod translator;

pub use header::{Header, Kind, Prologue};
pub use storage::{Rows, Table};
pub use translator::Translator;

use thiserror::Error;

/// Default ceiling on the row width of an opaque table.
pub const DEFAULT_MAX_ROW_WIDTH: u32 = 1024 * 1024; // 1MB

/// Errors that can occur when interacting with a [Table].
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported stream: missing {0}")]
    UnsupportedStream(String),
    #[error("corrupt file: {0}")]
    CorruptFile(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("unsupported version: expected {expected}, found {found}")]
    UnsupportedVersion { expected: u8, found: u8 },
    #[error("stored schema does not match codec schema")]
    SchemaMismatch,
    #[error("stream not empty: {0} bytes")]
    StreamNotEmpty(u64),
    #[error("row width not initialized")]
    NotInitialized,
    #[error("row {0} out of range: {1} rows")]
    OutOfRange(u64, u64),
    #[error("table is empty")]
    EmptyTable,
    #[error("row too wide: {0} > {1}")]
    RowTooWide(usize, u32),
    #[error("row encodes to zero bytes")]
    EmptyRow,
    #[error("offset overflow")]
    OffsetOverflow,
    #[error("encode error: {0}")]
    Encode(bintable_codec::Error),
    #[error("decode error: {0}")]
    Decode(bintable_codec::Error),
}

/// Configuration for [Table] storage.
#[derive(Clone)]
pub struct Config<C> {
    /// Converts rows to and from their stored bytes.
    pub codec: C,

    /// The largest row width an opaque table will commit to (or accept from an existing header).
    pub max_row_width: u32,
}

impl<C> Config<C> {
    /// A configuration with [DEFAULT_MAX_ROW_WIDTH].
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            max_row_width: DEFAULT_MAX_ROW_WIDTH,
        }
    }
}
