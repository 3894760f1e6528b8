//! Error types for codec operations

use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("invalid data in {0}: {1}")]
    InvalidData(String, String), // context, message
    #[error("length exceeded: {0} > {1}")]
    LengthExceeded(usize, usize), // found, max
    #[error("invalid varint")]
    InvalidVarint,
    #[error("invalid bool")]
    InvalidBool,
    #[error("cell overflow in column {column}: {found} > {size}")]
    CellOverflow {
        column: String,
        size: u8,
        found: usize,
    },
    #[error("missing cell: row has no column {0}")]
    MissingCell(usize),
    #[error("too many columns: {0} > 255")]
    TooManyColumns(usize),
    #[error("schema has no columns")]
    NoColumns,
    #[error("column {0} has zero size")]
    ZeroSizeColumn(String),
}
