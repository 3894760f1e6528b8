//! The prologue at the start of every table stream.

use super::Error;
use crate::stream::Stream;
use bintable_codec::{
    schema::MAX_ENCODED_SIZE, EncodeSize, Error as CodecError, FixedSize, Layout, Read, Schema,
    Write,
};
use bytes::{Buf, BufMut};
use tracing::{debug, warn};

/// Which header layout a stream is expected to carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Signature, version, and a lazily committed row width.
    Opaque,
    /// A column schema.
    Columnar,
}

impl Kind {
    /// The header kind written for rows of the given layout.
    pub fn of(layout: &Layout<'_>) -> Self {
        match layout {
            Layout::Opaque => Self::Opaque,
            Layout::Columnar(_) => Self::Columnar,
        }
    }
}

/// Fixed-size header of an opaque-row table.
///
/// On-disk layout (8 bytes, little-endian):
/// - Bytes 0-1: [Prologue::SIGNATURE]
/// - Byte 2: Version (u8)
/// - Bytes 3-6: Row width (u32, zero until the first row is appended)
/// - Byte 7: Reserved (written as zero, ignored on read)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prologue {
    signature: [u8; 2],
    version: u8,
    row_width: u32,
}

impl Prologue {
    /// Size of the prologue as u64 for offset calculations.
    pub const SIZE_U64: u64 = Self::SIZE as u64;

    /// Bytes identifying a binary table.
    pub const SIGNATURE: [u8; 2] = *b"BT";

    /// The only recognized format version.
    pub const VERSION: u8 = 1;

    /// Offset of the row width field.
    pub const ROW_WIDTH_OFFSET: u64 = 3;

    /// A prologue for a new table with no committed row width.
    pub const fn new() -> Self {
        Self {
            signature: Self::SIGNATURE,
            version: Self::VERSION,
            row_width: 0,
        }
    }

    /// The stored row width (zero if uncommitted).
    pub fn row_width(&self) -> u32 {
        self.row_width
    }

    /// Validate the signature, then the version.
    fn validate(&self) -> Result<(), Error> {
        if self.signature != Self::SIGNATURE {
            return Err(Error::InvalidFormat(format!(
                "invalid signature: expected {:?}, found {:?}",
                Self::SIGNATURE,
                self.signature
            )));
        }
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                expected: Self::VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

impl Default for Prologue {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedSize for Prologue {
    const SIZE: usize = 8;
}

impl EncodeSize for Prologue {
    fn encode_size(&self) -> usize {
        Self::SIZE
    }
}

impl Write for Prologue {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_slice(&self.signature);
        buf.put_u8(self.version);
        buf.put_u32_le(self.row_width);
        buf.put_u8(0);
    }
}

impl Read for Prologue {
    fn read(buf: &mut impl Buf) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::EndOfBuffer);
        }
        let mut signature = [0u8; 2];
        buf.copy_to_slice(&mut signature);
        let version = buf.get_u8();
        let row_width = buf.get_u32_le();
        let _reserved = buf.get_u8();
        Ok(Self {
            signature,
            version,
            row_width,
        })
    }
}

/// The header of a table stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Header {
    Opaque(Prologue),
    Columnar(Schema),
}

impl Header {
    /// The layout of this header.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Opaque(_) => Kind::Opaque,
            Self::Columnar(_) => Kind::Columnar,
        }
    }

    /// Number of bytes the header occupies at the start of the stream.
    pub fn size(&self) -> u64 {
        match self {
            Self::Opaque(_) => Prologue::SIZE_U64,
            Self::Columnar(schema) => schema.encode_size() as u64,
        }
    }

    /// The committed row width, if any.
    pub fn row_width(&self) -> Option<u32> {
        match self {
            Self::Opaque(prologue) => match prologue.row_width {
                0 => None,
                width => Some(width),
            },
            Self::Columnar(schema) => Some(schema.width()),
        }
    }

    /// The column schema, for columnar tables.
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            Self::Opaque(_) => None,
            Self::Columnar(schema) => Some(schema),
        }
    }

    /// Write a fresh header for `layout` at the start of an empty stream.
    pub(crate) fn create<S: Stream>(stream: &mut S, layout: &Layout<'_>) -> Result<Self, Error> {
        let header = match layout {
            Layout::Opaque => Self::Opaque(Prologue::new()),
            Layout::Columnar(schema) => Self::Columnar((*schema).clone()),
        };
        let mut buf = Vec::with_capacity(header.size() as usize);
        match &header {
            Self::Opaque(prologue) => prologue.write(&mut buf),
            Self::Columnar(schema) => schema.write(&mut buf),
        }
        stream.seek_to(0)?;
        stream.write_all(&buf)?;
        stream.flush()?;
        debug!(kind = ?header.kind(), size = buf.len(), "header written");
        Ok(header)
    }

    /// Parse and validate the header of a non-empty stream of `len` bytes.
    pub(crate) fn load<S: Stream>(stream: &mut S, kind: Kind, len: u64) -> Result<Self, Error> {
        let header = match kind {
            Kind::Opaque => Self::Opaque(Self::load_prologue(stream, len)?),
            Kind::Columnar => Self::Columnar(Self::load_schema(stream, len)?),
        };
        debug!(
            kind = ?kind,
            size = header.size(),
            row_width = header.row_width().unwrap_or(0),
            "header read"
        );
        Ok(header)
    }

    fn load_prologue<S: Stream>(stream: &mut S, len: u64) -> Result<Prologue, Error> {
        if len < Prologue::SIZE_U64 {
            warn!(len, "stream is shorter than header");
            return Err(Error::CorruptFile(format!(
                "length {len} is shorter than header size {}",
                Prologue::SIZE
            )));
        }
        let mut buf = [0u8; Prologue::SIZE];
        stream.seek_to(0)?;
        stream.read_exact(&mut buf)?;
        let prologue =
            Prologue::read(&mut &buf[..]).map_err(|e| Error::CorruptFile(e.to_string()))?;
        prologue.validate()?;

        // An uncommitted row width is only valid if no rows follow the header.
        if prologue.row_width == 0 && len != Prologue::SIZE_U64 {
            warn!(len, "rows present without a committed row width");
            return Err(Error::CorruptFile(format!(
                "row width is zero but length is {len}"
            )));
        }
        Ok(prologue)
    }

    fn load_schema<S: Stream>(stream: &mut S, len: u64) -> Result<Schema, Error> {
        let available = len.min(MAX_ENCODED_SIZE as u64) as usize;
        let mut buf = vec![0u8; available];
        stream.seek_to(0)?;
        stream.read_exact(&mut buf)?;
        Schema::read(&mut &buf[..]).map_err(|e| match e {
            CodecError::EndOfBuffer => {
                warn!(len, "schema runs past end of stream");
                Error::CorruptFile(format!("schema header truncated at length {len}"))
            }
            e => Error::InvalidFormat(format!("invalid schema: {e}")),
        })
    }

    /// Record the row width of an opaque table, in memory and in the stream.
    ///
    /// This is the only in-place update a header ever receives.
    ///
    /// # Panics
    ///
    /// Panics if the header is columnar or already has a committed row width.
    pub(crate) fn commit_row_width<S: Stream>(
        &mut self,
        stream: &mut S,
        width: u32,
    ) -> Result<(), Error> {
        let Self::Opaque(prologue) = self else {
            panic!("columnar row width is fixed by its schema");
        };
        assert_eq!(prologue.row_width, 0, "row width already committed");
        stream.seek_to(Prologue::ROW_WIDTH_OFFSET)?;
        stream.write_all(&width.to_le_bytes())?;
        stream.flush()?;
        prologue.row_width = width;
        debug!(width, "row width committed");
        Ok(())
    }
}
