use super::{Config, Error, Header, Kind, Translator};
use crate::stream::{Capabilities, Stream};
use bintable_codec::{Layout, RowCodec};
use bytes::BytesMut;
use tracing::{debug, trace, warn};

/// Implementation of [Table] storage.
///
/// The table owns its stream for its entire lifetime. Any other writer touching the same
/// underlying storage concurrently is undefined behavior.
pub struct Table<S: Stream, C: RowCodec> {
    stream: S,
    codec: C,
    header: Header,

    // Invariants:
    // - `header_size` never changes after construction.
    // - `row_width` is `None` only for an opaque table with no rows, and once set it never changes.
    header_size: u64,
    row_width: Option<u32>,
    max_row_width: u32,
}

impl<S: Stream, C: RowCodec> Table<S, C> {
    /// Initialize a new `Table` instance over `stream`.
    ///
    /// An empty stream receives a fresh header. A non-empty stream must already hold a valid
    /// header of the layout the codec expects.
    pub fn init(mut stream: S, cfg: Config<C>) -> Result<Self, Error> {
        Self::check_capabilities(stream.capabilities())?;
        let len = stream.len()?;
        let header = {
            let layout = cfg.codec.layout();
            if len == 0 {
                Header::create(&mut stream, &layout)?
            } else {
                let header = Header::load(&mut stream, Kind::of(&layout), len)?;
                Self::check_header(&header, &layout, cfg.max_row_width)?;
                header
            }
        };
        let header_size = header.size();
        let row_width = header.row_width();
        debug!(len, header_size, row_width = row_width.unwrap_or(0), "loaded table");

        Ok(Self {
            stream,
            codec: cfg.codec,
            header,
            header_size,
            row_width,
            max_row_width: cfg.max_row_width,
        })
    }

    /// Initialize a new `Table` over a stream that must be empty.
    pub fn create(stream: S, cfg: Config<C>) -> Result<Self, Error> {
        Self::check_capabilities(stream.capabilities())?;
        let len = stream.len()?;
        if len > 0 {
            return Err(Error::StreamNotEmpty(len));
        }
        Self::init(stream, cfg)
    }

    /// Read the header of an existing table without binding a codec to it.
    ///
    /// Returns `None` if the stream is empty. Only read access is required.
    pub fn inspect(stream: &mut S, kind: Kind) -> Result<Option<Header>, Error> {
        let missing: Vec<_> = stream
            .capabilities()
            .missing()
            .into_iter()
            .filter(|capability| *capability != "write")
            .collect();
        if !missing.is_empty() {
            return Err(Error::UnsupportedStream(missing.join(", ")));
        }
        let len = stream.len()?;
        if len == 0 {
            return Ok(None);
        }
        Header::load(stream, kind, len).map(Some)
    }

    fn check_capabilities(capabilities: Capabilities) -> Result<(), Error> {
        let missing = capabilities.missing();
        if !missing.is_empty() {
            warn!(%capabilities, "stream is missing capabilities");
            return Err(Error::UnsupportedStream(missing.join(", ")));
        }
        Ok(())
    }

    fn check_header(header: &Header, layout: &Layout<'_>, max_row_width: u32) -> Result<(), Error> {
        match (header, layout) {
            (Header::Columnar(stored), Layout::Columnar(expected)) => {
                if stored != *expected {
                    warn!(?stored, ?expected, "schema mismatch");
                    return Err(Error::SchemaMismatch);
                }
            }
            (Header::Opaque(prologue), Layout::Opaque) => {
                if prologue.row_width() > max_row_width {
                    warn!(
                        row_width = prologue.row_width(),
                        max_row_width, "stored row width exceeds maximum"
                    );
                    return Err(Error::CorruptFile(format!(
                        "row width {} exceeds maximum {max_row_width}",
                        prologue.row_width()
                    )));
                }
            }
            _ => unreachable!("header kind is derived from the layout"),
        }
        Ok(())
    }

    /// The table header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of bytes before the first row.
    pub fn header_size(&self) -> u64 {
        self.header_size
    }

    /// The committed row width, if any.
    pub fn row_width(&self) -> Option<u32> {
        self.row_width
    }

    /// Whether the row width has been committed.
    pub fn is_initialized(&self) -> bool {
        self.row_width.is_some()
    }

    /// The codec rows are converted with.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Return the number of rows in the table.
    ///
    /// A table without a committed row width has no rows.
    pub fn row_count(&self) -> Result<u64, Error> {
        let Some(width) = self.row_width else {
            return Ok(0);
        };
        let len = self.stream.len()?;
        Translator::new(self.header_size, width)
            .rows(len)
            .inspect_err(|_| warn!(len, width, "stream length inconsistent with row width"))
    }

    /// Read the row at `index`.
    pub fn read_row(&mut self, index: u64) -> Result<C::Row, Error> {
        let width = self.row_width.ok_or(Error::NotInitialized)?;
        let count = self.row_count()?;
        if count == 0 {
            return Err(Error::EmptyTable);
        }
        if index >= count {
            return Err(Error::OutOfRange(index, count));
        }

        let offset = Translator::new(self.header_size, width).offset(index)?;
        let mut buf = vec![0u8; width as usize];
        self.stream.seek_to(offset)?;
        self.stream.read_exact(&mut buf)?;
        trace!(index, offset, width, "read row");
        self.codec.decode(&buf).map_err(Error::Decode)
    }

    /// Overwrite the existing row at `index`.
    ///
    /// Rows are only created by [Table::append_row], so `index` must be less than
    /// [Table::row_count].
    pub fn write_row(&mut self, index: u64, row: &C::Row) -> Result<(), Error> {
        let width = self.row_width.ok_or(Error::NotInitialized)?;
        let buf = Self::pad(self.encode(row)?, width)?;
        let count = self.row_count()?;
        if index >= count {
            return Err(Error::OutOfRange(index, count));
        }

        let offset = Translator::new(self.header_size, width).offset(index)?;
        self.stream.seek_to(offset)?;
        self.stream.write_all(&buf)?;
        self.stream.flush()?;
        trace!(index, offset, width, "wrote row");
        Ok(())
    }

    /// Append a new row to the end of the table, returning its index.
    ///
    /// If no row width is committed yet, the width of this row's encoding becomes the row width of
    /// the table.
    pub fn append_row(&mut self, row: &C::Row) -> Result<u64, Error> {
        let encoded = self.encode(row)?;
        let (width, index) = match self.row_width {
            Some(width) => (width, self.row_count()?),
            None => {
                if encoded.is_empty() {
                    return Err(Error::EmptyRow);
                }
                let width = u32::try_from(encoded.len())
                    .ok()
                    .filter(|width| *width <= self.max_row_width)
                    .ok_or(Error::RowTooWide(encoded.len(), self.max_row_width))?;
                let len = self.stream.len()?;
                if len != self.header_size {
                    warn!(len, "rows present without a committed row width");
                    return Err(Error::CorruptFile(format!(
                        "row width is zero but length is {len}"
                    )));
                }
                self.header.commit_row_width(&mut self.stream, width)?;
                self.row_width = Some(width);
                (width, 0)
            }
        };
        let buf = Self::pad(encoded, width)?;

        let offset = Translator::new(self.header_size, width).offset(index)?;
        self.stream.seek_to(offset)?;
        self.stream.write_all(&buf)?;
        self.stream.flush()?;
        trace!(index, offset, width, "appended row");
        Ok(index)
    }

    /// Read the first row.
    pub fn first_row(&mut self) -> Result<C::Row, Error> {
        if self.row_count()? == 0 {
            return Err(Error::EmptyTable);
        }
        self.read_row(0)
    }

    /// Read the last row.
    pub fn last_row(&mut self) -> Result<C::Row, Error> {
        let count = self.row_count()?;
        if count == 0 {
            return Err(Error::EmptyTable);
        }
        self.read_row(count - 1)
    }

    /// Returns an iterator over every row, in index order.
    ///
    /// The number of rows is fixed when the iterator is created.
    pub fn rows(&mut self) -> Result<Rows<'_, S, C>, Error> {
        let end = self.row_count()?;
        Ok(Rows {
            table: self,
            next: 0,
            end,
        })
    }

    /// Flush any buffered writes to the underlying stream.
    pub fn sync(&mut self) -> Result<(), Error> {
        self.stream.flush().map_err(Error::Io)
    }

    /// Flush and return the underlying stream.
    pub fn close(mut self) -> Result<S, Error> {
        self.sync()?;
        debug!("closed table");
        Ok(self.stream)
    }

    fn encode(&self, row: &C::Row) -> Result<BytesMut, Error> {
        self.codec.encode(row).map_err(Error::Encode)
    }

    /// Extend `buf` with zeros to exactly `width` bytes, rejecting encodings that are too wide.
    fn pad(mut buf: BytesMut, width: u32) -> Result<BytesMut, Error> {
        if buf.len() > width as usize {
            return Err(Error::RowTooWide(buf.len(), width));
        }
        buf.resize(width as usize, 0);
        Ok(buf)
    }
}

/// Iterator over the rows of a [Table], yielding `(index, row)` pairs.
pub struct Rows<'a, S: Stream, C: RowCodec> {
    table: &'a mut Table<S, C>,
    next: u64,
    end: u64,
}

impl<S: Stream, C: RowCodec> Iterator for Rows<'_, S, C> {
    type Item = Result<(u64, C::Row), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.table.read_row(index).map(|row| (index, row)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}
