//! Byte streams a table can be layered on.
//!
//! A [Stream] is a seekable, readable, writable sequence of bytes. The table never opens or
//! closes storage itself: it is handed a stream, owns it for its lifetime, and gives it back on
//! close. Two implementations are provided:
//!
//! - [memory::Memory]: a growable in-memory buffer.
//! - [file::File]: a file on the local filesystem.

use std::{fmt, io};

pub mod file;
pub mod memory;

/// The operations a stream supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub readable: bool,
    pub writable: bool,
    pub seekable: bool,
}

impl Capabilities {
    /// Readable, writable, and seekable.
    pub const ALL: Self = Self {
        readable: true,
        writable: true,
        seekable: true,
    };

    /// Readable and seekable, but not writable.
    pub const READ_ONLY: Self = Self {
        readable: true,
        writable: false,
        seekable: true,
    };

    /// Names of the capabilities this set lacks.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.readable {
            missing.push("read");
        }
        if !self.writable {
            missing.push("write");
        }
        if !self.seekable {
            missing.push("seek");
        }
        missing
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read={} write={} seek={}",
            self.readable, self.writable, self.seekable
        )
    }
}

/// A seekable byte stream.
///
/// Reads and writes happen at the current position and advance it. Implementations must report
/// their [Capabilities] honestly: a table refuses any stream that is not fully capable.
#[allow(clippy::len_without_is_empty)]
pub trait Stream {
    /// The operations this stream supports.
    fn capabilities(&self) -> Capabilities;

    /// Total length of the stream in bytes.
    fn len(&self) -> io::Result<u64>;

    /// Current position.
    fn position(&mut self) -> io::Result<u64>;

    /// Move the position to `position` bytes from the start.
    fn seek_to(&mut self, position: u64) -> io::Result<()>;

    /// Fill `buf` from the current position, failing if the stream ends first.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Write all of `buf` at the current position, extending the stream if needed.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Push buffered writes down to the underlying storage.
    fn flush(&mut self) -> io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_capabilities() {
        assert!(Capabilities::ALL.missing().is_empty());
        assert_eq!(Capabilities::READ_ONLY.missing(), vec!["write"]);
        let none = Capabilities {
            readable: false,
            writable: false,
            seekable: false,
        };
        assert_eq!(none.missing(), vec!["read", "write", "seek"]);
    }
}
