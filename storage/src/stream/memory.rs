//! An in-memory [Stream].

use super::{Capabilities, Stream};
use std::io;

/// A growable byte buffer with a cursor.
///
/// Capabilities can be restricted to simulate streams that cannot be written or seeked.
#[derive(Clone, Debug)]
pub struct Memory {
    content: Vec<u8>,
    position: usize,
    capabilities: Capabilities,
}

impl Memory {
    /// An empty, fully capable stream.
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// Restrict (or extend) the capabilities this stream reports.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// The current content.
    pub fn as_slice(&self) -> &[u8] {
        &self.content
    }

    /// Consume the stream, returning its content.
    pub fn into_inner(self) -> Vec<u8> {
        self.content
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for Memory {
    fn from(content: Vec<u8>) -> Self {
        Self {
            content,
            position: 0,
            capabilities: Capabilities::ALL,
        }
    }
}

impl Stream for Memory {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn len(&self) -> io::Result<u64> {
        Ok(self.content.len() as u64)
    }

    fn position(&mut self) -> io::Result<u64> {
        Ok(self.position as u64)
    }

    fn seek_to(&mut self, position: u64) -> io::Result<()> {
        self.position = usize::try_from(position)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "position overflow"))?;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let end = self
            .position
            .checked_add(buf.len())
            .filter(|end| *end <= self.content.len())
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
        buf.copy_from_slice(&self.content[self.position..end]);
        self.position = end;
        Ok(())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let end = self
            .position
            .checked_add(buf.len())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "position overflow"))?;
        if end > self.content.len() {
            self.content.resize(end, 0);
        }
        self.content[self.position..end].copy_from_slice(buf);
        self.position = end;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read() {
        let mut stream = Memory::new();
        stream.write_all(b"hello").unwrap();
        assert_eq!(stream.len().unwrap(), 5);
        assert_eq!(stream.position().unwrap(), 5);

        stream.seek_to(1).unwrap();
        let mut buf = [0u8; 3];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ell");
        assert_eq!(stream.position().unwrap(), 4);
    }

    #[test]
    fn test_write_past_end_fills_zeros() {
        let mut stream = Memory::from(b"ab".to_vec());
        stream.seek_to(4).unwrap();
        stream.write_all(b"z").unwrap();
        assert_eq!(stream.into_inner(), b"ab\0\0z");
    }

    #[test]
    fn test_read_past_end() {
        let mut stream = Memory::from(b"abc".to_vec());
        stream.seek_to(2).unwrap();
        let mut buf = [0u8; 2];
        let err = stream.read_exact(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(stream.position().unwrap(), 2);
    }
}
