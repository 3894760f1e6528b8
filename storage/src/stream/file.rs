//! A [Stream] backed by a file on the local filesystem.

use super::{Capabilities, Stream};
use std::{
    fs::{self, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::Path,
};

/// A file opened for table access.
///
/// Writes go straight to the operating system, so [Stream::flush] is a no-op for the file
/// handle itself; call [File::sync] to force data onto disk.
#[derive(Debug)]
pub struct File {
    file: fs::File,
    capabilities: Capabilities,
}

impl File {
    /// Wrap an already opened file, declaring what it was opened for.
    pub fn new(file: fs::File, capabilities: Capabilities) -> Self {
        Self { file, capabilities }
    }

    /// Open `path` for reading and writing, creating it if it does not exist.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Ok(Self::new(file, Capabilities::ALL))
    }

    /// Open an existing file for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self::new(file, Capabilities::ALL))
    }

    /// Open an existing file for reading only.
    pub fn open_read_only(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Ok(Self::new(file, Capabilities::READ_ONLY))
    }

    /// Ensure all written data and metadata reach the disk.
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_all()
    }

    /// Consume the stream, returning the underlying file.
    pub fn into_inner(self) -> fs::File {
        self.file
    }
}

impl Stream for File {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn position(&mut self) -> io::Result<u64> {
        self.file.stream_position()
    }

    fn seek_to(&mut self, position: u64) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        Read::read_exact(&mut self.file, buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Write::write_all(&mut self.file, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_write_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.bt");

        let mut stream = File::create(&path).unwrap();
        assert_eq!(stream.len().unwrap(), 0);
        stream.write_all(b"abcdef").unwrap();
        stream.flush().unwrap();
        stream.sync().unwrap();
        drop(stream);

        let mut stream = File::open(&path).unwrap();
        assert_eq!(stream.len().unwrap(), 6);
        stream.seek_to(2).unwrap();
        let mut buf = [0u8; 3];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"cde");
        assert_eq!(stream.position().unwrap(), 5);
    }

    #[test]
    fn test_open_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = File::open(dir.path().join("missing.bt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_only_capabilities() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.bt");
        File::create(&path).unwrap();
        let stream = File::open_read_only(&path).unwrap();
        assert_eq!(stream.capabilities(), Capabilities::READ_ONLY);
    }
}
