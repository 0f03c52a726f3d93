//! `std::io` adapters over offset-addressed remote files.
//!
//! Remote failures are carried inside [`io::Error::other`] so that
//! [`TransferError::io`](crate::TransferError::io) can recover them.

use std::io::{self, Read, Write};

use super::RemoteFile;

/// Sequential [`Read`] over a remote file, starting at offset zero.
pub struct RemoteFileReader<'a> {
    file: &'a mut dyn RemoteFile,
    offset: u64,
}

impl<'a> RemoteFileReader<'a> {
    /// Wraps `file`.
    #[must_use]
    pub fn new(file: &'a mut dyn RemoteFile) -> Self {
        Self { file, offset: 0 }
    }

    /// Bytes read so far.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }
}

impl Read for RemoteFileReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.file.read(self.offset, buf).map_err(io::Error::other)?;
        self.offset += read as u64;
        Ok(read)
    }
}

/// Sequential [`Write`] over a remote file, starting at offset zero.
pub struct RemoteFileWriter<'a> {
    file: &'a mut dyn RemoteFile,
    offset: u64,
}

impl<'a> RemoteFileWriter<'a> {
    /// Wraps `file`.
    #[must_use]
    pub fn new(file: &'a mut dyn RemoteFile) -> Self {
        Self { file, offset: 0 }
    }

    /// Bytes written so far.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }
}

impl Write for RemoteFileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(self.offset, buf).map_err(io::Error::other)?;
        self.offset += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{MemoryEngine, OpenFlags, RemoteEngine, SftpError, StatusCode};

    #[test]
    fn writer_then_reader_sees_the_same_bytes() {
        let engine = MemoryEngine::new();
        let mut file = engine.open("/blob", OpenFlags::UPLOAD).expect("open for write");
        {
            let mut writer = RemoteFileWriter::new(file.as_mut());
            writer.write_all(b"hello ").expect("first write");
            writer.write_all(b"world").expect("second write");
            assert_eq!(writer.offset(), 11);
        }
        file.close().expect("close");

        let mut file = engine.open("/blob", OpenFlags::READ).expect("open for read");
        let mut contents = String::new();
        RemoteFileReader::new(file.as_mut())
            .read_to_string(&mut contents)
            .expect("read");
        file.close().expect("close");
        assert_eq!(contents, "hello world");
    }

    #[test]
    fn remote_failures_travel_inside_io_errors() {
        let engine = MemoryEngine::new();
        engine.add_file("/blob", b"data", 0o644);
        engine.fail_reads("/blob", StatusCode::ConnectionLost);

        let mut file = engine.open("/blob", OpenFlags::READ).expect("open");
        let mut buf = [0_u8; 4];
        let error = RemoteFileReader::new(file.as_mut())
            .read(&mut buf)
            .expect_err("read should fail");
        file.close().expect("close");

        let inner = error
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<SftpError>())
            .expect("sftp error inside");
        assert_eq!(inner.code(), StatusCode::ConnectionLost);
    }
}
