use std::io::{self, Read, Write};

use logging::trace_progress;

use crate::listener::TransferListener;

/// Which side of a copy failed.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Reading from the source failed.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    /// Writing to or flushing the sink failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

/// Copies a stream through a fixed-size buffer, reporting progress.
///
/// # Examples
///
/// ```
/// use transfer::{NoopListener, StreamCopier};
///
/// let mut source: &[u8] = b"some bytes";
/// let mut sink = Vec::new();
/// let copied = StreamCopier::new(4, &NoopListener)
///     .copy(&mut source, &mut sink)
///     .expect("copy");
/// assert_eq!(copied, 10);
/// assert_eq!(sink, b"some bytes");
/// ```
pub struct StreamCopier<'a> {
    buffer_size: usize,
    listener: &'a dyn TransferListener,
}

impl<'a> StreamCopier<'a> {
    /// Creates a copier with a buffer of `buffer_size` bytes (at least one).
    #[must_use]
    pub fn new(buffer_size: usize, listener: &'a dyn TransferListener) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
            listener,
        }
    }

    /// Size of the copy buffer.
    #[must_use]
    pub const fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Copies `reader` to `writer` until end of input, then flushes.
    ///
    /// The listener's `progress` receives the cumulative byte count after
    /// every chunk.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError`] naming the side that failed.
    pub fn copy<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<u64, CopyError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let mut buffer = vec![0_u8; self.buffer_size];
        let mut transferred = 0_u64;
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(CopyError::Read(error)),
            };
            writer.write_all(&buffer[..read]).map_err(CopyError::Write)?;
            transferred += read as u64;
            self.listener.progress(transferred);
        }
        writer.flush().map_err(CopyError::Write)?;
        trace_progress!(
            "copied {} bytes with a {} byte buffer",
            transferred,
            self.buffer_size
        );
        Ok(transferred)
    }
}
