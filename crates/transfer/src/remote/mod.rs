//! The remote side of a transfer.
//!
//! [`RemoteEngine`] is the seam between the transfer logic and an SFTP
//! session. It is a blocking, request-per-call interface mirroring the
//! version 3 operations the engines need: `STAT`, `OPEN`, `OPENDIR`,
//! `MKDIR`, `SETSTAT` and `REALPATH`. Handles returned by `open` and
//! `open_dir` must be closed exactly once; the engines do that through a
//! guard that also closes on early return.

mod flags;
mod guard;
mod io;
#[cfg(any(test, feature = "test-support"))]
mod memory;
mod resource;
mod status;

use std::sync::Arc;

use logging::trace_listing;
use metadata::FileAttributes;

pub use flags::OpenFlags;
pub(crate) use guard::HandleGuard;
pub use io::{RemoteFileReader, RemoteFileWriter};
#[cfg(any(test, feature = "test-support"))]
pub use memory::{MemoryEngine, RemoteOperation};
pub use resource::RemoteResourceInfo;
pub use status::{SftpError, StatusCode};

use crate::filter::RemoteResourceFilter;
use crate::path::PathComponents;

/// Bytes an `SSH_FXP_WRITE` request spends on framing, excluding the
/// handle string itself.
///
/// Packet length (4), type (1), request id (4), handle length (4),
/// offset (8) and data length (4).
pub const WRITE_PACKET_FIXED_OVERHEAD: u32 = 4 + 1 + 4 + 4 + 8 + 4;

/// Returns the framing overhead of a write request on a handle of
/// `handle_len` bytes.
#[must_use]
pub fn write_packet_overhead(handle_len: usize) -> u32 {
    let handle_len = u32::try_from(handle_len).unwrap_or(u32::MAX);
    WRITE_PACKET_FIXED_OVERHEAD.saturating_add(handle_len)
}

/// Anything holding a server-side handle.
pub trait RemoteHandle {
    /// Releases the handle on the server.
    ///
    /// # Errors
    ///
    /// Returns the server's status when the close request fails.
    fn close(&mut self) -> Result<(), SftpError>;
}

/// An open remote file.
pub trait RemoteFile: RemoteHandle {
    /// Reads into `buf` starting at `offset`. Returns `0` at end of file.
    ///
    /// # Errors
    ///
    /// Returns the server's status when the read request fails.
    fn read(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, SftpError>;

    /// Writes all of `data` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns the server's status when the write request fails.
    fn write(&mut self, offset: u64, data: &[u8]) -> Result<(), SftpError>;

    /// Bytes of framing each write request carries on top of its payload.
    fn outgoing_packet_overhead(&self) -> u32;
}

/// An open remote directory listing.
pub trait RemoteDirectory: RemoteHandle {
    /// Path the listing was opened for.
    fn path(&self) -> &str;

    /// Returns the next batch of `(name, attributes)` entries, or `None`
    /// once the listing is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the server's status when the read request fails.
    fn read_batch(&mut self) -> Result<Option<Vec<(String, FileAttributes)>>, SftpError>;

    /// Reads the whole listing, skipping `.` and `..` and anything `filter`
    /// rejects. Entries keep the order the server returned them in.
    ///
    /// # Errors
    ///
    /// Propagates the first failed batch.
    fn scan(
        &mut self,
        filter: Option<&dyn RemoteResourceFilter>,
    ) -> Result<Vec<RemoteResourceInfo>, SftpError> {
        let parent = self.path().to_owned();
        let mut entries = Vec::new();
        while let Some(batch) = self.read_batch()? {
            for (name, attributes) in batch {
                if name == "." || name == ".." {
                    continue;
                }
                let components = PathComponents::new(parent.clone(), name);
                let info = RemoteResourceInfo::new(components, attributes);
                if filter.is_none_or(|filter| filter.accept(&info)) {
                    entries.push(info);
                } else {
                    trace_listing!("filtered out '{}'", info.path());
                }
            }
        }
        trace_listing!("listed {} entries under '{}'", entries.len(), parent);
        Ok(entries)
    }
}

/// Blocking access to one SFTP session.
///
/// Every method maps to a single request. Engines never retry; a failed
/// request is reported to the caller as-is.
pub trait RemoteEngine {
    /// `STAT`, following symbolic links.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchFile` when nothing exists at `path`.
    fn stat(&self, path: &str) -> Result<FileAttributes, SftpError>;

    /// `OPEN` with the given flags.
    ///
    /// # Errors
    ///
    /// Returns the server's status when the file cannot be opened.
    fn open(&self, path: &str, flags: OpenFlags) -> Result<Box<dyn RemoteFile>, SftpError>;

    /// `OPENDIR`.
    ///
    /// # Errors
    ///
    /// Returns the server's status when the directory cannot be listed.
    fn open_dir(&self, path: &str) -> Result<Box<dyn RemoteDirectory>, SftpError>;

    /// `MKDIR` with default attributes.
    ///
    /// # Errors
    ///
    /// Returns the server's status when the directory cannot be created.
    fn make_dir(&self, path: &str) -> Result<(), SftpError>;

    /// `SETSTAT`.
    ///
    /// # Errors
    ///
    /// Returns the server's status when the attributes are rejected.
    fn set_attributes(&self, path: &str, attributes: &FileAttributes) -> Result<(), SftpError>;

    /// `REALPATH`.
    ///
    /// # Errors
    ///
    /// Returns the server's status when the path cannot be resolved.
    fn canonicalize(&self, path: &str) -> Result<String, SftpError>;

    /// Largest packet this side accepts, used to size read buffers.
    fn local_max_packet_size(&self) -> u32;

    /// Largest packet the server accepts, used to size write buffers.
    fn remote_max_packet_size(&self) -> u32;
}

macro_rules! forward_remote_engine {
    ($($wrapper:ty),+ $(,)?) => {
        $(
            impl<E: RemoteEngine + ?Sized> RemoteEngine for $wrapper {
                fn stat(&self, path: &str) -> Result<FileAttributes, SftpError> {
                    (**self).stat(path)
                }

                fn open(&self, path: &str, flags: OpenFlags) -> Result<Box<dyn RemoteFile>, SftpError> {
                    (**self).open(path, flags)
                }

                fn open_dir(&self, path: &str) -> Result<Box<dyn RemoteDirectory>, SftpError> {
                    (**self).open_dir(path)
                }

                fn make_dir(&self, path: &str) -> Result<(), SftpError> {
                    (**self).make_dir(path)
                }

                fn set_attributes(&self, path: &str, attributes: &FileAttributes) -> Result<(), SftpError> {
                    (**self).set_attributes(path, attributes)
                }

                fn canonicalize(&self, path: &str) -> Result<String, SftpError> {
                    (**self).canonicalize(path)
                }

                fn local_max_packet_size(&self) -> u32 {
                    (**self).local_max_packet_size()
                }

                fn remote_max_packet_size(&self) -> u32 {
                    (**self).remote_max_packet_size()
                }
            }
        )+
    };
}

forward_remote_engine!(&E, Box<E>, Arc<E>);
