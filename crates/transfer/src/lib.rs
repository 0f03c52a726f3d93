#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `transfer` copies whole trees between the local filesystem and an SFTP
//! server. [`SftpFileTransfer::upload`] and [`SftpFileTransfer::download`]
//! walk a file or directory depth-first, decide where each entry lands on
//! the other side, stream its bytes, and then copy its permissions and
//! (where the destination keeps them) its timestamps.
//!
//! # Design
//!
//! - [`RemoteEngine`] is the blocking SFTP seam: `STAT`, `OPEN`, `OPENDIR`,
//!   `MKDIR`, `SETSTAT`, `REALPATH`. Handles it returns are closed on every
//!   exit path, including early returns.
//! - [`LocalFile`] is the local seam; [`FileSystemFile`] backs it with
//!   `std::fs`.
//! - [`PathComponents`] splits remote paths; [`PathHelper`] resolves `.` and
//!   `..` leaves through the server.
//! - [`TransferListener`] observes the walk. [`NoopListener`] is the default
//!   and [`LoggingTransferListener`] reports through `tracing`.
//! - [`LocalFileFilter`] and [`RemoteResourceFilter`] prune the walk.
//!   [`GlobFilter`] adapts [`filters::FilterSet`] rules.
//! - [`StreamCopier`] moves bytes through a buffer sized from the
//!   negotiated packet limits and [`TransferOptions`].
//!
//! # Invariants
//!
//! - Only `NoSuchFile` from a destination probe is interpreted, as "create
//!   it"; every other remote status aborts the call unchanged.
//! - Nothing is retried and nothing is rolled back.
//! - Attributes are applied after an entry's contents (and, for
//!   directories, after all children), so a read-only directory can still
//!   be filled.
//! - Listener notifications nest: each `started_*` is followed by the
//!   matching `finished_*` once the entry succeeds.
//!
//! # Examples
//!
//! ```
//! use transfer::{PathComponents, TransferOptions};
//!
//! let components = PathComponents::parse("/srv/backups/2024").expect("valid path");
//! assert_eq!(components.parent(), "/srv/backups");
//! assert_eq!(components.name(), "2024");
//!
//! let options = TransferOptions::new().preserve_attributes(false);
//! assert!(!options.preserves_attributes());
//! ```

mod copier;
mod download;
mod error;
mod file_transfer;
mod filter;
mod listener;
mod local;
mod options;
mod path;
mod remote;
mod upload;

pub use copier::{CopyError, StreamCopier};
pub use error::{TransferError, TransferResult};
pub use file_transfer::SftpFileTransfer;
pub use filter::{GlobFilter, LocalFileFilter, RemoteResourceFilter};
pub use listener::{LoggingTransferListener, NoopListener, TransferListener};
pub use local::{FileSystemFile, LocalFile};
pub use metadata::{AccessTimes, FileAttributes, FileKind, FileMode};
pub use options::{DEFAULT_MIN_BUFFER_SIZE, TransferOptions};
pub use path::{PathComponents, PathHelper, SEPARATOR};
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub use remote::{MemoryEngine, RemoteOperation};
pub use remote::{
    OpenFlags, RemoteDirectory, RemoteEngine, RemoteFile, RemoteFileReader, RemoteFileWriter,
    RemoteHandle, RemoteResourceInfo, SftpError, StatusCode, WRITE_PACKET_FIXED_OVERHEAD,
    write_packet_overhead,
};

#[cfg(test)]
mod tests;
