use std::io;

use metadata::{FileKind, MetadataError};

use crate::remote::SftpError;

/// Result alias used throughout the crate.
pub type TransferResult<T> = Result<T, TransferError>;

/// Error produced when an upload or download fails.
///
/// Every failure aborts the whole call. Entries already written stay where
/// they are.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// A path could not be split into parent and name, or names an entry
    /// that would escape its parent.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// Offending path.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// The destination holds an entry of the wrong kind.
    #[error("cannot transfer to '{path}': a {existing} entry is in the way")]
    Conflict {
        /// Destination that was probed.
        path: String,
        /// What was found there.
        existing: FileKind,
    },
    /// The source is neither a regular file nor a directory.
    #[error("'{path}' is not a regular file or directory (found {kind})")]
    UnsupportedEntry {
        /// Source path.
        path: String,
        /// Kind reported for the source.
        kind: FileKind,
    },
    /// The server rejected a request.
    #[error(transparent)]
    Remote(#[from] SftpError),
    /// A local stream or filesystem call failed.
    #[error("failed to {action} '{path}': {source}")]
    Io {
        /// Action being performed.
        action: &'static str,
        /// Path involved in the failure.
        path: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Local permissions or timestamps could not be read or applied.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl TransferError {
    /// Constructs an invalid-path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason,
        }
    }

    /// Constructs a conflict error.
    #[must_use]
    pub fn conflict(path: impl Into<String>, existing: FileKind) -> Self {
        Self::Conflict {
            path: path.into(),
            existing,
        }
    }

    /// Constructs an I/O error with action context.
    ///
    /// Remote failures that travelled through an [`io::Read`] or
    /// [`io::Write`] adapter are unwrapped back into [`TransferError::Remote`].
    #[must_use]
    pub fn io(action: &'static str, path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        if !source
            .get_ref()
            .is_some_and(|inner| inner.is::<SftpError>())
        {
            return Self::Io {
                action,
                path,
                source,
            };
        }

        let kind = source.kind();
        match source.into_inner().map(|inner| inner.downcast::<SftpError>()) {
            Some(Ok(remote)) => Self::Remote(*remote),
            Some(Err(inner)) => Self::Io {
                action,
                path,
                source: io::Error::new(kind, inner),
            },
            None => Self::Io {
                action,
                path,
                source: io::Error::from(kind),
            },
        }
    }

    /// Returns the remote status error, if this failure came from the server.
    #[must_use]
    pub const fn as_remote(&self) -> Option<&SftpError> {
        match self {
            Self::Remote(error) => Some(error),
            _ => None,
        }
    }
}
