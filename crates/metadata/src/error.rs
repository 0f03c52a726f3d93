use std::io;
use std::path::{Path, PathBuf};

/// Reading or applying local metadata failed.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The entry's current metadata could not be read.
    #[error("failed to inspect '{}': {source}", path.display())]
    Inspect {
        /// Entry being inspected.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The permission bits could not be applied.
    #[error("failed to set mode {permissions:04o} on '{}': {source}", path.display())]
    Permissions {
        /// Entry being updated.
        path: PathBuf,
        /// Requested permission bits.
        permissions: u32,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The access or modification time could not be applied.
    #[error("failed to set times on '{}': {source}", path.display())]
    Times {
        /// Entry being updated.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl MetadataError {
    /// Path of the entry the failure concerns.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Inspect { path, .. } | Self::Permissions { path, .. } | Self::Times { path, .. } => {
                path
            }
        }
    }
}
