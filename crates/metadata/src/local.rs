//! Reading and applying attributes on the local filesystem.
//!
//! Permission handling is exact on Unix. Elsewhere only the owner-write bit
//! is honoured, mapped onto the platform's read-only flag.

use std::fs;
use std::io;
use std::path::Path;

use filetime::{FileTime, set_file_atime, set_file_mtime, set_file_times};

use crate::attributes::AccessTimes;
use crate::error::MetadataError;

/// Returns the permission bits of `metadata`.
#[must_use]
pub fn permissions_of(metadata: &fs::Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        metadata.permissions().mode() & 0o7777
    }

    #[cfg(not(unix))]
    {
        let base = if metadata.is_dir() { 0o555 } else { 0o444 };
        if metadata.permissions().readonly() {
            base
        } else {
            base | 0o200
        }
    }
}

/// Returns the access and modification times of `metadata`, truncated to
/// whole seconds and clamped to the `u32` range SFTP v3 can carry.
#[must_use]
pub fn access_times_of(metadata: &fs::Metadata) -> AccessTimes {
    let atime = FileTime::from_last_access_time(metadata);
    let mtime = FileTime::from_last_modification_time(metadata);
    AccessTimes::new(clamp_seconds(atime), clamp_seconds(mtime))
}

fn clamp_seconds(time: FileTime) -> u32 {
    u32::try_from(time.unix_seconds().max(0)).unwrap_or(u32::MAX)
}

/// Sets the permission bits of `destination` to `permissions`.
pub fn apply_permissions(destination: &Path, permissions: u32) -> Result<(), MetadataError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(destination, fs::Permissions::from_mode(permissions & 0o7777))
            .map_err(|source| permissions_error(destination, permissions, source))?;
    }

    #[cfg(not(unix))]
    {
        let mut destination_permissions = fs::metadata(destination)
            .map_err(|source| MetadataError::Inspect {
                path: destination.to_path_buf(),
                source,
            })?
            .permissions();
        destination_permissions.set_readonly(permissions & 0o200 == 0);
        fs::set_permissions(destination, destination_permissions)
            .map_err(|source| permissions_error(destination, permissions, source))?;
    }

    Ok(())
}

/// Sets the access and modification times of `destination`.
pub fn apply_times(destination: &Path, times: AccessTimes) -> Result<(), MetadataError> {
    set_file_times(destination, file_time(times.atime()), file_time(times.mtime()))
        .map_err(|source| times_error(destination, source))
}

/// Sets only the access time of `destination`, keeping its modification time.
pub fn apply_access_time(destination: &Path, atime: u32) -> Result<(), MetadataError> {
    set_file_atime(destination, file_time(atime)).map_err(|source| times_error(destination, source))
}

/// Sets only the modification time of `destination`, keeping its access time.
pub fn apply_modification_time(destination: &Path, mtime: u32) -> Result<(), MetadataError> {
    set_file_mtime(destination, file_time(mtime)).map_err(|source| times_error(destination, source))
}

fn file_time(seconds: u32) -> FileTime {
    FileTime::from_unix_time(i64::from(seconds), 0)
}

fn permissions_error(path: &Path, permissions: u32, source: io::Error) -> MetadataError {
    MetadataError::Permissions {
        path: path.to_path_buf(),
        permissions,
        source,
    }
}

fn times_error(path: &Path, source: io::Error) -> MetadataError {
    MetadataError::Times {
        path: path.to_path_buf(),
        source,
    }
}
