//! The local side of a transfer.

mod fs;

use std::fmt;
use std::io::{Read, Write};

pub use fs::FileSystemFile;

use crate::error::TransferResult;
use crate::filter::LocalFileFilter;

/// A local file or directory that can be uploaded from or downloaded into.
///
/// The trait is object safe; the engines only ever see `&dyn LocalFile`.
/// Timestamps are whole seconds since the Unix epoch, the resolution SFTP
/// version 3 carries.
pub trait LocalFile {
    /// Final path component.
    fn name(&self) -> String;

    /// Human-readable location used in errors and logs.
    fn location(&self) -> String;

    /// Reports whether this is a regular file.
    fn is_file(&self) -> bool;

    /// Reports whether this is a directory.
    fn is_directory(&self) -> bool;

    /// Size in bytes.
    ///
    /// # Errors
    ///
    /// Fails when the entry cannot be inspected.
    fn length(&self) -> TransferResult<u64>;

    /// Entries directly inside this directory that `filter` accepts.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be read.
    fn children(
        &self,
        filter: Option<&dyn LocalFileFilter>,
    ) -> TransferResult<Vec<Box<dyn LocalFile>>>;

    /// The entry named `name` inside this directory, which need not exist.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`](crate::TransferError::InvalidPath) for names
    /// that would leave this directory.
    fn child(&self, name: &str) -> TransferResult<Box<dyn LocalFile>>;

    /// Opens the file for reading.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened.
    fn input_stream(&self) -> TransferResult<Box<dyn Read>>;

    /// Opens the file for writing, replacing its contents.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened.
    fn output_stream(&self) -> TransferResult<Box<dyn Write>>;

    /// Permission bits.
    ///
    /// # Errors
    ///
    /// Fails when the entry cannot be inspected.
    fn permissions(&self) -> TransferResult<u32>;

    /// Replaces the permission bits.
    ///
    /// # Errors
    ///
    /// Fails when the permissions cannot be changed.
    fn set_permissions(&self, permissions: u32) -> TransferResult<()>;

    /// Reports whether this side keeps access and modification times.
    fn preserves_times(&self) -> bool;

    /// Last access time.
    ///
    /// # Errors
    ///
    /// Fails when the entry cannot be inspected.
    fn last_access_time(&self) -> TransferResult<u32>;

    /// Last modification time.
    ///
    /// # Errors
    ///
    /// Fails when the entry cannot be inspected.
    fn last_modified_time(&self) -> TransferResult<u32>;

    /// Sets the last access time.
    ///
    /// # Errors
    ///
    /// Fails when the time cannot be changed.
    fn set_last_access_time(&self, time: u32) -> TransferResult<()>;

    /// Sets the last modification time.
    ///
    /// # Errors
    ///
    /// Fails when the time cannot be changed.
    fn set_last_modified_time(&self, time: u32) -> TransferResult<()>;

    /// Resolves where a remote directory named `name` should land, creating
    /// it when needed.
    ///
    /// An existing directory that already carries `name` is reused, any
    /// other existing directory receives a new child, and a missing path is
    /// created as-is.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict`](crate::TransferError::Conflict) when a
    /// non-directory occupies the destination.
    fn target_directory(&self, name: &str) -> TransferResult<Box<dyn LocalFile>>;

    /// Resolves where a remote file named `name` should land, creating an
    /// empty file when needed. Existing directories receive a new child.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict`](crate::TransferError::Conflict) when a directory
    /// occupies the destination.
    fn target_file(&self, name: &str) -> TransferResult<Box<dyn LocalFile>>;
}

impl fmt::Debug for dyn LocalFile + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalFile").field(&self.location()).finish()
    }
}
