use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf, is_separator};

use metadata::FileKind;
use metadata::local::{
    access_times_of, apply_access_time, apply_modification_time, apply_permissions,
    permissions_of,
};

use super::LocalFile;
use crate::error::{TransferError, TransferResult};
use crate::filter::LocalFileFilter;

/// [`LocalFile`] backed by the host filesystem.
///
/// Symbolic links are followed everywhere, so a link to a directory is
/// uploaded as that directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSystemFile {
    path: PathBuf,
}

impl FileSystemFile {
    /// Wraps `path`, which need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The wrapped path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }

    fn metadata(&self, action: &'static str) -> TransferResult<fs::Metadata> {
        fs::metadata(&self.path).map_err(|error| TransferError::io(action, self.display(), error))
    }

    fn kind(&self) -> Option<FileKind> {
        let metadata = fs::metadata(&self.path).ok()?;
        let kind = if metadata.is_dir() {
            FileKind::Directory
        } else if metadata.is_file() {
            FileKind::Regular
        } else {
            FileKind::Unknown
        };
        Some(kind)
    }

    fn join(&self, name: &str) -> TransferResult<Self> {
        if name.is_empty() || name == "." || name == ".." || name.chars().any(is_separator) {
            let attempted = self.path.join(name).display().to_string();
            return Err(TransferError::invalid_path(
                attempted,
                "child names must be a single path component",
            ));
        }
        Ok(Self::new(self.path.join(name)))
    }
}

impl LocalFile for FileSystemFile {
    fn name(&self) -> String {
        if let Some(name) = self.path.file_name() {
            return name.to_string_lossy().into_owned();
        }
        fs::canonicalize(&self.path)
            .ok()
            .and_then(|canonical| {
                canonical
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| self.display())
    }

    fn location(&self) -> String {
        self.display()
    }

    fn is_file(&self) -> bool {
        self.path.is_file()
    }

    fn is_directory(&self) -> bool {
        self.path.is_dir()
    }

    fn length(&self) -> TransferResult<u64> {
        Ok(self.metadata("inspect local file")?.len())
    }

    fn children(
        &self,
        filter: Option<&dyn LocalFileFilter>,
    ) -> TransferResult<Vec<Box<dyn LocalFile>>> {
        let read_error = |error| TransferError::io("read local directory", self.display(), error);
        let mut paths = fs::read_dir(&self.path)
            .map_err(read_error)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_error)?;
        paths.sort();

        let mut children: Vec<Box<dyn LocalFile>> = Vec::with_capacity(paths.len());
        for path in paths {
            let child = Self::new(path);
            if filter.is_none_or(|filter| filter.accept(&child)) {
                children.push(Box::new(child));
            }
        }
        Ok(children)
    }

    fn child(&self, name: &str) -> TransferResult<Box<dyn LocalFile>> {
        Ok(Box::new(self.join(name)?))
    }

    fn input_stream(&self) -> TransferResult<Box<dyn Read>> {
        let file = File::open(&self.path)
            .map_err(|error| TransferError::io("open local file", self.display(), error))?;
        Ok(Box::new(file))
    }

    fn output_stream(&self) -> TransferResult<Box<dyn Write>> {
        let file = File::create(&self.path)
            .map_err(|error| TransferError::io("create local file", self.display(), error))?;
        Ok(Box::new(file))
    }

    fn permissions(&self) -> TransferResult<u32> {
        Ok(permissions_of(&self.metadata("inspect local permissions")?))
    }

    fn set_permissions(&self, permissions: u32) -> TransferResult<()> {
        Ok(apply_permissions(&self.path, permissions)?)
    }

    fn preserves_times(&self) -> bool {
        true
    }

    fn last_access_time(&self) -> TransferResult<u32> {
        Ok(access_times_of(&self.metadata("inspect local times")?).atime())
    }

    fn last_modified_time(&self) -> TransferResult<u32> {
        Ok(access_times_of(&self.metadata("inspect local times")?).mtime())
    }

    fn set_last_access_time(&self, time: u32) -> TransferResult<()> {
        Ok(apply_access_time(&self.path, time)?)
    }

    fn set_last_modified_time(&self, time: u32) -> TransferResult<()> {
        Ok(apply_modification_time(&self.path, time)?)
    }

    fn target_directory(&self, name: &str) -> TransferResult<Box<dyn LocalFile>> {
        let target = match self.kind() {
            None => self.clone(),
            Some(FileKind::Directory) if self.name() == name => self.clone(),
            Some(FileKind::Directory) => self.join(name)?,
            Some(existing) => return Err(TransferError::conflict(self.display(), existing)),
        };

        match target.kind() {
            Some(FileKind::Directory) => {}
            Some(existing) => return Err(TransferError::conflict(target.display(), existing)),
            None => fs::create_dir(&target.path).map_err(|error| {
                TransferError::io("create local directory", target.display(), error)
            })?,
        }
        Ok(Box::new(target))
    }

    fn target_file(&self, name: &str) -> TransferResult<Box<dyn LocalFile>> {
        let target = if self.is_directory() {
            self.join(name)?
        } else {
            self.clone()
        };

        match target.kind() {
            Some(FileKind::Directory) => {
                return Err(TransferError::conflict(target.display(), FileKind::Directory));
            }
            Some(_) => {}
            None => {
                OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&target.path)
                    .map_err(|error| {
                        TransferError::io("create local file", target.display(), error)
                    })?;
            }
        }
        Ok(Box::new(target))
    }
}
