//! Local-to-remote recursion.

use logging::{trace_probe, trace_upload};
use metadata::{FileAttributes, FileKind};

use crate::copier::{CopyError, StreamCopier};
use crate::error::{TransferError, TransferResult};
use crate::filter::LocalFileFilter;
use crate::listener::TransferListener;
use crate::local::LocalFile;
use crate::options::TransferOptions;
use crate::path::{PathComponents, PathHelper};
use crate::remote::{HandleGuard, OpenFlags, RemoteEngine, RemoteFile, RemoteFileWriter};

/// One upload call's worth of state. Built per call and dropped afterwards.
pub(crate) struct Uploader<'a, E: RemoteEngine + ?Sized> {
    engine: &'a E,
    paths: PathHelper<'a, E>,
    filter: Option<&'a dyn LocalFileFilter>,
    listener: &'a dyn TransferListener,
    options: TransferOptions,
}

impl<'a, E: RemoteEngine + ?Sized> Uploader<'a, E> {
    pub(crate) const fn new(
        engine: &'a E,
        filter: Option<&'a dyn LocalFileFilter>,
        listener: &'a dyn TransferListener,
        options: TransferOptions,
    ) -> Self {
        Self {
            engine,
            paths: PathHelper::new(engine),
            filter,
            listener,
            options,
        }
    }

    /// Uploads `local` so that it ends up at, or inside, `remote`.
    pub(crate) fn upload(&self, local: &dyn LocalFile, remote: &str) -> TransferResult<()> {
        if !local.is_directory() && !local.is_file() {
            return Err(TransferError::UnsupportedEntry {
                path: local.location(),
                kind: FileKind::Unknown,
            });
        }
        // Taken before streaming, which moves the source's access time.
        let attributes = if self.options.preserves_attributes() {
            Some(source_attributes(local)?)
        } else {
            None
        };

        let adjusted = if local.is_directory() {
            self.listener.started_dir(&local.name());
            let adjusted = self.upload_dir(local, remote)?;
            self.listener.finished_dir();
            adjusted
        } else {
            self.listener.started_file(&local.name(), local.length()?);
            let adjusted = self.upload_file(local, remote)?;
            self.listener.finished_file();
            adjusted
        };

        if let Some(attributes) = attributes {
            trace_upload!(
                "setting mode {:04o} on '{}' (times: {})",
                attributes.permissions(),
                adjusted,
                attributes.has_times()
            );
            self.engine.set_attributes(&adjusted, &attributes)?;
        }
        Ok(())
    }

    fn upload_dir(&self, local: &dyn LocalFile, remote: &str) -> TransferResult<String> {
        let adjusted = self.prepare_dir(local, remote)?;
        trace_upload!("uploading directory '{}' to '{}'", local.location(), adjusted);
        for child in local.children(self.filter)? {
            self.upload(child.as_ref(), &adjusted)?;
        }
        Ok(adjusted)
    }

    fn upload_file(&self, local: &dyn LocalFile, remote: &str) -> TransferResult<String> {
        let adjusted = self.prepare_file(local, remote)?;
        trace_upload!("uploading file '{}' to '{}'", local.location(), adjusted);

        let handle = self.engine.open(&adjusted, OpenFlags::UPLOAD)?;
        let mut guard = HandleGuard::new(handle, adjusted.as_str());
        let copied = self.copy_into(local, guard.handle_mut(), &adjusted);
        guard.finish(copied)?;
        Ok(adjusted)
    }

    fn copy_into(
        &self,
        local: &dyn LocalFile,
        remote: &mut dyn RemoteFile,
        remote_path: &str,
    ) -> TransferResult<u64> {
        let buffer_size = self.options.upload_buffer_size(
            self.engine.remote_max_packet_size(),
            remote.outgoing_packet_overhead(),
        );
        let mut input = local.input_stream()?;
        let mut output = RemoteFileWriter::new(remote);
        StreamCopier::new(buffer_size, self.listener)
            .copy(&mut input, &mut output)
            .map_err(|error| match error {
                CopyError::Read(source) => {
                    TransferError::io("read local file", local.location(), source)
                }
                CopyError::Write(source) => {
                    TransferError::io("write remote file", remote_path, source)
                }
            })
    }

    /// Picks the remote directory `local` uploads into.
    ///
    /// A missing destination is created under that name. An existing
    /// directory whose leaf already matches is reused; any other directory
    /// gets `local`'s name appended, created if needed.
    fn prepare_dir(&self, local: &dyn LocalFile, remote: &str) -> TransferResult<String> {
        if !self.directory_exists(remote)? {
            trace_probe!("'{}' does not exist, creating it", remote);
            self.engine.make_dir(remote)?;
            return Ok(remote.to_owned());
        }

        let name = local.name();
        if self.paths.components(remote)?.name() == name {
            trace_probe!("'{}' already exists, reusing it", remote);
            return Ok(remote.to_owned());
        }

        let nested = PathComponents::adjust_for_parent(remote, &name);
        trace_probe!("'{}' is a directory, uploading into '{}'", remote, nested);
        if !self.directory_exists(&nested)? {
            self.engine.make_dir(&nested)?;
        }
        Ok(nested)
    }

    /// Picks the remote path `local` is written to: inside `remote` when it
    /// is a directory, `remote` itself otherwise.
    fn prepare_file(&self, local: &dyn LocalFile, remote: &str) -> TransferResult<String> {
        match self.engine.stat(remote) {
            Ok(attributes) if attributes.kind() == FileKind::Directory => {
                let nested = PathComponents::adjust_for_parent(remote, &local.name());
                trace_probe!("'{}' is a directory, uploading to '{}'", remote, nested);
                Ok(nested)
            }
            Ok(attributes) => {
                trace_probe!("replacing {} entry '{}'", attributes.kind(), remote);
                Ok(remote.to_owned())
            }
            Err(error) if error.is_no_such_file() => {
                trace_probe!("'{}' does not exist, creating it", remote);
                Ok(remote.to_owned())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// `Ok(false)` when nothing exists at `path`; a conflict when something
    /// other than a directory does.
    fn directory_exists(&self, path: &str) -> TransferResult<bool> {
        match self.engine.stat(path) {
            Ok(attributes) if attributes.kind() == FileKind::Directory => Ok(true),
            Ok(attributes) => Err(TransferError::conflict(path, attributes.kind())),
            Err(error) if error.is_no_such_file() => Ok(false),
            Err(error) => Err(error.into()),
        }
    }
}

fn source_attributes(local: &dyn LocalFile) -> TransferResult<FileAttributes> {
    let mut builder = FileAttributes::builder().with_permissions(local.permissions()?);
    if local.preserves_times() {
        builder = builder.with_times(local.last_access_time()?, local.last_modified_time()?);
    }
    Ok(builder.build())
}
