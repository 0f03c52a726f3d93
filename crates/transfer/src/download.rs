//! Remote-to-local recursion.

use logging::trace_download;
use metadata::FileKind;
use tracing::warn;

use crate::copier::{CopyError, StreamCopier};
use crate::error::{TransferError, TransferResult};
use crate::filter::RemoteResourceFilter;
use crate::listener::TransferListener;
use crate::local::LocalFile;
use crate::options::TransferOptions;
use crate::remote::{
    HandleGuard, OpenFlags, RemoteEngine, RemoteFile, RemoteFileReader, RemoteResourceInfo,
};

/// One download call's worth of state. Built per call and dropped afterwards.
pub(crate) struct Downloader<'a, E: RemoteEngine + ?Sized> {
    engine: &'a E,
    filter: Option<&'a dyn RemoteResourceFilter>,
    listener: &'a dyn TransferListener,
    options: TransferOptions,
}

impl<'a, E: RemoteEngine + ?Sized> Downloader<'a, E> {
    pub(crate) const fn new(
        engine: &'a E,
        filter: Option<&'a dyn RemoteResourceFilter>,
        listener: &'a dyn TransferListener,
        options: TransferOptions,
    ) -> Self {
        Self {
            engine,
            filter,
            listener,
            options,
        }
    }

    /// Downloads `remote` so that it ends up at, or inside, `local`.
    pub(crate) fn download(
        &self,
        remote: &RemoteResourceInfo,
        local: &dyn LocalFile,
    ) -> TransferResult<()> {
        let adjusted = match remote.kind() {
            FileKind::Directory => {
                self.listener.started_dir(remote.name());
                let adjusted = self.download_dir(remote, local)?;
                self.listener.finished_dir();
                adjusted
            }
            FileKind::Regular => self.download_regular(remote, local)?,
            FileKind::Unknown => {
                warn!(
                    target: "sftp::download",
                    path = remote.path(),
                    "server did not report a type, transferring as a regular file"
                );
                self.download_regular(remote, local)?
            }
            kind => {
                return Err(TransferError::UnsupportedEntry {
                    path: remote.path().to_owned(),
                    kind,
                });
            }
        };

        if self.options.preserves_attributes() {
            copy_attributes(remote, adjusted.as_ref())?;
        }
        Ok(())
    }

    fn download_regular(
        &self,
        remote: &RemoteResourceInfo,
        local: &dyn LocalFile,
    ) -> TransferResult<Box<dyn LocalFile>> {
        let size = remote.attributes().size().unwrap_or(0);
        self.listener.started_file(remote.name(), size);
        let adjusted = self.download_file(remote, local)?;
        self.listener.finished_file();
        Ok(adjusted)
    }

    fn download_dir(
        &self,
        remote: &RemoteResourceInfo,
        local: &dyn LocalFile,
    ) -> TransferResult<Box<dyn LocalFile>> {
        let adjusted = local.target_directory(remote.name())?;
        trace_download!(
            "downloading directory '{}' to '{}'",
            remote.path(),
            adjusted.location()
        );

        let handle = self.engine.open_dir(remote.path())?;
        let mut guard = HandleGuard::new(handle, remote.path());
        let listed = guard
            .handle_mut()
            .scan(self.filter)
            .map_err(TransferError::from)
            .and_then(|entries| {
                for entry in &entries {
                    let child = adjusted.child(entry.name())?;
                    self.download(entry, child.as_ref())?;
                }
                Ok(())
            });
        guard.finish(listed)?;
        Ok(adjusted)
    }

    fn download_file(
        &self,
        remote: &RemoteResourceInfo,
        local: &dyn LocalFile,
    ) -> TransferResult<Box<dyn LocalFile>> {
        let adjusted = local.target_file(remote.name())?;
        trace_download!(
            "downloading file '{}' to '{}'",
            remote.path(),
            adjusted.location()
        );

        let handle = self.engine.open(remote.path(), OpenFlags::READ)?;
        let mut guard = HandleGuard::new(handle, remote.path());
        let copied = self.copy_from(guard.handle_mut(), remote.path(), adjusted.as_ref());
        guard.finish(copied)?;
        Ok(adjusted)
    }

    fn copy_from(
        &self,
        remote: &mut dyn RemoteFile,
        remote_path: &str,
        local: &dyn LocalFile,
    ) -> TransferResult<u64> {
        let buffer_size = self
            .options
            .download_buffer_size(self.engine.local_max_packet_size());
        let mut output = local.output_stream()?;
        let mut input = RemoteFileReader::new(remote);
        StreamCopier::new(buffer_size, self.listener)
            .copy(&mut input, &mut output)
            .map_err(|error| match error {
                CopyError::Read(source) => TransferError::io("read remote file", remote_path, source),
                CopyError::Write(source) => {
                    TransferError::io("write local file", local.location(), source)
                }
            })
    }
}

/// Applies the remote entry's permissions and, when `local` keeps them, its
/// timestamps.
///
/// A server that reports no mode leaves the local permissions untouched.
fn copy_attributes(remote: &RemoteResourceInfo, local: &dyn LocalFile) -> TransferResult<()> {
    let carried = remote.attributes().for_destination(local.preserves_times());
    if carried.has_permissions() {
        local.set_permissions(carried.permissions())?;
    }
    if let Some(times) = carried.times() {
        local.set_last_access_time(times.atime())?;
        local.set_last_modified_time(times.mtime())?;
    }
    Ok(())
}
