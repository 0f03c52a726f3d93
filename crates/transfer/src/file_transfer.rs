use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use logging::{trace_download, trace_upload};

use crate::download::Downloader;
use crate::error::{TransferError, TransferResult};
use crate::filter::{LocalFileFilter, RemoteResourceFilter};
use crate::listener::{NoopListener, TransferListener};
use crate::local::{FileSystemFile, LocalFile};
use crate::options::TransferOptions;
use crate::path::PathHelper;
use crate::remote::{RemoteEngine, RemoteResourceInfo};
use crate::upload::Uploader;

/// Recursive upload and download over one SFTP session.
///
/// Each call walks its tree on the calling thread with its own walker, so
/// one value can serve several threads when `E` is shareable. Filters and
/// the listener are read once at the start of a call.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use filters::{FilterRule, FilterSet};
/// use transfer::{GlobFilter, LoggingTransferListener, RemoteEngine, SftpFileTransfer};
///
/// fn mirror<E: RemoteEngine>(session: E) -> transfer::TransferResult<()> {
///     let rules = FilterSet::from_rules([FilterRule::exclude("*.tmp")]).expect("valid rules");
///     let mut transfer = SftpFileTransfer::new(session)
///         .with_listener(Arc::new(LoggingTransferListener::new()));
///     transfer.set_upload_filter(Some(Arc::new(GlobFilter::new(rules))));
///
///     transfer.upload("./site", "/var/www")?;
///     transfer.download("/var/log/app", "./logs")
/// }
/// ```
pub struct SftpFileTransfer<E: RemoteEngine> {
    engine: E,
    listener: Arc<dyn TransferListener>,
    options: TransferOptions,
    upload_filter: Option<Arc<dyn LocalFileFilter>>,
    download_filter: Option<Arc<dyn RemoteResourceFilter>>,
}

impl<E: RemoteEngine> SftpFileTransfer<E> {
    /// Creates a transfer over `engine` with a silent listener, no filters,
    /// and default options.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            listener: Arc::new(NoopListener),
            options: TransferOptions::default(),
            upload_filter: None,
            download_filter: None,
        }
    }

    /// Replaces the listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn TransferListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: TransferOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the listener in place.
    pub fn set_listener(&mut self, listener: Arc<dyn TransferListener>) {
        self.listener = listener;
    }

    /// Current listener.
    #[must_use]
    pub fn listener(&self) -> &Arc<dyn TransferListener> {
        &self.listener
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> TransferOptions {
        self.options
    }

    /// The session transfers run over.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Sets the predicate that prunes local children during uploads.
    pub fn set_upload_filter(&mut self, filter: Option<Arc<dyn LocalFileFilter>>) {
        self.upload_filter = filter;
    }

    /// Current upload filter.
    #[must_use]
    pub fn upload_filter(&self) -> Option<&Arc<dyn LocalFileFilter>> {
        self.upload_filter.as_ref()
    }

    /// Sets the predicate that prunes remote children during downloads.
    pub fn set_download_filter(&mut self, filter: Option<Arc<dyn RemoteResourceFilter>>) {
        self.download_filter = filter;
    }

    /// Current download filter.
    #[must_use]
    pub fn download_filter(&self) -> Option<&Arc<dyn RemoteResourceFilter>> {
        self.download_filter.as_ref()
    }

    /// Uploads the file or directory at `local_path` to `remote_path`.
    ///
    /// # Errors
    ///
    /// Fails when `local_path` cannot be inspected or on the first failure
    /// of the walk.
    pub fn upload(&self, local_path: impl AsRef<Path>, remote_path: &str) -> TransferResult<()> {
        let local_path = local_path.as_ref();
        fs::metadata(local_path).map_err(|error| {
            TransferError::io("inspect local file", local_path.display().to_string(), error)
        })?;
        self.upload_file(&FileSystemFile::new(local_path), remote_path)
    }

    /// Uploads `local` to `remote_path`.
    ///
    /// A missing `remote_path` receives `local` under that name. An existing
    /// directory receives `local` inside it, unless the directory's name is
    /// already `local`'s name, in which case its contents are merged.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the walk; nothing is rolled back.
    pub fn upload_file(&self, local: &dyn LocalFile, remote_path: &str) -> TransferResult<()> {
        trace_upload!("upload of '{}' to '{}' started", local.location(), remote_path);
        Uploader::new(
            &self.engine,
            self.upload_filter.as_deref(),
            self.listener.as_ref(),
            self.options,
        )
        .upload(local, remote_path)?;
        trace_upload!("upload of '{}' to '{}' finished", local.location(), remote_path);
        Ok(())
    }

    /// Downloads `remote_path` to the local path `local_path`.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the walk; nothing is rolled back.
    pub fn download(&self, remote_path: &str, local_path: impl AsRef<Path>) -> TransferResult<()> {
        self.download_to(remote_path, &FileSystemFile::new(local_path.as_ref()))
    }

    /// Downloads `remote_path` into `local`.
    ///
    /// # Errors
    ///
    /// Fails when `remote_path` does not exist, cannot be decomposed, or on
    /// the first failure of the walk.
    pub fn download_to(&self, remote_path: &str, local: &dyn LocalFile) -> TransferResult<()> {
        trace_download!("download of '{}' to '{}' started", remote_path, local.location());
        let components = PathHelper::new(&self.engine).components(remote_path)?;
        let attributes = self.engine.stat(remote_path)?;
        let root = RemoteResourceInfo::new(components, attributes);
        Downloader::new(
            &self.engine,
            self.download_filter.as_deref(),
            self.listener.as_ref(),
            self.options,
        )
        .download(&root, local)?;
        trace_download!("download of '{}' to '{}' finished", remote_path, local.location());
        Ok(())
    }
}

impl<E: RemoteEngine + fmt::Debug> fmt::Debug for SftpFileTransfer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SftpFileTransfer")
            .field("engine", &self.engine)
            .field("options", &self.options)
            .field("upload_filter", &self.upload_filter.is_some())
            .field("download_filter", &self.download_filter.is_some())
            .finish_non_exhaustive()
    }
}
