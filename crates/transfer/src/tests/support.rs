use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, PoisonError};

use metadata::FileKind;

use crate::{
    LocalFile, LocalFileFilter, MemoryEngine, SftpFileTransfer, TransferError, TransferListener,
    TransferResult,
};

/// A listener notification, minus progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Event {
    StartedDir(String),
    FinishedDir,
    StartedFile(String, u64),
    FinishedFile,
}

/// Records every notification so tests can assert on their order.
#[derive(Debug, Default)]
pub(super) struct RecordingListener {
    events: Mutex<Vec<Event>>,
    progress: Mutex<Vec<u64>>,
}

impl RecordingListener {
    pub(super) fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(super) fn progress(&self) -> Vec<u64> {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl TransferListener for RecordingListener {
    fn started_dir(&self, name: &str) {
        self.push(Event::StartedDir(name.to_owned()));
    }

    fn finished_dir(&self) {
        self.push(Event::FinishedDir);
    }

    fn started_file(&self, name: &str, size: u64) {
        self.push(Event::StartedFile(name.to_owned(), size));
    }

    fn finished_file(&self) {
        self.push(Event::FinishedFile);
    }

    fn progress(&self, transferred: u64) {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(transferred);
    }
}

pub(super) fn dir(name: &str) -> Event {
    Event::StartedDir(name.to_owned())
}

pub(super) fn file(name: &str, size: u64) -> Event {
    Event::StartedFile(name.to_owned(), size)
}

/// A transfer over `engine` that records into the returned listener.
pub(super) fn recording(
    engine: &MemoryEngine,
) -> (SftpFileTransfer<MemoryEngine>, Arc<RecordingListener>) {
    let listener = Arc::new(RecordingListener::default());
    let transfer = SftpFileTransfer::new(engine.clone()).with_listener(listener.clone());
    (transfer, listener)
}

/// A local entry that is neither a file nor a directory, such as a socket.
pub(super) struct SocketLike;

impl LocalFile for SocketLike {
    fn name(&self) -> String {
        "agent.sock".to_owned()
    }

    fn location(&self) -> String {
        "/run/agent.sock".to_owned()
    }

    fn is_file(&self) -> bool {
        false
    }

    fn is_directory(&self) -> bool {
        false
    }

    fn length(&self) -> TransferResult<u64> {
        Ok(0)
    }

    fn children(
        &self,
        _filter: Option<&dyn LocalFileFilter>,
    ) -> TransferResult<Vec<Box<dyn LocalFile>>> {
        Ok(Vec::new())
    }

    fn child(&self, name: &str) -> TransferResult<Box<dyn LocalFile>> {
        Err(TransferError::invalid_path(name, "not a directory"))
    }

    fn input_stream(&self) -> TransferResult<Box<dyn Read>> {
        Ok(Box::new(io::empty()))
    }

    fn output_stream(&self) -> TransferResult<Box<dyn Write>> {
        Ok(Box::new(io::sink()))
    }

    fn permissions(&self) -> TransferResult<u32> {
        Ok(0o600)
    }

    fn set_permissions(&self, _permissions: u32) -> TransferResult<()> {
        Ok(())
    }

    fn preserves_times(&self) -> bool {
        false
    }

    fn last_access_time(&self) -> TransferResult<u32> {
        Ok(0)
    }

    fn last_modified_time(&self) -> TransferResult<u32> {
        Ok(0)
    }

    fn set_last_access_time(&self, _time: u32) -> TransferResult<()> {
        Ok(())
    }

    fn set_last_modified_time(&self, _time: u32) -> TransferResult<()> {
        Ok(())
    }

    fn target_directory(&self, _name: &str) -> TransferResult<Box<dyn LocalFile>> {
        Err(TransferError::conflict(self.location(), FileKind::Socket))
    }

    fn target_file(&self, _name: &str) -> TransferResult<Box<dyn LocalFile>> {
        Err(TransferError::conflict(self.location(), FileKind::Socket))
    }
}

/// Wraps another [`LocalFile`], records which calls reach it, and can
/// claim not to keep timestamps.
pub(super) struct TrackedFile {
    inner: Box<dyn LocalFile>,
    keeps_times: bool,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl TrackedFile {
    pub(super) fn new(inner: impl LocalFile + 'static, keeps_times: bool) -> Self {
        Self {
            inner: Box::new(inner),
            keeps_times,
            calls: Arc::default(),
        }
    }

    pub(super) fn calls(&self) -> Vec<&'static str> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: &'static str) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn wrap(&self, inner: Box<dyn LocalFile>) -> Box<dyn LocalFile> {
        Box::new(Self {
            inner,
            keeps_times: self.keeps_times,
            calls: Arc::clone(&self.calls),
        })
    }
}

impl LocalFile for TrackedFile {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn location(&self) -> String {
        self.inner.location()
    }

    fn is_file(&self) -> bool {
        self.inner.is_file()
    }

    fn is_directory(&self) -> bool {
        self.inner.is_directory()
    }

    fn length(&self) -> TransferResult<u64> {
        self.inner.length()
    }

    fn children(
        &self,
        filter: Option<&dyn LocalFileFilter>,
    ) -> TransferResult<Vec<Box<dyn LocalFile>>> {
        let children = self.inner.children(filter)?;
        Ok(children.into_iter().map(|child| self.wrap(child)).collect())
    }

    fn child(&self, name: &str) -> TransferResult<Box<dyn LocalFile>> {
        Ok(self.wrap(self.inner.child(name)?))
    }

    fn input_stream(&self) -> TransferResult<Box<dyn Read>> {
        self.record("input_stream");
        self.inner.input_stream()
    }

    fn output_stream(&self) -> TransferResult<Box<dyn Write>> {
        self.record("output_stream");
        self.inner.output_stream()
    }

    fn permissions(&self) -> TransferResult<u32> {
        self.inner.permissions()
    }

    fn set_permissions(&self, permissions: u32) -> TransferResult<()> {
        self.record("set_permissions");
        self.inner.set_permissions(permissions)
    }

    fn preserves_times(&self) -> bool {
        self.keeps_times
    }

    fn last_access_time(&self) -> TransferResult<u32> {
        self.record("last_access_time");
        self.inner.last_access_time()
    }

    fn last_modified_time(&self) -> TransferResult<u32> {
        self.record("last_modified_time");
        self.inner.last_modified_time()
    }

    fn set_last_access_time(&self, time: u32) -> TransferResult<()> {
        self.record("set_last_access_time");
        self.inner.set_last_access_time(time)
    }

    fn set_last_modified_time(&self, time: u32) -> TransferResult<()> {
        self.record("set_last_modified_time");
        self.inner.set_last_modified_time(time)
    }

    fn target_directory(&self, name: &str) -> TransferResult<Box<dyn LocalFile>> {
        Ok(self.wrap(self.inner.target_directory(name)?))
    }

    fn target_file(&self, name: &str) -> TransferResult<Box<dyn LocalFile>> {
        Ok(self.wrap(self.inner.target_file(name)?))
    }
}
