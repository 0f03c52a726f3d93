//! In-memory [`RemoteEngine`] for tests and downstream fixtures.
//!
//! The engine models a single-user SFTP server over a path-keyed tree.
//! Failures can be injected per operation and path, and every handle it
//! hands out is counted until closed so tests can assert that transfers
//! never leak handles.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use metadata::{AccessTimes, FileAttributes, FileKind, FileMode};

use super::{
    OpenFlags, RemoteDirectory, RemoteEngine, RemoteFile, RemoteHandle, SftpError, StatusCode,
    write_packet_overhead,
};

const DEFAULT_PACKET_SIZE: u32 = 32 * 1024;
const DEFAULT_BATCH_SIZE: usize = 16;
const DEFAULT_FILE_PERMISSIONS: u32 = 0o644;
const DEFAULT_DIR_PERMISSIONS: u32 = 0o755;

/// Remote operations that can be made to fail.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RemoteOperation {
    /// `STAT`
    Stat,
    /// `OPEN`
    Open,
    /// `OPENDIR`
    OpenDir,
    /// `MKDIR`
    MakeDir,
    /// `SETSTAT`
    SetAttributes,
    /// `READ` and `READDIR`
    Read,
    /// `WRITE`
    Write,
    /// `CLOSE`
    Close,
}

#[derive(Clone, Debug)]
enum NodeKind {
    Directory,
    File(Vec<u8>),
    Special(FileKind),
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    permissions: u32,
    times: Option<AccessTimes>,
    hide_type: bool,
}

impl Node {
    const fn new(kind: NodeKind, permissions: u32) -> Self {
        Self {
            kind,
            permissions,
            times: None,
            hide_type: false,
        }
    }

    fn attributes(&self) -> FileAttributes {
        let kind = match (&self.kind, self.hide_type) {
            (_, true) => FileKind::Unknown,
            (NodeKind::Directory, false) => FileKind::Directory,
            (NodeKind::File(_), false) => FileKind::Regular,
            (NodeKind::Special(kind), false) => *kind,
        };
        let mut builder =
            FileAttributes::builder().with_mode(FileMode::from_parts(kind, self.permissions));
        if let NodeKind::File(contents) = &self.kind {
            builder = builder.with_size(contents.len() as u64);
        }
        if let Some(times) = self.times {
            builder = builder.with_access_times(times);
        }
        builder.build()
    }
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<String, Node>,
    failures: HashMap<(RemoteOperation, String), StatusCode>,
    open_handles: usize,
    next_handle: u32,
    created_dirs: Vec<String>,
}

impl State {
    fn check(&self, operation: RemoteOperation, path: &str) -> Result<(), SftpError> {
        match self.failures.get(&(operation, path.to_owned())) {
            Some(code) => Err(SftpError::new(
                *code,
                format!("injected {operation:?} failure on '{path}'"),
            )),
            None => Ok(()),
        }
    }

    fn is_directory(&self, path: &str) -> bool {
        self.nodes
            .get(path)
            .is_some_and(|node| matches!(node.kind, NodeKind::Directory))
    }

    fn insert_with_parents(&mut self, path: String, node: Node) {
        let mut ancestor = parent_of(&path);
        let mut missing = Vec::new();
        while !self.nodes.contains_key(&ancestor) {
            missing.push(ancestor.clone());
            ancestor = parent_of(&ancestor);
        }
        for dir in missing {
            self.nodes.insert(
                dir,
                Node::new(NodeKind::Directory, DEFAULT_DIR_PERMISSIONS),
            );
        }
        self.nodes.insert(path, node);
    }

    fn allocate_handle(&mut self) -> String {
        self.next_handle += 1;
        self.open_handles += 1;
        format!("{:08x}", self.next_handle)
    }

    fn release_handle(&mut self) {
        self.open_handles = self.open_handles.saturating_sub(1);
    }

    fn listing(&self, path: &str) -> Vec<(String, FileAttributes)> {
        let mut entries = Vec::new();
        if let Some(node) = self.nodes.get(path) {
            entries.push((".".to_owned(), node.attributes()));
        }
        if let Some(node) = self.nodes.get(&parent_of(path)) {
            entries.push(("..".to_owned(), node.attributes()));
        }
        entries.extend(
            self.nodes
                .iter()
                .filter(|(key, _)| key.as_str() != "/" && parent_of(key) == path)
                .map(|(key, node)| (name_of(key).to_owned(), node.attributes())),
        );
        entries
    }
}

fn parent_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/".to_owned(),
        Some((parent, _)) => parent.to_owned(),
    }
}

fn name_of(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// An in-memory SFTP server.
///
/// Clones share the same tree, so a test can keep a handle for inspection
/// while a transfer owns another.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-support")]
/// # {
/// use transfer::{MemoryEngine, SftpFileTransfer};
///
/// let engine = MemoryEngine::new();
/// engine.add_file("/srv/report.txt", b"quarterly", 0o640);
///
/// let local = tempfile::tempdir().expect("tempdir");
/// let transfer = SftpFileTransfer::new(engine.clone());
/// transfer
///     .download("/srv/report.txt", local.path())
///     .expect("download");
///
/// let copied = std::fs::read(local.path().join("report.txt")).expect("read");
/// assert_eq!(copied, b"quarterly");
/// assert_eq!(engine.open_handles(), 0);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct MemoryEngine {
    state: Arc<Mutex<State>>,
    home: String,
    local_max_packet_size: u32,
    remote_max_packet_size: u32,
    batch_size: usize,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    /// Creates a server holding only the root directory.
    #[must_use]
    pub fn new() -> Self {
        let mut state = State::default();
        state.nodes.insert(
            "/".to_owned(),
            Node::new(NodeKind::Directory, DEFAULT_DIR_PERMISSIONS),
        );
        Self {
            state: Arc::new(Mutex::new(state)),
            home: "/".to_owned(),
            local_max_packet_size: DEFAULT_PACKET_SIZE,
            remote_max_packet_size: DEFAULT_PACKET_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the directory relative paths resolve against.
    #[must_use]
    pub fn with_home(mut self, home: &str) -> Self {
        self.home = self.resolve(home);
        self
    }

    /// Overrides the negotiated packet sizes.
    #[must_use]
    pub fn with_packet_sizes(mut self, local: u32, remote: u32) -> Self {
        self.local_max_packet_size = local;
        self.remote_max_packet_size = remote;
        self
    }

    /// Sets how many entries each `READDIR` batch returns.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, path: &str) -> String {
        let base = if path.starts_with('/') { "" } else { &self.home };
        let mut segments: Vec<&str> = Vec::new();
        for segment in base.split('/').chain(path.split('/')) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name),
            }
        }
        format!("/{}", segments.join("/"))
    }

    /// Creates a directory, along with any missing parents.
    pub fn add_dir(&self, path: &str, permissions: u32) {
        let path = self.resolve(path);
        self.lock()
            .insert_with_parents(path, Node::new(NodeKind::Directory, permissions));
    }

    /// Creates a regular file, along with any missing parent directories.
    pub fn add_file(&self, path: &str, contents: &[u8], permissions: u32) {
        let path = self.resolve(path);
        self.lock().insert_with_parents(
            path,
            Node::new(NodeKind::File(contents.to_vec()), permissions),
        );
    }

    /// Creates an entry of a kind the engines cannot transfer.
    pub fn add_special(&self, path: &str, kind: FileKind) {
        let path = self.resolve(path);
        self.lock()
            .insert_with_parents(path, Node::new(NodeKind::Special(kind), 0o777));
    }

    /// Sets the timestamps reported for `path`.
    pub fn set_times(&self, path: &str, atime: u32, mtime: u32) {
        let path = self.resolve(path);
        if let Some(node) = self.lock().nodes.get_mut(&path) {
            node.times = Some(AccessTimes::new(atime, mtime));
        }
    }

    /// Makes `STAT` and `READDIR` report `path` without type bits.
    pub fn hide_type(&self, path: &str) {
        let path = self.resolve(path);
        if let Some(node) = self.lock().nodes.get_mut(&path) {
            node.hide_type = true;
        }
    }

    /// Makes `operation` on `path` fail with `code`.
    pub fn fail(&self, operation: RemoteOperation, path: &str, code: StatusCode) {
        let path = self.resolve(path);
        self.lock().failures.insert((operation, path), code);
    }

    /// Shorthand for [`MemoryEngine::fail`] with [`RemoteOperation::Read`].
    pub fn fail_reads(&self, path: &str, code: StatusCode) {
        self.fail(RemoteOperation::Read, path, code);
    }

    /// Removes every injected failure.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Returns the contents of the regular file at `path`.
    #[must_use]
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        let path = self.resolve(path);
        match self.lock().nodes.get(&path).map(|node| &node.kind) {
            Some(NodeKind::File(contents)) => Some(contents.clone()),
            _ => None,
        }
    }

    /// Reports whether anything exists at `path`.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        let path = self.resolve(path);
        self.lock().nodes.contains_key(&path)
    }

    /// Reports whether `path` is a directory.
    #[must_use]
    pub fn is_dir(&self, path: &str) -> bool {
        let path = self.resolve(path);
        self.lock().is_directory(&path)
    }

    /// Returns the permission bits stored for `path`.
    #[must_use]
    pub fn permissions(&self, path: &str) -> Option<u32> {
        let path = self.resolve(path);
        self.lock().nodes.get(&path).map(|node| node.permissions)
    }

    /// Returns the timestamps stored for `path`.
    #[must_use]
    pub fn times(&self, path: &str) -> Option<AccessTimes> {
        let path = self.resolve(path);
        self.lock().nodes.get(&path).and_then(|node| node.times)
    }

    /// Returns the names directly under `path`, sorted.
    #[must_use]
    pub fn children(&self, path: &str) -> Vec<String> {
        let path = self.resolve(path);
        self.lock()
            .listing(&path)
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| name != "." && name != "..")
            .collect()
    }

    /// Directories created through `MKDIR`, in order.
    #[must_use]
    pub fn created_dirs(&self) -> Vec<String> {
        self.lock().created_dirs.clone()
    }

    /// Handles opened and not yet closed.
    #[must_use]
    pub fn open_handles(&self) -> usize {
        self.lock().open_handles
    }
}

impl RemoteEngine for MemoryEngine {
    fn stat(&self, path: &str) -> Result<FileAttributes, SftpError> {
        let path = self.resolve(path);
        let state = self.lock();
        state.check(RemoteOperation::Stat, &path)?;
        state
            .nodes
            .get(&path)
            .map(Node::attributes)
            .ok_or_else(|| SftpError::no_such_file(&path))
    }

    fn open(&self, path: &str, flags: OpenFlags) -> Result<Box<dyn RemoteFile>, SftpError> {
        let path = self.resolve(path);
        let mut state = self.lock();
        state.check(RemoteOperation::Open, &path)?;

        let parent_is_dir = state.is_directory(&parent_of(&path));
        match state.nodes.get_mut(&path) {
            Some(node) => {
                let kind = node.attributes().kind();
                let NodeKind::File(contents) = &mut node.kind else {
                    let message = format!("'{path}' is a {kind}");
                    return Err(SftpError::new(StatusCode::Failure, message));
                };
                if flags.contains(OpenFlags::TRUNCATE) {
                    contents.clear();
                }
            }
            None if flags.contains(OpenFlags::CREATE) && parent_is_dir => {
                state.nodes.insert(
                    path.clone(),
                    Node::new(NodeKind::File(Vec::new()), DEFAULT_FILE_PERMISSIONS),
                );
            }
            None => return Err(SftpError::no_such_file(&path)),
        }

        let handle = state.allocate_handle();
        Ok(Box::new(MemoryFile {
            state: Arc::clone(&self.state),
            path,
            handle,
            open: true,
        }))
    }

    fn open_dir(&self, path: &str) -> Result<Box<dyn RemoteDirectory>, SftpError> {
        let path = self.resolve(path);
        let mut state = self.lock();
        state.check(RemoteOperation::OpenDir, &path)?;
        if !state.nodes.contains_key(&path) {
            return Err(SftpError::no_such_file(&path));
        }
        if !state.is_directory(&path) {
            let message = format!("'{path}' is not a directory");
            return Err(SftpError::new(StatusCode::Failure, message));
        }

        let entries = state.listing(&path).into();
        state.allocate_handle();
        Ok(Box::new(MemoryDirectory {
            state: Arc::clone(&self.state),
            path,
            entries,
            batch_size: self.batch_size,
            open: true,
        }))
    }

    fn make_dir(&self, path: &str) -> Result<(), SftpError> {
        let path = self.resolve(path);
        let mut state = self.lock();
        state.check(RemoteOperation::MakeDir, &path)?;
        if state.nodes.contains_key(&path) {
            let message = format!("'{path}' already exists");
            return Err(SftpError::new(StatusCode::Failure, message));
        }
        if !state.is_directory(&parent_of(&path)) {
            return Err(SftpError::no_such_file(&path));
        }
        state.nodes.insert(
            path.clone(),
            Node::new(NodeKind::Directory, DEFAULT_DIR_PERMISSIONS),
        );
        state.created_dirs.push(path);
        Ok(())
    }

    fn set_attributes(&self, path: &str, attributes: &FileAttributes) -> Result<(), SftpError> {
        let path = self.resolve(path);
        let mut state = self.lock();
        state.check(RemoteOperation::SetAttributes, &path)?;
        let node = state
            .nodes
            .get_mut(&path)
            .ok_or_else(|| SftpError::no_such_file(&path))?;
        if attributes.has_permissions() {
            node.permissions = attributes.permissions();
        }
        if let Some(times) = attributes.times() {
            node.times = Some(times);
        }
        Ok(())
    }

    fn canonicalize(&self, path: &str) -> Result<String, SftpError> {
        Ok(self.resolve(path))
    }

    fn local_max_packet_size(&self) -> u32 {
        self.local_max_packet_size
    }

    fn remote_max_packet_size(&self) -> u32 {
        self.remote_max_packet_size
    }
}

struct MemoryFile {
    state: Arc<Mutex<State>>,
    path: String,
    handle: String,
    open: bool,
}

impl MemoryFile {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn closed_handle(&self) -> SftpError {
        SftpError::new(
            StatusCode::Failure,
            format!("handle {} is closed", self.handle),
        )
    }
}

impl RemoteHandle for MemoryFile {
    fn close(&mut self) -> Result<(), SftpError> {
        if !self.open {
            return Err(self.closed_handle());
        }
        self.open = false;
        let mut state = self.lock();
        state.release_handle();
        state.check(RemoteOperation::Close, &self.path)
    }
}

impl RemoteFile for MemoryFile {
    fn read(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, SftpError> {
        if !self.open {
            return Err(self.closed_handle());
        }
        let state = self.lock();
        state.check(RemoteOperation::Read, &self.path)?;
        let Some(NodeKind::File(contents)) = state.nodes.get(&self.path).map(|node| &node.kind)
        else {
            return Err(SftpError::no_such_file(&self.path));
        };
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(contents.len());
        let available = &contents[start..];
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        Ok(count)
    }

    fn write(&mut self, offset: u64, data: &[u8]) -> Result<(), SftpError> {
        if !self.open {
            return Err(self.closed_handle());
        }
        let path = self.path.clone();
        let mut state = self.lock();
        state.check(RemoteOperation::Write, &path)?;
        let Some(NodeKind::File(contents)) = state.nodes.get_mut(&path).map(|node| &mut node.kind)
        else {
            return Err(SftpError::no_such_file(&path));
        };
        let start = usize::try_from(offset)
            .map_err(|_| SftpError::new(StatusCode::Failure, "offset out of range"))?;
        let end = start + data.len();
        if contents.len() < end {
            contents.resize(end, 0);
        }
        contents[start..end].copy_from_slice(data);
        Ok(())
    }

    fn outgoing_packet_overhead(&self) -> u32 {
        write_packet_overhead(self.handle.len())
    }
}

impl Drop for MemoryFile {
    fn drop(&mut self) {
        if self.open {
            self.lock().release_handle();
        }
    }
}

struct MemoryDirectory {
    state: Arc<Mutex<State>>,
    path: String,
    entries: VecDeque<(String, FileAttributes)>,
    batch_size: usize,
    open: bool,
}

impl MemoryDirectory {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RemoteHandle for MemoryDirectory {
    fn close(&mut self) -> Result<(), SftpError> {
        if !self.open {
            return Err(SftpError::new(StatusCode::Failure, "directory handle is closed"));
        }
        self.open = false;
        let mut state = self.lock();
        state.release_handle();
        state.check(RemoteOperation::Close, &self.path)
    }
}

impl RemoteDirectory for MemoryDirectory {
    fn path(&self) -> &str {
        &self.path
    }

    fn read_batch(&mut self) -> Result<Option<Vec<(String, FileAttributes)>>, SftpError> {
        self.lock().check(RemoteOperation::Read, &self.path)?;
        if self.entries.is_empty() {
            return Ok(None);
        }
        let count = self.batch_size.min(self.entries.len());
        Ok(Some(self.entries.drain(..count).collect()))
    }
}

impl Drop for MemoryDirectory {
    fn drop(&mut self) {
        if self.open {
            self.lock().release_handle();
        }
    }
}
