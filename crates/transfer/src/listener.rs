//! Transfer progress notifications.
//!
//! The engines call the listener as they walk: `started_dir` before a
//! directory's children, `finished_dir` after the last of them, and
//! `started_file`/`finished_file` around each file's bytes. Notifications
//! nest, so a listener can rebuild the relative path of every entry from
//! the call sequence alone.

use std::sync::{Mutex, PoisonError};

use logging::{trace_progress, trace_transfer};

/// Receives per-entry notifications from uploads and downloads.
pub trait TransferListener: Send + Sync {
    /// A directory named `name` is about to be transferred.
    fn started_dir(&self, name: &str);

    /// The directory most recently started has been fully transferred.
    fn finished_dir(&self);

    /// A file named `name` of `size` bytes is about to be transferred.
    fn started_file(&self, name: &str, size: u64);

    /// The file most recently started has been fully transferred.
    fn finished_file(&self);

    /// `transferred` bytes of the current file have been copied so far.
    fn progress(&self, transferred: u64) {
        let _ = transferred;
    }
}

/// Listener that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl TransferListener for NoopListener {
    fn started_dir(&self, _name: &str) {}

    fn finished_dir(&self) {}

    fn started_file(&self, _name: &str, _size: u64) {}

    fn finished_file(&self) {}
}

#[derive(Debug, Default)]
struct Position {
    dirs: Vec<String>,
    file: Option<(String, u64)>,
}

impl Position {
    fn relative(&self, name: &str) -> String {
        let mut path = self.dirs.join("/");
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(name);
        path
    }
}

/// Listener that reports each entry through `tracing` under the
/// `sftp::transfer` target, naming entries by their path relative to the
/// transfer root.
#[derive(Debug, Default)]
pub struct LoggingTransferListener {
    position: Mutex<Position>,
}

impl LoggingTransferListener {
    /// Creates a listener positioned at the transfer root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_position<T>(&self, f: impl FnOnce(&mut Position) -> T) -> T {
        let mut position = self.position.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut position)
    }
}

impl TransferListener for LoggingTransferListener {
    fn started_dir(&self, name: &str) {
        self.with_position(|position| {
            trace_transfer!("started directory {}", position.relative(name));
            position.dirs.push(name.to_owned());
        });
    }

    fn finished_dir(&self) {
        self.with_position(|position| {
            if let Some(name) = position.dirs.pop() {
                trace_transfer!("finished directory {}", position.relative(&name));
            }
        });
    }

    fn started_file(&self, name: &str, size: u64) {
        self.with_position(|position| {
            let path = position.relative(name);
            trace_transfer!("started file {} ({} bytes)", path, size);
            position.file = Some((path, size));
        });
    }

    fn finished_file(&self) {
        self.with_position(|position| {
            if let Some((path, size)) = position.file.take() {
                trace_transfer!("finished file {} ({} bytes)", path, size);
            }
        });
    }

    fn progress(&self, transferred: u64) {
        self.with_position(|position| {
            if let Some((path, size)) = &position.file {
                trace_progress!("{}: {}/{} bytes", path, transferred, size);
            }
        });
    }
}
