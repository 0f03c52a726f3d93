//! Convenience macros that log under the engine's subsystem targets.
//!
//! The target strings match [`crate::LogFlag::target`], so verbosity
//! overrides configured through [`crate::VerbosityConfig`] apply to them.

/// Emit an upload trace.
///
/// # Example
/// ```
/// logging::trace_upload!("uploading {}", "notes.txt");
/// ```
#[macro_export]
macro_rules! trace_upload {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "sftp::upload", $($arg)*)
    };
}

/// Emit a download trace.
///
/// # Example
/// ```
/// logging::trace_download!("downloading {}", "/srv/notes.txt");
/// ```
#[macro_export]
macro_rules! trace_download {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "sftp::download", $($arg)*)
    };
}

/// Emit a destination probing trace.
///
/// # Example
/// ```
/// logging::trace_probe!("probe_dir: {} does not exist, creating", "/srv/new");
/// ```
#[macro_export]
macro_rules! trace_probe {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "sftp::probe", $($arg)*)
    };
}

/// Emit a remote directory listing trace.
///
/// # Example
/// ```
/// logging::trace_listing!("listed {} entries", 3);
/// ```
#[macro_export]
macro_rules! trace_listing {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "sftp::listing", $($arg)*)
    };
}

/// Emit a byte progress trace.
///
/// # Example
/// ```
/// logging::trace_progress!("transferred {} bytes", 4096);
/// ```
#[macro_export]
macro_rules! trace_progress {
    ($($arg:tt)*) => {
        $crate::__tracing::trace!(target: "sftp::progress", $($arg)*)
    };
}

/// Emit a per-entry transfer notification.
///
/// # Example
/// ```
/// logging::trace_transfer!("started file {} ({} bytes)", "a.txt", 12);
/// ```
#[macro_export]
macro_rules! trace_transfer {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "sftp::transfer", $($arg)*)
    };
}
