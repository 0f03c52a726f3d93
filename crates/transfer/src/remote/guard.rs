use tracing::warn;

use super::{RemoteHandle, SftpError};
use crate::error::{TransferError, TransferResult};

/// Owns an open remote handle and closes it on every exit path.
///
/// [`HandleGuard::finish`] is the normal exit: a failed close after a
/// successful copy becomes the result, while a failed close after a failed
/// copy is logged and the copy's error is returned. Dropping an unfinished
/// guard (early return, panic) still closes the handle.
pub(crate) struct HandleGuard<H: RemoteHandle + ?Sized> {
    handle: Box<H>,
    path: String,
    closed: bool,
}

impl<H: RemoteHandle + ?Sized> HandleGuard<H> {
    pub(crate) fn new(handle: Box<H>, path: impl Into<String>) -> Self {
        Self {
            handle,
            path: path.into(),
            closed: false,
        }
    }

    pub(crate) fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    fn close(&mut self) -> Result<(), SftpError> {
        self.closed = true;
        self.handle.close()
    }

    /// Closes the handle and merges the close status into `result`.
    pub(crate) fn finish<T>(mut self, result: TransferResult<T>) -> TransferResult<T> {
        let closed = self.close();
        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(error)) => Err(TransferError::Remote(error)),
            (Err(error), Ok(())) => Err(error),
            (Err(error), Err(close_error)) => {
                warn!(
                    path = %self.path,
                    error = %close_error,
                    "failed to close remote handle after an earlier failure"
                );
                Err(error)
            }
        }
    }
}

impl<H: RemoteHandle + ?Sized> Drop for HandleGuard<H> {
    fn drop(&mut self) {
        if !self.closed
            && let Err(error) = self.close()
        {
            warn!(path = %self.path, %error, "failed to close remote handle");
        }
    }
}
