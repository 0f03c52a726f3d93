use std::fmt;

/// SFTP version 3 status codes (`SSH_FX_*`).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StatusCode {
    /// `SSH_FX_OK`
    Ok,
    /// `SSH_FX_EOF`
    Eof,
    /// `SSH_FX_NO_SUCH_FILE`
    NoSuchFile,
    /// `SSH_FX_PERMISSION_DENIED`
    PermissionDenied,
    /// `SSH_FX_FAILURE`
    Failure,
    /// `SSH_FX_BAD_MESSAGE`
    BadMessage,
    /// `SSH_FX_NO_CONNECTION`
    NoConnection,
    /// `SSH_FX_CONNECTION_LOST`
    ConnectionLost,
    /// `SSH_FX_OP_UNSUPPORTED`
    OpUnsupported,
    /// A code outside the version 3 table.
    Unknown(u32),
}

impl StatusCode {
    /// Decodes a wire value.
    #[must_use]
    pub const fn from_u32(code: u32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Eof,
            2 => Self::NoSuchFile,
            3 => Self::PermissionDenied,
            4 => Self::Failure,
            5 => Self::BadMessage,
            6 => Self::NoConnection,
            7 => Self::ConnectionLost,
            8 => Self::OpUnsupported,
            other => Self::Unknown(other),
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Ok => 0,
            Self::Eof => 1,
            Self::NoSuchFile => 2,
            Self::PermissionDenied => 3,
            Self::Failure => 4,
            Self::BadMessage => 5,
            Self::NoConnection => 6,
            Self::ConnectionLost => 7,
            Self::OpUnsupported => 8,
            Self::Unknown(other) => other,
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Eof => "end of file",
            Self::NoSuchFile => "no such file",
            Self::PermissionDenied => "permission denied",
            Self::Failure => "failure",
            Self::BadMessage => "bad message",
            Self::NoConnection => "no connection",
            Self::ConnectionLost => "connection lost",
            Self::OpUnsupported => "operation unsupported",
            Self::Unknown(_) => "unknown status",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

/// A failed SFTP request, as reported by the server.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("sftp {code}: {message}")]
pub struct SftpError {
    code: StatusCode,
    message: String,
}

impl SftpError {
    /// Creates an error from a status code and the server's message.
    #[must_use]
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Shorthand for a `NoSuchFile` status naming `path`.
    #[must_use]
    pub fn no_such_file(path: &str) -> Self {
        Self::new(StatusCode::NoSuchFile, format!("no such file '{path}'"))
    }

    /// Returns the status code.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    /// Returns the server-supplied message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Reports whether this is the one status a destination probe treats as
    /// "nothing there yet".
    #[must_use]
    pub const fn is_no_such_file(&self) -> bool {
        matches!(self.code, StatusCode::NoSuchFile)
    }
}
