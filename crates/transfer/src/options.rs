/// Smallest copy buffer the engines will use by default.
pub const DEFAULT_MIN_BUFFER_SIZE: usize = 512;

/// Knobs shared by uploads and downloads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransferOptions {
    preserve_attributes: bool,
    min_buffer_size: usize,
}

impl TransferOptions {
    /// Creates options with defaults applied.
    ///
    /// By default permissions and, where the destination supports them,
    /// timestamps are copied onto every transferred entry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            preserve_attributes: true,
            min_buffer_size: DEFAULT_MIN_BUFFER_SIZE,
        }
    }

    /// Requests that permissions and timestamps be copied after each entry.
    #[must_use]
    #[doc(alias = "--perms")]
    #[doc(alias = "--times")]
    pub const fn preserve_attributes(mut self, preserve: bool) -> Self {
        self.preserve_attributes = preserve;
        self
    }

    /// Sets the floor applied to the copy buffer when the negotiated packet
    /// size leaves too little room for payload.
    #[must_use]
    pub const fn min_buffer_size(mut self, size: usize) -> Self {
        self.min_buffer_size = size;
        self
    }

    /// Reports whether attributes are copied.
    #[must_use]
    pub const fn preserves_attributes(&self) -> bool {
        self.preserve_attributes
    }

    /// Returns the copy buffer floor.
    #[must_use]
    pub const fn min_buffer(&self) -> usize {
        self.min_buffer_size
    }

    /// Buffer for writing to a remote file: the server's packet limit minus
    /// the write request framing, but never below the configured floor.
    #[must_use]
    pub fn upload_buffer_size(&self, remote_max_packet_size: u32, overhead: u32) -> usize {
        let payload = remote_max_packet_size.saturating_sub(overhead);
        usize::try_from(payload)
            .unwrap_or(usize::MAX)
            .max(self.min_buffer_size)
    }

    /// Buffer for reading from a remote file: the local packet limit, but
    /// never below the configured floor.
    #[must_use]
    pub fn download_buffer_size(&self, local_max_packet_size: u32) -> usize {
        usize::try_from(local_max_packet_size)
            .unwrap_or(usize::MAX)
            .max(self.min_buffer_size)
    }
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self::new()
    }
}
