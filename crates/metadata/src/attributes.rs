use crate::mode::{FileKind, FileMode};

/// Access and modification times, in seconds since the Unix epoch.
///
/// SFTP version 3 carries both stamps together (`SSH_FILEXFER_ATTR_ACMODTIME`),
/// so they are modelled as one value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AccessTimes {
    atime: u32,
    mtime: u32,
}

impl AccessTimes {
    /// Creates a new pair.
    #[must_use]
    pub const fn new(atime: u32, mtime: u32) -> Self {
        Self { atime, mtime }
    }

    /// Last access time.
    #[must_use]
    pub const fn atime(self) -> u32 {
        self.atime
    }

    /// Last modification time.
    #[must_use]
    pub const fn mtime(self) -> u32 {
        self.mtime
    }
}

/// Immutable attribute snapshot describing one file or directory.
///
/// Every field is optional because servers are free to omit any of them.
/// Use [`FileAttributes::builder`] to construct values.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileAttributes {
    mode: Option<FileMode>,
    size: Option<u64>,
    owner: Option<(u32, u32)>,
    times: Option<AccessTimes>,
    extended: Vec<(String, String)>,
}

impl FileAttributes {
    /// Starts a new builder with no attributes set.
    #[must_use]
    pub fn builder() -> FileAttributesBuilder {
        FileAttributesBuilder::default()
    }

    /// Returns the full mode word, if reported.
    #[must_use]
    pub const fn mode(&self) -> Option<FileMode> {
        self.mode
    }

    /// Returns the entry type. Missing mode information yields
    /// [`FileKind::Unknown`].
    #[must_use]
    pub fn kind(&self) -> FileKind {
        self.mode.map_or(FileKind::Unknown, FileMode::kind)
    }

    /// Reports whether permission bits were supplied.
    #[must_use]
    pub const fn has_permissions(&self) -> bool {
        self.mode.is_some()
    }

    /// Returns the permission bits, or `0` when no mode was supplied.
    #[must_use]
    pub fn permissions(&self) -> u32 {
        self.mode.map_or(0, FileMode::permissions)
    }

    /// Returns the size in bytes, if reported.
    #[must_use]
    pub const fn size(&self) -> Option<u64> {
        self.size
    }

    /// Returns `(uid, gid)`, if reported.
    #[must_use]
    pub const fn owner(&self) -> Option<(u32, u32)> {
        self.owner
    }

    /// Returns the access/modification pair, if reported.
    #[must_use]
    pub const fn times(&self) -> Option<AccessTimes> {
        self.times
    }

    /// Reports whether both access and modification times are present.
    #[must_use]
    pub const fn has_times(&self) -> bool {
        self.times.is_some()
    }

    /// Returns the extended `(type, data)` pairs.
    #[must_use]
    pub fn extended(&self) -> &[(String, String)] {
        &self.extended
    }

    /// Selects the attributes that should be copied onto a destination entry.
    ///
    /// Permissions are always carried when known. Timestamps are carried only
    /// when the destination can preserve them and this snapshot has a valid
    /// pair. Size, ownership, and extended data never propagate.
    #[must_use]
    pub fn for_destination(&self, preserves_times: bool) -> Self {
        let mut builder = Self::builder();
        if let Some(mode) = self.mode {
            builder = builder.with_permissions(mode.permissions());
        }
        if preserves_times && let Some(times) = self.times {
            builder = builder.with_access_times(times);
        }
        builder.build()
    }
}

/// Builder for [`FileAttributes`].
#[derive(Clone, Debug, Default)]
pub struct FileAttributesBuilder {
    attributes: FileAttributes,
}

impl FileAttributesBuilder {
    /// Sets the permission bits while keeping any kind already configured.
    #[must_use]
    pub fn with_permissions(mut self, permissions: u32) -> Self {
        let kind = self.attributes.kind();
        self.attributes.mode = Some(FileMode::from_parts(kind, permissions));
        self
    }

    /// Sets the entry kind while keeping any permissions already configured.
    #[must_use]
    pub fn with_kind(mut self, kind: FileKind) -> Self {
        let permissions = self.attributes.permissions();
        self.attributes.mode = Some(FileMode::from_parts(kind, permissions));
        self
    }

    /// Sets the full raw mode word.
    #[must_use]
    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.attributes.mode = Some(mode);
        self
    }

    /// Sets the size in bytes.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.attributes.size = Some(size);
        self
    }

    /// Sets the numeric owner and group.
    #[must_use]
    pub fn with_owner(mut self, uid: u32, gid: u32) -> Self {
        self.attributes.owner = Some((uid, gid));
        self
    }

    /// Sets access and modification times.
    #[must_use]
    pub fn with_times(self, atime: u32, mtime: u32) -> Self {
        self.with_access_times(AccessTimes::new(atime, mtime))
    }

    /// Sets access and modification times from an existing pair.
    #[must_use]
    pub fn with_access_times(mut self, times: AccessTimes) -> Self {
        self.attributes.times = Some(times);
        self
    }

    /// Appends an extended attribute pair.
    #[must_use]
    pub fn with_extended(mut self, kind: impl Into<String>, data: impl Into<String>) -> Self {
        self.attributes.extended.push((kind.into(), data.into()));
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> FileAttributes {
        self.attributes
    }
}
