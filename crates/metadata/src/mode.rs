use std::fmt;

const S_IFMT: u32 = 0o170000;
const S_IFSOCK: u32 = 0o140000;
const S_IFLNK: u32 = 0o120000;
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFDIR: u32 = 0o040000;
const S_IFCHR: u32 = 0o020000;
const S_IFIFO: u32 = 0o010000;

const PERMISSION_BITS: u32 = 0o7777;

/// Type of a filesystem entry as encoded in the `S_IFMT` bits of a mode word.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FileKind {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Block special device.
    BlockSpecial,
    /// Character special device.
    CharSpecial,
    /// Named pipe.
    Fifo,
    /// Unix domain socket.
    Socket,
    /// The server did not report a type, or reported one we do not recognise.
    Unknown,
}

impl FileKind {
    /// Decodes the kind from the `S_IFMT` bits of `mode`.
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFSOCK => Self::Socket,
            S_IFLNK => Self::Symlink,
            S_IFREG => Self::Regular,
            S_IFBLK => Self::BlockSpecial,
            S_IFDIR => Self::Directory,
            S_IFCHR => Self::CharSpecial,
            S_IFIFO => Self::Fifo,
            _ => Self::Unknown,
        }
    }

    /// Returns the `S_IFMT` bits for this kind (`0` for [`FileKind::Unknown`]).
    #[must_use]
    pub const fn type_bits(self) -> u32 {
        match self {
            Self::Socket => S_IFSOCK,
            Self::Symlink => S_IFLNK,
            Self::Regular => S_IFREG,
            Self::BlockSpecial => S_IFBLK,
            Self::Directory => S_IFDIR,
            Self::CharSpecial => S_IFCHR,
            Self::Fifo => S_IFIFO,
            Self::Unknown => 0,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Regular => "regular",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::BlockSpecial => "block special",
            Self::CharSpecial => "char special",
            Self::Fifo => "fifo",
            Self::Socket => "socket",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Raw mode word split into its type and permission halves.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FileMode {
    mask: u32,
}

impl FileMode {
    /// Wraps a raw `st_mode` value.
    #[must_use]
    pub const fn new(mask: u32) -> Self {
        Self { mask }
    }

    /// Builds a mode from an explicit kind and permission mask.
    #[must_use]
    pub const fn from_parts(kind: FileKind, permissions: u32) -> Self {
        Self::new(kind.type_bits() | (permissions & PERMISSION_BITS))
    }

    /// Returns the raw mode word.
    #[must_use]
    pub const fn mask(self) -> u32 {
        self.mask
    }

    /// Returns the decoded entry type.
    #[must_use]
    pub const fn kind(self) -> FileKind {
        FileKind::from_mode(self.mask)
    }

    /// Returns the permission bits, including setuid/setgid/sticky.
    #[must_use]
    pub const fn permissions(self) -> u32 {
        self.mask & PERMISSION_BITS
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:04o}", self.kind(), self.permissions())
    }
}
