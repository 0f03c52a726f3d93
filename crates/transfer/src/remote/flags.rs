use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// `SSH_FXF_*` open flags.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct OpenFlags(u32);

impl OpenFlags {
    /// `SSH_FXF_READ`
    pub const READ: Self = Self(0x0000_0001);
    /// `SSH_FXF_WRITE`
    pub const WRITE: Self = Self(0x0000_0002);
    /// `SSH_FXF_APPEND`
    pub const APPEND: Self = Self(0x0000_0004);
    /// `SSH_FXF_CREAT`
    pub const CREATE: Self = Self(0x0000_0008);
    /// `SSH_FXF_TRUNC`
    pub const TRUNCATE: Self = Self(0x0000_0010);
    /// `SSH_FXF_EXCL`
    pub const EXCLUSIVE: Self = Self(0x0000_0020);

    /// Flags used for upload targets: write, create, truncate.
    pub const UPLOAD: Self = Self(Self::WRITE.0 | Self::CREATE.0 | Self::TRUNCATE.0);

    /// Wraps raw wire bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw wire bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Reports whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OpenFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for OpenFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for OpenFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(OpenFlags, &str); 6] = [
            (OpenFlags::READ, "READ"),
            (OpenFlags::WRITE, "WRITE"),
            (OpenFlags::APPEND, "APPEND"),
            (OpenFlags::CREATE, "CREAT"),
            (OpenFlags::TRUNCATE, "TRUNC"),
            (OpenFlags::EXCLUSIVE, "EXCL"),
        ];

        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("NONE")?;
        }
        Ok(())
    }
}
