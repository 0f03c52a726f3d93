use std::fmt;

use metadata::{FileAttributes, FileKind};

use crate::path::PathComponents;

/// A remote entry together with the attributes the server reported for it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteResourceInfo {
    components: PathComponents,
    attributes: FileAttributes,
}

impl RemoteResourceInfo {
    /// Pairs a path with its attributes.
    #[must_use]
    pub const fn new(components: PathComponents, attributes: FileAttributes) -> Self {
        Self {
            components,
            attributes,
        }
    }

    /// Full remote path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.components.path()
    }

    /// Final path component.
    #[must_use]
    pub fn name(&self) -> &str {
        self.components.name()
    }

    /// Parent path.
    #[must_use]
    pub fn parent(&self) -> &str {
        self.components.parent()
    }

    /// Decomposed path.
    #[must_use]
    pub const fn components(&self) -> &PathComponents {
        &self.components
    }

    /// Reported attributes.
    #[must_use]
    pub const fn attributes(&self) -> &FileAttributes {
        &self.attributes
    }

    /// Reported entry kind; [`FileKind::Unknown`] when the server omitted it.
    #[must_use]
    pub fn kind(&self) -> FileKind {
        self.attributes.kind()
    }

    /// Reports whether the server says this is a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind() == FileKind::Directory
    }

    /// Reports whether the server says this is a regular file.
    #[must_use]
    pub fn is_regular_file(&self) -> bool {
        self.kind() == FileKind::Regular
    }
}

impl fmt::Display for RemoteResourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path(), self.kind())
    }
}
