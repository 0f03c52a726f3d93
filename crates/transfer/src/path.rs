//! Remote path decomposition.
//!
//! Remote paths are plain strings joined with `/`. Decomposition is purely
//! textual except for `.` and `..` leaves, which only the server can resolve.

use std::fmt;

use crate::error::{TransferError, TransferResult};
use crate::remote::RemoteEngine;

/// Separator used by SFTP paths.
pub const SEPARATOR: char = '/';

/// A remote path split into its parent and final component.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PathComponents {
    parent: String,
    name: String,
    path: String,
}

impl PathComponents {
    /// Builds components from an already split parent and name.
    #[must_use]
    pub fn new(parent: impl Into<String>, name: impl Into<String>) -> Self {
        let parent = parent.into();
        let name = name.into();
        let path = Self::adjust_for_parent(&parent, &name);
        Self { parent, name, path }
    }

    /// Splits `path` at its last separator, ignoring trailing separators.
    ///
    /// The root path yields an empty parent and the name `/`. A path without
    /// separators yields an empty parent.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InvalidPath`] for the empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use transfer::PathComponents;
    ///
    /// let components = PathComponents::parse("/srv/data/").expect("valid path");
    /// assert_eq!(components.parent(), "/srv");
    /// assert_eq!(components.name(), "data");
    /// assert_eq!(components.path(), "/srv/data");
    /// ```
    pub fn parse(path: &str) -> TransferResult<Self> {
        if path.is_empty() {
            return Err(TransferError::invalid_path(path, "path is empty"));
        }

        let trimmed = path.trim_end_matches(SEPARATOR);
        if trimmed.is_empty() {
            return Ok(Self::new("", SEPARATOR.to_string()));
        }

        Ok(match trimmed.rfind(SEPARATOR) {
            None => Self::new("", trimmed),
            Some(0) => Self::new(SEPARATOR.to_string(), &trimmed[1..]),
            Some(index) => Self::new(&trimmed[..index], &trimmed[index + 1..]),
        })
    }

    /// Joins `name` under `parent`.
    ///
    /// An absolute `name` is returned unchanged and an empty `parent` leaves
    /// `name` relative.
    #[must_use]
    pub fn adjust_for_parent(parent: &str, name: &str) -> String {
        if name.starts_with(SEPARATOR) || parent.is_empty() {
            name.to_owned()
        } else if parent.ends_with(SEPARATOR) {
            format!("{parent}{name}")
        } else {
            format!("{parent}{SEPARATOR}{name}")
        }
    }

    /// Parent path, empty when there is none.
    #[must_use]
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Final component.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path rebuilt from parent and name.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the components of `name` placed under this path.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        Self::new(self.path.clone(), name)
    }
}

impl fmt::Display for PathComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Splits remote paths, asking the server to canonicalise `.` and `..`.
#[derive(Debug)]
pub struct PathHelper<'a, E: RemoteEngine + ?Sized> {
    engine: &'a E,
}

impl<'a, E: RemoteEngine + ?Sized> PathHelper<'a, E> {
    /// Creates a helper bound to `engine`.
    #[must_use]
    pub const fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Decomposes `path`, resolving a `.` or `..` leaf on the server first.
    ///
    /// # Errors
    ///
    /// Fails for the empty path or when canonicalisation is rejected.
    pub fn components(&self, path: &str) -> TransferResult<PathComponents> {
        let components = PathComponents::parse(path)?;
        if matches!(components.name(), "." | "..") {
            let canonical = self.engine.canonicalize(path)?;
            return PathComponents::parse(&canonical);
        }
        Ok(components)
    }
}
