#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `metadata` models the attributes that accompany a file during an SFTP
//! transfer and provides the helpers that read and apply those attributes on
//! the local filesystem.
//!
//! # Design
//!
//! - [`FileMode`] decodes the raw `st_mode` word reported by a server into a
//!   [`FileKind`] and a permission mask.
//! - [`FileAttributes`] is an immutable snapshot built through
//!   [`FileAttributesBuilder`]. Access and modification times travel as a
//!   single [`AccessTimes`] pair so a half-populated timestamp can never be
//!   represented.
//! - [`FileAttributes::for_destination`] is the one policy that decides which
//!   attributes are copied onto a destination entry. Both transfer
//!   directions use it.
//! - The [`local`] module applies permissions and timestamps to paths on the
//!   local filesystem and reads them back.
//!
//! # Invariants
//!
//! - `has_times()` is `true` iff both access and modification times exist.
//! - Permission masks never carry file-type bits; [`FileMode::permissions`]
//!   strips everything above `0o7777`.
//!
//! # Examples
//!
//! ```
//! use metadata::{FileAttributes, FileKind};
//!
//! let attrs = FileAttributes::builder()
//!     .with_kind(FileKind::Regular)
//!     .with_permissions(0o640)
//!     .with_times(1_700_000_000, 1_700_000_100)
//!     .build();
//!
//! assert_eq!(attrs.permissions(), 0o640);
//! assert!(attrs.has_times());
//!
//! // A destination that cannot keep timestamps only receives permissions.
//! let carried = attrs.for_destination(false);
//! assert_eq!(carried.permissions(), 0o640);
//! assert!(!carried.has_times());
//! ```

mod attributes;
mod error;
pub mod local;
mod mode;

pub use attributes::{AccessTimes, FileAttributes, FileAttributesBuilder};
pub use error::MetadataError;
pub use mode::{FileKind, FileMode};
