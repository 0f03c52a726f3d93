#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` wires the transfer engine into the [`tracing`] ecosystem. Every
//! subsystem logs under its own target (`sftp::upload`, `sftp::probe`, ...)
//! through the macros exported here, and [`VerbosityConfig`] turns a `-v`
//! style count into per-target [`tracing_subscriber::EnvFilter`] directives.
//!
//! # Design
//!
//! - [`LogFlag`] enumerates the subsystems and their targets.
//! - [`Verbosity`] is a serialisable mirror of [`tracing::Level`] plus `Off`.
//! - [`VerbosityConfig`] holds a base level and per-flag overrides.
//! - [`init_tracing`] installs a `fmt` subscriber. It is safe to call more
//!   than once; later calls report that a subscriber already exists.
//!
//! # Examples
//!
//! ```
//! use logging::{LogFlag, Verbosity, VerbosityConfig};
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! assert_eq!(config.level_for(LogFlag::Probe), Verbosity::Debug);
//! assert!(config.directives().contains("sftp::probe=debug"));
//! ```

mod config;
mod subscriber;
mod tracing_macros;

pub use config::{LogFlag, Verbosity, VerbosityConfig};
pub use subscriber::{InitError, init_tracing};

#[doc(hidden)]
pub use tracing as __tracing;
