//! Global subscriber installation.

use tracing_subscriber::EnvFilter;

use crate::config::VerbosityConfig;

/// Error returned when a global subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs a `fmt` subscriber filtered by `config`.
///
/// A `RUST_LOG` value in the environment takes precedence over `config`, so
/// operators can widen logging without a rebuild.
///
/// # Examples
///
/// ```
/// use logging::{VerbosityConfig, init_tracing};
///
/// let first = init_tracing(&VerbosityConfig::from_verbose_level(1));
/// let second = init_tracing(&VerbosityConfig::default());
/// assert!(first.is_ok());
/// assert!(second.is_err());
/// ```
pub fn init_tracing(config: &VerbosityConfig) -> Result<(), InitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.env_filter());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
}
