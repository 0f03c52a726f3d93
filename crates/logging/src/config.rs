//! Verbosity configuration mapped onto tracing filter directives.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Subsystems that log under their own tracing target.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LogFlag {
    /// Local-to-remote transfers.
    Upload,
    /// Remote-to-local transfers.
    Download,
    /// Destination probing and conflict resolution.
    Probe,
    /// Remote directory listings.
    Listing,
    /// Byte-level copy progress.
    Progress,
    /// Per-entry start/finish notifications.
    Transfer,
}

impl LogFlag {
    /// Every flag, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Upload,
        Self::Download,
        Self::Probe,
        Self::Listing,
        Self::Progress,
        Self::Transfer,
    ];

    /// Returns the tracing target used by this subsystem.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Upload => "sftp::upload",
            Self::Download => "sftp::download",
            Self::Probe => "sftp::probe",
            Self::Listing => "sftp::listing",
            Self::Progress => "sftp::progress",
            Self::Transfer => "sftp::transfer",
        }
    }
}

/// Serialisable log level, with `Off` to silence a target.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Verbosity {
    /// Nothing is logged.
    Off,
    /// Errors only.
    Error,
    /// Warnings and errors.
    #[default]
    Warn,
    /// Informational messages.
    Info,
    /// Debug diagnostics.
    Debug,
    /// Everything.
    Trace,
}

impl Verbosity {
    const fn as_directive(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

/// Base level plus per-subsystem overrides.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Level applied to every target without an override.
    pub base: Verbosity,
    /// Per-subsystem overrides, last entry for a flag wins.
    pub overrides: Vec<(LogFlag, Verbosity)>,
}

impl VerbosityConfig {
    /// Creates a configuration from a `-v` count.
    ///
    /// - `0`: warnings only
    /// - `1`: transfer and per-entry start/finish messages
    /// - `2`: adds probing and listing diagnostics
    /// - `3+`: adds byte progress and raises the base to `debug`
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        if level >= 1 {
            config = config
                .with_flag(LogFlag::Upload, Verbosity::Info)
                .with_flag(LogFlag::Download, Verbosity::Info)
                .with_flag(LogFlag::Transfer, Verbosity::Info);
        }
        if level >= 2 {
            config = config
                .with_flag(LogFlag::Upload, Verbosity::Debug)
                .with_flag(LogFlag::Download, Verbosity::Debug)
                .with_flag(LogFlag::Probe, Verbosity::Debug)
                .with_flag(LogFlag::Listing, Verbosity::Debug);
        }
        if level >= 3 {
            config = config
                .with_base(Verbosity::Debug)
                .with_flag(LogFlag::Progress, Verbosity::Trace);
        }

        config
    }

    /// Sets the base level. Overrides quieter than the new base are dropped
    /// so no target ends up below it.
    #[must_use]
    pub fn with_base(mut self, base: Verbosity) -> Self {
        self.base = base;
        self.overrides.retain(|(_, verbosity)| *verbosity > base);
        self
    }

    /// Adds or replaces the override for `flag`.
    #[must_use]
    pub fn with_flag(mut self, flag: LogFlag, verbosity: Verbosity) -> Self {
        self.overrides.retain(|(existing, _)| *existing != flag);
        self.overrides.push((flag, verbosity));
        self
    }

    /// Returns the effective level for `flag`.
    #[must_use]
    pub fn level_for(&self, flag: LogFlag) -> Verbosity {
        self.overrides
            .iter()
            .rev()
            .find(|(existing, _)| *existing == flag)
            .map_or(self.base, |(_, verbosity)| *verbosity)
    }

    /// Renders the configuration as `EnvFilter` directive text.
    #[must_use]
    pub fn directives(&self) -> String {
        let mut directives = self.base.as_directive().to_owned();
        for flag in LogFlag::ALL {
            let level = self.level_for(flag);
            if level != self.base {
                directives.push(',');
                directives.push_str(flag.target());
                directives.push('=');
                directives.push_str(level.as_directive());
            }
        }
        directives
    }

    /// Builds the [`EnvFilter`] described by this configuration.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::new(self.directives())
    }
}
