use thiserror::Error;

/// Error produced when a rule cannot be compiled into a matcher.
#[derive(Debug, Error)]
#[error("invalid filter pattern '{pattern}': {source}")]
pub struct FilterError {
    pattern: String,
    #[source]
    source: globset::Error,
}

impl FilterError {
    pub(crate) fn new(pattern: String, source: globset::Error) -> Self {
        Self { pattern, source }
    }

    /// Returns the offending pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Error produced when textual rules cannot be parsed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("filter rule on line {line}: {message}")]
pub struct RuleParseError {
    line: usize,
    message: String,
}

impl RuleParseError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    /// One-based line number of the offending rule.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }
}
