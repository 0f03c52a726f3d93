use crate::FilterAction;

/// User-visible filter rule consisting of an action and pattern.
///
/// Pattern syntax:
///
/// - a leading `/` anchors the pattern to the transfer root;
/// - a `/` anywhere else also anchors it;
/// - otherwise the pattern matches at any depth;
/// - a trailing `/` restricts the rule to directories.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterRule {
    pub(crate) action: FilterAction,
    pub(crate) pattern: String,
}

impl FilterRule {
    /// Creates an include rule for `pattern`.
    #[must_use]
    pub fn include(pattern: impl Into<String>) -> Self {
        Self {
            action: FilterAction::Include,
            pattern: pattern.into(),
        }
    }

    /// Creates an exclude rule for `pattern`.
    #[must_use]
    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self {
            action: FilterAction::Exclude,
            pattern: pattern.into(),
        }
    }

    /// Returns the rule action.
    #[must_use]
    pub const fn action(&self) -> FilterAction {
        self.action
    }

    /// Returns the pattern text associated with the rule.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Reports whether the rule only applies to directories.
    #[must_use]
    pub fn is_directory_only(&self) -> bool {
        self.pattern.len() > 1 && self.pattern.ends_with('/')
    }
}
