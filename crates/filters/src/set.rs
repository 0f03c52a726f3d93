use std::path::Path;
use std::sync::Arc;

use crate::{FilterAction, FilterError, FilterRule, compiled::CompiledRule};

/// Compiled, immutable collection of filter rules for fast path matching.
///
/// Rules are evaluated in definition order and the first matching rule
/// decides. A path that matches no rule is included.
///
/// `FilterSet` is cheaply cloneable (the compiled rules live behind an
/// [`Arc`]), so one set can serve as both the upload and the download filter.
///
/// # Examples
///
/// ```
/// use filters::{FilterRule, FilterSet};
/// use std::path::Path;
///
/// let set = FilterSet::from_rules([
///     FilterRule::include("keep.o"),
///     FilterRule::exclude("*.o"),
/// ]).unwrap();
///
/// assert!(set.allows(Path::new("keep.o"), false));
/// assert!(!set.allows(Path::new("main.o"), false));
/// assert!(set.allows(Path::new("README.md"), false));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FilterSet {
    rules: Arc<Vec<CompiledRule>>,
}

impl FilterSet {
    /// Builds a [`FilterSet`] from the supplied rules.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if any rule's pattern cannot be compiled into a
    /// valid glob matcher.
    pub fn from_rules<I>(rules: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = FilterRule>,
    {
        let compiled = rules
            .into_iter()
            .map(CompiledRule::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules: Arc::new(compiled),
        })
    }

    /// Returns `true` if the set contains no rules. An empty set allows every path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the number of compiled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns the action of the first rule matching `path`, if any.
    #[must_use]
    pub fn matching_action(&self, path: &Path, is_dir: bool) -> Option<FilterAction> {
        self.rules
            .iter()
            .find(|rule| rule.matches(path, is_dir))
            .map(|rule| rule.action)
    }

    /// Returns `true` if the path should be transferred.
    ///
    /// `is_dir` should be `true` when the path refers to a directory, which
    /// affects directory-only rules (patterns with a trailing `/`).
    #[must_use]
    pub fn allows(&self, path: &Path, is_dir: bool) -> bool {
        !matches!(
            self.matching_action(path, is_dir),
            Some(FilterAction::Exclude)
        )
    }
}
