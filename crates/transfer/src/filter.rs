//! Predicates that prune recursive transfers.
//!
//! A rejected entry is skipped together with everything below it. Closures
//! implement both traits, and [`GlobFilter`] adapts a compiled
//! [`filters::FilterSet`] by matching each entry's name.

use std::path::Path;

use filters::FilterSet;

use crate::local::LocalFile;
use crate::remote::RemoteResourceInfo;

/// Decides which local children an upload visits.
pub trait LocalFileFilter: Send + Sync {
    /// Returns `true` to transfer `file`.
    fn accept(&self, file: &dyn LocalFile) -> bool;
}

/// Decides which remote children a download visits.
pub trait RemoteResourceFilter: Send + Sync {
    /// Returns `true` to transfer `resource`.
    fn accept(&self, resource: &RemoteResourceInfo) -> bool;
}

impl<F> LocalFileFilter for F
where
    F: Fn(&dyn LocalFile) -> bool + Send + Sync,
{
    fn accept(&self, file: &dyn LocalFile) -> bool {
        self(file)
    }
}

impl<F> RemoteResourceFilter for F
where
    F: Fn(&RemoteResourceInfo) -> bool + Send + Sync,
{
    fn accept(&self, resource: &RemoteResourceInfo) -> bool {
        self(resource)
    }
}

/// Include/exclude glob rules applied to entry names.
///
/// Rules only ever see an entry's bare name, never its path below the
/// transfer root. A rule whose pattern keeps a `/` after the leading anchor
/// (`a/b`) therefore never matches, and a leading `/` matches the name at
/// every depth. Use a closure filter for path-aware decisions.
///
/// # Examples
///
/// ```
/// use filters::{FilterRule, FilterSet};
/// use transfer::GlobFilter;
///
/// let rules = FilterSet::from_rules([FilterRule::exclude("*.tmp")]).expect("valid rules");
/// let filter = GlobFilter::new(rules);
/// assert!(!filter.allows_name("scratch.tmp", false));
/// assert!(filter.allows_name("report.pdf", false));
/// ```
#[derive(Clone, Debug, Default)]
pub struct GlobFilter {
    rules: FilterSet,
}

impl GlobFilter {
    /// Wraps a compiled rule set.
    #[must_use]
    pub const fn new(rules: FilterSet) -> Self {
        Self { rules }
    }

    /// Returns the wrapped rules.
    #[must_use]
    pub const fn rules(&self) -> &FilterSet {
        &self.rules
    }

    /// Evaluates the rules against a bare entry name.
    #[must_use]
    pub fn allows_name(&self, name: &str, is_directory: bool) -> bool {
        self.rules.allows(Path::new(name), is_directory)
    }
}

impl From<FilterSet> for GlobFilter {
    fn from(rules: FilterSet) -> Self {
        Self::new(rules)
    }
}

impl LocalFileFilter for GlobFilter {
    fn accept(&self, file: &dyn LocalFile) -> bool {
        self.allows_name(&file.name(), file.is_directory())
    }
}

impl RemoteResourceFilter for GlobFilter {
    fn accept(&self, resource: &RemoteResourceInfo) -> bool {
        self.allows_name(resource.name(), resource.is_directory())
    }
}
