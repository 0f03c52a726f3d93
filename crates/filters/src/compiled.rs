use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};

use crate::{FilterAction, FilterError, FilterRule};

/// A [`FilterRule`] with its pattern compiled into a glob matcher.
#[derive(Clone, Debug)]
pub(crate) struct CompiledRule {
    pub(crate) action: FilterAction,
    directory_only: bool,
    matcher: GlobMatcher,
}

impl CompiledRule {
    pub(crate) fn new(rule: FilterRule) -> Result<Self, FilterError> {
        let directory_only = rule.is_directory_only();
        let mut body = rule.pattern.as_str();
        if directory_only {
            body = body.trim_end_matches('/');
        }

        let anchored = body.contains('/');
        let body = body.trim_start_matches('/');
        let expression = if anchored {
            body.to_owned()
        } else {
            format!("**/{body}")
        };

        let matcher = GlobBuilder::new(&expression)
            .literal_separator(true)
            .build()
            .map_err(|error| FilterError::new(rule.pattern.clone(), error))?
            .compile_matcher();

        Ok(Self {
            action: rule.action,
            directory_only,
            matcher,
        })
    }

    pub(crate) fn matches(&self, path: &Path, is_dir: bool) -> bool {
        (!self.directory_only || is_dir) && self.matcher.is_match(path)
    }
}
