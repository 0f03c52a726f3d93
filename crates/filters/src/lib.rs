#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` provides ordered include/exclude pattern evaluation used to
//! prune the trees walked by the SFTP transfer engine. Patterns honour
//! anchored matches (leading or inner `/`), directory-only rules (trailing
//! `/`), and recursive wildcards.
//!
//! # Design
//!
//! - [`FilterRule`] captures the action and pattern text.
//! - [`FilterSet`] owns the compiled matchers and answers
//!   [`FilterSet::allows`].
//! - [`parse_rules`] reads the `+ PATTERN` / `- PATTERN` text form.
//!
//! # Invariants
//!
//! - Rules are evaluated in definition order; the first matching rule wins.
//! - A path matching no rule is included.
//! - Unanchored patterns match at any depth.
//!
//! # Errors
//!
//! [`FilterSet::from_rules`] reports [`FilterError`] when a pattern is not a
//! valid glob. [`parse_rules`] reports [`RuleParseError`] with the line
//! number of a malformed rule.
//!
//! # Examples
//!
//! ```
//! use filters::{FilterRule, FilterSet};
//! use std::path::Path;
//!
//! let rules = [
//!     FilterRule::exclude("*.swp"),
//!     FilterRule::exclude(".git/"),
//! ];
//! let filters = FilterSet::from_rules(rules).expect("filters compile");
//!
//! assert!(filters.allows(Path::new("notes.txt"), false));
//! assert!(!filters.allows(Path::new("scratch.swp"), false));
//! assert!(!filters.allows(Path::new(".git"), true));
//! assert!(filters.allows(Path::new(".git"), false));
//! ```

mod action;
mod compiled;
mod error;
mod parse;
mod rule;
mod set;

pub use action::FilterAction;
pub use error::{FilterError, RuleParseError};
pub use parse::parse_rules;
pub use rule::FilterRule;
pub use set::FilterSet;
