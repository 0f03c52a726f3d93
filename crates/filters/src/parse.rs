//! Textual rule syntax.
//!
//! One rule per line. `+ PATTERN` or `include PATTERN` includes,
//! `- PATTERN` or `exclude PATTERN` excludes. Blank lines and lines starting
//! with `#` or `;` are ignored.

use crate::{FilterRule, RuleParseError};

/// Parses newline-separated rules.
///
/// # Examples
///
/// ```
/// use filters::{FilterAction, parse_rules};
///
/// let rules = parse_rules("# keep sources\n+ *.rs\n- target/\n").unwrap();
/// assert_eq!(rules.len(), 2);
/// assert_eq!(rules[0].action(), FilterAction::Include);
/// assert_eq!(rules[1].pattern(), "target/");
/// ```
pub fn parse_rules(text: &str) -> Result<Vec<FilterRule>, RuleParseError> {
    let mut rules = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        let (keyword, pattern) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(keyword, rest)| (keyword, rest.trim()));

        if pattern.is_empty() {
            return Err(RuleParseError::new(index + 1, "missing pattern"));
        }

        let rule = match keyword {
            "+" | "include" => FilterRule::include(pattern),
            "-" | "exclude" => FilterRule::exclude(pattern),
            other => {
                return Err(RuleParseError::new(
                    index + 1,
                    format!("unknown rule prefix '{other}'"),
                ));
            }
        };
        rules.push(rule);
    }

    Ok(rules)
}
