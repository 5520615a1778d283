/*!
 * Exclusion rule matching
 */

use std::path::{Path, PathBuf};

use glob_match::glob_match;

use crate::utils::absolutize;

/// A single exclusion rule, classified once when the configuration is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionRule {
    /// Glob matched against the bare file or directory name
    NameGlob(String),
    /// Absolute path; everything at or below it is excluded
    PathPrefix(PathBuf),
}

impl ExclusionRule {
    /// Parse a raw pattern. Rooted patterns (`/tmp/x`) become prefixes,
    /// everything else is a name glob.
    pub fn parse(pattern: &str) -> Self {
        let path = Path::new(pattern);
        if pattern.starts_with('/') || path.has_root() {
            Self::PathPrefix(absolutize(path))
        } else {
            Self::NameGlob(pattern.to_string())
        }
    }

    /// Check the rule against a bare name and the full path of an entry
    pub fn matches(&self, name: &str, full_path: &Path) -> bool {
        match self {
            Self::NameGlob(pattern) => {
                glob_match(pattern, name)
                    || full_path
                        .to_str()
                        .is_some_and(|full| glob_match(pattern, full))
            }
            Self::PathPrefix(prefix) => absolutize(full_path).starts_with(prefix),
        }
    }
}

/// True if any rule matches `name` or `full_path`
pub fn matches(name: &str, full_path: &Path, rules: &[ExclusionRule]) -> bool {
    rules.iter().any(|rule| rule.matches(name, full_path))
}
