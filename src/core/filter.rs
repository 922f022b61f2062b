//! Declarative path filters attached to checks.
//!
//! A filter narrows the run's change set to the files a check cares about.
//! Suffixes are plain string suffixes (not globs); exclusion patterns are
//! regular expressions that must match the whole path.

use crate::core::error::PresubmitError;
use regex::Regex;

#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// `None` accepts every path.
    pub suffixes: Option<Vec<String>>,
    pub exclude: Vec<Regex>,
}

impl FilterSpec {
    /// Accept any path, subject to exclusions added later.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn suffixes<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: Some(suffixes.into_iter().map(Into::into).collect()),
            exclude: Vec::new(),
        }
    }

    /// Add exclusion patterns. Each pattern is anchored to the full path.
    pub fn exclude<I, S>(mut self, patterns: I) -> Result<Self, PresubmitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let anchored = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
                PresubmitError::ConfigError(format!(
                    "invalid exclusion pattern '{}': {}",
                    pattern, e
                ))
            })?;
            self.exclude.push(anchored);
        }
        Ok(self)
    }

    pub fn matches(&self, path: &str) -> bool {
        let suffix_ok = match &self.suffixes {
            Some(suffixes) => suffixes.iter().any(|s| path.ends_with(s.as_str())),
            None => true,
        };
        suffix_ok && !self.exclude.iter().any(|re| re.is_match(path))
    }

    /// Narrow `paths`, preserving their order.
    pub fn apply<S: AsRef<str>>(&self, paths: &[S]) -> Vec<String> {
        paths
            .iter()
            .map(AsRef::as_ref)
            .filter(|p| self.matches(p))
            .map(str::to_string)
            .collect()
    }
}
