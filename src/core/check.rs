//! Checks: named units of verification bound to a path filter.

use crate::core::config::Config;
use crate::core::environment::Environment;
use crate::core::error::PresubmitError;
use crate::core::filter::FilterSpec;
use crate::core::process::ProcessRunner;
use serde::Serialize;

/// Everything a check may touch while it runs.
pub struct CheckContext<'a> {
    pub env: &'a Environment,
    pub runner: &'a dyn ProcessRunner,
    pub config: &'a Config,
}

pub trait Check {
    fn name(&self) -> &str;

    /// `None` marks an unfiltered check: it always runs and sees the whole
    /// change set.
    fn filter(&self) -> Option<&FilterSpec>;

    /// Any `Err` is recorded as a failure of this check only.
    fn run(&self, ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError>;
}

pub type CheckFn = fn(&CheckContext<'_>, &[String]) -> Result<(), PresubmitError>;

/// Adapter turning a plain function into a [`Check`].
pub struct FnCheck {
    name: &'static str,
    filter: Option<FilterSpec>,
    func: CheckFn,
}

impl FnCheck {
    pub fn new(name: &'static str, filter: Option<FilterSpec>, func: CheckFn) -> Self {
        Self { name, filter, func }
    }

    pub fn boxed(name: &'static str, filter: Option<FilterSpec>, func: CheckFn) -> Box<dyn Check> {
        Box::new(Self::new(name, filter, func))
    }
}

impl Check for FnCheck {
    fn name(&self) -> &str {
        self.name
    }

    fn filter(&self) -> Option<&FilterSpec> {
        self.filter.as_ref()
    }

    fn run(&self, ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
        (self.func)(ctx, paths)
    }
}

/// Outcome of one check within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// The filter left nothing to check.
    Skipped,
    /// Turned off in config.
    Disabled,
    Passed,
    Failed { reason: String, paths: Vec<String> },
}

impl CheckStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed { .. })
    }

    /// Convert a check's error into a reportable failure.
    pub fn from_error(err: PresubmitError) -> Self {
        match err {
            PresubmitError::CheckFailed(failure) => CheckStatus::Failed {
                reason: failure.message,
                paths: failure.paths,
            },
            PresubmitError::CommandFailed {
                command,
                code,
                output,
            } => {
                let output = output.trim();
                let reason = if output.is_empty() {
                    format!("`{}` exited with status {}", command, code)
                } else {
                    format!("`{}` exited with status {}:\n{}", command, code, output)
                };
                CheckStatus::Failed {
                    reason,
                    paths: Vec::new(),
                }
            }
            other => CheckStatus::Failed {
                reason: other.to_string(),
                paths: Vec::new(),
            },
        }
    }
}
