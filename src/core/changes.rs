//! Change set discovery through git.

use crate::core::environment::Environment;
use crate::core::error::PresubmitError;
use crate::core::process::{CommandSpec, ProcessRunner};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Repository-relative paths under test. Fixed for the whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: Vec<String>,
}

impl ChangeSet {
    /// Duplicates are dropped; paths are kept sorted.
    pub fn new<I: IntoIterator<Item = String>>(paths: I) -> Self {
        let unique: BTreeSet<String> = paths.into_iter().collect();
        Self {
            paths: unique.into_iter().collect(),
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn git(
    runner: &dyn ProcessRunner,
    env: &Environment,
    cwd: &Path,
    args: &[&str],
) -> Result<String, PresubmitError> {
    let cmd = CommandSpec::new("git")
        .args(args.iter().copied())
        .cwd(cwd.to_path_buf());
    let output = runner.run(&cmd, env)?;
    if !output.success() {
        return Err(PresubmitError::GitError(format!(
            "`{}` failed (exit={}): {}",
            cmd.display(),
            output.exit_code,
            output.stderr.trim()
        )));
    }
    Ok(output.stdout)
}

/// Top-level directory of the repository containing `dir`.
pub fn repo_root(runner: &dyn ProcessRunner, dir: &Path) -> Result<PathBuf, PresubmitError> {
    let env = Environment::new(dir, ".");
    let out = git(runner, &env, dir, &["rev-parse", "--show-toplevel"])?;
    let root = out.trim();
    if root.is_empty() {
        return Err(PresubmitError::GitError(format!(
            "no repository found at {}",
            dir.display()
        )));
    }
    Ok(PathBuf::from(root))
}

/// Files changed since `base`, or every tracked file when `base` is `None`.
/// Deleted files are never included.
pub fn list_changes(
    runner: &dyn ProcessRunner,
    env: &Environment,
    base: Option<&str>,
    pathspecs: &[String],
) -> Result<ChangeSet, PresubmitError> {
    let mut args: Vec<&str> = match base {
        Some(rev) => vec!["diff", "--name-only", "-z", "--diff-filter=d", rev],
        None => vec!["ls-files", "-z"],
    };
    if !pathspecs.is_empty() {
        args.push("--");
        args.extend(pathspecs.iter().map(String::as_str));
    }

    // NUL-separated and never C-quoted
    let stdout = git(runner, env, &env.root, &args)?;
    let changes = ChangeSet::new(
        stdout
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(str::to_string),
    );
    debug!(files = changes.len(), base = ?base, "collected change set");
    Ok(changes)
}
