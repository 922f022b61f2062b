//! Python package tests and linters.

use crate::core::check::CheckContext;
use crate::core::error::PresubmitError;
use crate::core::process::{CommandSpec, call};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Packages are directories holding a `setup.py`.
const SETUP_PY: &str = "setup.py";

/// Nearest package root above each path, relative to `root`. Paths outside
/// any package are ignored.
pub fn find_python_packages(root: &Path, paths: &[String]) -> BTreeSet<PathBuf> {
    let mut packages = BTreeSet::new();
    for path in paths {
        let mut dir = Path::new(path).parent();
        while let Some(d) = dir {
            if root.join(d).join(SETUP_PY).is_file() {
                packages.insert(d.to_path_buf());
                break;
            }
            dir = d.parent();
        }
    }
    packages
}

fn run_python_module(ctx: &CheckContext<'_>, module: &str, args: Vec<String>) -> Result<(), PresubmitError> {
    let cmd = CommandSpec::new("python").args(["-m", module]).args(args);
    call(ctx.runner, ctx.env, &cmd)?;
    Ok(())
}

pub fn test_python_packages(ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
    let packages = find_python_packages(&ctx.env.root, paths);
    if packages.is_empty() {
        info!("No Python packages were found.");
        return Ok(());
    }
    for package in packages {
        let cmd = CommandSpec::new("python")
            .arg(package.join(SETUP_PY).to_string_lossy())
            .arg("test");
        call(ctx.runner, ctx.env, &cmd)?;
    }
    Ok(())
}

pub fn pylint(ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
    let mut args = vec!["-j".to_string(), "0".to_string()];
    args.extend(paths.iter().cloned());
    run_python_module(ctx, "pylint", args)
}

pub fn mypy(ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
    run_python_module(ctx, "mypy", paths.to_vec())
}
