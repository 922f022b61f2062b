//! Formatter conformance. Each formatter runs in check-only mode on the
//! files it owns; any diff fails the check.

use crate::core::check::CheckContext;
use crate::core::error::PresubmitError;
use crate::core::process::{CommandSpec, call};

pub const GN_EXTENSIONS: &[&str] = &[".gn", ".gni"];

pub fn clang_format(ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
    let cmd = CommandSpec::new("clang-format")
        .args(["--dry-run", "--Werror"])
        .args(paths.iter().cloned());
    call(ctx.runner, ctx.env, &cmd)?;
    Ok(())
}

pub fn gn_format(ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
    let cmd = CommandSpec::new("gn")
        .args(["format", "--dry-run"])
        .args(paths.iter().cloned());
    call(ctx.runner, ctx.env, &cmd)?;
    Ok(())
}

pub fn python_format(ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
    let cmd = CommandSpec::new("python")
        .args(["-m", "yapf", "--diff"])
        .args(paths.iter().cloned());
    let out = call(ctx.runner, ctx.env, &cmd)?;
    // yapf exits 0 on some versions even when it prints a diff
    if !out.stdout.trim().is_empty() {
        return Err(PresubmitError::CommandFailed {
            command: cmd.display(),
            code: out.exit_code,
            output: out.stdout,
        });
    }
    Ok(())
}
