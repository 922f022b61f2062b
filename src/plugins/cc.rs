//! C/C++ source checks.

use crate::core::check::CheckContext;
use crate::core::error::{CheckFailure, PresubmitError};
use crate::core::output::plural;
use crate::core::process::{CommandSpec, call};
use crate::plugins::gn::CLANG;
use std::fs;
use tracing::warn;

pub const HEADER_EXTENSIONS: &[&str] = &[".h", ".hh", ".hpp"];

const COMPILE_COMMANDS: &str = "compile_commands.json";

pub fn has_pragma_once(contents: &str) -> bool {
    contents.lines().any(|l| l.trim() == "#pragma once")
}

/// Every header must be guarded with `#pragma once`.
pub fn pragma_once(ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
    let mut missing = Vec::new();
    for path in paths {
        match fs::read(ctx.env.root.join(path)) {
            Ok(bytes) if has_pragma_once(&String::from_utf8_lossy(&bytes)) => {}
            Ok(_) => missing.push(path.clone()),
            Err(e) => {
                warn!(path = %path, error = %e, "cannot read header");
                missing.push(path.clone());
            }
        }
    }
    if missing.is_empty() {
        return Ok(());
    }
    let message = format!("{} missing #pragma once", plural(missing.len(), "header"));
    warn!("{}:\n{}", message, missing.join("\n"));
    Err(CheckFailure::with_paths(message, missing).into())
}

/// Needs the compile database exported by `gn_clang_build`.
pub fn clang_tidy(ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
    let build_dir = ctx.env.output_path([CLANG.out_dir]);
    if !build_dir.join(COMPILE_COMMANDS).is_file() {
        return Err(PresubmitError::PreconditionError(format!(
            "clang_tidy MUST be run after generating {} in a clang build ({} not found)",
            COMPILE_COMMANDS,
            build_dir.join(COMPILE_COMMANDS).display()
        )));
    }
    let cmd = CommandSpec::new("clang-tidy")
        .arg(format!("-p={}", build_dir.display()))
        .args(paths.iter().cloned());
    call(ctx.runner, ctx.env, &cmd)?;
    Ok(())
}
