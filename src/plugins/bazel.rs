//! Bazel build and test.

use crate::core::check::CheckContext;
use crate::core::error::PresubmitError;
use crate::core::process::{CommandSpec, call};

pub fn bazel_test(ctx: &CheckContext<'_>, _paths: &[String]) -> Result<(), PresubmitError> {
    ctx.env.ensure_output_dir()?;
    // Keeps bazel-* convenience symlinks inside the output directory.
    let prefix = ctx.env.output_path(["bazel-"]).to_string_lossy().to_string();
    for verb in ["build", "test"] {
        let cmd = CommandSpec::new("bazel")
            .args([verb, "//...", "--symlink_prefix"])
            .arg(prefix.as_str());
        call(ctx.runner, ctx.env, &cmd)?;
    }
    Ok(())
}
