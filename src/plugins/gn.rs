//! GN/Ninja builds, one output directory per toolchain variant.

use crate::core::check::CheckContext;
use crate::core::environment::Environment;
use crate::core::error::PresubmitError;
use crate::core::process::{CommandSpec, ProcessRunner, call};

/// One GN build variant and the args it is generated with.
#[derive(Debug, Clone, Copy)]
pub struct GnTarget {
    /// Subdirectory of the presubmit output directory.
    pub out_dir: &'static str,
    pub args: &'static [(&'static str, &'static str)],
}

pub const CLANG: GnTarget = GnTarget {
    out_dir: "clang",
    args: &[
        ("pw_target_config", r#""//targets/host/host.gni""#),
        ("pw_target_toolchain", r#""//pw_toolchain:host_clang_os""#),
    ],
};

pub const GCC: GnTarget = GnTarget {
    out_dir: "gcc",
    args: &[
        ("pw_target_config", r#""//targets/host/host.gni""#),
        ("pw_target_toolchain", r#""//pw_toolchain:host_gcc_os""#),
    ],
};

pub const ARM: GnTarget = GnTarget {
    out_dir: "arm",
    args: &[(
        "pw_target_config",
        r#""//targets/stm32f429i-disc1/target_config.gni""#,
    )],
};

/// `--args=k1=v1 k2=v2`
pub fn gn_args(args: &[(&str, &str)]) -> String {
    let joined = args
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");
    format!("--args={}", joined)
}

pub fn gn_gen(
    runner: &dyn ProcessRunner,
    env: &Environment,
    target: &GnTarget,
    extra: &[&str],
) -> Result<(), PresubmitError> {
    env.ensure_output_dir()?;
    let cmd = CommandSpec::new("gn")
        .args(["gen", "--color=always", "--check"])
        .args(extra.iter().copied())
        .arg(env.output_path([target.out_dir]).to_string_lossy())
        .arg(gn_args(target.args));
    call(runner, env, &cmd)?;
    Ok(())
}

pub fn ninja(
    runner: &dyn ProcessRunner,
    env: &Environment,
    target: &GnTarget,
) -> Result<(), PresubmitError> {
    let cmd = CommandSpec::new("ninja")
        .arg("-C")
        .arg(env.output_path([target.out_dir]).to_string_lossy());
    call(runner, env, &cmd)?;
    Ok(())
}

/// Unfiltered: later steps read its compile_commands.json.
pub fn gn_clang_build(ctx: &CheckContext<'_>, _paths: &[String]) -> Result<(), PresubmitError> {
    gn_gen(ctx.runner, ctx.env, &CLANG, &["--export-compile-commands"])?;
    ninja(ctx.runner, ctx.env, &CLANG)
}

pub fn gn_gcc_build(ctx: &CheckContext<'_>, _paths: &[String]) -> Result<(), PresubmitError> {
    gn_gen(ctx.runner, ctx.env, &GCC, &[])?;
    ninja(ctx.runner, ctx.env, &GCC)
}

pub fn gn_arm_build(ctx: &CheckContext<'_>, _paths: &[String]) -> Result<(), PresubmitError> {
    gn_gen(ctx.runner, ctx.env, &ARM, &[])?;
    ninja(ctx.runner, ctx.env, &ARM)
}
