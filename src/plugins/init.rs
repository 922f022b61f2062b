//! Environment provisioning run before any check.

use crate::core::environment::{Environment, VENV_DIR};
use crate::core::error::PresubmitError;
use crate::core::process::{CommandSpec, ProcessRunner, call};
use tracing::{debug, info};

const CIPD_DIR: &str = "cipd";

/// Install pinned host tools with CIPD and put them on PATH.
pub fn init_cipd(env: &mut Environment, runner: &dyn ProcessRunner) -> Result<(), PresubmitError> {
    env.ensure_output_dir()?;
    let cipd = env.output_path([CIPD_DIR]);
    let cmd = CommandSpec::new("python3")
        .arg("env_setup/cipd/update.py")
        .arg("--install-dir")
        .arg(cipd.to_string_lossy());
    call(runner, env, &cmd)?;

    // cipd ends up ahead of cipd/bin
    env.prepend_path(cipd.join("bin"));
    env.prepend_path(cipd);
    debug!(path = ?env.path_prefix, "PATH prefix");
    Ok(())
}

/// Create the virtualenv unless it is already there; `--clean-py` forces a
/// rebuild.
pub fn init_virtualenv(
    env: &mut Environment,
    runner: &dyn ProcessRunner,
) -> Result<(), PresubmitError> {
    env.ensure_output_dir()?;
    let venv = env.output_path([VENV_DIR]);
    if venv.is_dir() {
        info!("Reusing virtualenv at {}", venv.display());
    } else {
        let cmd = CommandSpec::new("python3")
            .arg("env_setup/virtualenv/init.py")
            .arg(format!("--venv_path={}", venv.display()))
            .arg("--requirements=env_setup/virtualenv/requirements.txt");
        call(runner, env, &cmd)?;
    }

    env.prepend_path(venv.join("bin"));
    Ok(())
}
