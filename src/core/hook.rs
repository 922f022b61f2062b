//! Git pre-push hook installation.

use crate::core::environment::Environment;
use crate::core::error::PresubmitError;
use crate::core::process::{CommandSpec, ProcessRunner};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const HOOK_NAME: &str = "pre-push";

/// Shell script that re-enters this runner against `base`.
pub fn hook_script(command: &Path, base: &str, repository: &Path) -> String {
    format!(
        "#!/bin/sh\n\
         # Installed by presubmit --install\n\
         exec {} --base {} --repository {}\n",
        shell_quote(&command.to_string_lossy()),
        shell_quote(base),
        shell_quote(&repository.to_string_lossy()),
    )
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn hooks_dir(runner: &dyn ProcessRunner, env: &Environment) -> Result<PathBuf, PresubmitError> {
    let cmd = CommandSpec::new("git").args(["rev-parse", "--git-path", "hooks"]);
    let output = runner.run(&cmd, env)?;
    if !output.success() {
        return Err(PresubmitError::GitError(format!(
            "cannot locate hooks directory: {}",
            output.stderr.trim()
        )));
    }
    let dir = PathBuf::from(output.stdout.trim());
    // --git-path answers relative to the working directory
    Ok(if dir.is_absolute() {
        dir
    } else {
        env.root.join(dir)
    })
}

/// Write the pre-push hook and return its path.
pub fn install_hook(
    runner: &dyn ProcessRunner,
    env: &Environment,
    command: &Path,
    base: &str,
) -> Result<PathBuf, PresubmitError> {
    let dir = hooks_dir(runner, env)?;
    fs::create_dir_all(&dir)?;
    let hook_path = dir.join(HOOK_NAME);

    let mut file = fs::File::create(&hook_path)?;
    file.write_all(hook_script(command, base, &env.root).as_bytes())?;
    drop(file);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&hook_path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&hook_path, perms)?;
    }

    info!("Installed {} hook at {}", HOOK_NAME, hook_path.display());
    Ok(hook_path)
}
