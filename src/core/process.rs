//! External command execution.
//!
//! Every check that shells out goes through a [`ProcessRunner`], so tests can
//! substitute a recorder for real compilers and build tools.

use crate::core::environment::Environment;
use crate::core::error::PresubmitError;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;
use tracing::{debug, info};

/// A command line plus an optional working directory override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Defaults to the repository root.
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: PathBuf) -> Self {
        self.cwd = Some(dir);
        self
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub trait ProcessRunner {
    /// Run to completion, blocking the caller. Spawn failures are errors;
    /// non-zero exits are not.
    fn run(&self, cmd: &CommandSpec, env: &Environment) -> Result<CommandOutput, PresubmitError>;
}

/// Spawns real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, cmd: &CommandSpec, env: &Environment) -> Result<CommandOutput, PresubmitError> {
        let start = Instant::now();
        let cwd = cmd.cwd.clone().unwrap_or_else(|| env.root.clone());
        let output = Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(&cwd)
            .env("PATH", env.search_path()?)
            .output()
            .map_err(|e| {
                PresubmitError::CommandFailed {
                    command: cmd.display(),
                    code: -1,
                    output: format!("failed to spawn: {}", e),
                }
            })?;

        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        debug!(
            command = %cmd.display(),
            exit_code = result.exit_code,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "command finished"
        );
        Ok(result)
    }
}

/// Run a command and treat a non-zero exit as a failure.
pub fn call(
    runner: &dyn ProcessRunner,
    env: &Environment,
    cmd: &CommandSpec,
) -> Result<CommandOutput, PresubmitError> {
    info!("$ {}", cmd.display());
    let output = runner.run(cmd, env)?;
    if !output.success() {
        return Err(PresubmitError::CommandFailed {
            command: cmd.display(),
            code: output.exit_code,
            output: format!("{}{}", output.stdout, output.stderr),
        });
    }
    Ok(output)
}
