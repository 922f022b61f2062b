//! Runs a program against a change set.
//!
//! Init steps run first and abort the run on failure. Checks then run one
//! after another; a failing check never stops the ones after it, so a single
//! run reports every violation.

use crate::core::changes::ChangeSet;
use crate::core::check::{Check, CheckContext, CheckStatus};
use crate::core::config::Config;
use crate::core::environment::Environment;
use crate::core::error::PresubmitError;
use crate::core::process::ProcessRunner;
use crate::core::program::Program;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use ulid::Ulid;

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: CheckStatus,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub program: String,
    pub changed_files: usize,
    pub outcomes: Vec<CheckOutcome>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failed())
    }

    pub fn count(&self, pred: fn(&CheckStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn passed(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }

    pub fn outcome(&self, name: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

/// Run every init step of `program`, in order. The first failure is fatal.
pub fn run_init_steps(
    program: &Program,
    env: &mut Environment,
    runner: &dyn ProcessRunner,
) -> Result<(), PresubmitError> {
    for step in program.init_steps() {
        info!("init: {}", step.name);
        (step.func)(env, runner).map_err(|e| {
            error!("init step {} failed: {}", step.name, e);
            PresubmitError::InitializationError {
                step: step.name.to_string(),
                reason: e.to_string(),
            }
        })?;
    }
    Ok(())
}

/// Filter the change set for one check and run it.
pub fn run_check(check: &dyn Check, ctx: &CheckContext<'_>, changes: &ChangeSet) -> CheckStatus {
    let paths = match check.filter() {
        Some(filter) => {
            let narrowed = filter.apply(changes.paths());
            if narrowed.is_empty() {
                return CheckStatus::Skipped;
            }
            narrowed
        }
        None => changes.paths().to_vec(),
    };

    debug!(check = check.name(), files = paths.len(), "running check");
    match check.run(ctx, &paths) {
        Ok(()) => CheckStatus::Passed,
        Err(e) => CheckStatus::from_error(e),
    }
}

pub fn run_program(
    program: &Program,
    changes: &ChangeSet,
    env: &mut Environment,
    runner: &dyn ProcessRunner,
    config: &Config,
) -> Result<RunReport, PresubmitError> {
    let start = Instant::now();
    let run_id = Ulid::new().to_string();
    info!(
        run_id = %run_id,
        program = program.name(),
        files = changes.len(),
        "presubmit: running"
    );

    run_init_steps(program, env, runner)?;

    let ctx = CheckContext {
        env,
        runner,
        config,
    };
    let mut outcomes = Vec::new();
    for check in program.checks() {
        let check_start = Instant::now();
        let status = if config.is_disabled(check.name()) {
            CheckStatus::Disabled
        } else {
            run_check(check, &ctx, changes)
        };

        match &status {
            CheckStatus::Skipped => info!("{}: skipped (no matching files)", check.name()),
            CheckStatus::Disabled => info!("{}: disabled by config", check.name()),
            CheckStatus::Passed => info!("{}: passed", check.name()),
            CheckStatus::Failed { reason, paths } => {
                warn!("{}: failed: {}", check.name(), reason);
                if !paths.is_empty() {
                    warn!("{}", paths.join("\n"));
                }
            }
        }

        outcomes.push(CheckOutcome {
            name: check.name().to_string(),
            status,
            duration_ms: check_start.elapsed().as_millis() as u64,
        });
    }

    Ok(RunReport {
        run_id,
        program: program.name().to_string(),
        changed_files: changes.len(),
        outcomes,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
