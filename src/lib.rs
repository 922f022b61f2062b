//! presubmit: local verification gate for changes about to be pushed.
//!
//! Given the files changed in a git repository, `presubmit` runs a named
//! *program*: an ordered list of environment init steps and checks. Each
//! check declares which files it cares about; checks with nothing to look at
//! are skipped, and a failing check never stops the ones after it, so one run
//! reports every violation.
//!
//! # Exit status
//!
//! - `0`: every check passed or was skipped
//! - `1`: at least one check failed
//! - `2`: an init step failed, or the run could not be set up
//!
//! # Examples
//!
//! ```bash
//! # Check everything changed since origin/master with the fast preset
//! presubmit --base origin/master --program quick
//!
//! # Run the complete preset against every tracked file
//! presubmit
//!
//! # Install as a pre-push hook
//! presubmit --install
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: filters, checks, programs, the orchestrator and plumbing
//! - [`plugins`]: concrete checks (copyright, build manifests, builds, linters)
//! - [`programs`]: the registered presets

pub mod core;
pub mod plugins;
pub mod programs;

mod cli;

use crate::cli::{Cli, OutputFormat};
use crate::core::{
    changes, config, environment::Environment, error::PresubmitError, hook, orchestrator,
    output, process::SystemRunner,
};
use clap::Parser;
use tracing::debug;

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn print_programs(registry: &core::program::Registry) {
    for program in registry.programs() {
        println!("{}:", program.name());
        for step in program.steps() {
            let kind = match step {
                core::program::Step::Init(_) => "init",
                core::program::Step::Check(_) => "check",
            };
            println!("  {:<5} {}", kind, step.name());
        }
    }
}

/// Parse arguments, run the selected program and return the exit status.
pub fn run() -> Result<i32, PresubmitError> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    let runner = SystemRunner;
    let start_dir = match &cli.repository {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let root = changes::repo_root(&runner, &start_dir)?;
    let config = config::load_config(&root, cli.config.as_deref())?;
    let mut env = Environment::new(&root, &config.output_dir);
    debug!("Using environment at {}", env.output_dir.display());

    if cli.clean {
        env.clean()?;
    } else if cli.clean_py {
        env.clean_venv()?;
    }

    if cli.install {
        let exe = std::env::current_exe()?;
        let path = hook::install_hook(&runner, &env, &exe, &config.hook.base)?;
        println!("Installed {} hook: {}", hook::HOOK_NAME, path.display());
        return Ok(0);
    }

    let registry = programs::standard_registry(&config)?;
    if cli.list {
        print_programs(&registry);
        return Ok(0);
    }

    let program_name = cli.program.as_deref().unwrap_or(&config.default_program);
    let program = registry.get(program_name)?;
    let change_set = changes::list_changes(&runner, &env, cli.base.as_deref(), &cli.paths)?;

    let report = orchestrator::run_program(program, &change_set, &mut env, &runner, &config)?;
    match cli.format {
        OutputFormat::Text => print!("{}", output::render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(report.exit_code())
}
