//! CLI struct definitions for the presubmit command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "presubmit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Runs the local presubmit checks for a repository before changes are pushed."
)]
pub(crate) struct Cli {
    /// Which presubmit program to run (defaults to `default_program` from config).
    #[clap(short = 'p', long, conflicts_with = "install")]
    pub program: Option<String>,

    /// Installs the presubmit as a Git pre-push hook and exits.
    #[clap(long)]
    pub install: bool,

    /// Deletes the entire output directory before starting.
    #[clap(long)]
    pub clean: bool,

    /// Deletes the Python virtualenv in the output directory before starting.
    #[clap(long)]
    pub clean_py: bool,

    /// Path within the git repository to check (defaults to the current directory).
    #[clap(short = 'C', long)]
    pub repository: Option<PathBuf>,

    /// Git revision to diff against; without it every tracked file is checked.
    #[clap(short = 'b', long)]
    pub base: Option<String>,

    /// Config file (defaults to `presubmit.toml` at the repository root).
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Report format.
    #[clap(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// List registered programs and their steps, then exit.
    #[clap(long, conflicts_with = "install")]
    pub list: bool,

    /// Enable verbose (info-level) logging to stderr.
    #[clap(short = 'v', long)]
    pub verbose: bool,

    /// Enable debug-level logging to stderr.
    #[clap(long)]
    pub debug: bool,

    /// Only check changed files matching these git pathspecs.
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}
