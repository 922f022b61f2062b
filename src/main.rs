use anyhow::{Context, Result};
use colored::Colorize;

fn run() -> Result<i32> {
    presubmit::run().context("presubmit aborted")
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            2
        }
    };
    std::process::exit(code);
}
