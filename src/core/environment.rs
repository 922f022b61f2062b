//! Per-run working directory and process environment.
//!
//! One output directory (default `<root>/.presubmit`) holds everything the
//! steps generate: installed tools, the Python virtualenv, GN/Bazel outputs.
//! It is reused across runs and only wiped on request.

use crate::core::error::PresubmitError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the cached virtualenv subdirectory.
pub const VENV_DIR: &str = "venv";

#[derive(Debug, Clone)]
pub struct Environment {
    /// Repository root; commands run here.
    pub root: PathBuf,
    /// Absolute path of the per-run working directory.
    pub output_dir: PathBuf,
    /// Directories prepended to PATH for every spawned command.
    pub path_prefix: Vec<PathBuf>,
}

impl Environment {
    pub fn new(root: &Path, output_dir: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            output_dir: root.join(output_dir),
            path_prefix: Vec::new(),
        }
    }

    /// Path under the output directory. Does not create anything.
    pub fn output_path<I, P>(&self, parts: I) -> PathBuf
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut path = self.output_dir.clone();
        for part in parts {
            path.push(part);
        }
        path
    }

    pub fn ensure_output_dir(&self) -> Result<&Path, PresubmitError> {
        if !self.output_dir.is_dir() {
            debug!(dir = %self.output_dir.display(), "creating output directory");
            fs::create_dir_all(&self.output_dir)?;
        }
        Ok(&self.output_dir)
    }

    /// Later calls take precedence over earlier ones.
    pub fn prepend_path(&mut self, dir: PathBuf) {
        self.path_prefix.insert(0, dir);
    }

    /// PATH value for child processes.
    pub fn search_path(&self) -> Result<std::ffi::OsString, PresubmitError> {
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let dirs = self
            .path_prefix
            .iter()
            .cloned()
            .chain(std::env::split_paths(&inherited));
        std::env::join_paths(dirs)
            .map_err(|e| PresubmitError::ConfigError(format!("cannot build PATH: {}", e)))
    }

    /// Remove the whole output directory (`--clean`).
    pub fn clean(&self) -> Result<bool, PresubmitError> {
        remove_dir_if_exists(&self.output_dir)
    }

    /// Remove only the cached virtualenv (`--clean-py`).
    pub fn clean_venv(&self) -> Result<bool, PresubmitError> {
        remove_dir_if_exists(&self.output_path([VENV_DIR]))
    }
}

fn remove_dir_if_exists(dir: &Path) -> Result<bool, PresubmitError> {
    if !dir.exists() {
        return Ok(false);
    }
    info!("Removing directory: {}", dir.display());
    fs::remove_dir_all(dir)?;
    Ok(true)
}
