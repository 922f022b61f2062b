//! Build manifest reconciliation.
//!
//! Every changed source file must be declared in each supported build
//! system. Each system is queried fresh for its source targets; the
//! identifiers it returns (`//pw_foo:foo.cc`) are normalized into
//! repository paths and compared against the change set.

use crate::core::check::{Check, CheckContext};
use crate::core::environment::Environment;
use crate::core::error::{CheckFailure, PresubmitError};
use crate::core::filter::FilterSpec;
use crate::core::output::plural;
use crate::core::process::{CommandSpec, ProcessRunner, call};
use crate::plugins::gn::{GnTarget, gn_gen};
use crate::plugins::C_EXTENSIONS;
use rustc_hash::FxHashSet;
use std::path::Path;
use tracing::{debug, warn};

pub const CHECK_NAME: &str = "source_is_in_build_files";

/// Suffixes of files that are documentation rather than build sources.
pub const DOC_SUFFIXES: &[&str] = &[".rst", ".md"];

pub fn is_documentation(path: &str) -> bool {
    DOC_SUFFIXES.iter().any(|s| path.ends_with(s))
}

fn exempt_nothing(_: &str) -> bool {
    false
}

/// Queries one build system for its declared source targets.
pub trait ManifestSource {
    fn system(&self) -> &str;

    /// Raw target identifiers, one per declared source.
    fn query(
        &self,
        env: &Environment,
        runner: &dyn ProcessRunner,
    ) -> Result<Vec<String>, PresubmitError>;

    /// Predicate for files this system does not track as sources.
    fn exemption(&self) -> fn(&str) -> bool {
        exempt_nothing
    }
}

/// Turn `//dir:file.cc` style identifiers into existing repository paths.
pub fn normalize_targets<I, S>(root: &Path, ids: I) -> FxHashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .filter_map(|id| {
            let path = id.as_ref().trim().replace(':', "/");
            // `//:a.cc` names a file at the root
            let path = path.trim_start_matches('/');
            (!path.is_empty() && root.join(path).is_file()).then(|| path.to_string())
        })
        .collect()
}

/// Declared sources of one build system at reconciliation time.
pub struct ManifestView {
    pub system: String,
    pub declared: FxHashSet<String>,
    pub exempt: fn(&str) -> bool,
}

impl ManifestView {
    pub fn new(system: impl Into<String>, declared: FxHashSet<String>) -> Self {
        Self {
            system: system.into(),
            declared,
            exempt: exempt_nothing,
        }
    }

    pub fn with_exemption(mut self, exempt: fn(&str) -> bool) -> Self {
        self.exempt = exempt;
        self
    }

    pub fn is_missing(&self, path: &str) -> bool {
        !(self.exempt)(path) && !self.declared.contains(path)
    }
}

/// Missing files per build system, in view order. Systems with nothing
/// missing are still listed with an empty set.
pub fn reconcile(paths: &[String], views: &[ManifestView]) -> Vec<(String, Vec<String>)> {
    views
        .iter()
        .map(|view| {
            let missing = paths
                .iter()
                .filter(|p| view.is_missing(p))
                .cloned()
                .collect();
            (view.system.clone(), missing)
        })
        .collect()
}

/// Build the failure for a reconciliation result, if anything is missing.
pub fn missing_failure(missing: &[(String, Vec<String>)]) -> Option<CheckFailure> {
    if missing.iter().all(|(_, files)| files.is_empty()) {
        return None;
    }

    let mut sections = Vec::new();
    let mut all = Vec::new();
    for (system, files) in missing {
        if files.is_empty() {
            continue;
        }
        sections.push(format!(
            "{} missing from the {} build:\n  {}",
            plural(files.len(), "file"),
            system,
            files.join("\n  ")
        ));
        all.extend(files.iter().map(|f| format!("{}: {}", system, f)));
    }
    sections.push("All source files must appear in BUILD and BUILD.gn files".to_string());
    Some(CheckFailure::with_paths(sections.join("\n"), all))
}

/// Bazel: `bazel query 'kind("source file", //...:*)'`. Documentation is
/// not a Bazel source, so it is exempt.
pub struct BazelSource;

impl ManifestSource for BazelSource {
    fn system(&self) -> &str {
        "Bazel"
    }

    fn query(
        &self,
        env: &Environment,
        runner: &dyn ProcessRunner,
    ) -> Result<Vec<String>, PresubmitError> {
        let cmd = CommandSpec::new("bazel").args(["query", r#"kind("source file", //...:*)"#]);
        let out = call(runner, env, &cmd)?;
        Ok(out.stdout.lines().map(str::to_string).collect())
    }

    fn exemption(&self) -> fn(&str) -> bool {
        is_documentation
    }
}

/// GN: union of `gn desc <out> '*'` over each configured build variant.
/// Each variant is regenerated first so the query reflects the current
/// BUILD.gn files.
pub struct GnSource {
    pub targets: Vec<GnTarget>,
}

impl ManifestSource for GnSource {
    fn system(&self) -> &str {
        "GN"
    }

    fn query(
        &self,
        env: &Environment,
        runner: &dyn ProcessRunner,
    ) -> Result<Vec<String>, PresubmitError> {
        let mut ids = Vec::new();
        for target in &self.targets {
            gn_gen(runner, env, target, &[])?;
            let out_dir = env.output_path([target.out_dir]);
            let cmd = CommandSpec::new("gn")
                .arg("desc")
                .arg(out_dir.to_string_lossy())
                .arg("*");
            let out = call(runner, env, &cmd)?;
            ids.extend(out.stdout.lines().map(str::to_string));
        }
        Ok(ids)
    }
}

pub struct BuildManifestCheck {
    filter: FilterSpec,
    sources: Vec<Box<dyn ManifestSource>>,
}

impl BuildManifestCheck {
    pub fn new(sources: Vec<Box<dyn ManifestSource>>) -> Self {
        let suffixes = std::iter::once(".rst").chain(C_EXTENSIONS.iter().copied());
        Self {
            filter: FilterSpec::suffixes(suffixes),
            sources,
        }
    }

    /// Query every source, in order, against the current tree.
    pub fn views(
        &self,
        env: &Environment,
        runner: &dyn ProcessRunner,
    ) -> Result<Vec<ManifestView>, PresubmitError> {
        let mut views = Vec::new();
        for source in &self.sources {
            let declared = normalize_targets(&env.root, source.query(env, runner)?);
            debug!(system = source.system(), declared = declared.len(), "manifest view");
            views.push(
                ManifestView::new(source.system(), declared).with_exemption(source.exemption()),
            );
        }
        Ok(views)
    }
}

impl Check for BuildManifestCheck {
    fn name(&self) -> &str {
        CHECK_NAME
    }

    fn filter(&self) -> Option<&FilterSpec> {
        Some(&self.filter)
    }

    fn run(&self, ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
        let views = self.views(ctx.env, ctx.runner)?;
        let missing = reconcile(paths, &views);
        match missing_failure(&missing) {
            Some(failure) => {
                for (system, files) in missing.iter().filter(|(_, f)| !f.is_empty()) {
                    warn!(
                        "{} missing from the {} build:\n{}",
                        plural(files.len(), "file"),
                        system,
                        files.join("\n")
                    );
                }
                Err(failure.into())
            }
            None => Ok(()),
        }
    }
}
