use presubmit::core::changes::ChangeSet;
use presubmit::core::check::{CheckContext, CheckStatus, FnCheck};
use presubmit::core::config::Config;
use presubmit::core::environment::{Environment, VENV_DIR};
use presubmit::core::error::PresubmitError;
use presubmit::core::filter::FilterSpec;
use presubmit::core::orchestrator::run_program;
use presubmit::core::process::{CommandOutput, CommandSpec, ProcessRunner};
use presubmit::core::program::{Program, Step};
use presubmit::plugins::copyright::{CopyrightCheck, LICENSE_BODY};
use presubmit::plugins::manifest::{BuildManifestCheck, ManifestSource, is_documentation};
use presubmit::programs;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Records commands; fails any whose display contains `fail_on`.
struct Recorder {
    fail_on: Option<&'static str>,
    seen: RefCell<Vec<String>>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            fail_on: None,
            seen: RefCell::new(Vec::new()),
        }
    }

    fn failing_on(pattern: &'static str) -> Self {
        Self {
            fail_on: Some(pattern),
            seen: RefCell::new(Vec::new()),
        }
    }

    fn commands(&self) -> Vec<String> {
        self.seen.borrow().clone()
    }
}

impl ProcessRunner for Recorder {
    fn run(&self, cmd: &CommandSpec, _: &Environment) -> Result<CommandOutput, PresubmitError> {
        let line = cmd.display();
        self.seen.borrow_mut().push(line.clone());
        let failed = self.fail_on.is_some_and(|p| line.contains(p));
        Ok(CommandOutput {
            exit_code: if failed { 1 } else { 0 },
            stdout: String::new(),
            stderr: if failed { "boom".into() } else { String::new() },
        })
    }
}

struct Declared(&'static str, Vec<&'static str>, bool);

impl ManifestSource for Declared {
    fn system(&self) -> &str {
        self.0
    }

    fn query(&self, _: &Environment, _: &dyn ProcessRunner) -> Result<Vec<String>, PresubmitError> {
        Ok(self.1.iter().map(|s| s.to_string()).collect())
    }

    fn exemption(&self) -> fn(&str) -> bool {
        if self.2 { is_documentation } else { |_| false }
    }
}

fn header(first: &str, marker: &str) -> String {
    let mut out = format!("{}\n", first);
    for line in LICENSE_BODY {
        out.push_str(&format!("{}{}\n", marker, line));
    }
    out
}

fn write(root: &Path, rel: &str, contents: &str) {
    fs::write(root.join(rel), contents).unwrap();
}

#[test]
fn copyright_and_manifest_program_reports_each_check_separately() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(
        root,
        "a.cc",
        &format!("{}\nint main() {{}}\n", header("// Copyright 2021 The Example Authors", "//")),
    );
    write(root, "b.md", "# Notes\n");
    write(root, "c.py", "print('hello')\n");

    let program = Program::new(
        "scenario",
        vec![
            Step::Check(Box::new(CopyrightCheck::new("The Example Authors").unwrap())),
            Step::Check(Box::new(BuildManifestCheck::new(vec![
                Box::new(Declared("Bazel", vec!["//:a.cc"], true)),
                Box::new(Declared("GN", vec!["//:a.cc"], false)),
            ]))),
        ],
    )
    .unwrap();

    let mut env = Environment::new(root, ".presubmit");
    let changes = ChangeSet::new(["a.cc", "b.md", "c.py"].map(String::from));
    let runner = Recorder::new();
    let report = run_program(&program, &changes, &mut env, &runner, &Config::default()).unwrap();

    assert!(!report.passed());
    assert_eq!(report.exit_code(), 1);
    assert_eq!(
        report.outcome("copyright_notice").unwrap().status,
        CheckStatus::Failed {
            reason: "1 file with a missing or incorrect copyright notice".into(),
            paths: vec!["c.py".into()],
        }
    );
    assert_eq!(
        report.outcome("source_is_in_build_files").unwrap().status,
        CheckStatus::Passed
    );
    assert!(runner.commands().is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcomes"][0]["status"], "failed");
    assert_eq!(json["outcomes"][0]["paths"][0], "c.py");
    assert_eq!(json["outcomes"][1]["status"], "passed");
}

fn noop(_: &CheckContext<'_>, _: &[String]) -> Result<(), PresubmitError> {
    Ok(())
}

#[test]
fn python_only_change_runs_python_checks_and_skips_c_checks() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("pw_x/py")).unwrap();
    write(root, "pw_x/py/setup.py", &header("# Copyright 2021 The Project Authors", "#"));
    write(root, "pw_x/py/mod.py", &header("# Copyright 2022 The Project Authors", "#"));
    // Pretend the venv already exists so init only runs CIPD.
    fs::create_dir_all(root.join(".presubmit").join(VENV_DIR)).unwrap();

    let program = programs::full_program(&Config::default()).unwrap();
    let mut env = Environment::new(root, ".presubmit");
    let changes = ChangeSet::new(["pw_x/py/mod.py", "pw_x/py/setup.py"].map(String::from));
    let runner = Recorder::new();
    let report = run_program(&program, &changes, &mut env, &runner, &Config::default()).unwrap();

    assert!(report.passed(), "{report:?}");
    for skipped in ["gn_gcc_build", "gn_arm_build", "pragma_once", "bazel_test", "source_is_in_build_files"] {
        assert_eq!(report.outcome(skipped).unwrap().status, CheckStatus::Skipped, "{skipped}");
    }
    for disabled in ["clang_tidy", "mypy"] {
        assert_eq!(report.outcome(disabled).unwrap().status, CheckStatus::Disabled);
    }
    assert_eq!(report.outcome("copyright_notice").unwrap().status, CheckStatus::Passed);

    let commands = runner.commands();
    assert!(commands[0].starts_with("python3 env_setup/cipd/update.py --install-dir"));
    assert!(!commands.iter().any(|c| c.contains("virtualenv/init.py")));
    assert!(commands.iter().any(|c| c.starts_with("python pw_x/py/setup.py test")));
    assert!(commands.iter().any(|c| c == "python -m pylint -j 0 pw_x/py/mod.py pw_x/py/setup.py"));
    assert!(commands.iter().any(|c| c.starts_with("gn gen --color=always --check --export-compile-commands")));
    assert_eq!(env.path_prefix.len(), 3);
    assert!(env.path_prefix[0].ends_with("venv/bin"));
}

#[test]
fn failing_build_does_not_stop_later_checks() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(root, "x.py", &header("# Copyright 2021 The Project Authors", "#"));

    let program = programs::quick_program(&Config::default()).unwrap();
    let mut env = Environment::new(root, ".presubmit");
    let changes = ChangeSet::new(["x.py".to_string()]);
    let runner = Recorder::failing_on("ninja");
    let report = run_program(&program, &changes, &mut env, &runner, &Config::default()).unwrap();

    assert_eq!(report.exit_code(), 1);
    let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
    assert_eq!(failed, ["gn_clang_build"]);
    match &report.outcome("gn_clang_build").unwrap().status {
        CheckStatus::Failed { reason, .. } => assert!(reason.contains("ninja -C")),
        other => panic!("unexpected status {other:?}"),
    }
    assert_eq!(report.outcome("python_format").unwrap().status, CheckStatus::Passed);
    assert_eq!(report.outcome("copyright_notice").unwrap().status, CheckStatus::Passed);
}

#[test]
fn init_failure_is_fatal_and_runs_no_checks() {
    let tmp = tempdir().unwrap();
    let program = programs::quick_program(&Config::default()).unwrap();
    let mut env = Environment::new(tmp.path(), ".presubmit");
    let changes = ChangeSet::new(["x.py".to_string()]);
    let runner = Recorder::failing_on("cipd/update.py");

    let err = run_program(&program, &changes, &mut env, &runner, &Config::default()).unwrap_err();
    match err {
        PresubmitError::InitializationError { step, reason } => {
            assert_eq!(step, "init_cipd");
            assert!(reason.contains("update.py"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(runner.commands().len(), 1);
}

#[test]
fn clang_tidy_without_compile_database_names_the_precondition() {
    let tmp = tempdir().unwrap();
    write(tmp.path(), "a.cc", "");
    let mut config = Config::default();
    config.checks.disabled.clear();

    let program = Program::new(
        "tidy_only",
        vec![Step::Check(FnCheck::boxed(
            "clang_tidy",
            Some(FilterSpec::suffixes([".cc"])),
            presubmit::plugins::cc::clang_tidy,
        ))],
    )
    .unwrap();
    let mut env = Environment::new(tmp.path(), ".presubmit");
    let changes = ChangeSet::new(["a.cc".to_string()]);
    let runner = Recorder::new();
    let report = run_program(&program, &changes, &mut env, &runner, &config).unwrap();

    match &report.outcome("clang_tidy").unwrap().status {
        CheckStatus::Failed { reason, .. } => assert!(reason.contains("compile_commands.json")),
        other => panic!("unexpected status {other:?}"),
    }
    assert!(runner.commands().is_empty());
}

#[test]
fn empty_change_set_skips_filtered_checks_but_not_unfiltered_ones() {
    let tmp = tempdir().unwrap();
    let program = Program::new(
        "p",
        vec![
            Step::Check(FnCheck::boxed("filtered", Some(FilterSpec::any()), noop)),
            Step::Check(FnCheck::boxed("always", None, noop)),
        ],
    )
    .unwrap();
    let mut env = Environment::new(tmp.path(), ".presubmit");
    let report = run_program(
        &program,
        &ChangeSet::default(),
        &mut env,
        &Recorder::new(),
        &Config::default(),
    )
    .unwrap();
    assert!(report.passed());
    assert_eq!(report.outcome("filtered").unwrap().status, CheckStatus::Skipped);
    assert_eq!(report.outcome("always").unwrap().status, CheckStatus::Passed);
}
