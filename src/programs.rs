//! Program registration: the named presets and the step groups they are
//! assembled from.
//!
//! Adding a check: write it under `plugins`, then append it to the group it
//! belongs to.

use crate::core::check::FnCheck;
use crate::core::config::Config;
use crate::core::error::PresubmitError;
use crate::core::filter::FilterSpec;
use crate::core::program::{InitStep, Program, Registry, Step};
use crate::plugins::copyright::CopyrightCheck;
use crate::plugins::manifest::{BazelSource, BuildManifestCheck, GnSource};
use crate::plugins::{C_EXTENSIONS, bazel, cc, format, gn, init, python};

pub const QUICK: &str = "quick";
pub const FULL: &str = "full";

/// Provisioning shared by every program. Order matters: the virtualenv is
/// created with the python that CIPD installs.
pub const INIT: &[InitStep] = &[
    InitStep::new("init_cipd", init::init_cipd),
    InitStep::new("init_virtualenv", init::init_virtualenv),
];

fn c_files() -> Option<FilterSpec> {
    Some(FilterSpec::suffixes(C_EXTENSIONS.iter().copied()))
}

fn py_files() -> Option<FilterSpec> {
    Some(FilterSpec::suffixes([".py"]))
}

fn init_steps() -> Vec<Step> {
    INIT.iter().copied().map(Step::Init).collect()
}

fn gn_clang_build() -> Step {
    Step::Check(FnCheck::boxed("gn_clang_build", None, gn::gn_clang_build))
}

fn pragma_once() -> Step {
    Step::Check(FnCheck::boxed(
        "pragma_once",
        Some(FilterSpec::suffixes(cc::HEADER_EXTENSIONS.iter().copied())),
        cc::pragma_once,
    ))
}

fn gn_steps() -> Vec<Step> {
    vec![
        gn_clang_build(),
        Step::Check(FnCheck::boxed("gn_gcc_build", c_files(), gn::gn_gcc_build)),
        Step::Check(FnCheck::boxed("gn_arm_build", c_files(), gn::gn_arm_build)),
    ]
}

/// `clang_tidy` reads the compile database from `gn_clang_build`, so this
/// group must come after the GN group.
fn cc_steps() -> Vec<Step> {
    vec![
        pragma_once(),
        Step::Check(FnCheck::boxed("clang_tidy", c_files(), cc::clang_tidy)),
    ]
}

fn python_steps() -> Result<Vec<Step>, PresubmitError> {
    let mypy_files = FilterSpec::suffixes([".py"]).exclude([r"(?:.+/)?setup\.py"])?;
    Ok(vec![
        Step::Check(FnCheck::boxed(
            "test_python_packages",
            py_files(),
            python::test_python_packages,
        )),
        Step::Check(FnCheck::boxed("pylint", py_files(), python::pylint)),
        Step::Check(FnCheck::boxed("mypy", Some(mypy_files), python::mypy)),
    ])
}

fn bazel_steps() -> Vec<Step> {
    vec![Step::Check(FnCheck::boxed(
        "bazel_test",
        c_files(),
        bazel::bazel_test,
    ))]
}

fn code_format_steps(config: &Config) -> Result<Vec<Step>, PresubmitError> {
    Ok(vec![
        Step::Check(Box::new(CopyrightCheck::new(
            &config.copyright.organization,
        )?)),
        Step::Check(FnCheck::boxed("clang_format", c_files(), format::clang_format)),
        Step::Check(FnCheck::boxed(
            "gn_format",
            Some(FilterSpec::suffixes(format::GN_EXTENSIONS.iter().copied())),
            format::gn_format,
        )),
        Step::Check(FnCheck::boxed("python_format", py_files(), format::python_format)),
    ])
}

fn general_steps() -> Vec<Step> {
    let manifest = BuildManifestCheck::new(vec![
        Box::new(BazelSource),
        Box::new(GnSource {
            targets: vec![gn::ARM, gn::CLANG],
        }),
    ]);
    vec![Step::Check(Box::new(manifest))]
}

pub fn quick_program(config: &Config) -> Result<Program, PresubmitError> {
    let mut steps = init_steps();
    steps.extend(python_steps()?);
    steps.push(gn_clang_build());
    steps.push(pragma_once());
    steps.extend(code_format_steps(config)?);
    steps.extend(general_steps());
    Program::new(QUICK, steps)
}

pub fn full_program(config: &Config) -> Result<Program, PresubmitError> {
    let mut steps = init_steps();
    steps.extend(gn_steps());
    steps.extend(cc_steps());
    steps.extend(python_steps()?);
    steps.extend(bazel_steps());
    steps.extend(code_format_steps(config)?);
    steps.extend(general_steps());
    Program::new(FULL, steps)
}

/// Every registered program. Built once per process.
pub fn standard_registry(config: &Config) -> Result<Registry, PresubmitError> {
    Registry::from_programs(vec![quick_program(config)?, full_program(config)?])
}
