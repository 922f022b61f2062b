use presubmit::core::check::{Check, CheckContext};
use presubmit::core::config::Config;
use presubmit::core::environment::Environment;
use presubmit::core::error::PresubmitError;
use presubmit::core::process::SystemRunner;
use presubmit::plugins::copyright::{CopyrightCheck, LICENSE_BODY};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const ORG: &str = "The Example Authors";

fn header(first: &str, marker: &str) -> String {
    let mut out = format!("{}\n", first);
    for line in LICENSE_BODY {
        out.push_str(&format!("{}{}\n", marker, line));
    }
    out
}

fn write(root: &Path, rel: &str, contents: &str) -> String {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    rel.to_string()
}

fn run_check(root: &Path, paths: &[String]) -> Result<(), PresubmitError> {
    let env = Environment::new(root, ".presubmit");
    let config = Config::default();
    let ctx = CheckContext {
        env: &env,
        runner: &SystemRunner,
        config: &config,
    };
    let check = CopyrightCheck::new(ORG).unwrap();
    let filtered = check.filter().unwrap().apply(paths);
    check.run(&ctx, &filtered)
}

#[test]
fn valid_headers_in_every_comment_style_pass() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let paths = vec![
        write(
            root,
            "tools/run.py",
            &format!(
                "#!/usr/bin/env python3\n\n{}\"\"\"Doc.\"\"\"\n",
                header("# Copyright 2021 The Example Authors", "#")
            ),
        ),
        write(
            root,
            "pw_foo/foo.cc",
            &format!(
                "{}\n#include \"foo.h\"\n",
                header("// Copyright 2020 The Example Authors", "//")
            ),
        ),
        write(
            root,
            "pw_foo/foo.css",
            &format!(
                "/*\n{} */\nbody {{}}\n",
                header(" * Copyright 2019 The Example Authors", " *")
            ),
        ),
    ];
    run_check(root, &paths).unwrap();
}

#[test]
fn out_of_range_year_is_reported_with_its_path() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let good = write(
        root,
        "good.py",
        &header("# Copyright 2021 The Example Authors", "#"),
    );
    let bad = write(
        root,
        "pkg/bad.py",
        &header("# Copyright 1999 The Example Authors", "#"),
    );

    let err = run_check(root, &[good, bad]).unwrap_err();
    match err {
        PresubmitError::CheckFailed(failure) => {
            assert_eq!(failure.paths, vec!["pkg/bad.py"]);
            assert_eq!(
                failure.message,
                "1 file with a missing or incorrect copyright notice"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn excluded_files_are_never_read() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let paths = vec![
        write(root, "README.md", "no header here\n"),
        write(root, "LICENSE", "Apache License\n"),
        write(root, ".gitignore", "target/\n"),
    ];
    let check = CopyrightCheck::new(ORG).unwrap();
    assert!(check.filter().unwrap().apply(&paths).is_empty());
    run_check(root, &paths).unwrap();
}

#[test]
fn every_offender_is_listed() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let paths = vec![
        write(root, "a.py", "print('no header')\n"),
        write(root, "b.cc", &header("// Copyright 2021 Someone Else", "//")),
        write(
            root,
            "c.h",
            &header("// Copyright 2021 The Example Authors", "//").replace("the License at", "the license at"),
        ),
    ];
    match run_check(root, &paths).unwrap_err() {
        PresubmitError::CheckFailed(failure) => {
            assert_eq!(failure.paths, vec!["a.py", "b.cc", "c.h"]);
            assert!(failure.message.starts_with("3 files"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreadable_paths_are_listed_alongside_other_offenders() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("third_party/sub")).unwrap();
    let mut paths = vec![
        write(root, "a.py", "print('no header')\n"),
        write(root, "b.cc", "int main() {}\n"),
        "third_party/sub".to_string(),
    ];
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(root.join("gone.cc"), root.join("dangling.cc")).unwrap();
        paths.push("dangling.cc".to_string());
    }

    match run_check(root, &paths).unwrap_err() {
        PresubmitError::CheckFailed(failure) => {
            assert_eq!(&failure.paths[..3], ["a.py", "b.cc", "third_party/sub"]);
            assert_eq!(failure.paths.len(), paths.len());
            assert!(failure.message.starts_with(&format!("{} files", paths.len())));
        }
        other => panic!("unexpected error: {other}"),
    }
}
