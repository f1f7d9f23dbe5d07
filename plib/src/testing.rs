//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

pub struct TestPlan {
    pub cmd: String,
    pub args: Vec<String>,
    /// Files created in the scratch directory before the command runs, as `(name, contents)`.
    pub files: Vec<(String, String)>,
    pub expected_out: String,
    pub expected_err: String,
    pub expected_exit_code: i32,
    /// Files checked in the scratch directory after the command ran. `None` means the file must
    /// not exist.
    pub expected_files: Vec<(String, Option<String>)>,
}

/// The result of running a command inside its own scratch directory. The directory is removed
/// when this is dropped.
pub struct TestRun {
    pub output: Output,
    pub dir: TempDir,
}

impl TestRun {
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Contents of `name` in the scratch directory, if it exists.
    pub fn read(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.path(name)).ok()
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }
}

fn test_bin_path(cmd: &str) -> PathBuf {
    let relpath = if cfg!(debug_assertions) {
        format!("target/debug/{}", cmd)
    } else {
        format!("target/release/{}", cmd)
    };
    std::env::current_dir()
        .unwrap()
        .parent()
        .unwrap() // Move up to the workspace root from the current package directory
        .join(relpath)
}

/// Run `cmd` with `args` in a fresh scratch directory populated with `files`.
pub fn run_test_base(cmd: &str, args: &[String], files: &[(String, String)]) -> TestRun {
    let dir = tempfile::tempdir().expect("failed to create scratch directory");
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents)
            .unwrap_or_else(|e| panic!("failed to write {name}: {e}"));
    }

    let output = Command::new(test_bin_path(cmd))
        .args(args)
        .current_dir(dir.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap_or_else(|_| panic!("failed to spawn command {cmd}"));

    TestRun { output, dir }
}

pub fn run_test(plan: TestPlan) {
    let run = run_test_base(&plan.cmd, &plan.args, &plan.files);

    assert_eq!(run.stdout(), plan.expected_out, "stdout mismatch");
    assert_eq!(run.stderr(), plan.expected_err, "stderr mismatch");

    assert_eq!(
        run.output.status.code(),
        Some(plan.expected_exit_code),
        "exit code mismatch"
    );
    if plan.expected_exit_code == 0 {
        assert!(run.output.status.success());
    }

    for (name, expected) in &plan.expected_files {
        assert_eq!(&run.read(name), expected, "contents of {name} mismatch");
    }
}

pub fn run_test_with_checker<F: FnMut(&TestPlan, &TestRun)>(plan: TestPlan, mut checker: F) {
    let run = run_test_base(&plan.cmd, &plan.args, &plan.files);
    checker(&plan, &run);
}
