//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use plib::testing::{run_test, run_test_with_checker, TestPlan, TestRun};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const SOURCE_FILE: &str = "in.bt";
const OUTPUT_FILE: &str = "out.bt";

/// Unescape newlines from .out file format
fn unescape_newlines(input: &str) -> String {
    input.replace("\\n", "\n")
}

struct Expected {
    args: Vec<String>,
    stdout: String,
    stderr: String,
    status: i32,
    script: Option<String>,
}

/// Parse the .out file format (key=value lines)
fn parse_out_file(content: &str) -> Expected {
    let mut expected = Expected {
        args: Vec::new(),
        stdout: String::new(),
        stderr: String::new(),
        status: 0,
        script: None,
    };

    for line in content.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            match key {
                "args" => expected.args = value.split_whitespace().map(String::from).collect(),
                "stdout" => expected.stdout = unescape_newlines(value),
                "stderr" => expected.stderr = unescape_newlines(value),
                "status" => expected.status = value.parse().unwrap_or(0),
                "script" => expected.script = Some(unescape_newlines(value)),
                _ => {}
            }
        }
    }

    expected
}

fn plan(source: String, args: Vec<String>) -> TestPlan {
    let mut full_args = vec!["-f".to_owned(), SOURCE_FILE.to_owned()];
    full_args.extend(args);
    TestPlan {
        cmd: String::from("btcc"),
        args: full_args,
        files: vec![(SOURCE_FILE.to_owned(), source)],
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
        expected_files: Vec::new(),
    }
}

/// Load a fixture and create a TestPlan. A fixture without a `script` key must not produce an
/// output file.
fn load_fixture(name: &str) -> TestPlan {
    let base = Path::new("fixtures/integration_tests");
    let bt_path = base.join(format!("{}.bt", name));
    let out_path = base.join(format!("{}.out", name));

    let source = fs::read_to_string(&bt_path)
        .unwrap_or_else(|_| panic!("Failed to read {}", bt_path.display()));
    let out_content = fs::read_to_string(&out_path)
        .unwrap_or_else(|_| panic!("Failed to read {}", out_path.display()));
    let expected = parse_out_file(&out_content);

    TestPlan {
        expected_out: expected.stdout,
        expected_err: expected.stderr,
        expected_exit_code: expected.status,
        expected_files: vec![(OUTPUT_FILE.to_owned(), expected.script)],
        ..plan(source, expected.args)
    }
}

// Macro for standard fixture tests
macro_rules! btcc_test {
    ($name:ident) => {
        #[test]
        fn $name() {
            run_test(load_fixture(stringify!($name)));
        }
    };
}

// ============================================================================
// Standard tests
// ============================================================================

btcc_test!(call_argument_define);
btcc_test!(define);
btcc_test!(macro_hygiene);
btcc_test!(macro_nested_call);
btcc_test!(macro_return);
btcc_test!(predefine);
btcc_test!(redefine);
btcc_test!(verbose);

// ============================================================================
// Fatal errors
// ============================================================================

btcc_test!(error_argument_count);
btcc_test!(error_duplicate_macro);
btcc_test!(error_duplicate_parameter);
btcc_test!(error_invalid_argument);
btcc_test!(error_invalid_parameter);
btcc_test!(error_nested_macro);
btcc_test!(error_recursive_call);
btcc_test!(error_unknown_macro);
btcc_test!(error_unmatched_end);
btcc_test!(error_unterminated_macro);

// ============================================================================
// Other tests
// ============================================================================

#[test]
fn output_path() {
    let mut plan = plan(
        "%define N 1\nBEGIN { @n = N; }\n".to_owned(),
        vec!["-o".to_owned(), "compiled.bt".to_owned()],
    );
    plan.expected_out =
        "[Success] new compiled script compiled.bt has been generated!\n".to_owned();
    plan.expected_files = vec![
        ("compiled.bt".to_owned(), Some("BEGIN { @n = 1; }\n".to_owned())),
        (OUTPUT_FILE.to_owned(), None),
    ];
    run_test(plan);
}

#[test]
fn missing_source_file() {
    let mut plan = plan(String::new(), Vec::new());
    plan.files.clear();
    run_test_with_checker(plan, |_plan: &TestPlan, run: &TestRun| {
        assert_eq!(run.stdout(), "");
        assert!(
            run.stderr().starts_with("Error: in.bt: "),
            "unexpected stderr: {}",
            run.stderr()
        );
        assert_eq!(run.output.status.code(), Some(1));
        assert!(run.read(OUTPUT_FILE).is_none());
    });
}

#[test]
fn invalid_predefine_name() {
    let plan = plan("BEGIN { @n = 1; }\n".to_owned(), vec!["a b=1".to_owned()]);
    run_test_with_checker(plan, |_plan: &TestPlan, run: &TestRun| {
        assert_eq!(run.output.status.code(), Some(2));
        assert!(
            run.stderr().contains("invalid pre-define name"),
            "unexpected stderr: {}",
            run.stderr()
        );
        assert!(run.read(OUTPUT_FILE).is_none());
    });
}

#[test]
fn existing_output_untouched_on_error() {
    let mut plan = plan("%call missing()\n".to_owned(), Vec::new());
    plan.files
        .push((OUTPUT_FILE.to_owned(), "previous\n".to_owned()));
    plan.expected_err = "Error: call an unknown macro (missing) at line: 1\n".to_owned();
    plan.expected_exit_code = 1;
    plan.expected_files = vec![(OUTPUT_FILE.to_owned(), Some("previous\n".to_owned()))];
    run_test(plan);
}

#[test]
fn hygiene_prefixes_are_unique() {
    let mut source = String::from("%macro swap($a, $b)\n$tmp = $a; $a = $b; $b = $tmp;\n%end\n");
    for i in 0..25 {
        source.push_str(&format!("    %call swap($x{i}, $y{i});\n"));
    }
    run_test_with_checker(plan(source, Vec::new()), |_plan: &TestPlan, run: &TestRun| {
        assert_eq!(run.output.status.code(), Some(0), "{}", run.stderr());
        let script = run.read(OUTPUT_FILE).expect("no output script");
        let re = regex_lite::Regex::new(r"(?m)^    \$(__m\d+_)a = \$x(\d+);$").unwrap();
        let prefixes: Vec<&str> = re
            .captures_iter(&script)
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(prefixes.len(), 25);
        let unique: HashSet<&str> = prefixes.iter().copied().collect();
        assert_eq!(unique.len(), prefixes.len());

        // Locals declared inside the body are namespaced as well.
        let tmp = regex_lite::Regex::new(r"\$(__m\d+_)tmp = ").unwrap();
        assert_eq!(tmp.find_iter(&script).count(), 25);
    });
}
