//! The `corral` binary, driven through stdin.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn run_corral(args: &[&str], stdin: &str) -> Output {
    // An empty HOME keeps a developer's ~/.corral/config.toml out of the run.
    let home = tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_corral"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn sorted_lines(output: &Output) -> Vec<String> {
    let mut lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}

#[test]
fn help_prints_usage() {
    let output = run_corral(&["--help"], "");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("usage: corral"));
}

#[cfg(unix)]
#[test]
fn reports_every_command_and_fails_on_any_failure() {
    let output = run_corral(&["-j", "2"], "true\n# skipped\n\nexit 3\ntrue\n");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        sorted_lines(&output),
        vec![
            "[0] ok: true".to_string(),
            "[1] failed (invalid exit code 3): exit 3".to_string(),
            "[2] ok: true".to_string(),
        ]
    );
}

#[cfg(unix)]
#[test]
fn all_successes_exit_zero() {
    let output = run_corral(&["--jobs=1"], "true\ntrue\n");
    assert!(output.status.success());
    assert_eq!(sorted_lines(&output).len(), 2);
}

#[cfg(unix)]
#[test]
fn fail_fast_stops_after_first_failure() {
    let output = run_corral(&["-j1", "--fail-fast"], "exit 5\ntrue\n");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        sorted_lines(&output),
        vec!["[0] failed (invalid exit code 5): exit 5".to_string()]
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("command 0 failed: exit 5"));
}

#[test]
fn bad_arguments_exit_two() {
    let output = run_corral(&["--jobs", "0"], "");
    assert_eq!(output.status.code(), Some(2));
}
