//! Integration Tests

extern crate assert_cli;
extern crate tempdir;

use std::fs;
use std::io;
use std::path::PathBuf;

use assert_cli::Assert;
use tempdir::TempDir;

trait AssertExt {
    fn exit_status_is(self, exit_status: i32) -> Self;
}

impl AssertExt for Assert {
    fn exit_status_is(self, exit_status: i32) -> Self {
        if exit_status == 0 {
            self.succeeds()
        } else {
            self.fails_with(exit_status)
        }
    }
}

fn generate_temp_directory() -> io::Result<TempDir> {
    // Because of limitation in `assert_cli`, temporary directory must be
    // subdirectory of directory containing Cargo.toml
    let temp_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests");
    TempDir::new_in(temp_root, "temp")
}

/// Runs psh in `temp_dir` with `input` on stdin, logging inside `temp_dir`.
fn psh<I: Into<Vec<u8>>>(temp_dir: &TempDir, args: &[&str], input: I) -> Assert {
    let log_arg = format!("--log={}", temp_dir.path().join("psh.log").display());
    let mut all_args = vec![log_arg.as_str()];
    all_args.extend_from_slice(args);

    Assert::cargo_binary("psh")
        .current_dir(temp_dir.path())
        .with_args(&all_args[..])
        .stdin(input)
}

#[test]
fn test_exit_builtin() {
    let temp_dir = generate_temp_directory().unwrap();
    psh(&temp_dir, &[], "exit\necho never\n")
        .stdout()
        .contains("User prompt is: \"psh> \"")
        .stdout()
        .doesnt_contain("never")
        .exit_status_is(0)
        .unwrap();
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let temp_dir = generate_temp_directory().unwrap();
    psh(&temp_dir, &[], "").exit_status_is(0).unwrap();
}

#[test]
fn test_custom_prompt() {
    let temp_dir = generate_temp_directory().unwrap();
    psh(&temp_dir, &["-p", "test> "], "exit\n")
        .stdout()
        .is("User prompt is: \"test> \"\ntest> ")
        .unwrap();
}

#[test]
fn test_pwd_prints_working_directory() {
    let temp_dir = generate_temp_directory().unwrap();
    let expected = fs::canonicalize(temp_dir.path()).unwrap();
    psh(&temp_dir, &[], "pwd\n")
        .stdout()
        .contains(format!("{}\n", expected.display()).as_str())
        .unwrap();
}

#[test]
fn test_unknown_command_does_not_stop_shell() {
    let temp_dir = generate_temp_directory().unwrap();
    psh(&temp_dir, &[], "badcmd123\nset PSH_IT_VAR value\nget PSH_IT_VAR\n")
        .stdout()
        .contains("Cannot execute \"badcmd123\": ")
        .stdout()
        .contains("value\n")
        .exit_status_is(0)
        .unwrap();
}

#[test]
fn test_exit_on_launch_failure_flag() {
    let temp_dir = generate_temp_directory().unwrap();
    psh(&temp_dir, &["--exit-on-launch-failure"], "badcmd123\necho never\n")
        .stdout()
        .contains("Cannot execute \"badcmd123\": ")
        .stdout()
        .doesnt_contain("never")
        .exit_status_is(1)
        .unwrap();
}

#[test]
fn test_redirect_writes_only_program_output() {
    let temp_dir = generate_temp_directory().unwrap();
    psh(&temp_dir, &[], "echo redirected > out.txt\n")
        .stdout()
        .doesnt_contain("redirected")
        .stdout()
        .contains(" echo Exit 0\n")
        .unwrap();

    let contents = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
    assert_eq!(contents, "redirected\n");
}

#[test]
fn test_cd_changes_redirect_location() {
    let temp_dir = generate_temp_directory().unwrap();
    fs::create_dir(temp_dir.path().join("sub")).unwrap();
    psh(&temp_dir, &[], "cd sub\necho inside > out.txt\n")
        .exit_status_is(0)
        .unwrap();

    assert!(!temp_dir.path().join("out.txt").exists());
    let contents = fs::read_to_string(temp_dir.path().join("sub").join("out.txt")).unwrap();
    assert_eq!(contents, "inside\n");
}

#[test]
fn test_background_job_is_reported() {
    let temp_dir = generate_temp_directory().unwrap();
    psh(&temp_dir, &[], "true &\nsleep 1\njobs\n")
        .stdout()
        .contains("] true\n")
        .stdout()
        .contains("\"true\" Exit 0\n")
        .stdout()
        .doesnt_contain("running.")
        .unwrap();
}

#[test]
fn test_builtin_usage_error() {
    let temp_dir = generate_temp_directory().unwrap();
    psh(&temp_dir, &[], "get\n")
        .stdout()
        .contains("Not enough arguments for \"get\" command. Format should be \"get <var>\".\n")
        .exit_status_is(0)
        .unwrap();
}

#[test]
fn test_non_utf8_input_is_skipped() {
    let temp_dir = generate_temp_directory().unwrap();
    psh(&temp_dir, &[], &b"echo caf\xe9\nset PSH_IT_AFTER ok\nget PSH_IT_AFTER\n"[..])
        .stdout()
        .contains("psh: input is not valid UTF-8 after byte 8, line ignored\n")
        .stdout()
        .contains("ok\n")
        .exit_status_is(0)
        .unwrap();
}

#[test]
fn test_foreground_command_is_announced() {
    let temp_dir = generate_temp_directory().unwrap();
    psh(&temp_dir, &[], "true\n")
        .stdout()
        .contains("] true\n")
        .stdout()
        .contains("] true Exit 0\n")
        .unwrap();
}
