use std::io::Write;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

fn run_shell(input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_myshell"))
        .arg("--no-editor")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start myshell");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .expect("failed to write input");
    child.wait_with_output().expect("failed to wait for myshell")
}

fn stdout_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn exit_ends_session_successfully() {
    let out = run_shell("exit\nhelp\n");
    assert!(out.status.success());
    assert_eq!(stdout_of(&out), "> ");
    assert!(stderr_of(&out).is_empty());
}

#[test]
fn end_of_input_ends_session_successfully() {
    let out = run_shell("\n\n");
    assert!(out.status.success());
    assert_eq!(stdout_of(&out), "> > > ");
}

#[test]
fn help_lists_builtins() {
    let out = run_shell("help\nexit\n");
    let stdout = stdout_of(&out);
    for name in ["cd", "help", "exit"] {
        assert!(stdout.contains(&format!("  {name}\n")), "stdout: {stdout}");
    }
}

#[test]
fn cd_without_argument_is_reported() {
    let out = run_shell("cd\nexit\n");
    assert!(out.status.success());
    assert_eq!(stderr_of(&out), "myshell: expected argument to \"cd\"\n");
}

#[test]
fn cd_to_missing_directory_is_reported() {
    let out = run_shell("cd /nonexistent-path-for-myshell\nexit\n");
    assert_eq!(stderr_of(&out), "myshell: No such file or directory\n");
}

#[test]
fn cd_changes_directory_for_children() {
    let out = run_shell("cd /\npwd\nexit\n");
    assert_eq!(stdout_of(&out), "> > /\n> ");
}

#[test]
fn external_program_output_is_inherited() {
    let out = run_shell("echo hello   world\nexit\n");
    assert_eq!(stdout_of(&out), "> hello world\n> ");
}

#[test]
fn unknown_program_reports_and_continues() {
    let out = run_shell("myshell-no-such-program-xyz arg\nhelp\nexit\n");
    assert!(out.status.success());
    assert_eq!(stderr_of(&out), "myshell: No such file or directory\n");
    assert!(stdout_of(&out).contains("The following are built in:"));
}

#[test]
fn slow_program_is_waited_for() {
    let started = Instant::now();
    let out = run_shell("sleep 0.3\necho done\nexit\n");
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert_eq!(stdout_of(&out), "> > done\n> ");
}

#[test]
fn commands_run_in_input_order() {
    let out = run_shell("echo one\necho two\necho three\n");
    assert_eq!(stdout_of(&out), "> one\n> two\n> three\n> ");
}
