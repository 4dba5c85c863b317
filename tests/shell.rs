use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_shell(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_doglang"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("DOGLANG_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(input.as_bytes()).unwrap();
    drop(stdin);

    child.wait_with_output().unwrap()
}

#[test]
fn test_repl_reads_piped_input() {
    let output = run_shell(&["repl"], "a = 2;\nbark(a * 21);\nquit\n");
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(output.status.success());
    assert!(stdout.contains("42\n"), "stdout was: {}", stdout);
    assert!(stdout.contains("Goodbye!"));
}

#[test]
fn test_repl_without_subcommand_ends_at_eof() {
    let output = run_shell(&[], "bark(\"woof\");\n");
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(output.status.success());
    assert!(stdout.contains("woof\n"), "stdout was: {}", stdout);
    assert!(stdout.contains("Goodbye!"));
}

#[test]
fn test_repl_fetch_takes_next_piped_line() {
    let output = run_shell(
        &["repl"],
        "name = fetch \"Name? \";\nBiscuit\nbark(name + \"!\");\nquit\n",
    );
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(output.status.success());
    assert!(stdout.contains("Name? "), "stdout was: {}", stdout);
    assert!(stdout.contains("Biscuit!\n"), "stdout was: {}", stdout);
}
