use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn svcs(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svcs"))
        .args(args)
        .current_dir(dir)
        .env_remove("SVCS_LOG")
        .output()
        .expect("Failed to run svcs")
}

fn stdout(dir: &Path, args: &[&str]) -> String {
    let output = svcs(dir, args);
    assert!(output.status.success(), "svcs {:?} failed: {:?}", args, output);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

const HELP: &str = "These are SVCS commands:
config     Get and set a username.
add        Add a file to the index.
log        Show commit logs.
commit     Save changes.
checkout   Restore a file.
";

#[test]
fn test_cli_help() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(stdout(tmp.path(), &[]), HELP);
    assert_eq!(stdout(tmp.path(), &["--help"]), HELP);
    assert_eq!(stdout(tmp.path(), &["push"]), "'push' is not a SVCS command.\n");
}

#[test]
fn test_cli_bootstrap_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    stdout(tmp.path(), &[]);

    let vcs = tmp.path().join("vcs");
    assert!(vcs.join("commits").is_dir());
    for file in ["config.txt", "index.txt", "log.txt"] {
        assert_eq!(fs::read_to_string(vcs.join(file)).unwrap(), "");
    }

    stdout(tmp.path(), &["config", "Alice"]);
    stdout(tmp.path(), &[]);
    stdout(tmp.path(), &["--help"]);
    assert_eq!(fs::read_to_string(vcs.join("config.txt")).unwrap(), "Alice");
}

#[test]
fn test_cli_example_session() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "hello").unwrap();

    assert_eq!(stdout(dir, &["config"]), "Please, tell me who you are.\n");
    assert_eq!(stdout(dir, &["config", "Alice"]), "The username is Alice.\n");
    assert_eq!(stdout(dir, &["add", "a.txt"]), "The file 'a.txt' is tracked.\n");
    assert_eq!(stdout(dir, &["add"]), "Tracked files:\na.txt\n");
    assert_eq!(stdout(dir, &["commit"]), "Message was not passed.\n");
    assert_eq!(stdout(dir, &["commit", "first"]), "Changes are committed.\n");
    assert_eq!(stdout(dir, &["commit", "again"]), "Nothing to commit.\n");

    let log = stdout(dir, &["log"]);
    assert!(log.starts_with("-----\ncommit "), "unexpected log: {}", log);
    assert!(log.contains("Author: Alice\nfirst\n"));
    assert_eq!(log.matches("-----").count(), 1);
}

#[test]
fn test_cli_checkout_restores_content() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("file.txt"), "original").unwrap();

    stdout(dir, &["config", "Alice"]);
    stdout(dir, &["add", "file.txt"]);
    stdout(dir, &["commit", "msg"]);

    let log = stdout(dir, &["log"]);
    let id = log
        .lines()
        .find_map(|l| l.strip_prefix("commit "))
        .expect("Failed to parse commit id")
        .to_string();
    assert_eq!(id.len(), 64);

    fs::write(dir.join("file.txt"), "mutated").unwrap();
    assert_eq!(
        stdout(dir, &["checkout", &id]),
        format!("Switched to commit {}.\n", id)
    );
    assert_eq!(fs::read_to_string(dir.join("file.txt")).unwrap(), "original");

    assert_eq!(stdout(dir, &["checkout"]), "Commit id was not passed.\n");
    assert_eq!(stdout(dir, &["checkout", "nothex"]), "Commit does not exist.\n");
}

#[test]
fn test_cli_partial_checkout() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "a").unwrap();

    stdout(dir, &["config", "Alice"]);
    stdout(dir, &["add", "a.txt"]);
    stdout(dir, &["commit", "only a"]);
    let log = stdout(dir, &["log"]);
    let id = log.lines().find_map(|l| l.strip_prefix("commit ")).unwrap().to_string();

    fs::write(dir.join("b.txt"), "b").unwrap();
    stdout(dir, &["add", "b.txt"]);

    assert_eq!(
        stdout(dir, &["checkout", &id]),
        format!("File 'b.txt' not found in commit.\nSwitched to commit {}.\n", id)
    );
}

#[test]
fn test_cli_unreadable_file_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "a").unwrap();

    stdout(dir, &["config", "Alice"]);
    stdout(dir, &["add", "a.txt"]);
    fs::remove_file(dir.join("a.txt")).unwrap();

    let output = svcs(dir, &["commit", "broken"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("a.txt"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_cli_hyphen_arguments() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "a").unwrap();

    assert_eq!(stdout(dir, &["-x"]), "'-x' is not a SVCS command.\n");
    assert_eq!(stdout(dir, &["--verbose"]), "'--verbose' is not a SVCS command.\n");

    stdout(dir, &["config", "Alice"]);
    stdout(dir, &["add", "a.txt"]);
    assert_eq!(stdout(dir, &["commit", "-fix typo"]), "Changes are committed.\n");
    assert!(stdout(dir, &["log"]).contains("Author: Alice\n-fix typo\n"));
    assert_eq!(stdout(dir, &["checkout", "-1"]), "Commit does not exist.\n");
}

#[test]
fn test_cli_surplus_arguments_are_ignored() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();

    assert_eq!(stdout(dir, &["config", "Alice", "extra"]), "The username is Alice.\n");
    assert_eq!(stdout(dir, &["log", "extra"]), "No commits yet.\n");
}

#[test]
fn test_cli_add_empty_path_is_not_found() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(stdout(tmp.path(), &["add", ""]), "Can't find ''.\n");
    assert_eq!(stdout(tmp.path(), &["add"]), "Add a file to the index.\n");
}

#[cfg(target_os = "linux")]
#[test]
fn test_cli_lock_left_by_dead_process_is_taken_over() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "a").unwrap();

    stdout(dir, &["config", "Alice"]);
    stdout(dir, &["add", "a.txt"]);
    let acquired_at = chrono::Utc::now().to_rfc3339();
    fs::write(
        dir.join("vcs").join("lock"),
        format!(r#"{{"pid":{},"acquired_at":"{}"}}"#, u32::MAX, acquired_at),
    )
    .unwrap();

    assert_eq!(stdout(dir, &["commit", "first"]), "Changes are committed.\n");
    assert!(!dir.join("vcs").join("lock").exists());
}
