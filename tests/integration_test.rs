use assert_cmd::Command;
use predicates::prelude::*;

fn spysh() -> Command {
    let mut cmd = Command::cargo_bin("spysh").unwrap();
    cmd.env_remove("PORT")
        .env_remove("PASSWORD")
        .env_remove("LOG_DIR");
    cmd
}

#[test]
fn test_cli_help() {
    spysh()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("remote shell"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    spysh().arg("--version").assert().success();
}

#[test]
fn test_missing_subcommand() {
    spysh().assert().failure();
}

#[test]
fn test_local_session() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("transcript.txt");

    spysh()
        .arg("local")
        .arg("--transcript")
        .arg(&transcript)
        .write_stdin("echo one\nexit\n")
        .assert()
        .success()
        .stdout("$ one\n$ Goodbye!\n");

    assert_eq!(
        std::fs::read_to_string(&transcript).unwrap(),
        "$ echo one\none\nexit\n"
    );
}

#[test]
fn test_local_session_without_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("missing").join("transcript.txt");

    spysh()
        .arg("local")
        .arg("--transcript")
        .arg(&transcript)
        .write_stdin("echo two\n")
        .assert()
        .success()
        .stdout("WARNING No transcript will be available for this session!\n$ two\n$ ")
        .stderr(predicate::str::contains(transcript.display().to_string()));
}

#[test]
fn test_server_requires_port() {
    let dir = tempfile::tempdir().unwrap();

    spysh()
        .arg("server")
        .arg("--config")
        .arg(dir.path().join("none.toml"))
        .arg("--password")
        .arg("pw")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PORT must be set"));
}

#[test]
fn test_server_requires_password() {
    let dir = tempfile::tempdir().unwrap();

    spysh()
        .arg("server")
        .arg("--config")
        .arg(dir.path().join("none.toml"))
        .arg("--port")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PASSWORD must be set"));
}

#[test]
fn test_server_rejects_file_as_transcript_dir() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not-a-dir");
    std::fs::write(&file, "x").unwrap();

    spysh()
        .arg("server")
        .arg("--config")
        .arg(dir.path().join("none.toml"))
        .arg("--port")
        .arg("0")
        .arg("--password")
        .arg("pw")
        .arg("--transcript-dir")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_server_bind_failure_exits_non_zero() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();
    let dir = tempfile::tempdir().unwrap();

    spysh()
        .arg("server")
        .arg("--config")
        .arg(dir.path().join("none.toml"))
        .arg("--host")
        .arg("127.0.0.1")
        .arg("--port")
        .arg(port.to_string())
        .arg("--password")
        .arg("pw")
        .arg("--transcript-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to bind"));
}
