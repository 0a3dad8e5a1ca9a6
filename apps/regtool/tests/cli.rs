use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// The workspace root, where the sample `config/` lives.
fn workspace() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn regtool() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_regtool"));
    cmd.current_dir(workspace())
        .env("RUST_LOG", "warn")
        .args(["--fixtures", "config/fixtures.json", "--at", "2026-03-10T00:00:00Z"]);
    cmd
}

#[test]
fn check_prints_the_admitted_plan() {
    regtool()
        .args(["check", "config/samples/create.json", "--registrar", "registrar-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("domain:       example.example"))
        .stdout(predicate::str::contains("cost:         USD 26.00"))
        .stdout(predicate::str::contains("reservation:  UNRESERVED"));
}

#[test]
fn create_reports_the_new_repo_id() {
    regtool()
        .args(["create", "config/samples/create.json", "--registrar", "registrar-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repo id:"))
        .stdout(predicate::str::contains("-EXAMPLE"))
        .stdout(predicate::str::contains("dns queued:   1"));
}

#[test]
fn rejections_carry_the_result_code() {
    let dir = tempdir().unwrap();
    let raw = fs::read_to_string(workspace().join("config/samples/create.json")).unwrap();
    let blocked = dir.path().join("blocked.json");
    fs::write(&blocked, raw.replace("example.example", "blocked.example")).unwrap();

    regtool()
        .arg("check")
        .arg(&blocked)
        .args(["--registrar", "registrar-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2304"))
        .stderr(predicate::str::contains("blocked is reserved"));
}

#[test]
fn unknown_registrar_is_an_error() {
    regtool()
        .args(["check", "config/samples/create.json", "--registrar", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown registrar 'nobody'"));
}

#[test]
fn unreferenced_host_is_deleted() {
    regtool()
        .args(["delete-host", "ns2.example.net", "--registrar", "registrar-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2-ROID: deleted"));
}

#[test]
fn garbage_smd_fails_verification() {
    let dir = tempdir().unwrap();
    let smd = dir.path().join("mark.smd");
    fs::write(&smd, "not a signed mark").unwrap();

    regtool().arg("verify-smd").arg(&smd).assert().failure();
}

#[test]
fn missing_config_is_fatal() {
    regtool()
        .args(["--config", "config/absent.toml", "check", "config/samples/create.json", "--registrar", "registrar-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration is malformed"));
}
