//! Integration tests for the `latticed` binary entry point: role selection
//! and worker lock contention, observed from outside the process.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

#[test]
fn unrecognised_role_exits_nonzero_naming_the_value() {
    let scratch = TempDir::new().expect("create temp dir");
    let mut command = cargo_bin_cmd!("latticed");
    command.current_dir(scratch.path());
    command.args(["--role", "flibber"]);
    command.assert().failure().stderr(contains("flibber"));
}

#[test]
fn main_role_bootstraps_and_exits_cleanly() {
    let scratch = TempDir::new().expect("create temp dir");
    let mut command = cargo_bin_cmd!("latticed");
    command.current_dir(scratch.path());
    command.args([
        "--role",
        "main",
        "--bind-addr",
        "127.0.0.1:0",
        "--work-dir",
        "work",
        "--sandbox-dir",
        "sandbox",
    ]);
    command.assert().success();
}

#[test]
fn occupied_work_directory_rejects_a_worker_before_any_bind() {
    let scratch = TempDir::new().expect("create temp dir");
    let work = scratch.path().join("work");
    std::fs::create_dir_all(&work).expect("create work dir");
    std::fs::write(work.join("latticed.lock"), b"").expect("plant lock file");

    let mut command = cargo_bin_cmd!("latticed");
    command.current_dir(scratch.path());
    command.args([
        "--role",
        "worker",
        "--bind-addr",
        "127.0.0.1:0",
        "--work-dir",
        "work",
        "--sandbox-dir",
        "sandbox",
    ]);
    command.assert().failure().stderr(contains("already locked"));
}
