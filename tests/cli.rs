use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn jig(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jig").expect("binary builds");
    cmd.arg("--config").arg(dir.path().join("config.yaml"));
    cmd.env_remove("JIRA_SERVER");
    cmd.env_remove("JIRA_EMAIL");
    cmd.env_remove("JIRA_API_TOKEN");
    cmd
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn template_prints_the_stencil() {
    let dir = TempDir::new().expect("tempdir");
    jig(&dir)
        .arg("template")
        .assert()
        .success()
        .stdout(predicate::str::contains("project: PROJ"))
        .stdout(predicate::str::contains("issuetype: Task"))
        .stdout(predicate::str::contains("summary:"));
}

#[test]
fn template_output_lints_clean() {
    let dir = TempDir::new().expect("tempdir");
    let output = jig(&dir).arg("template").output().expect("run template");
    assert!(output.status.success());
    let path = dir.path().join("ticket.yaml");
    fs::write(&path, &output.stdout).expect("write template");

    jig(&dir)
        .arg("lint")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn lint_reports_every_problem() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "bad.yaml", "summary: hi\npriority: Urgent\n");

    jig(&dir)
        .arg("lint")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("project key is required"))
        .stdout(predicate::str::contains("issue type is required"))
        .stdout(predicate::str::contains("unknown priority `Urgent`"))
        .stderr(predicate::str::contains("3 validation error(s)"));
}

#[test]
fn lint_accepts_a_project_flag() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "ticket.yaml", "issuetype: Bug\nsummary: Crash\n");

    jig(&dir)
        .args(["lint", "--project", "PROJ"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn lint_rejects_unknown_keys() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "typo.yaml", "summary: hi\nduedate: 2025-01-01\n");

    jig(&dir)
        .arg("lint")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ticket file"));
}

#[test]
fn create_dry_run_prints_the_payload() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(
        &dir,
        "ticket.yaml",
        "project: PROJ\nissuetype: Task\nsummary: Hello\nlabels:\n  - infra\n",
    );

    jig(&dir)
        .args(["create", "--dry-run"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\": \"PROJ\""))
        .stdout(predicate::str::contains("\"summary\": \"Hello\""))
        .stdout(predicate::str::contains("\"labels\""));
}

#[test]
fn create_without_server_configured_fails() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "ticket.yaml", "project: PROJ\nissuetype: Task\nsummary: Hello\n");

    jig(&dir)
        .arg("create")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn create_refuses_an_invalid_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "ticket.yaml", "project: PROJ\nissuetype: Incident\nsummary: Hello\n");

    jig(&dir)
        .args(["create", "--dry-run"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown issue type `Incident`"));
}

#[test]
fn config_show_masks_the_token() {
    let dir = TempDir::new().expect("tempdir");
    write_file(
        &dir,
        "config.yaml",
        "server: https://company.atlassian.net\nemail: me@example.com\napi_token: abcdef123\n",
    );

    jig(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abc***123"))
        .stdout(predicate::str::contains("me@example.com"))
        .stdout(predicate::str::contains("abcdef123").not());
}

#[test]
fn view_web_prints_the_browse_url() {
    let dir = TempDir::new().expect("tempdir");
    write_file(&dir, "config.yaml", "server: https://company.atlassian.net\n");

    jig(&dir)
        .args(["view", "PROJ-7", "--web"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://company.atlassian.net/browse/PROJ-7",
        ));
}

#[test]
fn list_without_server_configured_fails() {
    let dir = TempDir::new().expect("tempdir");

    jig(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}
