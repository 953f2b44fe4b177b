use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const INSTANCE: &str = r"
spec:
  id: 550e8400-e29b-41d4-a716-446655440000
  fqName: dh-mysql-apb
  image: docker.io/example/mysql-apb:latest
  description: MySQL database
context:
  platform: kubernetes
  namespace: db
parameters:
  db_name: orders
";

fn brig(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("brig").unwrap();
    cmd.current_dir(dir)
        .env("BRIG_LOG", "error")
        .env_remove("RUST_LOG")
        .env_remove("BRIG_CONFIG");
    cmd
}

fn write_instance(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn dry_run_deprovision_prints_workload() {
    let tmp = tempfile::tempdir().unwrap();
    let instance = write_instance(tmp.path(), "instance.yaml", INSTANCE);

    brig(tmp.path())
        .args(["--dry-run", "deprovision", "--instance"])
        .arg(&instance)
        .assert()
        .success()
        .stdout("brig-deprovision-1\n");
}

#[test]
fn dry_run_json_summary() {
    let tmp = tempfile::tempdir().unwrap();
    let instance = write_instance(tmp.path(), "instance.yaml", INSTANCE);

    let output = brig(tmp.path())
        .args(["--dry-run", "--output", "json", "run", "test", "-i"])
        .arg(&instance)
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["status"], "completed");
    assert_eq!(summary["workload"], "brig-test-1");
    assert_eq!(summary["phases"][0], "validating");
    assert_eq!(summary["phases"].as_array().unwrap().last().unwrap(), "done");
}

#[test]
fn missing_image_fails_with_diagnostic() {
    let tmp = tempfile::tempdir().unwrap();
    let legacy = INSTANCE.replace("  image: docker.io/example/mysql-apb:latest\n", "");
    let instance = write_instance(tmp.path(), "legacy.yaml", &legacy);

    brig(tmp.path())
        .args(["--dry-run", "deprovision", "-i"])
        .arg(&instance)
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("legacy bundle"));
}

#[test]
fn json_instance_files_are_accepted() {
    let tmp = tempfile::tempdir().unwrap();
    let instance = write_instance(
        tmp.path(),
        "instance.json",
        r#"{
            "spec": {
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "fq_name": "dh-mysql-apb",
                "image": "docker.io/example/mysql-apb:latest"
            },
            "context": { "platform": "kubernetes", "namespace": "db" }
        }"#,
    );

    brig(tmp.path())
        .args(["--dry-run", "deprovision", "-i"])
        .arg(&instance)
        .assert()
        .success();
}

#[test]
fn missing_instance_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    brig(tmp.path())
        .args(["--dry-run", "deprovision", "-i", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.yaml"));
}

#[test]
fn invalid_action_name_is_a_usage_error() {
    let tmp = tempfile::tempdir().unwrap();
    brig(tmp.path())
        .args(["run", "drop;db", "-i", "instance.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn config_reads_brig_toml_and_flags() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("brig.toml"),
        "[cluster]\nsandbox_role = \"admin\"\n\n[orchestrator]\nwatch_timeout = \"15m\"\n",
    )
    .unwrap();

    let output = brig(tmp.path())
        .args(["--context", "staging", "config"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["cluster"]["sandbox_role"], "admin");
    assert_eq!(config["cluster"]["context"], "staging");
    assert_eq!(config["orchestrator"]["watch_timeout"], "15m");
}
