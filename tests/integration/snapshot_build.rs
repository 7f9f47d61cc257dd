use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_snapshot(root: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vizdata"))
        .arg("--root")
        .arg(root)
        .args(["--log-level", "off", "snapshot"])
        .env_remove("VIZDATA_LOG")
        .env_remove("VIZDATA_LOG_OUTPUT")
        .output()
        .expect("vizdata binary should run")
}

#[test]
fn snapshot_without_any_json_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let raw = temp.path().join("data").join("raw");
    fs::create_dir_all(&raw).unwrap();
    fs::write(raw.join("table.csv"), "a,b\n1,2\n").unwrap();

    let output = run_snapshot(temp.path());
    assert!(!output.status.success());
    assert!(!temp.path().join("public").join("data-structure.json").exists());
    assert!(!temp.path().join("public").join("data").exists());
}

#[test]
fn snapshot_of_missing_data_dir_exits_non_zero() {
    let temp = TempDir::new().unwrap();

    let output = run_snapshot(temp.path());
    assert!(!output.status.success());
}

#[test]
fn snapshot_writes_structure_and_published_copy() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(data.join("cities")).unwrap();
    fs::write(data.join("cities").join("paris.json"), "{}").unwrap();

    let output = run_snapshot(temp.path());
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["json_files"], 1);
    assert_eq!(report["published_json_files"], 1);

    let snapshot: serde_json::Value = serde_json::from_slice(
        &fs::read(temp.path().join("public").join("data-structure.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        snapshot,
        serde_json::json!({ "cities": { "files": ["paris.json"] } })
    );
    assert!(temp
        .path()
        .join("public")
        .join("data")
        .join("cities")
        .join("paris.json")
        .is_file());
}

#[test]
fn snapshot_refuses_publish_dir_containing_the_data() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("public").join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("a.json"), "{}").unwrap();
    fs::write(
        temp.path().join("vizdata.toml"),
        r#"data_dir = "public/data"

[snapshot]
publish_dir = "public"
output_file = "build/data-structure.json"
"#,
    )
    .unwrap();

    let output = run_snapshot(temp.path());
    assert!(!output.status.success());
    assert!(data.join("a.json").is_file());
    assert!(!temp.path().join("build").join("data-structure.json").exists());
}
