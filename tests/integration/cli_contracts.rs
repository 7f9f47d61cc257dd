use std::fs;

use clap::Parser;
use tempfile::TempDir;
use vizdata::config::VizConfig;
use vizdata::tooling::cli::{Cli, CliContext, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["vizdata", "serve"],
        vec!["vizdata", "serve", "--host", "0.0.0.0", "--port", "8080"],
        vec!["vizdata", "structure", "--format", "tagged"],
        vec!["vizdata", "--root", "/srv/app", "structure", "--path", "data/sub"],
        vec!["vizdata", "snapshot", "--output", "dist/tree.json"],
        vec!["vizdata", "fix"],
        vec!["vizdata", "fix", "data/a.json", "data/b.json", "--format", "json"],
        vec!["vizdata", "watch", "--settle-ms", "250", "--no-initial-pass"],
        vec!["vizdata", "--log-level", "debug", "--log-format", "json", "config"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_port() {
    assert!(Cli::try_parse_from(["vizdata", "serve", "--port", "99999"]).is_err());
    assert!(Cli::try_parse_from(["vizdata", "unknown"]).is_err());
}

fn context_for(temp: &TempDir) -> CliContext {
    CliContext::with_config(temp.path().to_path_buf(), VizConfig::default()).unwrap()
}

#[test]
fn structure_command_prints_flat_json() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("a.json"), "{}").unwrap();

    let cli = context_for(&temp);
    let output = cli
        .execute(&Commands::Structure {
            format: "flat".to_string(),
            path: None,
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, serde_json::json!({ "files": ["a.json"] }));
}

#[test]
fn structure_command_rejects_unknown_format() {
    let temp = TempDir::new().unwrap();
    let cli = context_for(&temp);
    let result = cli.execute(&Commands::Structure {
        format: "yaml".to_string(),
        path: None,
    });
    assert!(result.is_err());
}

#[test]
fn fix_json_report_contract_has_required_fields() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    let mut bom = vec![0xEF, 0xBB, 0xBF];
    bom.extend_from_slice(b"{\"x\":true}");
    fs::write(data.join("bom.json"), bom).unwrap();
    fs::write(data.join("broken.json"), "{").unwrap();

    let cli = context_for(&temp);
    let output = cli
        .execute(&Commands::Fix {
            paths: Vec::new(),
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["rewritten"], 1);
    assert_eq!(parsed["rejected"], 1);
    assert_eq!(parsed["failed"], 0);
    let entries = parsed["entries"].as_array().expect("entries array should exist");
    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert!(entry.get("path").and_then(|v| v.as_str()).is_some());
        assert!(entry.get("status").and_then(|v| v.as_str()).is_some());
    }
}

#[test]
fn fix_with_explicit_paths_only_touches_those_files() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("chosen.json"), r#"{"a":1}"#).unwrap();
    fs::write(data.join("other.json"), r#"{"b":2}"#).unwrap();

    let cli = context_for(&temp);
    let output = cli
        .execute(&Commands::Fix {
            paths: vec!["data/chosen.json".into()],
            format: "text".to_string(),
        })
        .unwrap();

    assert!(output.contains("chosen.json"));
    assert_eq!(
        fs::read_to_string(data.join("chosen.json")).unwrap(),
        "{\n  \"a\": 1\n}"
    );
    assert_eq!(fs::read_to_string(data.join("other.json")).unwrap(), r#"{"b":2}"#);
}

#[test]
fn config_command_prints_toml() {
    let temp = TempDir::new().unwrap();
    let cli = context_for(&temp);
    let output = cli.execute(&Commands::Config).unwrap();

    let parsed: toml::Value = toml::from_str(&output).unwrap();
    assert_eq!(
        parsed["server"]["structure_endpoint"].as_str(),
        Some("data-structure")
    );
    assert_eq!(parsed["server"]["port"].as_integer(), Some(3000));
}

#[test]
fn invalid_mount_is_rejected_at_context_creation() {
    let temp = TempDir::new().unwrap();
    let mut config = VizConfig::default();
    config.server.data_mount = "api".to_string();
    assert!(CliContext::with_config(temp.path().to_path_buf(), config).is_err());
}
