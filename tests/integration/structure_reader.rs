use std::collections::BTreeSet;
use std::fs;

use proptest::prelude::*;
use tempfile::TempDir;
use vizdata::tree::{read_structure, StructureFormat, WalkerConfig, FILES_KEY};

fn sorted(files: &[String]) -> Vec<String> {
    let mut files = files.to_vec();
    files.sort();
    files
}

#[test]
fn directory_with_only_non_json_files_has_no_files_key() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("readme.md"), "# data").unwrap();
    fs::write(temp.path().join("table.csv"), "a,b").unwrap();

    let node = read_structure(temp.path(), &WalkerConfig::default())
        .unwrap()
        .unwrap();
    assert!(node.files.is_empty());

    let flat = node.render(StructureFormat::Flat).unwrap();
    assert!(flat.get(FILES_KEY).is_none());
    assert_eq!(flat, serde_json::json!({}));
}

#[test]
fn json_files_are_listed_exactly_once() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.json"), "{}").unwrap();
    fs::write(temp.path().join("b.json"), "[]").unwrap();
    fs::write(temp.path().join("c.txt"), "").unwrap();

    let node = read_structure(temp.path(), &WalkerConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(
        sorted(&node.files),
        vec!["a.json".to_string(), "b.json".to_string()]
    );
}

#[test]
fn nested_directory_becomes_child_node() {
    let temp = TempDir::new().unwrap();
    let sub = temp.path().join("population");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("2020.json"), "{}").unwrap();

    let node = read_structure(temp.path(), &WalkerConfig::default())
        .unwrap()
        .unwrap();
    assert!(node.files.is_empty());
    assert_eq!(node.children.len(), 1);
    assert_eq!(node.children["population"].files, vec!["2020.json".to_string()]);

    let flat = node.render(StructureFormat::Flat).unwrap();
    assert_eq!(
        flat,
        serde_json::json!({ "population": { "files": ["2020.json"] } })
    );
}

#[test]
fn non_directory_path_returns_none() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("single.json");
    fs::write(&file, "{}").unwrap();

    assert!(read_structure(&file, &WalkerConfig::default())
        .unwrap()
        .is_none());
    assert!(read_structure(&temp.path().join("absent"), &WalkerConfig::default())
        .unwrap()
        .is_none());
}

#[test]
fn directory_named_files_survives_tagged_rendering() {
    let temp = TempDir::new().unwrap();
    let files_dir = temp.path().join("files");
    fs::create_dir_all(&files_dir).unwrap();
    fs::write(files_dir.join("inner.json"), "{}").unwrap();
    fs::write(temp.path().join("outer.json"), "{}").unwrap();

    let node = read_structure(temp.path(), &WalkerConfig::default())
        .unwrap()
        .unwrap();
    let tagged = node.render(StructureFormat::Tagged).unwrap();
    assert_eq!(
        tagged,
        serde_json::json!({
            "files": ["outer.json"],
            "children": { "files": { "files": ["inner.json"] } }
        })
    );
}

#[test]
fn empty_subdirectories_are_kept() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("pending")).unwrap();

    let node = read_structure(temp.path(), &WalkerConfig::default())
        .unwrap()
        .unwrap();
    assert!(node.children["pending"].is_empty());
    assert!(!node.is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn files_list_is_permutation_of_json_names(
        json_names in prop::collection::btree_set("[a-z][a-z0-9_]{0,7}", 0..12),
        other_names in prop::collection::btree_set("[a-z][a-z0-9_]{0,7}", 0..6),
    ) {
        let temp = TempDir::new().unwrap();
        for name in &json_names {
            fs::write(temp.path().join(format!("{}.json", name)), "{}").unwrap();
        }
        for name in &other_names {
            fs::write(temp.path().join(format!("{}.txt", name)), "").unwrap();
        }

        let node = read_structure(temp.path(), &WalkerConfig::default())
            .unwrap()
            .unwrap();
        let expected: BTreeSet<String> =
            json_names.iter().map(|n| format!("{}.json", n)).collect();

        prop_assert_eq!(node.files.len(), expected.len());
        let listed: BTreeSet<String> = node.files.iter().cloned().collect();
        prop_assert_eq!(listed, expected);
    }
}
