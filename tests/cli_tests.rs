//! Integration tests for the helping-hand CLI
//!
//! Each test writes a scene document to a temporary directory, runs one
//! subcommand against it and checks the report and the saved scene.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use helping_hand_rs::{InMemoryScene, ObjectRepository};

/// Test helper to get the CLI binary
fn helping_hand_cmd() -> Command {
    Command::cargo_bin("helping-hand").unwrap()
}

const SCENE: &str = r#"
collections: [Props, Archive]
objects:
  - name: Rock
    mesh: { vertices: 8, edges: 12, faces: 6 }
    collections: [Props]
  - name: Rock.001
    mesh: { vertices: 8, edges: 12, faces: 6 }
    collections: [Props]
  - name: rock_7
    mesh: { vertices: 4, edges: 4, faces: 1 }
  - name: Tree
    mesh: { vertices: 90, edges: 170, faces: 80 }
  - name: Sun
    kind: LIGHT
active: Rock
"#;

fn write_scene(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("scene.yml");
    fs::write(&path, SCENE).unwrap();
    path
}

#[test]
fn test_select_similar_json_report() {
    let dir = tempdir().unwrap();
    let scene = write_scene(dir.path());

    let output = helping_hand_cmd()
        .current_dir(dir.path())
        .args(["select-similar", scene.to_str().unwrap(), "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["active"], "Rock");
    assert_eq!(report["method"], "name");
    assert_eq!(
        report["selected"],
        serde_json::json!(["Rock", "Rock.001", "rock_7"])
    );
}

#[test]
fn test_select_similar_by_topology_writes_selection() {
    let dir = tempdir().unwrap();
    let scene = write_scene(dir.path());

    helping_hand_cmd()
        .current_dir(dir.path())
        .args(["select-similar", scene.to_str().unwrap(), "--method", "topology", "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected"));

    let saved = InMemoryScene::from_file(&scene).unwrap();
    let selected: Vec<String> = saved
        .selected_objects()
        .into_iter()
        .filter_map(|id| saved.object(id))
        .map(|obj| obj.name)
        .collect();
    assert_eq!(selected, vec!["Rock", "Rock.001"]);
}

#[test]
fn test_topology_on_light_fails() {
    let dir = tempdir().unwrap();
    let scene = write_scene(dir.path());

    helping_hand_cmd()
        .current_dir(dir.path())
        .args([
            "select-similar",
            scene.to_str().unwrap(),
            "--active",
            "Sun",
            "--method",
            "topology",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot compute similarity"));
}

#[test]
fn test_rename_to_output_file() {
    let dir = tempdir().unwrap();
    let scene = write_scene(dir.path());
    let out = dir.path().join("renamed.json");

    helping_hand_cmd()
        .current_dir(dir.path())
        .args([
            "rename",
            scene.to_str().unwrap(),
            "--select",
            "Tree",
            "--select",
            "Rock",
            "--prefix",
            "SM_",
            "--base-name",
            "Prop",
            "--start",
            "1",
            "--padding",
            "3",
            "--output",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("SM_Prop_001"));

    let renamed = InMemoryScene::from_file(&out).unwrap();
    assert!(renamed.find("SM_Prop_001").is_some());
    assert!(renamed.find("SM_Prop_002").is_some());
    assert!(renamed.find("Rock.001").is_some());

    let original = InMemoryScene::from_file(&scene).unwrap();
    assert!(original.find("Rock").is_some());
}

#[test]
fn test_rename_rejects_wide_padding() {
    let dir = tempdir().unwrap();
    let scene = write_scene(dir.path());

    helping_hand_cmd()
        .current_dir(dir.path())
        .args(["rename", scene.to_str().unwrap(), "--select", "Rock", "--padding", "5"])
        .assert()
        .failure();
}

#[test]
fn test_rename_without_selection_fails() {
    let dir = tempdir().unwrap();
    let scene = write_scene(dir.path());

    helping_hand_cmd()
        .current_dir(dir.path())
        .args(["rename", scene.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no objects selected"));
}

#[test]
fn test_move_to_collection_from_config_file() {
    let dir = tempdir().unwrap();
    let scene = write_scene(dir.path());
    fs::write(
        dir.path().join(".helping-hand.yml"),
        "collections:\n  target: Archive\n",
    )
    .unwrap();

    helping_hand_cmd()
        .current_dir(dir.path())
        .args(["move-to-collection", scene.to_str().unwrap(), "--select", "Rock", "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive"));

    let saved = InMemoryScene::from_file(&scene).unwrap();
    let rock = saved.find("Rock").unwrap();
    let collections = saved.collections(rock).unwrap();
    assert!(collections.contains("Archive"));
    assert!(!collections.contains("Props"));
}

#[test]
fn test_link_data_yaml_report() {
    let dir = tempdir().unwrap();
    let scene = write_scene(dir.path());

    helping_hand_cmd()
        .current_dir(dir.path())
        .args([
            "link-data",
            scene.to_str().unwrap(),
            "--select",
            "Tree",
            "--select",
            "Sun",
            "--format",
            "yaml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("source: Rock"))
        .stdout(predicate::str::contains("- Tree"));
}

#[test]
fn test_rust_log_overrides_default_level() {
    let dir = tempdir().unwrap();
    let scene = write_scene(dir.path());

    helping_hand_cmd()
        .current_dir(dir.path())
        .env("RUST_LOG", "debug")
        .args(["select-similar", scene.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded 5 objects"));

    helping_hand_cmd()
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .args(["select-similar", scene.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded 5 objects").not());
}

#[test]
fn test_check_version() {
    helping_hand_cmd()
        .args(["check-version", "--latest", "v99.0.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A new version is available!"));

    helping_hand_cmd()
        .args(["check-version", "--latest", "v0.0.1", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up_to_date"));
}

#[test]
fn test_print_default_config() {
    helping_hand_cmd()
        .arg("print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("prefix: SM_"))
        .stdout(predicate::str::contains("method: name"));
}

#[test]
fn test_init_then_validate_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("hh.yml");

    helping_hand_cmd()
        .args(["init-config", "--output", config.to_str().unwrap()])
        .assert()
        .success();
    assert!(config.exists());

    helping_hand_cmd()
        .args(["init-config", "--output", config.to_str().unwrap()])
        .assert()
        .failure();

    helping_hand_cmd()
        .args(["validate-config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn test_validate_config_rejects_bad_padding() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.yml");
    fs::write(&config, "rename:\n  prefix: SM_\n  base_name: Obj\n  start_index: 1\n  padding: 9\n").unwrap();

    helping_hand_cmd()
        .args(["validate-config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("padding"));
}
