// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dvo_core::test_support::{full_record, single_repository_record};
use dvo_core::{FieldPath, RepoField, RepoScope};
use tempfile::TempDir;

fn store() -> (TempDir, FileCheckpointStore) {
    let dir = TempDir::new().unwrap();
    let store = FileCheckpointStore::new(dir.path().join("checkpoints"));
    (dir, store)
}

#[yare::parameterized(
    plain      = { "svc", Some("svc") },
    spaces     = { "my  demo app", Some("my_demo_app") },
    edges      = { "  svc ", Some("_svc_") },
    leading    = { " svc", Some("_svc") },
    underscore = { "a_ b", Some("a__b") },
    tabs       = { "a\t\n b", Some("a_b") },
    slash      = { "a/b", None },
    backslash  = { "a\\b", None },
    dots       = { "..", None },
    blank      = { "   ", Some("_") },
    empty      = { "", None },
)]
fn key_normalization(folder: &str, expected: Option<&str>) {
    assert_eq!(checkpoint_key(folder).ok().as_deref(), expected);
}

#[test]
fn load_missing_is_none() {
    let (_dir, store) = store();
    assert!(store.load("svc").unwrap().is_none());
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn save_then_load() {
    let (_dir, store) = store();
    let record = full_record();
    store.save("svc", &record).unwrap();
    assert_eq!(store.load("svc").unwrap(), Some(record));
    assert_eq!(store.keys().unwrap(), vec!["svc".to_string()]);
}

#[test]
fn save_writes_versioned_envelope_without_tmp_leftovers() {
    let (_dir, store) = store();
    store.save("my app", &single_repository_record()).unwrap();

    let raw = std::fs::read_to_string(store.dir().join("my_app.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["v"], 2);
    assert_eq!(doc["key"], "my_app");
    assert!(doc["updated_at"].is_string());
    assert_eq!(doc["record"]["repositories"]["svc"]["code_repository"], "r1");
    assert!(!store.dir().join("my_app.json.tmp").exists());
}

#[test]
fn legacy_file_is_migrated_on_load() {
    let (_dir, store) = store();
    std::fs::create_dir_all(store.dir()).unwrap();
    std::fs::write(
        store.dir().join("svc.json"),
        r#"{"compartment":{"ocid":"c1"},"tag":"t1",
            "repositories":{"svc":{"codeRepository":"r1","docker_nibuildPipeline":"p1"}}}"#,
    )
    .unwrap();

    assert_eq!(store.load("svc").unwrap(), Some(single_repository_record()));
}

#[test]
fn clear_refuses_non_empty_record() {
    let (_dir, store) = store();
    store.save("svc", &single_repository_record()).unwrap();
    assert!(matches!(store.clear("svc"), Err(CheckpointError::NotEmpty(_))));
    assert!(store.load("svc").unwrap().is_some());
}

#[test]
fn clear_removes_empty_record_and_is_idempotent() {
    let (_dir, store) = store();
    let mut record = single_repository_record();
    for path in record.pending() {
        record.clear(&path);
    }
    store.save("svc", &record).unwrap();
    store.clear("svc").unwrap();
    assert!(store.load("svc").unwrap().is_none());
    store.clear("svc").unwrap();
}

#[test]
fn corrupt_file_is_moved_aside() {
    let (_dir, store) = store();
    std::fs::create_dir_all(store.dir()).unwrap();
    std::fs::write(store.dir().join("svc.json"), "{not json").unwrap();

    let err = store.load("svc").unwrap_err();
    assert!(matches!(err, CheckpointError::Corrupt { .. }));
    assert!(store.dir().join("svc.bak").exists());
    assert!(store.load("svc").unwrap().is_none());
}

#[test]
fn too_new_checkpoint_is_rejected() {
    let (_dir, store) = store();
    std::fs::create_dir_all(store.dir()).unwrap();
    std::fs::write(store.dir().join("svc.json"), r#"{"v":9,"record":{}}"#).unwrap();
    assert!(matches!(
        store.load("svc"),
        Err(CheckpointError::Migration(MigrationError::TooNew(9, 2)))
    ));
}

#[test]
fn invalid_key_is_rejected() {
    let (_dir, store) = store();
    assert!(matches!(
        store.save("../etc", &single_repository_record()),
        Err(CheckpointError::InvalidKey(_))
    ));
}

#[test]
fn rotate_bak_keeps_three() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("svc.json");
    for i in 0..4 {
        let bak = rotate_bak_path(&path);
        std::fs::write(&bak, format!("{i}")).unwrap();
    }
    assert_eq!(std::fs::read_to_string(dir.path().join("svc.bak")).unwrap(), "3");
    assert_eq!(std::fs::read_to_string(dir.path().join("svc.bak.2")).unwrap(), "2");
    assert_eq!(std::fs::read_to_string(dir.path().join("svc.bak.3")).unwrap(), "1");
}

#[test]
fn memory_store_records_history() {
    let store = MemoryCheckpointStore::with_record("svc", single_repository_record());
    let mut record = store.load("svc").unwrap().unwrap();
    record.clear(&FieldPath::repo(&RepoScope::repo("svc"), RepoField::CodeRepository));
    store.save("svc", &record).unwrap();

    assert_eq!(store.save_count(), 1);
    assert_eq!(store.history()[0].1, record);
    assert!(matches!(store.clear("svc"), Err(CheckpointError::NotEmpty(_))));
}

#[test]
fn memory_store_fail_after_rejects_saves() {
    let store = MemoryCheckpointStore::new();
    store.fail_after(1);
    store.save("svc", &full_record()).unwrap();
    assert!(matches!(store.save("svc", &full_record()), Err(CheckpointError::Unavailable(_))));
    store.heal();
    store.save("svc", &full_record()).unwrap();
    assert_eq!(store.save_count(), 2);
}
