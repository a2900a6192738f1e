// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn clean_removes_registration_resources_and_clone() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path();
    std::fs::create_dir_all(folder.join(".vscode")).unwrap();
    std::fs::write(folder.join(REGISTRATION_FILE), "{}").unwrap();
    std::fs::write(folder.join(".vscode/settings.json"), "{}").unwrap();
    std::fs::create_dir_all(folder.join(".devops/build")).unwrap();
    std::fs::create_dir_all(folder.join(".git/objects")).unwrap();
    std::fs::write(folder.join("pom.xml"), "<project/>").unwrap();

    FsLocalArtifacts::new().clean(folder).await;

    assert!(!folder.join(REGISTRATION_FILE).exists());
    assert!(!folder.join(RESOURCES_DIR).exists());
    assert!(!folder.join(GIT_DIR).exists());
    assert!(folder.join(".vscode/settings.json").exists());
    assert!(folder.join("pom.xml").exists());
}

#[tokio::test]
async fn clean_tolerates_missing_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    FsLocalArtifacts::new().clean(dir.path()).await;
    FsLocalArtifacts::new().clean(&dir.path().join("does-not-exist")).await;
}

#[tokio::test]
async fn fake_records_folders() {
    let fake = FakeLocalArtifacts::new();
    fake.clean(Path::new("/work/svc")).await;
    assert_eq!(fake.cleaned(), vec![std::path::PathBuf::from("/work/svc")]);
}
