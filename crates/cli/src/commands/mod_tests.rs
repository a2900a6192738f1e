// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dvo_core::{ResourceKind, Summary};
use tempfile::TempDir;

fn context(dir: &TempDir) -> Context {
    let config = Config::in_dir(dir.path().to_path_buf()).unwrap();
    Context { config, format: OutputFormat::Text, notify: false }
}

fn exit_code(err: &anyhow::Error) -> Option<i32> {
    err.downcast_ref::<ExitError>().map(|exit| exit.code)
}

#[test]
fn second_workspace_on_a_state_dir_is_busy() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir);
    let first = Workspace::open(&ctx).unwrap();

    let err = Workspace::open(&ctx).err().unwrap();

    assert_eq!(exit_code(&err), Some(exit_error::BUSY));
    assert!(err.to_string().contains("another dvo operation"));
    let pid = std::fs::read_to_string(&ctx.config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());

    first.close().unwrap();
    Workspace::open(&ctx).unwrap().close().unwrap();
}

#[tokio::test]
async fn inventory_is_saved_when_the_printer_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir);
    let workspace = Workspace::open(&ctx).unwrap();
    workspace
        .provider
        .insert(Summary::builder().id("proj1").kind(ResourceKind::Project).scope("c1").build());
    let printer = tokio::spawn(async { Err::<Option<Outcome>, _>(anyhow::anyhow!("stdout closed")) });

    let err = workspace.finish(printer).await.unwrap_err();

    assert_eq!(err.to_string(), "stdout closed");
    let saved = MemoryProvider::load(&ctx.config.inventory_path).unwrap();
    assert_eq!(saved.live_ids(), vec!["proj1".to_string()]);
    Workspace::open(&ctx).unwrap().close().unwrap();
}
