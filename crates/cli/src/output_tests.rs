// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn plain() {
    std::env::set_var("NO_COLOR", "1");
}

#[test]
#[serial]
fn text_progress_lines() {
    plain();

    assert_eq!(
        progress_line(&ProgressEvent::step("Deleting build pipeline p1"), OutputFormat::Text).unwrap(),
        "Deleting build pipeline p1"
    );
    let failed = ProgressEvent::Finished { outcome: Outcome::Failed { message: "boom".into() } };
    assert_eq!(progress_line(&failed, OutputFormat::Text).unwrap(), "failed: boom");
}

#[test]
fn json_progress_lines_are_single_objects() {
    let done = ProgressEvent::Finished { outcome: Outcome::Succeeded };

    let line = progress_line(&done, OutputFormat::Json).unwrap();

    assert!(!line.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["type"], "finished");
    assert_eq!(value["outcome"]["result"], "succeeded");
}

#[tokio::test]
#[serial]
async fn print_progress_returns_the_last_outcome() {
    plain();
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    tx.send(ProgressEvent::step("one")).unwrap();
    tx.send(ProgressEvent::Finished { outcome: Outcome::Succeeded }).unwrap();
    drop(tx);

    let outcome = print_progress(rx, OutputFormat::Text).await.unwrap();

    assert_eq!(outcome, Some(Outcome::Succeeded));
}

#[tokio::test]
async fn print_progress_without_finish_reports_nothing() {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<ProgressEvent>();
    drop(tx);

    assert_eq!(print_progress(rx, OutputFormat::Json).await.unwrap(), None);
}

#[test]
fn empty_list_prints_the_message() {
    let items: Vec<String> = Vec::new();
    let mut rendered = false;

    handle_list(OutputFormat::Text, &items, "No checkpoints", |_, _| rendered = true).unwrap();

    assert!(!rendered);
}
