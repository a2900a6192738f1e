// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn step_serializes_with_type_tag() {
    let json = serde_json::to_value(ProgressEvent::step("Deleting pipeline p1")).unwrap();
    assert_eq!(json, serde_json::json!({"type": "step", "message": "Deleting pipeline p1"}));
}

#[test]
fn finished_carries_outcome() {
    let event = ProgressEvent::Finished { outcome: Outcome::Failed { message: "boom".into() } };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "finished");
    assert_eq!(json["outcome"]["result"], "failed");
    assert_eq!(json["outcome"]["message"], "boom");
    assert_eq!(event.to_string(), "failed: boom");
}

#[test]
fn success_display() {
    let event = ProgressEvent::Finished { outcome: Outcome::Succeeded };
    assert_eq!(event.to_string(), "done");
    assert!(Outcome::Succeeded.is_success());
}
