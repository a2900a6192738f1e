// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dvo_core::ResourceKind;
use serial_test::serial;

#[test]
#[serial]
fn summary_lists_sweeps() {
    std::env::set_var("NO_COLOR", "1");
    let report = TeardownReport {
        key: "svc".into(),
        found: true,
        deleted: 4,
        sweeps: vec![ResourceKind::BuildStage, ResourceKind::BuildPipeline],
    };

    assert_eq!(summary(&report), "svc: 4 deleted, swept build-stage, build-pipeline");
}

#[test]
#[serial]
fn summary_of_a_folder_without_checkpoint() {
    std::env::set_var("NO_COLOR", "1");
    let report = TeardownReport { key: "web".into(), ..Default::default() };

    assert_eq!(summary(&report), "web: no checkpoint");
}
