// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dvo_core::test_support::full_record;

/// `full_record` plus one audit in its knowledge base.
fn full() -> Harness {
    let h = Harness::new(full_record(), fast());
    h.provider
        .inventory()
        .insert(tagged("audit1", ResourceKind::VulnerabilityAudit, "kb1", "t1").build());
    h
}

#[tokio::test]
async fn tiers_run_in_dependency_order() {
    let h = full();

    let report = h.run().await.unwrap();

    assert_eq!(
        h.provider.deleted_ids(),
        vec![
            // deploy stages, deploy pipelines
            "ss1", "dc1", "ac1", "dp1",
            // build stages, build pipelines
            "as1", "bs1", "bp1",
            // artifacts
            "cm1", "pod1", "ca1", "cr1", "art1",
            "repo1",
            // project resources
            "audit1", "kb1", "env1", "arepo1", "proj1",
        ]
    );
    assert_eq!(report.deleted, 17);
    assert_eq!(h.checkpoint(), None);
    assert!(h.provider.inventory().live_ids().is_empty());
}

#[tokio::test]
async fn remnant_sweep_runs_before_the_project() {
    let h = full();

    h.run().await.unwrap();

    let remnants = h.sweep_of(ResourceKind::DeployStage).unwrap();
    assert!(h.delete_of("arepo1").unwrap() < remnants);
    assert!(remnants < h.delete_of("proj1").unwrap());
    for call in h.provider.calls() {
        if let ProviderCall::DeleteByTag { scope, tag, .. } = call {
            assert_eq!((scope.as_str(), tag.as_str()), ("c1", "t1"));
        }
    }
}

#[tokio::test]
async fn checkpoint_is_saved_after_every_deletion() {
    let h = full();

    h.run().await.unwrap();

    let history = h.store.history();
    assert_eq!(history.len(), 17);
    let pending: Vec<usize> = history.iter().map(|(_, record)| record.pending().len()).collect();
    assert!(pending.windows(2).all(|w| w[1] < w[0]), "{:?}", pending);
    assert!(history.last().is_some_and(|(_, record)| record.is_empty()));
}

#[tokio::test]
async fn sub_modules_go_before_their_repository() {
    let mut record = single_repository_record();
    let mut sub = dvo_core::RepositoryRecord {
        code_repository: Some(Handle::live("r2")),
        ..Default::default()
    };
    sub.build.insert(
        "docker_native".to_string(),
        dvo_core::BuildFlavor { pipeline: Some(Handle::live("p2")), ..Default::default() },
    );
    if let Some(repo) = record.repositories.get_mut("svc") {
        repo.subs.insert("oci".to_string(), sub);
    }
    let h = Harness::new(record, fast());

    h.run().await.unwrap();

    assert_eq!(h.provider.deleted_ids(), vec!["p2", "p1", "r2", "r1"]);
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn folded_sweep_changes_nothing_when_every_delete_succeeds() {
    let h = Harness::new(full_record(), fast().stage_sweep(StageSweep::Folded));

    let report = h.run().await.unwrap();

    assert_eq!(report.deleted, 17);
    assert_eq!(report.sweeps.len(), 4);
    assert_eq!(h.checkpoint(), None);
}
