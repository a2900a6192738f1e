// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dvo_core::test_support::full_record;
use dvo_core::RepoScope;

fn slot(field: RepoField) -> FieldPath {
    FieldPath::repo(&RepoScope::repo("svc"), field)
}

fn deploy(part: DeployPart) -> FieldPath {
    slot(RepoField::Deploy("jvm".to_string(), part))
}

fn build(part: BuildPart) -> FieldPath {
    slot(RepoField::Build("docker_native".to_string(), part))
}

#[tokio::test]
async fn failed_stage_is_swept_at_the_end_of_its_tier() {
    let h = Harness::new(full_record(), fast());
    h.provider.fail_delete("dc1");

    let report = h.run().await.unwrap();

    let sweep = h.sweep_of(ResourceKind::DeployStage).unwrap();
    assert!(h.delete_of("ac1").unwrap() < sweep);
    assert!(sweep < h.delete_of("dp1").unwrap());
    assert_eq!(report.deleted, 16);
    assert_eq!(report.sweeps[0], ResourceKind::DeployStage);
    assert_eq!(h.checkpoint(), None);
    assert!(!h.provider.inventory().contains("dc1"));
}

#[tokio::test]
async fn swept_slots_are_cleared_in_one_save() {
    let h = Harness::new(full_record(), fast());
    h.provider.fail_delete("dc1");

    h.run().await.unwrap();

    let history = h.store.history();
    let failed = deploy(DeployPart::DeployToClusterStage);
    let cleared = history
        .iter()
        .position(|(_, record)| record.get(&failed).is_none())
        .unwrap();
    // ss1 and ac1 were saved one at a time; the sweep clears dc1 on its own
    assert_eq!(cleared, 2);
    assert!(history[cleared].1.get(&deploy(DeployPart::Pipeline)).is_some());
}

#[tokio::test]
async fn failed_work_request_is_treated_like_a_failed_delete() {
    let h = Harness::new(full_record(), fast());
    h.provider.fail_delete_status("cr1");

    h.run().await.unwrap();

    let kinds = h.provider.swept_kinds();
    assert!(kinds.contains(&ResourceKind::ContainerRepository));
    assert!(!kinds.contains(&ResourceKind::DeployArtifact));
    assert!(!h.provider.inventory().contains("cr1"));
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn failed_artifacts_stage_leaves_its_build_stage_to_the_sweep() {
    let h = Harness::new(full_record(), fast());
    h.provider.fail_delete("as1");

    h.run().await.unwrap();

    assert!(!h.provider.deleted_ids().contains(&"bs1".to_string()));
    let downgraded = h
        .store
        .history()
        .iter()
        .any(|(_, record)| record.get(&build(BuildPart::BuildStage)) == Some(Handle::Unresolved));
    assert!(downgraded);
    assert!(!h.provider.inventory().contains("as1"));
    assert!(!h.provider.inventory().contains("bs1"));
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn unresolved_slot_is_only_reachable_by_sweep() {
    let mut record = full_record();
    if let Some(repo) = record.repositories.get_mut("svc") {
        repo.code_repository = Some(Handle::Unresolved);
    }
    let h = Harness::new(record, fast());

    h.run().await.unwrap();

    assert!(!h.provider.deleted_ids().iter().any(|id| id.starts_with("ghost-")));
    assert!(h.provider.swept_kinds().contains(&ResourceKind::CodeRepository));
    assert!(h.provider.inventory().live_ids().is_empty());
}

#[tokio::test]
async fn folded_policy_defers_the_stage_sweep_to_the_pipeline_tier() {
    let h = Harness::new(full_record(), fast().stage_sweep(StageSweep::Folded));
    h.provider.fail_delete("dc1");

    h.run().await.unwrap();

    let stage_sweep = h.sweep_of(ResourceKind::DeployStage).unwrap();
    // dp1 is refused while dc1 lives, then both kinds go by tag
    assert!(h.delete_of("dp1").unwrap() < stage_sweep);
    assert_eq!(
        &h.provider.swept_kinds()[..2],
        &[ResourceKind::DeployStage, ResourceKind::DeployPipeline]
    );
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn per_tier_policy_sweeps_stages_again_before_pipelines() {
    let h = Harness::new(full_record(), fast());
    h.provider.fail_delete("dc1");
    h.provider.fail_delete("dp1");

    h.run().await.unwrap();

    assert_eq!(
        &h.provider.swept_kinds()[..3],
        &[ResourceKind::DeployStage, ResourceKind::DeployStage, ResourceKind::DeployPipeline]
    );
}

#[tokio::test]
async fn failed_sweep_aborts_and_keeps_the_checkpoint() {
    let h = Harness::new(full_record(), fast());
    h.provider.fail_delete("dc1");
    h.provider.fail_sweep(ResourceKind::DeployStage);

    let err = h.run().await.unwrap_err();

    assert!(matches!(err, TeardownError::Sweep { kind: ResourceKind::DeployStage, .. }));
    assert_eq!(h.delete_of("dp1"), None);
    let record = h.checkpoint().unwrap();
    assert_eq!(record.get(&deploy(DeployPart::SetupSecretStage)), None);
    assert_eq!(record.get(&deploy(DeployPart::DeployToClusterStage)), Some(Handle::live("dc1")));
    assert_eq!(record.get(&deploy(DeployPart::Pipeline)), Some(Handle::live("dp1")));
}

#[tokio::test]
async fn sweep_without_a_tag_is_fatal() {
    let mut record = full_record();
    record.tag = None;
    let h = Harness::new(record, fast());
    h.provider.fail_delete("repo1");

    let err = h.run().await.unwrap_err();

    let TeardownError::Sweep { kind, source } = err else {
        panic!("expected a sweep error");
    };
    assert_eq!(kind, ResourceKind::CodeRepository);
    assert!(matches!(*source, TeardownError::MissingScope("deploy tag")));
    assert!(h.provider.swept_kinds().is_empty());
}

#[tokio::test]
async fn sweep_without_a_compartment_is_fatal() {
    let mut record = single_repository_record();
    record.compartment = None;
    let h = Harness::new(record, fast());
    h.provider.fail_delete("p1");

    let err = h.run().await.unwrap_err();

    assert_eq!(err.to_string(), "failed to delete build stages by deploy tag: record has no compartment");
    assert_eq!(h.delete_of("r1"), None);
}

#[tokio::test]
async fn checkpoint_write_failure_is_fatal() {
    let h = Harness::new(full_record(), fast());
    h.store.fail_after(3);

    let err = h.run().await.unwrap_err();

    assert!(matches!(err, TeardownError::Checkpoint(_)));
    // the fourth deletion happened, its save did not
    assert_eq!(h.provider.deleted_ids(), vec!["ss1", "dc1", "ac1", "dp1"]);
    assert_eq!(h.checkpoint().unwrap().get(&deploy(DeployPart::Pipeline)), Some(Handle::live("dp1")));
}
