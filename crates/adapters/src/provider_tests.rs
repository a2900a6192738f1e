// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dvo_core::{OperationStatus, DEPLOY_TAG_KEY};

fn seeded() -> FakeProvider {
    let provider = FakeProvider::new();
    for (id, kind, scope) in [
        ("proj1", ResourceKind::Project, "c1"),
        ("art1", ResourceKind::DeployArtifact, "proj1"),
        ("art2", ResourceKind::DeployArtifact, "proj1"),
    ] {
        provider.inventory().insert(
            Summary::builder()
                .id(id)
                .kind(kind)
                .scope(scope)
                .tags([(DEPLOY_TAG_KEY.to_string(), "t1".to_string())].into_iter().collect())
                .build(),
        );
    }
    provider
}

#[tokio::test]
async fn records_calls_in_order() {
    let provider = seeded();
    provider.list(ResourceKind::DeployArtifact, "c1", &ListFilter::default()).await.unwrap();
    let wr = provider.delete(ResourceKind::DeployArtifact, &Target::new("art1")).await.unwrap();
    provider.work_request_status(&wr).await.unwrap();
    provider.delete_by_tag(ResourceKind::DeployArtifact, "c1", "t1").await.unwrap();

    assert_eq!(
        provider.calls(),
        vec![
            ProviderCall::List { kind: ResourceKind::DeployArtifact, scope: "c1".into() },
            ProviderCall::Delete { kind: ResourceKind::DeployArtifact, id: "art1".into() },
            ProviderCall::Status { id: wr.to_string() },
            ProviderCall::DeleteByTag {
                kind: ResourceKind::DeployArtifact,
                scope: "c1".into(),
                tag: "t1".into()
            },
        ]
    );
    assert_eq!(provider.deleted_ids(), vec!["art1".to_string()]);
    assert_eq!(provider.swept_kinds(), vec![ResourceKind::DeployArtifact]);
    assert!(!provider.inventory().contains("art2"));
}

#[tokio::test]
async fn failing_delete_leaves_resource() {
    let provider = seeded();
    provider.fail_delete("art1");
    let err = provider.delete(ResourceKind::DeployArtifact, &Target::new("art1")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)));
    assert!(provider.inventory().contains("art1"));
}

#[tokio::test]
async fn failed_status_keeps_resource_and_reports_failed() {
    let provider = seeded();
    provider.fail_delete_status("art1");
    let wr = provider.delete(ResourceKind::DeployArtifact, &Target::new("art1")).await.unwrap();
    let status = provider.work_request_status(&wr).await.unwrap();
    assert_eq!(status.status, OperationStatus::Failed);
    assert_eq!(status.resources, vec!["art1".to_string()]);
    assert!(provider.inventory().contains("art1"));
}

#[tokio::test]
async fn failing_sweep_and_list() {
    let provider = seeded();
    provider.fail_sweep(ResourceKind::DeployArtifact);
    provider.fail_list(ResourceKind::Project);
    assert!(provider.delete_by_tag(ResourceKind::DeployArtifact, "c1", "t1").await.is_err());
    assert!(provider.list(ResourceKind::Project, "c1", &ListFilter::default()).await.is_err());
    assert!(provider.inventory().contains("art2"));
}

#[tokio::test]
async fn scripted_statuses_precede_inventory() {
    let provider = seeded();
    let wr = provider.delete(ResourceKind::DeployArtifact, &Target::new("art1")).await.unwrap();
    provider.script_status(
        wr.as_str(),
        vec![OperationStatus::Accepted, OperationStatus::InProgress],
    );
    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(provider.work_request_status(&wr).await.unwrap().status);
    }
    assert_eq!(
        seen,
        vec![OperationStatus::Accepted, OperationStatus::InProgress, OperationStatus::Succeeded]
    );
}
