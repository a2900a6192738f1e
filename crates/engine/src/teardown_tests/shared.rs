// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dvo_core::test_support::full_record;
use dvo_core::{OperationStatus, WorkRequest, WorkRequestId};

fn finished(id: &str, resource: &str) -> WorkRequest {
    WorkRequest::new(WorkRequestId::from_string(id), OperationStatus::Succeeded).with_resource(resource)
}

#[tokio::test]
async fn knowledge_base_is_found_through_its_work_request() {
    let mut record = single_repository_record();
    record.knowledge_base_work_request = Some(Handle::live("wrq-kb"));
    let h = Harness::new(record, fast());
    let inventory = h.provider.inventory();
    inventory.insert(tagged("kb9", ResourceKind::KnowledgeBase, "c1", "t1").build());
    inventory.insert(tagged("audit9", ResourceKind::VulnerabilityAudit, "kb9", "t1").build());
    inventory.insert_work_request(finished("wrq-kb", "kb9"));

    h.run().await.unwrap();

    assert_eq!(h.provider.deleted_ids(), vec!["p1", "r1", "audit9", "kb9"]);
    assert!(!h.provider.swept_kinds().contains(&ResourceKind::KnowledgeBase));
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn knowledge_base_without_a_known_resource_is_swept() {
    let mut record = single_repository_record();
    record.knowledge_base_work_request = Some(Handle::live("wrq-gone"));
    let h = Harness::new(record, fast());
    h.provider
        .inventory()
        .insert(tagged("kb9", ResourceKind::KnowledgeBase, "c1", "t1").build());

    h.run().await.unwrap();

    assert!(h.provider.swept_kinds().contains(&ResourceKind::KnowledgeBase));
    assert!(!h.provider.inventory().contains("kb9"));
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn failed_knowledge_base_clears_both_fields_after_the_sweep() {
    let mut record = full_record();
    record.knowledge_base_work_request = Some(Handle::live("wrq-kb"));
    let h = Harness::new(record, fast());
    h.provider.fail_delete("kb1");

    h.run().await.unwrap();

    let sweep = h.sweep_of(ResourceKind::KnowledgeBase).unwrap();
    assert!(sweep < h.delete_of("env1").unwrap());
    let after_sweep = h
        .store
        .history()
        .into_iter()
        .find(|(_, record)| record.knowledge_base.is_none())
        .map(|(_, record)| record)
        .unwrap();
    assert_eq!(after_sweep.knowledge_base_work_request, None);
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn audit_listing_failure_falls_back_to_the_sweep() {
    let h = Harness::new(full_record(), fast());
    h.provider.fail_list(ResourceKind::VulnerabilityAudit);

    h.run().await.unwrap();

    assert!(!h.provider.deleted_ids().contains(&"kb1".to_string()));
    assert!(!h.provider.inventory().contains("kb1"));
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn project_log_is_deleted_inside_its_log_group() {
    let mut record = single_repository_record();
    record.project_log_work_request = Some(Handle::live("wrq-log"));
    record.log_group = Some("lg1".to_string());
    let h = Harness::new(record, fast());
    let inventory = h.provider.inventory();
    inventory.insert(tagged("log1", ResourceKind::Log, "lg1", "t1").build());
    inventory.insert_work_request(finished("wrq-log", "log1"));

    h.run().await.unwrap();

    assert_eq!(h.provider.deleted_ids(), vec!["p1", "r1", "log1"]);
    assert!(!h.provider.inventory().contains("log1"));
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn unknown_project_log_is_swept_in_the_log_group() {
    let mut record = single_repository_record();
    record.project_log_work_request = Some(Handle::live("wrq-gone"));
    record.log_group = Some("lg1".to_string());
    let h = Harness::new(record, fast());
    h.provider.inventory().insert(tagged("log2", ResourceKind::Log, "lg1", "t1").build());

    h.run().await.unwrap();

    let log_sweep = ProviderCall::DeleteByTag {
        kind: ResourceKind::Log,
        scope: "lg1".to_string(),
        tag: "t1".to_string(),
    };
    assert!(h.provider.calls().contains(&log_sweep));
    assert!(!h.provider.inventory().contains("log2"));
    assert_eq!(h.checkpoint(), None);
}

#[yare::parameterized(
    environment = { "env1", ResourceKind::DeployEnvironment },
    artifacts   = { "arepo1", ResourceKind::ArtifactRepository },
    project     = { "proj1", ResourceKind::Project },
)]
fn failed_project_resource_gets_its_own_sweep(id: &str, kind: ResourceKind) {
    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let h = Harness::new(full_record(), fast());
        h.provider.fail_delete(id);

        h.run().await.unwrap();

        assert!(h.provider.swept_kinds().contains(&kind));
        assert!(!h.provider.inventory().contains(id));
        assert_eq!(h.checkpoint(), None);
    });
}
