// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::StructuralError;
use dvo_adapters::{FakeLocalArtifacts, FakeProvider, MemoryProvider};
use dvo_core::ProgressEvent;
use std::path::PathBuf;
use std::time::Duration;

struct Res<'a> {
    id: &'a str,
    kind: ResourceKind,
    scope: &'a str,
    name: &'a str,
    tags: &'a [(&'a str, &'a str)],
    predecessors: &'a [&'a str],
}

fn put(inventory: &MemoryProvider, res: Res<'_>) {
    inventory.insert(
        Summary::builder()
            .id(res.id)
            .kind(res.kind)
            .scope(res.scope)
            .display_name(res.name)
            .tags(res.tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
            .predecessors(res.predecessors.iter().map(|p| p.to_string()).collect())
            .build(),
    );
}

fn plain<'a>(id: &'a str, kind: ResourceKind, scope: &'a str, name: &'a str) -> Res<'a> {
    Res { id, kind, scope, name, tags: &[], predecessors: &[] }
}

const DEPLOYED: (&str, &str) = (DEPLOY_TAG_KEY, "t1");
const OWNED: (&str, &str) = (PROJECT_TAG_KEY, "proj1");

/// Project `Demo` with repository `svc` and, unless `alone`, repository `web`.
fn seed(inventory: &MemoryProvider, alone: bool) {
    use ResourceKind::*;
    put(inventory, plain("proj1", Project, "c1", "Demo"));
    put(inventory, Res { tags: &[DEPLOYED], ..plain("repo-svc", CodeRepository, "proj1", "svc") });

    put(
        inventory,
        Res { tags: &[(CODE_REPOSITORY_TAG_KEY, "repo-svc")], ..plain("bp-svc", BuildPipeline, "proj1", "svc build") },
    );
    put(inventory, Res { predecessors: &["bp-svc"], ..plain("st-build", BuildStage, "bp-svc", "build") });
    put(inventory, Res { predecessors: &["st-build"], ..plain("st-deliver", BuildStage, "bp-svc", "deliver") });
    put(inventory, Res { predecessors: &["st-build"], ..plain("st-scan", BuildStage, "bp-svc", "scan") });
    put(
        inventory,
        Res { predecessors: &["st-deliver", "st-scan"], ..plain("st-publish", BuildStage, "bp-svc", "publish") },
    );
    put(
        inventory,
        Res { tags: &[(BUILD_PIPELINE_TAG_KEY, "bp-svc")], ..plain("dp-svc", DeployPipeline, "proj1", "svc deploy") },
    );
    put(inventory, Res { predecessors: &["dp-svc"], ..plain("st-deploy", DeployStage, "dp-svc", "deploy") });

    put(inventory, plain("art-1", DeployArtifact, "proj1", "svc_dev_fatjar"));
    put(inventory, plain("art-2", DeployArtifact, "proj1", "svc_jvm_docker_image"));
    put(
        inventory,
        Res {
            tags: &[(REPOSITORY_RESOURCES_TAG_KEY, "true"), (CODE_REPOSITORY_TAG_KEY, "repo-svc")],
            ..plain("art-3", DeployArtifact, "proj1", "svc resources")
        },
    );
    put(
        inventory,
        Res { tags: &[(PROJECT_RESOURCES_TAG_KEY, "true")], ..plain("art-5", DeployArtifact, "proj1", "resources") },
    );
    put(inventory, plain("cr-1", ContainerRepository, "c1", "demo-svc"));
    put(inventory, plain("cr-2", ContainerRepository, "c1", "demo-svc-jvm"));
    put(inventory, plain("cr-3", ContainerRepository, "c1", "demo"));

    put(inventory, plain("lg1", LogGroup, "c1", "logs"));
    put(inventory, Res { tags: &[OWNED], ..plain("log-1", Log, "lg1", "demo log") });
    put(inventory, Res { tags: &[OWNED], ..plain("arepo-1", ArtifactRepository, "c1", "demo artifacts") });
    put(
        inventory,
        Res { tags: &[(PROJECT_TAG_KEY, "other")], ..plain("arepo-other", ArtifactRepository, "c1", "other") },
    );
    put(inventory, plain("env-1", DeployEnvironment, "proj1", "cluster"));
    put(
        inventory,
        Res { tags: &[(USAGE_TAG_KEY, AUDIT_USAGE), OWNED], ..plain("kb-1", KnowledgeBase, "c1", "audits") },
    );
    put(inventory, plain("audit-1", VulnerabilityAudit, "kb-1", "audit"));
    put(
        inventory,
        Res {
            tags: &[(USAGE_TAG_KEY, AUDIT_USAGE), (PROJECT_TAG_KEY, "other")],
            ..plain("kb-other", KnowledgeBase, "c1", "other audits")
        },
    );

    if !alone {
        put(inventory, Res { tags: &[DEPLOYED], ..plain("repo-web", CodeRepository, "proj1", "web") });
        put(
            inventory,
            Res {
                tags: &[(CODE_REPOSITORY_TAG_KEY, "repo-web")],
                ..plain("bp-web", BuildPipeline, "proj1", "web build")
            },
        );
        put(
            inventory,
            Res {
                tags: &[(BUILD_PIPELINE_TAG_KEY, "bp-web")],
                ..plain("dp-web", DeployPipeline, "proj1", "web deploy")
            },
        );
        put(inventory, plain("art-4", DeployArtifact, "proj1", "web_dev_fatjar"));
        put(inventory, plain("cr-4", ContainerRepository, "c1", "demo-web"));
    }
}

struct Harness {
    provider: FakeProvider,
    local: FakeLocalArtifacts,
    removal: Removal<FakeProvider, FakeLocalArtifacts>,
}

fn harness(alone: bool) -> Harness {
    let provider = FakeProvider::new();
    seed(provider.inventory(), alone);
    let local = FakeLocalArtifacts::new();
    let config = TeardownConfig::default().poll_interval(Duration::ZERO);
    let removal = Removal::new(provider.clone(), local.clone(), &config);
    Harness { provider, local, removal }
}

fn request(folder: &str) -> RemovalRequest {
    RemovalRequest::new(
        "c1",
        ScopeRef::new("proj1", "Demo"),
        LocalFolder::new(folder, format!("/work/{}", folder)),
    )
}

fn ids(report: &RemovalReport) -> Vec<&str> {
    report.deleted.iter().map(|(_, id)| id.as_str()).collect()
}

#[tokio::test]
async fn removes_only_what_belongs_to_the_repository() {
    let h = harness(false);

    let report = h.removal.remove(&request("svc"), &Progress::silent()).await.unwrap();

    assert_eq!(
        ids(&report),
        vec![
            "st-publish", "st-deliver", "st-scan", "st-build", "bp-svc",
            "st-deploy", "dp-svc",
            "art-1", "art-2", "art-3",
            "cr-1", "cr-2",
            "repo-svc",
        ]
    );
    assert_eq!(report.repository, "svc");
    assert!(!report.project_removed);
    let inventory = h.provider.inventory();
    for survivor in ["proj1", "repo-web", "bp-web", "dp-web", "art-4", "art-5", "cr-3", "cr-4", "kb-1"] {
        assert!(inventory.contains(survivor), "{} was removed", survivor);
    }
    assert_eq!(h.local.cleaned(), vec![PathBuf::from("/work/svc")]);
}

#[tokio::test]
async fn last_repository_takes_the_project_with_it() {
    let h = harness(true);

    let report = h.removal.remove(&request("svc"), &Progress::silent()).await.unwrap();

    assert!(report.project_removed);
    let deleted = ids(&report);
    assert!(deleted.contains(&"art-5"));
    assert!(deleted.contains(&"cr-3"));
    assert_eq!(
        &deleted[deleted.len() - 6..],
        &["log-1", "arepo-1", "env-1", "audit-1", "kb-1", "proj1"]
    );
    assert_eq!(report.deleted.last(), Some(&(ResourceKind::Project, "proj1".to_string())));
    let mut live = h.provider.inventory().live_ids();
    live.sort();
    assert_eq!(live, vec!["arepo-other", "kb-other", "lg1"]);
}

#[tokio::test]
async fn unknown_repository_is_rejected_before_any_deletion() {
    let h = harness(false);

    let err = h.removal.remove(&request("api"), &Progress::silent()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "code repository api not found in project Demo, or not created by a deployment"
    );
    assert!(h.provider.deleted_ids().is_empty());
    assert!(h.local.cleaned().is_empty());
}

#[tokio::test]
async fn repository_without_deploy_tag_is_not_removed() {
    let h = harness(true);
    h.provider
        .inventory()
        .insert(Summary::builder().id("repo-svc").kind(ResourceKind::CodeRepository).scope("proj1").display_name("svc").build());

    let err = h.removal.remove(&request("svc"), &Progress::silent()).await.unwrap_err();

    assert!(matches!(err, TeardownError::RepositoryNotFound { .. }));
}

#[tokio::test]
async fn cyclic_stages_abort_before_touching_the_pipeline() {
    let h = harness(false);
    let inventory = h.provider.inventory();
    put(inventory, Res { predecessors: &["st-y"], ..plain("st-x", ResourceKind::BuildStage, "bp-svc", "x") });
    put(inventory, Res { predecessors: &["st-x"], ..plain("st-y", ResourceKind::BuildStage, "bp-svc", "y") });

    let err = h.removal.remove(&request("svc"), &Progress::silent()).await.unwrap_err();

    let TeardownError::Structural(StructuralError::Cycle { pipeline, stages }) = err else {
        panic!("expected a cycle");
    };
    assert_eq!(pipeline, "bp-svc");
    assert_eq!(stages, vec!["st-x", "st-y"]);
    assert!(h.provider.deleted_ids().is_empty());
}

#[tokio::test]
async fn provider_failure_stops_the_removal() {
    let h = harness(false);
    h.provider.fail_delete("art-2");

    let err = h.removal.remove(&request("svc"), &Progress::silent()).await.unwrap_err();

    assert!(matches!(err, TeardownError::Provider(_)));
    assert!(!h.provider.deleted_ids().contains(&"cr-1".to_string()));
    assert!(h.provider.inventory().contains("repo-svc"));
    assert!(h.local.cleaned().is_empty());
}

#[tokio::test]
async fn failed_work_request_stops_the_removal() {
    let h = harness(false);
    h.provider.fail_delete_status("st-publish");

    let err = h.removal.remove(&request("svc"), &Progress::silent()).await.unwrap_err();

    assert!(matches!(err, TeardownError::TerminalStatus { .. }));
    assert_eq!(h.provider.deleted_ids(), vec!["st-publish"]);
}

#[tokio::test]
async fn progress_reports_each_step() {
    let h = harness(false);
    let (progress, mut rx) = Progress::channel();

    h.removal.remove(&request("svc"), &progress).await.unwrap();
    drop(progress);

    let mut messages = Vec::new();
    while let Ok(ProgressEvent::Step { message }) = rx.try_recv() {
        messages.push(message);
    }
    assert_eq!(messages[0], "Listing build pipelines");
    assert_eq!(messages[1], "Processing pipeline svc build");
    assert_eq!(messages[2], "Deleting stage publish");
    assert!(messages.contains(&"Deleting container repository demo-svc-jvm".to_string()));
    assert!(messages.contains(&"Deleting code repository svc...".to_string()));
    assert_eq!(messages.last().map(String::as_str), Some("Deleting local resources of svc..."));
}

#[test]
fn artifact_names_cover_every_flavor() {
    assert_eq!(
        generated_artifact_names("svc", &[]),
        vec![
            "svc_dev_fatjar",
            "svc_dev_executable",
            "svc_oke_deploy_ni_configuration",
            "svc_oke_deploy_jvm_configuration",
            "svc_oke_configmap",
            "svc_oke_deploy_docker_secret_setup_command",
            "svc_native_docker_image",
            "svc_jvm_docker_image",
        ]
    );
    let names = generated_artifact_names("svc", &["oci".to_string(), "aws".to_string()]);
    assert_eq!(&names[6..], &["svc_oci_native_docker_image", "svc_oci_jvm_docker_image", "svc_aws_native_docker_image", "svc_aws_jvm_docker_image"]);
}

#[yare::parameterized(
    single        = { &[], false, &["demo-svc", "demo-svc-jvm"] },
    single_last   = { &[], true, &["demo-svc", "demo-svc-jvm", "demo", "demo-jvm"] },
    with_sub      = { &["oci"], false, &["demo-svc-oci", "demo-svc-oci-jvm"] },
    with_sub_last = { &["oci"], true, &["demo-svc-oci", "demo-svc-oci-jvm", "demo-oci", "demo-oci-jvm"] },
)]
fn container_repository_names_are_lower_case(subs: &[&str], is_last: bool, expected: &[&str]) {
    let subs: Vec<String> = subs.iter().map(|s| s.to_string()).collect();
    assert_eq!(container_repository_names("Demo", "Svc", &subs, is_last), expected);
}
