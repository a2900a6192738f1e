// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn record() -> ProgressRecord {
    serde_json::from_value(json!({
        "compartment": {"ocid": "c1", "name": "dev"},
        "project": {"ocid": "proj1", "name": "demo"},
        "tag": "t1",
        "repositories": {
            "svc": {
                "code_repository": "r1",
                "build": {"docker_native": {"pipeline": "p1", "build_stage": "bs1"}},
                "deploy": {"jvm": {"setup_secret_stage": false}},
                "subs": {"oci": {"deploy": {"native": {"pipeline": "dp2"}}}}
            }
        },
        "knowledge_base": "kb1"
    }))
    .unwrap()
}

#[yare::parameterized(
    live       = { json!("x1"), Some(Handle::Live("x1".into())) },
    flag       = { json!(false), Some(Handle::Unresolved) },
    empty      = { json!(""), Some(Handle::Unresolved) },
    null       = { json!(null), None },
)]
fn handle_slot_deserialization(raw: serde_json::Value, expected: Option<Handle>) {
    let flavor: BuildFlavor = serde_json::from_value(json!({ "pipeline": raw })).unwrap();
    assert_eq!(flavor.pipeline, expected);
}

#[test]
fn unresolved_serializes_as_false() {
    let flavor = BuildFlavor { pipeline: Some(Handle::Unresolved), ..Default::default() };
    assert_eq!(serde_json::to_value(&flavor).unwrap(), json!({"pipeline": false}));
}

#[test]
fn scope_ref_accepts_object_string_and_flag() {
    let r: ProgressRecord = serde_json::from_value(json!({
        "compartment": {"ocid": "c1"},
        "project": false,
    }))
    .unwrap();
    assert_eq!(r.compartment_id(), Some("c1"));
    assert_eq!(r.project, Some(ScopeRef::default()));
    assert_eq!(r.get(&FieldPath::Shared(SharedField::Project)), Some(Handle::Unresolved));

    let r: ProgressRecord = serde_json::from_value(json!({"project": "proj9"})).unwrap();
    assert_eq!(r.project.as_ref().map(|p| p.ocid.as_str()), Some("proj9"));
}

#[test]
fn scopes_list_subs_before_their_repository() {
    let scopes = record().scopes();
    assert_eq!(scopes, vec![RepoScope::sub("svc", "oci"), RepoScope::repo("svc")]);
}

#[test]
fn get_addresses_nested_slots() {
    let r = record();
    let svc = RepoScope::repo("svc");
    assert_eq!(
        r.get(&FieldPath::repo(&svc, RepoField::Build("docker_native".into(), BuildPart::Pipeline))),
        Some(Handle::Live("p1".into()))
    );
    assert_eq!(
        r.get(&FieldPath::repo(&svc, RepoField::Deploy("jvm".into(), DeployPart::SetupSecretStage))),
        Some(Handle::Unresolved)
    );
    assert_eq!(
        r.get(&FieldPath::repo(&svc, RepoField::Build("dev".into(), BuildPart::Pipeline))),
        None
    );
    assert_eq!(
        r.get(&FieldPath::Shared(SharedField::KnowledgeBase)),
        Some(Handle::Live("kb1".into()))
    );
}

#[test]
fn clearing_last_slot_prunes_flavor_sub_and_repository() {
    let mut r = record();
    let svc = RepoScope::repo("svc");
    let oci = RepoScope::sub("svc", "oci");

    assert!(r.clear(&FieldPath::repo(&oci, RepoField::Deploy("native".into(), DeployPart::Pipeline))));
    assert!(r.repositories["svc"].subs.is_empty());

    r.clear(&FieldPath::repo(&svc, RepoField::Deploy("jvm".into(), DeployPart::SetupSecretStage)));
    assert!(r.repositories["svc"].deploy.is_empty());

    r.clear(&FieldPath::repo(&svc, RepoField::Build("docker_native".into(), BuildPart::Pipeline)));
    assert!(r.repositories["svc"].build.contains_key("docker_native"));
    r.clear(&FieldPath::repo(&svc, RepoField::Build("docker_native".into(), BuildPart::BuildStage)));
    assert!(r.repositories["svc"].build.is_empty());

    r.clear(&FieldPath::repo(&svc, RepoField::CodeRepository));
    assert!(r.repositories.is_empty());
}

#[test]
fn clearing_absent_slot_reports_no_change() {
    let mut r = record();
    let ghost = RepoScope::repo("ghost");
    assert!(!r.clear(&FieldPath::repo(&ghost, RepoField::CodeRepository)));
    assert!(!r.clear(&FieldPath::Shared(SharedField::ClusterEnvironment)));
}

#[test]
fn empty_ignores_identity_metadata() {
    let mut r = record();
    assert!(!r.is_empty());
    for path in r.pending() {
        r.clear(&path);
    }
    assert!(r.is_empty());
    assert_eq!(r.tag.as_deref(), Some("t1"));
    assert_eq!(r.compartment_id(), Some("c1"));
    assert!(ProgressRecord::default().is_empty());
}

#[test]
fn downgrade_only_touches_live_slots() {
    let mut r = record();
    let svc = RepoScope::repo("svc");
    let stage = FieldPath::repo(&svc, RepoField::Build("docker_native".into(), BuildPart::BuildStage));
    assert!(r.downgrade(&stage));
    assert_eq!(r.get(&stage), Some(Handle::Unresolved));
    assert!(!r.downgrade(&stage));

    let missing = FieldPath::repo(&svc, RepoField::Build("docker_native".into(), BuildPart::ArtifactsStage));
    assert!(!r.downgrade(&missing));
    assert_eq!(r.get(&missing), None);
}

#[test]
fn pending_lists_every_touched_slot() {
    let pending = record().pending();
    assert_eq!(pending.len(), 7);
    assert!(pending.contains(&FieldPath::Shared(SharedField::Project)));
    assert!(pending.contains(&FieldPath::repo(
        &RepoScope::sub("svc", "oci"),
        RepoField::Deploy("native".into(), DeployPart::Pipeline)
    )));
}

#[test]
fn field_kinds() {
    assert_eq!(
        RepoField::Deploy("jvm".into(), DeployPart::ContainerRepository).kind(),
        ResourceKind::ContainerRepository
    );
    assert_eq!(
        RepoField::Build("dev".into(), BuildPart::ArtifactsStage).kind(),
        ResourceKind::BuildStage
    );
    assert_eq!(SharedField::ProjectLogWorkRequest.kind(), ResourceKind::Log);
}

#[test]
fn serialization_omits_cleared_slots() {
    let mut r = record();
    for path in r.pending() {
        r.clear(&path);
    }
    assert_eq!(
        serde_json::to_value(&r).unwrap(),
        json!({"compartment": {"ocid": "c1", "name": "dev"}, "tag": "t1"})
    );
}
