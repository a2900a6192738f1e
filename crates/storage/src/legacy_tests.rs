// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::migration::MigrationRegistry;
use dvo_core::{Handle, ProgressRecord};
use serde_json::json;

fn migrate(doc: Value) -> Value {
    MigrationRegistry::standard().migrate_to(doc, 2).unwrap()
}

#[test]
fn bare_legacy_record_is_wrapped_in_envelope() {
    let doc = migrate(json!({
        "compartment": {"ocid": "c1", "name": "dev"},
        "tag": "t1",
        "repositories": {"svc": {"codeRepository": "r1", "docker_nibuildPipeline": "p1"}}
    }));
    assert_eq!(doc["v"], 2);
    assert_eq!(
        doc["record"],
        json!({
            "compartment": {"ocid": "c1", "name": "dev"},
            "tag": "t1",
            "repositories": {"svc": {
                "code_repository": "r1",
                "build": {"docker_native": {"pipeline": "p1"}}
            }}
        })
    );
}

#[yare::parameterized(
    dev           = { "devbuild", "dev" },
    native        = { "nibuild", "native" },
    docker_native = { "docker_nibuild", "docker_native" },
    docker_jvm    = { "docker_jvmbuild", "docker_jvm" },
)]
fn build_flavors_are_renamed(prefix: &str, flavor: &str) {
    let mut repo = Map::new();
    repo.insert(format!("{prefix}Pipeline"), json!("p"));
    repo.insert(format!("{prefix}PipelineBuildStage"), json!("b"));
    repo.insert(format!("{prefix}PipelineArtifactsStage"), json!(false));
    repo.insert(format!("{prefix}Artifact"), json!("a"));
    let doc = migrate(json!({"repositories": {"svc": repo}}));
    assert_eq!(
        doc["record"]["repositories"]["svc"]["build"][flavor],
        json!({"pipeline": "p", "build_stage": "b", "artifacts_stage": false, "artifact": "a"})
    );
}

#[test]
fn deploy_flavors_and_stages_are_grouped() {
    let doc = migrate(json!({"repositories": {"svc": {
        "oke_deployJvmPipeline": "dj",
        "setupSecretForDeployJvmStage": "ssj",
        "deployJvmToOkeStage": "dcj",
        "applyConfigMapStage": "acj",
        "oke_deployJvmConfigArtifact": "caj",
        "jvmContainerRepository": "crj",
        "oke_deployNativePipeline": "dn",
        "applyNativeConfigMapStage": "acn",
        "nativeContainerRepository": false,
        "oke_configMapArtifact": "cm",
        "oke_podDeletionCommandArtifact": "pod"
    }}}));
    let svc = &doc["record"]["repositories"]["svc"];
    assert_eq!(
        svc["deploy"]["jvm"],
        json!({
            "pipeline": "dj",
            "setup_secret_stage": "ssj",
            "deploy_to_cluster_stage": "dcj",
            "apply_config_stage": "acj",
            "config_artifact": "caj",
            "container_repository": "crj"
        })
    );
    assert_eq!(
        svc["deploy"]["native"],
        json!({"pipeline": "dn", "apply_config_stage": "acn", "container_repository": false})
    );
    assert_eq!(svc["config_map_artifact"], "cm");
    assert_eq!(svc["pod_deletion_command_artifact"], "pod");
}

#[test]
fn subs_are_migrated_recursively() {
    let doc = migrate(json!({"repositories": {"svc": {
        "subs": {"oci": {"docker_jvmbuildPipeline": "p2", "codeRepository": "ignored-but-kept"}}
    }}}));
    assert_eq!(
        doc["record"]["repositories"]["svc"]["subs"]["oci"],
        json!({"code_repository": "ignored-but-kept", "build": {"docker_jvm": {"pipeline": "p2"}}})
    );
}

#[test]
fn shared_slots_are_renamed_and_unknown_keys_dropped() {
    let doc = migrate(json!({
        "profile": "DEFAULT",
        "knowledgeBaseOCID": "kb1",
        "knowledgeBaseWorkRequest": "wr1",
        "okeClusterEnvironment": "env1",
        "artifactsRepository": "ar1",
        "projectLogWorkRequest": "wr2",
        "logGroup": "lg1"
    }));
    assert_eq!(
        doc["record"],
        json!({
            "knowledge_base": "kb1",
            "knowledge_base_work_request": "wr1",
            "cluster_environment": "env1",
            "artifact_repository": "ar1",
            "project_log_work_request": "wr2",
            "log_group": "lg1"
        })
    );
}

#[test]
fn migrated_record_deserializes() {
    let doc = migrate(json!({
        "compartment": {"ocid": "c1"},
        "project": {"ocid": "proj1", "name": "demo"},
        "tag": "t1",
        "repositories": {"svc": {"codeRepository": "r1", "nibuildPipelineBuildStage": false}}
    }));
    let record: ProgressRecord = serde_json::from_value(doc["record"].clone()).unwrap();
    let svc = &record.repositories["svc"];
    assert_eq!(svc.code_repository, Some(Handle::Live("r1".into())));
    assert_eq!(svc.build["native"].build_stage, Some(Handle::Unresolved));
}

#[test]
fn non_object_repository_is_malformed() {
    let err = MigrationRegistry::standard()
        .migrate_to(json!({"repositories": {"svc": 3}}), 2)
        .unwrap_err();
    assert!(matches!(err, MigrationError::Malformed(_)));
}
