// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version 1 checkpoints: flat camel-case keys, one key per resource slot.
//!
//! ```json
//! { "compartment": {...}, "project": {...}, "tag": "t1",
//!   "repositories": { "svc": { "codeRepository": "r1",
//!                              "docker_nibuildPipeline": "p1",
//!                              "docker_nibuildPipelineBuildStage": "s1",
//!                              "oke_deployJvmPipeline": "d1",
//!                              "subs": { ... } } },
//!   "knowledgeBaseOCID": "kb1", "logGroup": "lg1" }
//! ```
//!
//! Migrated into the nested version 2 layout wrapped in a checkpoint envelope.

use crate::migration::{Migration, MigrationError};
use serde_json::{Map, Value};

/// (v1 prefix, v2 build flavor)
const BUILD_FLAVORS: [(&str, &str); 4] = [
    ("devbuild", "dev"),
    ("nibuild", "native"),
    ("docker_nibuild", "docker_native"),
    ("docker_jvmbuild", "docker_jvm"),
];

/// (v1 infix, v2 deploy flavor)
const DEPLOY_FLAVORS: [(&str, &str); 2] = [("Jvm", "jvm"), ("Native", "native")];

/// (v1 key, v2 key) for project-level slots.
const SHARED_KEYS: [(&str, &str); 9] = [
    ("compartment", "compartment"),
    ("project", "project"),
    ("tag", "tag"),
    ("knowledgeBaseOCID", "knowledge_base"),
    ("knowledgeBaseWorkRequest", "knowledge_base_work_request"),
    ("okeClusterEnvironment", "cluster_environment"),
    ("artifactsRepository", "artifact_repository"),
    ("projectLogWorkRequest", "project_log_work_request"),
    ("logGroup", "log_group"),
];

pub struct LegacyFlatToV2;

impl Migration for LegacyFlatToV2 {
    fn source_version(&self) -> u32 {
        1
    }

    fn target_version(&self) -> u32 {
        2
    }

    fn migrate(&self, doc: &mut Value) -> Result<(), MigrationError> {
        let Value::Object(outer) = doc else {
            return Err(MigrationError::Malformed("checkpoint is not an object".into()));
        };
        // Either a bare v1 record or one already wrapped in an envelope.
        let flat = match outer.remove("record") {
            Some(Value::Object(record)) => record,
            Some(_) => return Err(MigrationError::Malformed("record is not an object".into())),
            None => std::mem::take(outer),
        };
        let key = outer.remove("key");

        let record = migrate_record(flat)?;
        let mut envelope = Map::new();
        envelope.insert("v".into(), 2.into());
        if let Some(key) = key {
            envelope.insert("key".into(), key);
        }
        envelope.insert("record".into(), Value::Object(record));
        *doc = Value::Object(envelope);
        Ok(())
    }
}

fn migrate_record(mut flat: Map<String, Value>) -> Result<Map<String, Value>, MigrationError> {
    let mut out = Map::new();
    for (old, new) in SHARED_KEYS {
        if let Some(value) = flat.remove(old) {
            out.insert(new.into(), value);
        }
    }
    if let Some(repos) = flat.remove("repositories") {
        let Value::Object(repos) = repos else {
            return Err(MigrationError::Malformed("repositories is not an object".into()));
        };
        let mut migrated = Map::new();
        for (name, repo) in repos {
            match repo {
                Value::Object(repo) => {
                    let repo = migrate_repository(&name, repo)?;
                    migrated.insert(name, Value::Object(repo));
                }
                Value::Null => {}
                _ => {
                    return Err(MigrationError::Malformed(format!(
                        "repository {} is not an object",
                        name
                    )))
                }
            }
        }
        out.insert("repositories".into(), Value::Object(migrated));
    }
    for key in flat.keys() {
        tracing::debug!(key = %key, "dropping unknown legacy checkpoint key");
    }
    Ok(out)
}

fn migrate_repository(
    parent: &str,
    mut flat: Map<String, Value>,
) -> Result<Map<String, Value>, MigrationError> {
    let mut out = Map::new();
    move_key(&mut flat, "codeRepository", &mut out, "code_repository");
    move_key(&mut flat, "oke_configMapArtifact", &mut out, "config_map_artifact");
    move_key(&mut flat, "oke_oke_configMapArtifact", &mut out, "config_map_artifact");
    move_key(&mut flat, "oke_podDeletionCommandArtifact", &mut out, "pod_deletion_command_artifact");

    let mut build = Map::new();
    for (prefix, flavor) in BUILD_FLAVORS {
        let mut slots = Map::new();
        move_key(&mut flat, &format!("{prefix}Pipeline"), &mut slots, "pipeline");
        move_key(&mut flat, &format!("{prefix}PipelineBuildStage"), &mut slots, "build_stage");
        move_key(&mut flat, &format!("{prefix}PipelineArtifactsStage"), &mut slots, "artifacts_stage");
        move_key(&mut flat, &format!("{prefix}Artifact"), &mut slots, "artifact");
        if !slots.is_empty() {
            build.insert(flavor.into(), Value::Object(slots));
        }
    }
    if !build.is_empty() {
        out.insert("build".into(), Value::Object(build));
    }

    let mut deploy = Map::new();
    for (infix, flavor) in DEPLOY_FLAVORS {
        let mut slots = Map::new();
        move_key(&mut flat, &format!("oke_deploy{infix}Pipeline"), &mut slots, "pipeline");
        move_key(&mut flat, &format!("setupSecretForDeploy{infix}Stage"), &mut slots, "setup_secret_stage");
        move_key(&mut flat, &format!("deploy{infix}ToOkeStage"), &mut slots, "deploy_to_cluster_stage");
        let apply = if infix == "Jvm" {
            "applyConfigMapStage".to_string()
        } else {
            format!("apply{infix}ConfigMapStage")
        };
        move_key(&mut flat, &apply, &mut slots, "apply_config_stage");
        move_key(&mut flat, &format!("oke_deploy{infix}ConfigArtifact"), &mut slots, "config_artifact");
        move_key(&mut flat, &format!("{flavor}ContainerRepository"), &mut slots, "container_repository");
        if !slots.is_empty() {
            deploy.insert(flavor.into(), Value::Object(slots));
        }
    }
    if !deploy.is_empty() {
        out.insert("deploy".into(), Value::Object(deploy));
    }

    if let Some(Value::Object(subs)) = flat.remove("subs") {
        let mut migrated = Map::new();
        for (name, sub) in subs {
            if let Value::Object(sub) = sub {
                let path = format!("{parent}/{name}");
                migrated.insert(name, Value::Object(migrate_repository(&path, sub)?));
            }
        }
        if !migrated.is_empty() {
            out.insert("subs".into(), Value::Object(migrated));
        }
    }

    for key in flat.keys() {
        tracing::debug!(repository = %parent, key = %key, "dropping unknown legacy repository key");
    }
    Ok(out)
}

fn move_key(from: &mut Map<String, Value>, old: &str, to: &mut Map<String, Value>, new: &str) {
    match from.remove(old) {
        Some(Value::Null) | None => {}
        Some(value) => {
            to.insert(new.into(), value);
        }
    }
}

#[cfg(test)]
#[path = "legacy_tests.rs"]
mod tests;
