// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::record::{BuildFlavor, DeployFlavor, Handle, ProgressRecord, RepositoryRecord, ScopeRef};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for progress records.
pub mod strategies {
    use super::build_record;
    use crate::record::ProgressRecord;
    use proptest::prelude::*;

    /// `None` = never attempted, `Some(true)` = live, `Some(false)` = unresolved.
    pub fn arb_slot() -> impl Strategy<Value = Option<bool>> {
        prop_oneof![
            3 => Just(None),
            4 => Just(Some(true)),
            1 => Just(Some(false)),
        ]
    }

    /// Records with one or two repositories, optional sub-modules and shared
    /// resources. Every live handle is unique.
    pub fn arb_record() -> impl Strategy<Value = ProgressRecord> {
        (1usize..=2, any::<bool>(), proptest::collection::vec(arb_slot(), 64))
            .prop_map(|(repos, with_sub, slots)| build_record(repos, with_sub, &slots))
    }
}

struct Slots<'a> {
    flags: std::slice::Iter<'a, Option<bool>>,
    next_id: usize,
}

impl Slots<'_> {
    fn next(&mut self, prefix: &str) -> Option<Handle> {
        match self.flags.next().copied().flatten() {
            Some(true) => {
                self.next_id += 1;
                Some(Handle::Live(format!("{}{}", prefix, self.next_id)))
            }
            Some(false) => Some(Handle::Unresolved),
            None => None,
        }
    }

    fn repository(&mut self) -> RepositoryRecord {
        let mut repo = RepositoryRecord {
            code_repository: self.next("repo"),
            config_map_artifact: self.next("cm"),
            pod_deletion_command_artifact: self.next("pod"),
            ..Default::default()
        };
        let build = BuildFlavor {
            pipeline: self.next("bp"),
            build_stage: self.next("bs"),
            artifacts_stage: self.next("as"),
            artifact: self.next("art"),
        };
        if !build.is_empty() {
            repo.build.insert("docker_native".to_string(), build);
        }
        let deploy = DeployFlavor {
            pipeline: self.next("dp"),
            setup_secret_stage: self.next("ss"),
            deploy_to_cluster_stage: self.next("dc"),
            apply_config_stage: self.next("ac"),
            config_artifact: self.next("ca"),
            container_repository: self.next("cr"),
        };
        if !deploy.is_empty() {
            repo.deploy.insert("jvm".to_string(), deploy);
        }
        repo
    }
}

fn build_record(repos: usize, with_sub: bool, flags: &[Option<bool>]) -> ProgressRecord {
    let mut slots = Slots { flags: flags.iter(), next_id: 0 };
    let mut record = ProgressRecord {
        compartment: Some(ScopeRef::new("c1", "dev")),
        tag: Some("t1".to_string()),
        ..Default::default()
    };
    for index in 0..repos {
        let mut repo = slots.repository();
        if with_sub {
            let sub = slots.repository();
            if !sub.is_empty() {
                repo.subs.insert("oci".to_string(), sub);
            }
        }
        if !repo.is_empty() {
            record.repositories.insert(format!("svc{}", index), repo);
        }
    }
    record.knowledge_base = slots.next("kb");
    record.cluster_environment = slots.next("env");
    record.artifact_repository = slots.next("arepo");
    record.project = slots.next("proj").map(|handle| match handle {
        Handle::Live(id) => ScopeRef::new(id, "demo"),
        Handle::Unresolved => ScopeRef::default(),
    });
    record
}

// ── Record factories ────────────────────────────────────────────────────

/// One repository with a code repository `r1` and a docker native build
/// pipeline `p1`, in compartment `c1`, tagged `t1`.
pub fn single_repository_record() -> ProgressRecord {
    let mut repo = RepositoryRecord {
        code_repository: Some(Handle::live("r1")),
        ..Default::default()
    };
    repo.build.insert(
        "docker_native".to_string(),
        BuildFlavor { pipeline: Some(Handle::live("p1")), ..Default::default() },
    );
    let mut record = ProgressRecord {
        compartment: Some(ScopeRef::new("c1", "")),
        tag: Some("t1".to_string()),
        ..Default::default()
    };
    record.repositories.insert("svc".to_string(), repo);
    record
}

/// A record touching every tier once.
pub fn full_record() -> ProgressRecord {
    let mut repo = RepositoryRecord {
        code_repository: Some(Handle::live("repo1")),
        config_map_artifact: Some(Handle::live("cm1")),
        pod_deletion_command_artifact: Some(Handle::live("pod1")),
        ..Default::default()
    };
    repo.build.insert(
        "docker_native".to_string(),
        BuildFlavor {
            pipeline: Some(Handle::live("bp1")),
            build_stage: Some(Handle::live("bs1")),
            artifacts_stage: Some(Handle::live("as1")),
            artifact: Some(Handle::live("art1")),
        },
    );
    repo.deploy.insert(
        "jvm".to_string(),
        DeployFlavor {
            pipeline: Some(Handle::live("dp1")),
            setup_secret_stage: Some(Handle::live("ss1")),
            deploy_to_cluster_stage: Some(Handle::live("dc1")),
            apply_config_stage: Some(Handle::live("ac1")),
            config_artifact: Some(Handle::live("ca1")),
            container_repository: Some(Handle::live("cr1")),
        },
    );
    ProgressRecord {
        compartment: Some(ScopeRef::new("c1", "dev")),
        project: Some(ScopeRef::new("proj1", "demo")),
        tag: Some("t1".to_string()),
        repositories: [("svc".to_string(), repo)].into_iter().collect(),
        artifact_repository: Some(Handle::live("arepo1")),
        cluster_environment: Some(Handle::live("env1")),
        knowledge_base: Some(Handle::live("kb1")),
        knowledge_base_work_request: None,
        project_log_work_request: None,
        log_group: Some("lg1".to_string()),
    }
}
