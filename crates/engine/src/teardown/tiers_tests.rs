// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dvo_core::test_support::full_record;
use dvo_core::{Handle, RepoScope, RepositoryRecord};

fn labels(paths: &[FieldPath]) -> Vec<String> {
    paths.iter().map(ToString::to_string).collect()
}

#[test]
fn deploy_stages_follow_the_fixed_order() {
    assert_eq!(
        labels(&paths(&full_record(), Tier::DeployStages)),
        vec![
            "jvm setup secret stage of svc",
            "jvm deploy to cluster stage of svc",
            "jvm apply config stage of svc",
        ]
    );
}

#[test]
fn artifacts_stage_precedes_build_stage() {
    assert_eq!(
        labels(&paths(&full_record(), Tier::BuildStages)),
        vec!["docker_native artifacts stage of svc", "docker_native build stage of svc"]
    );
}

#[test]
fn artifacts_tier_covers_container_repositories() {
    let kinds: Vec<_> = paths(&full_record(), Tier::Artifacts).iter().map(FieldPath::kind).collect();
    assert_eq!(kinds.len(), 5);
    assert!(kinds.contains(&dvo_core::ResourceKind::ContainerRepository));
}

#[test]
fn sub_modules_come_before_their_repository() {
    let mut record = full_record();
    let sub = RepositoryRecord { code_repository: Some(Handle::live("subrepo")), ..Default::default() };
    record.repositories.get_mut("svc").unwrap().subs.insert("oci".to_string(), sub);

    let scopes: Vec<RepoScope> = paths(&record, Tier::CodeRepositories)
        .into_iter()
        .filter_map(|p| match p {
            FieldPath::Repository { scope, .. } => Some(scope),
            FieldPath::Shared(_) => None,
        })
        .collect();
    assert_eq!(scopes, vec![RepoScope::sub("svc", "oci"), RepoScope::repo("svc")]);
}

#[test]
fn every_pending_repository_slot_belongs_to_exactly_one_tier() {
    let record = full_record();
    let mut from_tiers: Vec<FieldPath> =
        Tier::ALL.iter().flat_map(|tier| paths(&record, *tier)).collect();
    let mut pending: Vec<FieldPath> = record
        .pending()
        .into_iter()
        .filter(|p| matches!(p, FieldPath::Repository { .. }))
        .collect();
    for path in &from_tiers {
        assert_eq!(paths(&record, Tier::of(path)).iter().filter(|p| *p == path).count(), 1);
    }
    from_tiers.sort_by_key(ToString::to_string);
    pending.sort_by_key(ToString::to_string);
    assert_eq!(from_tiers, pending);
}

#[test]
fn tier_numbers() {
    assert_eq!(Tier::DeployStages.number(), 1);
    assert_eq!(Tier::Shared.number(), 7);
}

#[test]
fn plan_lists_shared_slots_last_in_deletion_order() {
    let plan = plan(&full_record());

    assert_eq!(plan.iter().map(|(tier, _)| *tier).collect::<Vec<_>>(), Tier::ALL.to_vec());
    let (_, shared) = &plan[6];
    assert_eq!(
        labels(shared),
        vec!["knowledge base", "cluster environment", "artifact repository", "devops project"]
    );
}

#[test]
fn plan_skips_empty_tiers() {
    let plan = plan(&dvo_core::test_support::single_repository_record());

    let tiers: Vec<Tier> = plan.iter().map(|(tier, _)| *tier).collect();
    assert_eq!(tiers, vec![Tier::BuildPipelines, Tier::CodeRepositories]);
    assert!(super::plan(&ProgressRecord::default()).is_empty());
}
