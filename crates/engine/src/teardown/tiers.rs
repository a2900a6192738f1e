// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fixed tier order of a full teardown and the record slots of each tier.

use dvo_core::{BuildPart, DeployPart, FieldPath, ProgressRecord, RepoField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    DeployStages,
    DeployPipelines,
    BuildStages,
    BuildPipelines,
    Artifacts,
    CodeRepositories,
    Shared,
}

dvo_core::simple_display! {
    Tier {
        DeployStages => "deployment stages",
        DeployPipelines => "deployment pipelines",
        BuildStages => "build stages",
        BuildPipelines => "build pipelines",
        Artifacts => "artifacts",
        CodeRepositories => "source code repositories",
        Shared => "project resources",
    }
}

impl Tier {
    pub const ALL: [Tier; 7] = [
        Tier::DeployStages,
        Tier::DeployPipelines,
        Tier::BuildStages,
        Tier::BuildPipelines,
        Tier::Artifacts,
        Tier::CodeRepositories,
        Tier::Shared,
    ];

    /// 1-based position in the teardown.
    pub fn number(&self) -> usize {
        Tier::ALL.iter().position(|t| t == self).map_or(0, |i| i + 1)
    }

    pub fn of(path: &FieldPath) -> Tier {
        let FieldPath::Repository { field, .. } = path else {
            return Tier::Shared;
        };
        match field {
            RepoField::CodeRepository => Tier::CodeRepositories,
            RepoField::ConfigMapArtifact | RepoField::PodDeletionCommandArtifact => Tier::Artifacts,
            RepoField::Build(_, part) => match part {
                BuildPart::Pipeline => Tier::BuildPipelines,
                BuildPart::BuildStage | BuildPart::ArtifactsStage => Tier::BuildStages,
                BuildPart::Artifact => Tier::Artifacts,
            },
            RepoField::Deploy(_, part) => match part {
                DeployPart::Pipeline => Tier::DeployPipelines,
                DeployPart::SetupSecretStage
                | DeployPart::DeployToClusterStage
                | DeployPart::ApplyConfigStage => Tier::DeployStages,
                DeployPart::ConfigArtifact | DeployPart::ContainerRepository => Tier::Artifacts,
            },
        }
    }
}

const DEPLOY_STAGES: [DeployPart; 3] =
    [DeployPart::SetupSecretStage, DeployPart::DeployToClusterStage, DeployPart::ApplyConfigStage];
const BUILD_STAGES: [BuildPart; 2] = [BuildPart::ArtifactsStage, BuildPart::BuildStage];

/// Set repository slots of `tier`, in deletion order: sub-modules before
/// their repository, flavors in insertion order, stages in their fixed order.
/// The shared tier is handled item by item and has no repository slots.
pub fn paths(record: &ProgressRecord, tier: Tier) -> Vec<FieldPath> {
    let mut paths = Vec::new();
    for scope in record.scopes() {
        let Some(repo) = record.repository(&scope) else { continue };
        let mut fields = Vec::new();
        match tier {
            Tier::DeployStages => {
                for flavor in repo.deploy.keys() {
                    fields.extend(DEPLOY_STAGES.map(|part| RepoField::Deploy(flavor.clone(), part)));
                }
            }
            Tier::DeployPipelines => {
                fields.extend(
                    repo.deploy.keys().map(|f| RepoField::Deploy(f.clone(), DeployPart::Pipeline)),
                );
            }
            Tier::BuildStages => {
                for flavor in repo.build.keys() {
                    fields.extend(BUILD_STAGES.map(|part| RepoField::Build(flavor.clone(), part)));
                }
            }
            Tier::BuildPipelines => {
                fields.extend(
                    repo.build.keys().map(|f| RepoField::Build(f.clone(), BuildPart::Pipeline)),
                );
            }
            Tier::Artifacts => {
                fields.push(RepoField::ConfigMapArtifact);
                fields.push(RepoField::PodDeletionCommandArtifact);
                for flavor in repo.deploy.keys() {
                    fields.push(RepoField::Deploy(flavor.clone(), DeployPart::ConfigArtifact));
                    fields.push(RepoField::Deploy(flavor.clone(), DeployPart::ContainerRepository));
                }
                fields.extend(
                    repo.build.keys().map(|f| RepoField::Build(f.clone(), BuildPart::Artifact)),
                );
            }
            Tier::CodeRepositories => fields.push(RepoField::CodeRepository),
            Tier::Shared => {}
        }
        paths.extend(
            fields
                .into_iter()
                .filter(|field| repo.get(field).is_some())
                .map(|field| FieldPath::repo(&scope, field)),
        );
    }
    paths
}

/// Every set slot grouped by tier, in the order a teardown visits them.
/// Tiers with nothing left are omitted.
pub fn plan(record: &ProgressRecord) -> Vec<(Tier, Vec<FieldPath>)> {
    Tier::ALL
        .iter()
        .map(|tier| {
            let slots = match tier {
                Tier::Shared => record
                    .pending()
                    .into_iter()
                    .filter(|path| matches!(path, FieldPath::Shared(_)))
                    .collect(),
                _ => paths(record, *tier),
            };
            (*tier, slots)
        })
        .filter(|(_, slots)| !slots.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "tiers_tests.rs"]
mod tests;
