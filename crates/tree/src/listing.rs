// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider-backed fetchers: project, resource groups, resources, and the
//! stages or audits below them.

use crate::fetch::{ChildFetcher, FetchError};
use crate::node::{Capabilities, NodeSpec};
use async_trait::async_trait;
use dvo_adapters::CloudProvider;
use dvo_core::{Lifecycle, ListFilter, ResourceKind, ScopeRef, Summary, PROJECT_TAG_KEY};
use std::sync::Arc;

/// Resource groups shown under a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    CodeRepositories,
    BuildPipelines,
    DeployPipelines,
    Artifacts,
    ContainerRepositories,
    ArtifactRepositories,
    Environments,
    KnowledgeBases,
    Logs,
}

dvo_core::simple_display! {
    Group {
        CodeRepositories => "Code Repositories",
        BuildPipelines => "Build Pipelines",
        DeployPipelines => "Deployment Pipelines",
        Artifacts => "Artifacts",
        ContainerRepositories => "Container Repositories",
        ArtifactRepositories => "Artifact Repositories",
        Environments => "Environments",
        KnowledgeBases => "Knowledge Bases",
        Logs => "Logs",
    }
}

impl Group {
    pub const ALL: [Group; 9] = [
        Group::CodeRepositories,
        Group::BuildPipelines,
        Group::DeployPipelines,
        Group::Artifacts,
        Group::ContainerRepositories,
        Group::ArtifactRepositories,
        Group::Environments,
        Group::KnowledgeBases,
        Group::Logs,
    ];

    pub fn kind(&self) -> ResourceKind {
        match self {
            Group::CodeRepositories => ResourceKind::CodeRepository,
            Group::BuildPipelines => ResourceKind::BuildPipeline,
            Group::DeployPipelines => ResourceKind::DeployPipeline,
            Group::Artifacts => ResourceKind::DeployArtifact,
            Group::ContainerRepositories => ResourceKind::ContainerRepository,
            Group::ArtifactRepositories => ResourceKind::ArtifactRepository,
            Group::Environments => ResourceKind::DeployEnvironment,
            Group::KnowledgeBases => ResourceKind::KnowledgeBase,
            Group::Logs => ResourceKind::Log,
        }
    }

    /// Groups living in the compartment rather than the project; their
    /// members are picked out by the project tag.
    fn in_compartment(&self) -> bool {
        matches!(
            self,
            Group::ContainerRepositories
                | Group::ArtifactRepositories
                | Group::KnowledgeBases
                | Group::Logs
        )
    }

    /// Kind listed under each member of the group, if any.
    fn nested(&self) -> Option<ResourceKind> {
        match self {
            Group::BuildPipelines => Some(ResourceKind::BuildStage),
            Group::DeployPipelines => Some(ResourceKind::DeployStage),
            Group::KnowledgeBases => Some(ResourceKind::VulnerabilityAudit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Level {
    Project,
    Group(Group),
    Nested { kind: ResourceKind, parent: String },
}

/// Fetches one level of a project's resources through the provider.
#[derive(Clone)]
pub struct ListingFetcher<P> {
    provider: P,
    compartment: String,
    project: ScopeRef,
    level: Level,
}

impl<P: CloudProvider> ListingFetcher<P> {
    /// Root node of a project; expanding it lists the resource groups.
    pub fn project(provider: P, compartment: impl Into<String>, project: ScopeRef) -> NodeSpec {
        let label = project.label().to_string();
        let description = project.ocid.clone();
        let fetcher = Self { provider, compartment: compartment.into(), project, level: Level::Project };
        NodeSpec::lazy(label, Arc::new(fetcher))
            .description(description)
            .context(ResourceKind::Project.to_string())
    }

    fn at(&self, level: Level) -> Arc<Self> {
        Arc::new(Self {
            provider: self.provider.clone(),
            compartment: self.compartment.clone(),
            project: self.project.clone(),
            level,
        })
    }

    fn groups(&self) -> Vec<NodeSpec> {
        Group::ALL
            .iter()
            .map(|group| NodeSpec::lazy(group.to_string(), self.at(Level::Group(*group))).context("group"))
            .collect()
    }

    async fn members(&self, group: Group) -> Result<Vec<NodeSpec>, FetchError> {
        let (scope, filter) = if group.in_compartment() {
            (self.compartment.as_str(), ListFilter::tagged(PROJECT_TAG_KEY, self.project.ocid.clone()))
        } else {
            (self.project.ocid.as_str(), ListFilter::default())
        };
        let listed = self.provider.list(group.kind(), scope, &filter).await?;
        Ok(live(listed)
            .map(|summary| match group.nested() {
                Some(kind) => {
                    let level = Level::Nested { kind, parent: summary.id.clone() };
                    resource_node(NodeSpec::lazy(summary.display_name.clone(), self.at(level)), summary)
                }
                None => resource_node(NodeSpec::leaf(summary.display_name.clone()), summary),
            })
            .collect())
    }

    async fn nested(&self, kind: ResourceKind, parent: &str) -> Result<Vec<NodeSpec>, FetchError> {
        let listed = self.provider.list(kind, parent, &ListFilter::default()).await?;
        Ok(live(listed)
            .map(|summary| resource_node(NodeSpec::leaf(summary.display_name.clone()), summary))
            .collect())
    }
}

fn live(listed: Vec<Summary>) -> impl Iterator<Item = Summary> {
    listed.into_iter().filter(|summary| !summary.lifecycle.is_gone())
}

fn resource_node(spec: NodeSpec, summary: Summary) -> NodeSpec {
    let lazy = spec.is_lazy();
    let spec = spec
        .context(summary.kind.to_string())
        .caps(Capabilities::default().removable(true).reloadable(lazy));
    let spec = match summary.lifecycle {
        Lifecycle::Active => spec,
        other => spec.description(other.to_string()),
    };
    spec.resource(summary)
}

#[async_trait]
impl<P: CloudProvider> ChildFetcher for ListingFetcher<P> {
    async fn fetch(&self) -> Result<Vec<NodeSpec>, FetchError> {
        tracing::debug!(project = %self.project.label(), level = ?self.level, "listing");
        match &self.level {
            Level::Project => Ok(self.groups()),
            Level::Group(group) => self.members(*group).await,
            Level::Nested { kind, parent } => self.nested(*kind, parent).await,
        }
    }
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
