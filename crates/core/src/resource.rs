// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider resource kinds, listing summaries and request shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key stamped on every resource created by one deploy operation.
pub const DEPLOY_TAG_KEY: &str = "devops_tooling_deployID";
/// Metadata key linking a build pipeline (or artifact) to its code repository.
pub const CODE_REPOSITORY_TAG_KEY: &str = "devops_tooling_codeRepoID";
/// Metadata key linking a deploy pipeline to the build pipeline it deploys.
pub const BUILD_PIPELINE_TAG_KEY: &str = "devops_tooling_buildPipelineOCID";
/// Metadata key linking shared resources to their owning project.
pub const PROJECT_TAG_KEY: &str = "devops_tooling_projectOCID";
/// Metadata key describing what a knowledge base is used for.
pub const USAGE_TAG_KEY: &str = "devops_tooling_usage";
/// Usage value of a project's audit knowledge base.
pub const AUDIT_USAGE: &str = "oci-devops-adm-audit";
/// Marks an artifact listing the generated resources of one code repository.
pub const REPOSITORY_RESOURCES_TAG_KEY: &str = "devops_tooling_codeRepoResourcesList";
/// Marks an artifact listing the generated resources of the project.
pub const PROJECT_RESOURCES_TAG_KEY: &str = "devops_tooling_projectResourcesList";

/// Every kind of resource the orchestrator creates, lists or deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Project,
    CodeRepository,
    BuildPipeline,
    BuildStage,
    DeployPipeline,
    DeployStage,
    DeployArtifact,
    ContainerRepository,
    ArtifactRepository,
    DeployEnvironment,
    KnowledgeBase,
    VulnerabilityAudit,
    LogGroup,
    Log,
}

crate::simple_display! {
    ResourceKind {
        Project => "project",
        CodeRepository => "code-repository",
        BuildPipeline => "build-pipeline",
        BuildStage => "build-stage",
        DeployPipeline => "deploy-pipeline",
        DeployStage => "deploy-stage",
        DeployArtifact => "deploy-artifact",
        ContainerRepository => "container-repository",
        ArtifactRepository => "artifact-repository",
        DeployEnvironment => "deploy-environment",
        KnowledgeBase => "knowledge-base",
        VulnerabilityAudit => "vulnerability-audit",
        LogGroup => "log-group",
        Log => "log",
    }
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 14] = [
        ResourceKind::Project,
        ResourceKind::CodeRepository,
        ResourceKind::BuildPipeline,
        ResourceKind::BuildStage,
        ResourceKind::DeployPipeline,
        ResourceKind::DeployStage,
        ResourceKind::DeployArtifact,
        ResourceKind::ContainerRepository,
        ResourceKind::ArtifactRepository,
        ResourceKind::DeployEnvironment,
        ResourceKind::KnowledgeBase,
        ResourceKind::VulnerabilityAudit,
        ResourceKind::LogGroup,
        ResourceKind::Log,
    ];

    /// Human-readable noun used in progress messages.
    pub fn noun(&self) -> &'static str {
        match self {
            ResourceKind::Project => "devops project",
            ResourceKind::CodeRepository => "source code repository",
            ResourceKind::BuildPipeline => "build pipeline",
            ResourceKind::BuildStage => "build stage",
            ResourceKind::DeployPipeline => "deployment pipeline",
            ResourceKind::DeployStage => "deployment stage",
            ResourceKind::DeployArtifact => "deploy artifact",
            ResourceKind::ContainerRepository => "container repository",
            ResourceKind::ArtifactRepository => "artifact repository",
            ResourceKind::DeployEnvironment => "cluster environment",
            ResourceKind::KnowledgeBase => "knowledge base",
            ResourceKind::VulnerabilityAudit => "vulnerability audit",
            ResourceKind::LogGroup => "log group",
            ResourceKind::Log => "project log",
        }
    }

    /// Whether resources of this kind carry a predecessor list.
    pub fn is_stage(&self) -> bool {
        matches!(self, ResourceKind::BuildStage | ResourceKind::DeployStage)
    }
}

/// Error returned when parsing an unknown resource kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource kind: {0}")]
pub struct UnknownKind(pub String);

impl std::str::FromStr for ResourceKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Provider-side lifecycle state of a listed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lifecycle {
    Creating,
    #[default]
    Active,
    Updating,
    Deleting,
    Deleted,
    Failed,
}

crate::simple_display! {
    Lifecycle {
        Creating => "CREATING",
        Active => "ACTIVE",
        Updating => "UPDATING",
        Deleting => "DELETING",
        Deleted => "DELETED",
        Failed => "FAILED",
    }
}

impl Lifecycle {
    /// Resources already going away are skipped by sweeps and listings.
    pub fn is_gone(&self) -> bool {
        matches!(self, Lifecycle::Deleting | Lifecycle::Deleted)
    }
}

/// One row of a provider `list` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub id: String,
    pub kind: ResourceKind,
    /// Scope the resource lives in (compartment, project, pipeline, log group).
    pub scope: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    /// Stage predecessor ids; empty for anything that is not a stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub predecessors: Vec<String>,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Summary {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tag(key) == Some(value)
    }
}

crate::builder! {
    pub struct SummaryBuilder => Summary {
        into {
            id: String = "res-1",
            scope: String = "scope-1",
            display_name: String = "resource",
        }
        set {
            kind: ResourceKind = ResourceKind::CodeRepository,
            tags: BTreeMap<String, String> = BTreeMap::new(),
            predecessors: Vec<String> = Vec::new(),
            lifecycle: Lifecycle = Lifecycle::Active,
        }
    }
}

/// Narrows a `list` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Only resources carrying this metadata key with this value.
    pub tag: Option<(String, String)>,
    /// Only resources carrying this metadata key, whatever its value.
    pub tag_key: Option<String>,
    pub display_name: Option<String>,
}

impl ListFilter {
    pub fn tagged(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { tag: Some((key.into(), value.into())), ..Self::default() }
    }

    pub fn with_tag_key(key: impl Into<String>) -> Self {
        Self { tag_key: Some(key.into()), ..Self::default() }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { display_name: Some(name.into()), ..Self::default() }
    }

    pub fn matches(&self, summary: &Summary) -> bool {
        if let Some((key, value)) = &self.tag {
            if !summary.has_tag(key, value) {
                return false;
            }
        }
        if let Some(key) = &self.tag_key {
            if !summary.tags.contains_key(key) {
                return false;
            }
        }
        if let Some(name) = &self.display_name {
            if &summary.display_name != name {
                return false;
            }
        }
        true
    }
}

/// What to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub scope: String,
    pub display_name: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub predecessors: Vec<String>,
}

impl ResourceSpec {
    pub fn new(scope: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            display_name: display_name.into(),
            tags: BTreeMap::new(),
            predecessors: Vec::new(),
        }
    }

    crate::setters! {
        set {
            tags: BTreeMap<String, String>,
            predecessors: Vec<String>,
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// A resource to delete, with the scope some kinds need (a log lives in a log group).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: String,
    pub scope: Option<String>,
}

impl Target {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), scope: None }
    }

    pub fn scoped(id: impl Into<String>, scope: impl Into<String>) -> Self {
        Self { id: id.into(), scope: Some(scope.into()) }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}/{}", scope, self.id),
            None => f.write_str(&self.id),
        }
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
