// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress record: the checkpointed description of what still exists.
//!
//! Every resource slot is an `Option<Handle>`:
//! - `None`: never attempted, nothing to do
//! - `Some(Handle::Live(id))`: exists and must be deleted
//! - `Some(Handle::Unresolved)`: attempted, but the handle is unknown; only the
//!   tag sweep of its tier can clean it up
//!
//! Slots are addressed with [`FieldPath`] so the teardown engine can clear one
//! slot at a time and persist between each step. Clearing prunes flavors, subs
//! and repositories that become empty.

use crate::resource::ResourceKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// State of one resource slot that has been touched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Handle {
    Live(String),
    Unresolved,
}

impl Handle {
    pub fn live(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.is_empty() {
            Handle::Unresolved
        } else {
            Handle::Live(id)
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Handle::Live(id) => Some(id),
            Handle::Unresolved => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Handle::Live(_))
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handle::Live(id) => f.write_str(id),
            Handle::Unresolved => f.write_str("<unresolved>"),
        }
    }
}

impl Serialize for Handle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Handle::Live(id) => serializer.serialize_str(id),
            Handle::Unresolved => serializer.serialize_bool(false),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawHandle {
    Id(String),
    Flag(bool),
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawHandle::deserialize(deserializer)? {
            RawHandle::Id(id) => Handle::live(id),
            RawHandle::Flag(_) => Handle::Unresolved,
        })
    }
}

/// A compartment or project reference. An empty `ocid` means the resource
/// was attempted but its identifier never got recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeRef {
    pub ocid: String,
    pub name: String,
}

impl ScopeRef {
    pub fn new(ocid: impl Into<String>, name: impl Into<String>) -> Self {
        Self { ocid: ocid.into(), name: name.into() }
    }

    pub fn handle(&self) -> Handle {
        Handle::live(self.ocid.clone())
    }

    /// Name for messages, falling back to the identifier.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.ocid
        } else {
            &self.name
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ScopeFields {
    #[serde(default)]
    ocid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScope {
    Fields(ScopeFields),
    Id(String),
    Flag(bool),
}

impl Serialize for ScopeRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.ocid.is_empty() && self.name.is_empty() {
            return serializer.serialize_bool(false);
        }
        ScopeFields { ocid: self.ocid.clone(), name: self.name.clone() }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ScopeRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawScope::deserialize(deserializer)? {
            RawScope::Fields(f) => ScopeRef { ocid: f.ocid, name: f.name },
            RawScope::Id(ocid) => ScopeRef { ocid, name: String::new() },
            RawScope::Flag(_) => ScopeRef::default(),
        })
    }
}

/// Build pipeline of one flavor and the resources hanging off it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFlavor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_stage: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts_stage: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Handle>,
}

impl BuildFlavor {
    pub fn is_empty(&self) -> bool {
        self.pipeline.is_none()
            && self.build_stage.is_none()
            && self.artifacts_stage.is_none()
            && self.artifact.is_none()
    }

    fn slot_mut(&mut self, part: BuildPart) -> &mut Option<Handle> {
        match part {
            BuildPart::Pipeline => &mut self.pipeline,
            BuildPart::BuildStage => &mut self.build_stage,
            BuildPart::ArtifactsStage => &mut self.artifacts_stage,
            BuildPart::Artifact => &mut self.artifact,
        }
    }

    fn slot(&self, part: BuildPart) -> &Option<Handle> {
        match part {
            BuildPart::Pipeline => &self.pipeline,
            BuildPart::BuildStage => &self.build_stage,
            BuildPart::ArtifactsStage => &self.artifacts_stage,
            BuildPart::Artifact => &self.artifact,
        }
    }
}

/// Deploy pipeline of one flavor and the resources hanging off it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployFlavor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_secret_stage: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_to_cluster_stage: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_config_stage: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_artifact: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_repository: Option<Handle>,
}

impl DeployFlavor {
    pub fn is_empty(&self) -> bool {
        self.pipeline.is_none()
            && self.setup_secret_stage.is_none()
            && self.deploy_to_cluster_stage.is_none()
            && self.apply_config_stage.is_none()
            && self.config_artifact.is_none()
            && self.container_repository.is_none()
    }

    fn slot_mut(&mut self, part: DeployPart) -> &mut Option<Handle> {
        match part {
            DeployPart::Pipeline => &mut self.pipeline,
            DeployPart::SetupSecretStage => &mut self.setup_secret_stage,
            DeployPart::DeployToClusterStage => &mut self.deploy_to_cluster_stage,
            DeployPart::ApplyConfigStage => &mut self.apply_config_stage,
            DeployPart::ConfigArtifact => &mut self.config_artifact,
            DeployPart::ContainerRepository => &mut self.container_repository,
        }
    }

    fn slot(&self, part: DeployPart) -> &Option<Handle> {
        match part {
            DeployPart::Pipeline => &self.pipeline,
            DeployPart::SetupSecretStage => &self.setup_secret_stage,
            DeployPart::DeployToClusterStage => &self.deploy_to_cluster_stage,
            DeployPart::ApplyConfigStage => &self.apply_config_stage,
            DeployPart::ConfigArtifact => &self.config_artifact,
            DeployPart::ContainerRepository => &self.container_repository,
        }
    }
}

/// Resources created for one source repository (or one of its sub-modules).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_repository: Option<Handle>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub build: IndexMap<String, BuildFlavor>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub deploy: IndexMap<String, DeployFlavor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_artifact: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_deletion_command_artifact: Option<Handle>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub subs: IndexMap<String, RepositoryRecord>,
}

impl RepositoryRecord {
    pub fn is_empty(&self) -> bool {
        self.code_repository.is_none()
            && self.config_map_artifact.is_none()
            && self.pod_deletion_command_artifact.is_none()
            && self.build.values().all(BuildFlavor::is_empty)
            && self.deploy.values().all(DeployFlavor::is_empty)
            && self.subs.values().all(RepositoryRecord::is_empty)
    }

    pub fn get(&self, field: &RepoField) -> Option<&Handle> {
        match field {
            RepoField::CodeRepository => self.code_repository.as_ref(),
            RepoField::ConfigMapArtifact => self.config_map_artifact.as_ref(),
            RepoField::PodDeletionCommandArtifact => self.pod_deletion_command_artifact.as_ref(),
            RepoField::Build(flavor, part) => self.build.get(flavor)?.slot(*part).as_ref(),
            RepoField::Deploy(flavor, part) => self.deploy.get(flavor)?.slot(*part).as_ref(),
        }
    }

    fn slot_mut(&mut self, field: &RepoField) -> Option<&mut Option<Handle>> {
        match field {
            RepoField::CodeRepository => Some(&mut self.code_repository),
            RepoField::ConfigMapArtifact => Some(&mut self.config_map_artifact),
            RepoField::PodDeletionCommandArtifact => Some(&mut self.pod_deletion_command_artifact),
            RepoField::Build(flavor, part) => Some(self.build.get_mut(flavor)?.slot_mut(*part)),
            RepoField::Deploy(flavor, part) => Some(self.deploy.get_mut(flavor)?.slot_mut(*part)),
        }
    }

    /// Clear a slot, dropping the flavor if it became empty.
    fn clear(&mut self, field: &RepoField) -> bool {
        let Some(slot) = self.slot_mut(field) else {
            return false;
        };
        let changed = slot.take().is_some();
        match field {
            RepoField::Build(flavor, _) => {
                if self.build.get(flavor).is_some_and(BuildFlavor::is_empty) {
                    self.build.shift_remove(flavor);
                }
            }
            RepoField::Deploy(flavor, _) => {
                if self.deploy.get(flavor).is_some_and(DeployFlavor::is_empty) {
                    self.deploy.shift_remove(flavor);
                }
            }
            _ => {}
        }
        changed
    }
}

/// Which part of a build flavor a slot refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildPart {
    Pipeline,
    BuildStage,
    ArtifactsStage,
    Artifact,
}

crate::simple_display! {
    BuildPart {
        Pipeline => "build pipeline",
        BuildStage => "build stage",
        ArtifactsStage => "artifacts stage",
        Artifact => "artifact",
    }
}

/// Which part of a deploy flavor a slot refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeployPart {
    Pipeline,
    SetupSecretStage,
    DeployToClusterStage,
    ApplyConfigStage,
    ConfigArtifact,
    ContainerRepository,
}

crate::simple_display! {
    DeployPart {
        Pipeline => "deployment pipeline",
        SetupSecretStage => "setup secret stage",
        DeployToClusterStage => "deploy to cluster stage",
        ApplyConfigStage => "apply config stage",
        ConfigArtifact => "config artifact",
        ContainerRepository => "container repository",
    }
}

/// A slot inside a repository record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepoField {
    CodeRepository,
    ConfigMapArtifact,
    PodDeletionCommandArtifact,
    Build(String, BuildPart),
    Deploy(String, DeployPart),
}

impl RepoField {
    pub fn kind(&self) -> ResourceKind {
        match self {
            RepoField::CodeRepository => ResourceKind::CodeRepository,
            RepoField::ConfigMapArtifact | RepoField::PodDeletionCommandArtifact => {
                ResourceKind::DeployArtifact
            }
            RepoField::Build(_, part) => match part {
                BuildPart::Pipeline => ResourceKind::BuildPipeline,
                BuildPart::BuildStage | BuildPart::ArtifactsStage => ResourceKind::BuildStage,
                BuildPart::Artifact => ResourceKind::DeployArtifact,
            },
            RepoField::Deploy(_, part) => match part {
                DeployPart::Pipeline => ResourceKind::DeployPipeline,
                DeployPart::SetupSecretStage
                | DeployPart::DeployToClusterStage
                | DeployPart::ApplyConfigStage => ResourceKind::DeployStage,
                DeployPart::ConfigArtifact => ResourceKind::DeployArtifact,
                DeployPart::ContainerRepository => ResourceKind::ContainerRepository,
            },
        }
    }
}

impl std::fmt::Display for RepoField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoField::CodeRepository => f.write_str("code repository"),
            RepoField::ConfigMapArtifact => f.write_str("config map artifact"),
            RepoField::PodDeletionCommandArtifact => f.write_str("pod deletion command artifact"),
            RepoField::Build(flavor, part) => write!(f, "{} {}", flavor, part),
            RepoField::Deploy(flavor, part) => write!(f, "{} {}", flavor, part),
        }
    }
}

/// Project-level slots shared by every repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharedField {
    KnowledgeBase,
    KnowledgeBaseWorkRequest,
    ClusterEnvironment,
    ArtifactRepository,
    ProjectLogWorkRequest,
    Project,
}

impl SharedField {
    pub fn kind(&self) -> ResourceKind {
        match self {
            SharedField::KnowledgeBase | SharedField::KnowledgeBaseWorkRequest => {
                ResourceKind::KnowledgeBase
            }
            SharedField::ClusterEnvironment => ResourceKind::DeployEnvironment,
            SharedField::ArtifactRepository => ResourceKind::ArtifactRepository,
            SharedField::ProjectLogWorkRequest => ResourceKind::Log,
            SharedField::Project => ResourceKind::Project,
        }
    }
}

crate::simple_display! {
    SharedField {
        KnowledgeBase => "knowledge base",
        KnowledgeBaseWorkRequest => "knowledge base work request",
        ClusterEnvironment => "cluster environment",
        ArtifactRepository => "artifact repository",
        ProjectLogWorkRequest => "project log work request",
        Project => "devops project",
    }
}

/// A repository entry, or one of its sub-modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoScope {
    pub repo: String,
    pub sub: Option<String>,
}

impl RepoScope {
    pub fn repo(repo: impl Into<String>) -> Self {
        Self { repo: repo.into(), sub: None }
    }

    pub fn sub(repo: impl Into<String>, sub: impl Into<String>) -> Self {
        Self { repo: repo.into(), sub: Some(sub.into()) }
    }
}

impl std::fmt::Display for RepoScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sub {
            Some(sub) => write!(f, "{}/{}", self.repo, sub),
            None => f.write_str(&self.repo),
        }
    }
}

/// Address of one resource slot in a [`ProgressRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Repository { scope: RepoScope, field: RepoField },
    Shared(SharedField),
}

impl FieldPath {
    pub fn repo(scope: &RepoScope, field: RepoField) -> Self {
        FieldPath::Repository { scope: scope.clone(), field }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            FieldPath::Repository { field, .. } => field.kind(),
            FieldPath::Shared(field) => field.kind(),
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldPath::Repository { scope, field } => write!(f, "{} of {}", field, scope),
            FieldPath::Shared(field) => write!(f, "{}", field),
        }
    }
}

/// The unit of checkpointing for one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartment: Option<ScopeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ScopeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub repositories: IndexMap<String, RepositoryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_repository: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_environment: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_work_request: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_log_work_request: Option<Handle>,
    /// Log group holding the project log; scope for log deletion and log sweeps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_group: Option<String>,
}

impl ProgressRecord {
    /// True once nothing is left to delete. Compartment, tag and log group
    /// are identity metadata and do not keep a record alive.
    pub fn is_empty(&self) -> bool {
        self.project.is_none()
            && self.repositories.values().all(RepositoryRecord::is_empty)
            && self.artifact_repository.is_none()
            && self.cluster_environment.is_none()
            && self.knowledge_base.is_none()
            && self.knowledge_base_work_request.is_none()
            && self.project_log_work_request.is_none()
    }

    pub fn compartment_id(&self) -> Option<&str> {
        self.compartment.as_ref().map(|c| c.ocid.as_str()).filter(|id| !id.is_empty())
    }

    pub fn project_label(&self) -> &str {
        self.project.as_ref().map(ScopeRef::label).unwrap_or("")
    }

    /// Repository scopes in teardown order: sub-modules first, then the
    /// repository itself, repositories in insertion order.
    pub fn scopes(&self) -> Vec<RepoScope> {
        let mut scopes = Vec::new();
        for (name, repo) in &self.repositories {
            for sub in repo.subs.keys() {
                scopes.push(RepoScope::sub(name.clone(), sub.clone()));
            }
            scopes.push(RepoScope::repo(name.clone()));
        }
        scopes
    }

    pub fn repository(&self, scope: &RepoScope) -> Option<&RepositoryRecord> {
        let repo = self.repositories.get(&scope.repo)?;
        match &scope.sub {
            Some(sub) => repo.subs.get(sub),
            None => Some(repo),
        }
    }

    fn repository_mut(&mut self, scope: &RepoScope) -> Option<&mut RepositoryRecord> {
        let repo = self.repositories.get_mut(&scope.repo)?;
        match &scope.sub {
            Some(sub) => repo.subs.get_mut(sub),
            None => Some(repo),
        }
    }

    /// Current state of a slot.
    pub fn get(&self, path: &FieldPath) -> Option<Handle> {
        match path {
            FieldPath::Repository { scope, field } => self.repository(scope)?.get(field).cloned(),
            FieldPath::Shared(field) => match field {
                SharedField::Project => self.project.as_ref().map(ScopeRef::handle),
                _ => self.shared_slot(*field).clone(),
            },
        }
    }

    fn shared_slot(&self, field: SharedField) -> &Option<Handle> {
        match field {
            SharedField::KnowledgeBase => &self.knowledge_base,
            SharedField::KnowledgeBaseWorkRequest => &self.knowledge_base_work_request,
            SharedField::ClusterEnvironment => &self.cluster_environment,
            SharedField::ArtifactRepository => &self.artifact_repository,
            SharedField::ProjectLogWorkRequest => &self.project_log_work_request,
            // Project is a ScopeRef; `get` handles it before reaching here.
            SharedField::Project => &None,
        }
    }

    fn shared_slot_mut(&mut self, field: SharedField) -> Option<&mut Option<Handle>> {
        match field {
            SharedField::KnowledgeBase => Some(&mut self.knowledge_base),
            SharedField::KnowledgeBaseWorkRequest => Some(&mut self.knowledge_base_work_request),
            SharedField::ClusterEnvironment => Some(&mut self.cluster_environment),
            SharedField::ArtifactRepository => Some(&mut self.artifact_repository),
            SharedField::ProjectLogWorkRequest => Some(&mut self.project_log_work_request),
            SharedField::Project => None,
        }
    }

    /// Clear a slot and prune whatever became empty around it.
    /// Returns false when the slot was already clear.
    pub fn clear(&mut self, path: &FieldPath) -> bool {
        match path {
            FieldPath::Shared(SharedField::Project) => self.project.take().is_some(),
            FieldPath::Shared(field) => {
                self.shared_slot_mut(*field).and_then(Option::take).is_some()
            }
            FieldPath::Repository { scope, field } => {
                let changed = self.repository_mut(scope).is_some_and(|repo| repo.clear(field));
                self.prune(scope);
                changed
            }
        }
    }

    /// Mark a live slot as unresolved, leaving it to the tag sweep.
    pub fn downgrade(&mut self, path: &FieldPath) -> bool {
        let slot = match path {
            FieldPath::Shared(SharedField::Project) => {
                return match self.project.as_mut() {
                    Some(project) if !project.ocid.is_empty() => {
                        project.ocid.clear();
                        true
                    }
                    _ => false,
                };
            }
            FieldPath::Shared(field) => self.shared_slot_mut(*field),
            FieldPath::Repository { scope, field } => {
                self.repository_mut(scope).and_then(|repo| repo.slot_mut(field))
            }
        };
        match slot {
            Some(slot) if slot.as_ref().is_some_and(Handle::is_live) => {
                *slot = Some(Handle::Unresolved);
                true
            }
            _ => false,
        }
    }

    fn prune(&mut self, scope: &RepoScope) {
        let Some(repo) = self.repositories.get_mut(&scope.repo) else {
            return;
        };
        if let Some(sub) = &scope.sub {
            if repo.subs.get(sub).is_some_and(RepositoryRecord::is_empty) {
                repo.subs.shift_remove(sub);
            }
        }
        if repo.is_empty() {
            self.repositories.shift_remove(&scope.repo);
        }
    }

    /// Every slot that still needs work, in no particular tier order.
    pub fn pending(&self) -> Vec<FieldPath> {
        let mut paths = Vec::new();
        for scope in self.scopes() {
            let Some(repo) = self.repository(&scope) else { continue };
            let fields = [
                RepoField::CodeRepository,
                RepoField::ConfigMapArtifact,
                RepoField::PodDeletionCommandArtifact,
            ];
            for field in fields {
                if repo.get(&field).is_some() {
                    paths.push(FieldPath::repo(&scope, field));
                }
            }
            for (flavor, build) in &repo.build {
                for part in [
                    BuildPart::Pipeline,
                    BuildPart::BuildStage,
                    BuildPart::ArtifactsStage,
                    BuildPart::Artifact,
                ] {
                    if build.slot(part).is_some() {
                        paths.push(FieldPath::repo(&scope, RepoField::Build(flavor.clone(), part)));
                    }
                }
            }
            for (flavor, deploy) in &repo.deploy {
                for part in [
                    DeployPart::Pipeline,
                    DeployPart::SetupSecretStage,
                    DeployPart::DeployToClusterStage,
                    DeployPart::ApplyConfigStage,
                    DeployPart::ConfigArtifact,
                    DeployPart::ContainerRepository,
                ] {
                    if deploy.slot(part).is_some() {
                        paths.push(FieldPath::repo(&scope, RepoField::Deploy(flavor.clone(), part)));
                    }
                }
            }
        }
        for field in [
            SharedField::KnowledgeBase,
            SharedField::KnowledgeBaseWorkRequest,
            SharedField::ClusterEnvironment,
            SharedField::ArtifactRepository,
            SharedField::ProjectLogWorkRequest,
            SharedField::Project,
        ] {
            if self.get(&FieldPath::Shared(field)).is_some() {
                paths.push(FieldPath::Shared(field));
            }
        }
        paths
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
