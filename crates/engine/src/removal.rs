// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Removal of one repository from a project that stays deployed.
//!
//! Resources are discovered by listing instead of read from a progress
//! record, so there is nothing to fall back to: every failure is fatal.

use crate::config::TeardownConfig;
use crate::error::TeardownError;
use crate::poller::WorkRequestWaiter;
use crate::progress::Progress;
use crate::stage_order::deletion_order;
use crate::teardown::LocalFolder;
use dvo_adapters::{CloudProvider, LocalArtifacts};
use dvo_core::{
    ListFilter, ResourceKind, ScopeRef, Summary, Target, AUDIT_USAGE, BUILD_PIPELINE_TAG_KEY,
    CODE_REPOSITORY_TAG_KEY, DEPLOY_TAG_KEY, PROJECT_RESOURCES_TAG_KEY, PROJECT_TAG_KEY,
    REPOSITORY_RESOURCES_TAG_KEY, USAGE_TAG_KEY,
};

/// What to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalRequest {
    pub compartment: String,
    pub project: ScopeRef,
    pub folder: LocalFolder,
    /// Cloud-specific sub-projects of the folder's build.
    pub subs: Vec<String>,
}

impl RemovalRequest {
    pub fn new(compartment: impl Into<String>, project: ScopeRef, folder: LocalFolder) -> Self {
        Self { compartment: compartment.into(), project, folder, subs: Vec::new() }
    }

    dvo_core::setters! {
        set {
            subs: Vec<String>,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub repository: String,
    /// The repository was the project's last one; the project went with it.
    pub project_removed: bool,
    /// Every deleted resource, in order.
    pub deleted: Vec<(ResourceKind, String)>,
}

/// Deploy artifacts generated for `repository`, by display name.
pub fn generated_artifact_names(repository: &str, subs: &[String]) -> Vec<String> {
    let mut names: Vec<String> = [
        "dev_fatjar",
        "dev_executable",
        "oke_deploy_ni_configuration",
        "oke_deploy_jvm_configuration",
        "oke_configmap",
        "oke_deploy_docker_secret_setup_command",
    ]
    .iter()
    .map(|suffix| format!("{}_{}", repository, suffix))
    .collect();
    if subs.is_empty() {
        names.push(format!("{}_native_docker_image", repository));
        names.push(format!("{}_jvm_docker_image", repository));
    }
    for sub in subs {
        names.push(format!("{}_{}_native_docker_image", repository, sub));
        names.push(format!("{}_{}_jvm_docker_image", repository, sub));
    }
    names
}

/// Container repositories holding the images of `repository`. The project's
/// own image repositories are included when `is_last`.
pub fn container_repository_names(project: &str, repository: &str, subs: &[String], is_last: bool) -> Vec<String> {
    let mut bases = Vec::new();
    if subs.is_empty() {
        bases.push(format!("{}-{}", project, repository));
        if is_last {
            bases.push(project.to_string());
        }
    }
    for sub in subs {
        bases.push(format!("{}-{}-{}", project, repository, sub));
        if is_last {
            bases.push(format!("{}-{}", project, sub));
        }
    }
    bases
        .into_iter()
        .flat_map(|base| [base.to_lowercase(), format!("{}-jvm", base).to_lowercase()])
        .collect()
}

/// Removes single repositories by listing what they left behind.
pub struct Removal<P, L> {
    provider: P,
    local: L,
    waiter: WorkRequestWaiter<P>,
}

impl<P, L> Removal<P, L>
where
    P: CloudProvider,
    L: LocalArtifacts,
{
    pub fn new(provider: P, local: L, config: &TeardownConfig) -> Self {
        let waiter = WorkRequestWaiter::new(provider.clone(), config.poll_interval);
        Self { provider, local, waiter }
    }

    pub async fn remove(
        &self,
        request: &RemovalRequest,
        progress: &Progress,
    ) -> Result<RemovalReport, TeardownError> {
        let repository = request.folder.key()?;
        tracing::info!(
            folder = %request.folder.path.display(),
            project = request.project.label(),
            "removing repository"
        );
        let mut run = RemovalRun {
            removal: self,
            request,
            progress,
            report: RemovalReport { repository: repository.clone(), ..Default::default() },
        };

        let (code_repository, is_last) = run.resolve(&repository).await?;
        let build_pipelines = run.build_pipelines(&code_repository).await?;
        run.deploy_pipelines(&build_pipelines).await?;
        run.artifacts(&repository, &code_repository, is_last).await?;
        run.container_repositories(&repository, is_last).await?;

        run.delete(
            ResourceKind::CodeRepository,
            Target::new(code_repository.clone()),
            format!("Deleting code repository {}...", repository),
        )
        .await?;
        progress.step(format!("Deleting local resources of {}...", request.folder.name));
        self.local.clean(&request.folder.path).await;

        if is_last {
            run.project_resources().await?;
            run.report.project_removed = true;
        }
        tracing::info!(repository, deleted = run.report.deleted.len(), "repository removed");
        Ok(run.report)
    }
}

struct RemovalRun<'a, P, L> {
    removal: &'a Removal<P, L>,
    request: &'a RemovalRequest,
    progress: &'a Progress,
    report: RemovalReport,
}

impl<P, L> RemovalRun<'_, P, L>
where
    P: CloudProvider,
    L: LocalArtifacts,
{
    fn project_id(&self) -> &str {
        &self.request.project.ocid
    }

    async fn list(&self, kind: ResourceKind, scope: &str, filter: ListFilter) -> Result<Vec<Summary>, TeardownError> {
        Ok(self.removal.provider.list(kind, scope, &filter).await?)
    }

    async fn delete(&mut self, kind: ResourceKind, target: Target, message: String) -> Result<(), TeardownError> {
        self.progress.step(message);
        tracing::info!(%kind, target = %target, "deleting");
        let work_request = self.removal.provider.delete(kind, &target).await?;
        self.removal.waiter.wait(&work_request).await?;
        self.report.deleted.push((kind, target.id));
        Ok(())
    }

    /// The code repository created for this folder, and whether it is the
    /// project's only one.
    async fn resolve(&self, repository: &str) -> Result<(String, bool), TeardownError> {
        let repositories =
            self.list(ResourceKind::CodeRepository, self.project_id(), ListFilter::default()).await?;
        let is_last = repositories.len() == 1;
        repositories
            .into_iter()
            .find(|r| r.display_name == repository && r.tags.contains_key(DEPLOY_TAG_KEY))
            .map(|r| (r.id, is_last))
            .ok_or_else(|| TeardownError::RepositoryNotFound {
                repository: repository.to_string(),
                project: self.request.project.label().to_string(),
            })
    }

    async fn build_pipelines(&mut self, code_repository: &str) -> Result<Vec<String>, TeardownError> {
        self.progress.step("Listing build pipelines");
        let pipelines = self
            .list(
                ResourceKind::BuildPipeline,
                self.project_id(),
                ListFilter::tagged(CODE_REPOSITORY_TAG_KEY, code_repository),
            )
            .await?;
        for pipeline in &pipelines {
            self.pipeline(ResourceKind::BuildPipeline, ResourceKind::BuildStage, pipeline).await?;
        }
        Ok(pipelines.into_iter().map(|p| p.id).collect())
    }

    async fn deploy_pipelines(&mut self, build_pipelines: &[String]) -> Result<(), TeardownError> {
        self.progress.step("Listing deployment pipelines");
        let pipelines = self
            .list(
                ResourceKind::DeployPipeline,
                self.project_id(),
                ListFilter::with_tag_key(BUILD_PIPELINE_TAG_KEY),
            )
            .await?;
        for pipeline in pipelines {
            let deploys_removed_build = pipeline
                .tag(BUILD_PIPELINE_TAG_KEY)
                .is_some_and(|id| build_pipelines.iter().any(|b| b == id));
            if deploys_removed_build {
                self.pipeline(ResourceKind::DeployPipeline, ResourceKind::DeployStage, &pipeline).await?;
            }
        }
        Ok(())
    }

    /// Stages leaf-first, then the pipeline itself.
    async fn pipeline(
        &mut self,
        kind: ResourceKind,
        stage_kind: ResourceKind,
        pipeline: &Summary,
    ) -> Result<(), TeardownError> {
        self.progress.step(format!("Processing pipeline {}", pipeline.display_name));
        let stages = self.list(stage_kind, &pipeline.id, ListFilter::default()).await?;
        let ordered: Vec<(String, String)> = deletion_order(&pipeline.id, &stages)?
            .into_iter()
            .map(|s| (s.id.clone(), s.display_name.clone()))
            .collect();
        for (id, name) in ordered {
            self.delete(stage_kind, Target::new(id), format!("Deleting stage {}", name)).await?;
        }
        self.delete(
            kind,
            Target::new(pipeline.id.clone()),
            format!("Deleting pipeline {}", pipeline.display_name),
        )
        .await
    }

    async fn artifacts(&mut self, repository: &str, code_repository: &str, is_last: bool) -> Result<(), TeardownError> {
        self.progress.step("Listing deploy artifacts");
        let names = generated_artifact_names(repository, &self.request.subs);
        let artifacts = self.list(ResourceKind::DeployArtifact, self.project_id(), ListFilter::default()).await?;
        for artifact in artifacts {
            let message = if names.contains(&artifact.display_name) {
                format!("Deleting artifact {}", artifact.display_name)
            } else if artifact.tags.contains_key(REPOSITORY_RESOURCES_TAG_KEY)
                && artifact.has_tag(CODE_REPOSITORY_TAG_KEY, code_repository)
            {
                format!("Deleting list of generated code repository resources {}", artifact.display_name)
            } else if is_last && artifact.tags.contains_key(PROJECT_RESOURCES_TAG_KEY) {
                format!("Deleting list of generated project resources {}", artifact.display_name)
            } else {
                continue;
            };
            self.delete(ResourceKind::DeployArtifact, Target::new(artifact.id), message).await?;
        }
        Ok(())
    }

    async fn container_repositories(&mut self, repository: &str, is_last: bool) -> Result<(), TeardownError> {
        self.progress.step("Searching container repositories");
        let names = container_repository_names(
            &self.request.project.name,
            repository,
            &self.request.subs,
            is_last,
        );
        let compartment = self.request.compartment.clone();
        let found = self.list(ResourceKind::ContainerRepository, &compartment, ListFilter::default()).await?;
        for repo in found.into_iter().filter(|r| names.contains(&r.display_name)) {
            let message = format!("Deleting container repository {}", repo.display_name);
            self.delete(ResourceKind::ContainerRepository, Target::new(repo.id), message).await?;
        }
        Ok(())
    }

    /// Everything the project owns once its last repository is gone.
    async fn project_resources(&mut self) -> Result<(), TeardownError> {
        let compartment = self.request.compartment.clone();
        let project = self.project_id().to_string();
        let owned = ListFilter::tagged(PROJECT_TAG_KEY, project.clone());

        self.progress.step("Listing project logs");
        for log in self.list(ResourceKind::Log, &compartment, owned.clone()).await? {
            let message = format!("Deleting log {}", log.display_name);
            self.delete(ResourceKind::Log, Target::scoped(log.id, log.scope), message).await?;
        }

        self.progress.step("Searching artifact repositories");
        for repo in self.list(ResourceKind::ArtifactRepository, &compartment, owned.clone()).await? {
            let message = format!("Deleting artifact repository {}", repo.display_name);
            self.delete(ResourceKind::ArtifactRepository, Target::new(repo.id), message).await?;
        }

        self.progress.step("Searching cluster environments");
        for env in self.list(ResourceKind::DeployEnvironment, &project, ListFilter::default()).await? {
            let message = format!("Deleting cluster environment {}", env.display_name);
            self.delete(ResourceKind::DeployEnvironment, Target::new(env.id), message).await?;
        }

        self.progress.step("Searching knowledge bases");
        let audit_bases = ListFilter::tagged(USAGE_TAG_KEY, AUDIT_USAGE);
        for kb in self.list(ResourceKind::KnowledgeBase, &compartment, audit_bases).await? {
            if !owned.matches(&kb) {
                continue;
            }
            self.progress.step("Deleting vulnerability audits");
            for audit in self.list(ResourceKind::VulnerabilityAudit, &kb.id, ListFilter::default()).await? {
                let message = format!("Deleting vulnerability audit {}", audit.display_name);
                self.delete(ResourceKind::VulnerabilityAudit, Target::new(audit.id), message).await?;
            }
            let message = format!("Deleting knowledge base {}", kb.display_name);
            self.delete(ResourceKind::KnowledgeBase, Target::new(kb.id), message).await?;
        }

        let message = format!("Deleting devops project {}", self.request.project.label());
        self.delete(ResourceKind::Project, Target::new(project), message).await
    }
}

#[cfg(test)]
#[path = "removal_tests.rs"]
mod tests;
