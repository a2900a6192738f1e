// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency-ordered teardown of a progress record.
//!
//! Tiers run in a fixed order (see [`Tier`]). Within a tier each slot is
//! deleted by handle; a failed or unresolved slot stays set and flags its
//! resource kind. A flagged tier ends with a tag sweep of that kind, after
//! which the remaining slots of the tier are cleared. Only a failed sweep,
//! a structural error or a checkpoint error aborts the run; the checkpoint
//! then reflects the last successful mutation.

mod shared;
mod tiers;

pub use tiers::{paths as tier_paths, plan as tier_plan, Tier};

use crate::config::{StageSweep, TeardownConfig};
use crate::error::TeardownError;
use crate::poller::WorkRequestWaiter;
use crate::progress::Progress;
use dvo_adapters::{CloudProvider, LocalArtifacts};
use dvo_core::{BuildPart, FieldPath, Handle, ProgressRecord, RepoField, ResourceKind, Target};
use dvo_storage::{checkpoint_key, CheckpointError, CheckpointStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A local folder whose deployment is being torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFolder {
    pub name: String,
    pub path: PathBuf,
}

impl LocalFolder {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: path.into() }
    }

    /// Folder named after the last component of `path`.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(name, path)
    }

    /// Checkpoint key (and repository name) of this folder.
    pub fn key(&self) -> Result<String, CheckpointError> {
        checkpoint_key(&self.name)
    }
}

/// What one folder's teardown did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub key: String,
    /// False when there was no checkpoint to tear down.
    pub found: bool,
    /// Resources deleted by handle.
    pub deleted: usize,
    /// Kinds swept by tag, in order.
    pub sweeps: Vec<ResourceKind>,
}

/// Drives progress records to empty.
pub struct Teardown<P, S, L> {
    provider: P,
    store: Arc<S>,
    local: L,
    config: TeardownConfig,
    waiter: WorkRequestWaiter<P>,
}

impl<P, S, L> Teardown<P, S, L>
where
    P: CloudProvider,
    S: CheckpointStore,
    L: LocalArtifacts,
{
    pub fn new(provider: P, store: Arc<S>, local: L, config: TeardownConfig) -> Self {
        let waiter = WorkRequestWaiter::new(provider.clone(), config.poll_interval)
            .with_bootstrap(config.bootstrap_interval, config.bootstrap_timeout);
        Self { provider, store, local, config, waiter }
    }

    pub fn config(&self) -> &TeardownConfig {
        &self.config
    }

    /// Tear down each folder in turn; the first fatal error stops the rest.
    pub async fn teardown_folders(
        &self,
        folders: &[LocalFolder],
        progress: &Progress,
    ) -> Result<Vec<TeardownReport>, TeardownError> {
        tracing::info!(count = folders.len(), "tearing down folders");
        let mut reports = Vec::with_capacity(folders.len());
        for folder in folders {
            let key = folder.key()?;
            let report = self.teardown(&key, folders, progress).await?;
            tracing::info!(folder = %folder.path.display(), deleted = report.deleted, "folder torn down");
            reports.push(report);
        }
        Ok(reports)
    }

    /// Tear down the record stored under `key`. Repositories of the record
    /// matching one of `folders` get their local artifacts cleaned.
    pub async fn teardown(
        &self,
        key: &str,
        folders: &[LocalFolder],
        progress: &Progress,
    ) -> Result<TeardownReport, TeardownError> {
        let mut report = TeardownReport { key: key.to_string(), ..Default::default() };
        let Some(record) = self.store.load(key)? else {
            tracing::info!(folder = key, "no checkpoint, nothing to tear down");
            return Ok(report);
        };
        report.found = true;
        if record.is_empty() {
            self.store.clear(key)?;
            return Ok(report);
        }

        let mut run = Run { engine: self, key, record, folders, progress, report };
        run.all_tiers().await?;
        run.finish()?;
        Ok(run.report)
    }

    /// Delete one resource and wait for its work request.
    async fn delete_resource(&self, kind: ResourceKind, target: &Target) -> Result<(), TeardownError> {
        tracing::info!(%kind, target = %target, "deleting");
        let work_request = self.provider.delete(kind, target).await?;
        self.waiter.wait(&work_request).await?;
        Ok(())
    }
}

/// Mutable state of one record's teardown.
struct Run<'a, P, S, L> {
    engine: &'a Teardown<P, S, L>,
    key: &'a str,
    record: ProgressRecord,
    folders: &'a [LocalFolder],
    progress: &'a Progress,
    report: TeardownReport,
}

/// Resource kinds left for a tag sweep, in first-flagged order.
#[derive(Debug, Default)]
struct Flags(Vec<ResourceKind>);

impl Flags {
    fn raise(&mut self, kind: ResourceKind) {
        if !self.0.contains(&kind) {
            self.0.push(kind);
        }
    }

    fn any(&self) -> bool {
        !self.0.is_empty()
    }

    fn has(&self, kind: ResourceKind) -> bool {
        self.0.contains(&kind)
    }
}

impl<P, S, L> Run<'_, P, S, L>
where
    P: CloudProvider,
    S: CheckpointStore,
    L: LocalArtifacts,
{
    async fn all_tiers(&mut self) -> Result<(), TeardownError> {
        let folded = self.engine.config.stage_sweep == StageSweep::Folded;

        let deploy_stages = self.drain(Tier::DeployStages).await?;
        if deploy_stages.any() && !folded {
            self.sweep_tiers(&[Tier::DeployStages], &[ResourceKind::DeployStage]).await?;
        }
        let deploy_pipelines = self.drain(Tier::DeployPipelines).await?;
        if deploy_pipelines.any() || (folded && deploy_stages.any()) {
            self.sweep_tiers(
                &[Tier::DeployStages, Tier::DeployPipelines],
                &[ResourceKind::DeployStage, ResourceKind::DeployPipeline],
            )
            .await?;
        }

        let build_stages = self.drain(Tier::BuildStages).await?;
        if build_stages.any() && !folded {
            self.sweep_tiers(&[Tier::BuildStages], &[ResourceKind::BuildStage]).await?;
        }
        let build_pipelines = self.drain(Tier::BuildPipelines).await?;
        if build_pipelines.any() || (folded && build_stages.any()) {
            self.sweep_tiers(
                &[Tier::BuildStages, Tier::BuildPipelines],
                &[ResourceKind::BuildStage, ResourceKind::BuildPipeline],
            )
            .await?;
        }

        let artifacts = self.drain(Tier::Artifacts).await?;
        let swept: Vec<ResourceKind> = [ResourceKind::DeployArtifact, ResourceKind::ContainerRepository]
            .into_iter()
            .filter(|kind| artifacts.has(*kind))
            .collect();
        if !swept.is_empty() {
            self.sweep_tiers(&[Tier::Artifacts], &swept).await?;
        }

        let repositories: Vec<String> = self.record.repositories.keys().cloned().collect();
        let code_repositories = self.drain(Tier::CodeRepositories).await?;
        self.clean_local(&repositories).await;
        if code_repositories.any() {
            self.sweep_tiers(&[Tier::CodeRepositories], &[ResourceKind::CodeRepository]).await?;
        }

        self.shared().await
    }

    /// Delete every set slot of `tier` by handle.
    async fn drain(&mut self, tier: Tier) -> Result<Flags, TeardownError> {
        let paths = tier_paths(&self.record, tier);
        tracing::info!(folder = self.key, tier = tier.number(), slots = paths.len(), "draining {}", tier);
        let mut flags = Flags::default();
        for path in paths {
            if self.delete_slot(&path).await? {
                flags.raise(path.kind());
                self.downgrade_successor(&path)?;
            }
        }
        Ok(flags)
    }

    /// A build stage cannot go while its artifacts stage may still exist.
    fn downgrade_successor(&mut self, path: &FieldPath) -> Result<(), TeardownError> {
        let FieldPath::Repository { scope, field: RepoField::Build(flavor, BuildPart::ArtifactsStage) } =
            path
        else {
            return Ok(());
        };
        let build_stage = FieldPath::repo(scope, RepoField::Build(flavor.clone(), BuildPart::BuildStage));
        if self.record.downgrade(&build_stage) {
            tracing::info!(folder = self.key, slot = %build_stage, "left to the tag sweep");
            self.persist()?;
        }
        Ok(())
    }

    /// Delete the resource in `path` by handle. Returns true when the slot is
    /// left for the tag sweep.
    async fn delete_slot(&mut self, path: &FieldPath) -> Result<bool, TeardownError> {
        let Some(handle) = self.record.get(path) else {
            return Ok(false);
        };
        let Handle::Live(id) = handle else {
            tracing::debug!(folder = self.key, slot = %path, "unresolved handle");
            return Ok(true);
        };
        let kind = path.kind();
        let Some(target) = self.target(kind, &id) else {
            tracing::warn!(folder = self.key, slot = %path, "no scope to delete in");
            return Ok(true);
        };
        self.progress.step(self.message(path));
        match self.engine.delete_resource(kind, &target).await {
            Ok(()) => {
                self.record.clear(path);
                self.persist()?;
                self.report.deleted += 1;
                Ok(false)
            }
            Err(e) if e.is_transient() => {
                tracing::warn!(folder = self.key, slot = %path, error = %e, "delete failed, left to the tag sweep");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    fn target(&self, kind: ResourceKind, id: &str) -> Option<Target> {
        match kind {
            ResourceKind::Log => self.record.log_group.as_ref().map(|group| Target::scoped(id, group.clone())),
            _ => Some(Target::new(id)),
        }
    }

    fn message(&self, path: &FieldPath) -> String {
        match path {
            FieldPath::Repository { .. } => format!("Deleting {}...", path),
            FieldPath::Shared(field) => match self.record.project_label() {
                "" => format!("Deleting {}...", field),
                project => format!("Deleting {} for {}...", field, project),
            },
        }
    }

    /// Sweep each kind by tag, then clear every slot of `tiers` still set.
    async fn sweep_tiers(&mut self, tiers: &[Tier], kinds: &[ResourceKind]) -> Result<(), TeardownError> {
        for kind in kinds {
            let scope = self.compartment_scope(*kind)?;
            self.sweep(*kind, &scope).await?;
        }
        let leftover: Vec<FieldPath> =
            tiers.iter().flat_map(|tier| tier_paths(&self.record, *tier)).collect();
        self.clear_swept(&leftover)
    }

    fn compartment_scope(&self, kind: ResourceKind) -> Result<String, TeardownError> {
        self.record
            .compartment_id()
            .map(str::to_string)
            .ok_or_else(|| TeardownError::sweep(kind, TeardownError::MissingScope("compartment")))
    }

    /// One tag-scoped bulk delete. Any failure is fatal.
    async fn sweep(&mut self, kind: ResourceKind, scope: &str) -> Result<(), TeardownError> {
        let Some(tag) = self.record.tag.clone() else {
            return Err(TeardownError::sweep(kind, TeardownError::MissingScope("deploy tag")));
        };
        self.progress.step(format!("Deleting {}s by deploy tag...", kind.noun()));
        tracing::info!(folder = self.key, %kind, scope, tag = %tag, "sweeping by tag");
        let swept = async {
            let work_request = self.engine.provider.delete_by_tag(kind, scope, &tag).await?;
            self.engine.waiter.wait(&work_request).await
        }
        .await;
        if let Err(e) = swept {
            tracing::error!(folder = self.key, %kind, error = %e, "tag sweep failed");
            return Err(TeardownError::sweep(kind, e));
        }
        self.report.sweeps.push(kind);
        Ok(())
    }

    fn clear_swept(&mut self, paths: &[FieldPath]) -> Result<(), TeardownError> {
        let mut changed = false;
        for path in paths {
            changed |= self.record.clear(path);
        }
        if changed {
            self.persist()?;
        }
        Ok(())
    }

    async fn clean_local(&self, repositories: &[String]) {
        for repository in repositories {
            let folder = self
                .folders
                .iter()
                .find(|f| f.key().is_ok_and(|key| &key == repository));
            if let Some(folder) = folder {
                self.progress.step(format!("Deleting local resources of {}...", folder.name));
                self.engine.local.clean(&folder.path).await;
            }
        }
    }

    fn persist(&self) -> Result<(), TeardownError> {
        self.engine.store.save(self.key, &self.record)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), TeardownError> {
        if self.record.is_empty() {
            self.engine.store.clear(self.key)?;
            tracing::info!(folder = self.key, deleted = self.report.deleted, "checkpoint cleared");
        } else {
            tracing::warn!(folder = self.key, pending = self.record.pending().len(), "record not empty after teardown");
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "teardown_tests/mod.rs"]
mod tests;
