// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tier 7: project-level resources. Each item has its own tag sweep.

use super::Run;
use crate::error::TeardownError;
use dvo_adapters::{CloudProvider, LocalArtifacts};
use dvo_core::{FieldPath, Handle, ListFilter, ResourceKind, SharedField, Target, WorkRequestId};
use dvo_storage::CheckpointStore;

/// Kinds swept before the project when remnant sweeping is on.
const REMNANT_KINDS: [ResourceKind; 4] = [
    ResourceKind::DeployStage,
    ResourceKind::DeployPipeline,
    ResourceKind::BuildStage,
    ResourceKind::BuildPipeline,
];

impl<P, S, L> Run<'_, P, S, L>
where
    P: CloudProvider,
    S: CheckpointStore,
    L: LocalArtifacts,
{
    pub(super) async fn shared(&mut self) -> Result<(), TeardownError> {
        tracing::info!(folder = self.key, tier = 7, "draining project resources");
        self.knowledge_base().await?;
        self.shared_slot(SharedField::ClusterEnvironment).await?;
        self.shared_slot(SharedField::ArtifactRepository).await?;
        self.project_log().await?;
        self.remnants().await?;
        self.shared_slot(SharedField::Project).await
    }

    /// Delete a shared slot by handle, sweeping its kind when that fails.
    async fn shared_slot(&mut self, field: SharedField) -> Result<(), TeardownError> {
        let path = FieldPath::Shared(field);
        if self.delete_slot(&path).await? {
            self.sweep_shared(field.kind(), &[field]).await?;
        }
        Ok(())
    }

    async fn sweep_shared(&mut self, kind: ResourceKind, fields: &[SharedField]) -> Result<(), TeardownError> {
        let scope = match kind {
            ResourceKind::Log => match self.record.log_group.clone() {
                Some(group) => group,
                None => self.compartment_scope(kind)?,
            },
            _ => self.compartment_scope(kind)?,
        };
        self.sweep(kind, &scope).await?;
        let paths: Vec<FieldPath> = fields.iter().map(|f| FieldPath::Shared(*f)).collect();
        self.clear_swept(&paths)
    }

    /// The knowledge base handle, or the one its creation work request reports.
    async fn knowledge_base(&mut self) -> Result<(), TeardownError> {
        let fields = [SharedField::KnowledgeBase, SharedField::KnowledgeBaseWorkRequest];
        let handle = self.record.knowledge_base.clone();
        let work_request = self.record.knowledge_base_work_request.clone();
        if handle.is_none() && work_request.is_none() {
            return Ok(());
        }
        let resolved = match (handle, work_request) {
            (Some(Handle::Live(id)), _) => Some(id),
            (_, Some(Handle::Live(wr))) => self.resolve(&wr, "knowledge base").await,
            _ => None,
        };
        let Some(id) = resolved else {
            return self.sweep_shared(ResourceKind::KnowledgeBase, &fields).await;
        };

        self.progress.step(format!("Deleting knowledge base for {}...", self.record.project_label()));
        match self.delete_knowledge_base(&id).await {
            Ok(()) => {
                self.report.deleted += 1;
                self.clear_swept(&fields.map(FieldPath::Shared))
            }
            Err(e) if e.is_transient() => {
                tracing::warn!(folder = self.key, knowledge_base = %id, error = %e, "delete failed, left to the tag sweep");
                self.sweep_shared(ResourceKind::KnowledgeBase, &fields).await
            }
            Err(e) => Err(e),
        }
    }

    /// Audits go first; a knowledge base with audits cannot be deleted.
    async fn delete_knowledge_base(&self, id: &str) -> Result<(), TeardownError> {
        let audits = self
            .engine
            .provider
            .list(ResourceKind::VulnerabilityAudit, id, &ListFilter::default())
            .await?;
        for audit in audits {
            self.engine.delete_resource(ResourceKind::VulnerabilityAudit, &Target::new(audit.id)).await?;
        }
        self.engine.delete_resource(ResourceKind::KnowledgeBase, &Target::new(id)).await
    }

    /// The project log is only known through its creation work request.
    async fn project_log(&mut self) -> Result<(), TeardownError> {
        let fields = [SharedField::ProjectLogWorkRequest];
        let Some(work_request) = self.record.project_log_work_request.clone() else {
            return Ok(());
        };
        let Handle::Live(wr) = work_request else {
            return self.sweep_shared(ResourceKind::Log, &fields).await;
        };
        let Some(log) = self.resolve(&wr, "project log").await else {
            return self.sweep_shared(ResourceKind::Log, &fields).await;
        };
        let Some(target) = self.target(ResourceKind::Log, &log) else {
            tracing::warn!(folder = self.key, log = %log, "no log group recorded");
            return self.sweep_shared(ResourceKind::Log, &fields).await;
        };

        self.progress.step(format!("Deleting project log for {}...", self.record.project_label()));
        match self.engine.delete_resource(ResourceKind::Log, &target).await {
            Ok(()) => {
                self.report.deleted += 1;
                self.clear_swept(&fields.map(FieldPath::Shared))
            }
            Err(e) if e.is_transient() => {
                tracing::warn!(folder = self.key, log = %log, error = %e, "delete failed, left to the tag sweep");
                self.sweep_shared(ResourceKind::Log, &fields).await
            }
            Err(e) => Err(e),
        }
    }

    /// Id of the resource created by `work_request`, if it can be found.
    async fn resolve(&self, work_request: &str, what: &str) -> Option<String> {
        let id = WorkRequestId::from_string(work_request);
        match self.engine.waiter.resolve_resource(&id).await {
            Ok(Some(resource)) => Some(resource),
            Ok(None) => {
                tracing::warn!(folder = self.key, work_request, "{} work request reports no resource", what);
                None
            }
            Err(e) => {
                tracing::warn!(folder = self.key, work_request, error = %e, "cannot resolve {}", what);
                None
            }
        }
    }

    /// Stage and pipeline remnants the record lost track of.
    async fn remnants(&mut self) -> Result<(), TeardownError> {
        if !self.engine.config.remnant_sweep
            || self.record.tag.is_none()
            || self.record.compartment_id().is_none()
        {
            return Ok(());
        }
        for kind in REMNANT_KINDS {
            let scope = self.compartment_scope(kind)?;
            self.sweep(kind, &scope).await?;
        }
        Ok(())
    }
}
