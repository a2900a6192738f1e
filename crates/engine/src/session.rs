// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator session: the collaborators of one workspace, the gate
//! admitting one operation at a time, and the resource tree.

use crate::config::TeardownConfig;
use crate::error::TeardownError;
use crate::gate::{GateError, OperationGate};
use crate::progress::Progress;
use crate::removal::{Removal, RemovalReport, RemovalRequest};
use crate::teardown::{LocalFolder, Teardown, TeardownReport};
use dvo_adapters::{CloudProvider, Completion, LocalArtifacts, NotifyAdapter, Operation};
use dvo_core::{Outcome, ScopeRef};
use dvo_storage::CheckpointStore;
use dvo_tree::{ListingFetcher, NodeId, Tree, TreeError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Busy(#[from] GateError),
    #[error(transparent)]
    Teardown(#[from] TeardownError),
}

/// Session adapter dependencies
pub struct SessionDeps<P, S, L, N> {
    pub provider: P,
    pub store: Arc<S>,
    pub local: L,
    pub notifier: N,
}

/// Everything one workspace needs to tear down, remove and browse
/// resources. Built explicitly by the caller and dropped with it.
pub struct Session<P, S, L, N> {
    provider: P,
    notifier: N,
    teardown: Teardown<P, S, L>,
    removal: Removal<P, L>,
    tree: Tree,
    gate: OperationGate,
}

impl<P, S, L, N> Session<P, S, L, N>
where
    P: CloudProvider,
    S: CheckpointStore,
    L: LocalArtifacts,
    N: NotifyAdapter,
{
    pub fn new(deps: SessionDeps<P, S, L, N>, config: TeardownConfig) -> Self {
        let SessionDeps { provider, store, local, notifier } = deps;
        let removal = Removal::new(provider.clone(), local.clone(), &config);
        let teardown = Teardown::new(provider.clone(), store, local, config);
        Self { provider, notifier, teardown, removal, tree: Tree::new(), gate: OperationGate::new() }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn gate(&self) -> &OperationGate {
        &self.gate
    }

    pub fn config(&self) -> &TeardownConfig {
        self.teardown.config()
    }

    /// Add a project to the tree; its resources are listed on expansion.
    pub fn browse(&self, compartment: impl Into<String>, project: ScopeRef) -> NodeId {
        self.tree
            .insert_root(ListingFetcher::project(self.provider.clone(), compartment, project))
    }

    /// Tear down every folder's checkpointed resources.
    pub async fn teardown(
        &self,
        folders: &[LocalFolder],
        progress: &Progress,
    ) -> Result<Vec<TeardownReport>, SessionError> {
        let _guard = self.gate.enter("teardown")?;
        if folders.is_empty() {
            progress.step("No folders to undeploy.");
            progress.finish(Outcome::Succeeded);
            return Ok(Vec::new());
        }

        let result = self.teardown.teardown_folders(folders, progress).await;
        let names = folder_names(folders);
        let completion = match &result {
            Ok(reports) => {
                let deleted: usize = reports.iter().map(|report| report.deleted).sum();
                let summary = format!("{names} undeployed, {deleted} resources deleted");
                Completion::succeeded(Operation::Teardown, names, summary)
            }
            Err(e) => Completion::failed(Operation::Teardown, names, e.to_string()),
        };
        self.finish(completion, progress).await;
        Ok(result?)
    }

    /// Remove one repository's resources, and the project with its last one.
    pub async fn remove_repository(
        &self,
        request: &RemovalRequest,
        progress: &Progress,
    ) -> Result<RemovalReport, SessionError> {
        let _guard = self.gate.enter("remove-repository")?;
        let result = self.removal.remove(request, progress).await;
        let completion = match &result {
            Ok(report) => {
                let summary = if report.project_removed {
                    format!("Repository {} and its project removed", report.repository)
                } else {
                    format!("Repository {} removed", report.repository)
                };
                Completion::succeeded(Operation::Removal, report.repository.clone(), summary)
            }
            Err(e) => Completion::failed(Operation::Removal, request.folder.name.clone(), e.to_string()),
        };
        self.finish(completion, progress).await;
        Ok(result?)
    }

    /// Discard the tree. Pending fetches land nowhere.
    pub fn close(&self) {
        tracing::debug!(roots = self.tree.roots().len(), "closing session");
        self.tree.clear();
    }

    async fn finish(&self, completion: Completion, progress: &Progress) {
        match &completion.outcome {
            Outcome::Succeeded => tracing::info!(
                operation = %completion.operation,
                summary = completion.summary(),
                "operation finished"
            ),
            Outcome::Failed { message } => {
                tracing::error!(operation = %completion.operation, error = %message, "operation failed")
            }
        }
        progress.finish(completion.outcome.clone());
        if let Err(e) = self.notifier.notify(&completion).await {
            tracing::warn!(error = %e, "completion notification failed");
        }
        self.refresh_tree();
    }

    /// Resources changed underneath the tree; refetch what was listed.
    fn refresh_tree(&self) {
        for root in self.tree.roots() {
            match self.tree.reload(root) {
                Ok(()) | Err(TreeError::Unsupported { .. }) => {}
                Err(e) => tracing::debug!(error = %e, "tree refresh skipped a root"),
            }
        }
    }
}

fn folder_names(folders: &[LocalFolder]) -> String {
    folders.iter().map(|folder| folder.name.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
