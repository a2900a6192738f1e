// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types

use dvo_adapters::ProviderError;
use dvo_core::{OperationStatus, ResourceKind, WorkRequestId};
use dvo_storage::CheckpointError;
use std::time::Duration;
use thiserror::Error;

/// Errors from the bootstrap poll loop.
#[derive(Debug, Error)]
pub enum PollError<E> {
    #[error("no terminal status after {polls} polls ({ceiling:?})")]
    Timeout { polls: u32, ceiling: Duration },
    #[error("status query failed: {0}")]
    Status(#[source] E),
}

/// A pipeline whose stages cannot be ordered for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("inconsistent pipeline structure: stage {stage} of {pipeline} references unknown stage {predecessor}")]
    DanglingPredecessor { pipeline: String, stage: String, predecessor: String },
    #[error("inconsistent pipeline structure: stages {} of {pipeline} depend on each other", .stages.join(", "))]
    Cycle { pipeline: String, stages: Vec<String> },
}

/// Errors raised while deleting resources.
///
/// `Provider`, `TerminalStatus` and `Timeout` are absorbed per item during a
/// full teardown (they flag the tier for a tag sweep). The rest are fatal.
#[derive(Debug, Error)]
pub enum TeardownError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("work request {id} ended with status {status}")]
    TerminalStatus { id: WorkRequestId, status: OperationStatus },
    #[error("work request {id} did not finish within {ceiling:?}")]
    Timeout { id: WorkRequestId, ceiling: Duration },
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error("failed to delete {}s by deploy tag: {source}", .kind.noun())]
    Sweep {
        kind: ResourceKind,
        #[source]
        source: Box<TeardownError>,
    },
    #[error("record has no {0}")]
    MissingScope(&'static str),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error("code repository {repository} not found in project {project}, or not created by a deployment")]
    RepositoryNotFound { repository: String, project: String },
}

impl TeardownError {
    pub fn sweep(kind: ResourceKind, source: TeardownError) -> Self {
        TeardownError::Sweep { kind, source: Box::new(source) }
    }

    /// Whether a per-item teardown step may absorb this error.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TeardownError::Provider(_)
                | TeardownError::TerminalStatus { .. }
                | TeardownError::Timeout { .. }
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
