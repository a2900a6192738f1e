// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cloud provider client capability.

use async_trait::async_trait;
use dvo_core::{ListFilter, ResourceKind, ResourceSpec, Summary, Target, WorkRequest, WorkRequestId};
use thiserror::Error;

/// Errors from provider calls. All of them are transport-level: a work
/// request that reaches a failed terminal status is not an error here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: String },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("work request {0} not found")]
    UnknownWorkRequest(String),
}

/// Result of a create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    /// The resource exists and this is its identifier.
    Ready(String),
    /// Creation continues provider-side; the work request reports the id.
    Pending(WorkRequestId),
}

/// Adapter for the cloud provider.
///
/// Every call suspends until the provider answers. Deletes return the work
/// request tracking the deletion; callers wait on it through the poller.
#[async_trait]
pub trait CloudProvider: Clone + Send + Sync + 'static {
    async fn create(&self, kind: ResourceKind, spec: ResourceSpec) -> Result<Created, ProviderError>;

    async fn delete(&self, kind: ResourceKind, target: &Target) -> Result<WorkRequestId, ProviderError>;

    /// Delete every resource of `kind` inside `scope` carrying the deploy tag `tag`.
    async fn delete_by_tag(
        &self,
        kind: ResourceKind,
        scope: &str,
        tag: &str,
    ) -> Result<WorkRequestId, ProviderError>;

    async fn list(
        &self,
        kind: ResourceKind,
        scope: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Summary>, ProviderError>;

    async fn work_request_status(&self, id: &WorkRequestId) -> Result<WorkRequest, ProviderError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{CloudProvider, Created, ProviderError};
    use crate::memory::MemoryProvider;
    use async_trait::async_trait;
    use dvo_core::{
        ListFilter, OperationStatus, ResourceKind, ResourceSpec, Summary, Target, WorkRequest,
        WorkRequestId,
    };
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::sync::Arc;

    /// Recorded provider call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ProviderCall {
        Create { kind: ResourceKind, name: String },
        Delete { kind: ResourceKind, id: String },
        DeleteByTag { kind: ResourceKind, scope: String, tag: String },
        List { kind: ResourceKind, scope: String },
        Status { id: String },
    }

    #[derive(Default)]
    struct FakeProviderState {
        calls: Vec<ProviderCall>,
        failing_deletes: HashSet<String>,
        failed_statuses: HashSet<String>,
        failing_sweeps: HashSet<ResourceKind>,
        failing_lists: HashSet<ResourceKind>,
        scripted_statuses: HashMap<String, VecDeque<OperationStatus>>,
        /// Work request id -> resource id of a delete that must terminate as FAILED.
        pending_failures: HashMap<String, String>,
    }

    /// Fake provider for testing: an in-memory inventory plus call recording
    /// and failure injection.
    #[derive(Clone, Default)]
    pub struct FakeProvider {
        inventory: MemoryProvider,
        inner: Arc<Mutex<FakeProviderState>>,
    }

    impl FakeProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// The backing inventory, for seeding and inspection.
        pub fn inventory(&self) -> &MemoryProvider {
            &self.inventory
        }

        /// Get all recorded calls
        pub fn calls(&self) -> Vec<ProviderCall> {
            self.inner.lock().calls.clone()
        }

        /// Ids passed to successful or failed `delete` calls, in order.
        pub fn deleted_ids(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    ProviderCall::Delete { id, .. } => Some(id),
                    _ => None,
                })
                .collect()
        }

        /// Kinds swept by tag, in order.
        pub fn swept_kinds(&self) -> Vec<ResourceKind> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    ProviderCall::DeleteByTag { kind, .. } => Some(kind),
                    _ => None,
                })
                .collect()
        }

        /// Make `delete` of this id fail with a transport error.
        pub fn fail_delete(&self, id: &str) {
            self.inner.lock().failing_deletes.insert(id.to_string());
        }

        /// Accept `delete` of this id but let its work request end as FAILED.
        pub fn fail_delete_status(&self, id: &str) {
            self.inner.lock().failed_statuses.insert(id.to_string());
        }

        /// Make `delete_by_tag` of this kind fail with a transport error.
        pub fn fail_sweep(&self, kind: ResourceKind) {
            self.inner.lock().failing_sweeps.insert(kind);
        }

        /// Make `list` of this kind fail with a transport error.
        pub fn fail_list(&self, kind: ResourceKind) {
            self.inner.lock().failing_lists.insert(kind);
        }

        /// Statuses returned (in order) by queries of this work request before
        /// falling back to the inventory.
        pub fn script_status(&self, id: &str, statuses: Vec<OperationStatus>) {
            self.inner.lock().scripted_statuses.insert(id.to_string(), statuses.into());
        }
    }

    #[async_trait]
    impl CloudProvider for FakeProvider {
        async fn create(
            &self,
            kind: ResourceKind,
            spec: ResourceSpec,
        ) -> Result<Created, ProviderError> {
            self.inner
                .lock()
                .calls
                .push(ProviderCall::Create { kind, name: spec.display_name.clone() });
            self.inventory.create(kind, spec).await
        }

        async fn delete(
            &self,
            kind: ResourceKind,
            target: &Target,
        ) -> Result<WorkRequestId, ProviderError> {
            let (fail, fail_status) = {
                let mut inner = self.inner.lock();
                inner.calls.push(ProviderCall::Delete { kind, id: target.id.clone() });
                (
                    inner.failing_deletes.contains(&target.id),
                    inner.failed_statuses.contains(&target.id),
                )
            };
            if fail {
                return Err(ProviderError::Transport(format!("delete of {} refused", target.id)));
            }
            if fail_status {
                let id = WorkRequestId::new();
                self.inner.lock().pending_failures.insert(id.to_string(), target.id.clone());
                return Ok(id);
            }
            self.inventory.delete(kind, target).await
        }

        async fn delete_by_tag(
            &self,
            kind: ResourceKind,
            scope: &str,
            tag: &str,
        ) -> Result<WorkRequestId, ProviderError> {
            let fail = {
                let mut inner = self.inner.lock();
                inner.calls.push(ProviderCall::DeleteByTag {
                    kind,
                    scope: scope.to_string(),
                    tag: tag.to_string(),
                });
                inner.failing_sweeps.contains(&kind)
            };
            if fail {
                return Err(ProviderError::Transport(format!("sweep of {} refused", kind)));
            }
            self.inventory.delete_by_tag(kind, scope, tag).await
        }

        async fn list(
            &self,
            kind: ResourceKind,
            scope: &str,
            filter: &ListFilter,
        ) -> Result<Vec<Summary>, ProviderError> {
            let fail = {
                let mut inner = self.inner.lock();
                inner.calls.push(ProviderCall::List { kind, scope: scope.to_string() });
                inner.failing_lists.contains(&kind)
            };
            if fail {
                return Err(ProviderError::Transport(format!("listing {} failed", kind)));
            }
            self.inventory.list(kind, scope, filter).await
        }

        async fn work_request_status(
            &self,
            id: &WorkRequestId,
        ) -> Result<WorkRequest, ProviderError> {
            let (scripted, pending_failure) = {
                let mut inner = self.inner.lock();
                inner.calls.push(ProviderCall::Status { id: id.to_string() });
                let scripted = inner
                    .scripted_statuses
                    .get_mut(id.as_str())
                    .and_then(VecDeque::pop_front);
                (scripted, inner.pending_failures.get(id.as_str()).cloned())
            };
            if let Some(resource) = pending_failure {
                return Ok(WorkRequest::new(id.clone(), OperationStatus::Failed)
                    .with_resource(resource));
            }
            match scripted {
                Some(status) => {
                    let mut wr = self
                        .inventory
                        .work_request_status(id)
                        .await
                        .unwrap_or_else(|_| WorkRequest::new(id.clone(), status.clone()));
                    wr.status = status;
                    Ok(wr)
                }
                None => self.inventory.work_request_status(id).await,
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProvider, ProviderCall};

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
