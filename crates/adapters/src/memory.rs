// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory inventory provider.
//!
//! Behaves like a small provider: resources live in scopes, a resource with
//! live children (or a stage still named as a predecessor) refuses deletion
//! with a conflict, and every mutation is tracked by a work request. The
//! inventory can be loaded from and saved to a JSON file.

use crate::provider::{CloudProvider, Created, ProviderError};
use async_trait::async_trait;
use dvo_core::{
    Lifecycle, ListFilter, OperationStatus, ResourceKind, ResourceSpec, Summary, Target,
    WorkRequest, WorkRequestId, DEPLOY_TAG_KEY,
};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Scope chains deeper than this are treated as broken.
const MAX_SCOPE_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid inventory: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of the inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub resources: Vec<Summary>,
    #[serde(default)]
    pub work_requests: Vec<WorkRequest>,
}

struct TrackedRequest {
    request: WorkRequest,
    remaining_polls: u32,
    /// Deletions are only polled by the run that issued them.
    deletion: bool,
}

impl TrackedRequest {
    fn recorded(request: WorkRequest) -> Self {
        Self { request, remaining_polls: 0, deletion: false }
    }
}

#[derive(Default)]
struct MemoryState {
    resources: IndexMap<String, Summary>,
    work_requests: IndexMap<String, TrackedRequest>,
    next_id: u64,
    latency: u32,
}

impl MemoryState {
    fn within(&self, summary: &Summary, scope: &str) -> bool {
        let mut current = summary.scope.as_str();
        for _ in 0..MAX_SCOPE_DEPTH {
            if current == scope {
                return true;
            }
            match self.resources.get(current) {
                Some(parent) => current = parent.scope.as_str(),
                None => return false,
            }
        }
        false
    }

    fn live(&self) -> impl Iterator<Item = &Summary> {
        self.resources.values().filter(|s| !s.lifecycle.is_gone())
    }

    /// Live resources that would be orphaned by deleting `id`, ignoring `leaving`.
    fn dependents(&self, id: &str, leaving: &HashSet<String>) -> Vec<String> {
        self.live()
            .filter(|s| !leaving.contains(&s.id) && s.id != id)
            .filter(|s| s.scope == id || (s.kind.is_stage() && s.predecessors.iter().any(|p| p == id)))
            .map(|s| s.id.clone())
            .collect()
    }

    fn track(&mut self, resources: Vec<String>, deletion: bool) -> WorkRequestId {
        let id = WorkRequestId::new();
        let request = WorkRequest { id: id.clone(), status: OperationStatus::Succeeded, resources };
        let remaining_polls = self.latency;
        self.work_requests.insert(id.to_string(), TrackedRequest { request, remaining_polls, deletion });
        id
    }

    /// Creation requests whose resources still exist; a later run may
    /// resolve a handle through them.
    fn worth_keeping(&self, tracked: &TrackedRequest) -> bool {
        !tracked.deletion && tracked.request.resources.iter().any(|id| self.resources.contains_key(id))
    }
}

/// Provider backed by an in-memory inventory.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_inventory(inventory: Inventory) -> Self {
        let provider = Self::new();
        {
            let mut inner = provider.inner.lock();
            for summary in inventory.resources {
                inner.resources.insert(summary.id.clone(), summary);
            }
            for request in inventory.work_requests {
                inner.work_requests.insert(request.id.to_string(), TrackedRequest::recorded(request));
            }
        }
        provider
    }

    /// Load an inventory file; a missing file is an empty inventory.
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Self::from_inventory(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the inventory atomically.
    pub fn save(&self, path: &Path) -> Result<(), InventoryError> {
        let json = serde_json::to_vec_pretty(&self.snapshot())?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Resources, plus the creation requests of those still present.
    pub fn snapshot(&self) -> Inventory {
        let inner = self.inner.lock();
        Inventory {
            resources: inner.resources.values().cloned().collect(),
            work_requests: inner
                .work_requests
                .values()
                .filter(|tracked| inner.worth_keeping(tracked))
                .map(|tracked| tracked.request.clone())
                .collect(),
        }
    }

    /// Work requests created from now on report `IN_PROGRESS` for `polls` queries.
    pub fn with_latency(self, polls: u32) -> Self {
        self.inner.lock().latency = polls;
        self
    }

    /// Add (or replace) a resource directly.
    pub fn insert(&self, summary: Summary) {
        self.inner.lock().resources.insert(summary.id.clone(), summary);
    }

    /// Register a work request directly (e.g. one recorded by an earlier run).
    pub fn insert_work_request(&self, request: WorkRequest) {
        self.inner.lock().work_requests.insert(request.id.to_string(), TrackedRequest::recorded(request));
    }

    pub fn get(&self, id: &str) -> Option<Summary> {
        self.inner.lock().resources.get(id).filter(|s| !s.lifecycle.is_gone()).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Ids of every live resource, in insertion order.
    pub fn live_ids(&self) -> Vec<String> {
        self.inner.lock().live().map(|s| s.id.clone()).collect()
    }
}

#[async_trait]
impl CloudProvider for MemoryProvider {
    async fn create(&self, kind: ResourceKind, spec: ResourceSpec) -> Result<Created, ProviderError> {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = format!("ocid1.{}.{}", kind, inner.next_id);
        let summary = Summary {
            id: id.clone(),
            kind,
            scope: spec.scope,
            display_name: spec.display_name,
            tags: spec.tags,
            predecessors: spec.predecessors,
            lifecycle: Lifecycle::Active,
        };
        tracing::debug!(%kind, %id, scope = %summary.scope, "created resource");
        inner.resources.insert(id.clone(), summary);
        match kind {
            ResourceKind::KnowledgeBase | ResourceKind::Log => {
                Ok(Created::Pending(inner.track(vec![id], false)))
            }
            _ => Ok(Created::Ready(id)),
        }
    }

    async fn delete(&self, kind: ResourceKind, target: &Target) -> Result<WorkRequestId, ProviderError> {
        let mut inner = self.inner.lock();
        let found = inner
            .resources
            .get(&target.id)
            .filter(|s| s.kind == kind && !s.lifecycle.is_gone())
            .filter(|s| match &target.scope {
                Some(scope) => &s.scope == scope,
                None => true,
            });
        if found.is_none() {
            return Err(ProviderError::NotFound { kind, id: target.id.clone() });
        }
        let dependents = inner.dependents(&target.id, &HashSet::new());
        if !dependents.is_empty() {
            return Err(ProviderError::Conflict(format!(
                "{} {} is still referenced by {}",
                kind,
                target.id,
                dependents.join(", ")
            )));
        }
        inner.resources.shift_remove(&target.id);
        tracing::debug!(%kind, id = %target.id, "deleted resource");
        Ok(inner.track(vec![target.id.clone()], true))
    }

    async fn delete_by_tag(
        &self,
        kind: ResourceKind,
        scope: &str,
        tag: &str,
    ) -> Result<WorkRequestId, ProviderError> {
        let mut inner = self.inner.lock();
        let doomed: HashSet<String> = inner
            .live()
            .filter(|s| s.kind == kind && s.has_tag(DEPLOY_TAG_KEY, tag) && inner.within(s, scope))
            .map(|s| s.id.clone())
            .collect();
        for id in &doomed {
            let dependents = inner.dependents(id, &doomed);
            if !dependents.is_empty() {
                return Err(ProviderError::Conflict(format!(
                    "{} {} is still referenced by {}",
                    kind,
                    id,
                    dependents.join(", ")
                )));
            }
        }
        inner.resources.retain(|id, _| !doomed.contains(id));
        let mut ids: Vec<String> = doomed.into_iter().collect();
        ids.sort();
        tracing::debug!(%kind, scope, tag, count = ids.len(), "deleted resources by tag");
        Ok(inner.track(ids, true))
    }

    async fn list(
        &self,
        kind: ResourceKind,
        scope: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Summary>, ProviderError> {
        let inner = self.inner.lock();
        Ok(inner
            .live()
            .filter(|s| s.kind == kind && inner.within(s, scope) && filter.matches(s))
            .cloned()
            .collect())
    }

    async fn work_request_status(&self, id: &WorkRequestId) -> Result<WorkRequest, ProviderError> {
        let mut inner = self.inner.lock();
        let Some(tracked) = inner.work_requests.get_mut(id.as_str()) else {
            return Err(ProviderError::UnknownWorkRequest(id.to_string()));
        };
        if tracked.remaining_polls > 0 {
            tracked.remaining_polls -= 1;
            let mut request = tracked.request.clone();
            request.status = OperationStatus::InProgress;
            return Ok(request);
        }
        Ok(tracked.request.clone())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
