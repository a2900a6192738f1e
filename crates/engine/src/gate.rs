// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One long-running operation at a time per session.

use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("another operation is in progress: {active}")]
    Busy { active: String },
}

/// Admits one operation at a time. Cloning shares the gate.
#[derive(Debug, Clone, Default)]
pub struct OperationGate {
    active: Arc<Mutex<Option<String>>>,
}

impl OperationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the gate as `operation`; it stays closed until the guard drops.
    pub fn enter(&self, operation: impl Into<String>) -> Result<GateGuard, GateError> {
        let mut active = self.active.lock();
        if let Some(current) = active.as_ref() {
            return Err(GateError::Busy { active: current.clone() });
        }
        let operation = operation.into();
        tracing::debug!(operation, "gate entered");
        *active = Some(operation);
        Ok(GateGuard { active: Arc::clone(&self.active) })
    }

    /// Name of the operation holding the gate.
    pub fn active(&self) -> Option<String> {
        self.active.lock().clone()
    }
}

/// Holds the gate closed while alive.
#[must_use = "the gate reopens as soon as the guard is dropped"]
#[derive(Debug)]
pub struct GateGuard {
    active: Arc<Mutex<Option<String>>>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        if let Some(operation) = self.active.lock().take() {
            tracing::debug!(operation, "gate released");
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
