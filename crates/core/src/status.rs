// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Work request statuses reported by the provider.

use crate::id::WorkRequestId;
use serde::{Deserialize, Serialize};

/// Status of a provider-side long-running operation.
///
/// Serialized as the provider's upper-case status string; anything the
/// orchestrator does not know about is kept verbatim in [`OperationStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationStatus {
    Accepted,
    InProgress,
    Canceling,
    Succeeded,
    Failed,
    Canceled,
    Other(String),
}

impl OperationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OperationStatus::Accepted => "ACCEPTED",
            OperationStatus::InProgress => "IN_PROGRESS",
            OperationStatus::Canceling => "CANCELING",
            OperationStatus::Succeeded => "SUCCEEDED",
            OperationStatus::Failed => "FAILED",
            OperationStatus::Canceled => "CANCELED",
            OperationStatus::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "ACCEPTED" => OperationStatus::Accepted,
            "IN_PROGRESS" => OperationStatus::InProgress,
            "CANCELING" => OperationStatus::Canceling,
            "SUCCEEDED" => OperationStatus::Succeeded,
            "FAILED" => OperationStatus::Failed,
            "CANCELED" => OperationStatus::Canceled,
            other => OperationStatus::Other(other.to_string()),
        }
    }

    /// Whether the operation is still running.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            OperationStatus::Accepted | OperationStatus::InProgress | OperationStatus::Canceling
        )
    }

    /// In-flight check used while confirming a creation, where some services
    /// also report `CREATING`.
    pub fn is_in_flight_or_creating(&self) -> bool {
        self.is_in_flight() || matches!(self, OperationStatus::Other(s) if s == "CREATING")
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationStatus::Succeeded)
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OperationStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OperationStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(OperationStatus::parse(&s))
    }
}

/// Snapshot of a work request as returned by a status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRequest {
    pub id: WorkRequestId,
    pub status: OperationStatus,
    /// Identifiers of the resources the operation affected, in provider order.
    #[serde(default)]
    pub resources: Vec<String>,
}

impl WorkRequest {
    pub fn new(id: WorkRequestId, status: OperationStatus) -> Self {
        Self { id, status, resources: Vec::new() }
    }

    pub fn with_resource(mut self, id: impl Into<String>) -> Self {
        self.resources.push(id.into());
        self
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
