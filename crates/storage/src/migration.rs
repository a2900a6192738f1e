// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Checkpoint schema migrations.
//!
//! Checkpoints carry a `"v"` field. Each [`Migration`] rewrites a JSON document
//! from one version to the next; the registry chains them until the target
//! version is reached.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("checkpoint version {0} is newer than supported version {1}")]
    TooNew(u32, u32),
    #[error("no migration path from version {0} to {1}")]
    NoPath(u32, u32),
    #[error("malformed checkpoint: {0}")]
    Malformed(String),
}

/// One schema step.
pub trait Migration: Send + Sync {
    fn source_version(&self) -> u32;
    fn target_version(&self) -> u32;
    fn migrate(&self, doc: &mut Value) -> Result<(), MigrationError>;
}

/// Ordered set of migrations.
pub struct MigrationRegistry {
    pub(crate) migrations: Vec<Box<dyn Migration>>,
}

impl MigrationRegistry {
    /// An empty registry (only same-version documents pass).
    pub fn new() -> Self {
        Self { migrations: Vec::new() }
    }

    /// Every migration the store knows about.
    pub fn standard() -> Self {
        Self { migrations: vec![Box::new(crate::legacy::LegacyFlatToV2)] }
    }

    pub fn register(&mut self, migration: Box<dyn Migration>) {
        self.migrations.push(migration);
    }

    /// Migrate `doc` up to `target`, updating its `"v"` field on every step.
    pub fn migrate_to(&self, mut doc: Value, target: u32) -> Result<Value, MigrationError> {
        let mut version = version_of(&doc);
        if version > target {
            return Err(MigrationError::TooNew(version, target));
        }
        while version < target {
            let Some(step) = self.migrations.iter().find(|m| m.source_version() == version) else {
                return Err(MigrationError::NoPath(version, target));
            };
            step.migrate(&mut doc)?;
            version = step.target_version();
            if let Some(obj) = doc.as_object_mut() {
                obj.insert("v".into(), version.into());
            }
            tracing::debug!(version, "migrated checkpoint");
        }
        Ok(doc)
    }
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Version of a document; anything without a `"v"` field predates versioning.
pub fn version_of(doc: &Value) -> u32 {
    doc.get("v").and_then(Value::as_u64).map(|v| v as u32).unwrap_or(1)
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
