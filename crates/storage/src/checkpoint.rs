// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Checkpoint store: keyed persistence of progress records.
//!
//! The teardown engine saves after every single slot mutation, so `save`
//! must be cheap and atomic. Calls are synchronous; they complete (or fail)
//! before the engine issues the next provider call.

use crate::migration::{MigrationError, MigrationRegistry};
use chrono::{DateTime, Utc};
use dvo_core::ProgressRecord;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Current checkpoint schema version
pub const CURRENT_CHECKPOINT_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("invalid checkpoint key: {0:?}")]
    InvalidKey(String),
    #[error("checkpoint {0} still has resources to delete")]
    NotEmpty(String),
    #[error("checkpoint {key} is corrupt (moved to {backup}): {source}")]
    Corrupt { key: String, backup: String, source: serde_json::Error },
    #[error("checkpoint store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed load/save/clear of progress records.
pub trait CheckpointStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<ProgressRecord>, CheckpointError>;

    fn save(&self, key: &str, record: &ProgressRecord) -> Result<(), CheckpointError>;

    /// Remove the checkpoint. Refuses when the persisted record still has work.
    fn clear(&self, key: &str) -> Result<(), CheckpointError>;

    /// Keys with a persisted checkpoint, sorted.
    fn keys(&self) -> Result<Vec<String>, CheckpointError>;
}

/// On-disk envelope around a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(rename = "v")]
    pub version: u32,
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub record: ProgressRecord,
}

/// Normalize a folder name into a checkpoint key.
///
/// Every whitespace run becomes one `_`, leading and trailing runs
/// included; path separators and dot-only names are rejected.
pub fn checkpoint_key(folder: &str) -> Result<String, CheckpointError> {
    let mut key = String::with_capacity(folder.len());
    let mut in_run = false;
    for c in folder.chars() {
        let space = c.is_whitespace();
        if !space {
            key.push(c);
        } else if !in_run {
            key.push('_');
        }
        in_run = space;
    }
    if key.is_empty() || key.contains(['/', '\\']) || key.chars().all(|c| c == '.') {
        return Err(CheckpointError::InvalidKey(folder.to_string()));
    }
    Ok(key)
}

/// One JSON envelope per key inside a directory.
pub struct FileCheckpointStore {
    dir: PathBuf,
    migrations: MigrationRegistry,
}

impl FileCheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), migrations: MigrationRegistry::standard() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, CheckpointError> {
        Ok(self.dir.join(format!("{}.json", checkpoint_key(key)?)))
    }

    fn read(&self, key: &str, path: &Path) -> Result<Option<Checkpoint>, CheckpointError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let doc: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(doc) => doc,
            Err(source) => {
                let backup = rotate_bak_path(path);
                fs::rename(path, &backup)?;
                tracing::warn!(key, backup = %backup.display(), error = %source, "corrupt checkpoint moved aside");
                return Err(CheckpointError::Corrupt {
                    key: key.to_string(),
                    backup: backup.display().to_string(),
                    source,
                });
            }
        };
        let doc = self.migrations.migrate_to(doc, CURRENT_CHECKPOINT_VERSION)?;
        Ok(Some(serde_json::from_value(doc)?))
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self, key: &str) -> Result<Option<ProgressRecord>, CheckpointError> {
        let path = self.path(key)?;
        let checkpoint = self.read(key, &path)?;
        tracing::debug!(key, found = checkpoint.is_some(), "loaded checkpoint");
        Ok(checkpoint.map(|c| c.record))
    }

    fn save(&self, key: &str, record: &ProgressRecord) -> Result<(), CheckpointError> {
        let path = self.path(key)?;
        let tmp_path = path.with_extension("json.tmp");
        let checkpoint = Checkpoint {
            version: CURRENT_CHECKPOINT_VERSION,
            key: checkpoint_key(key)?,
            updated_at: Some(Utc::now()),
            record: record.clone(),
        };
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec_pretty(&checkpoint)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        tracing::debug!(key, path = %path.display(), "saved checkpoint");
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), CheckpointError> {
        let path = self.path(key)?;
        match self.read(key, &path)? {
            None => Ok(()),
            Some(checkpoint) if !checkpoint.record.is_empty() => {
                Err(CheckpointError::NotEmpty(key.to_string()))
            }
            Some(_) => {
                fs::remove_file(&path)?;
                tracing::info!(key, "cleared checkpoint");
                Ok(())
            }
        }
    }

    fn keys(&self) -> Result<Vec<String>, CheckpointError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut keys: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                name.strip_suffix(".json").map(str::to_string)
            })
            .collect();
        keys.sort();
        Ok(keys)
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[derive(Default)]
struct MemoryState {
    records: HashMap<String, ProgressRecord>,
    history: Vec<(String, ProgressRecord)>,
    fail_after: Option<usize>,
}

/// In-memory store; keeps every saved snapshot for inspection.
#[derive(Clone, Default)]
pub struct MemoryCheckpointStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(key: &str, record: ProgressRecord) -> Self {
        let store = Self::new();
        store.inner.lock().records.insert(key.to_string(), record);
        store
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.inner.lock().history.len()
    }

    /// Every record passed to a successful `save`, in order.
    pub fn history(&self) -> Vec<(String, ProgressRecord)> {
        self.inner.lock().history.clone()
    }

    /// Make every save after the first `n` fail, simulating a crash.
    pub fn fail_after(&self, n: usize) {
        self.inner.lock().fail_after = Some(n);
    }

    pub fn heal(&self) {
        self.inner.lock().fail_after = None;
    }

    pub fn get(&self, key: &str) -> Option<ProgressRecord> {
        self.inner.lock().records.get(key).cloned()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self, key: &str) -> Result<Option<ProgressRecord>, CheckpointError> {
        Ok(self.inner.lock().records.get(key).cloned())
    }

    fn save(&self, key: &str, record: &ProgressRecord) -> Result<(), CheckpointError> {
        let mut inner = self.inner.lock();
        if inner.fail_after.is_some_and(|n| inner.history.len() >= n) {
            return Err(CheckpointError::Unavailable(format!("save of {} rejected", key)));
        }
        inner.records.insert(key.to_string(), record.clone());
        inner.history.push((key.to_string(), record.clone()));
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), CheckpointError> {
        let mut inner = self.inner.lock();
        if inner.records.get(key).is_some_and(|r| !r.is_empty()) {
            return Err(CheckpointError::NotEmpty(key.to_string()));
        }
        inner.records.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CheckpointError> {
        let mut keys: Vec<String> = self.inner.lock().records.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
