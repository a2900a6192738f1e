// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved paths and teardown settings.
//!
//! Settings come from `dvo.toml` in the state directory when present;
//! environment variables override the file.

use crate::env;
use dvo_engine::{StageSweep, TeardownConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "dvo.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory (set DVO_STATE_DIR or HOME)")]
    NoStateDir,
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub state_dir: PathBuf,
    /// One checkpoint file per folder
    pub checkpoint_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Provider inventory the CLI operates on
    pub inventory_path: PathBuf,
    /// Held exclusively while a command uses the state directory
    pub lock_path: PathBuf,
    pub teardown: TeardownConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    teardown: TeardownSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TeardownSection {
    poll_interval_ms: Option<u64>,
    bootstrap_interval_ms: Option<u64>,
    bootstrap_timeout_ms: Option<u64>,
    stage_sweep: Option<StageSweep>,
    remnant_sweep: Option<bool>,
}

impl TeardownSection {
    fn apply(self, mut config: TeardownConfig) -> TeardownConfig {
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.bootstrap_interval_ms {
            config.bootstrap_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.bootstrap_timeout_ms {
            config.bootstrap_timeout = Duration::from_millis(ms);
        }
        if let Some(policy) = self.stage_sweep {
            config.stage_sweep = policy;
        }
        if let Some(enabled) = self.remnant_sweep {
            config.remnant_sweep = enabled;
        }
        config
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = env::state_dir().ok_or(ConfigError::NoStateDir)?;
        Self::in_dir(state_dir)
    }

    /// Resolve everything relative to `state_dir`.
    pub fn in_dir(state_dir: PathBuf) -> Result<Self, ConfigError> {
        let file = read_file(&state_dir.join(CONFIG_FILE))?;
        let mut teardown = file.teardown.apply(TeardownConfig::default());
        if let Some(interval) = env::poll_interval() {
            teardown.poll_interval = interval;
        }
        if let Some(timeout) = env::bootstrap_timeout() {
            teardown.bootstrap_timeout = timeout;
        }

        Ok(Self {
            checkpoint_dir: state_dir.join("checkpoints"),
            log_dir: state_dir.join("logs"),
            inventory_path: state_dir.join("inventory.json"),
            lock_path: state_dir.join("dvo.lock"),
            state_dir,
            teardown,
        })
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
    };
    toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
